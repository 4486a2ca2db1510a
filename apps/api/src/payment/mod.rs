#![allow(dead_code)]

//! Payment Flow — turns an upgrade intent into a confirmed entitlement
//! change via a mocked checkout collaborator.
//!
//! Idle → Initiating → AwaitingConfirmation → {Confirmed, Cancelled}.
//! The checkout collaborator here is a mock that yields payable session
//! details after a bounded delay; a production gateway would replace it
//! behind the same call without changing the state machine. Confirmation
//! is the single writer of the entitlement flag.

pub mod handlers;

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::entitlement::Entitlement;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("{action} is not valid while the payment flow is {stage}")]
    InvalidTransition {
        action: &'static str,
        stage: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ────────────────────────────────────────────────────────────────────────────
// Pricing table
// ────────────────────────────────────────────────────────────────────────────

/// One row of the launch pricing table.
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    pub price: f64,
    /// Struck-through list price shown next to the deal.
    pub original: f64,
}

pub const CURRENCIES: &[CurrencyInfo] = &[
    CurrencyInfo { code: "USD", symbol: "$", name: "United States Dollar", price: 4.99, original: 29.99 },
    CurrencyInfo { code: "EUR", symbol: "€", name: "Euro", price: 4.99, original: 29.99 },
    CurrencyInfo { code: "GBP", symbol: "£", name: "British Pound", price: 3.99, original: 24.99 },
    CurrencyInfo { code: "INR", symbol: "₹", name: "Indian Rupee", price: 199.0, original: 1499.0 },
    CurrencyInfo { code: "CAD", symbol: "CA$", name: "Canadian Dollar", price: 6.99, original: 39.99 },
    CurrencyInfo { code: "AUD", symbol: "A$", name: "Australian Dollar", price: 7.99, original: 45.99 },
];

pub fn lookup_currency(code: &str) -> Option<&'static CurrencyInfo> {
    CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

// ────────────────────────────────────────────────────────────────────────────
// Checkout collaborator (mock)
// ────────────────────────────────────────────────────────────────────────────

/// Payable session returned by the checkout collaborator. The card fields
/// are test-mode placeholders surfaced to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    pub reference: Uuid,
    pub currency: &'static str,
    pub amount: f64,
    pub card_number: &'static str,
    pub expiry: &'static str,
    pub cvc: &'static str,
}

/// Mock checkout collaborator: simulates the round trip to a payment
/// gateway with a bounded delay, then yields a confirmation-ready session.
pub struct MockCheckout {
    delay: Duration,
}

impl MockCheckout {
    pub fn new() -> Self {
        Self { delay: Duration::from_millis(1500) }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn create_session(&self, currency: &CurrencyInfo) -> CheckoutSession {
        tokio::time::sleep(self.delay).await;
        CheckoutSession {
            reference: Uuid::new_v4(),
            currency: currency.code,
            amount: currency.price,
            card_number: "4242 4242 4242 4242",
            expiry: "12/25",
            cvc: "123",
        }
    }
}

impl Default for MockCheckout {
    fn default() -> Self {
        Self::new()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// State machine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStage {
    Idle,
    Initiating,
    AwaitingConfirmation,
    Confirmed,
    Cancelled,
}

impl PaymentStage {
    fn as_str(&self) -> &'static str {
        match self {
            PaymentStage::Idle => "idle",
            PaymentStage::Initiating => "initiating",
            PaymentStage::AwaitingConfirmation => "awaiting_confirmation",
            PaymentStage::Confirmed => "confirmed",
            PaymentStage::Cancelled => "cancelled",
        }
    }
}

pub struct PaymentFlow {
    stage: PaymentStage,
    checkout: MockCheckout,
    entitlement: Entitlement,
    pending: Option<CheckoutSession>,
}

impl PaymentFlow {
    pub fn new(entitlement: Entitlement, checkout: MockCheckout) -> Self {
        Self {
            stage: PaymentStage::Idle,
            checkout,
            entitlement,
            pending: None,
        }
    }

    pub fn stage(&self) -> PaymentStage {
        self.stage
    }

    pub fn pending(&self) -> Option<&CheckoutSession> {
        self.pending.as_ref()
    }

    /// Starts a fresh upgrade attempt. Valid from any resting stage (Idle,
    /// Confirmed, Cancelled); an attempt already in flight must be resolved
    /// first.
    pub async fn initiate(&mut self, currency_code: &str) -> Result<&CheckoutSession, PaymentError> {
        if matches!(
            self.stage,
            PaymentStage::Initiating | PaymentStage::AwaitingConfirmation
        ) {
            return Err(PaymentError::InvalidTransition {
                action: "initiate",
                stage: self.stage.as_str(),
            });
        }

        let currency = lookup_currency(currency_code)
            .ok_or_else(|| PaymentError::UnknownCurrency(currency_code.to_string()))?;

        self.stage = PaymentStage::Initiating;
        let session = self.checkout.create_session(currency).await;
        info!(currency = currency.code, amount = currency.price, "checkout session created");
        self.stage = PaymentStage::AwaitingConfirmation;
        Ok(self.pending.insert(session))
    }

    /// Confirms the pending checkout: flips the entitlement and terminates
    /// this attempt.
    pub async fn confirm(&mut self) -> Result<(), PaymentError> {
        if self.stage != PaymentStage::AwaitingConfirmation {
            return Err(PaymentError::InvalidTransition {
                action: "confirm",
                stage: self.stage.as_str(),
            });
        }
        self.entitlement.grant_premium().await?;
        self.stage = PaymentStage::Confirmed;
        self.pending = None;
        info!("payment confirmed; premium entitlement active");
        Ok(())
    }

    /// Abandons the pending checkout. No entitlement change.
    pub fn cancel(&mut self) -> Result<(), PaymentError> {
        if self.stage != PaymentStage::AwaitingConfirmation {
            return Err(PaymentError::InvalidTransition {
                action: "cancel",
                stage: self.stage.as_str(),
            });
        }
        self.stage = PaymentStage::Cancelled;
        self.pending = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKvStore;
    use std::sync::Arc;

    fn flow() -> (PaymentFlow, Entitlement) {
        let entitlement = Entitlement::new(Arc::new(MemoryKvStore::new()));
        let flow = PaymentFlow::new(
            entitlement.clone(),
            MockCheckout::with_delay(Duration::ZERO),
        );
        (flow, entitlement)
    }

    #[tokio::test]
    async fn test_initiate_reaches_awaiting_confirmation_with_mock_details() {
        let (mut flow, _) = flow();
        let session = flow.initiate("USD").await.unwrap();
        assert_eq!(session.currency, "USD");
        assert_eq!(session.amount, 4.99);
        assert_eq!(session.card_number, "4242 4242 4242 4242");
        assert_eq!(flow.stage(), PaymentStage::AwaitingConfirmation);
    }

    #[tokio::test]
    async fn test_confirm_grants_premium() {
        let (mut flow, entitlement) = flow();
        flow.initiate("INR").await.unwrap();
        flow.confirm().await.unwrap();
        assert_eq!(flow.stage(), PaymentStage::Confirmed);
        assert!(flow.pending().is_none());
        assert!(entitlement.is_premium().await.unwrap());
    }

    #[tokio::test]
    async fn test_cancel_changes_nothing() {
        let (mut flow, entitlement) = flow();
        flow.initiate("GBP").await.unwrap();
        flow.cancel().unwrap();
        assert_eq!(flow.stage(), PaymentStage::Cancelled);
        assert!(!entitlement.is_premium().await.unwrap());
    }

    #[tokio::test]
    async fn test_confirm_from_idle_is_rejected() {
        let (mut flow, entitlement) = flow();
        let err = flow.confirm().await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidTransition { action: "confirm", .. }));
        assert!(!entitlement.is_premium().await.unwrap());
    }

    #[tokio::test]
    async fn test_initiate_while_awaiting_is_rejected() {
        let (mut flow, _) = flow();
        flow.initiate("USD").await.unwrap();
        let err = flow.initiate("EUR").await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidTransition { action: "initiate", .. }));
    }

    #[tokio::test]
    async fn test_new_attempt_starts_fresh_after_cancellation() {
        let (mut flow, entitlement) = flow();
        flow.initiate("USD").await.unwrap();
        flow.cancel().unwrap();

        flow.initiate("CAD").await.unwrap();
        flow.confirm().await.unwrap();
        assert!(entitlement.is_premium().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_currency_is_rejected_in_resting_state() {
        let (mut flow, _) = flow();
        let err = flow.initiate("BTC").await.unwrap_err();
        assert!(matches!(err, PaymentError::UnknownCurrency(_)));
        assert_eq!(flow.stage(), PaymentStage::Idle);
    }

    #[test]
    fn test_currency_lookup_is_case_insensitive() {
        assert_eq!(lookup_currency("usd").unwrap().code, "USD");
        assert!(lookup_currency("XYZ").is_none());
        assert_eq!(CURRENCIES.len(), 6);
    }
}
