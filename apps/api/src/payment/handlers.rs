//! Axum route handlers for the upgrade flow and entitlement status.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::payment::{CheckoutSession, CurrencyInfo, PaymentStage, CURRENCIES};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InitiateRequest {
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub stage: PaymentStage,
    pub checkout: CheckoutSession,
}

#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub stage: PaymentStage,
    pub checkout: Option<CheckoutSession>,
    pub is_premium: bool,
}

#[derive(Debug, Serialize)]
pub struct EntitlementResponse {
    pub is_premium: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/payment/initiate
///
/// Starts an upgrade attempt and returns the mock checkout details the UI
/// renders in its payment modal.
pub async fn handle_initiate(
    State(state): State<AppState>,
    Json(request): Json<InitiateRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let mut flow = state.payment.lock().await;
    let checkout = flow.initiate(&request.currency).await?.clone();
    Ok(Json(CheckoutResponse {
        stage: flow.stage(),
        checkout,
    }))
}

/// POST /api/v1/payment/confirm
pub async fn handle_confirm(
    State(state): State<AppState>,
) -> Result<Json<PaymentStatusResponse>, AppError> {
    let mut flow = state.payment.lock().await;
    flow.confirm().await?;
    let is_premium = state.entitlement.is_premium().await?;
    Ok(Json(PaymentStatusResponse {
        stage: flow.stage(),
        checkout: None,
        is_premium,
    }))
}

/// POST /api/v1/payment/cancel
pub async fn handle_cancel(
    State(state): State<AppState>,
) -> Result<Json<PaymentStatusResponse>, AppError> {
    let mut flow = state.payment.lock().await;
    flow.cancel()?;
    let is_premium = state.entitlement.is_premium().await?;
    Ok(Json(PaymentStatusResponse {
        stage: flow.stage(),
        checkout: None,
        is_premium,
    }))
}

/// GET /api/v1/payment/status
pub async fn handle_status(
    State(state): State<AppState>,
) -> Result<Json<PaymentStatusResponse>, AppError> {
    let flow = state.payment.lock().await;
    let is_premium = state.entitlement.is_premium().await?;
    Ok(Json(PaymentStatusResponse {
        stage: flow.stage(),
        checkout: flow.pending().cloned(),
        is_premium,
    }))
}

/// GET /api/v1/payment/currencies
pub async fn handle_currencies() -> Json<&'static [CurrencyInfo]> {
    Json(CURRENCIES)
}

/// GET /api/v1/entitlement
pub async fn handle_entitlement(
    State(state): State<AppState>,
) -> Result<Json<EntitlementResponse>, AppError> {
    let is_premium = state.entitlement.is_premium().await?;
    Ok(Json(EntitlementResponse { is_premium }))
}
