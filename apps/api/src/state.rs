use std::sync::Arc;

use tokio::sync::Mutex;

use crate::chat::ChatService;
use crate::entitlement::Entitlement;
use crate::generation::orchestrator::Orchestrator;
use crate::payment::PaymentFlow;
use crate::quota::QuotaConfig;
use crate::usage::UsageLedger;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub ledger: UsageLedger,
    pub entitlement: Entitlement,
    pub quotas: QuotaConfig,
    pub orchestrator: Orchestrator,
    /// Single live chat session slot; the service serializes its own access.
    pub chat: Arc<ChatService>,
    /// The current upgrade attempt. One flow per deployment, like the
    /// entitlement it feeds.
    pub payment: Arc<Mutex<PaymentFlow>>,
}
