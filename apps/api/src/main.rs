mod chat;
mod config;
mod entitlement;
mod errors;
mod generation;
mod llm_client;
mod models;
mod payment;
mod quota;
mod routes;
mod state;
mod store;
mod usage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::chat::ChatService;
use crate::config::Config;
use crate::entitlement::Entitlement;
use crate::generation::backend::{GenerationBackend, LlmBackend};
use crate::generation::orchestrator::Orchestrator;
use crate::llm_client::LlmClient;
use crate::payment::{MockCheckout, PaymentFlow};
use crate::quota::QuotaConfig;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{create_pool, KvStore, PostgresKvStore};
use crate::usage::UsageLedger;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobNexa API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the persistence store
    let pool = create_pool(&config.database_url).await?;
    let postgres = PostgresKvStore::new(pool);
    postgres.ensure_schema().await?;
    let store: Arc<dyn KvStore> = Arc::new(postgres);
    info!("Key-value store ready");

    // Initialize the generation backend
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    let backend: Arc<dyn GenerationBackend> = Arc::new(LlmBackend::new(llm));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Wire the core: ledger + entitlement feed the orchestrator and chat
    let quotas = QuotaConfig::default();
    let ledger = UsageLedger::new(store.clone());
    let entitlement = Entitlement::new(store.clone());

    let orchestrator = Orchestrator::new(
        ledger.clone(),
        entitlement.clone(),
        quotas.clone(),
        backend.clone(),
    );

    let chat = Arc::new(ChatService::new(
        store.clone(),
        backend,
        ledger.clone(),
        entitlement.clone(),
        quotas.clone(),
    ));

    let payment = Arc::new(Mutex::new(PaymentFlow::new(
        entitlement.clone(),
        MockCheckout::new(),
    )));

    // Build app state
    let state = AppState {
        ledger,
        entitlement,
        quotas,
        orchestrator,
        chat,
        payment,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
