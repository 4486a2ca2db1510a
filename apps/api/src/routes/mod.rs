pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat_handlers;
use crate::generation::handlers as generation_handlers;
use crate::payment::handlers as payment_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Artifact generation (quota-gated)
        .route(
            "/api/v1/generate/resume",
            post(generation_handlers::handle_generate_resume),
        )
        .route(
            "/api/v1/generate/cover-letter",
            post(generation_handlers::handle_generate_cover_letter),
        )
        .route(
            "/api/v1/generate/interview",
            post(generation_handlers::handle_generate_interview),
        )
        .route(
            "/api/v1/generate/market",
            post(generation_handlers::handle_generate_market),
        )
        .route(
            "/api/v1/usage/:feature",
            get(generation_handlers::handle_get_usage),
        )
        // Chat session
        .route("/api/v1/chat/open", post(chat_handlers::handle_open))
        .route("/api/v1/chat/send", post(chat_handlers::handle_send))
        .route("/api/v1/chat/history", get(chat_handlers::handle_history))
        // Upgrade flow
        .route(
            "/api/v1/payment/initiate",
            post(payment_handlers::handle_initiate),
        )
        .route(
            "/api/v1/payment/confirm",
            post(payment_handlers::handle_confirm),
        )
        .route(
            "/api/v1/payment/cancel",
            post(payment_handlers::handle_cancel),
        )
        .route(
            "/api/v1/payment/status",
            get(payment_handlers::handle_status),
        )
        .route(
            "/api/v1/payment/currencies",
            get(payment_handlers::handle_currencies),
        )
        .route(
            "/api/v1/entitlement",
            get(payment_handlers::handle_entitlement),
        )
        .with_state(state)
}
