use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::payment::PaymentError;
use crate::quota::FeatureKey;
use crate::store::StoreError;

/// Typed result of a gated generation or chat request. Every kind is
/// expected and recoverable: quota exhaustion prompts an upsell, validation
/// and transport failures are retryable by re-issuing the request, and input
/// errors are rejected before any service or ledger work happens.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("daily free limit of {limit} reached for {feature}")]
    QuotaExceeded { feature: FeatureKey, limit: u32 },

    #[error("generated output failed validation: {0}")]
    Validation(String),

    #[error("generation service error: {0}")]
    Transport(String),

    #[error("invalid input: {0}")]
    Input(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Generation(err) => match err {
                GenerationError::QuotaExceeded { feature, limit } => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "QUOTA_EXCEEDED",
                    format!(
                        "Daily free limit of {limit} reached for {feature}. \
                         Upgrade to Pro for unlimited access."
                    ),
                ),
                GenerationError::Validation(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "GENERATION_INVALID",
                    "AI response was incomplete. Please try again.".to_string(),
                ),
                GenerationError::Transport(msg) => {
                    tracing::error!("Generation service error: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "GENERATION_UNAVAILABLE",
                        "The AI service is unavailable. Please try again.".to_string(),
                    )
                }
                GenerationError::Input(msg) => {
                    (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone())
                }
                GenerationError::Store(e) => {
                    tracing::error!("Store error during generation: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORE_ERROR",
                        "A storage error occurred".to_string(),
                    )
                }
            },
            AppError::Payment(err) => match err {
                PaymentError::UnknownCurrency(code) => (
                    StatusCode::BAD_REQUEST,
                    "UNKNOWN_CURRENCY",
                    format!("Unsupported currency: {code}"),
                ),
                PaymentError::InvalidTransition { .. } => {
                    (StatusCode::CONFLICT, "PAYMENT_STATE", err.to_string())
                }
                PaymentError::Store(e) => {
                    tracing::error!("Store error during payment: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORE_ERROR",
                        "A storage error occurred".to_string(),
                    )
                }
            },
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
