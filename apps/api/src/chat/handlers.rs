//! Axum route handlers for the chat session.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::chat::ChatMessage;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OpenChatRequest {
    /// Owner identity from the auth collaborator (email today).
    pub identity: String,
    /// Name used for the greeting; falls back to the identity.
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendChatRequest {
    pub identity: String,
    pub display_name: Option<String>,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub identity: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub identity: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct SendChatResponse {
    pub reply: ChatMessage,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/chat/open
///
/// Opens (or replaces) the live session for an identity and returns the
/// transcript — a single greeting for a brand-new identity.
pub async fn handle_open(
    State(state): State<AppState>,
    Json(request): Json<OpenChatRequest>,
) -> Result<Json<TranscriptResponse>, AppError> {
    if request.identity.trim().is_empty() {
        return Err(AppError::Validation("identity cannot be empty".to_string()));
    }

    let display_name = request
        .display_name
        .as_deref()
        .unwrap_or(&request.identity);
    let messages = state.chat.open(&request.identity, display_name).await?;

    Ok(Json(TranscriptResponse {
        identity: request.identity,
        messages,
    }))
}

/// POST /api/v1/chat/send
///
/// One conversational turn. The reply is a connection-error notice when the
/// generation service fails; quota and empty-input rejections surface as
/// typed errors.
pub async fn handle_send(
    State(state): State<AppState>,
    Json(request): Json<SendChatRequest>,
) -> Result<Json<SendChatResponse>, AppError> {
    if request.identity.trim().is_empty() {
        return Err(AppError::Validation("identity cannot be empty".to_string()));
    }

    let display_name = request
        .display_name
        .as_deref()
        .unwrap_or(&request.identity);
    let reply = state
        .chat
        .send(&request.identity, display_name, &request.text)
        .await?;

    Ok(Json(SendChatResponse { reply }))
}

/// GET /api/v1/chat/history?identity=...
pub async fn handle_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let messages = state.chat.history(&params.identity).await?;
    Ok(Json(TranscriptResponse {
        identity: params.identity,
        messages,
    }))
}
