//! Axum route handlers for the Generation API.

use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::interview::InterviewQa;
use crate::generation::orchestrator::{Artifact, GenerationRequest};
use crate::models::profile::UserProfile;
use crate::quota::FeatureKey;
use crate::state::AppState;
use crate::usage::UsageKey;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateDocumentRequest {
    pub profile: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct GenerateCoverLetterRequest {
    pub profile: UserProfile,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub feature: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub feature: &'static str,
    pub questions: Vec<InterviewQa>,
}

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub feature: &'static str,
    pub used: u32,
    /// `null` when the feature is not gated.
    pub free_limit: Option<u32>,
    pub is_premium: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate/resume
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Json(request): Json<GenerateDocumentRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    let artifact = state
        .orchestrator
        .request(GenerationRequest {
            feature: FeatureKey::Resume,
            profile: request.profile,
            job_description: None,
        })
        .await?;
    into_document(FeatureKey::Resume, artifact).map(Json)
}

/// POST /api/v1/generate/cover-letter
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<GenerateCoverLetterRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    let artifact = state
        .orchestrator
        .request(GenerationRequest {
            feature: FeatureKey::CoverLetter,
            profile: request.profile,
            job_description: Some(request.job_description),
        })
        .await?;
    into_document(FeatureKey::CoverLetter, artifact).map(Json)
}

/// POST /api/v1/generate/interview
pub async fn handle_generate_interview(
    State(state): State<AppState>,
    Json(request): Json<GenerateDocumentRequest>,
) -> Result<Json<InterviewResponse>, AppError> {
    let artifact = state
        .orchestrator
        .request(GenerationRequest {
            feature: FeatureKey::Interview,
            profile: request.profile,
            job_description: None,
        })
        .await?;
    match artifact {
        Artifact::Questions(questions) => Ok(Json(InterviewResponse {
            feature: FeatureKey::Interview.as_str(),
            questions,
        })),
        Artifact::Markdown(_) => Err(AppError::Internal(anyhow!(
            "interview feature produced a document artifact"
        ))),
    }
}

/// POST /api/v1/generate/market
pub async fn handle_generate_market(
    State(state): State<AppState>,
    Json(request): Json<GenerateDocumentRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    let artifact = state
        .orchestrator
        .request(GenerationRequest {
            feature: FeatureKey::MarketInsights,
            profile: request.profile,
            job_description: None,
        })
        .await?;
    into_document(FeatureKey::MarketInsights, artifact).map(Json)
}

/// GET /api/v1/usage/:feature
///
/// Today's count against the feature's free limit — the UI renders its
/// "2/5 used" counters from this.
pub async fn handle_get_usage(
    State(state): State<AppState>,
    Path(feature): Path<String>,
) -> Result<Json<UsageResponse>, AppError> {
    let feature: FeatureKey = feature
        .parse()
        .map_err(|e: String| AppError::NotFound(e))?;

    let used = state.ledger.usage(UsageKey::today(feature)).await?;
    let is_premium = state.entitlement.is_premium().await?;

    Ok(Json(UsageResponse {
        feature: feature.as_str(),
        used,
        free_limit: state.quotas.free_limit(feature),
        is_premium,
    }))
}

fn into_document(
    feature: FeatureKey,
    artifact: Artifact,
) -> Result<DocumentResponse, AppError> {
    match artifact {
        Artifact::Markdown(content) => Ok(DocumentResponse {
            feature: feature.as_str(),
            content,
        }),
        Artifact::Questions(_) => Err(AppError::Internal(anyhow!(
            "{feature} unexpectedly produced interview questions"
        ))),
    }
}
