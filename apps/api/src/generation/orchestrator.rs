//! Generation Orchestrator — gates every artifact request through the usage
//! ledger and entitlement state, invokes the generation service, and commits
//! usage only after a validated success.
//!
//! Request lifecycle: Checking → Blocked (quota hit, service never called)
//! or Checking → Invoking → Succeeded (ledger incremented exactly once,
//! strictly after success) / Failed (no ledger mutation; caller may retry
//! by issuing a new request — no automatic retry here).
//!
//! Each feature is an independent instantiation of the same gate with its
//! own key and free limit; features never share quota.

use std::sync::Arc;

use tracing::{debug, info};

use crate::entitlement::Entitlement;
use crate::errors::GenerationError;
use crate::generation::backend::GenerationBackend;
use crate::generation::interview::{parse_interview_questions, InterviewQa};
use crate::generation::prompts::{
    cover_letter_prompt, interview_prompt, market_prompt, resume_prompt, COVER_LETTER_SYSTEM,
    INTERVIEW_SYSTEM, MARKET_SYSTEM, RESUME_SYSTEM,
};
use crate::models::profile::UserProfile;
use crate::quota::{FeatureKey, QuotaConfig};
use crate::usage::{UsageKey, UsageLedger};

/// What a feature invocation produced.
#[derive(Debug, Clone)]
pub enum Artifact {
    /// Markdown document (resume, cover letter, market analysis).
    Markdown(String),
    /// Parsed interview questions.
    Questions(Vec<InterviewQa>),
}

/// Inputs for one orchestrated request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub feature: FeatureKey,
    pub profile: UserProfile,
    /// Job description text; consumed by the cover-letter feature only.
    pub job_description: Option<String>,
}

#[derive(Clone)]
pub struct Orchestrator {
    ledger: UsageLedger,
    entitlement: Entitlement,
    quotas: QuotaConfig,
    backend: Arc<dyn GenerationBackend>,
}

impl Orchestrator {
    pub fn new(
        ledger: UsageLedger,
        entitlement: Entitlement,
        quotas: QuotaConfig,
        backend: Arc<dyn GenerationBackend>,
    ) -> Self {
        Self {
            ledger,
            entitlement,
            quotas,
            backend,
        }
    }

    /// Runs one gated generation request end to end.
    pub async fn request(&self, req: GenerationRequest) -> Result<Artifact, GenerationError> {
        let key = UsageKey::today(req.feature);

        // Checking: premium short-circuits the quota consultation entirely.
        if !self.entitlement.is_premium().await? {
            if let Some(limit) = self.quotas.free_limit(req.feature) {
                let used = self.ledger.usage(key).await?;
                if used >= limit {
                    debug!(feature = %req.feature, used, limit, "request blocked by daily quota");
                    return Err(GenerationError::QuotaExceeded {
                        feature: req.feature,
                        limit,
                    });
                }
            }
        }

        // Input validation happens before any service work.
        let (system, prompt) = build_feature_prompt(&req)?;

        // Invoking.
        let raw = self
            .backend
            .generate(system, &prompt)
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        // A structurally invalid result is a failure: no quota is consumed.
        let artifact = validate_output(req.feature, raw)?;

        // Succeeded: commit exactly once, strictly after the validated result.
        let count = self.ledger.increment(key).await?;
        info!(feature = %req.feature, count, "artifact generated");

        Ok(artifact)
    }
}

fn build_feature_prompt(
    req: &GenerationRequest,
) -> Result<(&'static str, String), GenerationError> {
    match req.feature {
        FeatureKey::Resume => Ok((RESUME_SYSTEM, resume_prompt(&req.profile))),
        FeatureKey::CoverLetter => {
            let job_description = req
                .job_description
                .as_deref()
                .map(str::trim)
                .filter(|jd| !jd.is_empty())
                .ok_or_else(|| {
                    GenerationError::Input("job description cannot be empty".to_string())
                })?;
            Ok((
                COVER_LETTER_SYSTEM,
                cover_letter_prompt(&req.profile, job_description),
            ))
        }
        FeatureKey::Interview => Ok((INTERVIEW_SYSTEM, interview_prompt(&req.profile))),
        FeatureKey::MarketInsights => Ok((MARKET_SYSTEM, market_prompt(&req.profile))),
        FeatureKey::Chat => Err(GenerationError::Input(
            "chat turns go through the chat session, not the orchestrator".to_string(),
        )),
    }
}

fn validate_output(feature: FeatureKey, raw: String) -> Result<Artifact, GenerationError> {
    match feature {
        FeatureKey::Interview => Ok(Artifact::Questions(parse_interview_questions(&raw)?)),
        // Market insights (and the other markdown features) have no
        // structural check at this layer.
        _ => Ok(Artifact::Markdown(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::backend::testing::ScriptedBackend;
    use crate::store::{KvStore, MemoryKvStore};

    struct Fixture {
        orchestrator: Orchestrator,
        backend: Arc<ScriptedBackend>,
        ledger: UsageLedger,
        entitlement: Entitlement,
    }

    fn fixture(quotas: QuotaConfig) -> Fixture {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let backend = Arc::new(ScriptedBackend::new());
        let ledger = UsageLedger::new(store.clone());
        let entitlement = Entitlement::new(store);
        let orchestrator = Orchestrator::new(
            ledger.clone(),
            entitlement.clone(),
            quotas,
            backend.clone(),
        );
        Fixture {
            orchestrator,
            backend,
            ledger,
            entitlement,
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            full_name: "Alice Doe".to_string(),
            email: "alice@example.com".to_string(),
            phone: String::new(),
            target_role: "Backend Engineer".to_string(),
            target_region: "Canada".to_string(),
            skills: "Rust".to_string(),
            experience: "5 years".to_string(),
            education: "BSc".to_string(),
        }
    }

    fn request(feature: FeatureKey) -> GenerationRequest {
        GenerationRequest {
            feature,
            profile: profile(),
            job_description: match feature {
                FeatureKey::CoverLetter => Some("We hire Rust engineers.".to_string()),
                _ => None,
            },
        }
    }

    const QUESTIONS_JSON: &str =
        r#"[{"question": "Why Rust?", "answer": "Talk ownership and reliability."}]"#;

    #[tokio::test]
    async fn test_quota_gate_blocks_third_request_without_service_call() {
        let f = fixture(QuotaConfig::default().with_limit(FeatureKey::Resume, Some(2)));
        f.backend.push_ok("# Resume one");
        f.backend.push_ok("# Resume two");

        for _ in 0..2 {
            f.orchestrator.request(request(FeatureKey::Resume)).await.unwrap();
        }

        let err = f.orchestrator.request(request(FeatureKey::Resume)).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::QuotaExceeded { feature: FeatureKey::Resume, limit: 2 }
        ));
        // The third request never reached the backend.
        assert_eq!(f.backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_generation_does_not_consume_quota() {
        let f = fixture(QuotaConfig::default());
        f.backend.push_err("service melted");

        let err = f.orchestrator.request(request(FeatureKey::Resume)).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
        let usage = f.ledger.usage(UsageKey::today(FeatureKey::Resume)).await.unwrap();
        assert_eq!(usage, 0);
    }

    #[tokio::test]
    async fn test_premium_bypasses_quota_even_far_over_limit() {
        let f = fixture(QuotaConfig::default().with_limit(FeatureKey::Resume, Some(1)));
        f.entitlement.grant_premium().await.unwrap();
        let key = UsageKey::today(FeatureKey::Resume);
        for _ in 0..6 {
            f.ledger.increment(key).await.unwrap();
        }

        f.backend.push_ok("# Resume");
        f.orchestrator.request(request(FeatureKey::Resume)).await.unwrap();
        assert_eq!(f.backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_interview_output_is_validated_and_failures_are_free() {
        let f = fixture(QuotaConfig::default());
        f.backend.push_ok("Sure! Here are some questions for you.");

        let err = f.orchestrator.request(request(FeatureKey::Interview)).await.unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));
        let usage = f.ledger.usage(UsageKey::today(FeatureKey::Interview)).await.unwrap();
        assert_eq!(usage, 0);
    }

    #[tokio::test]
    async fn test_interview_success_returns_parsed_questions() {
        let f = fixture(QuotaConfig::default());
        f.backend.push_ok(QUESTIONS_JSON);

        let artifact = f.orchestrator.request(request(FeatureKey::Interview)).await.unwrap();
        match artifact {
            Artifact::Questions(questions) => {
                assert_eq!(questions.len(), 1);
                assert_eq!(questions[0].question, "Why Rust?");
            }
            Artifact::Markdown(_) => panic!("expected parsed questions"),
        }
        let usage = f.ledger.usage(UsageKey::today(FeatureKey::Interview)).await.unwrap();
        assert_eq!(usage, 1);
    }

    #[tokio::test]
    async fn test_market_insights_has_no_structural_check() {
        let f = fixture(QuotaConfig::default());
        f.backend.push_ok("anything the model says goes through");

        let artifact = f
            .orchestrator
            .request(request(FeatureKey::MarketInsights))
            .await
            .unwrap();
        assert!(matches!(artifact, Artifact::Markdown(_)));
    }

    #[tokio::test]
    async fn test_empty_job_description_is_rejected_before_any_work() {
        let f = fixture(QuotaConfig::default());
        let mut req = request(FeatureKey::CoverLetter);
        req.job_description = Some("   ".to_string());

        let err = f.orchestrator.request(req).await.unwrap_err();
        assert!(matches!(err, GenerationError::Input(_)));
        assert_eq!(f.backend.calls(), 0);
        let usage = f.ledger.usage(UsageKey::today(FeatureKey::CoverLetter)).await.unwrap();
        assert_eq!(usage, 0);
    }

    #[tokio::test]
    async fn test_chat_feature_is_not_orchestrated() {
        let f = fixture(QuotaConfig::default());
        let err = f.orchestrator.request(request(FeatureKey::Chat)).await.unwrap_err();
        assert!(matches!(err, GenerationError::Input(_)));
    }

    #[tokio::test]
    async fn test_end_to_end_resume_upgrade_scenario() {
        // Free limit 1: first request succeeds, second is blocked, and after
        // the upgrade the gate is bypassed with usage already at the limit.
        let f = fixture(QuotaConfig::default().with_limit(FeatureKey::Resume, Some(1)));
        let key = UsageKey::today(FeatureKey::Resume);

        f.backend.push_ok("# Resume");
        f.orchestrator.request(request(FeatureKey::Resume)).await.unwrap();
        assert_eq!(f.ledger.usage(key).await.unwrap(), 1);

        let err = f.orchestrator.request(request(FeatureKey::Resume)).await.unwrap_err();
        assert!(matches!(err, GenerationError::QuotaExceeded { .. }));

        f.entitlement.grant_premium().await.unwrap();
        f.backend.push_ok("# Resume again");
        f.orchestrator.request(request(FeatureKey::Resume)).await.unwrap();
        assert_eq!(f.backend.calls(), 2);
    }
}
