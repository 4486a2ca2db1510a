#![allow(dead_code)]

//! Quota policy — static per-feature daily free limits.
//!
//! Configuration, not persistence: `QuotaConfig` is built at startup and
//! carried in `AppState`. Premium accounts bypass every limit; the gate
//! itself lives in the orchestrator and the chat session.

use std::fmt;
use std::str::FromStr;

/// Identifier for a gated capability. The `as_str` names double as the
/// storage-key segment for usage counters, so they must never change once
/// counters exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    Resume,
    CoverLetter,
    Interview,
    MarketInsights,
    Chat,
}

impl FeatureKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::Resume => "resume",
            FeatureKey::CoverLetter => "coverletter",
            FeatureKey::Interview => "interview",
            FeatureKey::MarketInsights => "market",
            FeatureKey::Chat => "chat",
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resume" => Ok(FeatureKey::Resume),
            "coverletter" => Ok(FeatureKey::CoverLetter),
            "interview" => Ok(FeatureKey::Interview),
            "market" => Ok(FeatureKey::MarketInsights),
            "chat" => Ok(FeatureKey::Chat),
            other => Err(format!("unknown feature: {other}")),
        }
    }
}

/// Daily free limits per feature. `None` means the feature is not gated.
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    resume: Option<u32>,
    cover_letter: Option<u32>,
    interview: Option<u32>,
    market_insights: Option<u32>,
    chat: Option<u32>,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        // Launch limits: one resume, two cover letters, two interview sets
        // and five chat turns per day. The market report is not gated.
        Self {
            resume: Some(1),
            cover_letter: Some(2),
            interview: Some(2),
            market_insights: None,
            chat: Some(5),
        }
    }
}

impl QuotaConfig {
    pub fn free_limit(&self, feature: FeatureKey) -> Option<u32> {
        match feature {
            FeatureKey::Resume => self.resume,
            FeatureKey::CoverLetter => self.cover_letter,
            FeatureKey::Interview => self.interview,
            FeatureKey::MarketInsights => self.market_insights,
            FeatureKey::Chat => self.chat,
        }
    }

    /// Overrides a single feature's limit; used to tune policies without
    /// touching the defaults everywhere else.
    pub fn with_limit(mut self, feature: FeatureKey, limit: Option<u32>) -> Self {
        match feature {
            FeatureKey::Resume => self.resume = limit,
            FeatureKey::CoverLetter => self.cover_letter = limit,
            FeatureKey::Interview => self.interview = limit,
            FeatureKey::MarketInsights => self.market_insights = limit,
            FeatureKey::Chat => self.chat = limit,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits_match_launch_policy() {
        let quotas = QuotaConfig::default();
        assert_eq!(quotas.free_limit(FeatureKey::Resume), Some(1));
        assert_eq!(quotas.free_limit(FeatureKey::CoverLetter), Some(2));
        assert_eq!(quotas.free_limit(FeatureKey::Interview), Some(2));
        assert_eq!(quotas.free_limit(FeatureKey::MarketInsights), None);
        assert_eq!(quotas.free_limit(FeatureKey::Chat), Some(5));
    }

    #[test]
    fn test_with_limit_overrides_one_feature() {
        let quotas = QuotaConfig::default().with_limit(FeatureKey::Resume, Some(10));
        assert_eq!(quotas.free_limit(FeatureKey::Resume), Some(10));
        assert_eq!(quotas.free_limit(FeatureKey::Chat), Some(5));
    }

    #[test]
    fn test_feature_key_parse_roundtrip() {
        for feature in [
            FeatureKey::Resume,
            FeatureKey::CoverLetter,
            FeatureKey::Interview,
            FeatureKey::MarketInsights,
            FeatureKey::Chat,
        ] {
            assert_eq!(feature.as_str().parse::<FeatureKey>().unwrap(), feature);
        }
    }

    #[test]
    fn test_unknown_feature_key_is_rejected() {
        assert!("pdf-export".parse::<FeatureKey>().is_err());
    }
}
