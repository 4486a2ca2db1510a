//! Usage Ledger — durable per-feature, per-day counters.
//!
//! Counts are monotonically non-decreasing within a day and are only ever
//! written by the orchestrator's post-success commit and the chat session's
//! on-acceptance spend. Absence reads as zero, never as an error. Old days
//! are left behind in the store; nothing reads them again.

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::quota::FeatureKey;
use crate::store::{KvStore, StoreError};

/// Composite ledger key. The storage rendering (`usage_<feature>_<date>`)
/// is produced here and nowhere else, so the format cannot drift between
/// components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsageKey {
    pub feature: FeatureKey,
    pub day: NaiveDate,
}

impl UsageKey {
    pub fn new(feature: FeatureKey, day: NaiveDate) -> Self {
        Self { feature, day }
    }

    /// Keyed to the caller's local calendar date: a request at 23:59 and
    /// one at 00:01 land on distinct records.
    pub fn today(feature: FeatureKey) -> Self {
        Self::new(feature, Local::now().date_naive())
    }

    pub fn storage_key(&self) -> String {
        format!("usage_{}_{}", self.feature.as_str(), self.day.format("%Y-%m-%d"))
    }
}

/// Read/write access to the usage counters.
#[derive(Clone)]
pub struct UsageLedger {
    store: Arc<dyn KvStore>,
}

impl UsageLedger {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Current count for `key`. Missing or unparseable records read as 0.
    pub async fn usage(&self, key: UsageKey) -> Result<u32, StoreError> {
        Ok(self
            .store
            .get(&key.storage_key())
            .await?
            .and_then(|value| value.parse().ok())
            .unwrap_or(0))
    }

    /// Read-modify-write increment; returns the new count. Two processes
    /// racing on the same store can both read the pre-increment count and
    /// under-count — a documented limitation of the single-actor model,
    /// not corrected here.
    pub async fn increment(&self, key: UsageKey) -> Result<u32, StoreError> {
        let next = self.usage(key).await? + 1;
        self.store.put(&key.storage_key(), &next.to_string()).await?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKvStore;

    fn ledger() -> UsageLedger {
        UsageLedger::new(Arc::new(MemoryKvStore::new()))
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_usage_is_zero_before_any_increment() {
        let ledger = ledger();
        let key = UsageKey::new(FeatureKey::Resume, day("2024-06-01"));
        assert_eq!(ledger.usage(key).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_n_increments_read_back_as_n() {
        let ledger = ledger();
        let key = UsageKey::new(FeatureKey::CoverLetter, day("2024-06-01"));
        for expected in 1..=4 {
            assert_eq!(ledger.increment(key).await.unwrap(), expected);
        }
        assert_eq!(ledger.usage(key).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_days_are_distinct_records() {
        let ledger = ledger();
        let monday = UsageKey::new(FeatureKey::Chat, day("2024-06-03"));
        let tuesday = UsageKey::new(FeatureKey::Chat, day("2024-06-04"));
        ledger.increment(monday).await.unwrap();
        assert_eq!(ledger.usage(monday).await.unwrap(), 1);
        assert_eq!(ledger.usage(tuesday).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_features_do_not_share_counters() {
        let ledger = ledger();
        let d = day("2024-06-01");
        ledger.increment(UsageKey::new(FeatureKey::Resume, d)).await.unwrap();
        assert_eq!(
            ledger.usage(UsageKey::new(FeatureKey::Interview, d)).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_garbage_record_reads_as_zero() {
        let store = Arc::new(MemoryKvStore::new());
        let ledger = UsageLedger::new(store.clone());
        let key = UsageKey::new(FeatureKey::Resume, day("2024-06-01"));
        store.put(&key.storage_key(), "not-a-number").await.unwrap();
        assert_eq!(ledger.usage(key).await.unwrap(), 0);
    }

    #[test]
    fn test_storage_key_rendering() {
        let key = UsageKey::new(FeatureKey::CoverLetter, day("2024-06-01"));
        assert_eq!(key.storage_key(), "usage_coverletter_2024-06-01");
    }
}
