//! Entitlement State — the premium/free flag and its transition rules.
//!
//! A single persisted flag per deployment, default free. The only writer is
//! the payment flow's confirmation step; the login collaborator restores it
//! by reading the same key at startup. There is deliberately no revoke
//! operation: subscription lapse is a billing-system event this core never
//! observes.

use std::sync::Arc;

use tracing::info;

use crate::store::{KvStore, StoreError};

const PREMIUM_KEY: &str = "premium_status";

#[derive(Clone)]
pub struct Entitlement {
    store: Arc<dyn KvStore>,
}

impl Entitlement {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Current premium flag; a missing record means free.
    pub async fn is_premium(&self) -> Result<bool, StoreError> {
        Ok(matches!(
            self.store.get(PREMIUM_KEY).await?.as_deref(),
            Some("true")
        ))
    }

    /// Flips the account to premium and persists immediately. Idempotent:
    /// granting an already-premium account is a no-op.
    pub async fn grant_premium(&self) -> Result<(), StoreError> {
        if self.is_premium().await? {
            return Ok(());
        }
        self.store.put(PREMIUM_KEY, "true").await?;
        info!("premium entitlement granted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKvStore;

    fn entitlement() -> Entitlement {
        Entitlement::new(Arc::new(MemoryKvStore::new()))
    }

    #[tokio::test]
    async fn test_defaults_to_free() {
        assert!(!entitlement().is_premium().await.unwrap());
    }

    #[tokio::test]
    async fn test_grant_sets_premium() {
        let entitlement = entitlement();
        entitlement.grant_premium().await.unwrap();
        assert!(entitlement.is_premium().await.unwrap());
    }

    #[tokio::test]
    async fn test_grant_is_idempotent() {
        let entitlement = entitlement();
        entitlement.grant_premium().await.unwrap();
        entitlement.grant_premium().await.unwrap();
        assert!(entitlement.is_premium().await.unwrap());
    }

    #[tokio::test]
    async fn test_unexpected_stored_value_reads_as_free() {
        let store = Arc::new(MemoryKvStore::new());
        store.put(PREMIUM_KEY, "yes please").await.unwrap();
        let entitlement = Entitlement::new(store);
        assert!(!entitlement.is_premium().await.unwrap());
    }
}
