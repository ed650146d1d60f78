//! Candidate selection: cooldown filtering and deterministic ordering.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use super::{Credential, CredentialStatus, CredentialStore};
use crate::Result;

/// Minimum time a failing credential is excluded from selection before it is
/// retried. Cooldown lets a struggling key self-heal without an external
/// health-check process.
pub const COOLDOWN_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Returns the ordered, filtered credential list for one provider.
pub struct CredentialPool {
    store: Arc<dyn CredentialStore>,
    cooldown: Duration,
}

impl CredentialPool {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            cooldown: COOLDOWN_WINDOW,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Eligible credentials for `provider_id`, best candidate first.
    ///
    /// Empty means the provider is exhausted: everything is disabled or
    /// still cooling down.
    pub async fn select_candidates(&self, provider_id: &str) -> Result<Vec<Credential>> {
        self.select_candidates_at(provider_id, SystemTime::now())
            .await
    }

    pub(crate) async fn select_candidates_at(
        &self,
        provider_id: &str,
        now: SystemTime,
    ) -> Result<Vec<Credential>> {
        let mut candidates: Vec<Credential> = self
            .store
            .list_by_provider(provider_id)
            .await?
            .into_iter()
            .filter(|c| self.is_eligible(c, now))
            .collect();

        // Operator preference first, then least-recently-used for fair
        // rotation. Never-used credentials sort earliest.
        candidates.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.last_used_at.cmp(&b.last_used_at))
        });

        Ok(candidates)
    }

    fn is_eligible(&self, credential: &Credential, now: SystemTime) -> bool {
        match credential.status {
            CredentialStatus::Disabled => false,
            CredentialStatus::Healthy => true,
            CredentialStatus::Failing => match credential.last_error_at {
                None => true,
                Some(at) => now
                    .duration_since(at)
                    .map(|elapsed| elapsed >= self.cooldown)
                    .unwrap_or(false),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::MemoryCredentialStore;

    fn pool_with(credentials: Vec<Credential>) -> (CredentialPool, Arc<MemoryCredentialStore>) {
        let store = Arc::new(MemoryCredentialStore::new());
        for c in credentials {
            store.insert(c);
        }
        (CredentialPool::new(store.clone()), store)
    }

    #[tokio::test]
    async fn orders_by_priority() {
        let (pool, _) = pool_with(vec![
            Credential::new("c2", "prov-a", "r", 2),
            Credential::new("c0", "prov-a", "r", 0),
            Credential::new("c1", "prov-a", "r", 1),
        ]);
        let ids: Vec<String> = pool
            .select_candidates("prov-a")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, ["c0", "c1", "c2"]);
    }

    #[tokio::test]
    async fn equal_priority_breaks_ties_by_lru_with_never_used_first() {
        let now = SystemTime::now();
        let (pool, _) = pool_with(vec![
            Credential::new("recent", "prov-a", "r", 1).with_last_used_at(now),
            Credential::new("older", "prov-a", "r", 1)
                .with_last_used_at(now - Duration::from_secs(3600)),
            Credential::new("never", "prov-a", "r", 1),
        ]);
        let ids: Vec<String> = pool
            .select_candidates("prov-a")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, ["never", "older", "recent"]);
    }

    #[tokio::test]
    async fn disabled_credentials_are_never_selected() {
        let (pool, _) = pool_with(vec![
            Credential::new("dead", "prov-a", "r", 0).with_status(CredentialStatus::Disabled),
            Credential::new("alive", "prov-a", "r", 1),
        ]);
        let ids: Vec<String> = pool
            .select_candidates("prov-a")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, ["alive"]);
    }

    #[tokio::test]
    async fn failing_credential_in_cooldown_is_excluded() {
        let now = SystemTime::now();
        let (pool, _) = pool_with(vec![Credential::new("c1", "prov-a", "r", 0)
            .with_status(CredentialStatus::Failing)
            .with_last_error_at(now - Duration::from_secs(60))]);
        assert!(pool.select_candidates("prov-a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failing_credential_returns_after_cooldown() {
        let now = SystemTime::now();
        let (pool, _) = pool_with(vec![Credential::new("c1", "prov-a", "r", 0)
            .with_status(CredentialStatus::Failing)
            .with_last_error_at(now - Duration::from_secs(6 * 60))]);
        let candidates = pool.select_candidates("prov-a").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "c1");
    }

    #[tokio::test]
    async fn failing_without_error_timestamp_is_eligible() {
        let (pool, _) = pool_with(vec![
            Credential::new("c1", "prov-a", "r", 0).with_status(CredentialStatus::Failing)
        ]);
        assert_eq!(pool.select_candidates("prov-a").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn healthy_credential_ignores_cooldown() {
        // A healthy credential with a recent error timestamp (e.g. it
        // recovered) must stay eligible.
        let now = SystemTime::now();
        let (pool, _) = pool_with(vec![
            Credential::new("c1", "prov-a", "r", 0).with_last_error_at(now)
        ]);
        assert_eq!(pool.select_candidates("prov-a").await.unwrap().len(), 1);
    }
}
