//! Credential model, health tracking and candidate selection.
//!
//! A credential is one API key belonging to a provider and is the unit of
//! failover. Pools are intentionally small (tens, not thousands), so linear
//! scans and coarse locking are acceptable.

pub mod health;
pub mod pool;

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::SystemTime;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

pub use health::HealthPatch;
pub use pool::{CredentialPool, COOLDOWN_WINDOW};

/// One provider API key.
///
/// `secret_ref` is an opaque handle resolved through
/// [`crate::secrets::SecretStore`] at call time; the plaintext never lives on
/// this struct and is never logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    pub provider_id: String,
    pub secret_ref: String,
    /// Lower is preferred.
    pub priority: u8,
    pub status: CredentialStatus,
    pub failure_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<SystemTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error_at: Option<SystemTime>,
}

impl Credential {
    /// Create a healthy credential with no usage history.
    pub fn new(
        id: impl Into<String>,
        provider_id: impl Into<String>,
        secret_ref: impl Into<String>,
        priority: u8,
    ) -> Self {
        Self {
            id: id.into(),
            provider_id: provider_id.into(),
            secret_ref: secret_ref.into(),
            priority,
            status: CredentialStatus::Healthy,
            failure_count: 0,
            last_used_at: None,
            last_error_at: None,
        }
    }

    pub fn with_status(mut self, status: CredentialStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_last_used_at(mut self, at: SystemTime) -> Self {
        self.last_used_at = Some(at);
        self
    }

    pub fn with_last_error_at(mut self, at: SystemTime) -> Self {
        self.last_error_at = Some(at);
        self
    }
}

/// Credential health state.
///
/// `Disabled` is an administrative override that removes the credential from
/// candidacy entirely; invocation outcomes never enter or exit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    Healthy,
    Failing,
    Disabled,
}

/// External credential persistence.
///
/// Health writes must be idempotent-safe under concurrent writers:
/// last-writer-wins is acceptable because health state is approximate and
/// self-correcting.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Credential>>;
    async fn update_health(&self, credential_id: &str, patch: HealthPatch) -> Result<()>;
}

/// In-memory credential store with last-writer-wins health patches.
pub struct MemoryCredentialStore {
    credentials: RwLock<HashMap<String, Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            credentials: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, credential: Credential) {
        self.credentials
            .write()
            .unwrap()
            .insert(credential.id.clone(), credential);
    }

    /// Current state of one credential. Mainly useful in tests and
    /// operator tooling.
    pub fn get(&self, credential_id: &str) -> Option<Credential> {
        self.credentials.read().unwrap().get(credential_id).cloned()
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Credential>> {
        Ok(self
            .credentials
            .read()
            .unwrap()
            .values()
            .filter(|c| c.provider_id == provider_id)
            .cloned()
            .collect())
    }

    async fn update_health(&self, credential_id: &str, patch: HealthPatch) -> Result<()> {
        let mut credentials = self.credentials.write().unwrap();
        if let Some(c) = credentials.get_mut(credential_id) {
            c.status = patch.status;
            c.failure_count = patch.failure_count;
            if let Some(at) = patch.last_used_at {
                c.last_used_at = Some(at);
            }
            if let Some(at) = patch.last_error_at {
                c.last_error_at = Some(at);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_by_provider_filters() {
        let store = MemoryCredentialStore::new();
        store.insert(Credential::new("c1", "prov-a", "ref-1", 0));
        store.insert(Credential::new("c2", "prov-a", "ref-2", 1));
        store.insert(Credential::new("c3", "prov-b", "ref-3", 0));

        let creds = store.list_by_provider("prov-a").await.unwrap();
        assert_eq!(creds.len(), 2);
        assert!(creds.iter().all(|c| c.provider_id == "prov-a"));
    }

    #[tokio::test]
    async fn update_health_applies_patch() {
        let store = MemoryCredentialStore::new();
        store.insert(Credential::new("c1", "prov-a", "ref-1", 0));

        let now = SystemTime::now();
        store
            .update_health(
                "c1",
                HealthPatch {
                    status: CredentialStatus::Failing,
                    failure_count: 3,
                    last_used_at: None,
                    last_error_at: Some(now),
                },
            )
            .await
            .unwrap();

        let c = store.get("c1").unwrap();
        assert_eq!(c.status, CredentialStatus::Failing);
        assert_eq!(c.failure_count, 3);
        assert_eq!(c.last_error_at, Some(now));
        // Untouched field stays untouched.
        assert!(c.last_used_at.is_none());
    }

    #[tokio::test]
    async fn update_health_unknown_id_is_noop() {
        let store = MemoryCredentialStore::new();
        let patch = HealthPatch {
            status: CredentialStatus::Healthy,
            failure_count: 0,
            last_used_at: None,
            last_error_at: None,
        };
        assert!(store.update_health("ghost", patch).await.is_ok());
    }
}
