//! Secret resolution seam.
//!
//! Credentials carry opaque `secret_ref` handles; storage and encryption
//! live behind this trait. The orchestrator only sees plaintext for the
//! duration of a single invocation attempt and never logs it.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{Error, Result};

#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn decrypt(&self, secret_ref: &str) -> Result<String>;
}

/// In-memory secret map for tests and local deployments.
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, secret_ref: impl Into<String>, plaintext: impl Into<String>) {
        self.secrets
            .write()
            .unwrap()
            .insert(secret_ref.into(), plaintext.into());
    }
}

impl Default for MemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn decrypt(&self, secret_ref: &str) -> Result<String> {
        self.secrets
            .read()
            .unwrap()
            .get(secret_ref)
            .cloned()
            .ok_or_else(|| Error::store(format!("unknown secret ref: {secret_ref}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn decrypt_known_ref() {
        let store = MemorySecretStore::new();
        store.insert("ref-1", "sk-plaintext");
        assert_eq!(store.decrypt("ref-1").await.unwrap(), "sk-plaintext");
    }

    #[tokio::test]
    async fn decrypt_unknown_ref_errors() {
        let store = MemorySecretStore::new();
        assert!(store.decrypt("missing").await.is_err());
    }
}
