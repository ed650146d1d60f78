//! Call dispatcher: single-provider invocation with credential failover.
//!
//! One dispatch walks the provider's eligible credentials in pool order and
//! gives each exactly one attempt. Every attempt outcome is written back as
//! a health transition; no invocation error aborts the loop.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::adapters::{AdapterRegistry, InvocationError, InvocationRequest};
use crate::credentials::{health, Credential, CredentialPool, CredentialStore};
use crate::secrets::SecretStore;
use crate::types::Provider;

/// Default per-attempt invocation timeout.
pub const DEFAULT_INVOKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Successful dispatch: the response plus attribution and attempt count.
#[derive(Debug, Clone)]
pub struct DispatchSuccess {
    pub provider: String,
    pub credential_id: String,
    pub content: String,
    /// Credentials tried within this dispatch, including the winner.
    pub attempts: u32,
}

/// Why a provider tier produced no response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The pool came back empty: everything disabled or cooling down.
    #[error("no eligible credentials")]
    NoEligibleCredentials,

    /// No adapter registered for the provider's code.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Every candidate was tried once and failed.
    #[error("all credentials failed for provider {provider}")]
    AllCredentialsFailed { provider: String, attempts: u32 },

    /// Credential store read failed; infrastructure, not a call outcome.
    #[error(transparent)]
    Store(#[from] crate::Error),
}

impl DispatchError {
    /// Attempts consumed by this tier before it gave up.
    pub fn attempts(&self) -> u32 {
        match self {
            DispatchError::AllCredentialsFailed { attempts, .. } => *attempts,
            _ => 0,
        }
    }
}

/// Attempts invocation against one provider's credential pool.
pub struct CallDispatcher {
    pool: CredentialPool,
    registry: Arc<AdapterRegistry>,
    credentials: Arc<dyn CredentialStore>,
    secrets: Arc<dyn SecretStore>,
    invoke_timeout: Duration,
}

impl CallDispatcher {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        secrets: Arc<dyn SecretStore>,
        registry: Arc<AdapterRegistry>,
    ) -> Self {
        Self {
            pool: CredentialPool::new(credentials.clone()),
            registry,
            credentials,
            secrets,
            invoke_timeout: DEFAULT_INVOKE_TIMEOUT,
        }
    }

    pub fn with_invoke_timeout(mut self, timeout: Duration) -> Self {
        self.invoke_timeout = timeout;
        self
    }

    /// Override the failing-credential cooldown window (default 5 minutes).
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.pool = self.pool.with_cooldown(cooldown);
        self
    }

    /// Try every eligible credential of `provider` once, in pool order.
    pub async fn try_provider(
        &self,
        provider: &Provider,
        request: &InvocationRequest,
        request_id: &str,
    ) -> Result<DispatchSuccess, DispatchError> {
        let candidates = self.pool.select_candidates(&provider.id).await?;
        if candidates.is_empty() {
            debug!(
                request_id,
                provider = provider.code.as_str(),
                "credential pool exhausted"
            );
            return Err(DispatchError::NoEligibleCredentials);
        }

        let adapter = self
            .registry
            .resolve(&provider.code)
            .ok_or_else(|| DispatchError::UnknownProvider(provider.code.clone()))?;

        let mut attempts = 0u32;
        for candidate in &candidates {
            attempts += 1;
            let start = Instant::now();

            match self.attempt(adapter.as_ref(), candidate, request).await {
                Ok(content) => {
                    self.record_health(candidate, health::on_success(candidate, SystemTime::now()))
                        .await;
                    info!(
                        request_id,
                        provider = provider.code.as_str(),
                        credential_id = candidate.id.as_str(),
                        attempt = attempts,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "invocation succeeded"
                    );
                    return Ok(DispatchSuccess {
                        provider: provider.code.clone(),
                        credential_id: candidate.id.clone(),
                        content,
                        attempts,
                    });
                }
                Err(err) => {
                    self.record_health(candidate, health::on_failure(candidate, SystemTime::now()))
                        .await;
                    warn!(
                        request_id,
                        provider = provider.code.as_str(),
                        credential_id = candidate.id.as_str(),
                        attempt = attempts,
                        error_class = err.kind.as_str(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "invocation failed, trying next credential"
                    );
                }
            }
        }

        Err(DispatchError::AllCredentialsFailed {
            provider: provider.code.clone(),
            attempts,
        })
    }

    /// One invocation attempt: decrypt, invoke under timeout.
    ///
    /// Secret decryption failures count against the credential like any
    /// other invocation error; the plaintext itself never reaches a log.
    async fn attempt(
        &self,
        adapter: &dyn crate::adapters::ProviderAdapter,
        candidate: &Credential,
        request: &InvocationRequest,
    ) -> Result<String, InvocationError> {
        let secret = self
            .secrets
            .decrypt(&candidate.secret_ref)
            .await
            .map_err(|e| InvocationError::unknown(format!("secret decryption failed: {e}")))?;

        match tokio::time::timeout(self.invoke_timeout, adapter.invoke(&secret, request)).await {
            Ok(result) => result,
            Err(_) => Err(InvocationError::timeout(format!(
                "invocation exceeded {}ms",
                self.invoke_timeout.as_millis()
            ))),
        }
    }

    /// Health writes are best-effort: a failed write costs accuracy, not the
    /// call. Last-writer-wins at the store keeps concurrent patches safe.
    async fn record_health(&self, candidate: &Credential, patch: health::HealthPatch) {
        if let Err(e) = self.credentials.update_health(&candidate.id, patch).await {
            warn!(
                credential_id = candidate.id.as_str(),
                error = %e,
                "failed to record credential health"
            );
        }
    }
}
