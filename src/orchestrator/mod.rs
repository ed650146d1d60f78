//! Failover orchestrator: the public entry point.
//!
//! `execute` resolves a feature to its provider preferences, merges call
//! settings, then walks the primary and secondary tiers through the
//! [`CallDispatcher`]. Every failure path is terminal for the call; retries,
//! sleeps and backoff belong to callers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adapters::{AdapterRegistry, InvocationRequest, ProviderAdapter};
use crate::config::{FeatureConfigStore, ResolvedSettings};
use crate::credentials::CredentialStore;
use crate::dispatch::{CallDispatcher, DispatchError, DEFAULT_INVOKE_TIMEOUT};
use crate::error::FailureReason;
use crate::secrets::SecretStore;
use crate::types::{
    CallFailure, CallRequest, CallResult, CallStats, CallSuccess, Provider, ProviderFailure,
};
use crate::{Error, Result};

/// Top-level orchestrator over feature config, provider directory and
/// credential pools.
pub struct FailoverOrchestrator {
    features: Arc<dyn FeatureConfigStore>,
    /// Provider directory keyed by provider id, registered at startup.
    providers: HashMap<String, Provider>,
    dispatcher: CallDispatcher,
}

impl FailoverOrchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::new()
    }

    /// Execute one logical call with two-tier failover.
    ///
    /// Business failures (unconfigured feature, exhausted pools, all
    /// providers down) come back as [`CallResult::Failure`]; `Err` is
    /// reserved for store infrastructure faults.
    pub async fn execute(&self, request: &CallRequest) -> Result<CallResult> {
        let request_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let Some(feature) = self.features.get(&request.feature_code).await? else {
            warn!(
                request_id,
                feature = request.feature_code.as_str(),
                "feature not configured"
            );
            return Ok(CallResult::Failure(CallFailure {
                reason: FailureReason::FeatureNotConfigured,
                providers_tried: Vec::new(),
                stats: stats(&request_id, 0, start),
            }));
        };

        let resolved = ResolvedSettings::merge(request, &feature.settings);
        let invocation = InvocationRequest {
            messages: request.effective_messages(),
            model: resolved.model,
            temperature: resolved.temperature,
            max_tokens: resolved.max_tokens,
            response_format: request.response_format,
            extra: feature.settings.extra.clone(),
        };

        let tiers = [
            feature.primary_provider_id.as_deref(),
            feature.secondary_provider_id.as_deref(),
        ];

        let mut providers_tried: Vec<ProviderFailure> = Vec::new();
        let mut attempts = 0u32;
        let mut all_pools_empty = true;

        for provider_id in tiers.into_iter().flatten() {
            let Some(provider) = self.providers.get(provider_id) else {
                warn!(request_id, provider_id, "provider not registered");
                providers_tried.push(ProviderFailure {
                    provider: provider_id.to_string(),
                    error: "provider not registered".to_string(),
                });
                all_pools_empty = false;
                continue;
            };

            if !provider.is_active() {
                warn!(
                    request_id,
                    provider = provider.code.as_str(),
                    "provider inactive, skipping tier"
                );
                providers_tried.push(ProviderFailure {
                    provider: provider.code.clone(),
                    error: "provider inactive".to_string(),
                });
                all_pools_empty = false;
                continue;
            }

            match self
                .dispatcher
                .try_provider(provider, &invocation, &request_id)
                .await
            {
                Ok(success) => {
                    attempts += success.attempts;
                    info!(
                        request_id,
                        feature = request.feature_code.as_str(),
                        provider = success.provider.as_str(),
                        credential_id = success.credential_id.as_str(),
                        attempts,
                        duration_ms = start.elapsed().as_millis() as u64,
                        "call succeeded"
                    );
                    return Ok(CallResult::Success(CallSuccess {
                        content: success.content,
                        provider: success.provider,
                        credential_id: success.credential_id,
                        stats: stats(&request_id, attempts, start),
                    }));
                }
                Err(DispatchError::Store(e)) => return Err(e),
                Err(err) => {
                    attempts += err.attempts();
                    if !matches!(err, DispatchError::NoEligibleCredentials) {
                        all_pools_empty = false;
                    }
                    providers_tried.push(ProviderFailure {
                        provider: provider.code.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        // Pool exhaustion on every consulted tier is surfaced distinctly so
        // callers can tell "temporarily degraded" from "down".
        let reason = if !providers_tried.is_empty() && all_pools_empty {
            FailureReason::NoEligibleCredentials
        } else {
            FailureReason::AllProvidersFailed
        };

        warn!(
            request_id,
            feature = request.feature_code.as_str(),
            reason = %reason,
            tiers = providers_tried.len(),
            attempts,
            duration_ms = start.elapsed().as_millis() as u64,
            "call failed"
        );

        Ok(CallResult::Failure(CallFailure {
            reason,
            providers_tried,
            stats: stats(&request_id, attempts, start),
        }))
    }
}

fn stats(request_id: &str, attempts: u32, start: Instant) -> CallStats {
    CallStats {
        request_id: request_id.to_string(),
        attempts,
        duration_ms: start.elapsed().as_millis(),
    }
}

/// Wires stores, providers and adapters into a [`FailoverOrchestrator`].
pub struct OrchestratorBuilder {
    features: Option<Arc<dyn FeatureConfigStore>>,
    credentials: Option<Arc<dyn CredentialStore>>,
    secrets: Option<Arc<dyn SecretStore>>,
    registry: AdapterRegistry,
    providers: Vec<Provider>,
    invoke_timeout: Duration,
    cooldown: Option<Duration>,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            features: None,
            credentials: None,
            secrets: None,
            registry: AdapterRegistry::new(),
            providers: Vec::new(),
            invoke_timeout: DEFAULT_INVOKE_TIMEOUT,
            cooldown: None,
        }
    }

    pub fn with_feature_store(mut self, store: Arc<dyn FeatureConfigStore>) -> Self {
        self.features = Some(store);
        self
    }

    pub fn with_credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    pub fn with_secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.secrets = Some(store);
        self
    }

    /// Register an adapter under its provider code.
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.registry.register(adapter);
        self
    }

    /// Register a provider in the directory. Last registration of an id wins.
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.providers.push(provider);
        self
    }

    /// Per-attempt adapter invocation timeout (default 30s).
    pub fn with_invoke_timeout(mut self, timeout: Duration) -> Self {
        self.invoke_timeout = timeout;
        self
    }

    /// Failing-credential cooldown window (default 5 minutes).
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn build(self) -> Result<FailoverOrchestrator> {
        let features = self
            .features
            .ok_or_else(|| Error::configuration("feature config store is required"))?;
        let credentials = self
            .credentials
            .ok_or_else(|| Error::configuration("credential store is required"))?;
        let secrets = self
            .secrets
            .ok_or_else(|| Error::configuration("secret store is required"))?;

        debug!(
            adapters = ?self.registry.codes(),
            providers = self.providers.len(),
            "orchestrator configured"
        );

        let mut dispatcher = CallDispatcher::new(credentials, secrets, Arc::new(self.registry))
            .with_invoke_timeout(self.invoke_timeout);
        if let Some(cooldown) = self.cooldown {
            dispatcher = dispatcher.with_cooldown(cooldown);
        }

        let providers = self
            .providers
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(FailoverOrchestrator {
            features,
            providers,
            dispatcher,
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
