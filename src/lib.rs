//! # ai-orchestrator
//!
//! AI provider orchestration with credential health management and
//! transparent two-tier failover.
//!
//! ## Overview
//!
//! Callers submit a logical feature request ("generate a study plan") as a
//! [`CallRequest`]. The orchestrator resolves the feature to its configured
//! primary/secondary providers, selects a healthy credential from each
//! provider's bounded pool, dispatches the call through the registered
//! [`adapters::ProviderAdapter`], and on failure fails over across
//! credentials and then across providers — tracking per-credential health so
//! struggling keys are cooled down and retried later.
//!
//! ## Key pieces
//!
//! - **Unified entry point**: [`FailoverOrchestrator::execute`] returns a
//!   [`CallResult`] attributing success to the serving provider/credential
//! - **Credential health**: failure counters and a 5-minute cooldown window,
//!   self-correcting without an external health-check process
//! - **Deterministic selection**: priority order with least-recently-used
//!   tie-break inside each pool
//! - **Pluggable seams**: feature config, credential persistence and secret
//!   decryption live behind async traits; in-memory implementations ship
//!   for tests and small deployments
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ai_orchestrator::{
//!     CallRequest, Credential, FailoverOrchestrator, FeatureConfig,
//!     MemoryCredentialStore, MemoryFeatureConfigStore, MemorySecretStore, Provider,
//! };
//!
//! # async fn run(adapter: Arc<dyn ai_orchestrator::ProviderAdapter>) -> ai_orchestrator::Result<()> {
//! let features = Arc::new(MemoryFeatureConfigStore::new());
//! features.insert(FeatureConfig::new("STUDY_PLAN").with_primary("prov-openai"));
//!
//! let credentials = Arc::new(MemoryCredentialStore::new());
//! credentials.insert(Credential::new("key-1", "prov-openai", "secret-ref-1", 0));
//!
//! let secrets = Arc::new(MemorySecretStore::new());
//! secrets.insert("secret-ref-1", "sk-...");
//!
//! let orchestrator = FailoverOrchestrator::builder()
//!     .with_feature_store(features)
//!     .with_credential_store(credentials)
//!     .with_secret_store(secrets)
//!     .with_provider(Provider::new("prov-openai", "OPENAI"))
//!     .with_adapter(adapter)
//!     .build()?;
//!
//! let result = orchestrator
//!     .execute(&CallRequest::new("STUDY_PLAN").with_prompt("Plan my week"))
//!     .await?;
//! # let _ = result;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`orchestrator`] | Public entry point and builder |
//! | [`dispatch`] | Per-provider credential iteration and health writes |
//! | [`credentials`] | Credential model, health state machine, pool selection |
//! | [`adapters`] | Provider adapter trait and registry |
//! | [`config`] | Feature configuration and settings merge |
//! | [`secrets`] | Secret decryption seam |
//! | [`types`] | Core type definitions (messages, requests, results) |

pub mod adapters;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod orchestrator;
pub mod secrets;
pub mod types;

pub mod error;

pub use adapters::{
    AdapterRegistry, InvocationError, InvocationErrorKind, InvocationRequest, ProviderAdapter,
};
pub use config::{
    FeatureConfig, FeatureConfigStore, FeatureSettings, MemoryFeatureConfigStore,
    ResolvedSettings, DEFAULT_TEMPERATURE,
};
pub use credentials::{
    Credential, CredentialPool, CredentialStatus, CredentialStore, HealthPatch,
    MemoryCredentialStore, COOLDOWN_WINDOW,
};
pub use dispatch::{CallDispatcher, DispatchError, DispatchSuccess, DEFAULT_INVOKE_TIMEOUT};
pub use error::{Error, FailureReason};
pub use orchestrator::{FailoverOrchestrator, OrchestratorBuilder};
pub use secrets::{MemorySecretStore, SecretStore};
pub use types::{
    CallFailure, CallRequest, CallResult, CallStats, CallSuccess, Message, MessageRole, Provider,
    ProviderFailure, ProviderStatus, ResponseFormat,
};

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, Error>;
