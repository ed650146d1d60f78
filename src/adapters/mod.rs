//! Provider adapter abstraction layer.
//!
//! Adapters own the wire-level protocol translation to each concrete AI
//! vendor; the orchestrator treats every vendor as a uniform capability
//! `invoke(secret, request) -> text`. Uses `Arc<dyn ProviderAdapter>` for
//! runtime polymorphism: new vendors implement the trait and register under
//! their provider code rather than adding branches anywhere.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::types::{Message, ResponseFormat};

/// Merged request handed to an adapter: call content plus resolved settings.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub messages: Vec<Message>,
    /// Model override or feature default; `None` lets the adapter pick its
    /// provider-native default.
    pub model: Option<String>,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub response_format: Option<ResponseFormat>,
    /// Free-form feature settings the adapter may interpret.
    pub extra: HashMap<String, Value>,
}

/// Classified adapter failure.
///
/// The classification is preserved for observability; the dispatcher treats
/// every class identically for health transitions today.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct InvocationError {
    pub kind: InvocationErrorKind,
    pub message: String,
}

impl InvocationError {
    pub fn new(kind: InvocationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::Timeout, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::Authentication, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::RateLimited, message)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::MalformedResponse, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(InvocationErrorKind::Unknown, message)
    }
}

/// Failure taxonomy for adapter invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationErrorKind {
    Timeout,
    Authentication,
    RateLimited,
    MalformedResponse,
    Unknown,
}

impl InvocationErrorKind {
    /// Stable class string used in tracing fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationErrorKind::Timeout => "timeout",
            InvocationErrorKind::Authentication => "authentication",
            InvocationErrorKind::RateLimited => "rate_limited",
            InvocationErrorKind::MalformedResponse => "malformed_response",
            InvocationErrorKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for InvocationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core trait for vendor-specific invocation.
///
/// Object-safe and dispatched via `Arc<dyn ProviderAdapter>`. The secret is
/// the decrypted plaintext for exactly one attempt; implementations must not
/// retain or log it.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider code this adapter serves (matches `Provider::code`).
    fn provider_code(&self) -> &str;

    async fn invoke(
        &self,
        secret: &str,
        request: &InvocationRequest,
    ) -> Result<String, InvocationError>;
}

/// Lookup table from provider code to invocation capability.
///
/// Populated once at startup; `resolve` is the only read path.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Register an adapter under its provider code. Re-registering a code
    /// replaces the previous adapter.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters
            .insert(adapter.provider_code().to_string(), adapter);
    }

    pub fn resolve(&self, provider_code: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(provider_code).cloned()
    }

    /// Registered provider codes, for startup diagnostics.
    pub fn codes(&self) -> Vec<&str> {
        self.adapters.keys().map(|s| s.as_str()).collect()
    }
}
