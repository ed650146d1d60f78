use thiserror::Error;

/// Unified error type for the orchestrator runtime.
///
/// This covers infrastructure-level failures (store backends, serialization).
/// Business outcomes — which provider or credential failed and why — are part
/// of [`crate::CallResult`], not this type: a failed call is a normal result,
/// not an error.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration {
            message: msg.into(),
        }
    }

    /// Create a new store backend error.
    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store {
            message: msg.into(),
        }
    }
}

/// Terminal classification of a failed call, surfaced to callers.
///
/// Rendered as short human-readable reasons, never stack traces. Callers use
/// this to distinguish "misconfigured" from "temporarily degraded".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// No feature configuration exists for the requested feature code.
    FeatureNotConfigured,
    /// Every configured provider tier had an empty candidate pool
    /// (cooldown or operator disablement); no invocation was attempted.
    NoEligibleCredentials,
    /// Every configured provider tier was tried and failed.
    AllProvidersFailed,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureReason::FeatureNotConfigured => "feature not configured",
            FailureReason::NoEligibleCredentials => "no eligible credentials",
            FailureReason::AllProvidersFailed => "all providers failed",
        };
        f.write_str(s)
    }
}
