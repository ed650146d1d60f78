//! Per-call outcome and accounting types.

use serde::{Deserialize, Serialize};

use crate::error::FailureReason;

/// Outcome of one [`crate::FailoverOrchestrator::execute`] call.
#[derive(Debug, Clone)]
pub enum CallResult {
    Success(CallSuccess),
    Failure(CallFailure),
}

impl CallResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CallResult::Success(_))
    }

    /// Human-readable failure reason, `None` on success.
    pub fn error(&self) -> Option<String> {
        match self {
            CallResult::Success(_) => None,
            CallResult::Failure(f) => Some(f.reason.to_string()),
        }
    }

    /// Response text, `None` on failure.
    pub fn content(&self) -> Option<&str> {
        match self {
            CallResult::Success(s) => Some(&s.content),
            CallResult::Failure(_) => None,
        }
    }
}

/// Successful call: response text plus which provider/credential served it.
#[derive(Debug, Clone)]
pub struct CallSuccess {
    pub content: String,
    /// Provider code that produced the response.
    pub provider: String,
    pub credential_id: String,
    pub stats: CallStats,
}

/// Failed call: terminal classification plus the per-tier breakdown.
#[derive(Debug, Clone)]
pub struct CallFailure {
    pub reason: FailureReason,
    /// One entry per provider tier that was consulted, in order.
    pub providers_tried: Vec<ProviderFailure>,
    pub stats: CallStats,
}

/// What went wrong at one provider tier.
#[derive(Debug, Clone)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: String,
}

/// Per-call accounting, attached to every outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallStats {
    /// Client-generated request id, also present in tracing fields.
    pub request_id: String,
    /// Credential invocation attempts across all tiers.
    pub attempts: u32,
    pub duration_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_exposes_reason_string() {
        let result = CallResult::Failure(CallFailure {
            reason: FailureReason::AllProvidersFailed,
            providers_tried: vec![],
            stats: CallStats::default(),
        });
        assert!(!result.is_success());
        assert_eq!(result.error().as_deref(), Some("all providers failed"));
        assert!(result.content().is_none());
    }
}
