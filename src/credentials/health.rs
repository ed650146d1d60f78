//! Credential health state machine.
//!
//! Transitions are computed from a credential snapshot and applied to the
//! store as a patch. Counter increments and timestamp overwrites are safe
//! under concurrent writers: a stale read costs one wasted attempt, never
//! corruption.

use std::time::SystemTime;

use super::{Credential, CredentialStatus};

/// Health fields written back after an invocation attempt.
///
/// `status` and `failure_count` always overwrite; the timestamps only
/// overwrite when `Some`, so a success patch leaves `last_error_at` intact
/// and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthPatch {
    pub status: CredentialStatus,
    pub failure_count: u32,
    pub last_used_at: Option<SystemTime>,
    pub last_error_at: Option<SystemTime>,
}

/// Transition after a successful invocation: back to healthy, counter reset.
///
/// Takes the credential for signature symmetry with [`on_failure`]; the
/// patch does not depend on prior state.
pub fn on_success(_credential: &Credential, now: SystemTime) -> HealthPatch {
    HealthPatch {
        status: CredentialStatus::Healthy,
        failure_count: 0,
        last_used_at: Some(now),
        last_error_at: None,
    }
}

/// Transition after a failed invocation: toward failing, counter bumped.
///
/// A failing credential stays failing; `Disabled` is operator-only and is
/// never assigned here (the pool excludes disabled credentials before any
/// attempt is made).
pub fn on_failure(credential: &Credential, now: SystemTime) -> HealthPatch {
    HealthPatch {
        status: CredentialStatus::Failing,
        failure_count: credential.failure_count.saturating_add(1),
        last_used_at: None,
        last_error_at: Some(now),
    }
}
