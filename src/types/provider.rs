//! Upstream provider identity.

use serde::{Deserialize, Serialize};

/// An upstream AI vendor.
///
/// `code` is the stable identifier used to resolve an adapter in the
/// [`crate::adapters::AdapterRegistry`]; `id` is the datastore key that
/// credentials reference. An `Inactive` provider is never dispatched, even
/// when a feature configuration still points at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub code: String,
    pub status: ProviderStatus,
}

impl Provider {
    /// Create an active provider.
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            status: ProviderStatus::Active,
        }
    }

    pub fn with_status(mut self, status: ProviderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, ProviderStatus::Active)
    }
}

/// Administrative provider status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Active,
    Inactive,
}
