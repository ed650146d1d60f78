//! Feature configuration lookup and settings resolution.
//!
//! A feature is a logical AI capability (study-plan generation, doubt
//! answering) mapped to provider preferences and default call settings.
//! Configurations are administered externally and read-only here.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::CallRequest;
use crate::Result;

/// Library default when neither the call nor the feature sets a temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Provider preferences and default settings for one feature code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub feature_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_provider_id: Option<String>,
    #[serde(default)]
    pub settings: FeatureSettings,
}

impl FeatureConfig {
    pub fn new(feature_code: impl Into<String>) -> Self {
        Self {
            feature_code: feature_code.into(),
            primary_provider_id: None,
            secondary_provider_id: None,
            settings: FeatureSettings::default(),
        }
    }

    pub fn with_primary(mut self, provider_id: impl Into<String>) -> Self {
        self.primary_provider_id = Some(provider_id.into());
        self
    }

    pub fn with_secondary(mut self, provider_id: impl Into<String>) -> Self {
        self.secondary_provider_id = Some(provider_id.into());
        self
    }

    pub fn with_settings(mut self, settings: FeatureSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Default model/temperature/token settings for a feature.
///
/// Administrators may attach extra free-form keys; they are preserved but
/// not interpreted by the orchestrator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl FeatureSettings {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Call settings after merging: per-call overrides beat feature defaults,
/// which beat library defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub model: Option<String>,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
}

impl ResolvedSettings {
    pub fn merge(request: &CallRequest, defaults: &FeatureSettings) -> Self {
        Self {
            model: request.model.clone().or_else(|| defaults.model.clone()),
            temperature: request
                .temperature
                .or(defaults.temperature)
                .unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: request.max_tokens.or(defaults.max_tokens),
        }
    }
}

/// External feature configuration lookup, keyed by feature code.
#[async_trait]
pub trait FeatureConfigStore: Send + Sync {
    async fn get(&self, feature_code: &str) -> Result<Option<FeatureConfig>>;
}

/// In-memory feature configuration store.
///
/// Default wiring for tests and single-node deployments; production callers
/// typically back this trait with their datastore.
pub struct MemoryFeatureConfigStore {
    configs: RwLock<HashMap<String, FeatureConfig>>,
}

impl MemoryFeatureConfigStore {
    pub fn new() -> Self {
        Self {
            configs: RwLock::new(HashMap::new()),
        }
    }

    pub fn insert(&self, config: FeatureConfig) {
        self.configs
            .write()
            .unwrap()
            .insert(config.feature_code.clone(), config);
    }
}

impl Default for MemoryFeatureConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureConfigStore for MemoryFeatureConfigStore {
    async fn get(&self, feature_code: &str) -> Result<Option<FeatureConfig>> {
        Ok(self.configs.read().unwrap().get(feature_code).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_call_overrides_win() {
        let defaults = FeatureSettings::default()
            .with_model("gpt-4o-mini")
            .with_temperature(0.2)
            .with_max_tokens(512);
        let request = CallRequest::new("STUDY_PLAN")
            .with_model("gpt-4o")
            .with_temperature(0.9);

        let resolved = ResolvedSettings::merge(&request, &defaults);
        assert_eq!(resolved.model.as_deref(), Some("gpt-4o"));
        assert_eq!(resolved.temperature, 0.9);
        // Not set on the call: feature default applies.
        assert_eq!(resolved.max_tokens, Some(512));
    }

    #[test]
    fn merge_falls_back_to_library_default_temperature() {
        let resolved = ResolvedSettings::merge(
            &CallRequest::new("STUDY_PLAN"),
            &FeatureSettings::default(),
        );
        assert_eq!(resolved.temperature, DEFAULT_TEMPERATURE);
        assert!(resolved.model.is_none());
        assert!(resolved.max_tokens.is_none());
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryFeatureConfigStore::new();
        store.insert(FeatureConfig::new("DOUBT_CHAT").with_primary("prov-openai"));

        let found = store.get("DOUBT_CHAT").await.unwrap();
        assert_eq!(
            found.unwrap().primary_provider_id.as_deref(),
            Some("prov-openai")
        );
        assert!(store.get("MISSING").await.unwrap().is_none());
    }
}
