//! Two-tier failover walkthrough with in-memory stores.
//!
//! Wires a feature with a flaky primary provider and a healthy secondary,
//! runs one call, and prints the outcome plus the resulting credential
//! health. Run with:
//!
//! ```bash
//! RUST_LOG=debug cargo run --example failover_demo
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use ai_orchestrator::{
    CallRequest, CallResult, Credential, FailoverOrchestrator, FeatureConfig,
    InvocationError, InvocationRequest, MemoryCredentialStore, MemoryFeatureConfigStore,
    MemorySecretStore, Provider, ProviderAdapter,
};

/// Toy adapter that rejects a configured secret and echoes for the rest.
struct DemoAdapter {
    code: &'static str,
    rejected_secret: Option<&'static str>,
}

#[async_trait]
impl ProviderAdapter for DemoAdapter {
    fn provider_code(&self) -> &str {
        self.code
    }

    async fn invoke(
        &self,
        secret: &str,
        request: &InvocationRequest,
    ) -> Result<String, InvocationError> {
        if self.rejected_secret == Some(secret) {
            return Err(InvocationError::rate_limited("quota exceeded"));
        }
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or("");
        Ok(format!("[{}] answer to: {prompt}", self.code))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .with_target(false)
        .try_init();

    let features = Arc::new(MemoryFeatureConfigStore::new());
    features.insert(
        FeatureConfig::new("DOUBT_CHAT")
            .with_primary("prov-openai")
            .with_secondary("prov-gemini"),
    );

    let credentials = Arc::new(MemoryCredentialStore::new());
    credentials.insert(Credential::new("openai-key-1", "prov-openai", "ref-o1", 0));
    credentials.insert(Credential::new("openai-key-2", "prov-openai", "ref-o2", 1));
    credentials.insert(Credential::new("gemini-key-1", "prov-gemini", "ref-g1", 0));

    let secrets = Arc::new(MemorySecretStore::new());
    secrets.insert("ref-o1", "sk-openai-1");
    secrets.insert("ref-o2", "sk-openai-2");
    secrets.insert("ref-g1", "sk-gemini-1");

    let orchestrator = FailoverOrchestrator::builder()
        .with_feature_store(features)
        .with_credential_store(credentials.clone())
        .with_secret_store(secrets)
        .with_provider(Provider::new("prov-openai", "OPENAI"))
        .with_provider(Provider::new("prov-gemini", "GEMINI"))
        .with_adapter(Arc::new(DemoAdapter {
            code: "OPENAI",
            // First key over quota: the call fails over to the second.
            rejected_secret: Some("sk-openai-1"),
        }))
        .with_adapter(Arc::new(DemoAdapter {
            code: "GEMINI",
            rejected_secret: None,
        }))
        .build()?;

    let result = orchestrator
        .execute(&CallRequest::new("DOUBT_CHAT").with_prompt("What is osmosis?"))
        .await?;

    println!("=== Call Outcome ===");
    match &result {
        CallResult::Success(s) => {
            println!("provider:   {}", s.provider);
            println!("credential: {}", s.credential_id);
            println!("attempts:   {}", s.stats.attempts);
            println!("content:    {}", s.content);
        }
        CallResult::Failure(f) => {
            println!("failed: {}", f.reason);
            for tier in &f.providers_tried {
                println!("  {} -> {}", tier.provider, tier.error);
            }
        }
    }

    println!("\n=== Credential Health ===");
    for id in ["openai-key-1", "openai-key-2", "gemini-key-1"] {
        if let Some(c) = credentials.get(id) {
            println!("{id}: {:?} (failures: {})", c.status, c.failure_count);
        }
    }

    Ok(())
}
