use crate::agent::{AgentLifecycle, FoundryClientFactory};
use crate::azure::{AzCliCredential, CredentialProvider, StaticCredential};
use crate::config::Config;
use crate::error::{FoundryError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Pre-issued token from `FOUNDRY_ACCESS_TOKEN`, else one fetched through the Azure CLI
pub fn credential(config: &Config) -> Arc<dyn CredentialProvider> {
    match std::env::var("FOUNDRY_ACCESS_TOKEN") {
        Ok(token) if !token.trim().is_empty() => {
            tracing::debug!("using access token from FOUNDRY_ACCESS_TOKEN");
            Arc::new(StaticCredential::new(token.trim()))
        }
        _ => Arc::new(AzCliCredential::new(
            config.azure.cli.clone(),
            config.azure.token_resource.clone(),
        )),
    }
}

/// Lifecycle client bound to one project endpoint
pub fn lifecycle(config: &Config, endpoint: &str) -> AgentLifecycle {
    let factory = FoundryClientFactory::new(
        endpoint,
        config.azure.api_version.clone(),
        credential(config),
    );
    AgentLifecycle::new(Box::new(factory), config.agent.max_name_attempts)
}

/// Endpoint from a flag or `AZURE_AI_PROJECT_ENDPOINT`
pub fn require_endpoint(endpoint: Option<&str>) -> Result<String> {
    endpoint
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            FoundryError::InvalidConfig(
                "Set AZURE_AI_PROJECT_ENDPOINT or pass --endpoint".to_string(),
            )
        })
}

/// Spinner shown while waiting on a remote call
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
