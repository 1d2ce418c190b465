//! Bearer tokens for the Foundry data plane.

use crate::error::{FoundryError, Result};
use serde::Deserialize;
use std::process::{Command, Stdio};
use std::sync::Mutex;

/// Token audience of the Foundry agents API
pub const DEFAULT_TOKEN_RESOURCE: &str = "https://ai.azure.com";

/// Tokens are refreshed this many seconds before they expire
const EXPIRY_MARGIN_SECS: i64 = 300;

pub trait CredentialProvider {
    fn token(&self) -> Result<String>;
}

/// A fixed token, e.g. from `FOUNDRY_ACCESS_TOKEN`
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialProvider for StaticCredential {
    fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AccessToken {
    #[serde(rename = "accessToken")]
    access_token: String,
    /// Unix timestamp; older CLI versions omit it
    #[serde(default)]
    expires_on: Option<i64>,
}

impl AccessToken {
    fn is_fresh(&self, now: i64) -> bool {
        match self.expires_on {
            Some(expires) => now + EXPIRY_MARGIN_SECS < expires,
            None => false,
        }
    }
}

/// Tokens from the Azure CLI's logged-in session
pub struct AzCliCredential {
    binary: String,
    resource: String,
    cached: Mutex<Option<AccessToken>>,
}

impl AzCliCredential {
    pub fn new(binary: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            resource: resource.into(),
            cached: Mutex::new(None),
        }
    }

    fn fetch(&self) -> Result<AccessToken> {
        tracing::debug!(resource = %self.resource, "requesting access token");
        let output = Command::new(&self.binary)
            .args([
                "account",
                "get-access-token",
                "--resource",
                &self.resource,
                "-o",
                "json",
            ])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| FoundryError::tool(&self.binary, format!("could not execute: {}", e)))?;

        if !output.status.success() {
            return Err(FoundryError::tool(
                &self.binary,
                format!(
                    "could not get an access token: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

impl CredentialProvider for AzCliCredential {
    fn token(&self) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let mut cached = self
            .cached
            .lock()
            .map_err(|_| FoundryError::InvalidConfig("credential cache poisoned".to_string()))?;

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.access_token.clone());
        }

        let token = self.fetch()?;
        let value = token.access_token.clone();
        *cached = Some(token);
        Ok(value)
    }
}
