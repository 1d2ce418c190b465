use crate::agent::DEFAULT_API_VERSION;
use crate::azure::credential::DEFAULT_TOKEN_RESOURCE;
use crate::azure::quota::default_skip_patterns;
use crate::error::{FoundryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = ".foundry-agent.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub azure: AzureConfig,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub agent: AgentSettings,

    #[serde(default)]
    pub quota: QuotaConfig,

    /// Verbose mode (not stored in config file)
    #[serde(skip)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Azure CLI binary
    #[serde(default = "default_cli")]
    pub cli: String,

    /// `api-version` query parameter of the agents API
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Resource the bearer token is requested for
    #[serde(default = "default_token_resource")]
    pub token_resource: String,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            cli: default_cli(),
            api_version: default_api_version(),
            token_resource: default_token_resource(),
        }
    }
}

fn default_cli() -> String {
    "az".to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_token_resource() -> String {
    DEFAULT_TOKEN_RESOURCE.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Script called as `<script> <resource> <model>` to provision a model
    #[serde(default = "default_deploy_script")]
    pub script: PathBuf,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            script: default_deploy_script(),
        }
    }
}

fn default_deploy_script() -> PathBuf {
    PathBuf::from("scripts/deploy-azure-model.sh")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Create attempts when the name is taken; 0 keeps asking
    #[serde(default = "default_max_name_attempts")]
    pub max_name_attempts: u32,

    /// Message sent by `create --test`
    #[serde(default = "default_test_message")]
    pub test_message: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_name_attempts: default_max_name_attempts(),
            test_message: default_test_message(),
        }
    }
}

fn default_max_name_attempts() -> u32 {
    5
}

fn default_test_message() -> String {
    "Hello! Please introduce yourself briefly.".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Usage names containing any of these are ignored
    #[serde(default = "default_skip_patterns")]
    pub skip_patterns: Vec<String>,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            skip_patterns: default_skip_patterns(),
        }
    }
}

/// Contents of one config file; absent keys leave lower layers untouched
#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    azure: AzureLayer,
    #[serde(default)]
    deploy: DeployLayer,
    #[serde(default)]
    agent: AgentLayer,
    #[serde(default)]
    quota: QuotaLayer,
}

#[derive(Debug, Default, Deserialize)]
struct AzureLayer {
    cli: Option<String>,
    api_version: Option<String>,
    token_resource: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DeployLayer {
    script: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct AgentLayer {
    max_name_attempts: Option<u32>,
    test_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct QuotaLayer {
    skip_patterns: Option<Vec<String>>,
    #[serde(default)]
    extra_skip_patterns: Vec<String>,
}

impl Config {
    /// Load configuration with precedence:
    /// 1. Environment variables
    /// 2. Project config (.foundry-agent.toml in the working directory)
    /// 3. Global config (~/.foundry-agent.toml)
    /// 4. Built-in defaults
    pub fn load(project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global) = global_config_path() {
            if global.exists() {
                tracing::debug!(path = %global.display(), "loading global config");
                config = config.merge(Self::from_file(&global)?);
            }
        }

        let project = project_root.join(CONFIG_FILE);
        if project.exists() {
            tracing::debug!(path = %project.display(), "loading project config");
            config = config.merge(Self::from_file(&project)?);
        }

        config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<ConfigLayer> {
        let contents = std::fs::read_to_string(path)?;
        let layer: ConfigLayer = toml::from_str(&contents)?;
        Ok(layer)
    }

    /// Apply one config file on top of this one; keys the file sets win
    fn merge(mut self, layer: ConfigLayer) -> Self {
        let ConfigLayer {
            azure,
            deploy,
            agent,
            quota,
        } = layer;

        if let Some(cli) = azure.cli {
            self.azure.cli = cli;
        }
        if let Some(api_version) = azure.api_version {
            self.azure.api_version = api_version;
        }
        if let Some(token_resource) = azure.token_resource {
            self.azure.token_resource = token_resource;
        }

        if let Some(script) = deploy.script {
            self.deploy.script = script;
        }

        if let Some(attempts) = agent.max_name_attempts {
            self.agent.max_name_attempts = attempts;
        }
        if let Some(message) = agent.test_message {
            self.agent.test_message = message;
        }

        // skip_patterns replaces the list, extra_skip_patterns appends to it
        if let Some(patterns) = quota.skip_patterns {
            self.quota.skip_patterns = patterns;
        }
        for pattern in quota.extra_skip_patterns {
            if !self.quota.skip_patterns.contains(&pattern) {
                self.quota.skip_patterns.push(pattern);
            }
        }

        self
    }

    /// Apply environment variable overrides
    fn merge_env(mut self) -> Self {
        if let Some(version) = non_empty_env("FOUNDRY_API_VERSION") {
            self.azure.api_version = version;
        }
        if let Some(script) = non_empty_env("FOUNDRY_DEPLOY_SCRIPT") {
            self.deploy.script = PathBuf::from(script);
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.azure.cli.trim().is_empty() {
            return Err(FoundryError::InvalidConfig(
                "azure.cli must not be empty".to_string(),
            ));
        }
        if self.azure.api_version.trim().is_empty() {
            return Err(FoundryError::InvalidConfig(
                "azure.api_version must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply CLI overrides (highest precedence)
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// `~/.foundry-agent.toml`, if a home directory is known
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(CONFIG_FILE))
}
