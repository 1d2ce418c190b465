use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoundryError {
    #[error("Invalid agent definition: {0}")]
    Format(String),

    #[error("Agent definition must have a '{0}' field")]
    MissingField(String),

    #[error("Agent definition not found: {0}")]
    DefinitionNotFound(PathBuf),

    #[error("{tool} failed: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Agent '{0}' was not created: {1}")]
    Verification(String, String),

    #[error("Cannot deploy '{model}': {reason}")]
    QuotaUnavailable { model: String, reason: String },

    #[error("Agent '{0}' already exists")]
    NameConflict(String),

    #[error("{0}")]
    Cancelled(String),

    #[error("No projects found{0}")]
    NoProjects(String),

    #[error("No model deployments found in {0}")]
    NoDeployments(String),

    #[error("Model deployment of '{model}' on {resource} failed")]
    ProvisionFailed { model: String, resource: String },

    #[error("Missing required Azure AI Foundry roles for {user}")]
    InsufficientRoles { user: String },

    #[error("Foundry API returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request to Foundry API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FoundryError {
    /// Build an `ExternalTool` error for the given binary
    pub fn tool(tool: &str, message: impl Into<String>) -> Self {
        FoundryError::ExternalTool {
            tool: tool.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FoundryError>;
