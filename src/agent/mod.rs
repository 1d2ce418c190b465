//! Hosted agent lifecycle: create, verify, list, delete and chat.

pub mod api;
pub mod lifecycle;
pub mod response;
pub mod sidecar;

pub use api::{
    AgentObject, AgentsApi, ClientFactory, FoundryClientFactory, PromptAgentDefinition,
    DEFAULT_API_VERSION,
};
pub use lifecycle::{AgentLifecycle, CreateRequest};
pub use response::extract_output_text;

use std::fmt;

/// Result of a successful, verified creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAgent {
    pub agent_id: String,
    pub name: String,
    pub model: String,
    pub endpoint: String,
    pub resource_group: String,
    pub project_name: String,
}

impl fmt::Display for CreatedAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== Agent Created Successfully ===")?;
        writeln!(f, "Agent ID: {}", self.agent_id)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Model: {}", self.model)?;
        if !self.resource_group.is_empty() {
            writeln!(f, "Resource Group: {}", self.resource_group)?;
        }
        if !self.project_name.is_empty() {
            writeln!(f, "Project: {}", self.project_name)?;
        }
        write!(f, "Endpoint: {}", self.endpoint)
    }
}

/// Simplified listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSummary {
    pub id: String,
    pub name: String,
    pub model: String,
}

impl From<AgentObject> for AgentSummary {
    fn from(agent: AgentObject) -> Self {
        let model = agent.model().unwrap_or_default();
        Self {
            id: agent.id.unwrap_or_default(),
            name: agent.name.unwrap_or_default(),
            model,
        }
    }
}
