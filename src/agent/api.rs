//! Foundry agents REST API.

use crate::azure::CredentialProvider;
use crate::error::{FoundryError, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_API_VERSION: &str = "2025-11-15-preview";

/// Definition of a prompt-based agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptAgentDefinition {
    pub kind: &'static str,
    pub model: String,
    pub instructions: String,
}

impl PromptAgentDefinition {
    pub fn new(model: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            kind: "prompt",
            model: model.into(),
            instructions: instructions.into(),
        }
    }
}

/// Agent as returned by the service
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentObject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub versions: Option<Value>,
}

impl AgentObject {
    /// Model from the top level, or from the latest version's definition
    pub fn model(&self) -> Option<String> {
        self.model.clone().or_else(|| {
            self.versions
                .as_ref()?
                .pointer("/latest/definition/model")?
                .as_str()
                .map(str::to_string)
        })
    }

    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Operations on one project's hosted agents
pub trait AgentsApi {
    /// Fails with `NameConflict` when an agent with `name` exists
    fn create_agent(
        &self,
        name: &str,
        description: &str,
        definition: &PromptAgentDefinition,
    ) -> Result<AgentObject>;

    fn get_agent(&self, name: &str) -> Result<AgentObject>;

    fn list_agents(&self) -> Result<Vec<AgentObject>>;

    fn delete_agent(&self, id: &str) -> Result<()>;

    /// Send one user message to the agent; returns the raw response body
    fn create_response(&self, agent_name: &str, message: &str) -> Result<Value>;
}

/// Builds fresh API clients for one endpoint
pub trait ClientFactory {
    fn endpoint(&self) -> &str;

    fn connect(&self) -> Result<Box<dyn AgentsApi>>;
}

pub struct FoundryClientFactory {
    endpoint: String,
    api_version: String,
    credential: Arc<dyn CredentialProvider>,
}

impl FoundryClientFactory {
    pub fn new(
        endpoint: &str,
        api_version: impl Into<String>,
        credential: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_version: api_version.into(),
            credential,
        }
    }
}

impl ClientFactory for FoundryClientFactory {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn connect(&self) -> Result<Box<dyn AgentsApi>> {
        // No request deadline; model replies may exceed reqwest's 30s default
        let http = Client::builder()
            .user_agent(concat!("foundry-agent/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()?;
        Ok(Box::new(FoundryClient {
            http,
            endpoint: self.endpoint.clone(),
            api_version: self.api_version.clone(),
            credential: Arc::clone(&self.credential),
        }))
    }
}

/// HTTP client for the agents API of one project endpoint
pub struct FoundryClient {
    http: Client,
    endpoint: String,
    api_version: String,
    credential: Arc<dyn CredentialProvider>,
}

impl FoundryClient {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    fn send(&self, request: RequestBuilder) -> Result<Value> {
        let token = self.credential.token()?;
        let response = request
            .bearer_auth(token)
            .query(&[("api-version", self.api_version.as_str())])
            .send()?;

        let status = response.status();
        tracing::debug!(%status, url = %response.url(), "foundry response");

        let body = response.text()?;
        if !status.is_success() {
            return Err(FoundryError::Http {
                status: status.as_u16(),
                body: error_message(&body),
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Prefer the service's `error.message` over the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// One page of `GET agents`
#[derive(Debug, Default, Deserialize)]
struct AgentPage {
    #[serde(default)]
    data: Vec<AgentObject>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    last_id: Option<String>,
}

impl AgentPage {
    /// Accepts both the paged object and a bare array
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(_) => Ok(Self {
                data: serde_json::from_value(value)?,
                ..Default::default()
            }),
            Value::Null => Ok(Self::default()),
            other => Ok(serde_json::from_value(other)?),
        }
    }

    /// Cursor for the following page, if the service reports one
    fn next_cursor(&self) -> Option<String> {
        if !self.has_more {
            return None;
        }
        self.last_id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| self.data.last().and_then(|a| a.id.clone()))
    }
}

impl AgentsApi for FoundryClient {
    fn create_agent(
        &self,
        name: &str,
        description: &str,
        definition: &PromptAgentDefinition,
    ) -> Result<AgentObject> {
        let body = json!({
            "name": name,
            "description": description,
            "definition": definition,
        });

        match self.send(self.http.post(self.url("agents")).json(&body)) {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(FoundryError::Http { status, .. }) if status == StatusCode::CONFLICT.as_u16() => {
                Err(FoundryError::NameConflict(name.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    fn get_agent(&self, name: &str) -> Result<AgentObject> {
        let value = self.send(self.http.get(self.url(&format!("agents/{}", name))))?;
        Ok(serde_json::from_value(value)?)
    }

    fn list_agents(&self) -> Result<Vec<AgentObject>> {
        let mut agents = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut request = self.http.get(self.url("agents"));
            if let Some(cursor) = &after {
                request = request.query(&[("after", cursor.as_str())]);
            }

            let page = AgentPage::from_value(self.send(request)?)?;
            let next = page.next_cursor();
            agents.extend(page.data);

            match next {
                Some(cursor) if after.as_deref() != Some(cursor.as_str()) => after = Some(cursor),
                _ => break,
            }
        }

        Ok(agents)
    }

    fn delete_agent(&self, id: &str) -> Result<()> {
        self.send(self.http.delete(self.url(&format!("agents/{}", id))))?;
        Ok(())
    }

    fn create_response(&self, agent_name: &str, message: &str) -> Result<Value> {
        let body = json!({
            "input": [{"role": "user", "content": message}],
            "agent": {"name": agent_name, "type": "agent_reference"},
        });
        self.send(self.http.post(self.url("openai/responses")).json(&body))
    }
}
