//! The `.agent.txt` record written next to a definition after creation.

use super::CreatedAgent;
use crate::error::{FoundryError, Result};
use std::path::{Path, PathBuf};

const NAME_KEY: &str = "Agent Created:";
const ID_KEY: &str = "Agent ID:";
const ENDPOINT_KEY: &str = "Endpoint:";
const MODEL_KEY: &str = "Model:";

/// `agents/bot.yaml` -> `agents/bot.agent.txt`
pub fn sidecar_path(definition: &Path) -> PathBuf {
    definition.with_extension("agent.txt")
}

/// Shell snippet that chats with an agent through the responses API
pub fn usage_sample(agent_name: &str, endpoint: &str, api_version: &str) -> String {
    format!(
        r#"    TOKEN=$(az account get-access-token --resource https://ai.azure.com --query accessToken -o tsv)

    curl -s -X POST "{endpoint}/openai/responses?api-version={api_version}" \
      -H "Authorization: Bearer $TOKEN" \
      -H "Content-Type: application/json" \
      -d '{{"input": [{{"role": "user", "content": "Your message here"}}],
           "agent": {{"name": "{agent_name}", "type": "agent_reference"}}}}'"#
    )
}

pub fn render(agent: &CreatedAgent, api_version: &str) -> String {
    let mut lines = vec![
        format!("{} {}", NAME_KEY, agent.name),
        format!("{} {}", ID_KEY, agent.agent_id),
        format!("{} {}", ENDPOINT_KEY, agent.endpoint),
        format!("{} {}", MODEL_KEY, agent.model),
    ];
    if !agent.resource_group.is_empty() {
        lines.push(format!("Resource Group: {}", agent.resource_group));
    }
    if !agent.project_name.is_empty() {
        lines.push(format!("Project: {}", agent.project_name));
    }
    lines.push(format!(
        "Created At: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    format!(
        "{}\n\nTo chat with this agent:\n\n    foundry-agent test {} {}\n\nOr call the responses API directly:\n\n{}\n",
        lines.join("\n"),
        agent.name,
        agent.endpoint,
        usage_sample(&agent.name, &agent.endpoint, api_version)
    )
}

/// Write the record next to `definition` and return its path
pub fn write(definition: &Path, agent: &CreatedAgent, api_version: &str) -> Result<PathBuf> {
    let path = sidecar_path(definition);
    std::fs::write(&path, render(agent, api_version))?;
    Ok(path)
}

/// Recover `(agent name, endpoint)` from a record's text
pub fn parse(content: &str) -> Option<(String, String)> {
    let mut name = None;
    let mut id = None;
    let mut endpoint = None;

    for line in content.lines().map(str::trim) {
        let value = |key: &str| {
            line.strip_prefix(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        if name.is_none() {
            name = value(NAME_KEY);
        }
        if id.is_none() {
            id = value(ID_KEY);
        }
        if endpoint.is_none() {
            endpoint = value(ENDPOINT_KEY);
        }
    }

    Some((name.or(id)?, endpoint?))
}

pub fn read(path: &Path) -> Result<(String, String)> {
    let content = std::fs::read_to_string(path)?;
    parse(&content).ok_or_else(|| {
        FoundryError::Format(format!(
            "Could not parse agent name and endpoint from {}",
            path.display()
        ))
    })
}
