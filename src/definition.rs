//! Agent definition documents.
//!
//! A definition is a YAML frontmatter block followed by the agent's
//! instructions:
//!
//! ```text
//! ---
//! name: code-reviewer
//! description: Reviews code for quality and best practices
//! model: gpt-4o-mini
//! ---
//!
//! You are a code reviewer. When invoked, analyze the code and provide
//! specific, actionable feedback.
//! ```
//!
//! `name` is required, `description` and `model` are optional. The body is
//! trimmed and used verbatim as the agent's system prompt.

use crate::error::{FoundryError, Result};
use serde::Serialize;
use serde_yaml::Value;
use std::fmt;
use std::path::Path;

const MARKER: &str = "---";

/// Parsed agent definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub name: String,
    pub description: String,
    pub instructions: String,
    /// Used to fuzzy-match a model deployment
    pub model_hint: Option<String>,
}

#[derive(Serialize)]
struct Frontmatter<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "is_blank")]
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

fn is_blank(s: &&str) -> bool {
    s.is_empty()
}

impl AgentConfig {
    /// Render the definition back to the frontmatter document format
    pub fn to_document(&self) -> Result<String> {
        let header = serde_yaml::to_string(&Frontmatter {
            name: &self.name,
            description: &self.description,
            model: self.model_hint.as_deref(),
        })
        .map_err(|e| FoundryError::Format(format!("Cannot render frontmatter: {}", e)))?;

        Ok(format!(
            "{}\n{}{}\n\n{}\n",
            MARKER, header, MARKER, self.instructions
        ))
    }
}

impl fmt::Display for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.instructions.chars().take(80).collect();
        writeln!(f, "  Name:         {}", self.name)?;
        writeln!(f, "  Description:  {}", self.description)?;
        writeln!(
            f,
            "  Model hint:   {}",
            self.model_hint.as_deref().unwrap_or("default")
        )?;
        if preview.len() < self.instructions.len() {
            write!(f, "  Instructions: {}...", preview)
        } else {
            write!(f, "  Instructions: {}", preview)
        }
    }
}

/// Parse an agent definition file
pub fn parse_file(path: &Path) -> Result<AgentConfig> {
    if !path.exists() {
        return Err(FoundryError::DefinitionNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    parse_str(&content)
}

/// Parse an agent definition from its text
pub fn parse_str(content: &str) -> Result<AgentConfig> {
    let (header, body) = split_frontmatter(content)?;

    let frontmatter: Value = serde_yaml::from_str(header)
        .map_err(|e| FoundryError::Format(format!("Invalid YAML in frontmatter: {}", e)))?;

    let map = match frontmatter {
        Value::Mapping(map) => map,
        _ => {
            return Err(FoundryError::Format(
                "Frontmatter must be a YAML mapping".to_string(),
            ))
        }
    };

    let name = field(&map, "name")?.ok_or_else(|| FoundryError::MissingField("name".into()))?;
    let description = field(&map, "description")?.unwrap_or_default();
    let model_hint = field(&map, "model")?;

    Ok(AgentConfig {
        name,
        description,
        instructions: body.trim().to_string(),
        model_hint,
    })
}

/// Split a document into its frontmatter block and trailing body
fn split_frontmatter(content: &str) -> Result<(&str, &str)> {
    let missing = || {
        FoundryError::Format(
            "Expected YAML frontmatter between --- markers".to_string(),
        )
    };

    let mut lines = content.split_inclusive('\n');
    let first = lines.next().ok_or_else(missing)?;
    if first.trim_end() != MARKER {
        return Err(missing());
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if line.trim_end() == MARKER {
            return Ok((&content[header_start..offset], &content[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(missing())
}

/// Read a scalar field as a string; null and empty values count as absent
fn field(map: &serde_yaml::Mapping, key: &str) -> Result<Option<String>> {
    let value = match map.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };

    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => {
            return Err(FoundryError::Format(format!(
                "Field '{}' must be a plain value",
                key
            )))
        }
    };

    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}
