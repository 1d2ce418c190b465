use super::{
    matches_filter, AzureProject, AzureResource, ControlPlane, ModelDeployment, QuotaUsage,
    SignedInUser, Subscription,
};
use crate::error::{FoundryError, Result};
use serde::Deserialize;
use std::process::{Command, Output, Stdio};

const ACCOUNTS_TYPE: &str = "Microsoft.CognitiveServices/accounts";
const PROJECTS_TYPE: &str = "Microsoft.CognitiveServices/accounts/projects";

pub const INSTALL_HINT: &str = "\
   macOS:   brew install azure-cli
   Windows: winget install Microsoft.AzureCLI
   Linux:   curl -sL https://aka.ms/InstallAzureCLIDeb | sudo bash

   Or visit: https://docs.microsoft.com/en-us/cli/azure/install-azure-cli";

/// Azure CLI wrapper
pub struct AzCli {
    binary: String,
}

impl Default for AzCli {
    fn default() -> Self {
        Self::new("az")
    }
}

impl AzCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Check if the CLI binary is on PATH
    pub fn is_installed(&self) -> bool {
        which::which(&self.binary).is_ok()
    }

    /// Run a command capturing its output, without checking the exit status
    fn run(&self, args: &[&str]) -> Result<Output> {
        tracing::debug!(cli = %self.binary, ?args, "running");
        Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                FoundryError::tool(&self.binary, format!("could not execute: {}", e))
            })
    }

    /// Run a command and return stdout, failing on a non-zero exit
    fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("'{}' exited with {:?}", args.join(" "), output.status.code())
            } else {
                stderr
            };
            return Err(FoundryError::tool(&self.binary, message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ControlPlane for AzCli {
    fn cli_version(&self) -> Result<String> {
        if !self.is_installed() {
            return Err(FoundryError::tool(
                &self.binary,
                format!("Azure CLI is not installed.\n\n{}", INSTALL_HINT),
            ));
        }
        let stdout = self.run_checked(&["--version"])?;
        Ok(stdout
            .lines()
            .next()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "azure-cli (version unknown)".to_string()))
    }

    fn is_logged_in(&self) -> bool {
        self.run(&["account", "show"])
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn login_device_code(&self) -> Result<bool> {
        tracing::debug!(cli = %self.binary, "starting device code login");
        // Inherit stdio so the user sees the device code
        let status = Command::new(&self.binary)
            .args(["login", "--use-device-code"])
            .status()
            .map_err(|e| FoundryError::tool(&self.binary, format!("login failed: {}", e)))?;
        Ok(status.success())
    }

    fn subscription(&self) -> Result<Subscription> {
        let stdout = self.run_checked(&[
            "account",
            "show",
            "--query",
            "{name:name, id:id}",
            "-o",
            "json",
        ])?;
        Ok(serde_json::from_str(&stdout)?)
    }

    fn list_resources(&self, filter: &str) -> Result<Vec<AzureResource>> {
        let stdout = self.run_checked(&[
            "resource",
            "list",
            "--resource-type",
            ACCOUNTS_TYPE,
            "--query",
            "[].{name:name, rg:resourceGroup, loc:location}",
            "-o",
            "json",
        ])?;
        parse_resources(&stdout, filter)
    }

    fn list_projects(&self, filter: &str) -> Result<Vec<AzureProject>> {
        let stdout = self.run_checked(&[
            "resource",
            "list",
            "--resource-type",
            PROJECTS_TYPE,
            "--query",
            "[].{fullName:name, rg:resourceGroup, loc:location}",
            "-o",
            "json",
        ])?;
        parse_projects(&stdout, filter)
    }

    fn list_deployments(&self, resource_name: &str, resource_group: &str) -> Vec<ModelDeployment> {
        let output = self.run(&[
            "cognitiveservices",
            "account",
            "deployment",
            "list",
            "--name",
            resource_name,
            "--resource-group",
            resource_group,
            "--query",
            "[].{name:name, model:properties.model.name, version:properties.model.version}",
            "-o",
            "json",
        ]);

        match output {
            Ok(o) if o.status.success() => {
                parse_deployments(&String::from_utf8_lossy(&o.stdout)).unwrap_or_else(|e| {
                    tracing::warn!(resource = resource_name, error = %e, "unreadable deployment list");
                    Vec::new()
                })
            }
            Ok(o) => {
                tracing::warn!(
                    resource = resource_name,
                    stderr = %String::from_utf8_lossy(&o.stderr).trim(),
                    "deployment list failed"
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(resource = resource_name, error = %e, "deployment list failed");
                Vec::new()
            }
        }
    }

    fn api_key(&self, resource_name: &str, resource_group: &str) -> Option<String> {
        let output = self
            .run(&[
                "cognitiveservices",
                "account",
                "keys",
                "list",
                "-n",
                resource_name,
                "-g",
                resource_group,
                "--query",
                "key1",
                "-o",
                "tsv",
            ])
            .ok()?;

        if !output.status.success() {
            return None;
        }
        let key = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!key.is_empty()).then_some(key)
    }

    fn quota_usages(&self, location: &str) -> Result<Vec<QuotaUsage>> {
        let stdout = self.run_checked(&[
            "cognitiveservices",
            "usage",
            "list",
            "--location",
            location,
            "-o",
            "json",
        ])?;
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&stdout)?)
    }

    fn signed_in_user(&self) -> Option<SignedInUser> {
        let stdout = self
            .run_checked(&[
                "ad",
                "signed-in-user",
                "show",
                "--query",
                "{id:id, upn:userPrincipalName}",
                "-o",
                "json",
            ])
            .ok()?;
        serde_json::from_str(&stdout).ok()
    }

    fn role_assignments(&self, user_id: &str, scope: &str) -> Vec<String> {
        let query = format!("[?scope=='{}'].roleDefinitionName", scope);
        let stdout = match self.run_checked(&[
            "role",
            "assignment",
            "list",
            "--assignee",
            user_id,
            "--scope",
            scope,
            "--query",
            &query,
            "-o",
            "json",
        ]) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "role assignment lookup failed");
                return Vec::new();
            }
        };
        serde_json::from_str(&stdout).unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct ResourceRow {
    name: String,
    rg: String,
    loc: String,
}

#[derive(Deserialize)]
struct ProjectRow {
    #[serde(rename = "fullName")]
    full_name: String,
    rg: String,
    loc: String,
}

#[derive(Deserialize)]
struct DeploymentRow {
    name: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

/// Parse `az resource list` output for AI accounts
pub fn parse_resources(json: &str, filter: &str) -> Result<Vec<AzureResource>> {
    let rows: Vec<ResourceRow> = serde_json::from_str(json)?;
    Ok(rows
        .into_iter()
        .filter(|r| matches_filter(filter, &[r.name.as_str(), r.rg.as_str()]))
        .map(|r| AzureResource {
            name: r.name,
            resource_group: r.rg,
            location: r.loc,
        })
        .collect())
}

/// Parse `az resource list` output for projects. Names are `account/project`;
/// anything else is skipped.
pub fn parse_projects(json: &str, filter: &str) -> Result<Vec<AzureProject>> {
    let rows: Vec<ProjectRow> = serde_json::from_str(json)?;
    Ok(rows
        .into_iter()
        .filter_map(|p| {
            let parts: Vec<&str> = p.full_name.split('/').collect();
            if parts.len() != 2 {
                tracing::debug!(name = %p.full_name, "skipping malformed project name");
                return None;
            }
            let (resource_name, project_name) = (parts[0], parts[1]);
            if !matches_filter(filter, &[resource_name, project_name, p.rg.as_str()]) {
                return None;
            }
            Some(AzureProject {
                name: project_name.to_string(),
                resource_name: resource_name.to_string(),
                resource_group: p.rg,
                location: p.loc,
            })
        })
        .collect())
}

/// Parse `az cognitiveservices account deployment list` output
pub fn parse_deployments(json: &str) -> Result<Vec<ModelDeployment>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<DeploymentRow> = serde_json::from_str(json)?;
    Ok(rows
        .into_iter()
        .map(|d| ModelDeployment {
            deployment_name: d.name,
            model_name: d.model.unwrap_or_default(),
            version: d.version.unwrap_or_default(),
        })
        .collect())
}
