//! Azure resource discovery.
//!
//! Everything that talks to the Azure control plane goes through the
//! [`ControlPlane`] trait. [`AzCli`] implements it by shelling out to the
//! Azure CLI; tests substitute an in-memory implementation.

pub mod az;
pub mod credential;
pub mod provision;
pub mod quota;
pub mod roles;

pub use az::AzCli;
pub use credential::{AzCliCredential, CredentialProvider, StaticCredential};
pub use provision::{Provisioner, ScriptProvisioner};
pub use quota::{evaluate_quota, QuotaStatus, QuotaUsage};

use crate::error::Result;
use serde::Deserialize;

/// Azure AI resource (Cognitive Services account)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureResource {
    pub name: String,
    pub resource_group: String,
    pub location: String,
}

impl AzureResource {
    pub fn endpoint(&self) -> String {
        format!("https://{}.cognitiveservices.azure.com/", self.name)
    }
}

/// Azure AI Foundry project, a child of an AI resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureProject {
    pub name: String,
    pub resource_name: String,
    pub resource_group: String,
    pub location: String,
}

impl AzureProject {
    /// Project endpoint used by the agents API
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}.services.ai.azure.com/api/projects/{}",
            self.resource_name, self.name
        )
    }
}

/// Model deployed in an AI resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDeployment {
    pub deployment_name: String,
    pub model_name: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SignedInUser {
    pub id: String,
    #[serde(default)]
    pub upn: Option<String>,
}

impl SignedInUser {
    /// User principal name when known, object id otherwise
    pub fn display_name(&self) -> &str {
        self.upn.as_deref().unwrap_or(&self.id)
    }
}

/// Typed view of the Azure control plane
pub trait ControlPlane {
    /// Version line of the underlying tool; fails if it is not installed
    fn cli_version(&self) -> Result<String>;

    fn is_logged_in(&self) -> bool;

    /// Interactive device-code login; the user completes it out of band
    fn login_device_code(&self) -> Result<bool>;

    fn subscription(&self) -> Result<Subscription>;

    fn list_resources(&self, filter: &str) -> Result<Vec<AzureResource>>;

    fn list_projects(&self, filter: &str) -> Result<Vec<AzureProject>>;

    /// Deployments in a resource; empty when none exist or the query fails
    fn list_deployments(&self, resource_name: &str, resource_group: &str) -> Vec<ModelDeployment>;

    fn api_key(&self, resource_name: &str, resource_group: &str) -> Option<String>;

    fn quota_usages(&self, location: &str) -> Result<Vec<QuotaUsage>>;

    /// `None` when the identity cannot be determined (e.g. service principals)
    fn signed_in_user(&self) -> Option<SignedInUser>;

    /// Role names assigned to `user_id` exactly at `scope`
    fn role_assignments(&self, user_id: &str, scope: &str) -> Vec<String>;
}

/// Case-insensitive substring match of `term` against any of `fields`.
/// An empty term matches everything.
pub fn matches_filter(term: &str, fields: &[&str]) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&term))
}
