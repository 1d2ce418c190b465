//! Subscription role pre-check for Azure AI Foundry access.

use super::{ControlPlane, Subscription};

/// Roles that grant enough access to create agents
pub const SUFFICIENT_ROLES: &[&str] = &[
    "Owner",
    "Contributor",
    "Azure AI User",
    "Azure AI Owner",
    "Azure AI Account Owner",
    "Azure AI Project Manager",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleCheck {
    /// At least one sufficient role is assigned
    Granted { user: String, roles: Vec<String> },
    /// Identity could not be resolved; likely a service principal
    Undetermined,
    Missing { user: String, scope: String },
}

impl RoleCheck {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, RoleCheck::Missing { .. })
    }
}

pub fn subscription_scope(subscription: &Subscription) -> String {
    format!("/subscriptions/{}", subscription.id)
}

/// Check the signed-in user's roles at subscription scope
pub fn check_roles(plane: &dyn ControlPlane, subscription: &Subscription) -> RoleCheck {
    let user = match plane.signed_in_user() {
        Some(user) => user,
        None => return RoleCheck::Undetermined,
    };

    let scope = subscription_scope(subscription);
    let assigned = plane.role_assignments(&user.id, &scope);
    tracing::debug!(user = %user.display_name(), ?assigned, "role assignments");

    let mut roles: Vec<String> = assigned
        .into_iter()
        .filter(|r| SUFFICIENT_ROLES.contains(&r.as_str()))
        .collect();
    roles.sort();
    roles.dedup();

    if roles.is_empty() {
        RoleCheck::Missing {
            user: user.display_name().to_string(),
            scope,
        }
    } else {
        RoleCheck::Granted {
            user: user.display_name().to_string(),
            roles,
        }
    }
}

/// Instructions to hand to an administrator when roles are missing
pub fn admin_instructions(user: &str, scope: &str) -> String {
    format!(
        "   Share this with your Azure administrator:\n\
         \n\
         \x20  User:  {user}\n\
         \x20  Role:  Azure AI User (minimum)\n\
         \x20  Scope: {scope}\n\
         \n\
         \x20  Command for admin to run:\n\
         \x20  az role assignment create --role \"Azure AI User\" --assignee \"{user}\" --scope {scope}\n\
         \n\
         \x20  Docs: https://learn.microsoft.com/en-us/azure/ai-foundry/concepts/rbac-foundry"
    )
}
