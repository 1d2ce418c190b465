use crate::azure::{AzCli, ControlPlane};
use crate::config::Config;
use crate::error::{FoundryError, Result};
use crate::prompt::print_header;

pub fn execute(config: &Config, filter: &str, deployments: bool, show_keys: bool) -> Result<()> {
    let plane = AzCli::new(config.azure.cli.clone());
    plane.cli_version()?;

    if !plane.is_logged_in() {
        return Err(FoundryError::tool(
            "az",
            "Not logged in. Run 'az login' first.",
        ));
    }

    let subscription = plane.subscription()?;
    println!("Subscription: {} ({})", subscription.name, subscription.id);

    print_header("Azure AI Resources");
    print!("{}", render(&plane, filter, deployments, show_keys)?);
    Ok(())
}

/// Resources, projects and (optionally) deployments with their endpoints
pub fn render(
    plane: &dyn ControlPlane,
    filter: &str,
    deployments: bool,
    show_keys: bool,
) -> Result<String> {
    let resources = plane.list_resources(filter)?;
    let projects = plane.list_projects(filter)?;

    let mut out = String::new();

    if resources.is_empty() {
        out.push_str("\nNo AI resources found.\n");
    }
    for resource in &resources {
        out.push_str(&format!(
            "\n{} ({}, {})\n",
            resource.name, resource.resource_group, resource.location
        ));
        out.push_str(&format!("  Endpoint: {}\n", resource.endpoint()));

        if show_keys {
            let key = plane
                .api_key(&resource.name, &resource.resource_group)
                .unwrap_or_else(|| "(unavailable)".to_string());
            out.push_str(&format!("  Key:      {}\n", key));
        }

        if deployments {
            let list = plane.list_deployments(&resource.name, &resource.resource_group);
            if list.is_empty() {
                out.push_str("  Deployments: none\n");
            } else {
                out.push_str("  Deployments:\n");
                for d in list {
                    out.push_str(&format!(
                        "    - {:<25} ({} {})\n",
                        d.deployment_name, d.model_name, d.version
                    ));
                }
            }
        }

        for project in projects
            .iter()
            .filter(|p| p.resource_name == resource.name)
        {
            out.push_str(&format!("  Project: {}\n", project.name));
            out.push_str(&format!("    Endpoint: {}\n", project.endpoint()));
        }
    }

    let orphans: Vec<_> = projects
        .iter()
        .filter(|p| !resources.iter().any(|r| r.name == p.resource_name))
        .collect();
    if !orphans.is_empty() {
        out.push_str("\nOther projects:\n");
        for project in orphans {
            out.push_str(&format!(
                "  {}/{} ({})\n    Endpoint: {}\n",
                project.resource_name,
                project.name,
                project.location,
                project.endpoint()
            ));
        }
    }

    Ok(out)
}
