//! Project and model deployment selection.
//!
//! A decision procedure, not a state machine: every terminal branch returns
//! an error for the caller to report, and nothing is persisted between runs.

use crate::azure::quota::check_quota;
use crate::azure::{AzureProject, ControlPlane, ModelDeployment, Provisioner};
use crate::error::{FoundryError, Result};
use crate::prompt::{print_header, Prompter};

/// Show `items` and return the chosen index. A single item is selected
/// without asking.
pub fn select_from_list(prompter: &mut dyn Prompter, prompt: &str, items: &[String]) -> Option<usize> {
    match items.len() {
        0 => None,
        1 => {
            println!("\n  [ 1] {}\n", items[0]);
            println!("Auto-selecting the only option...");
            Some(0)
        }
        _ => prompter.choose(prompt, items),
    }
}

fn find_exact<'d>(deployments: &'d [ModelDeployment], hint: &str) -> Option<&'d ModelDeployment> {
    let hint = hint.to_lowercase();
    deployments
        .iter()
        .find(|d| d.deployment_name.to_lowercase() == hint || d.model_name.to_lowercase() == hint)
}

fn find_partial<'d>(deployments: &'d [ModelDeployment], hint: &str) -> Vec<&'d ModelDeployment> {
    let hint = hint.to_lowercase();
    deployments
        .iter()
        .filter(|d| {
            d.deployment_name.to_lowercase().contains(&hint)
                || d.model_name.to_lowercase().contains(&hint)
        })
        .collect()
}

pub struct Selector<'a> {
    plane: &'a dyn ControlPlane,
    provisioner: &'a dyn Provisioner,
    prompter: &'a mut dyn Prompter,
    skip_patterns: &'a [String],
}

impl<'a> Selector<'a> {
    pub fn new(
        plane: &'a dyn ControlPlane,
        provisioner: &'a dyn Provisioner,
        prompter: &'a mut dyn Prompter,
        skip_patterns: &'a [String],
    ) -> Self {
        Self {
            plane,
            provisioner,
            prompter,
            skip_patterns,
        }
    }

    pub fn select_project(&mut self, filter: &str) -> Result<AzureProject> {
        print_header("Select Azure AI Project");

        let matching = if filter.is_empty() {
            String::new()
        } else {
            format!(" matching \"{}\"", filter)
        };
        println!("\nSearching for projects{}...", matching);

        let mut projects = self.plane.list_projects(filter)?;
        if projects.is_empty() {
            println!("No projects found.");
            println!("\nTip: Create a project in the Azure AI Foundry portal, or widen --filter.");
            return Err(FoundryError::NoProjects(matching));
        }

        let labels: Vec<String> = projects
            .iter()
            .map(|p| format!("{}/{:<25} {}", p.resource_name, p.name, p.location))
            .collect();

        match select_from_list(self.prompter, "Select project", &labels) {
            Some(idx) => Ok(projects.swap_remove(idx)),
            None => Err(FoundryError::Cancelled("No project selected.".to_string())),
        }
    }

    pub fn select_deployment(
        &mut self,
        project: &AzureProject,
        model_hint: Option<&str>,
    ) -> Result<ModelDeployment> {
        print_header("Select Model Deployment");

        println!("\nFetching deployments in {}...", project.resource_name);
        let mut deployments = self.refresh(project);

        if deployments.is_empty() {
            println!("No model deployments found.");
            let hint = match model_hint {
                Some(hint) => hint,
                None => return Err(FoundryError::NoDeployments(project.resource_name.clone())),
            };

            if !self.offer_deploy(project, hint, "now")? {
                return Err(FoundryError::Cancelled("No deployment selected.".to_string()));
            }
            deployments = self.refresh(project);
            if deployments.is_empty() {
                println!("Still no deployments found after deploy attempt.");
                return Err(FoundryError::NoDeployments(project.resource_name.clone()));
            }
        }

        if let Some(hint) = model_hint {
            if let Some(d) = find_exact(&deployments, hint) {
                println!(
                    "\nAuto-selecting deployment matching '{}': {}",
                    hint, d.deployment_name
                );
                return Ok(d.clone());
            }

            let partial: Vec<ModelDeployment> =
                find_partial(&deployments, hint).into_iter().cloned().collect();

            match partial.as_slice() {
                [only] => {
                    println!(
                        "\nNo exact match for '{}', closest: {}",
                        hint, only.deployment_name
                    );
                    if self
                        .prompter
                        .confirm(&format!("Use '{}'?", only.deployment_name), true)
                    {
                        return Ok(only.clone());
                    }
                    if self.offer_deploy(project, hint, "instead")? {
                        deployments = self.refresh(project);
                        if let Some(d) = find_exact(&deployments, hint) {
                            println!("\nUsing newly deployed: {}", d.deployment_name);
                            return Ok(d.clone());
                        }
                    }
                }
                [] => {
                    println!("\nNo deployment found matching '{}'.", hint);
                    if self.offer_deploy(project, hint, "now")? {
                        deployments = self.refresh(project);
                        let found = find_exact(&deployments, hint)
                            .or_else(|| find_partial(&deployments, hint).into_iter().next());
                        if let Some(d) = found {
                            println!("\nUsing newly deployed: {}", d.deployment_name);
                            return Ok(d.clone());
                        }
                    }
                }
                several => {
                    println!("\nNo exact match for '{}'. Partial matches found:", hint);
                    for d in several {
                        println!("  - {}", d.deployment_name);
                    }
                    if self.offer_deploy(project, hint, "instead")? {
                        deployments = self.refresh(project);
                        if let Some(d) = find_exact(&deployments, hint) {
                            println!("\nUsing newly deployed: {}", d.deployment_name);
                            return Ok(d.clone());
                        }
                    }
                }
            }
        }

        let labels: Vec<String> = deployments
            .iter()
            .map(|d| format!("{:<25} ({} {})", d.deployment_name, d.model_name, d.version))
            .collect();

        match select_from_list(self.prompter, "Select deployment", &labels) {
            Some(idx) => Ok(deployments.swap_remove(idx)),
            None => Err(FoundryError::Cancelled("No deployment selected.".to_string())),
        }
    }

    fn refresh(&self, project: &AzureProject) -> Vec<ModelDeployment> {
        self.plane
            .list_deployments(&project.resource_name, &project.resource_group)
    }

    /// Offer to deploy `model` after a quota pre-check.
    ///
    /// `Ok(true)` once the model was deployed, `Ok(false)` if the user
    /// declined. No quota and failed deployments are errors.
    fn offer_deploy(&mut self, project: &AzureProject, model: &str, verb: &str) -> Result<bool> {
        let quota = check_quota(self.plane, &project.location, model, self.skip_patterns);

        if !quota.allows_deploy() {
            println!("\n   ❌ Cannot deploy '{}': {}", model, quota);
            println!("      Try a different region or request quota increase.");
            return Err(FoundryError::QuotaUnavailable {
                model: model.to_string(),
                reason: quota.to_string(),
            });
        }

        println!(
            "\n   📊 Quota for '{}' in {}: {}",
            model, project.location, quota
        );
        if !self
            .prompter
            .confirm(&format!("Deploy '{}' {}?", model, verb), true)
        {
            return Ok(false);
        }

        if !self.provisioner.deploy(&project.resource_name, model) {
            return Err(FoundryError::ProvisionFailed {
                model: model.to_string(),
                resource: project.resource_name.clone(),
            });
        }

        println!("\nRefreshing deployments...");
        Ok(true)
    }
}
