use crate::agent::{sidecar, AgentLifecycle, CreateRequest, CreatedAgent};
use crate::azure::roles::{admin_instructions, check_roles, RoleCheck};
use crate::azure::{AzCli, ControlPlane, Provisioner, ScriptProvisioner};
use crate::cli::CreateCmd;
use crate::commands::helpers;
use crate::config::Config;
use crate::definition;
use crate::error::{FoundryError, Result};
use crate::prompt::{print_header, Prompter, TerminalPrompter};
use crate::select::Selector;

pub fn execute(config: &Config, cmd: &CreateCmd) -> Result<()> {
    let plane = AzCli::new(config.azure.cli.clone());
    let provisioner = ScriptProvisioner::new(config.deploy.script.clone());
    let mut prompter = TerminalPrompter::stdio()?;

    run(
        config,
        cmd,
        &plane,
        &provisioner,
        &mut prompter,
        &|endpoint: &str| helpers::lifecycle(config, endpoint),
    )?;
    Ok(())
}

/// Full interactive creation flow.
///
/// `Ok(None)` when the user declines the final confirmation.
pub fn run(
    config: &Config,
    cmd: &CreateCmd,
    plane: &dyn ControlPlane,
    provisioner: &dyn Provisioner,
    prompter: &mut dyn Prompter,
    connect: &dyn Fn(&str) -> AgentLifecycle,
) -> Result<Option<CreatedAgent>> {
    if !cmd.file.exists() {
        return Err(FoundryError::DefinitionNotFound(cmd.file.clone()));
    }

    let version = plane.cli_version()?;
    println!("✅ Azure CLI: {}", version);

    print_header("Parse Agent Definition");
    let agent_config = definition::parse_file(&cmd.file)?;
    println!("\nLoaded: {}", cmd.file.display());
    println!("{}", agent_config);

    print_header("Azure Authentication");
    ensure_login(plane, prompter)?;
    let subscription = plane.subscription()?;
    println!("\nSubscription: {}", subscription.name);

    print_header("Checking Azure Roles");
    match check_roles(plane, &subscription) {
        RoleCheck::Granted { user, roles } => {
            println!("\n   User: {}", user);
            println!("   ✅ Roles: {}", roles.join(", "));
        }
        RoleCheck::Undetermined => {
            println!("\n⚠️  Could not determine user identity (may be service principal).");
            println!("   Proceeding anyway...");
        }
        RoleCheck::Missing { user, scope } => {
            println!("\n❌ Missing required Azure AI Foundry roles.\n");
            println!("{}", admin_instructions(&user, &scope));
            return Err(FoundryError::InsufficientRoles { user });
        }
    }

    let (project, deployment) = {
        let mut selector =
            Selector::new(plane, provisioner, &mut *prompter, &config.quota.skip_patterns);
        let project = selector.select_project(&cmd.filter)?;
        println!("\nSelected: {}", project.endpoint());
        let deployment = selector.select_deployment(&project, agent_config.model_hint.as_deref())?;
        println!("\nSelected: {}", deployment.deployment_name);
        (project, deployment)
    };

    print_header("Confirm Agent Creation");
    println!();
    println!("  Agent Name:    {}", agent_config.name);
    println!("  Description:   {}", agent_config.description);
    println!("  Project:       {}", project.name);
    println!("  Endpoint:      {}", project.endpoint());
    println!("  Model:         {}", deployment.deployment_name);
    println!();

    if !cmd.yes && !prompter.confirm("Create agent?", true) {
        println!("Cancelled.");
        return Ok(None);
    }

    print_header("Creating Agent");
    let mut lifecycle = connect(&project.endpoint());
    let request = CreateRequest {
        model: deployment.deployment_name.clone(),
        name: agent_config.name.clone(),
        instructions: agent_config.instructions.clone(),
        description: agent_config.description.clone(),
        resource_group: project.resource_group.clone(),
        project_name: project.name.clone(),
    };
    let created = lifecycle.create(&request, prompter)?;
    println!("{}", created);

    let info_file = sidecar::write(&cmd.file, &created, &config.azure.api_version)?;
    println!("\n📄 Agent info saved to: {}", info_file.display());

    if cmd.test {
        print_header("Testing Agent");
        let message = &config.agent.test_message;
        println!("\nSending test message: '{}'", message);
        let pb = helpers::spinner("Waiting for agent response...");
        let reply = lifecycle.test(&created.name, message);
        pb.finish_and_clear();
        println!("\nAgent response: {}", reply);
    }

    print_header("Done!");
    println!("\nYour Azure AI agent is ready to use.");
    println!("\nTest it with:");
    println!("  foundry-agent test {}", info_file.display());
    println!("  foundry-agent test {} {}", created.name, created.endpoint);

    Ok(Some(created))
}

fn ensure_login(plane: &dyn ControlPlane, prompter: &mut dyn Prompter) -> Result<()> {
    if plane.is_logged_in() {
        println!("\n✅ Logged in to Azure");
        return Ok(());
    }

    println!("\nNot logged in to Azure.");
    if !prompter.confirm("Login now using device code?", true) {
        return Err(FoundryError::Cancelled(
            "Cannot proceed without Azure login.".to_string(),
        ));
    }
    if !plane.login_device_code()? {
        return Err(FoundryError::tool("az login", "Login failed."));
    }
    Ok(())
}
