use crate::agent::{AgentSummary, CreateRequest};
use crate::cli::PirateCommands;
use crate::commands::helpers;
use crate::config::Config;
use crate::definition::{self, AgentConfig};
use crate::error::{FoundryError, Result};
use crate::prompt::TerminalPrompter;

const PIRATE_DEFINITION: &str = include_str!("../../agents/pirate.md");

/// The built-in pirate definition
pub fn pirate_definition() -> Result<AgentConfig> {
    definition::parse_str(PIRATE_DEFINITION)
}

pub fn execute(
    config: &Config,
    endpoint: Option<&str>,
    model: &str,
    command: &PirateCommands,
) -> Result<()> {
    let endpoint = helpers::require_endpoint(endpoint)?;
    let mut lifecycle = helpers::lifecycle(config, &endpoint);

    match command {
        PirateCommands::Create => {
            let pirate = pirate_definition()?;
            let request = CreateRequest {
                model: model.to_string(),
                name: pirate.name,
                instructions: pirate.instructions,
                description: pirate.description,
                ..Default::default()
            };
            let mut prompter = TerminalPrompter::stdio()?;
            let agent = lifecycle.create(&request, &mut prompter)?;
            println!("⚓ Arrr! Created pirate agent: {}", agent.agent_id);
            println!("   Name: {}", agent.name);
            println!("\n🏴‍☠️  Captain Fake-Beard is ready for adventure!");
            println!("\nTalk to him with:");
            println!("  foundry-agent pirate test {}", agent.name);
        }
        PirateCommands::List => {
            let pirates = pirate_agents(lifecycle.list());
            println!("🏴‍☠️  Available pirate agents:");
            if pirates.is_empty() {
                println!("  No pirate agents found");
            }
            for agent in pirates {
                println!("  - {} (ID: {})", agent.name, agent.id);
            }
        }
        PirateCommands::Test { name, message } => {
            println!("🗣️  You: {}", message);
            let pb = helpers::spinner("Waiting for the captain...");
            let reply = lifecycle.chat(name, message);
            pb.finish_and_clear();
            println!("🏴‍☠️  {}: {}", name, reply?);
        }
        PirateCommands::Delete { id } => {
            if !lifecycle.delete(id) {
                return Err(FoundryError::tool(
                    "Foundry API",
                    format!("could not delete agent '{}' (run with -v for details)", id),
                ));
            }
            println!("⚓ Deleted pirate agent: {}", id);
        }
    }

    Ok(())
}

fn pirate_agents(agents: Vec<AgentSummary>) -> Vec<AgentSummary> {
    agents
        .into_iter()
        .filter(|a| a.name.to_lowercase().contains("pirate"))
        .collect()
}
