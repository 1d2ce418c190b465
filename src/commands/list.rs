use crate::agent::AgentSummary;
use crate::commands::helpers;
use crate::config::Config;
use crate::error::Result;

pub fn execute(config: &Config, endpoint: Option<&str>) -> Result<()> {
    let endpoint = helpers::require_endpoint(endpoint)?;
    let mut lifecycle = helpers::lifecycle(config, &endpoint);

    let pb = helpers::spinner("Fetching agents...");
    let agents = lifecycle.list();
    pb.finish_and_clear();

    println!("Agents in {}:\n", endpoint);
    print!("{}", format_table(&agents));
    Ok(())
}

pub fn format_table(agents: &[AgentSummary]) -> String {
    if agents.is_empty() {
        return "No agents found.\n".to_string();
    }

    let mut out = format!("{:<30} {:<30} {}\n", "NAME", "ID", "MODEL");
    out.push_str(&format!("{}\n", "-".repeat(80)));
    for agent in agents {
        let model = if agent.model.is_empty() {
            "-"
        } else {
            agent.model.as_str()
        };
        out.push_str(&format!("{:<30} {:<30} {}\n", agent.name, agent.id, model));
    }
    out.push_str(&format!("\nTotal: {} agent(s)\n", agents.len()));
    out
}
