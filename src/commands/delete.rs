use crate::commands::helpers;
use crate::config::Config;
use crate::error::{FoundryError, Result};
use crate::prompt::{Prompter, TerminalPrompter};

pub fn execute(config: &Config, id: &str, endpoint: Option<&str>, yes: bool) -> Result<()> {
    let endpoint = helpers::require_endpoint(endpoint)?;

    if !yes {
        println!("This will delete agent '{}' from:", id);
        println!("  {}", endpoint);
        let mut prompter = TerminalPrompter::stdio()?;
        if !prompter.confirm("Are you sure?", false) {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let mut lifecycle = helpers::lifecycle(config, &endpoint);
    if lifecycle.delete(id) {
        println!("✓ Deleted agent: {}", id);
        Ok(())
    } else {
        Err(FoundryError::tool(
            "Foundry API",
            format!("could not delete agent '{}' (run with -v for details)", id),
        ))
    }
}
