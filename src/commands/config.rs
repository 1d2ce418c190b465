use crate::cli::ConfigCommands;
use crate::config::{global_config_path, Config, CONFIG_FILE};
use crate::error::Result;
use std::path::{Path, PathBuf};

pub fn execute(command: &ConfigCommands) -> Result<()> {
    let project_root = std::env::current_dir()?;
    match command {
        ConfigCommands::Validate => validate(&project_root),
        ConfigCommands::Show => show(&project_root),
    }
}

fn validate(project_root: &Path) -> Result<()> {
    let project_config = project_root.join(CONFIG_FILE);
    let global_config =
        global_config_path().unwrap_or_else(|| PathBuf::from("~").join(CONFIG_FILE));

    println!("Validating configuration files...\n");

    for (label, path) in [("Global", &global_config), ("Project", &project_config)] {
        if path.exists() {
            println!("  {} config: {}", label, path.display());
        } else {
            println!(
                "  {} config: {} - not found (optional)",
                label,
                path.display()
            );
        }
    }

    println!("\nLoading and validating configuration...");
    match Config::load(project_root) {
        Ok(_) => {
            println!("✓ Configuration is valid!");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {}", e);
            Err(e)
        }
    }
}

fn show(project_root: &Path) -> Result<()> {
    let config = Config::load(project_root)?;

    println!("Effective Configuration:");
    println!("(Environment > Project config > Global config > Defaults)\n");

    println!("Azure:");
    println!("  cli: {}", config.azure.cli);
    println!("  api_version: {}", config.azure.api_version);
    println!("  token_resource: {}", config.azure.token_resource);

    println!("\nDeploy:");
    println!("  script: {}", config.deploy.script.display());

    println!("\nAgent:");
    let attempts = match config.agent.max_name_attempts {
        0 => "unbounded".to_string(),
        n => n.to_string(),
    };
    println!("  max_name_attempts: {}", attempts);
    println!("  test_message: {}", config.agent.test_message);

    println!("\nQuota:");
    println!("  skip_patterns: {}", config.quota.skip_patterns.join(", "));

    Ok(())
}
