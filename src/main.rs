#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use foundry_agent::cli::{Cli, Commands};
use foundry_agent::config::Config;
use foundry_agent::{commands, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("\n❌ {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: &Cli) -> foundry_agent::error::Result<()> {
    // Config commands load (and report on) the files themselves
    if let Commands::Config { command } = &cli.command {
        return commands::config::execute(command);
    }

    let config = Config::load(&std::env::current_dir()?)?.with_verbose(cli.verbose);
    tracing::debug!(?config, "effective configuration");

    match &cli.command {
        Commands::Create(cmd) => commands::create::execute(&config, cmd),
        Commands::Test(cmd) => commands::test::execute(&config, cmd),
        Commands::List { endpoint } => commands::list::execute(&config, endpoint.as_deref()),
        Commands::Delete { id, endpoint, yes } => {
            commands::delete::execute(&config, id, endpoint.as_deref(), *yes)
        }
        Commands::Discover {
            filter,
            deployments,
            show_keys,
        } => commands::discover::execute(&config, filter, *deployments, *show_keys),
        Commands::Pirate {
            endpoint,
            model,
            command,
        } => commands::pirate::execute(&config, endpoint.as_deref(), model, command),
        Commands::Config { command } => commands::config::execute(command),
    }
}
