use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration files
    Validate,

    /// Show effective configuration after merging all sources
    Show,
}

#[derive(Subcommand, Debug)]
pub enum PirateCommands {
    /// Create the pirate agent
    Create,

    /// List agents in the project
    List,

    /// Send a test message to an agent
    Test {
        /// Agent name
        name: String,

        /// Message to send
        #[arg(short, long, default_value = "Ahoy! Tell me about yerself.")]
        message: String,
    },

    /// Delete an agent by ID
    Delete {
        /// Agent ID
        id: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "foundry-agent")]
#[command(about = "Create, test and manage Azure AI Foundry prompt agents", long_about = None)]
#[command(version = env!("FOUNDRY_AGENT_VERSION"))]
#[command(after_help = "\
EXAMPLES:
  foundry-agent create agents/pirate.md              Create an agent from a definition
  foundry-agent create agents/pirate.md --test       Create, then send a test message
  foundry-agent test agents/pirate.agent.txt         Chat with a created agent
  foundry-agent discover --deployments               Show resources, projects and models

For details about a specific command, use:
  foundry-agent <command> --help")]
pub struct Cli {
    /// Show debug logs of every az and API call
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an agent from a definition file
    #[command(long_about = "Create an agent from a definition file.\n\n\
        Walks through project and model deployment selection, offers to deploy\n\
        the model named in the definition when it is missing, creates and\n\
        verifies the agent, then writes <file>.agent.txt next to the definition.")]
    Create(CreateCmd),

    /// Chat with an agent interactively
    #[command(long_about = "Chat with an agent interactively.\n\n\
        Pass either an agent name and project endpoint, or the .agent.txt\n\
        file written by 'create'. Type 'exit' or 'quit' (or press Ctrl-D) to end.")]
    Test(TestCmd),

    /// List agents in a project
    List {
        /// Project endpoint (defaults to AZURE_AI_PROJECT_ENDPOINT)
        #[arg(long, env = "AZURE_AI_PROJECT_ENDPOINT")]
        endpoint: Option<String>,
    },

    /// Delete an agent by ID
    Delete {
        /// Agent ID
        id: String,

        /// Project endpoint (defaults to AZURE_AI_PROJECT_ENDPOINT)
        #[arg(long, env = "AZURE_AI_PROJECT_ENDPOINT")]
        endpoint: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show Azure AI resources, projects and their endpoints
    Discover {
        /// Only show resources or projects whose name contains this
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Also list model deployments of each resource
        #[arg(long)]
        deployments: bool,

        /// Also print each resource's API key
        #[arg(long)]
        show_keys: bool,
    },

    /// Hosted pirate example agent
    Pirate {
        /// Project endpoint
        #[arg(long, env = "AZURE_AI_PROJECT_ENDPOINT", global = true)]
        endpoint: Option<String>,

        /// Model deployment name
        #[arg(long, env = "MODEL_NAME", default_value = "gpt-4o-mini", global = true)]
        model: String,

        #[command(subcommand)]
        command: PirateCommands,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Parser, Debug)]
pub struct CreateCmd {
    /// Agent definition file (YAML frontmatter + instructions)
    pub file: PathBuf,

    /// Only consider resources/projects whose name contains this
    #[arg(short, long, default_value = "")]
    pub filter: String,

    /// Send a test message after creation
    #[arg(long)]
    pub test: bool,

    /// Skip the final confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct TestCmd {
    /// Agent name, or path to a .agent.txt file
    pub target: String,

    /// Project endpoint (required with an agent name)
    pub endpoint: Option<String>,
}
