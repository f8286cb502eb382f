use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "actionrule")]
#[command(author, version, about = "Declarative management of Azure Monitor action rules")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to state file (defaults to actionrule-state.json next to the config)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Show which declared rules would be created, updated or dropped from state
    Plan,

    /// Create and update declared rules, recording the result in state
    Apply,

    /// Re-read tracked rules; rules deleted remotely leave the state
    Refresh,

    /// Read one action rule and print it as JSON
    Show {
        /// Full resource ID of the action rule
        #[arg(required = true)]
        id: String,
    },

    /// Start tracking an existing action rule
    Import {
        /// Full resource ID of the action rule
        #[arg(required = true)]
        id: String,
    },

    /// Delete tracked rules
    Destroy {
        /// Only delete this rule (name or resource_group/name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Display version information
    Version,
}
