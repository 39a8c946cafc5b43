//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Hierarchical task board: top-level tasks, middle tasks and leaf tasks
#[derive(Parser, Debug)]
#[command(name = "taskmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Raise log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: global taskmap.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Edit a task board interactively (default)
    Shell,

    /// Print tree, table and map of a sample board
    Demo,

    /// Size a node with N childless children
    Layout {
        /// Number of children
        #[arg(long, default_value_t = 5)]
        children: usize,
        /// Depth the node is placed at
        #[arg(long, default_value_t = 0)]
        depth: usize,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config path
    Path,

    /// Create config template
    Init {
        /// Print the template instead of writing it
        #[arg(long)]
        stdout: bool,
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}
