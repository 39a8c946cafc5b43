//! CLI layer: argument parsing, command dispatch and the task shell

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod shell;

pub use args::{Cli, Commands, ConfigCommands};
pub use commands::execute_command;
pub use error::{CliError, CliResult};
pub use shell::{parse_line, Reply, Session, ShellCommand};
