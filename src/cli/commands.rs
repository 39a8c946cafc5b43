//! Command dispatch for the `taskmap` binary

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{format_table, render_map, render_tree, task_rows, TaskBoard};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::shell::Session;
use crate::config::{global_config_path, Settings};
use crate::domain::{create_node, Forest, LayoutEngine};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None | Some(Commands::Shell) => cmd_shell(load_settings(cli)?),
        Some(Commands::Demo) => cmd_demo(load_settings(cli)?),
        Some(Commands::Layout { children, depth }) => {
            cmd_layout(&load_settings(cli)?, *children, *depth)
        }
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cmd_config_show(&load_settings(cli)?),
            ConfigCommands::Path => cmd_config_path(cli.config.as_deref()),
            ConfigCommands::Init { stdout, force } => {
                cmd_config_init(cli.config.as_deref(), *stdout, *force)
            }
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = match cli.config.as_deref() {
        Some(path) => {
            if !path.exists() {
                output::warning(&format!("{} not found, using defaults", path.display()));
            }
            Settings::load_from(Some(path))?
        }
        None => Settings::load()?,
    };
    Ok(settings)
}

fn config_target(explicit: Option<&Path>) -> CliResult<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(global_config_path)
        .ok_or_else(|| CliError::Usage("cannot determine config directory, use --config".into()))
}

#[instrument(skip(settings))]
fn cmd_shell(settings: Settings) -> CliResult<()> {
    let mut session = Session::new(TaskBoard::new(settings));
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    debug!("shell: interactive={}", interactive);
    session.run(stdin.lock(), &mut io::stdout(), interactive)
}

/// Sample board with all three levels plus a bare top-level task.
pub fn demo_board(settings: Settings) -> TaskBoard {
    let mut board = TaskBoard::new(settings);
    let release = board.add_root(Some("Release 1.0"));
    if let Some(backend) = board.add_child(&release, Some("Backend")) {
        board.add_child(&backend, Some("API"));
        board.add_child(&backend, Some("Storage"));
        board.add_child(&backend, Some("Migrations"));
    }
    if let Some(frontend) = board.add_child(&release, Some("Frontend")) {
        board.add_child(&frontend, Some("Layout"));
    }
    board.add_child(&release, Some("Docs"));
    board.add_root(Some("Inbox"));
    board
}

#[instrument(skip(settings))]
fn cmd_demo(settings: Settings) -> CliResult<()> {
    let board = demo_board(settings);
    let labels = &board.settings().labels;

    output::header("Tree");
    output::info(&render_tree(board.forest(), labels));
    output::header("Tasks");
    output::info(&format_table(&task_rows(board.forest(), labels)));
    output::header("Map");
    output::info(&render_map(board.forest(), &board.layout_engine(), labels));
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_layout(settings: &Settings, children: usize, depth: usize) -> CliResult<()> {
    let parent = create_node(Some("node"));
    let parent_id = *parent.id();
    let forest = (0..children).fold(Forest::new().append_root(parent), |forest, _| {
        forest.append_child(&parent_id, None)
    });
    let node = forest
        .find(&parent_id)
        .ok_or_else(|| CliError::Usage("layout node vanished".into()))?;

    let metrics = LayoutEngine::new(settings.layout_config()).compute(node, depth);
    output::info(&format!("children: {children}"));
    output::info(&format!("depth:    {depth}"));
    output::info(&format!("size:     {}", metrics.size));
    output::info(&format!("columns:  {}", metrics.columns));
    output::info(&format!("rows:     {}", metrics.rows(children)));
    output::info(&format!("cell:     {}", metrics.child_max_size));
    Ok(())
}

fn cmd_config_show(settings: &Settings) -> CliResult<()> {
    output::info(&settings.to_toml()?);
    Ok(())
}

fn cmd_config_path(explicit: Option<&Path>) -> CliResult<()> {
    let path = config_target(explicit)?;
    let state = if path.exists() { "" } else { " (not found)" };
    output::info(&format!("{}{}", path.display(), state));
    Ok(())
}

fn cmd_config_init(explicit: Option<&Path>, stdout: bool, force: bool) -> CliResult<()> {
    if stdout {
        output::info(&Settings::template());
        return Ok(());
    }
    let path = config_target(explicit)?;
    write_template(&path, force)?;
    output::success(&format!("created {}", path.display()));
    Ok(())
}

/// Write the config template to `path`, creating parent directories.
pub fn write_template(path: &Path, force: bool) -> CliResult<()> {
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| CliError::io(format!("create {}", parent.display()), e))?;
    }
    std::fs::write(path, Settings::template())
        .map_err(|e| CliError::io(format!("write {}", path.display()), e))?;
    debug!("write_template: {}", path.display());
    Ok(())
}
