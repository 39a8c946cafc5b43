//! Line-oriented command shell over a [`TaskBoard`].
//!
//! Each input line is one command. Nodes are addressed by position path
//! (`2.1.3`) or id prefix; words are split with shell quoting rules.

use std::io::{BufRead, Write};

use tracing::{debug, instrument};

use crate::application::{
    format_table, render_focus, render_map, render_overview, render_task, render_tree, task_rows,
    Focus, TaskBoard,
};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::domain::NodeId;

pub const HELP: &str = "\
commands:
  root [title]              add a top-level task
  child <node> [title]      add a task under <node>
  after <node> [title]      add a task right after <node>
  rename <node> <title>     change a title
  select <node>             select a top-level task
  show <root> [<middle>]    show a top-level task or one of its middle tasks
  tree                      print all tasks as a tree
  table                     print one numbered row per task chain
  open <row>                print the task at the end of a table row
  map                       print the node map with sizes
  layout <node>             print the layout metrics of <node>
  help                      this text
  quit                      leave the shell

<node> is a position like 2.1.3 or an id prefix.
Quote titles with '...' or \"...\" to keep spaces or a leading #.";

/// A parsed shell command; node references are still unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Root { title: Option<String> },
    Child { node: String, title: Option<String> },
    After { node: String, title: Option<String> },
    Rename { node: String, title: String },
    Select { node: String },
    Show { root: String, middle: Option<String> },
    Tree,
    Table,
    Open { row: usize },
    Map,
    Layout { node: String },
    Help,
    Quit,
}

/// Split a line into words with shell quoting; an unquoted `#` word
/// starts a comment.
fn tokenize(line: &str) -> CliResult<Vec<String>> {
    shell_words::split(line).map_err(|e| CliError::InvalidArgs(e.to_string()))
}

/// Remaining words as one title; `None` when there are none.
fn title_of(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn node_arg(command: &str, words: &[String]) -> CliResult<String> {
    words
        .first()
        .cloned()
        .ok_or_else(|| CliError::InvalidArgs(format!("{command}: missing <node>")))
}

fn no_args(command: &str, words: &[String], parsed: ShellCommand) -> CliResult<ShellCommand> {
    if words.is_empty() {
        Ok(parsed)
    } else {
        Err(CliError::InvalidArgs(format!(
            "{command}: unexpected argument '{}'",
            words[0]
        )))
    }
}

/// Parse one input line; blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> CliResult<Option<ShellCommand>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let tokens = tokenize(trimmed)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match name.as_str() {
        "root" => ShellCommand::Root {
            title: title_of(args),
        },
        "child" => ShellCommand::Child {
            node: node_arg(name, args)?,
            title: title_of(&args[1..]),
        },
        "after" => ShellCommand::After {
            node: node_arg(name, args)?,
            title: title_of(&args[1..]),
        },
        "rename" => {
            let node = node_arg(name, args)?;
            let title = title_of(&args[1..])
                .ok_or_else(|| CliError::InvalidArgs("rename: missing <title>".into()))?;
            ShellCommand::Rename { node, title }
        }
        "select" => ShellCommand::Select {
            node: node_arg(name, args)?,
        },
        "show" => {
            let root = node_arg(name, args)?;
            if args.len() > 2 {
                return Err(CliError::InvalidArgs(format!(
                    "show: unexpected argument '{}'",
                    args[2]
                )));
            }
            ShellCommand::Show {
                root,
                middle: args.get(1).cloned(),
            }
        }
        "open" => {
            let raw = args
                .first()
                .ok_or_else(|| CliError::InvalidArgs("open: missing <row>".into()))?;
            let row = raw
                .parse::<usize>()
                .ok()
                .filter(|row| *row > 0)
                .ok_or_else(|| CliError::InvalidArgs(format!("open: invalid row '{raw}'")))?;
            no_args(name, &args[1..], ShellCommand::Open { row })?
        }
        "layout" => ShellCommand::Layout {
            node: node_arg(name, args)?,
        },
        "tree" => no_args(name, args, ShellCommand::Tree)?,
        "table" => no_args(name, args, ShellCommand::Table)?,
        "map" => no_args(name, args, ShellCommand::Map)?,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => {
            return Err(CliError::Usage(format!(
                "unknown command '{other}', try 'help'"
            )))
        }
    };
    Ok(Some(command))
}

/// What the shell does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Interactive session holding the board being edited.
#[derive(Debug, Default)]
pub struct Session {
    board: TaskBoard,
}

impl Session {
    pub fn new(board: TaskBoard) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    fn describe(&self, id: &NodeId) -> String {
        let position = self.board.position_of(id).unwrap_or_default();
        match self.board.forest().find(id) {
            Some(node) => format!("{} {}", position, node),
            None => position,
        }
    }

    fn added(&self, id: NodeId) -> Reply {
        Reply::Text(output::success_line(&format!("added {}", self.describe(&id))))
    }

    fn overview(&self) -> String {
        render_overview(
            self.board.forest(),
            self.board.selected_root().map(|root| root.id()),
            &self.board.settings().labels,
        )
    }

    /// Apply one command to the board.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, command: ShellCommand) -> CliResult<Reply> {
        let labels = self.board.settings().labels.clone();
        let reply = match command {
            ShellCommand::Root { title } => {
                let id = self.board.add_root(title.as_deref());
                self.added(id)
            }
            ShellCommand::Child { node, title } => {
                let parent = self.board.resolve(&node)?;
                let id = self
                    .board
                    .add_child(&parent, title.as_deref())
                    .ok_or_else(|| CliError::Usage(format!("cannot add below '{node}'")))?;
                self.added(id)
            }
            ShellCommand::After { node, title } => {
                let anchor = self.board.resolve(&node)?;
                let id = self
                    .board
                    .add_sibling_after(&anchor, title.as_deref())
                    .ok_or_else(|| CliError::Usage(format!("cannot add after '{node}'")))?;
                self.added(id)
            }
            ShellCommand::Rename { node, title } => {
                let id = self.board.resolve(&node)?;
                self.board.rename(&id, &title);
                Reply::Text(output::success_line(&format!(
                    "renamed {}",
                    self.describe(&id)
                )))
            }
            ShellCommand::Select { node } => {
                let id = self.board.resolve(&node)?;
                if !self.board.select_root(&id) {
                    return Err(CliError::Usage(format!("'{node}' is not a top-level task")));
                }
                Reply::Text(self.overview())
            }
            ShellCommand::Show { root, middle } => {
                let root_id = self.board.resolve(&root)?;
                let Some(middle) = middle else {
                    if !self.board.select_root(&root_id) {
                        return Err(CliError::Usage(format!(
                            "'{root}' is not a top-level task"
                        )));
                    }
                    return Ok(Reply::Text(self.overview()));
                };
                let middle_id = self.board.resolve(&middle)?;
                self.show(&root_id, &middle_id)
            }
            ShellCommand::Tree => Reply::Text(
                render_tree(self.board.forest(), &labels).to_string(),
            ),
            ShellCommand::Table => Reply::Text(format_table(&task_rows(
                self.board.forest(),
                &labels,
            ))),
            ShellCommand::Open { row } => {
                let rows = task_rows(self.board.forest(), &labels);
                let task = row
                    .checked_sub(1)
                    .and_then(|idx| rows.get(idx))
                    .map(|found| found.task)
                    .ok_or_else(|| {
                        CliError::Usage(format!("no row {row}, the table has {}", rows.len()))
                    })?;
                Reply::Text(render_task(self.board.forest(), &task, &labels))
            }
            ShellCommand::Map => Reply::Text(
                render_map(self.board.forest(), &self.board.layout_engine(), &labels)
                    .to_string(),
            ),
            ShellCommand::Layout { node } => {
                let id = self.board.resolve(&node)?;
                let forest = self.board.forest();
                let (Some(found), Some(depth)) = (forest.find(&id), forest.depth_of(&id)) else {
                    return Err(CliError::Usage(format!("no task at '{node}'")));
                };
                let metrics = self.board.layout_engine().compute(found, depth);
                Reply::Text(format!(
                    "{}: depth {}, size {}, columns {}, rows {}, cell {}",
                    self.describe(&id),
                    depth,
                    metrics.size,
                    metrics.columns,
                    metrics.rows(found.children().len()),
                    metrics.child_max_size
                ))
            }
            ShellCommand::Help => Reply::Text(HELP.to_string()),
            ShellCommand::Quit => Reply::Quit,
        };
        Ok(reply)
    }

    fn show(&mut self, root_id: &NodeId, middle_id: &NodeId) -> Reply {
        let labels = self.board.settings().labels.clone();
        let text = match self.board.focus(root_id, middle_id) {
            Focus::Show { root, middle } => {
                render_focus(self.board.forest(), &root, &middle, &labels)
            }
            Focus::Redirect { root, middle } => {
                debug!("show: redirecting to first middle task");
                let mut text =
                    String::from("(not a middle task there, showing the first one)\n");
                text.push_str(&render_focus(self.board.forest(), &root, &middle, &labels));
                text
            }
            Focus::Overview { selected_root } => {
                if let Some(root) = selected_root {
                    self.board.select_root(&root);
                }
                self.overview()
            }
        };
        Reply::Text(text)
    }

    /// Read commands from `input` until EOF or `quit`, writing replies to
    /// `out`. Command errors are reported and the loop continues.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W, prompt: bool) -> CliResult<()> {
        let write_err = |e: std::io::Error| CliError::io("write shell output", e);
        let mut lines = input.lines();
        loop {
            if prompt {
                write!(out, "{}", output::prompt_text("taskmap>")).map_err(write_err)?;
                out.flush().map_err(write_err)?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.map_err(|e| CliError::io("read shell input", e))?;

            let reply = parse_line(&line).and_then(|parsed| match parsed {
                Some(command) => self.execute(command).map(Some),
                None => Ok(None),
            });
            match reply {
                Ok(Some(Reply::Text(text))) => {
                    writeln!(out, "{}", text.trim_end()).map_err(write_err)?
                }
                Ok(Some(Reply::Quit)) => break,
                Ok(None) => {}
                Err(e) => output::error(&e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn words(line: &str) -> Vec<String> {
        tokenize(line).expect("tokenize")
    }

    #[test]
    fn given_quoted_words_when_tokenizing_then_grouped() {
        assert_eq!(
            words(r#"child 1 "Buy  milk" now"#),
            vec!["child", "1", "Buy  milk", "now"]
        );
        assert_eq!(words(r#"rename 1 """#), vec!["rename", "1", ""]);
        assert_eq!(words(r#"root "say \"hi\"""#), vec!["root", r#"say "hi""#]);
        assert_eq!(words(r#"root 'say "hi"'"#), vec!["root", r#"say "hi""#]);
        assert_eq!(words(r#"root Fix\ it"#), vec!["root", "Fix it"]);
        assert_eq!(words(r#"root "Issue #42""#), vec!["root", "Issue #42"]);
    }

    #[test]
    fn given_open_quote_when_tokenizing_then_invalid_args() {
        assert!(matches!(
            tokenize(r#"root "open"#),
            Err(CliError::InvalidArgs(_))
        ));
    }

    #[rstest]
    #[case("", None)]
    #[case("   # comment", None)]
    #[case("root", Some(ShellCommand::Root { title: None }))]
    #[case("root Plan the trip", Some(ShellCommand::Root { title: Some("Plan the trip".into()) }))]
    #[case("child 1.2 \"Book hotel\"", Some(ShellCommand::Child { node: "1.2".into(), title: Some("Book hotel".into()) }))]
    #[case("after 1", Some(ShellCommand::After { node: "1".into(), title: None }))]
    #[case("rename 2 Done", Some(ShellCommand::Rename { node: "2".into(), title: "Done".into() }))]
    #[case("show 1", Some(ShellCommand::Show { root: "1".into(), middle: None }))]
    #[case("show 1 1.2", Some(ShellCommand::Show { root: "1".into(), middle: Some("1.2".into()) }))]
    #[case("layout 1", Some(ShellCommand::Layout { node: "1".into() }))]
    #[case("map", Some(ShellCommand::Map))]
    #[case("open 3", Some(ShellCommand::Open { row: 3 }))]
    #[case("exit", Some(ShellCommand::Quit))]
    fn given_line_when_parsing_then_command(
        #[case] line: &str,
        #[case] expected: Option<ShellCommand>,
    ) {
        assert_eq!(parse_line(line).expect("parse"), expected);
    }

    #[rstest]
    #[case("child")]
    #[case("rename 1")]
    #[case("tree now")]
    #[case("show 1 2 3")]
    #[case("open")]
    #[case("open 0")]
    #[case("open first")]
    #[case("open 1 2")]
    fn given_missing_or_extra_args_when_parsing_then_invalid_args(#[case] line: &str) {
        assert!(matches!(parse_line(line), Err(CliError::InvalidArgs(_))));
    }

    #[test]
    fn given_unknown_command_when_parsing_then_usage_error() {
        assert!(matches!(parse_line("delete 1"), Err(CliError::Usage(_))));
    }

    #[test]
    fn given_script_when_running_then_board_built_and_errors_skipped() {
        let script = "root Trip\nchild 1 Travel\nchild 9.1 Lost\nchild 1.1 \"Book train\"\ntable\nquit\nroot Ignored\n";
        let mut session = Session::default();
        let mut out = Vec::new();

        session
            .run(script.as_bytes(), &mut out, false)
            .expect("run");

        let forest = session.board().forest();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest.node_count(), 3);
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("Travel | Book train"));
    }

    #[test]
    fn given_middle_of_other_root_when_showing_then_redirects() {
        let mut session = Session::default();
        for line in ["root A", "child 1 A1", "root B", "child 2 B1"] {
            let command = parse_line(line).expect("parse").expect("command");
            session.execute(command).expect("execute");
        }

        let reply = session
            .execute(ShellCommand::Show {
                root: "1".into(),
                middle: Some("2.1".into()),
            })
            .expect("show");

        let Reply::Text(text) = reply else {
            panic!("expected text");
        };
        assert!(text.contains("A / A1"));
    }
}
