//! Application layer: the task board and its text presentation
//!
//! This layer drives the domain forest and turns it into screens, tables and trees.

pub mod board;
pub mod error;
pub mod navigation;
pub mod render;

pub use board::TaskBoard;
pub use error::{ApplicationError, ApplicationResult};
pub use navigation::{reconcile_selection, resolve_focus, Focus};
pub use render::{
    display_title, format_table, render_focus, render_map, render_overview, render_task, render_tree,
    task_rows, TaskRow, ToTermTree,
};
