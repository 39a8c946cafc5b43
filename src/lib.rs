//! taskmap: a hierarchical task board.
//!
//! Tasks form an immutable forest of titled nodes. Every edit returns a new
//! forest that shares all untouched subtrees with the old one. The crate
//! enumerates root-to-leaf task chains for tabular views and sizes nodes for
//! a packed circle map.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    compute_layout, create_node, Forest, LayoutConfig, LayoutEngine, LayoutMetrics, LeafPath,
    Node, NodeId, NodeRef,
};
