//! Domain layer: the task forest and its layout geometry
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod forest;
pub mod id;
pub mod layout;
pub mod node;
pub mod traverse;

pub use error::{DomainError, DomainResult};
pub use forest::{update_node, Forest};
pub use id::NodeId;
pub use layout::{compute_layout, LayoutConfig, LayoutEngine, LayoutMetrics, NodeLayout};
pub use node::{create_node, Node, NodeRef, DEFAULT_NODE_TITLE};
pub use traverse::{LeafPath, LeafPaths, Nodes};
