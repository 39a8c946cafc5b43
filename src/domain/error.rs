//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid input to the task model.
///
/// Addressing a node that is not in the forest is not an error: queries
/// return `None` and mutations return the forest unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid node id: {0}")]
    InvalidNodeId(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
