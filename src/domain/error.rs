//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::model::NodeId;
use crate::domain::role::Role;

/// Domain errors represent violations of the tree model itself.
/// These are independent of how a verification run is driven.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("unknown node kind: {0}")]
    UnknownKind(String),

    #[error("node kind cannot be instantiated: {0}")]
    NotInstantiable(String),

    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("{role}: expected {expected}, found {found}")]
    ArgumentMismatch {
        role: Role,
        expected: String,
        found: String,
    },

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("invalid type descriptor {input:?}: {reason}")]
    InvalidDescriptor { input: String, reason: String },
}

/// Result type for model operations.
pub type DomainResult<T> = Result<T, DomainError>;
