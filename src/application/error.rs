//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, KindId, TypeDescriptor};

/// Application errors wrap domain errors and add run-level context.
///
/// Contract violations are not errors: they are collected into the report.
/// These variants abort a run.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("no value can be synthesized for {0}")]
    SynthesisFailure(TypeDescriptor),

    #[error("{kind}.{mutator}: unsupported operation on a mutator not declared unsettable: {detail}")]
    UnsupportedMutation {
        kind: KindId,
        mutator: String,
        detail: String,
    },

    #[error("{kind}.{mutator}: toolkit internal error")]
    ToolkitInternal {
        kind: KindId,
        mutator: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
