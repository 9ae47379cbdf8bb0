//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("contract violated: {violations} violation(s), {skipped} kind(s) skipped")]
    ContractFailed { violations: usize, skipped: usize },
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::ContractFailed { .. } => crate::exitcode::VIOLATED,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Configuration(_) => crate::exitcode::CONFIG,
                InfraError::Compiler { .. } => crate::exitcode::UNAVAILABLE,
                InfraError::Application(app) => match app {
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::SynthesisFailure(_) => crate::exitcode::DATAERR,
                    ApplicationError::Domain(_)
                    | ApplicationError::UnsupportedMutation { .. }
                    | ApplicationError::ToolkitInternal { .. } => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}
