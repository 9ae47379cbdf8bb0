//! Application layer: synthesis and contract verification
//!
//! This layer drives the domain model; it performs no I/O of its own.

pub mod error;
pub mod report;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use report::{
    ContractViolation, KindReport, MutatorTrial, TrialOutcome, VerificationReport, ViolationKind,
};
pub use services::{RunScope, Synthesizer, Verifier};
