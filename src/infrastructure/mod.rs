//! Infrastructure layer: compiler facade, process boundary and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod compiler;
pub mod di;
pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult};
