//! Application services

pub mod synthesizer;
pub mod verifier;

pub use synthesizer::Synthesizer;
pub use verifier::{RunScope, Verifier};
