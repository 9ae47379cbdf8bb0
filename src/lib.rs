//! Parent-link and change-notification contract for a mutable AST model.
//!
//! The [`domain`] layer holds the node arena, the kind catalog and its
//! mutators. [`application`] synthesizes arguments and runs the contract.
//! [`infrastructure`] wires services together and drives the batch compiler.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
