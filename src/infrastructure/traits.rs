//! I/O boundary traits for testability
//!
//! External processes are reached through these traits so tests can
//! substitute recording fakes.

use std::io;
use std::process::Output;

/// Runs external commands.
pub trait CommandRunner: Send + Sync {
    /// Run a command with arguments and capture its output.
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output>;
}

/// Real command runner using std::process.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        std::process::Command::new(cmd).args(args).output()
    }
}
