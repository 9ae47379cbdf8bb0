//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Checks that every node mutator keeps parent links and emits change events
#[derive(Parser, Debug)]
#[command(name = "ast-contract")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding `.ast-contract.toml` (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the mutation contract over node kinds
    Verify {
        /// Kinds to verify (default: all verifiable kinds)
        kinds: Vec<String>,

        /// Show every mutator trial, not only failures
        #[arg(short, long)]
        verbose: bool,
    },

    /// List registered kinds and their mutators
    Kinds {
        /// Include each mutator's parameter type
        #[arg(short, long)]
        mutators: bool,
    },

    /// Synthesize a value for a type descriptor, e.g. `Set<ModifierKind>`
    Synth {
        descriptor: String,
    },

    /// Print or run the batch compiler command line
    Compile {
        /// Source files or directories
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        sources: Vec<PathBuf>,

        /// Class path entries
        #[arg(long = "cp", value_delimiter = ',')]
        classpath: Vec<String>,

        /// Print the arguments instead of running the compiler
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Print a commented template
    Template,
}
