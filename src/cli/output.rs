//! Colored terminal output
//!
//! `colored` honors NO_COLOR, CLICOLOR and CLICOLOR_FORCE.

use std::fmt::Display;

use colored::Colorize;

/// `error: msg` on stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// `warning: msg` on stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Passing kind or finished command
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Kind with at least one violation
pub fn failure(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✗".red(), msg.to_string().red().bold());
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Uncolored data: trees, TOML, argument lists
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
