//! CLI module
//!
//! Command-line interface for querying organization networks.
//!
//! # Commands
//!
//! - `networks` - Page, deduplicate and report the networks of an organization
//! - `check` - Open and close a session
//! - `config` - Print the effective settings

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;

#[cfg(test)]
mod tests;
