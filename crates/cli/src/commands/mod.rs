//! Subcommand implementations.

pub mod fixtures;
pub mod prompt;
pub mod run;
