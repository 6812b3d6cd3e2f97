//! CLI layer for sitesift.
//!
//! Provides the command-line interface using clap, with commands for
//! running searches and inspecting the search history.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
