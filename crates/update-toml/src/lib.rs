//! Command-line front end for `update-toml-core`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use cli::{Cli, Command, VersionPart};
pub use commands::Outcome;
pub use config::Config;
pub use error::{CliError, Result};
