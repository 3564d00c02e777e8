//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Read and update values in TOML files.
#[derive(Debug, Parser)]
#[command(name = "update-toml", version, about)]
pub struct Cli {
    /// TOML file to operate on [default: pyproject.toml, or `file` from the config]
    #[arg(short, long, global = true, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "UPDATE_TOML_CONFIG",
        value_name = "FILE"
    )]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the value at a path
    Get {
        /// Dotted key path, e.g. project.version
        #[arg(short, long)]
        path: String,

        /// Print strings JSON-encoded instead of bare
        #[arg(long)]
        json: bool,
    },

    /// Set the value at a path and save the file
    Update {
        /// Dotted key path with at least two segments
        #[arg(short, long)]
        path: String,

        /// New value, stored as a string unless --raw is given
        #[arg(long, allow_hyphen_values = true)]
        value: String,

        /// Parse the value as a TOML literal (42, true, ["a"], { x = 1 })
        #[arg(long)]
        raw: bool,

        /// Write the result here instead of back to the input file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Exit with status 0 if the path exists, 1 otherwise
    Exists {
        /// Dotted key path
        #[arg(short, long)]
        path: String,
    },

    /// Print the whole document as JSON
    Json {
        /// Single-line output
        #[arg(long)]
        compact: bool,
    },

    /// Increment a semantic version string and save the file
    Bump {
        /// Which part of the version to increment
        #[arg(value_enum)]
        part: VersionPart,

        /// Dotted key path of the version string
        #[arg(short, long, default_value = "project.version")]
        path: String,

        /// Write the result here instead of back to the input file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VersionPart {
    Major,
    Minor,
    Patch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update() {
        let cli = Cli::try_parse_from([
            "update-toml",
            "update",
            "--path",
            "project.version",
            "--value",
            "0.2.0",
        ])
        .unwrap();

        assert!(cli.file.is_none());
        match cli.command {
            Command::Update {
                path, value, raw, ..
            } => {
                assert_eq!(path, "project.version");
                assert_eq!(value, "0.2.0");
                assert!(!raw);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_file_after_subcommand() {
        let cli = Cli::try_parse_from(["update-toml", "get", "-p", "a.b", "-f", "Cargo.toml"])
            .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("Cargo.toml")));
    }

    #[test]
    fn test_negative_value() {
        let cli = Cli::try_parse_from([
            "update-toml",
            "update",
            "--path",
            "tool.offset",
            "--value",
            "-5",
            "--raw",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Update { ref value, .. } if value == "-5"));
    }

    #[test]
    fn test_bump_defaults() {
        let cli = Cli::try_parse_from(["update-toml", "bump", "minor"]).unwrap();
        match cli.command {
            Command::Bump { part, path, output } => {
                assert_eq!(part, VersionPart::Minor);
                assert_eq!(path, "project.version");
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_missing_subcommand() {
        assert!(Cli::try_parse_from(["update-toml"]).is_err());
    }
}
