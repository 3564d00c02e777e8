use std::path::PathBuf;
use thiserror::Error;
use update_toml_core::TomlFileError;

/// Process exit codes.
///
/// Usage errors exit with `2`, which clap reports itself before any of these
/// apply.
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    /// `exists` found nothing, or an unexpected failure.
    pub const FAILURE: u8 = 1;
    pub const IO: u8 = 3;
    pub const PARSE: u8 = 4;
    pub const PATH_NOT_FOUND: u8 = 5;
    pub const INVALID_PATH: u8 = 6;
    pub const NOT_LOADED: u8 = 7;
    pub const INVALID_VALUE: u8 = 8;
    pub const CONFIG: u8 = 9;
}

/// Error types for the update-toml CLI.
///
/// # Examples
///
/// ```
/// use update_toml::error::{CliError, exit_code};
/// use update_toml_core::TomlFileError;
///
/// let err: CliError = TomlFileError::path_not_found("project.name", "name").into();
/// assert_eq!(err.exit_code(), exit_code::PATH_NOT_FOUND);
/// ```
#[derive(Error, Debug)]
pub enum CliError {
    /// Document load, lookup, or save failure
    #[error(transparent)]
    Toml(#[from] TomlFileError),

    /// Configuration file could not be read or deserialized
    #[error("invalid config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// `--raw` value is not a TOML literal
    #[error("invalid TOML value '{value}': {source}")]
    InvalidValue {
        value: String,
        #[source]
        source: toml_edit::TomlError,
    },

    /// Value at the path is not a bumpable semantic version
    #[error("value at '{path}' is not a version: {message}")]
    InvalidVersion { path: String, message: String },

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to stdout failed
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid version error.
    pub fn invalid_version(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVersion {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Exit code reported for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Toml(err) => match err {
                TomlFileError::NotLoaded => exit_code::NOT_LOADED,
                TomlFileError::PathNotFound { .. } | TomlFileError::NotATable { .. } => {
                    exit_code::PATH_NOT_FOUND
                }
                TomlFileError::InvalidPath { .. } => exit_code::INVALID_PATH,
                TomlFileError::Read { .. } | TomlFileError::Write { .. } => exit_code::IO,
                TomlFileError::Parse { .. } => exit_code::PARSE,
                TomlFileError::Json(_) => exit_code::FAILURE,
            },
            Self::Config { .. } => exit_code::CONFIG,
            Self::InvalidValue { .. } | Self::InvalidVersion { .. } => exit_code::INVALID_VALUE,
            Self::Json(_) | Self::Output(_) => exit_code::FAILURE,
        }
    }
}
