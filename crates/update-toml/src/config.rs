use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use update_toml_core::storage::{FsStorage, LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, Storage};
use update_toml_core::TomlFile;

/// Root configuration for the update-toml CLI.
///
/// Read from a TOML file passed with `--config` (or `UPDATE_TOML_CONFIG`).
/// All fields use sensible defaults if not specified, and command-line flags
/// take precedence.
///
/// # Examples
///
/// ```
/// use update_toml::config::Config;
///
/// let json = r#"{
///     "file": "Cargo.toml",
///     "json": { "pretty": false }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.file.to_str(), Some("Cargo.toml"));
/// assert!(!config.json.pretty);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_file")]
    pub file: PathBuf,
    #[serde(default)]
    pub json: JsonConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: default_file(),
            json: JsonConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// JSON output settings.
///
/// # Defaults
///
/// - `pretty`: `true`
#[derive(Debug, Clone, Deserialize)]
pub struct JsonConfig {
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// File size limits applied when reading documents.
///
/// # Defaults
///
/// - `max_file_size`: `10_000_000` (10MB), files above this are rejected
/// - `large_file_warning`: `1_000_000` (1MB), files above this log a warning
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_large_file_warning")]
    pub large_file_warning: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            large_file_warning: default_large_file_warning(),
        }
    }
}

// Default value functions
const fn default_true() -> bool {
    true
}

fn default_file() -> PathBuf {
    PathBuf::from("pyproject.toml")
}

const fn default_max_file_size() -> u64 {
    MAX_FILE_SIZE
}

const fn default_large_file_warning() -> u64 {
    LARGE_FILE_THRESHOLD
}

impl Config {
    /// Load from `path`, or return the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] if the file cannot be read, is not valid
    /// TOML, or has fields of the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(FsStorage::default(), path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path` through `storage`.
    pub fn load_from<S: Storage>(storage: S, path: &Path) -> Result<Self> {
        let mut file = TomlFile::with_storage(storage);
        file.load(path)
            .map_err(|e| CliError::config(path, e.to_string()))?;

        let json = file
            .to_value()
            .and_then(|value| Ok(value.to_json_value()?))
            .map_err(|e| CliError::config(path, e.to_string()))?;
        let config: Self =
            serde_json::from_value(json).map_err(|e| CliError::config(path, e.to_string()))?;

        tracing::debug!("Loaded config from {:?}", path);
        Ok(config.validated())
    }

    fn validated(mut self) -> Self {
        if self.limits.large_file_warning > self.limits.max_file_size {
            tracing::warn!(
                "large_file_warning ({}) exceeds max_file_size ({}), lowering it",
                self.limits.large_file_warning,
                self.limits.max_file_size
            );
            self.limits.large_file_warning = self.limits.max_file_size;
        }
        self
    }

    /// Filesystem storage honouring the configured limits.
    pub fn storage(&self) -> FsStorage {
        FsStorage::with_limits(self.limits.max_file_size, self.limits.large_file_warning)
    }
}
