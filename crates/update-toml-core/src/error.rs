use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, querying, updating or saving a TOML document.
///
/// Lookup failures come in two shapes, [`TomlFileError::PathNotFound`] and
/// [`TomlFileError::NotATable`]; use [`TomlFileError::is_lookup_error`] when the
/// distinction does not matter.
///
/// # Examples
///
/// ```
/// use update_toml_core::error::{Result, TomlFileError};
///
/// fn version(found: Option<&str>) -> Result<String> {
///     found
///         .map(str::to_string)
///         .ok_or_else(|| TomlFileError::path_not_found("project.version", "version"))
/// }
///
/// let err = version(None).unwrap_err();
/// assert!(err.is_lookup_error());
/// ```
#[derive(Error, Debug)]
pub enum TomlFileError {
    /// An operation other than `load` was called before a document was loaded.
    #[error("no document loaded")]
    NotLoaded,

    /// A path segment does not exist in the mapping it was looked up in.
    #[error("path '{path}' not found: no key '{segment}'")]
    PathNotFound { path: String, segment: String },

    /// A path descends through a value that is not a table.
    #[error("path '{path}' cannot be resolved: '{segment}' is {kind}, not a table")]
    NotATable {
        path: String,
        segment: String,
        kind: &'static str,
    },

    /// The path string is malformed, or too short for the requested operation.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file contents are not valid TOML.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    /// The document could not be serialized to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, TomlFileError>;

impl TomlFileError {
    /// Create a path-not-found error.
    pub fn path_not_found(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::PathNotFound {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Create a not-a-table error for `segment`, whose value has type `kind`.
    pub fn not_a_table(
        path: impl Into<String>,
        segment: impl Into<String>,
        kind: &'static str,
    ) -> Self {
        Self::NotATable {
            path: path.into(),
            segment: segment.into(),
            kind,
        }
    }

    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors meaning "nothing lives at this path".
    pub fn is_lookup_error(&self) -> bool {
        matches!(self, Self::PathNotFound { .. } | Self::NotATable { .. })
    }
}
