//! Dotted key paths.
//!
//! A path such as `tool.poetry.version` is a non-empty sequence of non-empty
//! segments joined by `.`. Segments are plain keys; there is no quoting and no
//! array indexing.

use crate::error::{Result, TomlFileError};
use std::fmt;
use std::str::FromStr;

/// Separator between path segments.
pub const DELIMITER: char = '.';

/// A parsed dotted key path.
///
/// # Examples
///
/// ```
/// use update_toml_core::KeyPath;
///
/// let path: KeyPath = "project.version".parse().unwrap();
/// assert_eq!(path.segments(), ["project", "version"]);
/// assert_eq!(path.to_string(), "project.version");
///
/// assert!("".parse::<KeyPath>().is_err());
/// assert!("project..version".parse::<KeyPath>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a dotted path.
    ///
    /// # Errors
    ///
    /// Returns [`TomlFileError::InvalidPath`] for the empty string and for any
    /// empty segment (leading, trailing or doubled delimiter).
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(TomlFileError::invalid_path(raw, "path is empty"));
        }

        let segments: Vec<String> = raw.split(DELIMITER).map(str::to_string).collect();
        if let Some(position) = segments.iter().position(String::is_empty) {
            return Err(TomlFileError::invalid_path(
                raw,
                format!("segment {} is empty", position + 1),
            ));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments; always at least 1.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Splits into the parent segments and the final key.
    ///
    /// # Errors
    ///
    /// Returns [`TomlFileError::InvalidPath`] when the path has a single
    /// segment: top-level keys have no parent to update through.
    pub fn split_parent(&self) -> Result<(&[String], &str)> {
        match self.segments.split_last() {
            Some((last, parents)) if !parents.is_empty() => Ok((parents, last.as_str())),
            _ => Err(TomlFileError::invalid_path(
                self.to_string(),
                "expected at least 2 segments, top-level keys cannot be updated",
            )),
        }
    }
}

impl FromStr for KeyPath {
    type Err = TomlFileError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", DELIMITER)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}
