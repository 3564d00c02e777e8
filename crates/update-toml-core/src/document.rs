//! The document handle.
//!
//! A [`TomlFile`] owns at most one parsed document. It starts out unloaded;
//! every operation except [`TomlFile::load`] fails with
//! [`TomlFileError::NotLoaded`] until a load succeeds.
//!
//! # Path resolution
//!
//! A path is walked one segment at a time from the document root. At each
//! step the current location must be a table (standard or inline) that
//! contains the segment as a key. Arrays, arrays of tables and scalars end the
//! walk with [`TomlFileError::NotATable`]; missing keys end it with
//! [`TomlFileError::PathNotFound`].

use crate::error::{Result, TomlFileError};
use crate::path::KeyPath;
use crate::storage::{FsStorage, Storage};
use crate::value::TomlValue;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Table, TableLike};

enum DocumentState {
    Unloaded,
    Loaded {
        source: PathBuf,
        document: DocumentMut,
    },
}

/// A TOML file addressed by dotted key paths.
///
/// # Examples
///
/// ```
/// use update_toml_core::{TomlFile, TomlValue};
/// use update_toml_core::storage::MemoryStorage;
///
/// let storage = MemoryStorage::new();
/// storage.insert("pyproject.toml", "[project]\nversion = \"0.0.1\"\n");
///
/// let mut file = TomlFile::with_storage(&storage);
/// file.load("pyproject.toml").unwrap();
/// file.update("project.version", "0.0.2").unwrap();
/// file.save().unwrap();
///
/// assert_eq!(file.get_value("project.version").unwrap(), TomlValue::from("0.0.2"));
/// assert_eq!(
///     storage.get("pyproject.toml").unwrap(),
///     "[project]\nversion = \"0.0.2\"\n"
/// );
/// ```
pub struct TomlFile<S = FsStorage> {
    storage: S,
    state: DocumentState,
}

impl TomlFile<FsStorage> {
    /// An unloaded handle backed by the filesystem.
    pub fn new() -> Self {
        Self::with_storage(FsStorage::default())
    }

    /// Create a filesystem-backed handle and load `source` into it.
    pub fn open(source: impl AsRef<Path>) -> Result<Self> {
        let mut file = Self::new();
        file.load(source)?;
        Ok(file)
    }
}

impl Default for TomlFile<FsStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Storage> TomlFile<S> {
    /// An unloaded handle backed by `storage`.
    pub fn with_storage(storage: S) -> Self {
        Self {
            storage,
            state: DocumentState::Unloaded,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, DocumentState::Loaded { .. })
    }

    /// Path the current document was loaded from.
    pub fn source(&self) -> Option<&Path> {
        match &self.state {
            DocumentState::Loaded { source, .. } => Some(source),
            DocumentState::Unloaded => None,
        }
    }

    /// Read and parse `source`, replacing any document loaded earlier.
    ///
    /// On failure the handle keeps whatever it held before.
    ///
    /// # Errors
    ///
    /// - [`TomlFileError::Read`] if the storage cannot produce the text
    /// - [`TomlFileError::Parse`] if the text is not valid TOML
    pub fn load(&mut self, source: impl AsRef<Path>) -> Result<()> {
        let source = source.as_ref();
        let content = self
            .storage
            .read_all(source)
            .map_err(|e| TomlFileError::Read {
                path: source.to_path_buf(),
                source: e,
            })?;

        let document = content
            .parse::<DocumentMut>()
            .map_err(|e| TomlFileError::Parse {
                path: source.to_path_buf(),
                source: e,
            })?;

        tracing::debug!(
            "Loaded {:?} ({} top-level keys)",
            source,
            document.as_table().len()
        );

        self.state = DocumentState::Loaded {
            source: source.to_path_buf(),
            document,
        };
        Ok(())
    }

    fn document(&self) -> Result<&DocumentMut> {
        match &self.state {
            DocumentState::Loaded { document, .. } => Ok(document),
            DocumentState::Unloaded => Err(TomlFileError::NotLoaded),
        }
    }

    fn document_mut(&mut self) -> Result<&mut DocumentMut> {
        match &mut self.state {
            DocumentState::Loaded { document, .. } => Ok(document),
            DocumentState::Unloaded => Err(TomlFileError::NotLoaded),
        }
    }

    /// The whole document as a table value.
    pub fn to_value(&self) -> Result<TomlValue> {
        Ok(TomlValue::from_table(self.document()?.as_table()))
    }

    /// Compact JSON rendering of the document.
    pub fn to_json(&self) -> Result<String> {
        Ok(self.to_value()?.to_json()?)
    }

    /// Indented JSON rendering of the document.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(self.to_value()?.to_json_pretty()?)
    }

    /// The TOML text [`save`](Self::save) would write.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(self.document()?.to_string())
    }

    /// Write the document back to the path it was loaded from.
    pub fn save(&self) -> Result<()> {
        match &self.state {
            DocumentState::Loaded { source, document } => self.write(source, document),
            DocumentState::Unloaded => Err(TomlFileError::NotLoaded),
        }
    }

    /// Write the document to `target`. The handle's source path is unchanged.
    pub fn save_as(&self, target: impl AsRef<Path>) -> Result<()> {
        let document = self.document()?;
        self.write(target.as_ref(), document)
    }

    fn write(&self, target: &Path, document: &DocumentMut) -> Result<()> {
        let content = document.to_string();
        self.storage
            .write_all(target, &content)
            .map_err(|e| TomlFileError::Write {
                path: target.to_path_buf(),
                source: e,
            })?;

        tracing::debug!("Saved {:?} ({} bytes)", target, content.len());
        Ok(())
    }

    /// Value at `path`.
    ///
    /// # Errors
    ///
    /// - [`TomlFileError::NotLoaded`] before a successful load
    /// - [`TomlFileError::InvalidPath`] for an empty path or empty segment
    /// - [`TomlFileError::PathNotFound`] / [`TomlFileError::NotATable`] if the
    ///   path does not resolve
    pub fn get_value(&self, path: &str) -> Result<TomlValue> {
        let document = self.document()?;
        let path = KeyPath::parse(path)?;
        let item = resolve(document.as_table(), &path)?;

        TomlValue::from_item(item).ok_or_else(|| {
            let last = path.segments().last().map(String::as_str).unwrap_or_default();
            TomlFileError::path_not_found(path.to_string(), last)
        })
    }

    /// Like [`get_value`](Self::get_value), but a path that does not resolve
    /// (or cannot be parsed) yields `Ok(None)`.
    pub fn get_value_safe(&self, path: &str) -> Result<Option<TomlValue>> {
        match self.get_value(path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_lookup_error() || matches!(e, TomlFileError::InvalidPath { .. }) => {
                tracing::trace!("Path {:?} did not resolve: {}", path, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Whether every segment of `path` resolves. The empty path never does.
    pub fn path_exists(&self, path: &str) -> Result<bool> {
        Ok(self.get_value_safe(path)?.is_some())
    }

    /// Set the value at `path`, inserting the final key if it is absent.
    ///
    /// Replacing an existing value keeps its surrounding whitespace and
    /// trailing comment.
    ///
    /// # Errors
    ///
    /// - [`TomlFileError::NotLoaded`] before a successful load
    /// - [`TomlFileError::InvalidPath`] if `path` has fewer than two segments
    /// - [`TomlFileError::PathNotFound`] / [`TomlFileError::NotATable`] if the
    ///   parent does not resolve to a table
    pub fn update(&mut self, path: &str, new_value: impl Into<TomlValue>) -> Result<()> {
        let document = self.document_mut()?;
        let path = KeyPath::parse(path)?;
        let (parents, key) = path.split_parent()?;
        let parent = resolve_table_mut(document.as_table_mut(), &path, parents)?;

        let new_value: TomlValue = new_value.into();
        let mut value = new_value.to_toml();
        match parent.get_mut(key) {
            Some(Item::Value(existing)) => {
                *value.decor_mut() = existing.decor().clone();
                *existing = value;
            }
            Some(item) => *item = Item::Value(value),
            None => {
                parent.insert(key, Item::Value(value));
            }
        }

        tracing::debug!("Updated {}", path);
        Ok(())
    }
}

/// Walk `segments` from `root`, requiring every step to land on a table.
fn resolve_table<'a>(
    root: &'a Table,
    path: &KeyPath,
    segments: &[String],
) -> Result<&'a dyn TableLike> {
    let mut current: &dyn TableLike = root;
    for segment in segments {
        let item = current
            .get(segment)
            .ok_or_else(|| TomlFileError::path_not_found(path.to_string(), segment.as_str()))?;
        current = item.as_table_like().ok_or_else(|| {
            TomlFileError::not_a_table(path.to_string(), segment.as_str(), item.type_name())
        })?;
    }
    Ok(current)
}

fn resolve_table_mut<'a>(
    root: &'a mut Table,
    path: &KeyPath,
    segments: &[String],
) -> Result<&'a mut dyn TableLike> {
    let mut current: &mut dyn TableLike = root;
    for segment in segments {
        let item = current
            .get_mut(segment)
            .ok_or_else(|| TomlFileError::path_not_found(path.to_string(), segment.as_str()))?;
        let kind = item.type_name();
        current = item.as_table_like_mut().ok_or_else(|| {
            TomlFileError::not_a_table(path.to_string(), segment.as_str(), kind)
        })?;
    }
    Ok(current)
}

fn resolve<'a>(root: &'a Table, path: &KeyPath) -> Result<&'a Item> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(TomlFileError::invalid_path(path.to_string(), "path is empty"));
    };

    let parent = resolve_table(root, path, parents)?;
    tracing::trace!("Resolved parent of {}", path);
    parent
        .get(last)
        .ok_or_else(|| TomlFileError::path_not_found(path.to_string(), last.as_str()))
}
