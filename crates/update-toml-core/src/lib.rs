//! Dotted-path access to TOML documents.
//!
//! This crate provides the document model behind the `update-toml` CLI:
//!
//! - **[`TomlFile`]**: load a document, read and write values by path, save it back
//! - **[`KeyPath`]**: parsed `a.b.c` paths
//! - **[`TomlValue`]**: owned values returned by lookups and accepted by updates
//! - **[`Storage`]**: the read/write capability, with filesystem and in-memory
//!   implementations
//!
//! # Examples
//!
//! ```no_run
//! use update_toml_core::TomlFile;
//!
//! # fn main() -> update_toml_core::Result<()> {
//! let mut file = TomlFile::open("pyproject.toml")?;
//! println!("{:?}", file.get_value("project.version")?);
//!
//! file.update("project.version", "1.2.0")?;
//! file.save()?;
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod path;
pub mod storage;
pub mod value;

// Re-export commonly used types
pub use document::TomlFile;
pub use error::{Result, TomlFileError};
pub use path::KeyPath;
pub use storage::{FsStorage, MemoryStorage, Storage};
pub use value::TomlValue;
