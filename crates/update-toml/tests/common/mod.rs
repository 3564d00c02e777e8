//! Common test utilities for CLI integration tests.
//!
//! Each test gets its own temporary directory, used as the working directory
//! of the spawned `update-toml` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub(crate) const PYPROJECT: &str = r#"[project]
name = "update_toml"
version = "0.0.1" # keep in sync with __init__.py
keywords = ["toml", "requirements", "update"]
license = {text = "MIT"}

[tool.poetry]
version = "0.0.1"
"#;

/// A scratch directory holding a `pyproject.toml`.
pub(crate) struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("pyproject.toml"), PYPROJECT)
            .expect("Failed to write pyproject.toml");
        Self { dir }
    }

    pub(crate) fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub(crate) fn write(&self, name: &str, content: &str) {
        std::fs::write(self.path(name), content).expect("Failed to write file");
    }

    pub(crate) fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("Failed to read file")
    }

    /// Run the binary with `args` inside the workspace.
    pub(crate) fn run(&self, args: &[&str]) -> Output {
        run_in(self.dir.path(), args)
    }
}

pub(crate) fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_update-toml"))
        .args(args)
        .current_dir(dir)
        .env_remove("UPDATE_TOML_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to spawn update-toml binary")
}

pub(crate) fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub(crate) fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
