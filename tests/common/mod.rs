//! Common test utilities for service-packager integration tests.
//!
//! Provides `TestEnv` for isolated test environments whose settings and
//! config files live in a temporary directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
pub use tempfile::TempDir;

/// Environment variables that would leak the caller's configuration into tests.
const JSP_ENV_VARS: [&str; 5] = [
    "JSP_CONFIG",
    "JSP_SETTINGS_FILE_PATH",
    "JSP_HOST",
    "JSP_PORT",
    "RUST_LOG",
];

/// A test environment with an isolated working directory.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an empty directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the binary, run from the test directory with
    /// `JSP_*` variables cleared.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_service-packager"));
        cmd.current_dir(self.dir.path());
        for var in JSP_ENV_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get the path to the test directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the default settings file inside the test directory.
    pub fn settings_path(&self) -> PathBuf {
        self.dir.path().join("java-service-packager.settings.json")
    }

    /// Write the default settings file.
    pub fn write_settings(&self, content: &str) {
        std::fs::write(self.settings_path(), content).unwrap();
    }

    /// Read the default settings file as JSON.
    pub fn read_settings_json(&self) -> serde_json::Value {
        read_json(&self.settings_path())
    }

    /// Write a file relative to the test directory and return its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a file as JSON.
pub fn read_json(path: &Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}
