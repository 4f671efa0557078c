//! Shared testing utilities for cohctl CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated config directory for CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        Self { root }
    }

    pub fn config_dir(&self) -> &Path {
        self.root.path()
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.path().join("cohctl.yaml")
    }

    /// Build a command for the compiled `cohctl` binary using this config directory.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("cohctl").expect("Failed to locate cohctl binary");
        cmd.arg("--config-dir").arg(self.config_dir()).env("HOME", self.config_dir());
        cmd
    }

    /// Write a config holding one connection, `local`, as the current context.
    pub fn with_connection(&self, url: &str) {
        let content = format!(
            r#"version: "{}"
currentContext: local
clusters:
  - name: local
    discoveryType: manual
    connectionType: http
    connectionUrl: {url}
    clusterName: cluster1
    clusterVersion: 22.06.7
"#,
            env!("CARGO_PKG_VERSION")
        );
        fs::write(self.config_file(), content).expect("Failed to write config");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_file()).expect("Failed to read config")
    }
}
