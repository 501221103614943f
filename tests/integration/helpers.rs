//! Shared test helpers for integration tests.

#![allow(dead_code, clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

/// A throwaway deployment: working directory plus plugin directory.
pub struct TestHost {
    /// Working directory the binary runs in
    pub dir: TempDir,
}

/// Captured process result
pub struct TestOutput {
    /// Exit success
    pub success: bool,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl TestOutput {
    /// Parse stdout as JSON
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }
}

impl From<Output> for TestOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl TestHost {
    /// Create an empty deployment
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir(dir.path().join("plugins")).expect("Failed to create plugins dir");
        Self { dir }
    }

    /// Plugin directory path
    pub fn plugins_dir(&self) -> PathBuf {
        self.dir.path().join("plugins")
    }

    /// Add a plugin package with the given manifest
    pub fn add_package(&self, name: &str, manifest: &str) -> &Self {
        let package = self.plugins_dir().join(name);
        std::fs::create_dir_all(&package).expect("Failed to create package dir");
        std::fs::write(package.join("plugin.toml"), manifest).expect("Failed to write manifest");
        self
    }

    /// Write `config/default.toml`
    pub fn write_config(&self, content: &str) -> &Self {
        let config_dir = self.dir.path().join("config");
        std::fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        std::fs::write(config_dir.join("default.toml"), content).expect("Failed to write config");
        self
    }

    /// Run the binary against this deployment
    pub fn run(&self, args: &[&str]) -> TestOutput {
        self.run_with_env(args, &[])
    }

    /// Run the binary with extra environment variables
    pub fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> TestOutput {
        run_in(self.dir.path(), &self.plugins_dir(), args, env)
    }
}

fn run_in(cwd: &Path, plugins_dir: &Path, args: &[&str], env: &[(&str, &str)]) -> TestOutput {
    Command::new(env!("CARGO_BIN_EXE_shipdeck"))
        .current_dir(cwd)
        .env_remove("SHIPDECK_ENV")
        .env("RUST_LOG", "warn")
        .envs(env.iter().copied())
        .arg("--plugins-dir")
        .arg(plugins_dir)
        .args(args)
        .output()
        .expect("Failed to run shipdeck binary")
        .into()
}
