//! Common test utilities for CLI testing.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};
use tscdoc_common_config::env::vars;
use tscdoc_common_log::{LOG_FILE_VAR, LOG_FORMAT_VAR, LOG_LEVEL_VAR};

pub const TOC: &str = "\
Crypto component tests
======================

.. toctree::
   :maxdepth: 1

";

/// Test project in a temporary directory
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config_path: PathBuf,
}

impl TestContext {
    /// Empty `tests/` and `spec/` trees with a Crypto TOC.
    pub fn new() -> Self {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("tscdoc.yaml");

        let ctx = Self {
            temp_dir,
            config_path,
        };
        ctx.write("spec/Crypto_component_test.rst", TOC);
        std::fs::create_dir_all(ctx.path().join("tests")).expect("Failed to create tests dir");
        ctx
    }

    /// Write the configuration file
    pub fn with_config(self, config: &str) -> Self {
        std::fs::write(&self.config_path, config).expect("Failed to write config");
        self
    }

    /// Configuration pointing at the project's own trees
    pub fn with_default_config(self) -> Self {
        self.with_config("component: Crypto\ntest_path: tests\nspec_path: spec\n")
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.path().join(rel);
        std::fs::create_dir_all(path.parent().expect("no parent")).expect("Failed to create dir");
        std::fs::write(path, contents).expect("Failed to write file");
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path().join(rel)).expect("Failed to read file")
    }

    /// A valid `.tsc` source under `tests/`
    pub fn source(&self, name: &str, requirements: &str) {
        self.write(
            &format!("tests/{name}.tsc"),
            &format!(
                "// Description\n// Checks {name}.\n// Input\n// None\n// Output\n// Pass\n// Requirements\n// {requirements}\n\nrun();\n"
            ),
        );
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("tscdoc").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove(vars::TSCDOC_CONFIG)
            .env_remove(LOG_LEVEL_VAR)
            .env_remove(LOG_FORMAT_VAR)
            .env_remove(LOG_FILE_VAR)
            .env_remove("RUST_LOG")
            .env(vars::NO_COLOR, "1"); // Disable colors for predictable output
        cmd
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert helpers for CLI output
pub trait OutputAssertions {
    fn assert_success(&self);
    fn assert_failure(&self);
    fn assert_stdout_contains(&self, text: &str);
    fn assert_stderr_contains(&self, text: &str);
    fn assert_exit_code(&self, code: i32);
}

impl OutputAssertions for Output {
    fn assert_success(&self) {
        assert!(
            self.status.success(),
            "Command failed with status: {}\nstderr: {}",
            self.status,
            String::from_utf8_lossy(&self.stderr)
        );
    }

    fn assert_failure(&self) {
        assert!(
            !self.status.success(),
            "Command succeeded unexpectedly\nstdout: {}",
            String::from_utf8_lossy(&self.stdout)
        );
    }

    fn assert_stdout_contains(&self, text: &str) {
        let stdout = String::from_utf8_lossy(&self.stdout);
        assert!(
            stdout.contains(text),
            "stdout did not contain '{}'\nstdout: {}",
            text,
            stdout
        );
    }

    fn assert_stderr_contains(&self, text: &str) {
        let stderr = String::from_utf8_lossy(&self.stderr);
        assert!(
            stderr.contains(text),
            "stderr did not contain '{}'\nstderr: {}",
            text,
            stderr
        );
    }

    fn assert_exit_code(&self, code: i32) {
        assert_eq!(
            self.status.code(),
            Some(code),
            "Expected exit code {}, got {:?}",
            code,
            self.status.code()
        );
    }
}
