//! Test helpers for the kernel's end-to-end scenario specs.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};

/// A temporary directory holding one pipeline definition, ready to run
/// through the `pk` binary.
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn with_pipeline(yaml: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("pipeline.yaml"), yaml).expect("write pipeline");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn pipeline_path(&self) -> PathBuf {
        self.dir.path().join("pipeline.yaml")
    }

    /// A `pk` command pre-configured to run this project's pipeline.
    pub fn run_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("pk").expect("pk binary");
        cmd.arg("run").arg(self.pipeline_path());
        cmd
    }

    pub fn validate_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("pk").expect("pk binary");
        cmd.arg("validate").arg(self.pipeline_path());
        cmd
    }

    pub fn explain_cmd(&self, line: &str, col: &str) -> Command {
        let mut cmd = Command::cargo_bin("pk").expect("pk binary");
        cmd.arg("explain").arg(self.pipeline_path()).arg(line).arg(col);
        cmd
    }
}
