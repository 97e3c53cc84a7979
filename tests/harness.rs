//! Test harness for sprout integration tests

use std::path::{Path, PathBuf};
use std::process::Command;

use sprout::Record;
use sprout::test_utils::TestInput;

/// A temporary working directory holding input, config and view files.
pub struct TestDir {
    input: TestInput,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            input: TestInput::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.input.path()
    }

    /// Write rows as `rows.json`.
    pub fn rows(&self, rows: &[Record]) -> PathBuf {
        self.input.add_rows("rows.json", rows)
    }

    pub fn add_file(&self, name: &str, content: &str) -> PathBuf {
        self.input.add_file(name, content)
    }
}

pub fn run_sprout(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = env!("CARGO_BIN_EXE_sprout");
    let output = Command::new(binary)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run sprout");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_creates_temp_dir() {
        let dir = TestDir::new();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_harness_writes_rows() {
        let dir = TestDir::new();
        let path = dir.rows(&sprout::test_utils::forest_from_parents(&[0, 1]));
        assert!(path.exists());
    }
}
