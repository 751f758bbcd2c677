//! Shared test utilities for integration and E2E tests.
//!
//! Every test gets a [`TestFixture`]: a temporary project root holding the
//! patch tree, series directory and feature manifest, plus a real git
//! repository under `src/` playing the upstream checkout.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new();
//!     fixture.write_src("a.txt", "one\n");
//!     let base = fixture.commit_all("base");
//!     fixture.command().args(["extract", &base]).assert().success();
//! }
//! ```

use assert_fs::prelude::{FileWriteBin, FileWriteStr, PathChild};
use std::path::{Path, PathBuf};
use std::process::Command;

use forkpatch::context::BuildContext;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::lines;
    pub use super::TestFixture;
}

/// Joins `words` into newline-terminated lines.
#[allow(dead_code)]
pub fn lines(words: &[&str]) -> String {
    words.iter().map(|w| format!("{}\n", w)).collect()
}

/// A project root with an upstream git checkout in `src/`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a fixture with an empty, configured git repository.
    pub fn new() -> Self {
        let fixture = Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        };
        std::fs::create_dir_all(fixture.src()).expect("Failed to create src directory");
        fixture.git(&["init", "-q"]);
        fixture.git(&["config", "user.name", "Fork Dev"]);
        fixture.git(&["config", "user.email", "dev@example.com"]);
        fixture.git(&["config", "commit.gpgsign", "false"]);
        fixture.git(&["config", "core.autocrlf", "false"]);
        fixture
    }

    /// Project root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Upstream checkout.
    pub fn src(&self) -> PathBuf {
        self.temp_dir.path().join("src")
    }

    /// Default patch tree root.
    #[allow(dead_code)]
    pub fn patches_dir(&self) -> PathBuf {
        self.temp_dir.path().join("chromium_patches")
    }

    /// Library context with the default layout.
    #[allow(dead_code)]
    pub fn context(&self) -> BuildContext {
        BuildContext::new(self.path(), self.src()).expect("Failed to build context")
    }

    /// Run git in the checkout and return trimmed stdout; panics on failure.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.src())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Write a file in the checkout.
    pub fn write_src(&self, path: &str, content: &str) {
        self.temp_dir
            .child("src")
            .child(path)
            .write_str(content)
            .expect("Failed to write source file");
    }

    /// Write a binary file in the checkout.
    #[allow(dead_code)]
    pub fn write_src_binary(&self, path: &str, content: &[u8]) {
        self.temp_dir
            .child("src")
            .child(path)
            .write_binary(content)
            .expect("Failed to write source file");
    }

    /// Read a file from the checkout.
    #[allow(dead_code)]
    pub fn read_src(&self, path: &str) -> String {
        std::fs::read_to_string(self.src().join(path)).expect("Failed to read source file")
    }

    /// Stage everything and commit; returns the new commit hash.
    pub fn commit_all(&self, message: &str) -> String {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", message]);
        self.git(&["rev-parse", "HEAD"])
    }

    /// Reset the checkout, index and work tree, to `rev`.
    #[allow(dead_code)]
    pub fn reset_hard(&self, rev: &str) {
        self.git(&["reset", "-q", "--hard", rev]);
    }

    /// Write a file relative to the project root.
    #[allow(dead_code)]
    pub fn write(&self, path: &str, content: &str) {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write project file");
    }

    /// Write the series file.
    #[allow(dead_code)]
    pub fn write_series(&self, content: &str) {
        self.write("series_patches/series", content);
    }

    /// Write the diff of `path` between two revisions as a series patch.
    #[allow(dead_code)]
    pub fn write_series_patch(&self, name: &str, from: &str, to: &str, path: &str) {
        let diff = forkpatch::git::diff_file(&self.src(), from, to, path, false)
            .expect("Failed to diff");
        assert!(!diff.is_empty(), "empty diff for {} {}..{}", path, from, to);
        self.temp_dir
            .child("series_patches")
            .child(name)
            .write_binary(&diff)
            .expect("Failed to write patch");
    }

    /// Create a command running in the project root against `src/`.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("forkpatch");
        cmd.current_dir(self.path())
            .env("FORKPATCH_SRC", self.src())
            .env_remove("FORKPATCH_ROOT")
            .env_remove("FORKPATCH_PATCHES_DIR")
            .env_remove("FORKPATCH_SERIES_DIR")
            .env_remove("FORKPATCH_FEATURES")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_repository() {
        let fixture = TestFixture::new();
        assert!(fixture.src().join(".git").exists());
    }

    #[test]
    fn test_commit_all_returns_hash() {
        let fixture = TestFixture::new();
        fixture.write_src("a.txt", "a\n");
        assert_eq!(fixture.commit_all("first").len(), 40);
    }
}
