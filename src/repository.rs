//! # Version-Control Seam
//!
//! The extractor and the appliers never call `git` directly. They go through
//! the [`GitOperations`] trait, whose default implementation,
//! [`DefaultGitOperations`], delegates to the subprocess wrappers in
//! [`crate::git`]. Tests substitute their own implementation to simulate a
//! patch that only applies with the 3-way strategy, or a diff that cannot be
//! produced, without crafting a repository that behaves that way.

use std::path::Path;

use crate::apply::ApplyStrategy;
use crate::error::{Error, Result};
use crate::git::{self, ApplyAttempt, CommitInfo, FileChange};

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    /// Whether the `git` executable can be run at all.
    fn is_available(&self) -> bool;

    /// Whether `path` is inside a git work tree.
    fn is_repository(&self, path: &Path) -> bool;

    /// Whether `commit` resolves to a commit in `repo`.
    fn commit_exists(&self, repo: &Path, commit: &str) -> bool;

    /// Author and subject of `commit`.
    fn commit_info(&self, repo: &Path, commit: &str) -> Result<CommitInfo>;

    /// First parent of `commit`, or the empty tree for a root commit.
    fn parent_or_empty_tree(&self, repo: &Path, commit: &str) -> Result<String>;

    /// Files changed between two revisions.
    fn changed_files(&self, repo: &Path, from: &str, to: &str) -> Result<Vec<FileChange>>;

    /// Unified diff of one path between two revisions.
    fn diff_file(
        &self,
        repo: &Path,
        from: &str,
        to: &str,
        path: &str,
        binary: bool,
    ) -> Result<Vec<u8>>;

    /// Applies `patch` to the work tree of `repo` using `strategy`.
    fn apply(&self, repo: &Path, patch: &Path, strategy: ApplyStrategy) -> Result<ApplyAttempt>;
}

/// Fails with a tool validation error when git cannot be run.
pub fn ensure_git(git: &dyn GitOperations) -> Result<()> {
    if git.is_available() {
        Ok(())
    } else {
        Err(Error::ToolValidation {
            tool: "git".to_string(),
            message: "Git is not available in PATH".to_string(),
        })
    }
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn is_available(&self) -> bool {
        git::is_available()
    }

    fn is_repository(&self, path: &Path) -> bool {
        git::is_repository(path)
    }

    fn commit_exists(&self, repo: &Path, commit: &str) -> bool {
        git::commit_exists(repo, commit)
    }

    fn commit_info(&self, repo: &Path, commit: &str) -> Result<CommitInfo> {
        git::commit_info(repo, commit)
    }

    fn parent_or_empty_tree(&self, repo: &Path, commit: &str) -> Result<String> {
        git::parent_or_empty_tree(repo, commit)
    }

    fn changed_files(&self, repo: &Path, from: &str, to: &str) -> Result<Vec<FileChange>> {
        git::changed_files(repo, from, to)
    }

    fn diff_file(
        &self,
        repo: &Path,
        from: &str,
        to: &str,
        path: &str,
        binary: bool,
    ) -> Result<Vec<u8>> {
        git::diff_file(repo, from, to, path, binary)
    }

    fn apply(&self, repo: &Path, patch: &Path, strategy: ApplyStrategy) -> Result<ApplyAttempt> {
        git::apply(repo, patch, strategy.git_args())
    }
}
