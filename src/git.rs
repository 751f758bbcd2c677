//! Thin wrappers around the system `git` command.
//!
//! Every function here spawns `git` as a blocking subprocess in the given
//! working tree and waits for it to finish. Nothing is cached and nothing
//! runs concurrently: callers rely on each invocation having fully completed
//! before the next one starts.

use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Object id of the empty tree, used as the "parent" of a root commit.
pub const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Metadata of a single commit, used for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub subject: String,
}

/// A file touched between two revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Status letter as reported by `git diff --name-status` ('A', 'M', 'D', 'T').
    pub status: char,
    /// Path relative to the repository root.
    pub path: String,
    /// Whether git considers the change binary.
    pub binary: bool,
}

/// Result of a single `git apply` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyAttempt {
    pub success: bool,
    /// Captured stderr, or stdout when stderr was empty.
    pub diagnostic: String,
}

fn run(repo: &Path, args: &[&str]) -> Result<Output> {
    Command::new("git")
        .args(args)
        .current_dir(repo)
        .output()
        .map_err(|e| Error::GitCommand {
            command: format!("git {}", args.join(" ")),
            cwd: repo.to_path_buf(),
            stderr: e.to_string(),
        })
}

fn run_checked(repo: &Path, args: &[&str]) -> Result<Vec<u8>> {
    let output = run(repo, args)?;
    if !output.status.success() {
        return Err(Error::GitCommand {
            command: format!("git {}", args.join(" ")),
            cwd: repo.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output.stdout)
}

/// Returns true when a usable `git` executable is on `PATH`.
pub fn is_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Returns true when `path` is inside a git work tree.
pub fn is_repository(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    match run(path, &["rev-parse", "--is-inside-work-tree"]) {
        Ok(output) => {
            output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true"
        }
        Err(_) => false,
    }
}

/// Returns true when `commit` resolves to a commit object in `repo`.
pub fn commit_exists(repo: &Path, commit: &str) -> bool {
    let spec = format!("{}^{{commit}}", commit);
    run(repo, &["rev-parse", "--verify", "--quiet", &spec])
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Reads hash, author and subject of `commit`.
pub fn commit_info(repo: &Path, commit: &str) -> Result<CommitInfo> {
    let stdout = run_checked(
        repo,
        &["show", "-s", "--no-color", "--format=%H%x00%an%x00%ae%x00%s", commit],
    )?;
    let text = String::from_utf8_lossy(&stdout);
    let mut fields = text.trim_end_matches('\n').splitn(4, '\0');
    let mut next = || fields.next().unwrap_or_default().to_string();

    Ok(CommitInfo {
        hash: next(),
        author_name: next(),
        author_email: next(),
        subject: next(),
    })
}

/// Returns the first parent of `commit`, or [`EMPTY_TREE`] for a root commit.
pub fn parent_or_empty_tree(repo: &Path, commit: &str) -> Result<String> {
    let spec = format!("{}^1", commit);
    let output = run(repo, &["rev-parse", "--verify", "--quiet", &spec])?;
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Ok(EMPTY_TREE.to_string())
    }
}

/// Lists the files that differ between `from` and `to`, renames disabled.
pub fn changed_files(repo: &Path, from: &str, to: &str) -> Result<Vec<FileChange>> {
    let name_status = run_checked(
        repo,
        &["diff", "--no-color", "--no-renames", "--name-status", "-z", from, to],
    )?;
    let numstat = run_checked(
        repo,
        &["diff", "--no-color", "--no-renames", "--numstat", "-z", from, to],
    )?;

    let binary_paths = parse_binary_paths(&String::from_utf8_lossy(&numstat));
    let mut changes = parse_name_status(&String::from_utf8_lossy(&name_status));
    for change in &mut changes {
        change.binary = binary_paths.iter().any(|p| p == &change.path);
    }
    Ok(changes)
}

/// Parses `--name-status -z` output: `STATUS\0PATH\0` pairs.
fn parse_name_status(raw: &str) -> Vec<FileChange> {
    let mut changes = Vec::new();
    let mut fields = raw.split('\0').filter(|f| !f.is_empty());
    while let (Some(status), Some(path)) = (fields.next(), fields.next()) {
        changes.push(FileChange {
            status: status.chars().next().unwrap_or('M'),
            path: path.to_string(),
            binary: false,
        });
    }
    changes
}

/// Parses `--numstat -z` output and returns paths reported as binary (`-\t-`).
fn parse_binary_paths(raw: &str) -> Vec<String> {
    raw.split('\0')
        .filter_map(|record| {
            let mut parts = record.splitn(3, '\t');
            match (parts.next(), parts.next(), parts.next()) {
                (Some("-"), Some("-"), Some(path)) if !path.is_empty() => Some(path.to_string()),
                _ => None,
            }
        })
        .collect()
}

/// Produces a `-p1` unified diff of a single path between two revisions.
///
/// The prefixes are forced to `a/` and `b/` so user configuration such as
/// `diff.noprefix` cannot change the strip level the patch needs. The path is
/// matched literally from the repository top.
pub fn diff_file(repo: &Path, from: &str, to: &str, path: &str, binary: bool) -> Result<Vec<u8>> {
    let pathspec = format!(":(top,literal){}", path);
    let mut args = vec![
        "diff",
        "--no-color",
        "--no-ext-diff",
        "--no-renames",
        "--full-index",
        "--src-prefix=a/",
        "--dst-prefix=b/",
    ];
    if binary {
        args.push("--binary");
    }
    args.extend([from, to, "--", pathspec.as_str()]);
    run_checked(repo, &args)
}

/// Runs `git apply` with `args` followed by the patch path.
///
/// A non-zero exit is not an error: it is reported through
/// [`ApplyAttempt::success`] with the captured output. Only a failure to
/// spawn git is returned as `Err`.
pub fn apply(repo: &Path, patch: &Path, args: &[&str]) -> Result<ApplyAttempt> {
    let output = Command::new("git")
        .arg("apply")
        .args(args)
        .arg(patch)
        .current_dir(repo)
        .output()
        .map_err(|e| Error::GitCommand {
            command: format!("git apply {}", args.join(" ")),
            cwd: repo.to_path_buf(),
            stderr: e.to_string(),
        })?;

    if output.status.success() {
        return Ok(ApplyAttempt {
            success: true,
            diagnostic: String::new(),
        });
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let diagnostic = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr.trim().to_string()
    };

    Ok(ApplyAttempt {
        success: false,
        diagnostic,
    })
}
