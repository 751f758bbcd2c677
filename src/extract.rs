//! # Commit Extraction
//!
//! Turns one commit into one patch file per changed file. Each patch is a
//! `git diff` of a single path with `a/` and `b/` prefixes and full blob ids,
//! so it applies at `-p1` and carries what the 3-way strategy needs.
//!
//! Patches are written into the patch tree mirroring the upstream layout:
//! the patch for `chrome/common/pref_names.h` lives at
//! `<patches>/chrome/common/pref_names.h`, or
//! `<patches>/<feature>/chrome/common/pref_names.h` when extracting into a
//! feature, which also records the files in the feature manifest.
//!
//! Two modes:
//!
//! - **Normal**: each file is diffed between the commit's parent and the
//!   commit.
//! - **Base**: the file set still comes from the commit, but each file is
//!   diffed from the given base revision to the commit, capturing every
//!   change to that file since the base.

use log::{debug, error, info, warn};
use std::fs;
use std::path::Path;

use crate::context::BuildContext;
use crate::error::{Error, Result};
use crate::feature::FeatureStore;
use crate::git::FileChange;
use crate::repository::{ensure_git, GitOperations};

/// Options for [`extract_commit`].
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Log per-file progress and commit metadata.
    pub verbose: bool,
    /// Overwrite patch files that already exist.
    pub force: bool,
    /// Emit binary patches instead of skipping binary changes.
    pub include_binary: bool,
    /// Diff each file from this revision instead of the commit's parent.
    pub base: Option<String>,
    /// Write under this feature's directory and record the files in the
    /// feature manifest.
    pub feature: Option<String>,
}

/// Checks that git is usable and the target tree is a repository.
pub fn validate(ctx: &BuildContext, git: &dyn GitOperations) -> Result<()> {
    ensure_git(git)?;
    if !git.is_repository(&ctx.src) {
        return Err(Error::NotARepository {
            path: ctx.src.clone(),
        });
    }
    Ok(())
}

/// Extracts the changes of `commit` into patch files.
///
/// Returns the number of patch files written. Files that were skipped
/// (existing patch without `force`, binary without `include_binary`, empty
/// diff) or that failed to diff or write are logged and not counted.
pub fn extract_commit(
    ctx: &BuildContext,
    git: &dyn GitOperations,
    commit: &str,
    options: &ExtractOptions,
) -> Result<usize> {
    validate(ctx, git)?;
    let repo = ctx.src.as_path();

    if !git.commit_exists(repo, commit) {
        return Err(Error::CommitNotFound {
            commit: commit.to_string(),
        });
    }

    match git.commit_info(repo, commit) {
        Ok(info) if options.verbose => {
            info!("Commit: {}", info.hash);
            info!("  Author: {} <{}>", info.author_name, info.author_email);
            info!("  Subject: {}", info.subject);
        }
        Ok(info) => debug!("Extracting {} ({})", info.hash, info.subject),
        Err(e) => warn!("Could not read metadata for {}: {}", commit, e),
    }

    let parent = git.parent_or_empty_tree(repo, commit)?;
    let changes = git.changed_files(repo, &parent, commit)?;
    if changes.is_empty() {
        info!("No changes in {}", commit);
        return Ok(0);
    }

    let from = match &options.base {
        Some(base) => {
            if !git.commit_exists(repo, base) {
                return Err(Error::CommitNotFound {
                    commit: base.clone(),
                });
            }
            info!("Extracting {} files from {} against base {}", changes.len(), commit, base);
            base.clone()
        }
        None => parent,
    };

    let out_dir = ctx.feature_dir(options.feature.as_deref());
    let mut written = 0;
    let mut owned = Vec::new();

    for change in &changes {
        match extract_file(git, repo, &from, commit, change, &out_dir, options) {
            FileResult::Written => {
                written += 1;
                owned.push(change.path.clone());
            }
            FileResult::Kept => owned.push(change.path.clone()),
            FileResult::Skipped | FileResult::Failed => {}
        }
    }

    if let Some(feature) = &options.feature {
        record_feature_files(ctx, feature, commit, &owned)?;
    }

    Ok(written)
}

enum FileResult {
    Written,
    /// An existing patch was left in place.
    Kept,
    Skipped,
    Failed,
}

fn extract_file(
    git: &dyn GitOperations,
    repo: &Path,
    from: &str,
    commit: &str,
    change: &FileChange,
    out_dir: &Path,
    options: &ExtractOptions,
) -> FileResult {
    let path = change.path.as_str();

    if change.binary && !options.include_binary {
        warn!("Skipping binary file: {}", path);
        return FileResult::Skipped;
    }

    let patch_path = out_dir.join(path);
    if patch_path.exists() && !options.force {
        warn!("Patch already exists, use --force to overwrite: {}", path);
        return FileResult::Kept;
    }

    let mut diff = match git.diff_file(repo, from, commit, path, change.binary) {
        Ok(diff) => diff,
        Err(e) => {
            error!("Failed to diff {}: {}", path, e);
            return FileResult::Failed;
        }
    };
    if diff.is_empty() {
        debug!("No differences for {} between {} and {}", path, from, commit);
        return FileResult::Skipped;
    }
    if !diff.ends_with(b"\n") {
        diff.push(b'\n');
    }

    let write = || -> std::io::Result<()> {
        if let Some(parent) = patch_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&patch_path, &diff)
    };
    if let Err(e) = write() {
        error!("Failed to write patch {}: {}", patch_path.display(), e);
        return FileResult::Failed;
    }

    if options.verbose {
        info!("  [{}] {}", change.status, path);
    }
    FileResult::Written
}

fn record_feature_files(ctx: &BuildContext, feature: &str, commit: &str, files: &[String]) -> Result<()> {
    let mut store = FeatureStore::load(&ctx.features_file)?;
    let added = store.add_files(feature, None, files.iter().cloned());
    store.save()?;
    info!(
        "Recorded {} new files in feature '{}' from {}",
        added, feature, commit
    );
    Ok(())
}
