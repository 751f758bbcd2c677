//! # Patch Application Engine
//!
//! [`PatchApplier`] replays a [`Manifest`] of patch files onto a target tree,
//! one entry at a time and strictly in listed order. Each patch is tried
//! against an ordered list of [`ApplyStrategy`] values; the first strategy
//! that succeeds wins. The regular list is strict first, then 3-way merge.
//! A dry run uses a single check-only strategy and never falls back to
//! 3-way, so a patch reported as "would fail" may still apply for real.
//!
//! [`apply_all`] builds its manifest from the patch tree itself, in sorted
//! relative-path order, instead of reading a series file. [`apply_file`]
//! applies the patch of one source file.
//!
//! Failures are isolated per entry. A missing patch file or a patch that no
//! strategy can apply is recorded in the [`ApplyOutcome`] and the run moves
//! on; the applier itself never returns an error for partial failure.

use log::{debug, error, info};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::context::BuildContext;
use crate::error::{Error, Result};
use crate::feature::FeatureStore;
use crate::manifest::{Manifest, ResolvedEntry};
use crate::repository::{ensure_git, GitOperations};

/// A way of handing a patch to `git apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStrategy {
    /// Context must match; whitespace-only differences are ignored.
    Strict,
    /// Falls back to the blobs recorded in the patch to merge hunks.
    ThreeWay,
    /// Reports whether the patch would apply without touching the tree.
    Check,
}

impl ApplyStrategy {
    /// Arguments passed to `git apply` before the patch path.
    pub fn git_args(self) -> &'static [&'static str] {
        match self {
            ApplyStrategy::Strict => &["--ignore-whitespace", "--whitespace=nowarn", "-p1"],
            ApplyStrategy::ThreeWay => &[
                "--3way",
                "--ignore-whitespace",
                "--whitespace=nowarn",
                "-p1",
            ],
            ApplyStrategy::Check => &["--check", "--ignore-whitespace", "-p1"],
        }
    }
}

impl fmt::Display for ApplyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplyStrategy::Strict => "strict",
            ApplyStrategy::ThreeWay => "3-way",
            ApplyStrategy::Check => "check",
        };
        f.write_str(name)
    }
}

/// Strategies tried, in order, when mutating the tree.
pub const APPLY_STRATEGIES: &[ApplyStrategy] = &[ApplyStrategy::Strict, ApplyStrategy::ThreeWay];

/// Strategies tried, in order, for a dry run.
pub const DRY_RUN_STRATEGIES: &[ApplyStrategy] = &[ApplyStrategy::Check];

/// Options shared by every apply entry point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Only check whether patches would apply.
    pub dry_run: bool,
}

impl ApplyOptions {
    pub fn strategies(&self) -> &'static [ApplyStrategy] {
        if self.dry_run {
            DRY_RUN_STRATEGIES
        } else {
            APPLY_STRATEGIES
        }
    }
}

/// Why a single patch did not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The listed patch file does not exist.
    Missing,
    /// Every strategy was rejected; holds the last captured diagnostic.
    Rejected { diagnostic: String },
}

/// A patch that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchFailure {
    pub path: PathBuf,
    pub relative: String,
    pub reason: FailureReason,
}

/// Result of replaying a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Absolute paths of applied patches, in applied order.
    pub applied: Vec<PathBuf>,
    /// Patches that failed, in listed order.
    pub failed: Vec<PatchFailure>,
}

impl ApplyOutcome {
    /// Absolute paths of failed patches.
    pub fn failed_paths(&self) -> Vec<PathBuf> {
        self.failed.iter().map(|f| f.path.clone()).collect()
    }

    pub fn total(&self) -> usize {
        self.applied.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Replays manifests onto a target tree.
pub struct PatchApplier<'a> {
    git: &'a dyn GitOperations,
    target: &'a Path,
    options: ApplyOptions,
}

impl<'a> PatchApplier<'a> {
    pub fn new(git: &'a dyn GitOperations, target: &'a Path, options: ApplyOptions) -> Self {
        Self {
            git,
            target,
            options,
        }
    }

    /// Applies every entry of `manifest`, resolved against `base`.
    pub fn apply_manifest(&self, manifest: &Manifest, base: &Path) -> ApplyOutcome {
        self.apply_entries(&manifest.resolve(base))
    }

    /// Applies already resolved entries, in the given order.
    pub fn apply_entries(&self, entries: &[ResolvedEntry]) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::default();
        let total = entries.len();
        if total == 0 {
            info!("No patches to apply");
            return outcome;
        }

        info!("Found {} patches", total);
        for entry in entries {
            self.apply_entry(entry, total, &mut outcome);
        }
        outcome
    }

    fn apply_entry(&self, entry: &ResolvedEntry, total: usize, outcome: &mut ApplyOutcome) {
        let (i, relative) = (entry.index, &entry.relative);

        if !entry.exists() {
            error!("[{}/{}] Patch file not found: {}", i, total, relative);
            outcome.failed.push(PatchFailure {
                path: entry.path.clone(),
                relative: relative.clone(),
                reason: FailureReason::Missing,
            });
            return;
        }

        match self.try_strategies(&entry.path, relative) {
            Ok(strategy) => {
                if self.options.dry_run {
                    info!("[{}/{}] Would apply: {}", i, total, relative);
                } else {
                    info!("[{}/{}] Applied ({}): {}", i, total, strategy, relative);
                }
                outcome.applied.push(entry.path.clone());
            }
            Err(diagnostic) => {
                if self.options.dry_run {
                    error!("[{}/{}] Would fail: {}", i, total, relative);
                } else {
                    error!("[{}/{}] Failed: {}", i, total, relative);
                }
                if !diagnostic.is_empty() {
                    error!("    {}", diagnostic);
                }
                outcome.failed.push(PatchFailure {
                    path: entry.path.clone(),
                    relative: relative.clone(),
                    reason: FailureReason::Rejected { diagnostic },
                });
            }
        }
    }

    /// Returns the first strategy that applied, or the last diagnostic.
    fn try_strategies(
        &self,
        patch: &Path,
        relative: &str,
    ) -> std::result::Result<ApplyStrategy, String> {
        let mut diagnostic = String::new();
        for &strategy in self.options.strategies() {
            match self.git.apply(self.target, patch, strategy) {
                Ok(attempt) if attempt.success => return Ok(strategy),
                Ok(attempt) => {
                    debug!("{} apply rejected {}: {}", strategy, relative, attempt.diagnostic);
                    diagnostic = attempt.diagnostic;
                }
                Err(e) => {
                    debug!("{} apply could not run for {}: {}", strategy, relative, e);
                    diagnostic = e.to_string();
                }
            }
        }
        Err(diagnostic.trim().to_string())
    }
}

/// Lists every regular file below `dir`, relative to it, with `/`
/// separators and sorted.
pub fn collect_patch_tree(dir: &Path) -> Result<Manifest> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(dir) {
            let parts: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.push(parts.join("/"));
        }
    }
    files.sort();
    Ok(files.into_iter().collect())
}

/// Applies every patch in the patch tree onto the target tree.
pub fn apply_all(
    ctx: &BuildContext,
    git: &dyn GitOperations,
    options: ApplyOptions,
) -> Result<ApplyOutcome> {
    ensure_git(git)?;
    if !ctx.patches_dir.is_dir() {
        return Err(Error::MissingPath {
            what: "Patches directory".to_string(),
            path: ctx.patches_dir.clone(),
        });
    }

    let tree = collect_patch_tree(&ctx.patches_dir)?;
    debug!(
        "Collected {} patches from {}",
        tree.len(),
        ctx.patches_dir.display()
    );
    let store = FeatureStore::load(&ctx.features_file)?;
    let features: Vec<&str> = store.iter().map(|(name, _)| name.as_str()).collect();
    let manifest = drop_shadowed(&tree, &features);

    let applier = PatchApplier::new(git, &ctx.src, options);
    Ok(applier.apply_manifest(&manifest, &ctx.patches_dir))
}

/// Removes flat `<file>` entries that some `<feature>/<file>` entry also
/// covers, so a file extracted both ways is applied once. The feature copy
/// wins, as it does for `apply feature`.
pub fn drop_shadowed(tree: &Manifest, features: &[&str]) -> Manifest {
    let shadowed: HashSet<&str> = tree
        .entries()
        .iter()
        .filter_map(|entry| entry.split_once('/'))
        .filter(|(head, _)| features.contains(head))
        .map(|(_, rest)| rest)
        .collect();

    tree.entries()
        .iter()
        .filter(|entry| {
            let skip = shadowed.contains(entry.as_str());
            if skip {
                debug!("Skipping {}: a feature copy is applied instead", entry);
            }
            !skip
        })
        .cloned()
        .collect()
}

/// Applies the patch of a single file, `<patches>/<file>`.
pub fn apply_file(
    ctx: &BuildContext,
    git: &dyn GitOperations,
    file: &str,
    options: ApplyOptions,
) -> Result<ApplyOutcome> {
    ensure_git(git)?;
    let relative = file.trim().trim_start_matches("./").replace('\\', "/");
    let manifest = Manifest::new(vec![relative]);
    let applier = PatchApplier::new(git, &ctx.src, options);
    Ok(applier.apply_manifest(&manifest, &ctx.patches_dir))
}
