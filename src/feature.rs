//! # Feature Manifest
//!
//! Features group the files a logical change touches. They are stored in a
//! YAML manifest, by default `features.yaml` at the project root:
//!
//! ```yaml
//! version: '1.0'
//! features:
//!   sidebar:
//!     description: Vertical tab sidebar
//!     files:
//!     - chrome/browser/ui/views/side_panel/side_panel.cc
//!     - chrome/common/pref_names.h
//! ```
//!
//! The file list keeps its order. Adding a commit appends the files the
//! manifest does not already list. Features are never removed implicitly.
//! A feature's patch for a file is `<patches>/<feature>/<file>` when
//! `extract --feature` wrote one there, and the flat `<patches>/<file>`
//! written by a plain `extract` otherwise.

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::apply::{ApplyOptions, ApplyOutcome, PatchApplier};
use crate::context::BuildContext;
use crate::error::{Error, Result};
use crate::manifest::{Manifest, ResolvedEntry};
use crate::repository::{ensure_git, GitOperations};

const MANIFEST_VERSION: &str = "1.0";

fn default_version() -> String {
    MANIFEST_VERSION.to_string()
}

/// One named feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub description: String,
    /// Touched files, relative to the target tree root.
    #[serde(default)]
    pub files: Manifest,
}

/// On-disk layout of the feature manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct FeatureFile {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    features: BTreeMap<String, Feature>,
}

impl Default for FeatureFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            features: BTreeMap::new(),
        }
    }
}

/// Summary line for `feature list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSummary {
    pub name: String,
    pub description: String,
    pub file_count: usize,
}

/// Read-modify-write access to the feature manifest.
#[derive(Debug)]
pub struct FeatureStore {
    path: PathBuf,
    data: FeatureFile,
}

impl FeatureStore {
    /// Loads the manifest at `path`; a missing file is an empty manifest.
    pub fn load(path: &Path) -> Result<Self> {
        let data = if path.is_file() {
            let content = fs::read_to_string(path)?;
            let parsed: Option<FeatureFile> = serde_yaml::from_str(&content)?;
            parsed.unwrap_or_default()
        } else {
            FeatureFile::default()
        };

        for (name, feature) in &data.features {
            if feature.files.entries().iter().any(|f| f.trim().is_empty()) {
                return Err(Error::FeatureManifest {
                    path: path.to_path_buf(),
                    message: format!("feature '{}' lists an empty path", name),
                });
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Writes the manifest back to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_yaml::to_string(&self.data)?)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.data.features.get(name)
    }

    /// Like [`get`](Self::get), but a missing feature is an error.
    pub fn require(&self, name: &str) -> Result<&Feature> {
        self.get(name).ok_or_else(|| Error::FeatureNotFound {
            name: name.to_string(),
        })
    }

    /// Features sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Feature)> {
        self.data.features.iter()
    }

    /// Merges `files` into `name`, creating the feature if needed.
    ///
    /// A non-empty `description` replaces the current one. Returns the
    /// number of files that were not listed before.
    pub fn add_files<I>(&mut self, name: &str, description: Option<&str>, files: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let feature = self.data.features.entry(name.to_string()).or_default();
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            feature.description = description.to_string();
        }
        files
            .into_iter()
            .filter(|file| feature.files.push_unique(file.clone()))
            .count()
    }
}

/// Result of [`add_feature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedFiles {
    /// Files newly recorded by this call.
    pub added: usize,
    /// Files the feature lists afterwards.
    pub total: usize,
}

/// Adds the files touched by `commit` to feature `name`.
pub fn add_feature(
    ctx: &BuildContext,
    git: &dyn GitOperations,
    name: &str,
    commit: &str,
    description: Option<&str>,
) -> Result<AddedFiles> {
    crate::extract::validate(ctx, git)?;
    let repo = ctx.src.as_path();
    if !git.commit_exists(repo, commit) {
        return Err(Error::CommitNotFound {
            commit: commit.to_string(),
        });
    }

    let parent = git.parent_or_empty_tree(repo, commit)?;
    let changes = git.changed_files(repo, &parent, commit)?;

    let mut store = FeatureStore::load(&ctx.features_file)?;
    let added = store.add_files(name, description, changes.into_iter().map(|c| c.path));
    store.save()?;

    let total = store.require(name)?.files.len();
    info!("Feature '{}': {} new files, {} total", name, added, total);
    Ok(AddedFiles { added, total })
}

/// Lists every feature, sorted by name.
pub fn list_features(ctx: &BuildContext) -> Result<Vec<FeatureSummary>> {
    let store = FeatureStore::load(&ctx.features_file)?;
    Ok(store
        .iter()
        .map(|(name, feature)| FeatureSummary {
            name: name.clone(),
            description: feature.description.clone(),
            file_count: feature.files.len(),
        })
        .collect())
}

/// Returns one feature's definition.
pub fn show_feature(ctx: &BuildContext, name: &str) -> Result<Feature> {
    let store = FeatureStore::load(&ctx.features_file)?;
    store.require(name).cloned()
}

/// Resolves the patch of every file of `feature`, in manifest order.
///
/// The copy under the feature directory wins. Files with no copy there
/// resolve to the flat patch path, whether or not it exists.
pub fn resolve_patches(ctx: &BuildContext, name: &str, feature: &Feature) -> Vec<ResolvedEntry> {
    feature
        .files
        .resolve(&ctx.feature_dir(Some(name)))
        .into_iter()
        .map(|mut entry| {
            if !entry.exists() {
                entry.path = ctx.patch_path(None, &entry.relative);
            }
            entry
        })
        .collect()
}

/// Applies the patches of feature `name`, in manifest order.
pub fn apply_feature(
    ctx: &BuildContext,
    git: &dyn GitOperations,
    name: &str,
    options: ApplyOptions,
) -> Result<ApplyOutcome> {
    ensure_git(git)?;
    let feature = show_feature(ctx, name)?;
    let applier = PatchApplier::new(git, &ctx.src, options);
    Ok(applier.apply_entries(&resolve_patches(ctx, name, &feature)))
}
