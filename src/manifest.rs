//! Ordered lists of file references.
//!
//! Series files and feature file lists are both an ordered sequence of
//! relative paths whose meaning depends on a base directory. [`Manifest`]
//! holds the sequence; [`Manifest::resolve`] pairs every entry with its
//! absolute path and 1-based position so callers can report `[i/total]`
//! progress and check existence without re-deriving either.
//!
//! Order is preserved exactly as written. Nothing here sorts, deduplicates
//! or infers dependencies, with the single exception of
//! [`Manifest::push_unique`], which feature manifests use when merging in
//! a commit's files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ordered relative paths, serialized as a plain YAML/JSON list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<String>,
}

/// One manifest entry resolved against a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// 1-based position in the manifest.
    pub index: usize,
    /// The entry exactly as listed.
    pub relative: String,
    /// `base.join(relative)`.
    pub path: PathBuf,
}

impl ResolvedEntry {
    /// Whether the entry points at an existing file.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl Manifest {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    /// Appends `entry` unless it is already listed. Returns true if added.
    pub fn push_unique(&mut self, entry: impl Into<String>) -> bool {
        let entry = entry.into();
        if self.contains(&entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Resolves every entry against `base`, in listed order.
    pub fn resolve(&self, base: &Path) -> Vec<ResolvedEntry> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, relative)| ResolvedEntry {
                index: i + 1,
                relative: relative.clone(),
                path: base.join(relative),
            })
            .collect()
    }
}

impl FromIterator<String> for Manifest {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
