//! # Project Configuration
//!
//! An optional `.forkpatch.yaml` at the project root can pin the locations
//! the tool works with, so they do not have to be repeated on every
//! invocation:
//!
//! ```yaml
//! src: ../chromium/src
//! patches_dir: chromium_patches
//! series_dir: series_patches
//! features_file: features.yaml
//! ```
//!
//! Every key is optional. Relative paths are resolved against the project
//! root by [`crate::context::BuildContext`]. Command-line flags and
//! environment variables take precedence over values from this file.

use crate::defaults::DEFAULT_CONFIG_FILENAME;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from `.forkpatch.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Root of the upstream checkout that patches are applied to.
    #[serde(default)]
    pub src: Option<PathBuf>,
    /// Root of the per-file patch tree.
    #[serde(default)]
    pub patches_dir: Option<PathBuf>,
    /// Directory containing the `series` file.
    #[serde(default)]
    pub series_dir: Option<PathBuf>,
    /// Path of the feature manifest.
    #[serde(default)]
    pub features_file: Option<PathBuf>,
}

/// Parse project configuration from a YAML string.
///
/// An empty or comment-only document yields the default configuration.
pub fn parse(yaml: &str) -> Result<ProjectConfig> {
    let parsed: Option<ProjectConfig> =
        serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: Some(
                "Valid keys are: src, patches_dir, series_dir, features_file".to_string(),
            ),
        })?;
    Ok(parsed.unwrap_or_default())
}

/// Load project configuration from a file
pub fn from_file(path: &Path) -> Result<ProjectConfig> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

/// Load `.forkpatch.yaml` from `root` if present.
pub fn load_from_root(root: &Path) -> Result<Option<ProjectConfig>> {
    let path = root.join(DEFAULT_CONFIG_FILENAME);
    if !path.is_file() {
        return Ok(None);
    }
    log::debug!("Loading project configuration from {}", path.display());
    from_file(&path).map(Some)
}
