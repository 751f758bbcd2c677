//! # Build Context
//!
//! [`BuildContext`] carries every location the extractor and the appliers
//! need: the target tree, the per-file patch tree, the series directory and
//! the feature manifest. It is resolved once per invocation and then only
//! read.
//!
//! Resolution order for each location, highest priority first:
//!
//! 1. An explicit override (command-line flag or environment variable).
//! 2. The value from `.forkpatch.yaml` in the project root.
//! 3. The built-in default from [`crate::defaults`].
//!
//! All paths are made absolute so that patch paths stay valid when `git`
//! runs with the target tree as its working directory.

use std::path::{Path, PathBuf};

use crate::config::{self, ProjectConfig};
use crate::defaults::{
    DEFAULT_FEATURES_FILENAME, DEFAULT_PATCHES_DIRNAME, DEFAULT_SERIES_DIRNAME, SERIES_FILENAME,
};
use crate::error::Result;

/// Explicit location overrides, typically from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub root: Option<PathBuf>,
    pub src: Option<PathBuf>,
    pub patches_dir: Option<PathBuf>,
    pub series_dir: Option<PathBuf>,
    pub features_file: Option<PathBuf>,
}

/// Resolved, absolute locations for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Project root holding patches and manifests.
    pub root: PathBuf,
    /// Upstream checkout that patches are extracted from and applied to.
    pub src: PathBuf,
    /// Root of the per-file patch tree.
    pub patches_dir: PathBuf,
    /// Directory containing the series file.
    pub series_dir: PathBuf,
    /// Feature manifest path.
    pub features_file: PathBuf,
}

impl BuildContext {
    /// Build a context with default layout under `root`, targeting `src`.
    pub fn new(root: impl Into<PathBuf>, src: impl Into<PathBuf>) -> Result<Self> {
        Self::from_parts(root.into(), src.into(), ProjectConfig::default(), &ContextOverrides::default())
    }

    /// Resolve a context from overrides and the project's `.forkpatch.yaml`.
    pub fn resolve(overrides: &ContextOverrides) -> Result<Self> {
        let root = match &overrides.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        let root = std::path::absolute(root)?;
        let config = config::load_from_root(&root)?.unwrap_or_default();

        let src = match (&overrides.src, &config.src) {
            (Some(src), _) => src.clone(),
            (None, Some(src)) => root.join(src),
            (None, None) => std::env::current_dir()?,
        };

        Self::from_parts(root, src, config, overrides)
    }

    fn from_parts(
        root: PathBuf,
        src: PathBuf,
        config: ProjectConfig,
        overrides: &ContextOverrides,
    ) -> Result<Self> {
        let root = std::path::absolute(root)?;
        let pick = |flag: &Option<PathBuf>, file: Option<PathBuf>, default: &str| {
            flag.clone()
                .or_else(|| file.map(|p| root.join(p)))
                .unwrap_or_else(|| root.join(default))
        };

        let patches_dir = pick(&overrides.patches_dir, config.patches_dir, DEFAULT_PATCHES_DIRNAME);
        let series_dir = pick(&overrides.series_dir, config.series_dir, DEFAULT_SERIES_DIRNAME);
        let features_file = pick(
            &overrides.features_file,
            config.features_file,
            DEFAULT_FEATURES_FILENAME,
        );

        Ok(Self {
            src: std::path::absolute(src)?,
            patches_dir: std::path::absolute(patches_dir)?,
            series_dir: std::path::absolute(series_dir)?,
            features_file: std::path::absolute(features_file)?,
            root,
        })
    }

    /// Path of the series file.
    pub fn series_file(&self) -> PathBuf {
        self.series_dir.join(SERIES_FILENAME)
    }

    /// Patch directory of `feature`, or the patch tree root without one.
    pub fn feature_dir(&self, feature: Option<&str>) -> PathBuf {
        match feature {
            Some(name) => self.patches_dir.join(name),
            None => self.patches_dir.clone(),
        }
    }

    /// Patch file for the upstream `file`, mirroring its path under the
    /// feature directory.
    pub fn patch_path(&self, feature: Option<&str>, file: &str) -> PathBuf {
        self.feature_dir(feature).join(Path::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_new_uses_default_layout() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let ctx = BuildContext::new(root, root.join("src")).unwrap();

        assert_eq!(ctx.patches_dir, root.join("chromium_patches"));
        assert_eq!(ctx.series_dir, root.join("series_patches"));
        assert_eq!(ctx.series_file(), root.join("series_patches").join("series"));
        assert_eq!(ctx.features_file, root.join("features.yaml"));
        assert_eq!(ctx.src, root.join("src"));
    }

    #[test]
    fn test_resolve_reads_project_config() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(
            root.join(".forkpatch.yaml"),
            "src: upstream\nseries_dir: quilt\n",
        )
        .unwrap();

        let ctx = BuildContext::resolve(&ContextOverrides {
            root: Some(root.to_path_buf()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(ctx.src, root.join("upstream"));
        assert_eq!(ctx.series_dir, root.join("quilt"));
        assert_eq!(ctx.patches_dir, root.join("chromium_patches"));
    }

    #[test]
    fn test_overrides_win_over_project_config() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".forkpatch.yaml"), "series_dir: quilt\n").unwrap();
        let custom = root.join("elsewhere");

        let ctx = BuildContext::resolve(&ContextOverrides {
            root: Some(root.to_path_buf()),
            src: Some(root.join("src")),
            series_dir: Some(custom.clone()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(ctx.series_dir, custom);
        assert_eq!(ctx.src, root.join("src"));
    }

    #[test]
    fn test_patch_path_mirrors_upstream_layout() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = BuildContext::new(temp_dir.path(), temp_dir.path()).unwrap();

        assert_eq!(ctx.feature_dir(None), ctx.patches_dir);
        assert_eq!(
            ctx.patch_path(None, "chrome/common/pref_names.h"),
            ctx.patches_dir.join("chrome/common/pref_names.h")
        );
        assert_eq!(
            ctx.patch_path(Some("sidebar"), "chrome/common/pref_names.h"),
            ctx.patches_dir.join("sidebar/chrome/common/pref_names.h")
        );
    }

    #[test]
    #[serial]
    fn test_resolve_defaults_to_current_directory() {
        let original_dir = env::current_dir().unwrap();
        let temp_dir = TempDir::new().unwrap();
        env::set_current_dir(temp_dir.path()).unwrap();

        let result = BuildContext::resolve(&ContextOverrides::default());
        env::set_current_dir(original_dir).unwrap();

        let ctx = result.unwrap();
        assert_eq!(ctx.root.file_name(), temp_dir.path().file_name());
        assert_eq!(ctx.src, ctx.root);
        assert_eq!(ctx.patches_dir, ctx.root.join("chromium_patches"));
    }

    #[test]
    fn test_relative_paths_become_absolute() {
        let ctx = BuildContext::new("project", "project/src").unwrap();
        assert!(ctx.root.is_absolute());
        assert!(ctx.src.is_absolute());
        assert!(ctx.series_dir.is_absolute());
    }
}
