//! Default values for forkpatch configuration.
//!
//! This module provides centralized default names used across commands,
//! ensuring consistency and avoiding duplication. All directory defaults are
//! relative to the project root.

/// Name of the optional project configuration file.
pub const DEFAULT_CONFIG_FILENAME: &str = ".forkpatch.yaml";

/// Directory holding per-file patches, mirroring the upstream tree layout.
pub const DEFAULT_PATCHES_DIRNAME: &str = "chromium_patches";

/// Directory holding the series file and the patches it lists.
pub const DEFAULT_SERIES_DIRNAME: &str = "series_patches";

/// Name of the series file inside the series directory.
pub const SERIES_FILENAME: &str = "series";

/// Name of the feature manifest.
pub const DEFAULT_FEATURES_FILENAME: &str = "features.yaml";
