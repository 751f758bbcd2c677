//! # Fork Patch Library
//!
//! This library maintains a browser fork as a set of patches on top of an
//! upstream checkout. It is used by the `forkpatch` command-line tool but
//! can also be driven directly, for example from a build script.
//!
//! ## Quick Example
//!
//! ```
//! use forkpatch::series::parse_series;
//!
//! let series = parse_series(
//!     "# branding first\n\
//!      branding/name.patch\n\
//!      ui/toolbar.patch  # needs branding\n",
//! );
//! assert_eq!(series.entries(), &["branding/name.patch", "ui/toolbar.patch"]);
//! ```
//!
//! ## Core Concepts
//!
//! - **Context (`context`, `config`)**: Resolves where the upstream tree,
//!   the patch tree, the series directory and the feature manifest live,
//!   from flags, `.forkpatch.yaml` and defaults.
//! - **Manifests (`manifest`)**: Ordered lists of relative paths. Series
//!   files and feature file lists are both manifests.
//! - **Application (`apply`, `series`)**: Replays a manifest of patches onto
//!   the upstream tree, strict first with a 3-way fallback, and reports
//!   which patches applied and which failed.
//! - **Extraction (`extract`)**: Turns a commit into one patch file per
//!   changed file, optionally diffed against an older base.
//! - **Features (`feature`)**: Named groups of files, stored in a YAML
//!   manifest, that can be listed, inspected and applied on their own.
//! - **Version control (`repository`, `git`)**: Every git invocation goes
//!   through the [`repository::GitOperations`] trait.
//!
//! Per-patch failures never abort a run. Only missing preconditions (no git,
//! no series file, unknown commit) are returned as [`error::Error`].

pub mod apply;
pub mod config;
pub mod context;
pub mod defaults;
pub mod error;
pub mod extract;
pub mod feature;
pub mod git;
pub mod manifest;
pub mod output;
pub mod repository;
pub mod series;
pub mod suggestions;

#[cfg(test)]
mod series_proptest;
