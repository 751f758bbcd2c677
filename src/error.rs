//! # Error Handling
//!
//! This module defines the centralized error type for `forkpatch`. It uses
//! the `thiserror` library to describe every failure the library can raise,
//! with enough context (command, path, commit) to act on the message.
//!
//! Only *fatal* conditions live here: missing tools, missing series
//! directories, unknown commits, unreadable manifests. Per-patch failures
//! during a series run are not errors; they are collected into the outcome
//! returned by the applier (see [`crate::apply::ApplyOutcome`]).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for forkpatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// The `.forkpatch.yaml` project file could not be parsed.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A git command could not be spawned or exited unsuccessfully.
    #[error("Git command failed in {}: {command} - {stderr}", cwd.display())]
    GitCommand {
        command: String,
        cwd: PathBuf,
        stderr: String,
    },

    /// A required external tool is missing or unusable.
    #[error("Tool validation error: {tool} - {message}")]
    ToolValidation { tool: String, message: String },

    /// The target tree is not a git work tree.
    #[error("Not a git repository: {}", path.display())]
    NotARepository { path: PathBuf },

    /// A commit reference did not resolve to a commit.
    #[error("Commit not found: {commit}")]
    CommitNotFound { commit: String },

    /// A directory or file required before any mutation is missing.
    #[error("{what} not found: {}", path.display())]
    MissingPath { what: String, path: PathBuf },

    /// A feature name is not present in the feature manifest.
    #[error("Feature not found: {name}")]
    FeatureNotFound { name: String },

    /// The feature manifest has invalid content.
    #[error("Feature manifest error in {}: {message}", path.display())]
    FeatureManifest { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
