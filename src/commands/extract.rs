//! # Extract Command Implementation
//!
//! Writes one patch per file changed by a commit into the patch tree.
//!
//! ```bash
//! # Patches for everything HEAD touched, diffed against HEAD~1
//! forkpatch extract HEAD
//!
//! # Same files, but each diffed against the upstream release tag
//! forkpatch extract HEAD --base 137.0.7151.69 --force
//!
//! # Write under chromium_patches/sidebar/ and record in features.yaml
//! forkpatch extract abc123 --feature sidebar
//! ```

use anyhow::Result;
use clap::Args;
use log::warn;

use forkpatch::extract::{extract_commit, ExtractOptions};
use forkpatch::output::emoji;
use forkpatch::repository::DefaultGitOperations;
use forkpatch::suggestions;

use crate::cli::Session;

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Commit to extract
    pub commit: String,

    /// Diff each file from this revision instead of the commit's parent
    #[arg(long, value_name = "REV")]
    pub base: Option<String>,

    /// Overwrite existing patch files
    #[arg(short, long)]
    pub force: bool,

    /// Include binary file changes
    #[arg(long)]
    pub include_binary: bool,

    /// Show commit metadata and each written file
    #[arg(short, long)]
    pub verbose: bool,

    /// Write under this feature's directory and record the files in the
    /// feature manifest
    #[arg(long, value_name = "NAME")]
    pub feature: Option<String>,
}

impl From<ExtractArgs> for ExtractOptions {
    fn from(args: ExtractArgs) -> Self {
        ExtractOptions {
            verbose: args.verbose,
            force: args.force,
            include_binary: args.include_binary,
            base: args.base,
            feature: args.feature,
        }
    }
}

/// Execute the `extract` command.
pub fn execute(args: ExtractArgs, session: &Session) -> Result<()> {
    let ctx = session.context()?;
    let commit = args.commit.clone();
    let options = ExtractOptions::from(args);

    let count = extract_commit(&ctx, &DefaultGitOperations, &commit, &options)
        .map_err(suggestions::explain)?;

    if count == 0 {
        warn!("No patches extracted from {}", commit);
    } else {
        println!(
            "{} Extracted {} patches from {} into {}",
            emoji(&session.output, "✅", "[OK]"),
            count,
            commit,
            ctx.feature_dir(options.feature.as_deref()).display()
        );
    }
    Ok(())
}
