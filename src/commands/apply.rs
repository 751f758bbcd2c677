//! Apply command implementation
//!
//! Replays patches onto the upstream source tree:
//!
//! - `apply series` applies the series file, in listed order.
//! - `apply feature <NAME>` applies one feature's patches, in manifest order.
//! - `apply all` applies every file in the patch tree, in path order.
//! - `apply file <PATH>` applies the patch of one source file.
//!
//! Each patch is tried strictly first and then with a 3-way merge. Patches
//! that fail do not stop the run; the command lists them at the end and
//! exits non-zero.

use anyhow::Result;
use clap::{Args, Subcommand};

use forkpatch::apply::{self, ApplyOptions, ApplyOutcome};
use forkpatch::output::{emoji, summarize_outcome};
use forkpatch::repository::DefaultGitOperations;
use forkpatch::{feature, series, suggestions};

use crate::cli::Session;
use crate::commands::feature::explain_feature_error;

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// What to apply
    #[command(subcommand)]
    pub target: ApplyTarget,
}

#[derive(Subcommand, Debug)]
pub enum ApplyTarget {
    /// Apply the patches listed in the series file
    Series(RunArgs),

    /// Apply the patches of one feature
    Feature {
        /// Feature name from the feature manifest
        name: String,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Apply every patch in the patch tree
    All(RunArgs),

    /// Apply the patch of a single source file
    File {
        /// Source path, relative to the tree root (patch is <patches-dir>/<PATH>)
        path: String,

        #[command(flatten)]
        run: RunArgs,
    },
}

/// Options shared by every apply target
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct RunArgs {
    /// Only check whether patches would apply (no 3-way fallback)
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Suppress the summary; failures are still reported through the exit code
    #[arg(short, long)]
    pub quiet: bool,
}

impl RunArgs {
    fn options(self) -> ApplyOptions {
        ApplyOptions {
            dry_run: self.dry_run,
        }
    }
}

/// Execute the apply command
pub fn execute(args: ApplyArgs, session: &Session) -> Result<()> {
    let ctx = session.context()?;
    let git = DefaultGitOperations;

    let run = match &args.target {
        ApplyTarget::Series(run) | ApplyTarget::All(run) => *run,
        ApplyTarget::Feature { run, .. } | ApplyTarget::File { run, .. } => *run,
    };

    if !run.quiet && run.dry_run {
        println!(
            "{} DRY RUN MODE - No changes will be made",
            emoji(&session.output, "🔎", "[DRY RUN]")
        );
        println!();
    }

    let outcome = match &args.target {
        ApplyTarget::Series(_) => {
            series::apply_series(&ctx, &git, run.options()).map_err(suggestions::explain)?
        }
        ApplyTarget::Feature { name, .. } => feature::apply_feature(&ctx, &git, name, run.options())
            .map_err(|e| explain_feature_error(&ctx, e))?,
        ApplyTarget::All(_) => {
            apply::apply_all(&ctx, &git, run.options()).map_err(suggestions::explain)?
        }
        ApplyTarget::File { path, .. } => {
            apply::apply_file(&ctx, &git, path, run.options()).map_err(suggestions::explain)?
        }
    };

    report(session, &outcome, run)
}

/// Prints the summary and turns failed patches into a non-zero exit.
fn report(session: &Session, outcome: &ApplyOutcome, run: RunArgs) -> Result<()> {
    if !run.quiet {
        println!();
        for line in summarize_outcome(&session.output, outcome, run.dry_run) {
            println!("{}", line);
        }
    }

    if outcome.is_success() {
        Ok(())
    } else {
        Err(suggestions::patches_failed(
            outcome.failed.len(),
            outcome.total(),
            run.dry_run,
        ))
    }
}
