//! # Feature Command Implementation
//!
//! `feature add`, `feature list` and `feature show` operate on the feature
//! manifest. `list` and `show` can emit JSON for scripts.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use forkpatch::context::BuildContext;
use forkpatch::error::Error;
use forkpatch::feature::{self, Feature};
use forkpatch::output::emoji;
use forkpatch::repository::DefaultGitOperations;
use forkpatch::suggestions;

use crate::cli::Session;

/// Manage feature-to-file mappings
#[derive(Args, Debug)]
pub struct FeatureArgs {
    #[command(subcommand)]
    pub command: FeatureCommand,
}

#[derive(Subcommand, Debug)]
pub enum FeatureCommand {
    /// Add the files touched by a commit to a feature
    Add {
        /// Feature name; created if it does not exist
        name: String,

        /// Commit whose changed files are added
        commit: String,

        /// Description to set on the feature
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List all features
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show one feature and its files
    Show {
        /// Feature name
        name: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct FeatureView<'a> {
    name: &'a str,
    #[serde(flatten)]
    feature: &'a Feature,
}

/// Execute the `feature` command.
pub fn execute(args: FeatureArgs, session: &Session) -> Result<()> {
    let ctx = session.context()?;

    match args.command {
        FeatureCommand::Add {
            name,
            commit,
            description,
        } => {
            let added = feature::add_feature(
                &ctx,
                &DefaultGitOperations,
                &name,
                &commit,
                description.as_deref(),
            )
            .map_err(suggestions::explain)?;
            println!(
                "{} Feature '{}': {} files added, {} total",
                emoji(&session.output, "✅", "[OK]"),
                name,
                added.added,
                added.total
            );
        }
        FeatureCommand::List { json } => {
            let features = feature::list_features(&ctx).map_err(suggestions::explain)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&features)?);
            } else if features.is_empty() {
                println!("No features defined in {}", ctx.features_file.display());
            } else {
                println!("Features ({}):", features.len());
                for summary in &features {
                    if summary.description.is_empty() {
                        println!("  {} ({} files)", summary.name, summary.file_count);
                    } else {
                        println!(
                            "  {} ({} files) - {}",
                            summary.name, summary.file_count, summary.description
                        );
                    }
                }
            }
        }
        FeatureCommand::Show { name, json } => {
            let found =
                feature::show_feature(&ctx, &name).map_err(|e| explain_feature_error(&ctx, e))?;
            if json {
                let view = FeatureView {
                    name: &name,
                    feature: &found,
                };
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("Feature: {}", name);
                if !found.description.is_empty() {
                    println!("Description: {}", found.description);
                }
                println!("Files ({}):", found.files.len());
                for entry in feature::resolve_patches(&ctx, &name, &found) {
                    let marker = if entry.exists() {
                        emoji(&session.output, "📄", " ")
                    } else {
                        emoji(&session.output, "⚠️", "!")
                    };
                    println!("  {} {}", marker, entry.relative);
                }
            }
        }
    }

    Ok(())
}

/// Like [`suggestions::explain`], but suggests a close feature name for an
/// unknown feature.
pub fn explain_feature_error(ctx: &BuildContext, error: Error) -> anyhow::Error {
    match error {
        Error::FeatureNotFound { name } => {
            let known: Vec<String> = feature::list_features(ctx)
                .map(|list| list.into_iter().map(|f| f.name).collect())
                .unwrap_or_default();
            suggestions::feature_not_found(&name, &known)
        }
        other => suggestions::explain(other),
    }
}
