//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use forkpatch::context::{BuildContext, ContextOverrides};
use forkpatch::output::OutputConfig;

use crate::commands;

/// Fork Patch - Maintain a browser fork as per-file patches on upstream
#[derive(Parser, Debug)]
#[command(name = "forkpatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Project root holding patches and manifests (defaults to current directory)
    #[arg(long, global = true, value_name = "DIR", env = "FORKPATCH_ROOT")]
    root: Option<PathBuf>,

    /// Upstream source tree to extract from and apply to
    #[arg(long, global = true, value_name = "DIR", env = "FORKPATCH_SRC")]
    src: Option<PathBuf>,

    /// Root of the per-file patch tree
    #[arg(long, global = true, value_name = "DIR", env = "FORKPATCH_PATCHES_DIR")]
    patches_dir: Option<PathBuf>,

    /// Directory containing the series file
    #[arg(long, global = true, value_name = "DIR", env = "FORKPATCH_SERIES_DIR")]
    series_dir: Option<PathBuf>,

    /// Feature manifest file
    #[arg(long, global = true, value_name = "FILE", env = "FORKPATCH_FEATURES")]
    features_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply patches from the series file, a feature, or the whole patch tree
    Apply(commands::apply::ApplyArgs),

    /// Extract one patch per changed file from a commit
    Extract(commands::extract::ExtractArgs),

    /// Manage feature-to-file mappings
    Feature(commands::feature::FeatureArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

/// Settings every command receives.
pub struct Session {
    pub output: OutputConfig,
    overrides: ContextOverrides,
}

impl Session {
    /// Resolves the locations for this invocation.
    pub fn context(&self) -> Result<BuildContext> {
        BuildContext::resolve(&self.overrides).map_err(forkpatch::suggestions::explain)
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let session = Session {
            output: OutputConfig::from_env_and_flag(&self.color),
            overrides: ContextOverrides {
                root: self.root,
                src: self.src,
                patches_dir: self.patches_dir,
                series_dir: self.series_dir,
                features_file: self.features_file,
            },
        };

        match self.command {
            Commands::Apply(args) => commands::apply::execute(args, &session),
            Commands::Extract(args) => commands::extract::execute(args, &session),
            Commands::Feature(args) => commands::feature::execute(args, &session),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Routes `log` records to stderr. `RUST_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
