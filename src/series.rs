//! # Series Patches
//!
//! A series file lists patch paths, one per line, relative to the series
//! directory (the GNU Quilt convention):
//!
//! ```text
//! # Core branding
//! branding/product_name.patch
//! ui/toolbar.patch   # needs branding first
//! ```
//!
//! - Lines starting with `#` are comments.
//! - Anything after ` #` on a line is an inline comment.
//! - Blank lines are ignored.
//!
//! The listed order is the apply order. It is never changed.

use log::info;
use std::fs;
use std::path::Path;

use crate::apply::{ApplyOptions, ApplyOutcome, PatchApplier};
use crate::context::BuildContext;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::repository::{ensure_git, GitOperations};

/// Parses series file content into patch paths, in listed order.
pub fn parse_series(content: &str) -> Manifest {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let line = match line.split_once(" #") {
                Some((path, _comment)) => path.trim(),
                None => line,
            };
            (!line.is_empty()).then(|| line.to_string())
        })
        .collect()
}

/// Reads and parses a series file.
pub fn read_series(series_file: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(series_file)?;
    Ok(parse_series(&content))
}

/// Checks everything a series run needs before touching the tree.
pub fn validate(ctx: &BuildContext, git: &dyn GitOperations) -> Result<()> {
    ensure_git(git)?;
    if !ctx.series_dir.is_dir() {
        return Err(Error::MissingPath {
            what: "Series patches directory".to_string(),
            path: ctx.series_dir.clone(),
        });
    }
    let series_file = ctx.series_file();
    if !series_file.is_file() {
        return Err(Error::MissingPath {
            what: "Series file".to_string(),
            path: series_file,
        });
    }
    Ok(())
}

/// Applies every patch listed in the series file to the target tree.
///
/// Returns an error only when a precondition fails (see [`validate`]).
/// Individual patch failures are reported through the returned outcome.
pub fn apply_series(
    ctx: &BuildContext,
    git: &dyn GitOperations,
    options: ApplyOptions,
) -> Result<ApplyOutcome> {
    validate(ctx, git)?;

    let series = read_series(&ctx.series_file())?;
    if series.is_empty() {
        info!("No patches listed in series file");
        return Ok(ApplyOutcome::default());
    }

    let applier = PatchApplier::new(git, &ctx.src, options);
    Ok(applier.apply_manifest(&series, &ctx.series_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::tests::ScriptedGit;
    use crate::apply::{ApplyStrategy, FailureReason};
    use tempfile::TempDir;

    fn context_with_series(series: Option<&str>) -> (TempDir, BuildContext) {
        let temp_dir = TempDir::new().unwrap();
        let ctx = BuildContext::new(temp_dir.path(), temp_dir.path().join("src")).unwrap();
        fs::create_dir_all(&ctx.src).unwrap();
        if let Some(content) = series {
            fs::create_dir_all(&ctx.series_dir).unwrap();
            fs::write(ctx.series_file(), content).unwrap();
        }
        (temp_dir, ctx)
    }

    #[test]
    fn test_parse_series_comments_and_blanks() {
        let content = "a.patch\n# comment\nb.patch  # trailing\n\n";
        assert_eq!(parse_series(content).entries(), &["a.patch", "b.patch"]);
    }

    #[test]
    fn test_parse_series_preserves_order_and_duplicates() {
        let content = "z.patch\na.patch\nz.patch\n";
        assert_eq!(
            parse_series(content).entries(),
            &["z.patch", "a.patch", "z.patch"]
        );
    }

    #[test]
    fn test_parse_series_trims_whitespace() {
        let content = "   ui/toolbar.patch   \n\t# indented comment\n";
        assert_eq!(parse_series(content).entries(), &["ui/toolbar.patch"]);
    }

    #[test]
    fn test_parse_series_hash_without_space_is_part_of_path() {
        assert_eq!(parse_series("c#sharp.patch\n").entries(), &["c#sharp.patch"]);
    }

    #[test]
    fn test_parse_series_line_that_is_only_inline_comment() {
        // After trimming, " # x" starts with '#', so it is a full-line comment.
        assert!(parse_series("   # x\n").is_empty());
    }

    #[test]
    fn test_parse_series_crlf() {
        assert_eq!(
            parse_series("a.patch\r\nb.patch\r\n").entries(),
            &["a.patch", "b.patch"]
        );
    }

    #[test]
    fn test_validate_missing_git() {
        let (_temp, ctx) = context_with_series(Some("a.patch\n"));
        let git = ScriptedGit {
            unavailable: true,
            ..Default::default()
        };
        let err = apply_series(&ctx, &git, ApplyOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ToolValidation { .. }));
        assert!(git.calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_series_dir_is_fatal() {
        let (_temp, ctx) = context_with_series(None);
        let err = apply_series(&ctx, &ScriptedGit::default(), ApplyOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Series patches directory not found"));
    }

    #[test]
    fn test_missing_series_file_is_fatal() {
        let (_temp, ctx) = context_with_series(None);
        fs::create_dir_all(&ctx.series_dir).unwrap();
        let err = apply_series(&ctx, &ScriptedGit::default(), ApplyOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Series file not found"));
    }

    #[test]
    fn test_empty_series_yields_empty_outcome() {
        let (_temp, ctx) = context_with_series(Some("# nothing yet\n\n"));
        let git = ScriptedGit::default();

        let outcome = apply_series(&ctx, &git, ApplyOptions::default()).unwrap();
        assert!(outcome.applied.is_empty());
        assert!(outcome.failed.is_empty());
        assert!(git.calls.borrow().is_empty());
    }

    #[test]
    fn test_apply_series_in_listed_order() {
        let (_temp, ctx) = context_with_series(Some("second.patch\nfirst.patch # later\n"));
        for name in ["first.patch", "second.patch"] {
            fs::write(ctx.series_dir.join(name), "diff").unwrap();
        }
        let git = ScriptedGit::default()
            .accept("first.patch", &[ApplyStrategy::Strict])
            .accept("second.patch", &[ApplyStrategy::ThreeWay]);

        let outcome = apply_series(&ctx, &git, ApplyOptions::default()).unwrap();
        assert_eq!(
            outcome.applied,
            vec![
                ctx.series_dir.join("second.patch"),
                ctx.series_dir.join("first.patch")
            ]
        );
        let order: Vec<String> = git.calls.borrow().iter().map(|(n, _)| n.clone()).collect();
        assert_eq!(order, vec!["second.patch", "second.patch", "first.patch"]);
    }

    #[test]
    fn test_apply_series_missing_entry_is_recorded() {
        let (_temp, ctx) = context_with_series(Some("gone.patch\nok.patch\n"));
        fs::write(ctx.series_dir.join("ok.patch"), "diff").unwrap();
        let git = ScriptedGit::default().accept("ok.patch", &[ApplyStrategy::Strict]);

        let outcome = apply_series(&ctx, &git, ApplyOptions::default()).unwrap();
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.failed[0].reason, FailureReason::Missing);
    }
}
