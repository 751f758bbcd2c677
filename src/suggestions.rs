//! # Error Suggestions
//!
//! Helpers that turn library errors into messages saying what went wrong
//! AND how to fix it. Commands route fatal errors through [`explain`] before
//! handing them to `anyhow`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forkpatch::suggestions;
//!
//! let outcome = series::apply_series(&ctx, &git, options).map_err(suggestions::explain)?;
//! ```

use std::path::Path;

use crate::error::Error;

/// Converts a library error into an `anyhow::Error`, adding hints for the
/// conditions a user can fix.
pub fn explain(error: Error) -> anyhow::Error {
    match error {
        Error::ToolValidation { tool, .. } if tool == "git" => git_not_found(),
        Error::MissingPath { what, path } => missing_path(&what, &path),
        Error::NotARepository { path } => not_a_repository(&path),
        Error::CommitNotFound { commit } => commit_not_found(&commit),
        Error::FeatureNotFound { name } => feature_not_found(&name, &[]),
        other => other.into(),
    }
}

/// Generate an error for when git cannot be run.
pub fn git_not_found() -> anyhow::Error {
    anyhow::anyhow!(
        "Git is not available in PATH\n\n\
         hint: Install git and make sure 'git --version' works in this shell"
    )
}

/// Generate an error for a missing series directory, series file or patch
/// tree.
pub fn missing_path(what: &str, path: &Path) -> anyhow::Error {
    let hint = match what {
        "Series patches directory" => {
            "hint: Use --series-dir or FORKPATCH_SERIES_DIR to point at the series directory"
        }
        "Series file" => "hint: Create a 'series' file listing one patch path per line",
        "Patches directory" => {
            "hint: Use --patches-dir or FORKPATCH_PATCHES_DIR to point at the patch tree\n\
             hint: Run 'forkpatch extract <COMMIT>' to create patches"
        }
        _ => "hint: Check the paths in .forkpatch.yaml",
    };

    anyhow::anyhow!(
        "{what} not found: {path}\n\n{hint}",
        path = path.display()
    )
}

/// Generate an error for a target tree that is not a git work tree.
pub fn not_a_repository(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Not a git repository: {path}\n\n\
         hint: Use --src or FORKPATCH_SRC to point at the upstream checkout\n\
         hint: Set 'src' in .forkpatch.yaml",
        path = path.display()
    )
}

/// Generate an error for a commit that does not resolve.
pub fn commit_not_found(commit: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Commit not found: {commit}\n\n\
         hint: Run 'git log --oneline' in the source tree to find the commit\n\
         hint: Fetch the branch that contains it if it only exists upstream"
    )
}

/// Generate an error for an unknown feature, suggesting a close match from
/// `known` when there is one.
pub fn feature_not_found(name: &str, known: &[String]) -> anyhow::Error {
    let candidates: Vec<&str> = known.iter().map(String::as_str).collect();
    let did_you_mean = find_similar(name, &candidates)
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Feature not found: {name}{did_you_mean}\n\n\
         hint: Run 'forkpatch feature list' to see defined features\n\
         hint: Run 'forkpatch feature add {name} <COMMIT>' to create it"
    )
}

/// Generate the error returned when some patches did not apply.
pub fn patches_failed(failed: usize, total: usize, dry_run: bool) -> anyhow::Error {
    if dry_run {
        anyhow::anyhow!(
            "{failed} of {total} patches would not apply cleanly\n\n\
             hint: A dry run does not try the 3-way fallback; some of these may still apply"
        )
    } else {
        anyhow::anyhow!(
            "{failed} of {total} patches failed to apply\n\n\
             hint: Resolve the listed patches against the current source tree\n\
             hint: Re-extract a fixed patch with 'forkpatch extract <COMMIT> --force'"
        )
    }
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, &ca) in a_chars.iter().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }
    previous[b_chars.len()]
}
