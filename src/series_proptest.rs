//! Property-based tests for series file parsing.
//!
//! Series files are hand-edited, so the parser has to hold up against
//! arbitrary comment placement, indentation and blank lines without ever
//! reordering or losing patch entries.

#[cfg(test)]
mod proptest_tests {
    use crate::series::parse_series;
    use proptest::prelude::*;

    /// A patch path as it would appear in a series file.
    fn patch_path() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,8}(/[a-z0-9_]{1,8}){0,3}\\.patch"
    }

    // ============================================================================
    // Ordering
    // ============================================================================

    proptest! {
        /// Property: plain entries come back in exactly the written order
        #[test]
        fn parse_series_preserves_order(paths in prop::collection::vec(patch_path(), 0..20)) {
            let content = paths.join("\n");
            let parsed = parse_series(&content);
            prop_assert_eq!(parsed.entries(), paths.as_slice());
        }

        /// Property: duplicates are kept, the parser never deduplicates
        #[test]
        fn parse_series_keeps_duplicates(path in patch_path(), times in 1usize..5) {
            let content = vec![path.clone(); times].join("\n");
            prop_assert_eq!(parse_series(&content).len(), times);
        }
    }

    // ============================================================================
    // Comments and whitespace
    // ============================================================================

    proptest! {
        /// Property: full-line comments and blank lines never produce entries
        #[test]
        fn parse_series_drops_comment_lines(
            paths in prop::collection::vec(patch_path(), 0..10),
            comment in "[ -~]{0,30}",
        ) {
            let mut content = String::new();
            for path in &paths {
                content.push_str(&format!("#{}\n\n{}\n   \n", comment, path));
            }
            let parsed = parse_series(&content);
            prop_assert_eq!(parsed.entries(), paths.as_slice());
        }

        /// Property: inline comments are stripped from the entry
        #[test]
        fn parse_series_strips_inline_comments(
            path in patch_path(),
            comment in "[ -~]{0,30}",
        ) {
            let content = format!("{} #{}", path, comment);
            let parsed = parse_series(&content);
            prop_assert_eq!(parsed.entries(), &[path]);
        }

        /// Property: surrounding whitespace does not change the entry
        #[test]
        fn parse_series_trims_entries(
            path in patch_path(),
            lead in "[ \t]{0,4}",
            trail in "[ \t]{0,4}",
        ) {
            let content = format!("{}{}{}\r\n", lead, path, trail);
            let parsed = parse_series(&content);
            prop_assert_eq!(parsed.entries(), &[path]);
        }

        /// Property: parsing never panics and never yields empty entries
        #[test]
        fn parse_series_never_yields_empty_entries(content in "\\PC*") {
            let parsed = parse_series(&content);
            prop_assert!(parsed.entries().iter().all(|e| !e.is_empty()));
        }
    }
}
