//! # Ruleset Matcher
//!
//! Resolves which rulesets govern which files. A ruleset matches a file
//! when any of its include patterns matches the file path using standard
//! glob semantics (`*`, `**`, `?`, character classes; path-separator
//! aware). Files matching zero rulesets are dropped silently — the engine
//! only reviews in-scope content.

use glob::{MatchOptions, Pattern};

use crate::review::types::{FileRecord, MatchResult, Ruleset};

/// Glob options for path matching: `*` and `?` never cross a `/`, so only
/// `**` recurses into directories.
pub(crate) fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// Check whether any include pattern of the ruleset matches the path.
///
/// Invalid patterns are rejected at configuration load time; one that
/// slips through simply never matches.
pub fn ruleset_matches(ruleset: &Ruleset, path: &str) -> bool {
    ruleset.include.iter().any(|pattern| {
        match Pattern::new(pattern) {
            Ok(glob) => glob.matches_with(path, match_options()),
            Err(_) => false,
        }
    })
}

/// Pair each file with the rulesets that govern it, dropping files no
/// ruleset matches.
///
/// Output order follows input file order; within a file, matching rulesets
/// preserve declaration order. An empty result is the neutral "no matching
/// files" outcome, not an error.
pub fn match_files(files: Vec<FileRecord>, rulesets: &[Ruleset]) -> Vec<MatchResult> {
    files
        .into_iter()
        .filter_map(|file| {
            let matching_rulesets: Vec<Ruleset> = rulesets
                .iter()
                .filter(|ruleset| ruleset_matches(ruleset, &file.path))
                .cloned()
                .collect();

            if matching_rulesets.is_empty() {
                None
            } else {
                Some(MatchResult {
                    file,
                    matching_rulesets,
                })
            }
        })
        .collect()
}
