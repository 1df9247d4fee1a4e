//! # Unit Planner
//!
//! Expands each (file, matching ruleset) pair into concrete evaluation
//! units: one unit per `file × rule × hunk`. This is the combinatorial
//! fan-out — a file governed by two rulesets of three rules each yields six
//! units in whole-file mode.

use crate::review::types::{EvaluationUnit, FileRecord, Hunk, MatchResult};

/// Hunk producer for whole-file review: the singleton whole-file hunk.
///
/// A diff-aware producer would return one hunk per changed span instead;
/// the planner and everything downstream are agnostic to the hunk count.
pub fn whole_file_hunks(file: &FileRecord) -> Vec<Hunk> {
    vec![Hunk::whole_file(file.content.clone())]
}

/// Flatten match results into the ordered sequence of evaluation units.
///
/// Units appear in file order, then ruleset declaration order, then rule
/// order, then hunk order. No unit is created for a rule whose ruleset did
/// not match the file.
pub fn plan(match_results: &[MatchResult]) -> Vec<EvaluationUnit> {
    plan_with(match_results, whole_file_hunks)
}

/// Flatten with an explicit hunk producer.
pub fn plan_with<F>(match_results: &[MatchResult], hunks: F) -> Vec<EvaluationUnit>
where
    F: Fn(&FileRecord) -> Vec<Hunk>,
{
    let mut units = Vec::new();

    for result in match_results {
        let file_hunks = hunks(&result.file);
        for ruleset in &result.matching_rulesets {
            for rule in &ruleset.rules {
                for hunk in &file_hunks {
                    units.push(EvaluationUnit {
                        path: result.file.path.clone(),
                        rule: rule.clone(),
                        hunk: hunk.clone(),
                    });
                }
            }
        }
    }

    units
}
