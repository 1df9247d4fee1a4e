//! # Result Aggregator
//!
//! Folds per-unit violation sets into per-file verdicts and a run-wide
//! summary. All folds are order-independent; classification is derived,
//! never stored.

use crate::review::dispatcher::FileResults;
use crate::review::types::{EvaluationResult, Level};

/// Pass/warn/fail classification of a file, derived from its counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No violations at all
    Pass,
    /// Warnings only
    Warn,
    /// At least one error-level violation
    Fail,
}

/// A file's aggregated review outcome.
#[derive(Debug, Clone)]
pub struct FileVerdict {
    /// File path
    pub path: String,
    /// Count of error-level violations across all evaluation results
    pub error_count: usize,
    /// Count of warn-level violations across all evaluation results
    pub warning_count: usize,
    /// Per-unit results in planned order
    pub results: Vec<EvaluationResult>,
}

impl FileVerdict {
    /// Exactly one classification per file: `fail` beats `warn` beats
    /// `pass`.
    pub fn classification(&self) -> Classification {
        if self.error_count > 0 {
            Classification::Fail
        } else if self.warning_count > 0 {
            Classification::Warn
        } else {
            Classification::Pass
        }
    }
}

/// Run-wide violation totals; the terminal artifact of an invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Sum of error counts across all files
    pub total_errors: usize,
    /// Sum of warning counts across all files
    pub total_warnings: usize,
}

/// Fold dispatch output into per-file verdicts, preserving file order.
pub fn aggregate(file_results: Vec<FileResults>) -> Vec<FileVerdict> {
    file_results
        .into_iter()
        .map(|file| {
            let mut error_count = 0;
            let mut warning_count = 0;

            for result in &file.results {
                for violation in &result.violations {
                    match violation.level {
                        Level::Error => error_count += 1,
                        Level::Warn => warning_count += 1,
                    }
                }
            }

            FileVerdict {
                path: file.path,
                error_count,
                warning_count,
                results: file.results,
            }
        })
        .collect()
}

/// Sum verdict counts into the run summary (commutative fold).
pub fn summarize(verdicts: &[FileVerdict]) -> RunSummary {
    verdicts.iter().fold(RunSummary::default(), |acc, verdict| {
        RunSummary {
            total_errors: acc.total_errors + verdict.error_count,
            total_warnings: acc.total_warnings + verdict.warning_count,
        }
    })
}
