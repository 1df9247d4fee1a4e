//! # Review Pipeline
//!
//! The orchestration pipeline, in execution order:
//!
//! - `matcher` - ruleset selection per file via glob scopes
//! - `planner` - (file, rule, hunk) evaluation-unit expansion
//! - `cache` - identity-keyed result cache with hit/miss stats
//! - `dispatcher` - bounded concurrent fan-out to the evaluation service
//! - `aggregate` - per-file verdicts and run-wide totals
//! - `render` - deterministic report text and exit-status derivation
//! - `types` - the data model shared by all stages

pub mod aggregate;
pub mod cache;
pub mod dispatcher;
pub mod matcher;
pub mod planner;
pub mod render;
pub mod types;

pub use aggregate::{aggregate, summarize, Classification, FileVerdict, RunSummary};
pub use cache::{CacheStats, ReviewCache};
pub use dispatcher::{DispatchError, Dispatcher, FileResults};
pub use matcher::match_files;
pub use planner::plan;
pub use render::{exit_status, render};
pub use types::{
    EvaluationResult, EvaluationUnit, FileRecord, Hunk, Level, MatchResult, Rule, Ruleset,
    Violation,
};

#[cfg(test)]
mod pipeline_tests {
    //! End-to-end pipeline runs over a scripted evaluator, exercising
    //! match → plan → dispatch → aggregate → render as one flow.

    use super::*;
    use crate::api::client::ApiError;
    use crate::api::review::Evaluate;
    use async_trait::async_trait;

    /// Flags every hunk containing `TODO` as a violation of the unit's rule.
    struct TodoEvaluator;

    #[async_trait]
    impl Evaluate for TodoEvaluator {
        async fn evaluate(&self, unit: &EvaluationUnit) -> Result<Vec<Violation>, ApiError> {
            if unit.hunk.content.contains("TODO") {
                Ok(vec![Violation {
                    code: unit.rule.code.clone(),
                    level: unit.rule.level,
                    description: unit.rule.description.clone(),
                    start_line: 1,
                    end_line: 1,
                    content: "TODO: fix the parser".to_string(),
                    suggested_fix: Some("Fix the parser".to_string()),
                }])
            } else {
                Ok(Vec::new())
            }
        }
    }

    fn docs_ruleset() -> Ruleset {
        Ruleset {
            name: "docs".to_string(),
            include: vec!["**/*.md".to_string()],
            rules: vec![Rule {
                code: "no-todo".to_string(),
                level: Level::Error,
                description: "no TODO markers".to_string(),
            }],
        }
    }

    fn file(path: &str, content: &str) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    async fn run(files: Vec<FileRecord>) -> (Vec<FileVerdict>, RunSummary, String) {
        colored::control::set_override(false);

        let rulesets = vec![docs_ruleset()];
        let results = match_files(files, &rulesets);
        let units = plan(&results);
        let dispatched = Dispatcher::new(TodoEvaluator)
            .dispatch(units)
            .await
            .unwrap();
        let verdicts = aggregate(dispatched);
        let summary = summarize(&verdicts);
        let report = render(&verdicts, &summary);
        (verdicts, summary, report)
    }

    #[tokio::test]
    async fn test_docs_ruleset_flags_todo_file() {
        let (verdicts, summary, report) = run(vec![
            file("a.md", "# Title\nTODO: fix the parser\n"),
            file("b.md", "# All clean\n"),
            file("src/main.ts", "// TODO out of scope\n"),
        ])
        .await;

        // Only markdown is in scope for the docs ruleset
        assert_eq!(verdicts.len(), 2);
        assert_eq!(verdicts[0].classification(), Classification::Fail);
        assert_eq!(verdicts[1].classification(), Classification::Pass);
        assert_eq!(summary.total_errors, 1);

        assert!(report.contains("  FAIL   📂 a.md"));
        assert!(report.contains("no-todo @@1,1: no TODO markers"));
        assert!(report.contains("💡 Fix the parser"));
        assert!(report.contains("  PASS   📂 b.md"));
        assert!(report.ends_with("1 error 0 warnings\n"));
        assert_eq!(exit_status(&summary), 1);
    }

    #[tokio::test]
    async fn test_docs_ruleset_all_clean_exits_zero() {
        let (verdicts, summary, report) =
            run(vec![file("a.md", "# Title\nAll good.\n")]).await;

        assert_eq!(verdicts[0].classification(), Classification::Pass);
        assert_eq!(summary, RunSummary::default());
        assert!(report.contains("No violations found for current selection"));
        assert!(report.ends_with("0 errors 0 warnings\n"));
        assert_eq!(exit_status(&summary), 0);
    }

    #[tokio::test]
    async fn test_out_of_scope_files_produce_no_dispatch() {
        let (verdicts, summary, _) =
            run(vec![file("src/main.ts", "TODO: not reviewed\n")]).await;

        assert!(verdicts.is_empty());
        assert_eq!(summary, RunSummary::default());
        assert_eq!(exit_status(&summary), 0);
    }
}
