//! # Report Renderer
//!
//! Deterministic textual report over aggregated verdicts: same inputs,
//! byte-identical text. Pure — the renderer emits a string and derives the
//! process outcome; printing and exiting happen at the call site.

use colored::Colorize;

use crate::exit_codes::{EXIT_SUCCESS, EXIT_VIOLATIONS_FOUND};
use crate::review::aggregate::{Classification, FileVerdict, RunSummary};

/// Maximum rendered length of offending content before truncation.
const MAX_CONTENT_LEN: usize = 100;

/// Choose singular or plural form for a count (1 is singular, everything
/// else including 0 is plural).
pub fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// Truncate to `max` characters, appending an ellipsis when shortened.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}…")
    }
}

fn classification_badge(classification: Classification) -> String {
    match classification {
        Classification::Pass => "  PASS  ".white().on_green().to_string(),
        Classification::Warn => "  WARN  ".white().on_yellow().to_string(),
        Classification::Fail => "  FAIL  ".white().on_red().to_string(),
    }
}

/// Render the full report: one block per file, then the totals footer.
pub fn render(verdicts: &[FileVerdict], summary: &RunSummary) -> String {
    let mut out = String::new();

    for verdict in verdicts {
        render_file(&mut out, verdict);
    }

    out.push_str(&format!(
        "{} {}\n",
        format!(
            "{} {}",
            summary.total_errors,
            pluralize(summary.total_errors, "error", "errors")
        )
        .red(),
        format!(
            "{} {}",
            summary.total_warnings,
            pluralize(summary.total_warnings, "warning", "warnings")
        )
        .yellow(),
    ));

    out
}

fn render_file(out: &mut String, verdict: &FileVerdict) {
    out.push_str(&format!(
        "{} 📂 {}\n\n",
        classification_badge(verdict.classification()),
        verdict.path
    ));

    let unevaluated: Vec<_> = verdict
        .results
        .iter()
        .filter(|r| r.error.is_some())
        .collect();

    // "Unchecked" is not "clean": failed units are surfaced explicitly so
    // a pass badge can be trusted.
    for result in &unevaluated {
        let note = result.error.as_deref().unwrap_or("unknown error");
        out.push_str(&format!(
            "{}\n",
            format!(
                "⚠️  {}: could not evaluate ({})",
                result.unit.rule.code, note
            )
            .yellow()
        ));
    }
    if !unevaluated.is_empty() {
        out.push('\n');
    }

    if verdict.error_count == 0 && verdict.warning_count == 0 {
        out.push_str(&format!(
            "{}\n\n",
            "No violations found for current selection".dimmed()
        ));
        return;
    }

    for result in &verdict.results {
        for violation in &result.violations {
            let icon = match violation.level {
                crate::review::types::Level::Error => "❌",
                crate::review::types::Level::Warn => "⚠️ ",
            };

            out.push_str(&format!(
                "{} {}\n",
                format!(
                    "{icon} {} @@{},{}:",
                    violation.code, violation.start_line, violation.end_line
                )
                .bold(),
                violation.description
            ));
            out.push_str(&format!(
                "{}\n",
                truncate(&violation.content, MAX_CONTENT_LEN)
                    .dimmed()
                    .strikethrough()
            ));
            out.push_str(&format!(
                "{}\n\n",
                format!(
                    "💡 {}",
                    violation
                        .suggested_fix
                        .as_deref()
                        .unwrap_or("No fix available")
                )
                .italic()
            ));
        }
    }
}

/// Derive the process-level outcome: errors fail the run, warnings never
/// do.
pub fn exit_status(summary: &RunSummary) -> i32 {
    if summary.total_errors > 0 {
        EXIT_VIOLATIONS_FOUND
    } else {
        EXIT_SUCCESS
    }
}
