//! # Review Data Model
//!
//! Core types shared by the matcher, planner, dispatcher, aggregator, and
//! renderer. All values are created fresh per invocation; nothing here is
//! persisted across runs.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Severity level of a rule or violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// A breach that fails the run
    Error,
    /// A breach that is reported but never fails the run
    Warn,
}

impl Level {
    /// Wire/report representation (`error` or `warn`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
        }
    }
}

/// A single checkable policy with a severity level and human description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule code, unique within its ruleset (e.g., `no-todo`)
    pub code: String,
    /// Severity assigned to violations of this rule
    pub level: Level,
    /// Human-readable description of the policy
    pub description: String,
}

/// Named group of rules scoped to files via include glob patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Ruleset name (e.g., `docs`)
    pub name: String,
    /// Include patterns with standard glob semantics (`*`, `**`, `?`, `[...]`)
    pub include: Vec<String>,
    /// Rules in declaration order
    pub rules: Vec<Rule>,
}

/// A file selected for review. Content is read once and immutable thereafter.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path relative to the working directory
    pub path: String,
    /// Full file content
    pub content: String,
}

/// A file together with the rulesets whose include patterns matched it.
///
/// Files matching zero rulesets never appear here; they are dropped by the
/// matcher.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The matched file
    pub file: FileRecord,
    /// Matching rulesets in declaration order
    pub matching_rulesets: Vec<Ruleset>,
}

/// A contiguous span of a file's content submitted for evaluation against
/// one rule.
///
/// Whole-file review produces exactly one hunk per file with
/// `start_line == 1`. A diff-aware producer can supply several narrower
/// hunks per file without any downstream change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// 1-based line number of the first line of the span
    pub start_line: u32,
    /// The span's content
    pub content: String,
}

impl Hunk {
    /// The whole-file hunk: the entire content starting at line 1.
    pub fn whole_file(content: impl Into<String>) -> Self {
        Self {
            start_line: 1,
            content: content.into(),
        }
    }
}

/// The atomic (file, rule, hunk) tuple submitted to the dispatcher.
#[derive(Debug, Clone)]
pub struct EvaluationUnit {
    /// Path of the originating file
    pub path: String,
    /// Rule the hunk is evaluated against
    pub rule: Rule,
    /// The content span under review
    pub hunk: Hunk,
}

impl EvaluationUnit {
    /// Identity of this unit; two units with the same key are
    /// interchangeable and must not trigger two remote evaluations.
    pub fn key(&self) -> UnitKey {
        UnitKey {
            path: self.path.clone(),
            rule_code: self.rule.code.clone(),
            start_line: self.hunk.start_line,
            content_hash: xxh3_64(self.hunk.content.as_bytes()),
        }
    }
}

/// Content-addressed identity of an [`EvaluationUnit`]; the cache key.
///
/// The hunk content enters the key as an xxh3-64 hash, so identical content
/// at the same location always maps to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitKey {
    path: String,
    rule_code: String,
    start_line: u32,
    content_hash: u64,
}

/// A reported breach of a rule within a hunk.
///
/// Produced only by the external evaluation service; the orchestration
/// engine passes these fields through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Code of the breached rule
    pub code: String,
    /// Severity, taken from the breached rule
    pub level: Level,
    /// What is wrong
    pub description: String,
    /// First line of the offending span
    pub start_line: u32,
    /// Last line of the offending span
    pub end_line: u32,
    /// The offending content
    pub content: String,
    /// Replacement text, when the service could produce one
    pub suggested_fix: Option<String>,
}

/// Outcome of evaluating one unit.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    /// The unit that was evaluated
    pub unit: EvaluationUnit,
    /// Violations found in the unit's hunk (empty when clean or failed)
    pub violations: Vec<Violation>,
    /// True when the result was served from the cache instead of a
    /// remote call
    pub cached: bool,
    /// Soft-failure note when the unit could not be evaluated. A set note
    /// distinguishes "unchecked" from "clean" in the report.
    pub error: Option<String>,
}
