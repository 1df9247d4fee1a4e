//! # Review API
//!
//! Wire types and client method for the evaluation endpoint
//! (`POST /api/v1/review`), plus the [`Evaluate`] seam the dispatcher
//! consumes. The service decides whether a hunk violates a rule; this
//! module only validates the payload at the boundary and maps it into the
//! internal [`Violation`] shape.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::client::{ApiClient, ApiError, to_http_error, to_network_error};
use crate::review::types::{EvaluationUnit, Level, Rule, Violation};

// =============================================================================
// Request Types
// =============================================================================

/// Rule payload sent with an evaluation request.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRuleRef {
    /// Rule code
    pub code: String,
    /// Severity (`error` or `warn`)
    pub level: Level,
    /// Human-readable policy description
    pub description: String,
}

impl From<&Rule> for ReviewRuleRef {
    fn from(rule: &Rule) -> Self {
        Self {
            code: rule.code.clone(),
            level: rule.level,
            description: rule.description.clone(),
        }
    }
}

/// Request to evaluate one hunk against one rule.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRequest {
    /// Path of the originating file
    pub path: String,
    /// Hunk content under review
    pub content: String,
    /// 1-based line number of the hunk's first line
    #[serde(rename = "startLine")]
    pub start_line: u32,
    /// Rule to evaluate against
    pub rule: ReviewRuleRef,
}

impl ReviewRequest {
    /// Build the wire request for an evaluation unit.
    pub fn from_unit(unit: &EvaluationUnit) -> Self {
        Self {
            path: unit.path.clone(),
            content: unit.hunk.content.clone(),
            start_line: unit.hunk.start_line,
            rule: ReviewRuleRef::from(&unit.rule),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// A violation as reported by the service.
///
/// Optional fields reflect that the payload is LLM-produced; entries
/// missing required location/content fields are dropped at the boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct WireViolation {
    /// Description of the violation
    pub description: Option<String>,
    /// Replacement line(s) with the fix applied
    #[serde(rename = "linesWithFix")]
    pub lines_with_fix: Option<String>,
    /// The original offending line(s)
    #[serde(rename = "linesWithoutFix")]
    pub lines_without_fix: Option<String>,
    /// First line number of the violation
    #[serde(rename = "startLine")]
    pub start_line: Option<u32>,
    /// Last line number of the violation
    #[serde(rename = "endLine")]
    pub end_line: Option<u32>,
    /// The specific string that should be replaced
    #[serde(rename = "textToReplace")]
    pub text_to_replace: Option<String>,
    /// The suggested replacement string
    #[serde(rename = "replaceTextWithFix")]
    pub replace_text_with_fix: Option<String>,
}

/// Response from the evaluation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewResponse {
    /// Violations found in the submitted hunk
    #[serde(default)]
    pub violations: Vec<WireViolation>,
    /// Whether the service served this response from its own cache
    #[serde(default)]
    pub cached: bool,
    /// Model that produced the evaluation
    #[serde(default)]
    pub model: Option<String>,
}

impl ReviewResponse {
    /// Validate wire violations and map them into the internal shape.
    ///
    /// Code and level come from the requested rule, so a malformed wire
    /// level can never produce a phantom severity. Entries missing their
    /// location or offending content are skipped with a logged warning
    /// rather than failing the unit.
    pub fn into_violations(self, rule: &Rule) -> Vec<Violation> {
        self.violations
            .into_iter()
            .filter_map(|wire| {
                let (content, start_line, end_line) =
                    match (wire.lines_without_fix, wire.start_line, wire.end_line) {
                        (Some(content), Some(start), Some(end)) => (content, start, end),
                        _ => {
                            log::warn!(
                                "skipping malformed violation for rule {}: missing location or content",
                                rule.code
                            );
                            return None;
                        }
                    };

                Some(Violation {
                    code: rule.code.clone(),
                    level: rule.level,
                    description: wire
                        .description
                        .unwrap_or_else(|| rule.description.clone()),
                    start_line,
                    end_line,
                    content,
                    suggested_fix: wire.lines_with_fix,
                })
            })
            .collect()
    }
}

// =============================================================================
// API Client Methods
// =============================================================================

impl ApiClient {
    /// Evaluate one hunk against one rule.
    ///
    /// # Returns
    ///
    /// * `Ok(ReviewResponse)` - Evaluation completed (possibly with zero
    ///   violations)
    /// * `Err(ApiError)` - Transport or service failure
    pub async fn create_review(&self, request: &ReviewRequest) -> Result<ReviewResponse, ApiError> {
        let url = format!("{}/api/v1/review", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(to_network_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(to_http_error(status, error_text));
        }

        let review: ReviewResponse = response.json().await.map_err(|e| ApiError::ParseError {
            message: format!("Failed to parse review response: {}", e),
        })?;

        Ok(review)
    }
}

// =============================================================================
// Evaluation seam
// =============================================================================

/// The external evaluation capability.
///
/// The dispatcher only knows this seam; production uses [`ApiEvaluator`],
/// tests substitute a scripted implementation.
#[async_trait]
pub trait Evaluate: Send + Sync {
    /// Evaluate a unit's hunk against its rule, returning the violations
    /// found (empty when clean).
    async fn evaluate(&self, unit: &EvaluationUnit) -> Result<Vec<Violation>, ApiError>;
}

/// [`Evaluate`] implementation backed by the remote service.
pub struct ApiEvaluator {
    client: ApiClient,
}

impl ApiEvaluator {
    /// Wrap an API client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Evaluate for ApiEvaluator {
    async fn evaluate(&self, unit: &EvaluationUnit) -> Result<Vec<Violation>, ApiError> {
        let request = ReviewRequest::from_unit(unit);
        let response = self.client.create_review(&request).await?;
        Ok(response.into_violations(&unit.rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::types::Hunk;

    fn rule() -> Rule {
        Rule {
            code: "no-todo".to_string(),
            level: Level::Error,
            description: "no TODO markers".to_string(),
        }
    }

    #[test]
    fn test_review_request_serialization() {
        let unit = EvaluationUnit {
            path: "a.md".to_string(),
            rule: rule(),
            hunk: Hunk::whole_file("TODO: fix"),
        };
        let request = ReviewRequest::from_unit(&unit);
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains("\"path\":\"a.md\""));
        assert!(json.contains("\"startLine\":1"));
        assert!(json.contains("\"level\":\"error\""));
        assert!(json.contains("\"code\":\"no-todo\""));
    }

    #[test]
    fn test_review_response_deserialization() {
        let json = r#"{
            "violations": [
                {
                    "description": "found a TODO",
                    "linesWithFix": "Fix the parser",
                    "linesWithoutFix": "TODO: fix the parser",
                    "startLine": 3,
                    "endLine": 3,
                    "textToReplace": "TODO: fix",
                    "replaceTextWithFix": "Fix"
                }
            ],
            "rule": {"code": "no-todo", "level": "error", "description": "no TODO markers"},
            "path": "a.md",
            "cached": true,
            "model": "gpt-4"
        }"#;
        let response: ReviewResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.violations.len(), 1);
        assert!(response.cached);
        assert_eq!(response.model.as_deref(), Some("gpt-4"));
    }

    #[test]
    fn test_into_violations_maps_fields() {
        let response = ReviewResponse {
            violations: vec![WireViolation {
                description: Some("found a TODO".to_string()),
                lines_with_fix: Some("Fix the parser".to_string()),
                lines_without_fix: Some("TODO: fix the parser".to_string()),
                start_line: Some(3),
                end_line: Some(4),
                text_to_replace: None,
                replace_text_with_fix: None,
            }],
            cached: false,
            model: None,
        };

        let violations = response.into_violations(&rule());
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.code, "no-todo");
        assert_eq!(v.level, Level::Error);
        assert_eq!(v.start_line, 3);
        assert_eq!(v.end_line, 4);
        assert_eq!(v.content, "TODO: fix the parser");
        assert_eq!(v.suggested_fix.as_deref(), Some("Fix the parser"));
    }

    #[test]
    fn test_into_violations_skips_malformed_entries() {
        let response = ReviewResponse {
            violations: vec![
                WireViolation {
                    description: None,
                    lines_with_fix: None,
                    lines_without_fix: None, // missing required content
                    start_line: Some(1),
                    end_line: Some(1),
                    text_to_replace: None,
                    replace_text_with_fix: None,
                },
                WireViolation {
                    description: None,
                    lines_with_fix: None,
                    lines_without_fix: Some("TODO".to_string()),
                    start_line: Some(1),
                    end_line: Some(1),
                    text_to_replace: None,
                    replace_text_with_fix: None,
                },
            ],
            cached: false,
            model: None,
        };

        let violations = response.into_violations(&rule());
        assert_eq!(violations.len(), 1);
        // Missing description falls back to the rule's
        assert_eq!(violations[0].description, "no TODO markers");
    }

    #[test]
    fn test_empty_response_deserializes() {
        let response: ReviewResponse = serde_json::from_str("{}").unwrap();
        assert!(response.violations.is_empty());
        assert!(!response.cached);
    }
}
