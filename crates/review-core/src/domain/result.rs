//! The pipeline's output record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quality score reported when nothing lowered it.
pub const DEFAULT_QUALITY_SCORE: u8 = 100;

/// Outcome of one review run. Never persisted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeReviewResult {
    pub success: bool,

    /// Free-text review returned by the completion endpoint.
    pub review: String,

    /// Number of changed files handed to diff rendering.
    pub files_reviewed: usize,

    pub issues_found: usize,

    pub suggestions: Vec<String>,

    /// Derived score, 0-100.
    pub quality_score: u8,

    pub timestamp: DateTime<Utc>,

    /// Set only when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CodeReviewResult {
    /// A successful review.
    pub fn succeeded(
        review: String,
        files_reviewed: usize,
        issues_found: usize,
        suggestions: Vec<String>,
        quality_score: u8,
    ) -> Self {
        Self {
            success: true,
            review,
            files_reviewed,
            issues_found,
            suggestions,
            quality_score,
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// The change-set had no changed files.
    pub fn no_changes() -> Self {
        Self::succeeded(
            "No files changed in this PR".to_string(),
            0,
            0,
            Vec::new(),
            DEFAULT_QUALITY_SCORE,
        )
    }

    /// A fatal failure carrying the original error message.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            review: String::new(),
            files_reviewed: 0,
            issues_found: 0,
            suggestions: Vec::new(),
            quality_score: 0,
            timestamp: Utc::now(),
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_changes_result() {
        let result = CodeReviewResult::no_changes();
        assert!(result.success);
        assert_eq!(result.files_reviewed, 0);
        assert_eq!(result.quality_score, DEFAULT_QUALITY_SCORE);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failed_result_keeps_message() {
        let result = CodeReviewResult::failed("github request failed: timeout");
        assert!(!result.success);
        assert_eq!(result.quality_score, 0);
        assert_eq!(
            result.error.as_deref(),
            Some("github request failed: timeout")
        );
    }

    #[test]
    fn test_error_omitted_from_json_on_success() {
        let result = CodeReviewResult::succeeded("ok".to_string(), 2, 0, vec![], 100);
        let json = serde_json::to_value(&result).expect("serialize");
        assert!(json.get("error").is_none());
        assert_eq!(json["filesReviewed"], 2);
        assert_eq!(json["qualityScore"], 100);
    }
}
