//! Normalized quality-check findings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Whether a finding is an error or a warning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Error,
    Warning,
}

impl IssueKind {
    pub fn label(self) -> &'static str {
        match self {
            IssueKind::Error => "error",
            IssueKind::Warning => "warning",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Low,
    Medium,
    High,
}

impl IssueSeverity {
    pub fn label(self) -> &'static str {
        match self {
            IssueSeverity::Low => "low",
            IssueSeverity::Medium => "medium",
            IssueSeverity::High => "high",
        }
    }
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// Map a linter severity level to kind and severity.
///
/// Level `2` is an error, level `1` a warning. Anything else is treated
/// as a low-severity warning.
pub fn classify_lint_level(level: u8) -> (IssueKind, IssueSeverity) {
    match level {
        2 => (IssueKind::Error, IssueSeverity::High),
        1 => (IssueKind::Warning, IssueSeverity::Medium),
        _ => (IssueKind::Warning, IssueSeverity::Low),
    }
}

/// A single normalized finding produced by a quality check.
///
/// Issues are immutable once built; each run produces a fresh set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeIssue {
    /// Stable identifier derived from path, rule and position.
    pub id: String,

    #[serde(rename = "type")]
    pub kind: IssueKind,

    pub severity: IssueSeverity,

    /// Human-readable message.
    pub message: String,

    /// Source file path as reported by the tool.
    pub file_path: String,

    /// Line number (1-indexed).
    pub line: u32,

    /// Column number (1-indexed).
    pub column: u32,

    /// Rule code (e.g. "no-unused-vars").
    pub rule: Option<String>,

    /// Tool family the finding belongs to.
    pub category: String,

    /// Whether the tool can fix this automatically.
    pub fixable: bool,

    /// Confidence in the finding, 0-100.
    pub confidence: u8,

    /// Tool that produced the finding.
    pub tool: String,

    pub created_at: DateTime<Utc>,
}

impl CodeIssue {
    /// Create a new issue at `file_path:line:column`.
    pub fn new(
        tool: impl Into<String>,
        kind: IssueKind,
        severity: IssueSeverity,
        message: impl Into<String>,
        file_path: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        let tool = tool.into();
        let file_path = file_path.into();
        Self {
            id: issue_id(&tool, &file_path, None, line, column),
            kind,
            severity,
            message: message.into(),
            file_path,
            line,
            column,
            rule: None,
            category: tool.clone(),
            fixable: false,
            confidence: 100,
            tool,
            created_at: Utc::now(),
        }
    }

    /// Set the rule code. Recomputes the identifier.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        let rule = rule.into();
        self.id = issue_id(
            &self.category,
            &self.file_path,
            Some(&rule),
            self.line,
            self.column,
        );
        self.rule = Some(rule);
        self
    }

    pub fn with_fixable(mut self, fixable: bool) -> Self {
        self.fixable = fixable;
        self
    }

    /// Set confidence, clamped to 100.
    pub fn with_confidence(mut self, confidence: u8) -> Self {
        self.confidence = confidence.min(100);
        self
    }
}

/// Deterministic issue identifier: `<category>-<16 hex chars>`.
fn issue_id(category: &str, file_path: &str, rule: Option<&str>, line: u32, column: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_path.as_bytes());
    hasher.update(b"\0");
    hasher.update(rule.unwrap_or("").as_bytes());
    hasher.update(b"\0");
    hasher.update(line.to_le_bytes());
    hasher.update(column.to_le_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}-{}", category, &digest[..16])
}
