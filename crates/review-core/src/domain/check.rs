//! Per-check outcomes of a quality check run.

use serde::{Deserialize, Serialize};

use super::issue::{CodeIssue, IssueSeverity};

/// Result of running one quality check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed {
        check: String,
        issues: Vec<CodeIssue>,
        duration_ms: u64,
    },
    Failed {
        check: String,
        error: String,
        duration_ms: u64,
    },
}

impl CheckOutcome {
    pub fn check_name(&self) -> &str {
        match self {
            CheckOutcome::Passed { check, .. } | CheckOutcome::Failed { check, .. } => check,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CheckOutcome::Failed { .. })
    }

    /// Issues reported by the check; empty for a failed check.
    pub fn issues(&self) -> &[CodeIssue] {
        match self {
            CheckOutcome::Passed { issues, .. } => issues,
            CheckOutcome::Failed { .. } => &[],
        }
    }
}

/// Outcomes of every enabled check, in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckRunReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl CheckRunReport {
    pub fn new(outcomes: Vec<CheckOutcome>) -> Self {
        Self { outcomes }
    }

    /// All issues, concatenated in registration order.
    pub fn issues(&self) -> Vec<CodeIssue> {
        self.outcomes
            .iter()
            .flat_map(|o| o.issues().iter().cloned())
            .collect()
    }

    pub fn issue_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.issues().len()).sum()
    }

    /// Number of issues at the given severity.
    pub fn count_by_severity(&self, severity: IssueSeverity) -> usize {
        self.outcomes
            .iter()
            .flat_map(|o| o.issues())
            .filter(|i| i.severity == severity)
            .count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    pub fn into_outcomes(self) -> Vec<CheckOutcome> {
        self.outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::IssueKind;

    fn issue(sev: IssueSeverity) -> CodeIssue {
        CodeIssue::new("eslint", IssueKind::Warning, sev, "m", "a.ts", 1, 1)
    }

    #[test]
    fn test_report_concatenates_in_order() {
        let report = CheckRunReport::new(vec![
            CheckOutcome::Passed {
                check: "eslint".to_string(),
                issues: vec![issue(IssueSeverity::High)],
                duration_ms: 5,
            },
            CheckOutcome::Failed {
                check: "broken".to_string(),
                error: "spawn failed".to_string(),
                duration_ms: 1,
            },
            CheckOutcome::Passed {
                check: "patterns".to_string(),
                issues: vec![issue(IssueSeverity::Low), issue(IssueSeverity::Low)],
                duration_ms: 2,
            },
        ]);

        let issues = report.issues();
        assert_eq!(issues.len(), 3);
        assert_eq!(issues[0].severity, IssueSeverity::High);
        assert_eq!(report.issue_count(), 3);
        assert_eq!(report.count_by_severity(IssueSeverity::Low), 2);
        assert_eq!(report.failed().count(), 1);
    }

    #[test]
    fn test_failed_outcome_has_no_issues() {
        let outcome = CheckOutcome::Failed {
            check: "eslint".to_string(),
            error: "exit 2".to_string(),
            duration_ms: 0,
        };
        assert!(outcome.issues().is_empty());
        assert_eq!(outcome.check_name(), "eslint");
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = CheckOutcome::Failed {
            check: "eslint".to_string(),
            error: "boom".to_string(),
            duration_ms: 3,
        };
        let json = serde_json::to_value(&outcome).expect("serialize");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "boom");
    }
}
