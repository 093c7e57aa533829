//! ESLint-backed quality check.
//!
//! Runs the configured linter command with autofix and JSON output against
//! `<target>/**/*.{ext,...}` and maps every reported message to a
//! [`CodeIssue`].

use std::path::Path;

use async_trait::async_trait;
use review_core::{classify_lint_level, ChecksConfig, CodeIssue};
use serde::Deserialize;
use tracing::{debug, info};

use crate::check::QualityCheck;
use crate::command::{run_tool, ToolCommand};
use crate::error::{CheckError, Result};

const TOOL: &str = "eslint";

/// Confidence assigned to linter findings.
const LINT_CONFIDENCE: u8 = 95;

/// Exit status ESLint uses when it found problems.
const EXIT_PROBLEMS_FOUND: i32 = 1;

/// One file entry of `--format json` output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintFileResult {
    file_path: String,
    #[serde(default)]
    messages: Vec<EslintMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintMessage {
    rule_id: Option<String>,
    severity: u8,
    message: String,
    line: Option<u32>,
    column: Option<u32>,
    fix: Option<serde_json::Value>,
    #[serde(default)]
    fatal: bool,
}

impl EslintMessage {
    fn into_issue(self, file_path: &str) -> CodeIssue {
        let (kind, severity) = classify_lint_level(self.severity);
        let issue = CodeIssue::new(
            TOOL,
            kind,
            severity,
            self.message,
            file_path,
            self.line.unwrap_or(1),
            self.column.unwrap_or(1),
        )
        .with_fixable(self.fix.is_some() && !self.fatal)
        .with_confidence(LINT_CONFIDENCE);

        match self.rule_id {
            Some(rule) => issue.with_rule(rule),
            None => issue,
        }
    }
}

/// Parse `--format json` output into issues.
pub fn parse_eslint_output(stdout: &str) -> Result<Vec<CodeIssue>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let results: Vec<EslintFileResult> =
        serde_json::from_str(trimmed).map_err(|e| CheckError::Parse {
            tool: TOOL.to_string(),
            message: e.to_string(),
        })?;

    Ok(results
        .into_iter()
        .flat_map(|file| {
            let path = file.file_path;
            file.messages
                .into_iter()
                .map(move |m| m.into_issue(&path))
                .collect::<Vec<_>>()
        })
        .collect())
}

/// Glob covering `extensions` under `target`.
pub fn source_glob(target: &Path, extensions: &[String]) -> String {
    let pattern = match extensions {
        [] => "*".to_string(),
        [single] => format!("*.{}", single),
        many => format!("*.{{{}}}", many.join(",")),
    };
    format!("{}/**/{}", target.display(), pattern)
}

/// Linter check with autofix enabled.
#[derive(Debug, Clone)]
pub struct EslintCheck {
    command: ToolCommand,
    extensions: Vec<String>,
}

impl EslintCheck {
    pub fn new(command: Vec<String>, extensions: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            command: ToolCommand::new(TOOL, command, timeout_secs),
            extensions,
        }
    }

    pub fn from_config(config: &ChecksConfig) -> Self {
        Self::new(
            config.eslint_command.clone(),
            config.extensions.clone(),
            config.timeout_secs,
        )
    }
}

#[async_trait]
impl QualityCheck for EslintCheck {
    fn name(&self) -> &str {
        TOOL
    }

    async fn run(&self, target: &Path) -> Result<Vec<CodeIssue>> {
        let glob = source_glob(target, &self.extensions);
        debug!(glob = %glob, "Running eslint");

        let output = run_tool(&self.command, &[glob]).await?;

        if output.exit_code != 0 && output.exit_code != EXIT_PROBLEMS_FOUND {
            return Err(CheckError::ToolFailed {
                tool: TOOL.to_string(),
                code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        let issues = parse_eslint_output(&output.stdout)?;
        info!(
            issues = issues.len(),
            duration_ms = output.duration_ms,
            "eslint finished"
        );
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::{IssueKind, IssueSeverity};
    use std::path::PathBuf;

    const SAMPLE: &str = r#"[
      {
        "filePath": "/repo/src/app.ts",
        "messages": [
          {"ruleId": "no-unused-vars", "severity": 1, "message": "'x' is assigned a value but never used.", "line": 3, "column": 7},
          {"ruleId": "semi", "severity": 2, "message": "Missing semicolon.", "line": 4, "column": 12,
           "fix": {"range": [40, 40], "text": ";"}}
        ],
        "errorCount": 1,
        "warningCount": 1
      },
      {
        "filePath": "/repo/src/clean.ts",
        "messages": []
      },
      {
        "filePath": "/repo/src/broken.ts",
        "messages": [
          {"ruleId": null, "fatal": true, "severity": 2, "message": "Parsing error: Unexpected token", "line": 1, "column": 1}
        ]
      }
    ]"#;

    #[test]
    fn test_parse_maps_levels() {
        let issues = parse_eslint_output(SAMPLE).expect("parse");
        assert_eq!(issues.len(), 3);

        let warning = &issues[0];
        assert_eq!(warning.kind, IssueKind::Warning);
        assert_eq!(warning.severity, IssueSeverity::Medium);
        assert_eq!(warning.rule.as_deref(), Some("no-unused-vars"));
        assert_eq!((warning.line, warning.column), (3, 7));
        assert!(!warning.fixable);
        assert_eq!(warning.category, "eslint");
        assert_eq!(warning.confidence, 95);

        let error = &issues[1];
        assert_eq!(error.kind, IssueKind::Error);
        assert_eq!(error.severity, IssueSeverity::High);
        assert!(error.fixable);
    }

    #[test]
    fn test_parse_fatal_message() {
        let issues = parse_eslint_output(SAMPLE).expect("parse");
        let fatal = &issues[2];
        assert_eq!(fatal.file_path, "/repo/src/broken.ts");
        assert_eq!(fatal.kind, IssueKind::Error);
        assert!(fatal.rule.is_none());
        assert!(!fatal.fixable);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_eslint_output("").expect("parse").is_empty());
        assert!(parse_eslint_output("[]").expect("parse").is_empty());
    }

    #[test]
    fn test_parse_garbage_is_error() {
        let err = parse_eslint_output("Oops! Something went wrong!").unwrap_err();
        assert!(matches!(err, CheckError::Parse { .. }));
    }

    #[test]
    fn test_source_glob() {
        let target = PathBuf::from("web/src");
        let exts = vec!["ts".to_string(), "tsx".to_string()];
        assert_eq!(source_glob(&target, &exts), "web/src/**/*.{ts,tsx}");
        assert_eq!(source_glob(&target, &["js".to_string()]), "web/src/**/*.js");
        assert_eq!(source_glob(&target, &[]), "web/src/**/*");
    }

    #[tokio::test]
    async fn test_fatal_exit_status_fails_check() {
        let check = EslintCheck::new(
            vec![
                "sh".to_string(),
                "-c".to_string(),
                "echo 'config not found' >&2; exit 2".to_string(),
            ],
            vec!["ts".to_string()],
            30,
        );
        let err = check.run(Path::new(".")).await.unwrap_err();
        match err {
            CheckError::ToolFailed { code, stderr, .. } => {
                assert_eq!(code, 2);
                assert_eq!(stderr, "config not found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
