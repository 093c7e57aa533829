//! Line-pattern quality check.
//!
//! Scans source files under the target for leftover `console.log` calls and
//! `TODO:`/`FIXME:` notes. Needs no external tool.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use glob::Pattern;
use regex::Regex;
use review_core::{ChecksConfig, CodeIssue, IssueKind, IssueSeverity};
use tracing::debug;

use crate::check::QualityCheck;
use crate::error::Result;

const TOOL: &str = "patterns";

/// A regex that produces one issue per matching line.
#[derive(Debug, Clone)]
struct PatternRule {
    rule: &'static str,
    regex: Regex,
    kind: IssueKind,
    severity: IssueSeverity,
    message: &'static str,
    fixable: bool,
    confidence: u8,
}

impl PatternRule {
    fn builtin() -> Result<Vec<PatternRule>> {
        Ok(vec![
            PatternRule {
                rule: "no-console-log",
                regex: Regex::new(r"console\.log\s*\(")?,
                kind: IssueKind::Warning,
                severity: IssueSeverity::Low,
                message: "console.log statement found; remove it before production",
                fixable: true,
                confidence: 90,
            },
            PatternRule {
                rule: "todo-comment",
                regex: Regex::new(r"\b(?:TODO|FIXME):")?,
                kind: IssueKind::Warning,
                severity: IssueSeverity::Medium,
                message: "TODO/FIXME comment found; consider addressing it",
                fixable: false,
                confidence: 85,
            },
        ])
    }
}

/// Marker scan over files matching include globs minus exclude globs.
#[derive(Debug, Clone)]
pub struct PatternCheck {
    include: Vec<String>,
    exclude: Vec<Pattern>,
    rules: Vec<PatternRule>,
}

impl PatternCheck {
    pub fn new(include: Vec<String>, exclude: &[String]) -> Result<Self> {
        for pattern in &include {
            Pattern::new(pattern)?;
        }
        let exclude = exclude
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            include,
            exclude,
            rules: PatternRule::builtin()?,
        })
    }

    pub fn from_config(config: &ChecksConfig) -> Result<Self> {
        Self::new(config.include.clone(), &config.exclude)
    }

    /// Matching files under `target`, sorted and deduplicated.
    fn source_files(&self, target: &Path) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();
        for include in &self.include {
            let pattern = format!("{}/{}", target.display(), include);
            for entry in glob::glob(&pattern)? {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        debug!(error = %e, "Skipping unreadable path");
                        continue;
                    }
                };
                if !path.is_file() {
                    continue;
                }
                let relative = path.strip_prefix(target).unwrap_or(&path);
                if self.exclude.iter().any(|p| p.matches_path(relative)) {
                    continue;
                }
                files.insert(path);
            }
        }
        Ok(files.into_iter().collect())
    }

    fn scan(&self, file_path: &str, content: &str) -> Vec<CodeIssue> {
        let mut issues = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            for rule in &self.rules {
                if let Some(m) = rule.regex.find(line) {
                    let column = line[..m.start()].chars().count() + 1;
                    issues.push(
                        CodeIssue::new(
                            TOOL,
                            rule.kind,
                            rule.severity,
                            rule.message,
                            file_path,
                            (idx + 1) as u32,
                            column as u32,
                        )
                        .with_rule(rule.rule)
                        .with_fixable(rule.fixable)
                        .with_confidence(rule.confidence),
                    );
                }
            }
        }
        issues
    }
}

#[async_trait]
impl QualityCheck for PatternCheck {
    fn name(&self) -> &str {
        TOOL
    }

    async fn run(&self, target: &Path) -> Result<Vec<CodeIssue>> {
        let files = self.source_files(target)?;
        debug!(files = files.len(), "Scanning files for patterns");

        let mut issues = Vec::new();
        for path in files {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping unreadable file");
                    continue;
                }
            };
            issues.extend(self.scan(&path.to_string_lossy(), &content));
        }
        Ok(issues)
    }
}
