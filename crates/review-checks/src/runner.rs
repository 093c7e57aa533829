//! Sequential execution of the enabled quality checks.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use review_core::{CheckOutcome, CheckRunReport, CheckSuite, ChecksConfig};
use tracing::{debug, info, warn};

use crate::check::{CheckKind, QualityCheck};

/// Runs checks one after another and collects a tagged outcome per check.
pub struct CheckRunner {
    checks: Vec<Box<dyn QualityCheck>>,
}

impl CheckRunner {
    pub fn new(checks: Vec<Box<dyn QualityCheck>>) -> Self {
        Self { checks }
    }

    /// Build the runner from configured check names.
    ///
    /// Unknown names are skipped. A check that cannot be built from `config`
    /// is skipped with a warning.
    pub fn from_names(names: &[String], config: &ChecksConfig) -> Self {
        let mut checks: Vec<Box<dyn QualityCheck>> = Vec::new();
        for name in names {
            let Some(kind) = CheckKind::from_name(name) else {
                debug!(check = %name, "Ignoring unknown check");
                continue;
            };
            match kind.build(config) {
                Ok(check) => checks.push(check),
                Err(e) => warn!(check = %kind, error = %e, "Could not build check, skipping"),
            }
        }
        Self::new(checks)
    }

    pub fn from_config(config: &ChecksConfig) -> Self {
        Self::from_names(&config.enabled, config)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check over `target`.
    pub async fn run(&self, target: &Path) -> CheckRunReport {
        let mut outcomes = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            let start = Instant::now();
            let result = check.run(target).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let outcome = match result {
                Ok(issues) => {
                    debug!(check = check.name(), issues = issues.len(), "Check passed");
                    CheckOutcome::Passed {
                        check: check.name().to_string(),
                        issues,
                        duration_ms,
                    }
                }
                Err(e) => {
                    warn!(check = check.name(), error = %e, "Check failed");
                    CheckOutcome::Failed {
                        check: check.name().to_string(),
                        error: e.to_string(),
                        duration_ms,
                    }
                }
            };
            outcomes.push(outcome);
        }

        let report = CheckRunReport::new(outcomes);
        info!(
            checks = self.checks.len(),
            issues = report.issue_count(),
            failed = report.failed().count(),
            "Quality checks completed"
        );
        report
    }
}

#[async_trait]
impl CheckSuite for CheckRunner {
    fn check_names(&self) -> Vec<String> {
        self.checks.iter().map(|c| c.name().to_string()).collect()
    }

    async fn run(&self, target: &Path) -> CheckRunReport {
        CheckRunner::run(self, target).await
    }

    fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl std::fmt::Debug for CheckRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRunner")
            .field("checks", &CheckSuite::check_names(self))
            .finish()
    }
}
