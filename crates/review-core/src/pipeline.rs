//! Review pipeline orchestration.
//!
//! One run is strictly sequential:
//! collect changed files → run quality checks → synthesize review →
//! publish comment. Any upstream failure ends the run with a failed
//! [`CodeReviewResult`]; nothing is persisted between runs.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::collect::render_diffs;
use crate::config::ReviewConfig;
use crate::domain::{
    ChangeSetRef, CheckOutcome, CheckRunReport, CodeReviewResult, PipelineStage,
};
use crate::error::ReviewError;
use crate::ports::{CheckSuite, SourceControl};
use crate::publish::publish_review;
use crate::synth::ReviewSynthesizer;

/// Per-run pipeline settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Path the quality checks run against.
    pub target_path: PathBuf,

    /// Post the review as a comment.
    pub publish: bool,

    /// Rendered diffs are cut to this many characters.
    pub max_diff_chars: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            target_path: PathBuf::from("./src"),
            publish: true,
            max_diff_chars: 32_000,
        }
    }
}

impl From<&ReviewConfig> for PipelineOptions {
    fn from(config: &ReviewConfig) -> Self {
        Self {
            target_path: config.review.target_path.clone(),
            publish: config.review.publish,
            max_diff_chars: config.review.max_diff_chars,
        }
    }
}

/// Everything one pipeline invocation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub run_id: String,
    pub change_set: ChangeSetRef,
    pub result: CodeReviewResult,
    /// Tagged outcome of each quality check.
    pub checks: Vec<CheckOutcome>,
    /// Stages entered, in order.
    pub stages: Vec<PipelineStage>,
    pub comment_posted: bool,
    pub duration_ms: u64,
}

impl PipelineReport {
    /// The stage the run ended in.
    pub fn final_stage(&self) -> PipelineStage {
        self.stages.last().copied().unwrap_or(PipelineStage::Idle)
    }

    pub fn succeeded(&self) -> bool {
        self.result.success
    }
}

/// Records stage transitions for one run.
struct StageTracker {
    run_id: Uuid,
    current: PipelineStage,
    visited: Vec<PipelineStage>,
}

impl StageTracker {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            current: PipelineStage::Idle,
            visited: vec![PipelineStage::Idle],
        }
    }

    fn enter(&mut self, next: PipelineStage) {
        debug_assert!(
            self.current.can_advance_to(next),
            "illegal transition {} -> {}",
            self.current,
            next
        );
        info!(run_id = %self.run_id, from = %self.current, to = %next, "Pipeline stage");
        self.current = next;
        self.visited.push(next);
    }
}

/// Review pipeline over pluggable source control, completion, and checks.
pub struct ReviewPipeline {
    source: Arc<dyn SourceControl>,
    synthesizer: ReviewSynthesizer,
    checks: Arc<dyn CheckSuite>,
    options: PipelineOptions,
}

impl ReviewPipeline {
    pub fn new(
        source: Arc<dyn SourceControl>,
        synthesizer: ReviewSynthesizer,
        checks: Arc<dyn CheckSuite>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source,
            synthesizer,
            checks,
            options,
        }
    }

    /// Review one change-set.
    ///
    /// Never returns an error: fatal failures are reported through
    /// `result.success == false` and `result.error`.
    pub async fn run(&self, change_set: &ChangeSetRef) -> PipelineReport {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let mut tracker = StageTracker::new(run_id);

        info!(run_id = %run_id, change_set = %change_set, "Starting review pipeline");

        // Collecting
        tracker.enter(PipelineStage::Collecting);
        let files = match self.source.changed_files(change_set).await {
            Ok(files) => files,
            Err(e) => {
                return self.finish_failed(
                    tracker,
                    change_set,
                    CodeReviewResult::failed(e.to_string()),
                    CheckRunReport::default(),
                    false,
                    start,
                    &e,
                );
            }
        };

        if files.is_empty() {
            info!(run_id = %run_id, "No files changed in this change-set");
            tracker.enter(PipelineStage::Done);
            return self.finish(
                tracker,
                change_set,
                CodeReviewResult::no_changes(),
                CheckRunReport::default(),
                false,
                start,
            );
        }
        info!(run_id = %run_id, files = files.len(), "Collected changed files");

        // Checking
        let checks = if self.checks.is_empty() {
            CheckRunReport::default()
        } else {
            tracker.enter(PipelineStage::Checking);
            let report = self.checks.run(&self.options.target_path).await;
            for failed in report.failed() {
                warn!(
                    run_id = %run_id,
                    check = failed.check_name(),
                    "Quality check failed, excluded from results"
                );
            }
            info!(run_id = %run_id, issues = report.issue_count(), "Quality checks finished");
            report
        };

        // Synthesizing
        tracker.enter(PipelineStage::Synthesizing);
        let diffs = render_diffs(&files, self.options.max_diff_chars);
        info!(run_id = %run_id, diff_chars = diffs.len(), "Rendered diffs for review");

        let mut result = match self
            .synthesizer
            .synthesize(&diffs, files.len(), &checks)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                return self.finish_failed(
                    tracker,
                    change_set,
                    CodeReviewResult::failed(e.to_string()),
                    checks,
                    false,
                    start,
                    &e,
                );
            }
        };

        // Publishing
        let mut comment_posted = false;
        if self.options.publish {
            tracker.enter(PipelineStage::Publishing);
            if let Err(e) = publish_review(
                self.source.as_ref(),
                change_set,
                &result.review,
                self.synthesizer.model(),
            )
            .await
            {
                result.success = false;
                result.error = Some(e.to_string());
                return self.finish_failed(tracker, change_set, result, checks, false, start, &e);
            }
            comment_posted = true;
        }

        tracker.enter(PipelineStage::Done);
        info!(
            run_id = %run_id,
            issues_found = result.issues_found,
            quality_score = result.quality_score,
            "Review pipeline completed"
        );
        self.finish(tracker, change_set, result, checks, comment_posted, start)
    }

    #[allow(clippy::too_many_arguments)]
    fn finish_failed(
        &self,
        mut tracker: StageTracker,
        change_set: &ChangeSetRef,
        result: CodeReviewResult,
        checks: CheckRunReport,
        comment_posted: bool,
        start: Instant,
        cause: &ReviewError,
    ) -> PipelineReport {
        error!(
            run_id = %tracker.run_id,
            stage = %tracker.current,
            error = %cause,
            "Review pipeline failed"
        );
        tracker.enter(PipelineStage::Failed);
        self.finish(tracker, change_set, result, checks, comment_posted, start)
    }

    fn finish(
        &self,
        tracker: StageTracker,
        change_set: &ChangeSetRef,
        result: CodeReviewResult,
        checks: CheckRunReport,
        comment_posted: bool,
        start: Instant,
    ) -> PipelineReport {
        PipelineReport {
            run_id: tracker.run_id.to_string(),
            change_set: change_set.clone(),
            result,
            checks: checks.into_outcomes(),
            stages: tracker.visited,
            comment_posted,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReviewConfig;

    #[test]
    fn test_options_from_config() {
        let mut config = ReviewConfig::default();
        config.review.publish = false;
        config.review.max_diff_chars = 500;
        config.review.target_path = PathBuf::from("app");

        let options = PipelineOptions::from(&config);
        assert!(!options.publish);
        assert_eq!(options.max_diff_chars, 500);
        assert_eq!(options.target_path, PathBuf::from("app"));
    }

    #[test]
    fn test_stage_tracker_records_path() {
        let mut tracker = StageTracker::new(Uuid::new_v4());
        tracker.enter(PipelineStage::Collecting);
        tracker.enter(PipelineStage::Synthesizing);
        tracker.enter(PipelineStage::Done);
        assert_eq!(
            tracker.visited,
            vec![
                PipelineStage::Idle,
                PipelineStage::Collecting,
                PipelineStage::Synthesizing,
                PipelineStage::Done,
            ]
        );
    }
}
