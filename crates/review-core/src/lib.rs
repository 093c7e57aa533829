//! ai-review core library
//!
//! Domain types, ports, and the single-pass review pipeline:
//! collect change-set diffs, run quality checks, synthesize a review via a
//! completion endpoint, and publish it as a comment.

pub mod collect;
pub mod config;
pub mod domain;
pub mod error;
pub mod fakes;
pub mod pipeline;
pub mod ports;
pub mod publish;
pub mod synth;
pub mod telemetry;

pub use collect::render_diffs;
pub use config::{ChecksConfig, Credentials, GitHubConfig, LlmConfig, ReviewConfig, ReviewSettings};
pub use domain::{
    classify_lint_level, ChangeSetRef, ChangedFile, CheckOutcome, CheckRunReport, CodeIssue,
    CodeReviewResult, IssueKind, IssueSeverity, PipelineStage, DEFAULT_QUALITY_SCORE,
};
pub use error::{Result, ReviewError};
pub use pipeline::{PipelineOptions, PipelineReport, ReviewPipeline};
pub use ports::{CheckSuite, CompletionClient, CompletionRequest, SourceControl};
pub use publish::{format_review_comment, publish_review, COMMENT_MARKER};
pub use synth::{
    aggregate_metrics, build_review_prompt, HeuristicReviewParser, ReviewAnalysis, ReviewParser,
    ReviewSynthesizer, SynthesisSettings,
};
pub use telemetry::init_tracing;

/// ai-review version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
