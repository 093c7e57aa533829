//! Port traits for the external systems the pipeline talks to.
//!
//! - `SourceControl`: changed files and comments for a change-set
//! - `CompletionClient`: single-shot text completion
//! - `CheckSuite`: the quality checks to run over a target path
//!
//! All traits are async and backend-agnostic. In-memory fakes live in the
//! `fakes` module.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ChangeSetRef, ChangedFile, CheckRunReport};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Source control
// ---------------------------------------------------------------------------

/// Source-control provider holding the change-set under review.
#[async_trait]
pub trait SourceControl: Send + Sync {
    /// Every file changed by the change-set, with its patch when available.
    async fn changed_files(&self, change_set: &ChangeSetRef) -> Result<Vec<ChangedFile>>;

    /// Post a single comment on the change-set.
    async fn post_comment(&self, change_set: &ChangeSetRef, body: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Completion endpoint
// ---------------------------------------------------------------------------

/// One chat-style completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Remote text-generation endpoint, called once per review.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Model name sent with each request.
    fn model(&self) -> &str;

    /// Return the generated text. An empty string is a valid answer.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Quality checks
// ---------------------------------------------------------------------------

/// A set of quality checks run as one pipeline stage.
///
/// Implementations must never fail as a whole; individual check failures
/// are reported as failed outcomes in the returned report.
#[async_trait]
pub trait CheckSuite: Send + Sync {
    /// Names of the enabled checks, in execution order.
    fn check_names(&self) -> Vec<String>;

    async fn run(&self, target: &Path) -> CheckRunReport;

    fn is_empty(&self) -> bool {
        self.check_names().is_empty()
    }
}
