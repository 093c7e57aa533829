//! In-memory fakes for the pipeline ports (testing only).
//!
//! Provides `MemorySourceControl`, `ScriptedCompletion`, and
//! `StaticCheckSuite` that satisfy the trait contracts without any
//! network or subprocess access.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{ChangeSetRef, ChangedFile, CheckRunReport};
use crate::error::{Result, ReviewError};
use crate::ports::{CheckSuite, CompletionClient, CompletionRequest, SourceControl};

// ---------------------------------------------------------------------------
// MemorySourceControl
// ---------------------------------------------------------------------------

/// Source control serving a fixed file list and recording comments.
#[derive(Debug, Default)]
pub struct MemorySourceControl {
    files: Vec<ChangedFile>,
    files_error: Option<String>,
    comments_error: Option<String>,
    comments: Mutex<Vec<(ChangeSetRef, String)>>,
}

impl MemorySourceControl {
    pub fn new(files: Vec<ChangedFile>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }

    /// Make `changed_files` fail with an upstream error.
    pub fn failing_files(mut self, message: &str) -> Self {
        self.files_error = Some(message.to_string());
        self
    }

    /// Make `post_comment` fail with an upstream error.
    pub fn failing_comments(mut self, message: &str) -> Self {
        self.comments_error = Some(message.to_string());
        self
    }

    /// Comments posted so far.
    pub fn comments(&self) -> Vec<(ChangeSetRef, String)> {
        self.comments.lock().unwrap().clone()
    }
}

#[async_trait]
impl SourceControl for MemorySourceControl {
    async fn changed_files(&self, _change_set: &ChangeSetRef) -> Result<Vec<ChangedFile>> {
        match &self.files_error {
            Some(message) => Err(ReviewError::upstream("source-control", message.clone())),
            None => Ok(self.files.clone()),
        }
    }

    async fn post_comment(&self, change_set: &ChangeSetRef, body: &str) -> Result<()> {
        if let Some(message) = &self.comments_error {
            return Err(ReviewError::upstream("source-control", message.clone()));
        }
        self.comments
            .lock()
            .unwrap()
            .push((change_set.clone(), body.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScriptedCompletion
// ---------------------------------------------------------------------------

/// Completion client returning a fixed answer and recording requests.
#[derive(Debug)]
pub struct ScriptedCompletion {
    model: String,
    response: std::result::Result<String, String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletion {
    /// Always answer with `text`.
    pub fn replying(text: &str) -> Self {
        Self {
            model: "scripted-model".to_string(),
            response: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with an upstream error.
    pub fn failing(message: &str) -> Self {
        Self {
            model: "scripted-model".to_string(),
            response: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(ReviewError::upstream("completion", message.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// StaticCheckSuite
// ---------------------------------------------------------------------------

/// Check suite returning a canned report and recording target paths.
#[derive(Debug, Default)]
pub struct StaticCheckSuite {
    names: Vec<String>,
    report: CheckRunReport,
    targets: Mutex<Vec<PathBuf>>,
}

impl StaticCheckSuite {
    pub fn new(report: CheckRunReport) -> Self {
        let names = report
            .outcomes
            .iter()
            .map(|o| o.check_name().to_string())
            .collect();
        Self {
            names,
            report,
            targets: Mutex::new(Vec::new()),
        }
    }

    /// A suite with no checks.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn targets(&self) -> Vec<PathBuf> {
        self.targets.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckSuite for StaticCheckSuite {
    fn check_names(&self) -> Vec<String> {
        self.names.clone()
    }

    async fn run(&self, target: &Path) -> CheckRunReport {
        self.targets.lock().unwrap().push(target.to_path_buf());
        self.report.clone()
    }
}
