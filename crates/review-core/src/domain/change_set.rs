//! Change-set identity and changed-file records.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ReviewError};

/// Reference to a change-set (pull request) on the source-control provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChangeSetRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl ChangeSetRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Parse `"owner/repo"` plus a change-set number.
    pub fn parse(repository: &str, number: u64) -> Result<Self> {
        let mut parts = repository.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
                if number == 0 {
                    return Err(ReviewError::InvalidChangeSet(
                        "change-set number must be positive".to_string(),
                    ));
                }
                Ok(Self::new(owner, repo, number))
            }
            _ => Err(ReviewError::InvalidChangeSet(format!(
                "expected owner/repo, got '{}'",
                repository
            ))),
        }
    }

    /// `owner/repo` form.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for ChangeSetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// A file modified by a change-set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangedFile {
    pub filename: String,

    /// Provider status ("added", "modified", "removed", ...).
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub additions: u32,

    #[serde(default)]
    pub deletions: u32,

    /// Unified diff. Absent for binary or very large files.
    #[serde(default)]
    pub patch: Option<String>,
}

impl ChangedFile {
    pub fn new(filename: impl Into<String>, patch: Option<String>) -> Self {
        Self {
            filename: filename.into(),
            status: "modified".to_string(),
            additions: 0,
            deletions: 0,
            patch,
        }
    }
}
