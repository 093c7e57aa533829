//! Domain types for the review pipeline.

pub mod change_set;
pub mod check;
pub mod issue;
pub mod result;
pub mod stage;

pub use change_set::{ChangeSetRef, ChangedFile};
pub use check::{CheckOutcome, CheckRunReport};
pub use issue::{classify_lint_level, CodeIssue, IssueKind, IssueSeverity};
pub use result::{CodeReviewResult, DEFAULT_QUALITY_SCORE};
pub use stage::PipelineStage;
