//! Posting the review back to the change-set.

use tracing::info;

use crate::domain::ChangeSetRef;
use crate::error::Result;
use crate::ports::SourceControl;

/// Hidden marker identifying comments written by this tool.
pub const COMMENT_MARKER: &str = "<!-- ai-code-quality-review -->";

/// Render the comment body for a review.
pub fn format_review_comment(review: &str, model: &str) -> String {
    format!(
        "{marker}\n# AI Code Quality Review\n\n{review}\n\n---\n*Automatically generated by ai-review using {model}*",
        marker = COMMENT_MARKER,
        review = review.trim_end(),
        model = model,
    )
}

/// Post the review as one comment. Errors are returned unchanged; there
/// is no retry.
pub async fn publish_review(
    source: &dyn SourceControl,
    change_set: &ChangeSetRef,
    review: &str,
    model: &str,
) -> Result<()> {
    let body = format_review_comment(review, model);
    source.post_comment(change_set, &body).await?;
    info!(change_set = %change_set, chars = body.len(), "Posted review comment");
    Ok(())
}
