//! HTTP provider errors.

use review_core::ReviewError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The client could not be constructed.
    #[error("client setup failed: {0}")]
    Setup(String),
}

impl ProviderError {
    /// Convert into the pipeline's upstream failure for `service`.
    pub fn into_upstream(self, service: &str) -> ReviewError {
        match self {
            ProviderError::Setup(message) => ReviewError::Config(message),
            other => ReviewError::upstream(service, other.to_string()),
        }
    }
}

/// Read a response, turning non-2xx statuses into [`ProviderError::Status`].
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        body: truncate_body(&body),
    })
}

fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 500;
    match body.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_becomes_upstream() {
        let err = ProviderError::Status {
            status: 404,
            body: "Not Found".to_string(),
        }
        .into_upstream("github");
        assert!(err.is_upstream());
        assert_eq!(
            err.to_string(),
            "github request failed: unexpected status 404: Not Found"
        );
    }

    #[test]
    fn test_setup_becomes_config_error() {
        let err = ProviderError::Setup("bad header".to_string()).into_upstream("openai");
        assert!(matches!(err, ReviewError::Config(_)));
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");
        let long = "x".repeat(600);
        assert_eq!(truncate_body(&long).len(), 503);
    }
}
