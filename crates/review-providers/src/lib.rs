//! HTTP providers for ai-review
//!
//! - [`GitHubClient`]: pull request files and comments ([`review_core::SourceControl`])
//! - [`OpenAiClient`]: chat completions ([`review_core::CompletionClient`])

pub mod error;
pub mod github;
pub mod openai;

pub use error::{ProviderError, Result};
pub use github::{GitHubClient, FILES_PER_PAGE};
pub use openai::OpenAiClient;
