//! GitHub REST client
//!
//! Lists the files of a pull request and posts issue comments on it.
//! Works against github.com or any API-compatible server (GitHub
//! Enterprise, test doubles) through a configurable base URL.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use review_core::{ChangeSetRef, ChangedFile, GitHubConfig, SourceControl};
use serde::Serialize;
use tracing::debug;

use crate::error::{check_status, ProviderError, Result};

const SERVICE: &str = "github";

/// Files requested per page; a shorter page is the last one.
pub const FILES_PER_PAGE: usize = 100;

/// GitHub stops listing pull request files after 3000 entries.
const MAX_PAGES: u32 = 30;

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// GitHub client authenticated with a token.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    api_base: String,
    http: reqwest::Client,
}

impl GitHubClient {
    pub fn new(api_base: &str, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ProviderError::Setup(format!("invalid GitHub token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let user_agent = format!("ai-review/{}", review_core::VERSION);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent).map_err(|e| ProviderError::Setup(e.to_string()))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ProviderError::Setup(e.to_string()))?;

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &GitHubConfig, token: &str) -> Result<Self> {
        Self::new(&config.api_base, token)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn repo_url(&self, change_set: &ChangeSetRef) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_base, change_set.owner, change_set.repo
        )
    }

    async fn list_files(&self, change_set: &ChangeSetRef) -> Result<Vec<ChangedFile>> {
        let url = format!("{}/pulls/{}/files", self.repo_url(change_set), change_set.number);
        let mut files = Vec::new();

        for page in 1..=MAX_PAGES {
            let per_page = FILES_PER_PAGE.to_string();
            let page_param = page.to_string();
            let response = self
                .http
                .get(&url)
                .query(&[("per_page", per_page.as_str()), ("page", page_param.as_str())])
                .send()
                .await?;
            let batch: Vec<ChangedFile> = check_status(response).await?.json().await?;

            debug!(page, count = batch.len(), "Fetched pull request files");
            let last = batch.len() < FILES_PER_PAGE;
            files.extend(batch);
            if last {
                break;
            }
        }

        Ok(files)
    }

    async fn create_comment(&self, change_set: &ChangeSetRef, body: &str) -> Result<()> {
        let url = format!(
            "{}/issues/{}/comments",
            self.repo_url(change_set),
            change_set.number
        );
        let response = self.http.post(&url).json(&CommentBody { body }).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SourceControl for GitHubClient {
    async fn changed_files(
        &self,
        change_set: &ChangeSetRef,
    ) -> review_core::Result<Vec<ChangedFile>> {
        let files = self
            .list_files(change_set)
            .await
            .map_err(|e| e.into_upstream(SERVICE))?;
        debug!(change_set = %change_set, files = files.len(), "Listed pull request files");
        Ok(files)
    }

    async fn post_comment(
        &self,
        change_set: &ChangeSetRef,
        body: &str,
    ) -> review_core::Result<()> {
        self.create_comment(change_set, body)
            .await
            .map_err(|e| e.into_upstream(SERVICE))?;
        debug!(change_set = %change_set, "Created issue comment");
        Ok(())
    }
}
