//! OpenAI-compatible chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use review_core::{CompletionClient, CompletionRequest, LlmConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{check_status, ProviderError, Result};

const SERVICE: &str = "openai";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, empty when the endpoint returned none.
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

/// Completion client for `/chat/completions` endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    api_base: String,
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(
        api_base: &str,
        api_key: &str,
        model: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(format!("ai-review/{}", review_core::VERSION));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ProviderError::Setup(e.to_string()))?;

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            http,
        })
    }

    pub fn from_config(config: &LlmConfig, api_key: &str) -> Result<Self> {
        Self::new(
            &config.api_base,
            api_key,
            &config.model,
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    async fn chat(&self, request: &CompletionRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let url = format!("{}/chat/completions", self.api_base);
        debug!(url = %url, model = %self.model, "Sending completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let parsed: ChatResponse = check_status(response).await?.json().await?;
        Ok(parsed.into_text())
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> review_core::Result<String> {
        let text = self
            .chat(request)
            .await
            .map_err(|e| e.into_upstream(SERVICE))?;
        if text.is_empty() {
            warn!(model = %self.model, "Completion response carried no text");
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_choice_is_empty_text() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).expect("parse");
        assert_eq!(parsed.into_text(), "");
        let parsed: ChatResponse = serde_json::from_str(r#"{}"#).expect("parse");
        assert_eq!(parsed.into_text(), "");
        let null_content = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(null_content).expect("parse");
        assert_eq!(parsed.into_text(), "");
    }

    #[test]
    fn test_request_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: 2000,
            temperature: 0.3,
        };
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 2000);
    }

    #[test]
    fn test_from_config_uses_model() {
        let client = OpenAiClient::from_config(&LlmConfig::default(), "sk-test").expect("client");
        assert_eq!(client.model(), "gpt-4o-mini");
    }
}
