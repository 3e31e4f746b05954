use super::{endpoint, LlmProvider};
use crate::constants::ANTHROPIC_BASE_URL;
use crate::llm::LlmError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

const PROVIDER: &str = "anthropic";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Provider implementation for Anthropic's messages API
#[derive(Debug)]
pub struct AnthropicProvider {
    http: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl AnthropicProvider {
    pub fn new(http: Client, api_key: &str, model: &str) -> Self {
        AnthropicProvider {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: ANTHROPIC_BASE_URL.to_string(),
            max_tokens: 4096,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    /// The whole prompt, instruction included, goes in one user message.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{ "role": "user", "content": prompt }]
        });

        let res = self
            .http
            .post(endpoint(&self.base_url, "v1/messages"))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request_body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await?;
            return Err(LlmError::Api {
                provider: PROVIDER,
                status,
                body,
            });
        }

        let json_resp: serde_json::Value = res.json().await?;
        if let Some(content) = json_resp["content"][0]["text"].as_str() {
            debug!("Anthropic response: {} chars", content.chars().count());
            Ok(content.to_string())
        } else {
            Err(LlmError::EmptyResponse(PROVIDER))
        }
    }
}
