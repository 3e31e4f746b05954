use super::{endpoint, LlmProvider};
use crate::constants::OPENAI_BASE_URL;
use crate::llm::LlmError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const PROVIDER: &str = "openai";

/// Provider implementation for OpenAI's chat completions API
#[derive(Debug)]
pub struct OpenAiProvider {
    http: Client,
    api_key: String,
    /// Model identifier to use (e.g. "gpt-4o-mini")
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(http: Client, api_key: &str, model: &str) -> Self {
        OpenAiProvider {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = json!({
          "model": self.model,
          "messages": [{ "role": "user", "content": prompt }]
        });

        let res = self
            .http
            .post(endpoint(&self.base_url, "v1/chat/completions"))
            .bearer_auth(&self.api_key)
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
        match json_resp["choices"][0]["message"]["content"].as_str() {
            Some(content) if !content.is_empty() => Ok(content.to_string()),
            _ => Err(LlmError::EmptyResponse(PROVIDER)),
        }
    }
}
