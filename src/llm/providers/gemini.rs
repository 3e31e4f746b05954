use super::{endpoint, LlmProvider};
use crate::constants::GEMINI_BASE_URL;
use crate::llm::LlmError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

const PROVIDER: &str = "gemini";

/// Provider implementation for Google's Gemini `generateContent` API
#[derive(Debug)]
pub struct GeminiProvider {
    http: Client,
    /// Gemini API key, sent in the `x-goog-api-key` header
    api_key: String,
    /// Model identifier to use (e.g. "gemini-2.5-flash")
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(http: Client, api_key: &str, model: &str) -> Self {
        GeminiProvider {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Points the provider at another host, e.g. a proxy or a test server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    /// Sends the prompt as a single user turn and concatenates the text parts
    /// of the first candidate.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = endpoint(
            &self.base_url,
            &format!("v1beta/models/{}:generateContent", self.model),
        );
        let request_body = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ]
        });

        let res = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
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
        if let Some(reason) = json_resp["promptFeedback"]["blockReason"].as_str() {
            return Err(LlmError::Blocked {
                provider: PROVIDER,
                reason: reason.to_string(),
            });
        }

        let text = json_resp["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|part| part["text"].as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse(PROVIDER));
        }
        debug!("Gemini response: {} chars", text.chars().count());
        Ok(text)
    }
}
