use crate::config::LlmConfig;
use crate::errors::Error;
use crate::llm::anthropic::AnthropicProvider;
use crate::llm::gemini::GeminiProvider;
use crate::llm::openai::OpenAiProvider;
use crate::llm::{LlmError, LlmProvider, RetryPolicy};
use reqwest::Client;
use tracing::{debug, warn};

/// Generic LLM client that delegates work to a concrete provider and applies
/// the timeout and retry policy around every call.
#[derive(Debug)]
pub struct LlmClient {
    provider: Box<dyn LlmProvider>,
    policy: RetryPolicy,
}

impl LlmClient {
    pub fn new(provider: Box<dyn LlmProvider>, policy: RetryPolicy) -> Self {
        LlmClient { provider, policy }
    }

    /// Builds the client for the provider named in the configuration.
    ///
    /// # Arguments
    /// * `config` - Provider name, model, credential, optional base URL and call policy
    ///
    /// # Returns
    /// * `Result<LlmClient, Error>` - New client or an error for unknown providers
    pub fn from_config(config: &LlmConfig) -> Result<Self, Error> {
        let http = Client::builder().build()?;
        let base_url = config.base_url.as_ref().map(|u| u.as_str());

        let provider: Box<dyn LlmProvider> = match config.provider.as_str() {
            "gemini" => {
                let p = GeminiProvider::new(http, &config.api_key, &config.model);
                Box::new(match base_url {
                    Some(url) => p.with_base_url(url),
                    None => p,
                })
            }
            "openai" => {
                let p = OpenAiProvider::new(http, &config.api_key, &config.model);
                Box::new(match base_url {
                    Some(url) => p.with_base_url(url),
                    None => p,
                })
            }
            "anthropic" => {
                let p = AnthropicProvider::new(http, &config.api_key, &config.model);
                Box::new(match base_url {
                    Some(url) => p.with_base_url(url),
                    None => p,
                })
            }
            other => return Err(Error::UnknownProvider(other.to_string())),
        };

        Ok(LlmClient::new(provider, config.retry.clone()))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generates text for a prompt.
    ///
    /// Each attempt is bounded by the policy timeout. Transient failures are
    /// retried with exponential backoff until `max_attempts` is reached; any
    /// other failure is returned at once.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let result =
                match tokio::time::timeout(self.policy.timeout, self.provider.generate(prompt))
                    .await
                {
                    Ok(result) => result,
                    Err(_) => Err(LlmError::Timeout(self.policy.timeout)),
                };

            match result {
                Ok(text) => {
                    debug!(
                        provider = self.provider.name(),
                        attempt, "Upstream call succeeded"
                    );
                    return Ok(text);
                }
                Err(e) if e.is_transient() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.delay_for_attempt(attempt - 1);
                    warn!(
                        provider = self.provider.name(),
                        attempt,
                        "Transient upstream failure, retrying in {:?}: {}",
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
