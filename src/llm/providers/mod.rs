use crate::llm::LlmError;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod anthropic;
pub mod gemini;
pub mod openai;

/// A generative-language service that turns one prompt into one text answer.
///
/// Calls are single-turn: nothing is carried over between them.
#[async_trait]
pub trait LlmProvider: Debug + Send + Sync {
    /// Short provider name used in logs and error messages.
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Joins a base URL and a path without doubling or dropping the slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::endpoint;

    #[test]
    fn endpoint_handles_trailing_slashes() {
        assert_eq!(endpoint("http://h:1/", "/v1/x"), "http://h:1/v1/x");
        assert_eq!(endpoint("http://h:1", "v1/x"), "http://h:1/v1/x");
    }
}
