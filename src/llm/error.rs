use reqwest::StatusCode;
use std::time::Duration;

/// Failure reaching or reading the upstream generative-language service.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("No content in {0} response")]
    EmptyResponse(&'static str),
    #[error("{provider} blocked the prompt: {reason}")]
    Blocked {
        provider: &'static str,
        reason: String,
    },
    #[error("Upstream call timed out after {0:?}")]
    Timeout(Duration),
}

impl LlmError {
    /// Whether a new attempt could succeed where this one failed.
    ///
    /// Timeouts, connection failures, rate limiting and server errors are
    /// transient; malformed or refused answers are not.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Timeout(_) => true,
            LlmError::Http(e) => e.is_timeout() || e.is_connect(),
            LlmError::Api { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            LlmError::EmptyResponse(_) | LlmError::Blocked { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> LlmError {
        LlmError::Api {
            provider: "gemini",
            status: StatusCode::from_u16(status).unwrap(),
            body: String::new(),
        }
    }

    #[test]
    fn server_errors_and_rate_limits_are_transient() {
        assert!(api(500).is_transient());
        assert!(api(503).is_transient());
        assert!(api(429).is_transient());
        assert!(LlmError::Timeout(Duration::from_secs(1)).is_transient());
    }

    #[test]
    fn client_errors_and_bad_answers_are_final() {
        assert!(!api(400).is_transient());
        assert!(!api(403).is_transient());
        assert!(!LlmError::EmptyResponse("gemini").is_transient());
        assert!(!LlmError::Blocked {
            provider: "gemini",
            reason: "SAFETY".to_string()
        }
        .is_transient());
    }
}
