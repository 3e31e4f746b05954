use crate::client::Language;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Longer than the gateway's own default upstream timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// One question as sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub lang: Language,
}

/// What the gateway answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply {
    Reply(String),
    /// The gateway reported a failure with this message
    Error(String),
    /// A JSON body with no `error` and a missing or empty `reply`
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Gateway unreachable: {0}")]
    Network(#[source] reqwest::Error),
    #[error("Unreadable gateway response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Transport to the question-answering gateway.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn ask(&self, request: &QueryRequest) -> Result<GatewayReply, ClientError>;
}

#[derive(Debug, Deserialize)]
struct GatewayBody {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Talks to the gateway's `POST /ask` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGatewayClient {
    http: Client,
    ask_url: Url,
}

impl HttpGatewayClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        // `join` replaces the last segment unless the path ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let ask_url = base.join("ask")?;
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Network)?;
        Ok(Self { http, ask_url })
    }

    pub fn ask_url(&self) -> &Url {
        &self.ask_url
    }
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    /// Reads the JSON body whatever the status code, as error responses
    /// carry their message in the same envelope.
    async fn ask(&self, request: &QueryRequest) -> Result<GatewayReply, ClientError> {
        let res = self
            .http
            .post(self.ask_url.clone())
            .json(request)
            .send()
            .await
            .map_err(ClientError::Network)?;

        let status = res.status();
        let body: GatewayBody = res.json().await.map_err(ClientError::Decode)?;
        debug!("Gateway answered {}", status);

        Ok(match (body.reply, body.error) {
            (Some(reply), _) if !reply.is_empty() => GatewayReply::Reply(reply),
            (_, Some(error)) => GatewayReply::Error(error),
            (_, None) => GatewayReply::Empty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ask_url_is_joined_to_base() {
        let client = HttpGatewayClient::new("http://localhost:5000").unwrap();
        assert_eq!(client.ask_url().as_str(), "http://localhost:5000/ask");
    }

    #[test]
    fn ask_url_keeps_base_path_prefix() {
        let client = HttpGatewayClient::new("http://host:5000/api").unwrap();
        assert_eq!(client.ask_url().as_str(), "http://host:5000/api/ask");

        let client = HttpGatewayClient::new("http://host:5000/api/").unwrap();
        assert_eq!(client.ask_url().as_str(), "http://host:5000/api/ask");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpGatewayClient::new("localhost without scheme"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn request_serializes_lang_tag() {
        let request = QueryRequest {
            query: "bukhar".to_string(),
            lang: Language::Hindi,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "query": "bukhar", "lang": "hi-IN" })
        );
    }
}
