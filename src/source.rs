use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Ways a poll of the collection endpoint can fail. All of them collapse
/// to the same visitor-facing status; the distinction exists for logs and
/// tests only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

/// Where gallery payloads come from. The HTTP impl is the production path;
/// tests substitute scripted sources.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn fetch_payload(&self, url: &str) -> std::result::Result<Value, FetchError>;
}

/// Polls the endpoint anonymously over HTTPS. The client carries no cookie
/// store and sends no auth headers; credentials are explicitly omitted.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("snapfeed/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PhotoSource for HttpSource {
    async fn fetch_payload(&self, url: &str) -> std::result::Result<Value, FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
