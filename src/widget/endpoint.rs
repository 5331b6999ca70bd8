//! The remote Chat Endpoint: trait seam and HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// Body posted to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User message (trimmed).
    #[serde(default)]
    pub message: String,
}

/// Successful endpoint reply. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplyBody {
    /// Reply bubble, may contain HTML.
    pub reply: String,
}

/// Something that turns a user message into a bot reply.
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    /// Deliver one message and return the reply text.
    async fn send(&self, message: &str) -> Result<String, ChatError>;
}

/// JSON-over-HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatEndpoint {
    client: reqwest::Client,
    url: url::Url,
}

impl HttpChatEndpoint {
    /// Endpoint with no request timeout; a hung request waits indefinitely.
    pub fn new(url: url::Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Endpoint whose requests fail as [`ChatError::NetworkFailure`] after
    /// `timeout`.
    pub fn with_timeout(url: url::Url, timeout: Duration) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::NetworkFailure(e.to_string()))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &url::Url {
        &self.url
    }
}

#[async_trait]
impl ChatEndpoint for HttpChatEndpoint {
    async fn send(&self, message: &str) -> Result<String, ChatError> {
        tracing::debug!(url = %self.url, message_length = message.len(), "Posting chat message");

        // `.json()` sets `Content-Type: application/json`.
        let response = self
            .client
            .post(self.url.clone())
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(|e| ChatError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::ServerError {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ChatError::NetworkFailure(e.to_string()))?;
        let body: ReplyBody = serde_json::from_slice(&bytes)
            .map_err(|e| ChatError::MalformedResponse(e.to_string()))?;
        Ok(body.reply)
    }
}
