//! Client side of the Reply Service wire protocol

mod error;

pub use error::{ClientError, ClientErrorKind};

use crate::api::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Client for requesting replies
#[async_trait]
pub trait ReplyClient: Send + Sync {
    /// Send one message and wait for its reply
    async fn send(&self, message: &str) -> Result<String, ClientError>;
}

#[async_trait]
impl<T: ReplyClient + ?Sized> ReplyClient for Arc<T> {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        (**self).send(message).await
    }
}

/// Reply client speaking JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpReplyClient {
    client: Client,
    endpoint: String,
}

impl HttpReplyClient {
    /// `timeout` bounds the whole request, connect through body
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ReplyClient for HttpReplyClient {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        let request = ChatRequest {
            message: message.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::status(format!("HTTP {status}: {body}")));
        }

        let body = response.bytes().await?;
        let reply: ChatResponse = serde_json::from_slice(&body)
            .map_err(|e| ClientError::malformed(format!("Invalid reply payload: {e}")))?;

        Ok(reply.reply)
    }
}
