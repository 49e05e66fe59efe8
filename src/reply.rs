//! Reply Service
//!
//! Maps a single message string to a single reply string. Stateless: identical
//! input always yields identical output.

mod faq;

pub use faq::{detect_query_type, FaqReplyService, QueryType, EMPTY_PROMPT_REPLY};

use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Fixed prefix of the echo contract
pub const REPLY_PREFIX: &str = "This is a response to: ";

/// The echo contract: `REPLY_PREFIX` followed by the message, verbatim.
pub fn reply(message: &str) -> String {
    format!("{REPLY_PREFIX}{message}")
}

/// Common interface for reply backends
#[async_trait]
pub trait ReplyService: Send + Sync {
    /// Produce the reply for one message
    async fn reply(&self, message: &str) -> String;

    /// Backend name, used in logs
    fn name(&self) -> &str;
}

/// Reply backend implementing the echo contract
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoReplyService;

#[async_trait]
impl ReplyService for EchoReplyService {
    async fn reply(&self, message: &str) -> String {
        reply(message)
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Which reply backend the server runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyBackend {
    /// The echo contract
    #[default]
    Echo,
    /// Keyword and FAQ answers about the Test Centre
    Faq,
}

impl ReplyBackend {
    pub fn service(self) -> Arc<dyn ReplyService> {
        match self {
            Self::Echo => Arc::new(EchoReplyService),
            Self::Faq => Arc::new(FaqReplyService),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown reply backend: {0}")]
pub struct UnknownBackend(String);

impl FromStr for ReplyBackend {
    type Err = UnknownBackend;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "echo" => Ok(Self::Echo),
            "faq" => Ok(Self::Faq),
            _ => Err(UnknownBackend(s.to_string())),
        }
    }
}

/// Logging wrapper for reply services
pub struct LoggingService {
    inner: Arc<dyn ReplyService>,
    name: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn ReplyService>) -> Self {
        let name = inner.name().to_string();
        Self { inner, name }
    }
}

#[async_trait]
impl ReplyService for LoggingService {
    async fn reply(&self, message: &str) -> String {
        let start = std::time::Instant::now();
        let reply = self.inner.reply(message).await;
        let duration = start.elapsed();

        tracing::info!(
            service = %self.name,
            duration_us = %duration.as_micros(),
            message_len = message.len(),
            reply_len = reply.len(),
            "Reply produced"
        );

        reply
    }

    fn name(&self) -> &str {
        &self.name
    }
}
