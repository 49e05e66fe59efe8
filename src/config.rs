//! Environment-driven configuration

use crate::reply::ReplyBackend;
use crate::widget::DEFAULT_GREETING;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/chat";
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the reply server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub backend: ReplyBackend,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = parse_or_default(&lookup, "CHATBOT_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = parse_or_default(&lookup, "CHATBOT_PORT", DEFAULT_PORT);
        let backend = parse_or_default(&lookup, "CHATBOT_REPLY_BACKEND", ReplyBackend::Echo);

        Self {
            addr: SocketAddr::new(host, port),
            backend,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Configuration for the chat widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Full URL of the chat endpoint
    pub endpoint: String,
    /// Deadline for a single reply; expiry is treated as a transport failure
    pub reply_timeout: Duration,
    /// First bot message shown in a new widget
    pub greeting: String,
}

impl WidgetConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let endpoint = lookup("CHATBOT_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let reply_timeout = match parse_or_default(&lookup, "CHATBOT_TIMEOUT_SECS", 0u64) {
            0 => DEFAULT_REPLY_TIMEOUT,
            secs => Duration::from_secs(secs),
        };

        let greeting = lookup("CHATBOT_GREETING")
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GREETING.to_string());

        Self {
            endpoint,
            reply_timeout,
            greeting,
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring invalid configuration value");
            default
        }),
        None => default,
    }
}
