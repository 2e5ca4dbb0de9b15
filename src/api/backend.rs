use std::fmt;

use async_trait::async_trait;

use super::types::{ChatReply, ChatRequest, FaqEntry};

/// Errors that can occur while talking to the help desk backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Transport failure (DNS, connection refused, timeout).
    Network(String),
    /// Backend answered with a non-success status.
    Api { status: u16, message: String },
    /// Body was not the JSON shape we expect.
    Malformed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            BackendError::Malformed(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The two endpoints the chat client depends on.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short human-readable label (shown in the title bar).
    fn name(&self) -> &str;

    /// `POST /api/chat`.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError>;

    /// `GET /api/faqs`.
    async fn faqs(&self) -> Result<Vec<FaqEntry>, BackendError>;
}
