//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{BackendError, ChatBackend, ChatReply, ChatRequest, FaqEntry};
use crate::core::session::SessionContext;
use crate::core::state::{ChatClient, ChatSettings};
use crate::core::view::Transcript;

/// A canned backend that records every chat request it sees.
pub struct FakeBackend {
    chat_result: Result<ChatReply, BackendError>,
    faqs_result: Result<Vec<FaqEntry>, BackendError>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeBackend {
    pub fn replying(chat_result: Result<ChatReply, BackendError>) -> Self {
        Self {
            chat_result,
            faqs_result: Ok(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_faqs(faqs_result: Result<Vec<FaqEntry>, BackendError>) -> Self {
        Self {
            chat_result: Err(BackendError::Network("no chat configured".to_string())),
            faqs_result,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        self.chat_result.clone()
    }

    async fn faqs(&self) -> Result<Vec<FaqEntry>, BackendError> {
        self.faqs_result.clone()
    }
}

/// Builds a reply body.
pub fn reply(text: &str, handoff: bool, suggestions: &[&str]) -> ChatReply {
    ChatReply {
        reply: text.to_string(),
        handoff,
        suggestions: Some(suggestions.iter().map(|s| s.to_string()).collect()),
    }
}

/// Creates a client with an ephemeral session and a headless transcript.
pub fn test_client() -> ChatClient<Transcript> {
    ChatClient::new(
        SessionContext::ephemeral(),
        Transcript::new(),
        ChatSettings::default(),
    )
}
