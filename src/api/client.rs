//! HTTP implementation of [`ChatBackend`] over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::backend::{BackendError, ChatBackend};
use super::types::{ChatReply, ChatRequest, FaqEntry};

pub const CHAT_PATH: &str = "/api/chat";
pub const FAQS_PATH: &str = "/api/faqs";

/// Talks to a help desk server rooted at `base_url`.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// `timeout` of `None` means requests wait as long as the server takes.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Checks the status and decodes the JSON body.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    debug!("Backend response status: {}", status);

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("Backend error: {} - {}", status.as_u16(), message);
        return Err(BackendError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| BackendError::Network(e.to_string()))?;
    serde_json::from_slice(&body).map_err(|e| {
        warn!("Undecodable backend body ({} bytes): {}", body.len(), e);
        BackendError::Malformed(e.to_string())
    })
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.base_url
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        info!(
            "POST {} (conversation={}, message_len={})",
            CHAT_PATH,
            request.conversation_id,
            request.message.len()
        );

        let response = self
            .client
            .post(self.url(CHAT_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        decode(response).await
    }

    async fn faqs(&self) -> Result<Vec<FaqEntry>, BackendError> {
        info!("GET {}", FAQS_PATH);

        let response = self
            .client
            .get(self.url(FAQS_PATH))
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let faqs: Vec<FaqEntry> = decode(response).await?;
        debug!("Received {} FAQ records", faqs.len());
        Ok(faqs)
    }
}
