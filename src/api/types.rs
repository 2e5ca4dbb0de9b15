//! Wire types for the help desk endpoints.
//!
//! Field names follow the backend's JSON (`conversationId` is camelCase).
//! Response types are lenient: missing `handoff` means false, missing
//! `suggestions` means none, and unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
}

/// Body returned by `POST /api/chat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub handoff: bool,
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
}

/// One record of `GET /api/faqs`. Only the question is used.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: String,
}
