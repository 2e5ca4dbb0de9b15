//! # Chat Client State
//!
//! Everything the chat client knows, in one place:
//!
//! ```text
//! ChatClient<V: ChatView>
//! ├── view: V                      // where messages and chips go
//! ├── session: SessionContext      // conversationId for every request
//! ├── settings: ChatSettings       // greeting, handoff notice, limits
//! ├── next_seq: u64                // sequence number for the next send
//! ├── latest_rendered: u64         // highest seq whose reply was shown
//! └── in_flight: BTreeSet<u64>     // sends still waiting for a reply
//! ```
//!
//! No I/O happens here. A send is split in two: [`ChatClient::begin_send`]
//! renders the user turn and returns the request to dispatch, and
//! [`ChatClient::apply_reply`] renders whatever came back. The network call
//! in between belongs to whoever executes effects (see `dispatch`).

use std::collections::BTreeSet;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::api::{BackendError, ChatReply, ChatRequest, FaqEntry};
use crate::core::session::SessionContext;
use crate::core::storage::StorageError;
use crate::core::view::{ChatView, Role};

pub const GREETING: &str = "Hello. Ask a question or pick a suggested topic.";
pub const HANDOFF_NOTICE: &str = " You can contact a human at support@example.com.";
/// Number of FAQ questions offered as chips at startup.
pub const INITIAL_SUGGESTION_LIMIT: usize = 6;

pub const NETWORK_FALLBACK: &str = "Sorry, I couldn't reach the help desk. Please try again.";
pub const MALFORMED_FALLBACK: &str = "Sorry, I received a reply I couldn't understand.";
pub const STORAGE_FALLBACK: &str = "Note: this conversation can't be remembered on this device.";

/// What to do with a reply that arrives after a newer one was already shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StaleReplies {
    /// Render it anyway, in arrival order.
    #[default]
    Show,
    /// Discard it.
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub greeting: String,
    pub handoff_notice: String,
    pub suggestion_limit: usize,
    pub stale_replies: StaleReplies,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            greeting: GREETING.to_string(),
            handoff_notice: HANDOFF_NOTICE.to_string(),
            suggestion_limit: INITIAL_SUGGESTION_LIMIT,
            stale_replies: StaleReplies::default(),
        }
    }
}

/// A chat request that has been rendered locally and now needs sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChat {
    pub seq: u64,
    pub request: ChatRequest,
}

/// The visible bot message for a failed request.
pub fn fallback_message(err: &BackendError) -> String {
    match err {
        BackendError::Network(_) => NETWORK_FALLBACK.to_string(),
        BackendError::Api { status, .. } => {
            format!("Sorry, the help desk returned an error (HTTP {status}).")
        }
        BackendError::Malformed(_) => MALFORMED_FALLBACK.to_string(),
    }
}

pub struct ChatClient<V: ChatView> {
    pub view: V,
    session: SessionContext,
    settings: ChatSettings,
    next_seq: u64,
    latest_rendered: u64,
    in_flight: BTreeSet<u64>,
}

impl<V: ChatView> ChatClient<V> {
    pub fn new(session: SessionContext, view: V, settings: ChatSettings) -> Self {
        Self {
            view,
            session,
            settings,
            next_seq: 1,
            latest_rendered: 0,
            in_flight: BTreeSet::new(),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn session_id(&self) -> &str {
        self.session.id()
    }

    /// Number of sends still waiting on the backend.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn render_message(&mut self, role: Role, text: &str) {
        self.view.append_message(role, text);
    }

    /// Absent or empty lists render nothing at all.
    pub fn render_suggestions(&mut self, items: Option<&[String]>) {
        match items {
            Some(items) if !items.is_empty() => self.view.append_suggestions(items),
            _ => {}
        }
    }

    /// Greeting first; the caller then loads the initial suggestions.
    pub fn render_greeting(&mut self) {
        let greeting = self.settings.greeting.clone();
        self.render_message(Role::Bot, &greeting);
    }

    /// Tell the user their session id will not outlive this run.
    pub fn report_storage_error(&mut self, err: &StorageError) {
        warn!("Reporting storage failure to user: {}", err);
        self.render_message(Role::Bot, STORAGE_FALLBACK);
    }

    /// Render the user's turn and build the request for it.
    ///
    /// Returns `None` (and leaves the input untouched) when `raw` is blank.
    pub fn begin_send(&mut self, raw: &str) -> Option<PendingChat> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        self.render_message(Role::User, text);
        self.view.clear_input();

        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight.insert(seq);
        debug!("Send #{} queued ({} in flight)", seq, self.in_flight.len());

        Some(PendingChat {
            seq,
            request: ChatRequest {
                message: text.to_string(),
                conversation_id: self.session.id().to_string(),
            },
        })
    }

    /// Prefill the input with the chip's label, then send it like typed text.
    ///
    /// Does not wait for requests already in flight.
    pub fn click_suggestion(&mut self, label: &str) -> Option<PendingChat> {
        self.view.set_input(label);
        self.begin_send(label)
    }

    /// The bot text for a reply, with the handoff notice when requested.
    pub fn format_reply(&self, reply: &ChatReply) -> String {
        if reply.handoff {
            format!("{}{}", reply.reply, self.settings.handoff_notice)
        } else {
            reply.reply.clone()
        }
    }

    /// Render the outcome of send `seq`.
    pub fn apply_reply(&mut self, seq: u64, result: Result<ChatReply, BackendError>) {
        self.in_flight.remove(&seq);

        if seq < self.latest_rendered && self.settings.stale_replies == StaleReplies::Drop {
            info!(
                "Dropping stale reply #{} (already showing #{})",
                seq, self.latest_rendered
            );
            return;
        }
        if seq < self.latest_rendered {
            debug!("Reply #{} arrived after #{}", seq, self.latest_rendered);
        }
        self.latest_rendered = self.latest_rendered.max(seq);

        match result {
            Ok(reply) => {
                let text = self.format_reply(&reply);
                self.render_message(Role::Bot, &text);
                self.render_suggestions(reply.suggestions.as_deref());
            }
            Err(e) => {
                warn!("Send #{} failed: {}", seq, e);
                let text = fallback_message(&e);
                self.render_message(Role::Bot, &text);
            }
        }
    }

    /// Render the first few FAQ questions as chips, in backend order.
    pub fn apply_faqs(&mut self, result: Result<Vec<FaqEntry>, BackendError>) {
        match result {
            Ok(faqs) => {
                let items: Vec<String> = faqs
                    .into_iter()
                    .map(|faq| faq.question)
                    .take(self.settings.suggestion_limit)
                    .collect();
                debug!("Rendering {} initial suggestions", items.len());
                self.render_suggestions(Some(&items));
            }
            Err(e) => warn!("Could not load initial suggestions: {}", e),
        }
    }
}
