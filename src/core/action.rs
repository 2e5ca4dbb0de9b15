//! # Actions
//!
//! Everything that can happen in the chat client becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend answers? That's `Action::ChatCompleted { seq, result }`.
//!
//! `update()` applies an action to the client and returns the `Effect`
//! the caller must carry out. The network never gets called from here.
//!
//! ```text
//! ChatClient + Action  →  update()  →  Effect
//! ```

use log::debug;

use crate::api::{BackendError, ChatReply, FaqEntry};
use crate::core::state::{ChatClient, PendingChat};
use crate::core::view::ChatView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Client just came up: greet, then fetch suggestions.
    Start,
    /// User pressed Enter with this input.
    Submit(String),
    /// User clicked a suggestion chip.
    SuggestionClicked(String),
    /// Backend answered send `seq`.
    ChatCompleted {
        seq: u64,
        result: Result<ChatReply, BackendError>,
    },
    FaqsLoaded(Result<Vec<FaqEntry>, BackendError>),
    Quit,
}

/// Side effects requested by `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    SendChat(PendingChat),
    LoadFaqs,
    Quit,
}

impl From<Option<PendingChat>> for Effect {
    fn from(pending: Option<PendingChat>) -> Self {
        pending.map_or(Effect::None, Effect::SendChat)
    }
}

pub fn update<V: ChatView>(client: &mut ChatClient<V>, action: Action) -> Effect {
    match action {
        Action::Start => {
            client.render_greeting();
            Effect::LoadFaqs
        }
        Action::Submit(text) => client.begin_send(&text).into(),
        Action::SuggestionClicked(label) => {
            debug!("Suggestion clicked: {}", label);
            client.click_suggestion(&label).into()
        }
        Action::ChatCompleted { seq, result } => {
            client.apply_reply(seq, result);
            Effect::None
        }
        Action::FaqsLoaded(result) => {
            client.apply_faqs(result);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
