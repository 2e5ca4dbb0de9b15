//! # Conversation View
//!
//! The client never touches a screen directly. It writes into a
//! [`ChatView`], which is the whole capability set it needs:
//!
//! ```text
//! ChatView
//! ├── append_message(role, text)   // add a bubble, scroll to it
//! ├── append_suggestions(items)    // add a row of chips, scroll to it
//! ├── clear_input()                // empty the input field
//! └── set_input(text)              // prefill the input field
//! ```
//!
//! [`Transcript`] is the in-memory implementation. The TUI wraps one and
//! forwards the input operations to its input box; tests use it directly.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "you",
            Role::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

/// One thing shown in the conversation, in append order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(Message),
    /// A row of clickable suggestion chips. Never empty.
    Suggestions(Vec<String>),
}

pub trait ChatView {
    fn append_message(&mut self, role: Role, text: &str);

    /// Callers guarantee `items` is non-empty.
    fn append_suggestions(&mut self, items: &[String]);

    fn clear_input(&mut self);

    fn set_input(&mut self, text: &str);
}

/// Append-only record of the conversation, plus the input draft.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub entries: Vec<Entry>,
    pub input: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(msg) => Some(msg),
            Entry::Suggestions(_) => None,
        })
    }

    pub fn suggestion_groups(&self) -> impl Iterator<Item = &[String]> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Suggestions(items) => Some(items.as_slice()),
            Entry::Message(_) => None,
        })
    }

    /// Every chip in display order, flattened across groups.
    pub fn chips(&self) -> impl Iterator<Item = &str> {
        self.suggestion_groups()
            .flat_map(|group| group.iter().map(String::as_str))
    }

    pub fn chip_count(&self) -> usize {
        self.suggestion_groups().map(<[String]>::len).sum()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages().last()
    }
}

impl ChatView for Transcript {
    fn append_message(&mut self, role: Role, text: &str) {
        self.entries.push(Entry::Message(Message {
            role,
            text: text.to_string(),
        }));
    }

    fn append_suggestions(&mut self, items: &[String]) {
        self.entries.push(Entry::Suggestions(items.to_vec()));
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }
}
