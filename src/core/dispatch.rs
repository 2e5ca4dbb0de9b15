//! Carries out effects against a [`ChatBackend`].
//!
//! The TUI runs [`fetch_chat`] / [`fetch_faqs`] on spawned tasks and feeds
//! the resulting actions back through its channel. The `send_message`,
//! `load_initial_suggestions` and `start` helpers run the same path inline,
//! awaiting each effect to completion; they drive the client headless.

use log::debug;

use crate::api::ChatBackend;
use crate::core::action::{Action, Effect, update};
use crate::core::state::{ChatClient, PendingChat};
use crate::core::view::ChatView;

pub async fn fetch_chat(backend: &dyn ChatBackend, pending: PendingChat) -> Action {
    let result = backend.chat(&pending.request).await;
    Action::ChatCompleted {
        seq: pending.seq,
        result,
    }
}

pub async fn fetch_faqs(backend: &dyn ChatBackend) -> Action {
    Action::FaqsLoaded(backend.faqs().await)
}

/// Execute `effect` and every effect it leads to.
pub async fn run_effect<V: ChatView>(
    client: &mut ChatClient<V>,
    backend: &dyn ChatBackend,
    mut effect: Effect,
) {
    loop {
        debug!("Running effect inline: {:?}", effect);
        let action = match effect {
            Effect::SendChat(pending) => fetch_chat(backend, pending).await,
            Effect::LoadFaqs => fetch_faqs(backend).await,
            Effect::None | Effect::Quit => return,
        };
        effect = update(client, action);
    }
}

/// Greeting, then the initial suggestions.
pub async fn start<V: ChatView>(client: &mut ChatClient<V>, backend: &dyn ChatBackend) {
    let effect = update(client, Action::Start);
    run_effect(client, backend, effect).await;
}

pub async fn send_message<V: ChatView>(
    client: &mut ChatClient<V>,
    backend: &dyn ChatBackend,
    text: &str,
) {
    let effect = update(client, Action::Submit(text.to_string()));
    run_effect(client, backend, effect).await;
}

pub async fn click_suggestion<V: ChatView>(
    client: &mut ChatClient<V>,
    backend: &dyn ChatBackend,
    label: &str,
) {
    let effect = update(client, Action::SuggestionClicked(label.to_string()));
    run_effect(client, backend, effect).await;
}

pub async fn load_initial_suggestions<V: ChatView>(
    client: &mut ChatClient<V>,
    backend: &dyn ChatBackend,
) {
    run_effect(client, backend, Effect::LoadFaqs).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{BackendError, FaqEntry};
    use crate::core::state::{GREETING, MALFORMED_FALLBACK};
    use crate::core::view::{Entry, Role};
    use crate::test_support::{FakeBackend, reply, test_client};

    #[tokio::test]
    async fn test_send_message_round_trip() {
        let backend = FakeBackend::replying(Ok(reply("Hello back", false, &[])));
        let mut client = test_client();

        send_message(&mut client, &backend, "Hi").await;

        let sent = backend.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].message, "Hi");
        assert_eq!(sent[0].conversation_id, client.session_id());

        let texts: Vec<_> = client.view.messages().map(|m| (m.role, m.text.as_str())).collect();
        assert_eq!(texts, vec![(Role::User, "Hi"), (Role::Bot, "Hello back")]);
        assert_eq!(client.view.suggestion_groups().count(), 0);
    }

    #[tokio::test]
    async fn test_send_blank_never_reaches_backend() {
        let backend = FakeBackend::replying(Ok(reply("unused", false, &[])));
        let mut client = test_client();
        send_message(&mut client, &backend, "   ").await;
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_click_suggestion_uses_send_path() {
        let backend = FakeBackend::replying(Ok(reply("Our plans start at $5.", false, &[])));
        let mut client = test_client();

        click_suggestion(&mut client, &backend, "pricing").await;

        assert_eq!(backend.requests()[0].message, "pricing");
        assert_eq!(client.view.last_message().unwrap().text, "Our plans start at $5.");
    }

    #[tokio::test]
    async fn test_malformed_reply_renders_fallback() {
        let backend = FakeBackend::replying(Err(BackendError::Malformed("expected value".into())));
        let mut client = test_client();
        send_message(&mut client, &backend, "Hi").await;
        assert_eq!(client.view.last_message().unwrap().text, MALFORMED_FALLBACK);
    }

    #[tokio::test]
    async fn test_start_greets_and_loads_six() {
        let faqs = (1..=8).map(|i| FaqEntry { question: format!("Question {i}") }).collect();
        let backend = FakeBackend::with_faqs(Ok(faqs));
        let mut client = test_client();

        start(&mut client, &backend).await;

        assert!(matches!(&client.view.entries[0], Entry::Message(m) if m.text == GREETING));
        let chips: Vec<_> = client.view.chips().collect();
        assert_eq!(chips.len(), 6);
        assert_eq!(chips[0], "Question 1");
        assert_eq!(chips[5], "Question 6");
    }

    #[tokio::test]
    async fn test_load_initial_suggestions_with_no_faqs() {
        let backend = FakeBackend::with_faqs(Ok(Vec::new()));
        let mut client = test_client();
        load_initial_suggestions(&mut client, &backend).await;
        assert!(client.view.entries.is_empty());
    }
}
