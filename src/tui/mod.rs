//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the
//! conversation, and translates keyboard and mouse events into
//! `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! One thread owns the client. Each frame it draws, waits briefly for
//! terminal input, applies it, then drains actions posted by background
//! tasks (backend replies). Every backend call runs on its own tokio task,
//! so a slow reply never blocks typing, scrolling, or further sends.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::api::{ChatBackend, HttpBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::dispatch::{fetch_chat, fetch_faqs};
use crate::core::session::SessionContext;
use crate::core::state::{ChatClient, PendingChat};
use crate::core::storage::FileStore;
use crate::core::view::{ChatView, Role, Transcript};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// How long to wait for terminal input before checking for replies.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// The conversation as the terminal shows it.
///
/// Conversation entries go to the transcript; input operations go to the
/// input box. Appending anything re-pins the list to the bottom so the
/// newest entry is visible.
pub struct TerminalView {
    pub transcript: Transcript,
    pub input_box: InputBox,
    pub message_list: MessageListState,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            input_box: InputBox::new(),
            message_list: MessageListState::new(),
        }
    }

    fn chip_label(&self, chip: usize) -> Option<String> {
        self.transcript.chips().nth(chip).map(str::to_string)
    }
}

impl ChatView for TerminalView {
    fn append_message(&mut self, role: Role, text: &str) {
        self.transcript.append_message(role, text);
        self.message_list.follow_newest();
    }

    fn append_suggestions(&mut self, items: &[String]) {
        self.transcript.append_suggestions(items);
        self.message_list.follow_newest();
    }

    fn clear_input(&mut self) {
        self.input_box.clear();
    }

    fn set_input(&mut self, text: &str) {
        self.input_box.set_text(text);
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Apply one terminal event to the client and return the resulting effect.
pub fn handle_event(client: &mut ChatClient<TerminalView>, event: TuiEvent) -> Effect {
    let view = &mut client.view;
    match event {
        TuiEvent::ForceQuit => return update(client, Action::Quit),
        TuiEvent::Resize => {}
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            view.message_list.handle_event(&event);
        }
        TuiEvent::NextChip => {
            let count = view.transcript.chip_count();
            view.message_list.cycle_chip(count, 1);
        }
        TuiEvent::PrevChip => {
            let count = view.transcript.chip_count();
            view.message_list.cycle_chip(count, -1);
        }
        TuiEvent::Escape => view.message_list.selected_chip = None,
        TuiEvent::MouseClick(column, row) => {
            let label = view
                .message_list
                .hit_test_chip(column, row)
                .and_then(|chip| view.chip_label(chip));
            if let Some(label) = label {
                view.message_list.selected_chip = None;
                return update(client, Action::SuggestionClicked(label));
            }
        }
        TuiEvent::Submit if view.message_list.selected_chip.is_some() => {
            let label = view
                .message_list
                .selected_chip
                .take()
                .and_then(|chip| view.chip_label(chip));
            if let Some(label) = label {
                return update(client, Action::SuggestionClicked(label));
            }
        }
        other => {
            if matches!(other, TuiEvent::InputChar(_) | TuiEvent::Paste(_)) {
                view.message_list.selected_chip = None;
            }
            if let Some(InputEvent::Submit(text)) = view.input_box.handle_event(&other) {
                return update(client, Action::Submit(text));
            }
        }
    }
    Effect::None
}

fn spawn_chat(backend: Arc<dyn ChatBackend>, pending: PendingChat, tx: mpsc::Sender<Action>) {
    info!("Spawning chat request #{}", pending.seq);
    tokio::spawn(async move {
        let seq = pending.seq;
        let action = fetch_chat(backend.as_ref(), pending).await;
        if tx.send(action).is_err() {
            warn!("Failed to deliver reply #{}: receiver dropped", seq);
        }
    });
}

fn spawn_faqs(backend: Arc<dyn ChatBackend>, tx: mpsc::Sender<Action>) {
    info!("Spawning FAQ request");
    tokio::spawn(async move {
        let action = fetch_faqs(backend.as_ref()).await;
        if tx.send(action).is_err() {
            warn!("Failed to deliver FAQs: receiver dropped");
        }
    });
}

/// Carry out an effect. Returns true when the loop should stop.
fn execute_effect(
    effect: Effect,
    backend: &Arc<dyn ChatBackend>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => false,
        Effect::SendChat(pending) => {
            spawn_chat(backend.clone(), pending, tx.clone());
            false
        }
        Effect::LoadFaqs => {
            spawn_faqs(backend.clone(), tx.clone());
            false
        }
        Effect::Quit => true,
    }
}

/// Run the chat client in the terminal until the user quits.
///
/// Must be called from within a tokio runtime.
pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn ChatBackend> = Arc::new(
        HttpBackend::new(config.base_url.clone(), config.request_timeout)
            .map_err(std::io::Error::other)?,
    );
    let store = FileStore::new(&config.storage_path);
    let (session, storage_error) = SessionContext::ensure_or_ephemeral(&store);
    info!(
        "Session {} (persisted: {}, storage: {})",
        session.id(),
        session.is_persisted(),
        store.path().display()
    );

    let mut client = ChatClient::new(session, TerminalView::new(), config.chat.clone());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let startup = update(&mut client, Action::Start);
    if let Some(e) = &storage_error {
        client.report_storage_error(e);
    }
    let mut should_quit = execute_effect(startup, &backend, &tx);

    while !should_quit {
        terminal.draw(|f| ui::draw_ui(f, &mut client, backend.name()))?;

        // Process first event + drain ALL pending events before next draw
        let first_event = poll_event_timeout(POLL_TIMEOUT);
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effect = handle_event(&mut client, event);
            if execute_effect(effect, &backend, &tx) {
                should_quit = true;
                break;
            }
        }

        // Handle background task actions (backend replies)
        while let Ok(action) = rx.try_recv() {
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut client, action);
            if execute_effect(effect, &backend, &tx) {
                should_quit = true;
            }
        }
    }

    info!("Shutting down with {} request(s) still in flight", client.in_flight());
    ratatui::restore();
    Ok(())
}
