//! # TitleBar Component
//!
//! One-line status bar: which help desk we talk to and how many questions
//! are still waiting for an answer.
//!
//! Stateless: every field is a prop set by the parent each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::tui::component::Component;

pub struct TitleBar {
    pub backend_name: String,
    pub in_flight: usize,
    /// Shown when the session id could not be persisted.
    pub ephemeral_session: bool,
}

impl TitleBar {
    pub fn new(backend_name: String, in_flight: usize, ephemeral_session: bool) -> Self {
        Self {
            backend_name,
            in_flight,
            ephemeral_session,
        }
    }

    pub fn text(&self) -> String {
        let mut title = format!("Help desk ({})", self.backend_name);
        match self.in_flight {
            0 => {}
            1 => title.push_str(" | waiting for 1 reply"),
            n => title.push_str(&format!(" | waiting for {n} replies")),
        }
        if self.ephemeral_session {
            title.push_str(" | session not saved");
        }
        title
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let span = Span::styled(self.text(), Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(span, area);
    }
}
