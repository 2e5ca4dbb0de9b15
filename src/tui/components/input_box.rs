//! # InputBox Component
//!
//! Single-line text field for the user's question.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste, and cursor movement
//! - Emit `Submit` on Enter (the chat client decides whether to send and
//!   clears the field through its view)
//! - Scroll horizontally so the cursor stays visible
//!
//! The buffer is internal state; the chat client reaches it only through
//! `clear()` and `set_text()`.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Offset from the area's left edge to the first text column
const TEXT_OFFSET: u16 = 2;
/// Rows taken by the input box: one text row plus borders
pub const INPUT_HEIGHT: u16 = 3;

const TITLE: &str = "Ask a question (Enter to send, Tab for suggestions)";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User pressed Enter with this text
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Cursor position as byte offset in buffer
    cursor: usize,
    /// Byte offset of the first visible character
    scroll: usize,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
        self.scroll = 0;
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Move `scroll` so the cursor column fits in `width` columns.
    fn update_scroll(&mut self, width: u16) {
        let width = width as usize;
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        }
        while self.scroll < self.cursor && self.buffer[self.scroll..self.cursor].width() >= width {
            self.scroll = next_char_boundary(&self.buffer, self.scroll);
        }
    }

    /// The slice of the buffer that fits in `width` columns from `scroll`.
    fn visible_text(&self, width: u16) -> &str {
        let start = self.scroll;
        let mut used = 0usize;
        let mut end = start;
        for (i, c) in self.buffer[start..].char_indices() {
            let w = c.width().unwrap_or(0);
            if used + w > width as usize {
                break;
            }
            used += w;
            end = start + i + c.len_utf8();
        }
        &self.buffer[start..end]
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);
        self.update_scroll(text_width);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(TITLE)
            .padding(Padding::horizontal(1));

        let input = Paragraph::new(self.visible_text(text_width).to_string())
            .block(block)
            .style(Style::default().fg(Color::Green));
        frame.render_widget(input, area);

        let cursor_col = self.buffer[self.scroll..self.cursor].width() as u16;
        frame.set_cursor_position((
            area.x + TEXT_OFFSET + cursor_col.min(text_width),
            area.y + 1,
        ));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut tmp));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line field: fold line breaks into spaces
                let flat = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
                self.insert_str(&flat);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => Some(InputEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}
