//! # MessageList Component
//!
//! Scrollable view of the conversation: message bubbles and suggestion
//! rows, in append order.
//!
//! ## Responsibilities
//!
//! - Lay out entries and cache their heights
//! - Keep the newest entry in view unless the user scrolled away
//! - Track the selected chip and map clicks to chips
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `Transcript`
//! (props). The transcript is append-only, so cached heights stay valid
//! until the width changes.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::view::{Entry, Transcript};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBubble;
use crate::tui::components::suggestions::{SuggestionRow, layout_chips};
use crate::tui::event::TuiEvent;

/// Blank rows under a suggestion row.
const SUGGESTION_ROW_MARGIN: u16 = 1;

/// A chip's clickable area in content coordinates (before scrolling).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipHit {
    /// Index into `Transcript::chips()`.
    pub chip: usize,
    pub x: u16,
    pub y: u16,
    pub width: u16,
}

/// Cached layout measurements
#[derive(Debug, Default)]
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    pub chip_hits: Vec<ChipHit>,
    content_width: u16,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute whatever the new entries or width invalidated.
    pub fn update(&mut self, entries: &[Entry], content_width: u16) {
        if self.content_width != content_width || entries.len() < self.heights.len() {
            self.heights.clear();
            self.chip_hits.clear();
            self.content_width = content_width;
        }
        if self.heights.len() == entries.len() {
            return;
        }

        let mut y = self
            .heights
            .iter()
            .fold(0u16, |acc, h| acc.saturating_add(*h));
        let mut chip_base = chip_count(&entries[..self.heights.len()]);

        for entry in &entries[self.heights.len()..] {
            let height = match entry {
                Entry::Message(msg) => MessageBubble::calculate_height(msg, content_width),
                Entry::Suggestions(labels) => {
                    let placements = layout_chips(labels, content_width);
                    for (offset, placement) in placements.iter().enumerate() {
                        self.chip_hits.push(ChipHit {
                            chip: chip_base + offset,
                            x: placement.x,
                            y: y.saturating_add(placement.row),
                            width: placement.width,
                        });
                    }
                    chip_base += labels.len();
                    SuggestionRow::calculate_height(labels, content_width) + SUGGESTION_ROW_MARGIN
                }
            };
            self.heights.push(height);
            y = y.saturating_add(height);
        }

        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, h| {
                *acc = acc.saturating_add(*h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Chip under a content-space position.
    pub fn chip_at(&self, x: u16, y: u16) -> Option<usize> {
        self.chip_hits
            .iter()
            .find(|hit| hit.y == y && x >= hit.x && x < hit.x + hit.width)
            .map(|hit| hit.chip)
    }

    /// Top row of the entry holding chip `chip`.
    fn chip_row(&self, chip: usize) -> Option<u16> {
        self.chip_hits.iter().find(|hit| hit.chip == chip).map(|hit| hit.y)
    }
}

fn chip_count(entries: &[Entry]) -> usize {
    entries
        .iter()
        .map(|entry| match entry {
            Entry::Suggestions(labels) => labels.len(),
            Entry::Message(_) => 0,
        })
        .sum()
}

/// Layout and scroll state for the message list.
/// Owned by `TerminalView` so it survives between frames.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Selected chip (index into `Transcript::chips()`)
    pub selected_chip: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Screen area of the last render (for mouse hit testing)
    pub last_area: Rect,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            selected_chip: None,
            viewport_height: 0,
            last_area: Rect::default(),
        }
    }

    fn max_scroll(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_scroll();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Show the newest entry.
    pub fn follow_newest(&mut self) {
        self.stick_to_bottom = true;
    }

    /// Move chip selection by `step`, wrapping around `chip_count` chips.
    pub fn cycle_chip(&mut self, chip_count: usize, step: isize) {
        if chip_count == 0 {
            self.selected_chip = None;
            return;
        }
        let next = match self.selected_chip {
            None if step >= 0 => 0,
            None => chip_count - 1,
            Some(current) => (current as isize + step).rem_euclid(chip_count as isize) as usize,
        };
        self.selected_chip = Some(next);
        self.scroll_to_chip(next);
    }

    /// Scroll so the given chip's row is visible.
    fn scroll_to_chip(&mut self, chip: usize) {
        let Some(row) = self.layout.chip_row(chip) else {
            return;
        };
        let offset_y = self.scroll_state.offset().y.min(self.max_scroll());
        if row < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: row });
            self.stick_to_bottom = false;
        } else if row >= offset_y + self.viewport_height {
            let new_y = row.saturating_sub(self.viewport_height.saturating_sub(1));
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            self.stick_to_bottom = new_y >= self.max_scroll();
        }
    }

    /// Map a screen click to a chip, if one is under it.
    pub fn hit_test_chip(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.last_area;
        if !area.contains(Position { x: column, y: row }) {
            return None;
        }
        let offset_y = self.scroll_state.offset().y.min(self.max_scroll());
        let content_x = column - area.x;
        let content_y = (row - area.y).saturating_add(offset_y);
        self.layout.chip_at(content_x, content_y)
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, transcript: &'a Transcript) -> Self {
        Self { state, transcript }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let entries = &self.transcript.entries;

        self.state.layout.update(entries, content_width);
        self.state.viewport_height = area.height;
        self.state.last_area = area;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let total_height = self.state.layout.total_height();
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        let mut chip_base = 0usize;
        for (entry, &height) in entries.iter().zip(&self.state.layout.heights) {
            match entry {
                Entry::Message(msg) => {
                    let rect = Rect::new(0, y_offset, content_width, height);
                    scroll_view.render_widget(MessageBubble::new(msg), rect);
                }
                Entry::Suggestions(labels) => {
                    let rows = height.saturating_sub(SUGGESTION_ROW_MARGIN);
                    let rect = Rect::new(0, y_offset, content_width, rows);
                    let selected = self
                        .state
                        .selected_chip
                        .and_then(|chip| chip.checked_sub(chip_base))
                        .filter(|local| *local < labels.len());
                    scroll_view.render_widget(SuggestionRow::new(labels, selected), rect);
                    chip_base += labels.len();
                }
            }
            y_offset = y_offset.saturating_add(height);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Implemented on the state because the `MessageList` wrapper is rebuilt
/// every frame and cannot hold scroll position.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}
