//! # Suggestion Chips
//!
//! A row of clickable `[ label ]` chips. Chips flow left to right and wrap
//! onto further rows when the width runs out; a label too long for a whole
//! row is cut with an ellipsis.
//!
//! Layout is computed by [`layout_chips`] so `MessageList` can size the row
//! and hit-test clicks without rendering.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Columns taken by `"[ "` and `" ]"`.
const CHIP_DECORATION: usize = 4;
/// Blank columns between chips on the same row.
const CHIP_GAP: u16 = 1;
const ELLIPSIS: char = '…';

/// Where a chip sits, relative to the row's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipPlacement {
    pub x: u16,
    pub row: u16,
    pub width: u16,
}

/// The text drawn for a chip, at most `max_width` columns wide.
pub fn chip_text(label: &str, max_width: u16) -> String {
    let max_width = max_width as usize;
    let full = format!("[ {label} ]");
    if full.width() <= max_width {
        return full;
    }
    if max_width < CHIP_DECORATION + 1 {
        return ELLIPSIS.to_string();
    }

    let budget = max_width - CHIP_DECORATION - 1;
    let mut kept = String::new();
    let mut used = 0;
    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        kept.push(c);
    }
    format!("[ {kept}{ELLIPSIS} ]")
}

pub fn layout_chips(labels: &[String], width: u16) -> Vec<ChipPlacement> {
    let mut placements = Vec::with_capacity(labels.len());
    let mut x: u16 = 0;
    let mut row: u16 = 0;

    for label in labels {
        let chip_width = chip_text(label, width).width() as u16;
        if x > 0 && x.saturating_add(chip_width) > width {
            row += 1;
            x = 0;
        }
        placements.push(ChipPlacement {
            x,
            row,
            width: chip_width,
        });
        x = x.saturating_add(chip_width + CHIP_GAP);
    }

    placements
}

/// A row of chips. `selected` indexes into `labels`.
pub struct SuggestionRow<'a> {
    pub labels: &'a [String],
    pub selected: Option<usize>,
}

impl<'a> SuggestionRow<'a> {
    pub fn new(labels: &'a [String], selected: Option<usize>) -> Self {
        Self { labels, selected }
    }

    pub fn calculate_height(labels: &[String], width: u16) -> u16 {
        layout_chips(labels, width)
            .last()
            .map_or(0, |last| last.row + 1)
    }
}

fn chip_style(is_selected: bool) -> Style {
    if is_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

impl<'a> Widget for SuggestionRow<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let placements = layout_chips(self.labels, area.width);
        for (i, (label, placement)) in self.labels.iter().zip(placements).enumerate() {
            if placement.row >= area.height {
                break;
            }
            buf.set_string(
                area.x + placement.x,
                area.y + placement.row,
                chip_text(label, area.width),
                chip_style(self.selected == Some(i)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn chip_text_fits() {
        assert_eq!(chip_text("pricing", 40), "[ pricing ]");
    }

    #[test]
    fn chip_text_truncates_with_ellipsis() {
        let text = chip_text("How do I reset my password?", 12);
        assert_eq!(text.width(), 12);
        assert!(text.ends_with("… ]"));
    }

    #[test]
    fn chip_text_degenerate_width() {
        assert_eq!(chip_text("anything", 3), "…");
    }

    #[test]
    fn layout_flows_and_wraps() {
        // "[ a ]" = 5 cols, "[ bb ]" = 6 cols
        let placements = layout_chips(&labels(&["a", "bb", "a"]), 12);
        assert_eq!(placements[0], ChipPlacement { x: 0, row: 0, width: 5 });
        assert_eq!(placements[1], ChipPlacement { x: 6, row: 0, width: 6 });
        assert_eq!(placements[2], ChipPlacement { x: 0, row: 1, width: 5 });
    }

    #[test]
    fn height_counts_rows() {
        assert_eq!(SuggestionRow::calculate_height(&labels(&["a", "b"]), 80), 1);
        assert_eq!(SuggestionRow::calculate_height(&labels(&["a", "bb", "a"]), 12), 2);
        assert_eq!(SuggestionRow::calculate_height(&[], 80), 0);
    }

    #[test]
    fn render_draws_every_chip_in_order() {
        let backend = TestBackend::new(30, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        let items = labels(&["a", "b"]);

        terminal
            .draw(|f| f.render_widget(SuggestionRow::new(&items, Some(1)), f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.starts_with("[ a ] [ b ]"));
    }
}
