use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// `render` takes `&mut self` so stateful components can refresh their
/// layout caches and scroll offsets while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Something that consumes terminal events.
pub trait EventHandler {
    /// What the handler reports back to its parent.
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
