use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::ChatClient;
use crate::tui::TerminalView;
use crate::tui::component::Component;
use crate::tui::components::input_box::INPUT_HEIGHT;
use crate::tui::components::{MessageList, TitleBar};

/// Title bar, conversation, input.
pub fn split_areas(area: Rect) -> [Rect; 3] {
    use Constraint::{Length, Min};
    Layout::vertical([Length(1), Min(0), Length(INPUT_HEIGHT)]).areas(area)
}

pub fn draw_ui(frame: &mut Frame, client: &mut ChatClient<TerminalView>, backend_name: &str) {
    let [title_area, main_area, input_area] = split_areas(frame.area());

    let mut title_bar = TitleBar::new(
        backend_name.to_string(),
        client.in_flight(),
        !client.session().is_persisted(),
    );
    title_bar.render(frame, title_area);

    let view = &mut client.view;
    MessageList::new(&mut view.message_list, &view.transcript).render(frame, main_area);
    view.input_box.render(frame, input_area);
}
