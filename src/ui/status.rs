use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Cow avoids allocations for the static keybinding hints
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else {
        match app.view {
            View::Login => {
                Cow::Borrowed("[Tab]field [Enter]submit [Ctrl+t]mode [Ctrl+g]token [Esc]quit")
            }
            View::Home => Cow::Borrowed("[j/k]move [Enter]open [r]efresh [s]ign out [q]uit"),
            View::Content => {
                Cow::Borrowed("[b]ack [j/k]scroll [Ctrl+d/u]page [d]ownload [r]etry [q]uit")
            }
        }
    };

    let paragraph = Paragraph::new(text).style(app.palette.status_bar);
    f.render_widget(paragraph, area);
}
