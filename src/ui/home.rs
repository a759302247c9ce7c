use crate::app::App;
use crate::state::LoadState;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::render::SPINNER;

/// Render the home view: greeting plus the category tree.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let greeting = match app.session.display_name() {
        Some(name) => format!(" Folio: {name} "),
        None => " Folio ".to_string(),
    };
    let block = Block::default()
        .title(greeting)
        .borders(Borders::ALL)
        .border_style(app.palette.panel_border_focused);

    match app.categories.state() {
        LoadState::Loading => {
            let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
            let msg = Paragraph::new(Line::from(Span::styled(
                format!("{spinner} Loading categories..."),
                app.palette.loading,
            )))
            .block(block);
            f.render_widget(msg, area);
        }
        LoadState::Error { message } => {
            let lines = vec![
                Line::from(Span::styled(message.clone(), app.palette.error)),
                Line::default(),
                Line::from(Span::styled("Press r to retry", app.palette.loading)),
            ];
            f.render_widget(Paragraph::new(lines).block(block), area);
        }
        LoadState::Success(_) => {
            let tree = app.category_tree();
            if tree.is_empty() {
                let msg = Paragraph::new(Span::styled(
                    "No categories available",
                    app.palette.loading,
                ))
                .block(block);
                f.render_widget(msg, area);
                return;
            }

            // Borders plus the highlight symbol eat four columns
            let row_width = area.width.saturating_sub(4) as usize;
            let items: Vec<ListItem> = tree
                .iter()
                .map(|item| {
                    let style = if item.depth == 0 {
                        app.palette.list_parent
                    } else {
                        app.palette.list_normal
                    };
                    let indent = "  ".repeat(item.depth);
                    let name = strip_control_chars(&item.name);
                    let label =
                        truncate_to_width(&format!("{indent}{name}"), row_width).into_owned();
                    ListItem::new(Line::from(Span::styled(label, style)))
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(app.palette.list_selected)
                .highlight_symbol("> ");

            let mut state = ListState::default();
            state.select(Some(app.selected_category.min(tree.len() - 1)));
            f.render_stateful_widget(list, area, &mut state);
        }
    }
}
