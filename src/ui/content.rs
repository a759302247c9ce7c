use crate::api::Content;
use crate::app::App;
use crate::state::LoadState;
use crate::theme::ColorPalette;
use crate::util::{html_to_lines, strip_control_chars};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::render::SPINNER;

/// Render the content view for the current load state.
pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .title(" Content ")
        .borders(Borders::ALL)
        .border_style(app.palette.panel_border);
    app.content_visible_lines = block.inner(area).height as usize;

    let lines = match app.content.state() {
        LoadState::Loading => {
            let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
            let msg = Paragraph::new(Line::from(Span::styled(
                format!("{spinner} Loading content..."),
                app.palette.loading,
            )))
            .block(block);
            f.render_widget(msg, area);
            return;
        }
        LoadState::Error { message } => {
            let lines = vec![
                Line::from(Span::styled(message.clone(), app.palette.error)),
                Line::default(),
                Line::from(Span::styled(
                    "Press r to retry, b to go back",
                    app.palette.loading,
                )),
            ];
            f.render_widget(Paragraph::new(lines).block(block), area);
            return;
        }
        LoadState::Success(content) => content_lines(&app.palette, content),
    };

    app.clamp_scroll(lines.len());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((app.scroll_offset as u16, 0));
    f.render_widget(paragraph, area);
}

/// Flatten a content item into display lines: title, metadata, description,
/// body, and the download panel when a file is attached.
fn content_lines(palette: &ColorPalette, content: &Content) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        strip_control_chars(&content.title).into_owned(),
        palette.content_title,
    )));
    let published = if content.is_published { "published" } else { "unpublished" };
    lines.push(Line::from(Span::styled(
        format!("category {} · {published}", content.category),
        palette.content_metadata,
    )));
    lines.push(Line::default());

    for text in html_to_lines(&content.description) {
        lines.push(Line::from(Span::styled(text, palette.content_body)));
    }
    if !content.description.trim().is_empty() {
        lines.push(Line::default());
    }

    for text in html_to_lines(&content.body) {
        lines.push(Line::from(Span::styled(text, palette.content_body)));
    }

    if content.download_url().is_some() {
        let name = strip_control_chars(content.file_name.as_deref().unwrap_or("attachment"));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("⇩ {name} (press d to download)"),
            palette.content_download,
        )));
    }

    lines
}
