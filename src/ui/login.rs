use crate::app::{App, LoginField, LoginMode};
use crate::auth::{validate_password, AuthState};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::render::SPINNER;

/// Render the sign-in / sign-up form, centered in the given area.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.login.mode {
        LoginMode::SignIn => " Sign in ",
        LoginMode::SignUp => " Sign up ",
    };

    let popup = centered_rect(area, 46, 10);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.palette.panel_border_focused);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let mut lines = vec![
        field_line(app, LoginField::Email, "Email   ", &app.login.email, false),
        field_line(app, LoginField::Password, "Password", &app.login.password, true),
    ];
    if app.login.mode == LoginMode::SignUp {
        lines.push(field_line(app, LoginField::Confirm, "Confirm ", &app.login.confirm, true));
        // Advisory strength hint while typing, same rule the submit enforces
        if !app.login.password.is_empty() {
            if let Some(hint) = validate_password(&app.login.password) {
                lines.push(Line::from(Span::styled(hint, app.palette.field_hint)));
            }
        }
    }
    lines.push(Line::default());

    match app.auth.state() {
        AuthState::Loading => {
            let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
            lines.push(Line::from(Span::styled(
                format!("{spinner} Signing in..."),
                app.palette.loading,
            )));
        }
        AuthState::Error { message, .. } => {
            lines.push(Line::from(Span::styled(message.clone(), app.palette.error)));
        }
        _ => {
            let swap = match app.login.mode {
                LoginMode::SignIn => "Ctrl+t to create an account",
                LoginMode::SignUp => "Ctrl+t to sign in instead",
            };
            lines.push(Line::from(Span::styled(swap, app.palette.field_label)));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

/// One labelled input row, masking password fields.
fn field_line<'a>(
    app: &App,
    field: LoginField,
    label: &'a str,
    value: &str,
    mask: bool,
) -> Line<'a> {
    let focused = app.login.focus == field;
    let label_style = if focused {
        app.palette.field_focused
    } else {
        app.palette.field_label
    };
    let shown = if mask {
        "\u{2022}".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{label} "), label_style),
        Span::raw(format!("{shown}{cursor}")),
    ])
}

/// A centered rect of at most `width` x `height` within `area`.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
