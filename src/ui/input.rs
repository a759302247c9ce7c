//! Keyboard input handling, dispatched by current view.

use crate::app::{App, View};
use crate::util::validate_url_for_open;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    // Ctrl+C quits from anywhere
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match app.view {
        View::Login => handle_login_input(app, code, modifiers),
        View::Home => handle_home_input(app, code),
        View::Content => handle_content_input(app, code, modifiers),
    }
}

/// Login form: text entry plus a few control chords.
///
/// Plain characters go into the focused field, so view-level shortcuts all
/// live on control chords or non-text keys here.
fn handle_login_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            // Toggle between sign-in and sign-up
            KeyCode::Char('t') => {
                app.login.toggle_mode();
                app.auth.reset_error();
            }
            // Federated sign-in with the configured ID token
            KeyCode::Char('g') => app.submit_federated_login(),
            KeyCode::Char('l') => {
                let name = app.cycle_theme();
                app.set_status(format!("Theme: {name}"));
            }
            _ => {}
        }
        return Action::Continue;
    }

    match code {
        KeyCode::Esc => return Action::Quit,
        KeyCode::Enter => app.submit_login(),
        KeyCode::Tab | KeyCode::Down => app.login.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.login.focus_prev(),
        KeyCode::Backspace => {
            app.login.active_field_mut().pop();
        }
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.login.active_field_mut().push(c);
            }
        }
        _ => {}
    }
    Action::Continue
}

/// Home view: category list navigation.
fn handle_home_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Enter => app.enter_content(),
        KeyCode::Char('r') => {
            app.categories.refresh();
            app.set_status("Refreshing categories...");
        }
        KeyCode::Char('s') => app.sign_out(),
        KeyCode::Char('t') => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {name}"));
        }
        _ => {}
    }
    Action::Continue
}

/// Content view: scrolling, retry, and the download hand-off.
fn handle_content_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let half_page = (app.content_visible_lines / 2).max(1);

    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('b') | KeyCode::Esc => app.exit_content(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_down(half_page);
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_up(half_page);
        }
        KeyCode::PageDown => app.scroll_down(half_page),
        KeyCode::PageUp => app.scroll_up(half_page),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_offset = 0,
        KeyCode::Char('r') => {
            app.content.retry();
            app.scroll_offset = 0;
        }
        KeyCode::Char('d') => open_download(app),
        _ => {}
    }
    Action::Continue
}

/// Hand the current item's download URL to the OS opener, if it has one.
fn open_download(app: &mut App) {
    let url = app
        .content
        .state()
        .value()
        .and_then(|c| c.download_url().map(str::to_string));
    match url {
        Some(url) => {
            // Validate before open::that() to keep the opener off odd schemes
            if let Err(e) = validate_url_for_open(&url) {
                tracing::warn!(error = %e, "Rejected download URL");
                app.set_status(e.user_message());
            } else if let Err(e) = open::that(&url) {
                app.set_status(format!("Failed to open download: {}", e));
            } else {
                app.set_status("Opening download...");
            }
        }
        None => app.set_status("No download available for this item"),
    }
}
