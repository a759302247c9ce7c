use crate::api::{ApiClient, Category, Content};
use crate::auth::{AuthCoordinator, AuthOutcome, AuthState, HttpIdentityProvider, ProviderError};
use crate::config::Config;
use crate::session::SharedSession;
use crate::state::{CategoriesController, ContentController};
use crate::store::{CategoryStore, ContentStore, StoreError};
use crate::theme::{ColorPalette, ThemeVariant};
use anyhow::Result;
use std::borrow::Cow;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Maximum scroll offset for the content view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// Event channel capacity. Completions are rare (one per spawned fetch),
/// so a small buffer is plenty.
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

// ============================================================================
// View and Login Form
// ============================================================================

/// Current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,   // Email/password form
    Home,    // Category list
    Content, // Full-screen content item
}

/// Which login form the user is filling in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMode {
    SignIn,
    SignUp,
}

/// Which field of the login form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
    Confirm,
}

/// Editable state of the login screen.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub mode: LoginMode,
    pub focus: LoginField,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            mode: LoginMode::SignIn,
            focus: LoginField::Email,
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
        }
    }
}

impl LoginForm {
    /// Fields visible in the current mode, in focus order.
    fn fields(&self) -> &'static [LoginField] {
        match self.mode {
            LoginMode::SignIn => &[LoginField::Email, LoginField::Password],
            LoginMode::SignUp => &[LoginField::Email, LoginField::Password, LoginField::Confirm],
        }
    }

    /// Move focus to the next field, wrapping.
    pub fn focus_next(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + 1) % fields.len()];
    }

    /// Move focus to the previous field, wrapping.
    pub fn focus_prev(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + fields.len() - 1) % fields.len()];
    }

    /// Toggle between sign-in and sign-up, keeping the email.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            LoginMode::SignIn => LoginMode::SignUp,
            LoginMode::SignUp => LoginMode::SignIn,
        };
        self.password.clear();
        self.confirm.clear();
        if self.focus == LoginField::Confirm {
            self.focus = LoginField::Password;
        }
    }

    /// Mutable reference to the focused field's buffer.
    pub fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
            LoginField::Confirm => &mut self.confirm,
        }
    }

    /// Clear all inputs and reset to sign-in mode.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Category Tree
// ============================================================================

/// A single row in the flattened category tree for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTreeItem {
    pub category_id: i64,
    pub name: String,
    /// Nesting depth (0 = top-level).
    pub depth: usize,
}

/// Flatten categories into display order: roots in server order, each
/// immediately followed by its children (recursively, also in server order).
pub fn build_category_tree(categories: &[Category]) -> Vec<CategoryTreeItem> {
    let mut items = Vec::with_capacity(categories.len());
    for root in categories.iter().filter(|c| c.is_top_level()) {
        add_tree_item(&mut items, categories, root, 0);
    }
    items
}

fn add_tree_item(
    items: &mut Vec<CategoryTreeItem>,
    all: &[Category],
    cat: &Category,
    depth: usize,
) {
    items.push(CategoryTreeItem {
        category_id: cat.id,
        name: cat.name.clone(),
        depth,
    });
    for child in all.iter().filter(|c| c.parent == Some(cat.id)) {
        add_tree_item(items, all, child, depth + 1);
    }
}

// ============================================================================
// Events
// ============================================================================

/// Completions from background tasks, delivered to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Category list fetch finished.
    CategoriesLoaded {
        generation: u64,
        result: Result<Vec<Category>, StoreError>,
    },
    /// Content item fetch finished.
    ContentLoaded {
        content_id: i64,
        generation: u64,
        result: Result<Content, StoreError>,
    },
    /// Identity provider operation finished.
    AuthCompleted {
        generation: u64,
        result: Result<AuthOutcome, ProviderError>,
    },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state.
pub struct App {
    // Theme
    pub theme_variant: ThemeVariant,
    pub palette: ColorPalette,

    // Controllers and session
    pub session: SharedSession,
    pub auth: AuthCoordinator<HttpIdentityProvider>,
    pub categories: CategoriesController,
    pub content: ContentController,

    // UI state
    pub view: View,
    pub login: LoginForm,
    pub selected_category: usize,
    pub scroll_offset: usize,
    pub needs_redraw: bool,
    pub should_quit: bool,

    /// Last known content viewport size (visible lines, excluding borders).
    pub content_visible_lines: usize,
    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,

    // Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Id of the content item the home screen opens.
    pub content_id: i64,
    /// Pre-obtained federated ID token, if configured.
    id_token: Option<String>,
}

impl App {
    pub fn new(config: &Config, event_tx: mpsc::Sender<AppEvent>) -> Result<Self> {
        let api = ApiClient::new(reqwest::Client::new(), &config.api_base_url)?;
        let session = SharedSession::new();

        let provider = std::sync::Arc::new(HttpIdentityProvider::new(
            reqwest::Client::new(),
            &config.auth_base_url,
            config.auth_api_key.clone().map(secrecy::SecretString::from),
        ));
        let auth = AuthCoordinator::new(provider, session.clone(), event_tx.clone());

        let categories =
            CategoriesController::new(CategoryStore::new(api.clone()), event_tx.clone());
        let content = ContentController::new(ContentStore::new(api), event_tx);

        let theme_variant = ThemeVariant::from_str_name(&config.theme).unwrap_or(ThemeVariant::Dark);

        // FOLIO_ID_TOKEN env var takes precedence over the config key
        let id_token = std::env::var("FOLIO_ID_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| config.id_token.clone());

        let view = if auth.is_authenticated() {
            View::Home
        } else {
            View::Login
        };

        let mut app = Self {
            theme_variant,
            palette: theme_variant.palette(),
            session,
            auth,
            categories,
            content,
            view,
            login: LoginForm::default(),
            selected_category: 0,
            scroll_offset: 0,
            needs_redraw: true,
            should_quit: false,
            content_visible_lines: 0,
            spinner_frame: 0,
            status_message: None,
            content_id: config.content_id,
            id_token,
        };
        if app.view == View::Home {
            app.categories.refresh();
        }
        Ok(app)
    }

    /// Switch to a different theme variant at runtime.
    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.palette = variant.palette();
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns the new theme's name for
    /// status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // -- Status bar --

    /// Set status message (auto-expires after 3 seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired (older than 3 seconds).
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // -- Login --

    /// Submit the login form in its current mode.
    pub fn submit_login(&mut self) {
        match self.login.mode {
            LoginMode::SignIn => {
                let (email, password) = (self.login.email.clone(), self.login.password.clone());
                self.auth.sign_in(&email, &password);
            }
            LoginMode::SignUp => {
                if self.login.password != self.login.confirm {
                    self.set_status("Passwords do not match");
                    return;
                }
                let (email, password) = (self.login.email.clone(), self.login.password.clone());
                self.auth.sign_up(&email, &password);
            }
        }
        self.needs_redraw = true;
    }

    /// Federated sign-in using the configured ID token, if any.
    pub fn submit_federated_login(&mut self) {
        match self.id_token.clone() {
            Some(token) => self.auth.sign_in_with_token(&token),
            None => self.set_status("No ID token configured (set FOLIO_ID_TOKEN or id_token)"),
        }
        self.needs_redraw = true;
    }

    /// Sign out and return to the login screen.
    pub fn sign_out(&mut self) {
        self.auth.sign_out();
        self.login.reset();
        self.view = View::Login;
        self.set_status("Signed out");
    }

    // -- Home --

    /// Flattened category tree for the current category state.
    pub fn category_tree(&self) -> Vec<CategoryTreeItem> {
        match self.categories.state().value() {
            Some(categories) => build_category_tree(categories),
            None => Vec::new(),
        }
    }

    /// Navigate up in the category list.
    pub fn nav_up(&mut self) {
        self.selected_category = self.selected_category.saturating_sub(1);
    }

    /// Navigate down in the category list.
    pub fn nav_down(&mut self) {
        let len = self.category_tree().len();
        if len > 0 {
            self.selected_category = self.selected_category.saturating_add(1).min(len - 1);
        }
    }

    /// Clamp the category selection to the current tree. Call after the
    /// category list changes.
    pub fn clamp_category_selection(&mut self) {
        let len = self.category_tree().len();
        self.selected_category = if len == 0 {
            0
        } else {
            self.selected_category.min(len - 1)
        };
    }

    // -- Content view --

    /// Enter the content view and start fetching the configured item.
    pub fn enter_content(&mut self) {
        self.view = View::Content;
        self.scroll_offset = 0;
        self.content.load(self.content_id);
        self.needs_redraw = true;
    }

    /// Exit the content view back to home.
    pub fn exit_content(&mut self) {
        self.view = View::Home;
        self.scroll_offset = 0;
        self.needs_redraw = true;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Clamp scroll offset so the viewport never runs past the content.
    pub fn clamp_scroll(&mut self, content_lines: usize) {
        let max_scroll = content_lines.saturating_sub(self.content_visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    // -- Events --

    /// Dispatch a background-task completion.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CategoriesLoaded { generation, result } => {
                self.categories.apply(generation, result);
                self.clamp_category_selection();
            }
            AppEvent::ContentLoaded { content_id, generation, result } => {
                self.content.apply(content_id, generation, result);
            }
            AppEvent::AuthCompleted { generation, result } => {
                self.auth.apply(generation, result);
                match self.auth.state().clone() {
                    AuthState::Success { display_name } => {
                        self.set_status(format!("Welcome, {display_name}"));
                        self.login.reset();
                        self.view = View::Home;
                        self.categories.refresh();
                    }
                    AuthState::Error { message, .. } => {
                        self.set_status(message);
                        self.auth.reset_error();
                    }
                    _ => {}
                }
            }
        }
        self.needs_redraw = true;
    }

    /// Whether a spinner-worthy load is in flight for the current view.
    pub fn is_busy(&self) -> bool {
        match self.view {
            View::Login => matches!(self.auth.state(), AuthState::Loading),
            View::Home => self.categories.state().is_loading(),
            View::Content => self.content.state().is_loading(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{self, Duration};

    fn test_app() -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let config = Config {
            api_base_url: "http://127.0.0.1:1".to_string(),
            auth_base_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        };
        (App::new(&config, tx).unwrap(), rx)
    }

    fn category(id: i64, name: &str, parent: Option<i64>) -> Category {
        Category {
            id,
            name: name.to_string(),
            weight: id,
            parent,
            web_logo: String::new(),
            mobile_logo: String::new(),
        }
    }

    #[tokio::test]
    async fn test_starts_on_login_when_unauthenticated() {
        let (app, _rx) = test_app();
        assert_eq!(app.view, View::Login);
    }

    #[tokio::test]
    async fn test_category_tree_indents_children_under_parent() {
        let categories = vec![
            category(1, "Science", None),
            category(2, "Maths", None),
            category(3, "Physics", Some(1)),
            category(4, "Chemistry", Some(1)),
        ];
        let tree = build_category_tree(&categories);
        let rows: Vec<(&str, usize)> = tree.iter().map(|i| (i.name.as_str(), i.depth)).collect();
        assert_eq!(
            rows,
            vec![("Science", 0), ("Physics", 1), ("Chemistry", 1), ("Maths", 0)]
        );
    }

    #[tokio::test]
    async fn test_nav_on_empty_tree_stays_at_zero() {
        let (mut app, _rx) = test_app();
        app.nav_down();
        app.nav_up();
        assert_eq!(app.selected_category, 0);
        app.clamp_category_selection();
        assert_eq!(app.selected_category, 0);
    }

    #[tokio::test]
    async fn test_login_form_focus_cycles_per_mode() {
        let mut form = LoginForm::default();
        assert_eq!(form.focus, LoginField::Email);
        form.focus_next();
        assert_eq!(form.focus, LoginField::Password);
        form.focus_next();
        assert_eq!(form.focus, LoginField::Email); // wraps in sign-in mode

        form.toggle_mode();
        form.focus = LoginField::Password;
        form.focus_next();
        assert_eq!(form.focus, LoginField::Confirm);
    }

    #[tokio::test]
    async fn test_toggle_mode_clears_passwords_keeps_email() {
        let mut form = LoginForm::default();
        form.email = "a@b.com".to_string();
        form.password = "secret".to_string();
        form.toggle_mode();
        assert_eq!(form.mode, LoginMode::SignUp);
        assert_eq!(form.email, "a@b.com");
        assert!(form.password.is_empty());
    }

    #[tokio::test]
    async fn test_signup_with_mismatched_confirm_sets_status() {
        let (mut app, _rx) = test_app();
        app.login.mode = LoginMode::SignUp;
        app.login.email = "a@b.com".to_string();
        app.login.password = "abc123".to_string();
        app.login.confirm = "abc124".to_string();
        app.submit_login();
        assert_eq!(
            app.status_message.as_ref().map(|(m, _)| m.as_ref()),
            Some("Passwords do not match")
        );
        assert_ne!(*app.auth.state(), AuthState::Loading);
    }

    #[tokio::test]
    async fn test_federated_login_without_token_sets_status() {
        let (mut app, _rx) = test_app();
        app.submit_federated_login();
        assert!(app
            .status_message
            .as_ref()
            .map(|(m, _)| m.contains("No ID token"))
            .unwrap_or(false));
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let (mut app, _rx) = test_app();
        time::pause();
        app.set_status("Test message");
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some()); // Still present at 2s

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_none()); // Expired after 3s
    }

    #[tokio::test]
    async fn test_scroll_saturates_at_zero() {
        let (mut app, _rx) = test_app();
        app.scroll_up(5);
        assert_eq!(app.scroll_offset, 0);
        app.scroll_down(3);
        assert_eq!(app.scroll_offset, 3);
    }

    #[tokio::test]
    async fn test_clamp_scroll_respects_viewport() {
        let (mut app, _rx) = test_app();
        app.content_visible_lines = 10;
        app.scroll_offset = 100;
        app.clamp_scroll(25);
        assert_eq!(app.scroll_offset, 15);
    }

    #[tokio::test]
    async fn test_exit_content_resets_scroll() {
        let (mut app, _rx) = test_app();
        app.view = View::Content;
        app.scroll_offset = 40;
        app.exit_content();
        assert_eq!(app.view, View::Home);
        assert_eq!(app.scroll_offset, 0);
    }

    #[tokio::test]
    async fn test_sign_out_returns_to_login_and_clears_form() {
        let (mut app, _rx) = test_app();
        app.view = View::Home;
        app.login.email = "a@b.com".to_string();
        app.sign_out();
        assert_eq!(app.view, View::Login);
        assert!(app.login.email.is_empty());
        assert!(!app.session.is_authenticated());
    }
}
