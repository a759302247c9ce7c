use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::AppEvent;
use crate::session::SharedSession;

use super::provider::{IdentityProvider, ProviderError};
use super::validate::{is_blank, validate_password};

/// Error kinds the identity flow can surface, used by the UI to decide how
/// to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidInput,
    InvalidCredentials,
    UserNotFound,
    EmailInUse,
    WeakPassword,
    Network,
    Generic,
}

/// Identity screen state.
///
/// Exactly one variant holds at any time. `Loading` transitions to exactly
/// one of `Success`/`Error` per operation; `reset_error` returns `Error` to
/// `Initial`.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Initial,
    Loading,
    Success { display_name: String },
    Error { message: String, kind: AuthErrorKind },
}

/// Payload of a successful provider operation, after the display-name
/// fallback has been applied.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub display_name: String,
}

/// Coordinates the identity provider, the shared session, and the identity
/// screen state.
///
/// Operations validate locally first, then spawn a single provider call
/// that resolves through [`AppEvent::AuthCompleted`]. A generation counter
/// plus task abort ensures a superseded operation can never overwrite the
/// state of a newer one.
pub struct AuthCoordinator<P> {
    provider: Arc<P>,
    session: SharedSession,
    event_tx: mpsc::Sender<AppEvent>,
    state: AuthState,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl<P: IdentityProvider + 'static> AuthCoordinator<P> {
    /// Creates the coordinator, adopting any session the provider already
    /// holds (the state machine itself starts at `Initial` either way).
    pub fn new(provider: Arc<P>, session: SharedSession, event_tx: mpsc::Sender<AppEvent>) -> Self {
        if let Some(existing) = provider.current_session() {
            let name = existing.display_name.or(existing.email);
            tracing::info!(display_name = ?name, "Adopting pre-existing provider session");
            session.establish(name);
        }
        Self {
            provider,
            session,
            event_tx,
            state: AuthState::Initial,
            generation: 0,
            handle: None,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Email/password sign-in. Blank fields fail immediately without a
    /// provider call.
    pub fn sign_in(&mut self, email: &str, password: &str) {
        if is_blank(email) || is_blank(password) {
            self.state = AuthState::Error {
                message: "Email and password cannot be empty".to_string(),
                kind: AuthErrorKind::InvalidInput,
            };
            return;
        }

        let email = email.to_string();
        let password = SecretString::from(password.to_string());
        self.spawn_operation(move |provider| async move {
            provider.sign_in(&email, &password).await.map(|s| AuthOutcome {
                // Name-or-email fallback, matching what the home screen greets with
                display_name: s
                    .display_name
                    .or(s.email)
                    .unwrap_or_else(|| "User".to_string()),
            })
        });
    }

    /// Email/password sign-up. Blank fields and weak passwords fail
    /// immediately without a provider call; the strength rule is the same
    /// advisory check the form shows while typing.
    pub fn sign_up(&mut self, email: &str, password: &str) {
        if is_blank(email) || is_blank(password) {
            self.state = AuthState::Error {
                message: "Email and password cannot be empty".to_string(),
                kind: AuthErrorKind::InvalidInput,
            };
            return;
        }
        if let Some(msg) = validate_password(password) {
            self.state = AuthState::Error {
                message: msg.to_string(),
                kind: AuthErrorKind::WeakPassword,
            };
            return;
        }

        let email = email.to_string();
        let password = SecretString::from(password.to_string());
        self.spawn_operation(move |provider| async move {
            let submitted = email.clone();
            provider.sign_up(&email, &password).await.map(|s| AuthOutcome {
                display_name: s.email.unwrap_or(submitted),
            })
        });
    }

    /// Federated sign-in with an externally obtained ID token.
    pub fn sign_in_with_token(&mut self, id_token: &str) {
        let token = id_token.to_string();
        self.spawn_operation(move |provider| async move {
            provider.sign_in_with_token(&token).await.map(|s| AuthOutcome {
                display_name: s
                    .display_name
                    .or(s.email)
                    .unwrap_or_else(|| "User".to_string()),
            })
        });
    }

    /// Signs out: provider state dropped, shared session cleared, state back
    /// to Initial. Any in-flight operation is cancelled.
    pub fn sign_out(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.provider.sign_out();
        self.session.clear();
        self.state = AuthState::Initial;
        tracing::info!("Signed out");
    }

    /// Dismisses an error, returning the state machine to Initial.
    pub fn reset_error(&mut self) {
        if matches!(self.state, AuthState::Error { .. }) {
            self.state = AuthState::Initial;
        }
    }

    /// Applies a completed provider operation.
    ///
    /// Results from superseded generations are discarded; the session and
    /// state only ever reflect the most recent trigger. On success the
    /// shared session is updated before the state reports Success.
    pub fn apply(&mut self, generation: u64, result: Result<AuthOutcome, ProviderError>) {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "Discarding stale auth result"
            );
            return;
        }
        self.handle = None;

        match result {
            Ok(outcome) => {
                self.session.establish(Some(outcome.display_name.clone()));
                self.state = AuthState::Success {
                    display_name: outcome.display_name,
                };
            }
            Err(err) => {
                let (message, kind) = describe_failure(err);
                tracing::warn!(?kind, "Auth operation failed");
                self.state = AuthState::Error { message, kind };
            }
        }
    }

    fn spawn_operation<F, Fut>(&mut self, op: F)
    where
        F: FnOnce(Arc<P>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<AuthOutcome, ProviderError>> + Send,
    {
        self.state = AuthState::Loading;
        self.generation += 1;
        let generation = self.generation;
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }

        let provider = Arc::clone(&self.provider);
        let tx = self.event_tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let result = op(provider).await;
            if tx
                .send(AppEvent::AuthCompleted { generation, result })
                .await
                .is_err()
            {
                tracing::debug!("Auth event receiver dropped");
            }
        }));
    }
}

impl<P> Drop for AuthCoordinator<P> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// User-facing message and kind for a classified provider failure.
///
/// The network case additionally catches generic failures whose text
/// mentions the network, since some provider paths report transport trouble
/// as free-form messages.
fn describe_failure(err: ProviderError) -> (String, AuthErrorKind) {
    match err {
        ProviderError::InvalidCredentials => (
            "Invalid email or password".to_string(),
            AuthErrorKind::InvalidCredentials,
        ),
        ProviderError::UserNotFound => (
            "User not found. Please check your email or sign up.".to_string(),
            AuthErrorKind::UserNotFound,
        ),
        ProviderError::EmailInUse => (
            "This email is already in use. Try signing in instead.".to_string(),
            AuthErrorKind::EmailInUse,
        ),
        ProviderError::WeakPassword => (
            "Password is too weak. Please use a stronger password.".to_string(),
            AuthErrorKind::WeakPassword,
        ),
        ProviderError::Network(_) => (
            "Network error. Please check your connection.".to_string(),
            AuthErrorKind::Network,
        ),
        ProviderError::Other(msg) if msg.to_ascii_lowercase().contains("network") => (
            "Network error. Please check your connection.".to_string(),
            AuthErrorKind::Network,
        ),
        ProviderError::Other(msg) => {
            let message = if msg.is_empty() {
                "Sign in failed".to_string()
            } else {
                msg
            };
            (message, AuthErrorKind::Generic)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::provider::ProviderSession;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted provider that records how many network calls were made.
    struct MockProvider {
        calls: AtomicUsize,
        outcome: Result<ProviderSession, ProviderError>,
        existing: Option<ProviderSession>,
    }

    impl MockProvider {
        fn succeeding(display_name: Option<&str>, email: Option<&str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcome: Ok(ProviderSession {
                    display_name: display_name.map(String::from),
                    email: email.map(String::from),
                }),
                existing: None,
            }
        }

        fn failing(err: ProviderError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcome: Err(err),
                existing: None,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl IdentityProvider for MockProvider {
        fn current_session(&self) -> Option<ProviderSession> {
            self.existing.clone()
        }

        async fn sign_in(
            &self,
            _email: &str,
            _password: &SecretString,
        ) -> Result<ProviderSession, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }

        async fn sign_up(
            &self,
            _email: &str,
            _password: &SecretString,
        ) -> Result<ProviderSession, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }

        async fn sign_in_with_token(
            &self,
            _id_token: &str,
        ) -> Result<ProviderSession, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }

        fn sign_out(&self) {}
    }

    fn coordinator(
        provider: MockProvider,
    ) -> (
        AuthCoordinator<MockProvider>,
        Arc<MockProvider>,
        mpsc::Receiver<AppEvent>,
    ) {
        let provider = Arc::new(provider);
        let (tx, rx) = mpsc::channel(8);
        let coord = AuthCoordinator::new(Arc::clone(&provider), SharedSession::new(), tx);
        (coord, provider, rx)
    }

    async fn drive(coord: &mut AuthCoordinator<MockProvider>, rx: &mut mpsc::Receiver<AppEvent>) {
        match rx.recv().await {
            Some(AppEvent::AuthCompleted { generation, result }) => coord.apply(generation, result),
            other => panic!("expected AuthCompleted, got {:?}", other.is_some()),
        }
    }

    #[tokio::test]
    async fn test_blank_credentials_never_contact_provider() {
        let (mut coord, provider, _rx) = coordinator(MockProvider::succeeding(None, None));
        coord.sign_in("", "");
        assert!(matches!(
            coord.state(),
            AuthState::Error { kind: AuthErrorKind::InvalidInput, .. }
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_weak_signup_password_short_circuits() {
        let (mut coord, provider, _rx) = coordinator(MockProvider::succeeding(None, None));
        coord.sign_up("a@b.com", "abcde");
        match coord.state() {
            AuthState::Error { message, kind } => {
                assert_eq!(*kind, AuthErrorKind::WeakPassword);
                assert!(message.contains("at least 6"));
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_acceptable_signup_password_reaches_provider() {
        let (mut coord, provider, mut rx) =
            coordinator(MockProvider::succeeding(None, Some("a@b.com")));
        coord.sign_up("a@b.com", "abc123");
        assert_eq!(*coord.state(), AuthState::Loading);
        drive(&mut coord, &mut rx).await;
        assert_eq!(provider.calls(), 1);
        assert_eq!(
            *coord.state(),
            AuthState::Success { display_name: "a@b.com".to_string() }
        );
    }

    #[tokio::test]
    async fn test_sign_in_success_sets_session_before_success_state() {
        let (mut coord, _provider, mut rx) =
            coordinator(MockProvider::succeeding(Some("Ada"), Some("a@b.com")));
        coord.sign_in("a@b.com", "pw1234");
        drive(&mut coord, &mut rx).await;
        assert!(coord.is_authenticated());
        assert_eq!(
            *coord.state(),
            AuthState::Success { display_name: "Ada".to_string() }
        );
    }

    #[tokio::test]
    async fn test_sign_in_name_falls_back_to_email() {
        let (mut coord, _provider, mut rx) =
            coordinator(MockProvider::succeeding(None, Some("a@b.com")));
        coord.sign_in("a@b.com", "pw1234");
        drive(&mut coord, &mut rx).await;
        assert_eq!(
            *coord.state(),
            AuthState::Success { display_name: "a@b.com".to_string() }
        );
    }

    #[tokio::test]
    async fn test_failure_classified_and_surfaced() {
        let (mut coord, _provider, mut rx) =
            coordinator(MockProvider::failing(ProviderError::UserNotFound));
        coord.sign_in("a@b.com", "pw1234");
        drive(&mut coord, &mut rx).await;
        assert!(matches!(
            coord.state(),
            AuthState::Error { kind: AuthErrorKind::UserNotFound, .. }
        ));
        assert!(!coord.is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_out_resets_everything() {
        let (mut coord, _provider, mut rx) =
            coordinator(MockProvider::succeeding(Some("Ada"), None));
        coord.sign_in("a@b.com", "pw1234");
        drive(&mut coord, &mut rx).await;
        assert!(coord.is_authenticated());

        coord.sign_out();
        assert!(!coord.is_authenticated());
        assert_eq!(*coord.state(), AuthState::Initial);
    }

    #[tokio::test]
    async fn test_reset_error_returns_to_initial() {
        let (mut coord, _provider, _rx) = coordinator(MockProvider::succeeding(None, None));
        coord.sign_in("", "");
        coord.reset_error();
        assert_eq!(*coord.state(), AuthState::Initial);
    }

    #[tokio::test]
    async fn test_stale_generation_discarded() {
        let (mut coord, _provider, mut rx) =
            coordinator(MockProvider::succeeding(Some("Ada"), None));
        coord.sign_in("a@b.com", "pw1234");
        let first = match rx.recv().await {
            Some(AppEvent::AuthCompleted { generation, result }) => (generation, result),
            _ => panic!("expected AuthCompleted"),
        };

        // A second trigger supersedes the first before it was applied
        coord.sign_in("a@b.com", "pw1234");
        coord.apply(first.0, first.1);
        assert_eq!(*coord.state(), AuthState::Loading);
    }

    #[tokio::test]
    async fn test_preexisting_provider_session_adopted() {
        let provider = Arc::new(MockProvider {
            calls: AtomicUsize::new(0),
            outcome: Ok(ProviderSession::default()),
            existing: Some(ProviderSession {
                display_name: None,
                email: Some("kept@b.com".to_string()),
            }),
        });
        let (tx, _rx) = mpsc::channel(8);
        let session = SharedSession::new();
        let coord = AuthCoordinator::new(Arc::clone(&provider), session.clone(), tx);
        assert!(coord.is_authenticated());
        assert_eq!(session.display_name(), Some("kept@b.com".to_string()));
        assert_eq!(*coord.state(), AuthState::Initial);
    }
}
