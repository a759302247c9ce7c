//! Authenticated-user session, shared across screens.
//!
//! The session is a plain value behind an explicitly passed handle: it is
//! constructed once in `main` and threaded through the coordinator and UI,
//! never reached through a global. The lock is a synchronous `RwLock`;
//! holders only snapshot or replace the value and never hold it across an
//! await point.

use std::sync::{Arc, PoisonError, RwLock};

/// The authenticated-user context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub authenticated: bool,
    pub display_name: Option<String>,
}

/// Cloneable handle to the shared [`Session`].
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<Session>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session value, by copy.
    pub fn snapshot(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .authenticated
    }

    pub fn display_name(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .display_name
            .clone()
    }

    /// Marks the session authenticated with the given display name.
    pub fn establish(&self, display_name: Option<String>) {
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        session.authenticated = true;
        session.display_name = display_name;
    }

    /// Clears the session back to the signed-out state.
    pub fn clear(&self) {
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *session = Session::default();
    }
}
