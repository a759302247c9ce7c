//! Identity: provider abstraction, local validation, and the coordinator
//! that drives the sign-in state machine.

mod coordinator;
mod provider;
mod validate;

pub use coordinator::{AuthCoordinator, AuthErrorKind, AuthOutcome, AuthState};
pub use provider::{
    HttpIdentityProvider, IdentityProvider, ProviderError, ProviderSession,
};
pub use validate::{is_blank, validate_password, MIN_PASSWORD_LEN};
