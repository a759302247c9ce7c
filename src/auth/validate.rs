//! Client-side credential validation.
//!
//! These checks run before any provider call. The strength check mirrors the
//! sign-up form's advisory feedback; the provider enforces its own policy
//! server-side regardless.

/// Minimum accepted password length for sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// True when the string is empty or whitespace-only.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Advisory password strength check for sign-up.
///
/// Returns `None` when the password passes, or a message describing the
/// first failed rule.
pub fn validate_password(password: &str) -> Option<&'static str> {
    if password.len() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 6 characters");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one digit");
    }
    None
}
