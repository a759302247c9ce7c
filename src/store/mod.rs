//! Data stores over the API client.
//!
//! One store per concern: [`CategoryStore`] for the category list,
//! [`ContentStore`] for single content records. Stores translate transport
//! and wire errors into [`StoreError`], which distinguishes a missing record
//! from a failed fetch from a malformed payload so callers can react
//! differently to each.

mod categories;
mod content;

pub use categories::CategoryStore;
pub use content::ContentStore;

use thiserror::Error;

use crate::api::ApiError;

/// Failure modes a fetch can surface to the UI layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The record does not exist (HTTP 404 or a non-ok content envelope).
    #[error("Not found")]
    NotFound,
    /// The request never produced a usable response: network failure,
    /// timeout, or a server-side error.
    #[error("Transport failure: {0}")]
    Transport(String),
    /// The response arrived but could not be decoded.
    #[error("Malformed payload: {0}")]
    Decode(String),
}

impl StoreError {
    /// Classify an [`ApiError`]. A non-"200" envelope on a *content* request
    /// means the record is missing; the category list endpoint has no
    /// per-item missing notion, so its envelope failures are transport-level.
    pub(crate) fn from_api(err: ApiError, item_endpoint: bool) -> Self {
        match err {
            ApiError::HttpStatus(404) => StoreError::NotFound,
            ApiError::Status(_) if item_endpoint => StoreError::NotFound,
            ApiError::Decode(e) => StoreError::Decode(e.to_string()),
            other => StoreError::Transport(other.to_string()),
        }
    }

    /// Human-readable message for the Error view state.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::NotFound => "The requested content was not found.".to_string(),
            StoreError::Transport(_) => {
                "Could not reach the server. Please check your connection.".to_string()
            }
            StoreError::Decode(_) => "The server returned an unexpected response.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_maps_to_not_found() {
        let err = StoreError::from_api(ApiError::HttpStatus(404), true);
        assert_eq!(err, StoreError::NotFound);
    }

    #[test]
    fn test_envelope_status_depends_on_endpoint() {
        let item = StoreError::from_api(ApiError::Status("404".into()), true);
        assert_eq!(item, StoreError::NotFound);

        let list = StoreError::from_api(ApiError::Status("500".into()), false);
        assert!(matches!(list, StoreError::Transport(_)));
    }

    #[test]
    fn test_server_error_maps_to_transport() {
        let err = StoreError::from_api(ApiError::HttpStatus(500), true);
        assert!(matches!(err, StoreError::Transport(_)));
    }

    #[test]
    fn test_timeout_maps_to_transport() {
        let err = StoreError::from_api(ApiError::Timeout, false);
        assert!(matches!(err, StoreError::Transport(_)));
    }
}
