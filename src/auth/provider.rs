use std::future::Future;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Per-operation timeout for identity provider calls.
const AUTH_TIMEOUT: Duration = Duration::from_secs(20);

/// Classified identity-provider failures.
///
/// The provider reports failures as short machine codes (plus free-form
/// text); [`classify_failure`] maps them into this fixed taxonomy so the
/// coordinator can surface distinguishable error kinds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Email already in use")]
    EmailInUse,
    #[error("Password too weak")]
    WeakPassword,
    #[error("Network error: {0}")]
    Network(String),
    #[error("{0}")]
    Other(String),
}

/// Session shape the provider hands back on success.
#[derive(Debug, Clone, Default)]
pub struct ProviderSession {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// External identity provider.
///
/// Futures are `Send` so coordinator operations can run on spawned tasks.
/// `current_session` reflects whatever session the provider already holds at
/// startup; `sign_out` only drops provider-side state.
pub trait IdentityProvider: Send + Sync {
    fn current_session(&self) -> Option<ProviderSession>;

    fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<ProviderSession, ProviderError>> + Send;

    fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> impl Future<Output = Result<ProviderSession, ProviderError>> + Send;

    fn sign_in_with_token(
        &self,
        id_token: &str,
    ) -> impl Future<Output = Result<ProviderSession, ProviderError>> + Send;

    fn sign_out(&self);
}

/// Maps a provider failure code (or message) into the error taxonomy.
///
/// Specific codes select their variant directly; the network case is a
/// substring match on the failure text since transport errors arrive as
/// free-form messages rather than codes.
pub(crate) fn classify_failure(code: &str) -> ProviderError {
    let trimmed = code.trim();
    // Codes may carry a trailing explanation, e.g. "WEAK_PASSWORD : ..."
    let head = trimmed.split_whitespace().next().unwrap_or("");
    match head {
        "EMAIL_NOT_FOUND" | "USER_DISABLED" | "USER_NOT_FOUND" => ProviderError::UserNotFound,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
            ProviderError::InvalidCredentials
        }
        "EMAIL_EXISTS" => ProviderError::EmailInUse,
        "WEAK_PASSWORD" => ProviderError::WeakPassword,
        _ if trimmed.to_ascii_lowercase().contains("network") => {
            ProviderError::Network(trimmed.to_string())
        }
        _ => ProviderError::Other(trimmed.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(default)]
    email: Option<String>,
    #[serde(rename = "displayName", default)]
    display_name: Option<String>,
    #[serde(rename = "idToken", default)]
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FailureResponse {
    error: FailureBody,
}

#[derive(Debug, Deserialize)]
struct FailureBody {
    #[serde(default)]
    message: String,
}

/// Identity provider speaking the hosted REST dialect
/// (`accounts:signInWithPassword`, `accounts:signUp`, `accounts:signInWithIdp`).
///
/// Stateless apart from the bearer token of the most recent successful
/// operation, which `sign_out` drops. Nothing is persisted to disk.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    token: RwLock<Option<SecretString>>,
}

impl HttpIdentityProvider {
    pub fn new(client: reqwest::Client, base_url: &str, api_key: Option<SecretString>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            token: RwLock::new(None),
        }
    }

    fn endpoint(&self, action: &str) -> String {
        match &self.api_key {
            Some(key) => format!(
                "{}/v1/accounts:{}?key={}",
                self.base_url,
                action,
                key.expose_secret()
            ),
            None => format!("{}/v1/accounts:{}", self.base_url, action),
        }
    }

    async fn call(
        &self,
        action: &str,
        body: serde_json::Value,
    ) -> Result<ProviderSession, ProviderError> {
        let url = self.endpoint(action);
        let response = tokio::time::timeout(AUTH_TIMEOUT, self.client.post(&url).json(&body).send())
            .await
            .map_err(|_| ProviderError::Network("request timed out".to_string()))?
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !status.is_success() {
            // The provider reports failures as 4xx with a coded message body
            let code = serde_json::from_slice::<FailureResponse>(&bytes)
                .map(|f| f.error.message)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            tracing::debug!(action, code = %code, "Identity provider rejected operation");
            return Err(classify_failure(&code));
        }

        let session: SessionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::Other(format!("malformed provider response: {e}")))?;

        if let Some(token) = session.id_token {
            *self.token.write().unwrap_or_else(PoisonError::into_inner) =
                Some(SecretString::from(token));
        }

        tracing::info!(action, "Identity provider operation succeeded");
        Ok(ProviderSession {
            display_name: session.display_name,
            email: session.email,
        })
    }
}

impl IdentityProvider for HttpIdentityProvider {
    /// No session outlives the process: tokens are held in memory only.
    fn current_session(&self) -> Option<ProviderSession> {
        None
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<ProviderSession, ProviderError> {
        self.call(
            "signInWithPassword",
            json!({
                "email": email,
                "password": password.expose_secret(),
                "returnSecureToken": true,
            }),
        )
        .await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<ProviderSession, ProviderError> {
        self.call(
            "signUp",
            json!({
                "email": email,
                "password": password.expose_secret(),
                "returnSecureToken": true,
            }),
        )
        .await
    }

    async fn sign_in_with_token(&self, id_token: &str) -> Result<ProviderSession, ProviderError> {
        self.call(
            "signInWithIdp",
            json!({
                "postBody": format!("id_token={}&providerId=google.com", id_token),
                "requestUri": "http://localhost",
                "returnSecureToken": true,
            }),
        )
        .await
    }

    fn sign_out(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
