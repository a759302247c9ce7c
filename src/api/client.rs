use std::time::Duration;

use futures::StreamExt;
use thiserror::Error;
use url::Url;

use super::types::{Category, CategoryListResponse, Content, ContentResponse, STATUS_OK};

/// Per-request timeout. The API has no streaming endpoints, so anything
/// slower than this is treated as a dead connection.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Maximum response body size. Category lists and single content records are
/// small; a larger body indicates a misbehaving server or proxy.
const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out after 20s")]
    Timeout,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("API reported status {0:?}")]
    Status(String),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

/// Client for the content API.
///
/// Issues the two read-only GET endpoints against a fixed base host and
/// decodes their JSON envelopes. Cheap to clone; the underlying
/// `reqwest::Client` is a shared connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the given base URL.
    ///
    /// The base URL must be HTTPS; plain HTTP is allowed only for
    /// localhost/127.0.0.1 so tests can run against a local mock server.
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        match parsed.scheme() {
            "https" => {}
            "http" => {
                let is_localhost = matches!(parsed.host_str(), Some("localhost") | Some("127.0.0.1"));
                if !is_localhost {
                    tracing::error!(base_url, "Rejecting non-HTTPS API base URL");
                    return Err(ApiError::InsecureBaseUrl);
                }
            }
            other => return Err(ApiError::InvalidBaseUrl(format!("unsupported scheme {other:?}"))),
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the full category list (`GET {base}/v1/category/all/`), in
    /// the order the server provides it.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = format!("{}/v1/category/all/", self.base_url);
        let body = self.get(&url).await?;
        let envelope: CategoryListResponse = serde_json::from_slice(&body)?;
        if envelope.status != STATUS_OK {
            tracing::warn!(status = %envelope.status, "Category list request rejected by API");
            return Err(ApiError::Status(envelope.status));
        }
        Ok(envelope.categories)
    }

    /// Fetches a single content record (`GET {base}/v1/content/data/{id}/`).
    pub async fn content(&self, id: i64) -> Result<Content, ApiError> {
        let url = format!("{}/v1/content/data/{}/", self.base_url, id);
        let body = self.get(&url).await?;
        let envelope: ContentResponse = serde_json::from_slice(&body)?;
        if envelope.status != STATUS_OK {
            tracing::warn!(content_id = id, status = %envelope.status, "Content request rejected by API");
            return Err(ApiError::Status(envelope.status));
        }
        envelope
            .data
            .ok_or_else(|| ApiError::Status(envelope.status))
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(%url, "API request");
        let response = tokio::time::timeout(REQUEST_TIMEOUT, self.client.get(url).send())
            .await
            .map_err(|_| ApiError::Timeout)?
            .map_err(ApiError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        read_limited(response, MAX_RESPONSE_SIZE).await
    }
}

/// Reads a response body with a hard size limit, streaming chunks so an
/// oversized body is rejected without buffering it whole.
async fn read_limited(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(ApiError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}
