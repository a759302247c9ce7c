use crate::api::{ApiClient, Content};

use super::StoreError;

/// Store for single content records.
#[derive(Debug, Clone)]
pub struct ContentStore {
    api: ApiClient,
}

impl ContentStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches one content record by id. The payload is returned exactly as
    /// the server sent it; a missing record surfaces as
    /// [`StoreError::NotFound`].
    pub async fn fetch_content(&self, id: i64) -> Result<Content, StoreError> {
        let content = self
            .api
            .content(id)
            .await
            .map_err(|e| StoreError::from_api(e, true))?;
        tracing::debug!(content_id = id, title = %content.title, "Fetched content");
        Ok(content)
    }
}
