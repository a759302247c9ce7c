use crate::api::{ApiClient, Category};

use super::StoreError;

/// Store for the category list.
///
/// Returns the server's list verbatim, preserving its order. No pagination,
/// caching, or filtering; every call is one round trip.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    api: ApiClient,
}

impl CategoryStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, StoreError> {
        let categories = self
            .api
            .categories()
            .await
            .map_err(|e| StoreError::from_api(e, false))?;
        tracing::debug!(count = categories.len(), "Fetched category list");
        Ok(categories)
    }
}
