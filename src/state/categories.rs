use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::Category;
use crate::app::AppEvent;
use crate::store::{CategoryStore, StoreError};

use super::load::LoadState;

/// Drives the category list: owns its view state, spawns fetches, and
/// applies completions.
///
/// Each refresh bumps a generation counter and aborts the previous fetch,
/// so a slow earlier response can never overwrite a newer one.
pub struct CategoriesController {
    store: CategoryStore,
    event_tx: mpsc::Sender<AppEvent>,
    state: LoadState<Vec<Category>>,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl CategoriesController {
    pub fn new(store: CategoryStore, event_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            store,
            event_tx,
            state: LoadState::Loading,
            generation: 0,
            handle: None,
        }
    }

    pub fn state(&self) -> &LoadState<Vec<Category>> {
        &self.state
    }

    /// Starts (or restarts) the category fetch.
    pub fn refresh(&mut self) {
        self.state = LoadState::Loading;
        self.generation += 1;
        let generation = self.generation;
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }

        let store = self.store.clone();
        let tx = self.event_tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let result = store.fetch_categories().await;
            if tx
                .send(AppEvent::CategoriesLoaded { generation, result })
                .await
                .is_err()
            {
                tracing::debug!("Category event receiver dropped");
            }
        }));
    }

    /// Applies a completed fetch, discarding results from superseded
    /// generations.
    pub fn apply(&mut self, generation: u64, result: Result<Vec<Category>, StoreError>) {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "Discarding stale category result"
            );
            return;
        }
        self.handle = None;

        self.state = match result {
            Ok(categories) => {
                tracing::info!(count = categories.len(), "Categories loaded");
                LoadState::Success(categories)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Category fetch failed");
                LoadState::Error { message: err.user_message() }
            }
        };
    }
}

impl Drop for CategoriesController {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
