use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::Content;
use crate::app::AppEvent;
use crate::store::{ContentStore, StoreError};

use super::load::LoadState;

/// Drives a single content item: owns its view state, spawns fetches, and
/// applies completions.
///
/// Loading a new id cancels the in-flight fetch for the old one, and
/// stale completions are discarded by generation, so the state shown
/// always belongs to the most recently requested item.
pub struct ContentController {
    store: ContentStore,
    event_tx: mpsc::Sender<AppEvent>,
    state: LoadState<Content>,
    current_id: Option<i64>,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl ContentController {
    pub fn new(store: ContentStore, event_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            store,
            event_tx,
            state: LoadState::Loading,
            current_id: None,
            generation: 0,
            handle: None,
        }
    }

    pub fn state(&self) -> &LoadState<Content> {
        &self.state
    }

    pub fn current_id(&self) -> Option<i64> {
        self.current_id
    }

    /// Starts fetching the given item, superseding any fetch in flight.
    pub fn load(&mut self, content_id: i64) {
        self.state = LoadState::Loading;
        self.current_id = Some(content_id);
        self.generation += 1;
        let generation = self.generation;
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }

        let store = self.store.clone();
        let tx = self.event_tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let result = store.fetch_content(content_id).await;
            if tx
                .send(AppEvent::ContentLoaded { content_id, generation, result })
                .await
                .is_err()
            {
                tracing::debug!("Content event receiver dropped");
            }
        }));
    }

    /// Re-fetches the current item, if one has been requested.
    pub fn retry(&mut self) {
        if let Some(id) = self.current_id {
            self.load(id);
        }
    }

    /// Applies a completed fetch. Results from superseded generations or
    /// for an id that is no longer current are discarded.
    pub fn apply(
        &mut self,
        content_id: i64,
        generation: u64,
        result: Result<Content, StoreError>,
    ) {
        if generation != self.generation || Some(content_id) != self.current_id {
            tracing::debug!(content_id, stale = generation, "Discarding stale content result");
            return;
        }
        self.handle = None;

        self.state = match result {
            Ok(content) => {
                tracing::info!(content_id, title = %content.title, "Content loaded");
                LoadState::Success(content)
            }
            Err(err) => {
                tracing::warn!(content_id, error = %err, "Content fetch failed");
                LoadState::Error { message: err.user_message() }
            }
        };
    }
}

impl Drop for ContentController {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
