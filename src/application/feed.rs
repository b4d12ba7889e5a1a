//! Photo feed lifecycle service.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::entities::{LoadingState, Photo};
use crate::domain::ports::PhotoFetcherPort;

/// Drives the photo collection through its loading lifecycle.
///
/// All transitions funnel through one watch channel, so observers receive
/// a strictly ordered sequence of state snapshots; an observer that lags
/// only ever skips ahead to the latest state. When several `load` or
/// `refresh` calls overlap, only the most recently initiated one may
/// publish a terminal state; superseded completions are discarded.
pub struct PhotoFeed {
    fetcher: Arc<dyn PhotoFetcherPort>,
    state_tx: watch::Sender<LoadingState<Photo>>,
    generation: AtomicU64,
}

impl PhotoFeed {
    /// Creates a feed in the `Idle` state.
    #[must_use]
    pub fn new(fetcher: Arc<dyn PhotoFetcherPort>) -> Self {
        let (state_tx, _) = watch::channel(LoadingState::Idle);
        Self {
            fetcher,
            state_tx,
            generation: AtomicU64::new(0),
        }
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> LoadingState<Photo> {
        self.state_tx.borrow().clone()
    }

    /// Subscribes to state snapshots.
    ///
    /// The receiver observes every published transition in order and
    /// coalesces to the latest snapshot when it lags behind.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadingState<Photo>> {
        self.state_tx.subscribe()
    }

    /// Fetches the collection and publishes the outcome.
    ///
    /// Re-entrant: a call issued while another is in flight supersedes it.
    /// A non-empty result lands in `Loaded`, an empty one in `Empty`, a
    /// failure in `Error` carrying the fetch error unchanged.
    pub async fn load(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.state_tx.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            *state = LoadingState::Loading;
            true
        });

        let outcome = match self.fetcher.fetch_photos().await {
            Ok(photos) if photos.is_empty() => LoadingState::Empty,
            Ok(photos) => LoadingState::Loaded(photos),
            Err(err) => {
                warn!(error = %err, "Photo fetch failed");
                LoadingState::Error(err)
            }
        };

        let applied = self.state_tx.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = outcome;
            true
        });

        if !applied {
            debug!(generation, "Discarded superseded load completion");
        }
    }

    /// Restarts the fetch regardless of the current state.
    pub async fn refresh(&self) {
        self.load().await;
    }

    /// Removes a photo by id from a loaded collection.
    ///
    /// Ignored unless the feed is `Loaded` and the id is present.
    /// Removing the last photo transitions to `Empty`.
    pub fn remove_photo(&self, id: &str) {
        self.state_tx.send_if_modified(|state| {
            let LoadingState::Loaded(photos) = state else {
                return false;
            };
            let before = photos.len();
            photos.retain(|photo| photo.id != id);
            if photos.len() == before {
                return false;
            }
            debug!(id, remaining = photos.len(), "Removed photo");
            if photos.is_empty() {
                *state = LoadingState::Empty;
            }
            true
        });
    }
}

impl std::fmt::Debug for PhotoFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoFeed")
            .field("state", &*self.state_tx.borrow())
            .finish_non_exhaustive()
    }
}
