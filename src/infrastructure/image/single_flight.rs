//! Single-flight guard for coalescing duplicate fetches.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::sync::Mutex;
use tracing::trace;

use crate::domain::entities::ImageKey;
use crate::domain::errors::FetchError;

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, FetchError>>>;

/// Coalesces concurrent fetches for the same key into one upstream call.
///
/// The first caller for a key starts the fetch; callers arriving while it
/// is in flight await the same shared future and receive its result,
/// success or failure alike. Once the fetch settles, the key is free for
/// a fresh fetch.
pub struct FlightGroup<T: Clone> {
    inflight: Arc<Mutex<HashMap<ImageKey, SharedFetch<T>>>>,
}

impl<T> FlightGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Runs `fetch` for `key`, unless a fetch for the same key is already
    /// in flight, in which case its result is shared instead.
    pub async fn run<F>(&self, key: &ImageKey, fetch: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let shared = {
            let mut inflight = self.inflight.lock().await;
            if let Some(existing) = inflight.get(key) {
                trace!(key = %key, "Joining in-flight fetch");
                existing.clone()
            } else {
                let group = Arc::clone(&self.inflight);
                let settled_key = key.clone();
                let fut = async move {
                    let result = fetch.await;
                    group.lock().await.remove(&settled_key);
                    result
                }
                .boxed()
                .shared();
                inflight.insert(key.clone(), fut.clone());
                fut
            }
        };

        shared.await
    }

    /// Number of fetches currently in flight.
    pub async fn in_flight(&self) -> usize {
        self.inflight.lock().await.len()
    }
}

impl<T> Default for FlightGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> std::fmt::Debug for FlightGroup<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightGroup").finish_non_exhaustive()
    }
}
