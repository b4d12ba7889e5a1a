//! Photo fetching port definition.

use async_trait::async_trait;

use crate::domain::entities::Photo;
use crate::domain::errors::FetchError;

/// Port for fetching the photo collection from a backing service.
#[async_trait]
pub trait PhotoFetcherPort: Send + Sync {
    /// Fetches the photo collection, preserving server order.
    async fn fetch_photos(&self) -> Result<Vec<Photo>, FetchError>;
}

#[cfg(test)]
pub mod mock {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    type ScriptedFetch = (Duration, Result<Vec<Photo>, FetchError>);

    /// Mock photo fetcher with scriptable responses and latency.
    ///
    /// Responses are consumed in push order; once the script runs dry,
    /// further calls return an empty collection.
    #[derive(Default)]
    pub struct MockPhotoFetcher {
        script: Mutex<VecDeque<ScriptedFetch>>,
        calls: AtomicUsize,
    }

    impl MockPhotoFetcher {
        /// Creates a mock with an empty script.
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues an immediate response.
        pub fn push(&self, result: Result<Vec<Photo>, FetchError>) {
            self.push_delayed(Duration::ZERO, result);
        }

        /// Queues a response delivered after `delay`.
        pub fn push_delayed(&self, delay: Duration, result: Result<Vec<Photo>, FetchError>) {
            self.script.lock().unwrap().push_back((delay, result));
        }

        /// Number of fetches issued so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PhotoFetcherPort for MockPhotoFetcher {
        async fn fetch_photos(&self) -> Result<Vec<Photo>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, result) = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((Duration::ZERO, Ok(Vec::new())));
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }
}
