//! Unsplash-backed photo fetcher.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use super::client::ApiClient;
use crate::domain::entities::Photo;
use crate::domain::errors::FetchError;
use crate::domain::ports::PhotoFetcherPort;

/// Endpoint serving the photo collection.
const PHOTOS_PATH: &str = "/photos";

/// Fetches the photo collection from the Unsplash REST API.
pub struct UnsplashPhotoFetcher {
    api: Arc<ApiClient>,
}

impl UnsplashPhotoFetcher {
    /// Creates a fetcher backed by the given API client.
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PhotoFetcherPort for UnsplashPhotoFetcher {
    async fn fetch_photos(&self) -> Result<Vec<Photo>, FetchError> {
        let photos: Vec<Photo> = self
            .api
            .request(PHOTOS_PATH, Method::GET, None, None)
            .await?;
        debug!(count = photos.len(), "Fetched photo collection");
        Ok(photos)
    }
}
