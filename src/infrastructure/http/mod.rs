//! Unsplash HTTP infrastructure.

pub mod client;
pub mod params;
pub mod photo_fetcher;

pub use client::ApiClient;
pub use params::RequestParams;
pub use photo_fetcher::UnsplashPhotoFetcher;
