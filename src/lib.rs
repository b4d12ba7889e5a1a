//! photofeed - An asynchronous photo-feed retrieval and caching core.
//!
//! This crate fetches the Unsplash photo collection over HTTP, caches image
//! payloads with single-flight download deduplication, and exposes an
//! observable loading state machine for list consumers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the feed lifecycle service.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "photofeed";
