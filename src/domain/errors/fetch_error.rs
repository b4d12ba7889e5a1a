//! Fetch pipeline error types.

use thiserror::Error;

/// Errors produced by the fetch-and-cache pipeline.
///
/// Every variant is terminal for the operation that produced it; nothing
/// is retried automatically. Variants are cloneable so a single failure
/// can be shared between coalesced waiters and stored in state snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum FetchError {
    #[error("invalid request URL")]
    InvalidUrl,

    #[error("server returned HTTP {status}")]
    ServerError { status: u16 },

    #[error("failed to decode response: {message}")]
    DecodingError { message: String },

    #[error("network error: {message}")]
    TransportError { message: String },

    #[error("invalid image payload: {message}")]
    InvalidPayload { message: String },
}

impl FetchError {
    /// Creates a server error for a non-success status.
    #[must_use]
    pub const fn server(status: u16) -> Self {
        Self::ServerError { status }
    }

    /// Creates a decoding error.
    #[must_use]
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::DecodingError {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportError {
            message: message.into(),
        }
    }

    /// Creates an invalid payload error.
    #[must_use]
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }

    /// Returns whether the failure came from the network rather than the
    /// payload.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::TransportError { .. } | Self::ServerError { .. }
        )
    }
}
