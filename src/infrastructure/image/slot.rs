//! Consumer slot tokens for stale-result suppression.

use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque token identifying one load request issued on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// A consumer slot that accepts at most one authoritative load at a time.
///
/// Each `begin` issues a new token and withdraws authority from every
/// earlier one. A completion whose token is no longer current must be
/// discarded by the caller; the in-flight request itself is not aborted.
#[derive(Debug, Default)]
pub struct ImageSlot {
    current: AtomicU64,
}

impl ImageSlot {
    /// Creates a fresh slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load on this slot, superseding any outstanding one.
    pub fn begin(&self) -> RequestToken {
        RequestToken(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` still speaks for this slot.
    #[must_use]
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current.load(Ordering::SeqCst) == token.0
    }

    /// Tears the slot down; every outstanding token becomes stale.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}
