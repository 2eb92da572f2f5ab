//! Persistent identity allocation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issues persistent identities that are never repeated for the lifetime of
/// the provider, even after a tracked subject disappears.
///
/// Allocation goes through `&self`, so one provider can be shared across
/// concurrently processed videos behind an `Arc` when globally unique
/// identities are wanted; the default is one provider per video.
#[derive(Debug, Default)]
pub struct IdProvider {
    counter: AtomicU64,
}

impl IdProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused identity. Identities start at 1 so 0 never appears in
    /// output tables.
    pub fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}
