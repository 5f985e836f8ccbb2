//! Debounce timing for rapid-fire query changes.
//!
//! Every invocation bumps a shared generation counter, sleeps its
//! quantum, then checks whether it is still the latest. Only the most
//! recent invocation of a burst survives; superseded ones never reach
//! the backend. A call that already passed its debounce window is not
//! cancelled by later changes; stale results are discarded at
//! application time instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// What kind of change triggered a query, selecting the quantum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Keystroke-driven free-text search change.
    Search,
    /// Structural change: filter selection, page flip.
    Structural,
    /// Explicit user action (refetch); no debounce delay.
    Immediate,
}

/// Generation-counted debouncer shared by all triggers of one feed.
#[derive(Debug, Default)]
pub struct Debouncer {
    generation: AtomicU64,
}

impl Debouncer {
    /// Creates a debouncer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits out the quantum. Returns `false` when a newer invocation
    /// arrived while waiting, in which case the caller must not fire.
    pub async fn settle(&self, quantum: Duration) -> bool {
        let mine = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if !quantum.is_zero() {
            tokio::time::sleep(quantum).await;
        }
        self.generation.load(Ordering::SeqCst) == mine
    }
}
