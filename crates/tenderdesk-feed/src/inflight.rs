//! In-flight request registry.
//!
//! Coalesces duplicate concurrent fetches: for one fingerprint, at most
//! one backend call is ever in flight. The first caller becomes the
//! leader and owns an [`InflightGuard`]; later callers become followers
//! and await the leader's broadcast. Entries are removed when the
//! request settles, success or failure; a dropped leader closes the
//! channel rather than leaving a stuck placeholder.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::fingerprint::Fingerprint;

/// Role handed to a caller entering the registry.
pub enum FetchRole<T> {
    /// This caller must perform the backend call and settle the guard.
    Leader(InflightGuard<T>),
    /// A call for the same fingerprint is pending; await its outcome.
    Follower(broadcast::Receiver<T>),
}

/// Registry of pending fetches keyed by fingerprint.
pub struct InflightRegistry<T> {
    pending: Mutex<HashMap<Fingerprint, broadcast::Sender<T>>>,
}

impl<T: Clone> InflightRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Attaches to a pending fetch, if one exists for the key.
    pub fn try_attach(&self, key: &Fingerprint) -> Option<broadcast::Receiver<T>> {
        let pending = self.pending.lock().expect("inflight lock poisoned");
        pending.get(key).map(broadcast::Sender::subscribe)
    }

    /// Attaches to a pending fetch or registers a new one, atomically.
    /// The returned leader guard keeps the registry alive until it
    /// settles.
    pub fn attach_or_lead(registry: &Arc<Self>, key: Fingerprint) -> FetchRole<T> {
        let mut pending = registry.pending.lock().expect("inflight lock poisoned");
        if let Some(tx) = pending.get(&key) {
            return FetchRole::Follower(tx.subscribe());
        }

        let (tx, _) = broadcast::channel(1);
        pending.insert(key.clone(), tx.clone());
        FetchRole::Leader(InflightGuard {
            registry: Arc::clone(registry),
            key,
            tx,
            settled: false,
        })
    }

}

impl<T> InflightRegistry<T> {
    /// Number of fetches currently pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().expect("inflight lock poisoned").len()
    }

    /// Returns true when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, key: &Fingerprint) {
        self.pending
            .lock()
            .expect("inflight lock poisoned")
            .remove(key);
    }
}

impl<T: Clone> Default for InflightRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive handle owned by the leader of one in-flight fetch.
///
/// Settling releases the registry entry first, so a caller arriving
/// after settlement starts a fresh fetch instead of attaching to a
/// finished one.
pub struct InflightGuard<T> {
    registry: Arc<InflightRegistry<T>>,
    key: Fingerprint,
    tx: broadcast::Sender<T>,
    settled: bool,
}

impl<T: Clone> InflightGuard<T> {
    /// Publishes the outcome to every follower and releases the entry.
    pub fn settle(mut self, outcome: T) {
        self.registry.release(&self.key);
        self.settled = true;
        // No followers is fine; the send result only signals that.
        let _ = self.tx.send(outcome);
    }

    /// The fingerprint this guard leads.
    #[must_use]
    pub fn key(&self) -> &Fingerprint {
        &self.key
    }
}

impl<T> Drop for InflightGuard<T> {
    fn drop(&mut self) {
        if !self.settled {
            // Leader abandoned without settling (e.g. future dropped).
            // Removing the entry closes the channel, waking followers
            // with a closed-channel error instead of hanging them.
            self.registry.release(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderdesk_backend::TenderQuery;
    use tenderdesk_core::UserId;

    fn key() -> Fingerprint {
        Fingerprint::of(&TenderQuery::new(UserId::generate()))
    }

    #[tokio::test]
    async fn test_leader_then_follower() {
        let registry: Arc<InflightRegistry<u32>> = Arc::new(InflightRegistry::new());
        let key = key();

        let FetchRole::Leader(guard) = InflightRegistry::attach_or_lead(&registry, key.clone()) else {
            panic!("first caller must lead");
        };
        assert_eq!(registry.len(), 1);

        let FetchRole::Follower(mut rx) = InflightRegistry::attach_or_lead(&registry, key.clone()) else {
            panic!("second caller must follow");
        };

        guard.settle(99);
        assert_eq!(rx.recv().await.unwrap(), 99);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_settle_releases_before_broadcast() {
        let registry: Arc<InflightRegistry<u32>> = Arc::new(InflightRegistry::new());
        let key = key();

        let FetchRole::Leader(guard) = InflightRegistry::attach_or_lead(&registry, key.clone()) else {
            panic!("first caller must lead");
        };
        guard.settle(1);

        // A caller arriving after settlement starts fresh
        assert!(matches!(
            InflightRegistry::attach_or_lead(&registry, key.clone()),
            FetchRole::Leader(_)
        ));
    }

    #[tokio::test]
    async fn test_dropped_leader_closes_followers() {
        let registry: Arc<InflightRegistry<u32>> = Arc::new(InflightRegistry::new());
        let key = key();

        let FetchRole::Leader(guard) = InflightRegistry::attach_or_lead(&registry, key.clone()) else {
            panic!("first caller must lead");
        };
        let FetchRole::Follower(mut rx) = InflightRegistry::attach_or_lead(&registry, key.clone()) else {
            panic!("second caller must follow");
        };

        drop(guard);
        assert!(registry.is_empty());
        assert!(rx.recv().await.is_err());
    }

    #[tokio::test]
    async fn test_try_attach_without_pending() {
        let registry: Arc<InflightRegistry<u32>> = Arc::new(InflightRegistry::new());
        assert!(registry.try_attach(&key()).is_none());
    }
}
