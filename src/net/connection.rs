//! Connection lifecycle tracking.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Count live session tasks so shutdown can drain them
//!
//! # Design Decisions
//! - Sessions are fire-and-forget tasks; the tracker is the only record of
//!   them, used solely to wait out in-flight work at shutdown
//! - Relaxed ordering suffices for IDs: only uniqueness matters

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Global atomic counter for connection IDs.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Counts live sessions for graceful shutdown.
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    active_count: Arc<AtomicU64>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new session. The returned guard decrements on drop.
    pub fn track(&self) -> ConnectionGuard {
        self.active_count.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            active_count: Arc::clone(&self.active_count),
            id: ConnectionId::new(),
        }
    }

    /// Current number of live sessions.
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::SeqCst)
    }

    /// Wait until all sessions have finished, up to `deadline`.
    ///
    /// Sessions are never interrupted; a slow origin can outlive the
    /// deadline. Returns true if everything drained in time.
    pub async fn drain(&self, deadline: Duration) -> bool {
        let poll = Duration::from_millis(100);
        let mut waited = Duration::ZERO;
        while self.active_count() > 0 {
            if waited >= deadline {
                return false;
            }
            tokio::time::sleep(poll).await;
            waited += poll;
        }
        true
    }
}

/// Guard tracking one session's lifetime.
#[derive(Debug)]
pub struct ConnectionGuard {
    active_count: Arc<AtomicU64>,
    id: ConnectionId,
}

impl ConnectionGuard {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active_count.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(connection_id = %self.id, "Connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_id_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }

    #[test]
    fn tracker_counts_guards() {
        let tracker = ConnectionTracker::new();
        assert_eq!(tracker.active_count(), 0);

        let guard1 = tracker.track();
        let guard2 = tracker.track();
        assert_eq!(tracker.active_count(), 2);

        drop(guard1);
        assert_eq!(tracker.active_count(), 1);
        drop(guard2);
        assert_eq!(tracker.active_count(), 0);
    }

    #[tokio::test]
    async fn drain_returns_once_empty() {
        let tracker = ConnectionTracker::new();
        let guard = tracker.track();

        let waiter = tracker.clone();
        let handle = tokio::spawn(async move { waiter.drain(Duration::from_secs(5)).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(guard);

        assert!(handle.await.unwrap());
    }

    #[tokio::test]
    async fn drain_times_out_with_live_session() {
        let tracker = ConnectionTracker::new();
        let _guard = tracker.track();
        assert!(!tracker.drain(Duration::from_millis(200)).await);
    }
}
