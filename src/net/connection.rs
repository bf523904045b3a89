//! Connection identity and in-flight accounting.
//!
//! # Responsibilities
//! - Assign each accepted connection an id that every log event for that
//!   connection carries
//! - Count workers from accept to close so shutdown can wait them out
//!
//! # Design Decisions
//! - Ids are per-tracker, starting at 1, so one server run reads as an
//!   unbroken sequence in the logs
//! - Accounting is a guard held by the worker; the count can never leak
//!   because the decrement rides on `Drop`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::time::{sleep, Duration};

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Identifier for one accepted connection, unique within its tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out connection ids and counts workers still in flight.
///
/// Clones share the same sequence and the same count, so the accept loop
/// and the drain call can live on different handles.
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    next_id: Arc<AtomicU64>,
    in_flight: Arc<AtomicU64>,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(AtomicU64::new(1)),
            in_flight: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register one accepted connection.
    ///
    /// The returned guard keeps the connection counted until the worker
    /// drops it.
    pub fn track(&self) -> ConnectionGuard {
        // Relaxed is enough for the id: only uniqueness matters. The
        // in-flight count synchronizes with the drain loop.
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            id,
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Number of workers currently holding a guard.
    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait until every tracked worker has finished.
    pub async fn drain(&self) {
        loop {
            let remaining = self.in_flight();
            if remaining == 0 {
                return;
            }
            tracing::debug!(remaining, "Waiting for in-flight workers");
            sleep(DRAIN_POLL_INTERVAL).await;
        }
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Held by a worker for the lifetime of its connection.
#[derive(Debug)]
pub struct ConnectionGuard {
    id: ConnectionId,
    in_flight: Arc<AtomicU64>,
}

impl ConnectionGuard {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        tracing::trace!(connection_id = %self.id, "Connection closed");
    }
}
