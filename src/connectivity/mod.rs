//! Network reachability reporting.
//!
//! A [`ConnectivityMonitor`] announces every connected/disconnected transition
//! on a broadcast channel. Consumers hold a [`ConnectivitySubscription`]; the
//! subscription is released when the guard is dropped, on every exit path.
//!
//! - [`ManualMonitor`] - state set by the application (keyboard toggle, tests)
//! - [`ProbeMonitor`] - periodic TCP reachability probe feeding a `ManualMonitor`

mod manual;
mod probe;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

pub use manual::ManualMonitor;
pub use probe::{probe_once, ProbeMonitor};

/// Buffered transitions per subscriber before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 16;

/// A connectivity transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityChange {
    pub connected: bool,
}

/// Source of connectivity transitions.
pub trait ConnectivityMonitor: Send + Sync {
    /// Current state, for seeding consumers at startup.
    fn is_connected(&self) -> bool;

    /// Start receiving transitions. Dropping the returned guard unsubscribes.
    fn subscribe(&self) -> ConnectivitySubscription;
}

/// Subscription guard for connectivity transitions.
pub struct ConnectivitySubscription {
    rx: broadcast::Receiver<ConnectivityChange>,
}

impl ConnectivitySubscription {
    pub(crate) fn new(rx: broadcast::Receiver<ConnectivityChange>) -> Self {
        tracing::debug!("Connectivity subscription acquired");
        Self { rx }
    }

    /// Wait for the next transition.
    ///
    /// Returns `None` once the monitor has been dropped. If the subscriber fell
    /// behind, the skipped transitions are logged and the oldest retained one
    /// is returned.
    pub async fn recv(&mut self) -> Option<ConnectivityChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Connectivity subscriber lagged, transitions dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take a pending transition without waiting.
    pub fn try_recv(&mut self) -> Option<ConnectivityChange> {
        loop {
            match self.rx.try_recv() {
                Ok(change) => return Some(change),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Connectivity subscriber lagged, transitions dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for ConnectivitySubscription {
    fn drop(&mut self) {
        tracing::debug!("Connectivity subscription released");
    }
}
