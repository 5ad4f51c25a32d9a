use std::sync::Mutex;
use tokio::sync::broadcast;

use super::{ConnectivityChange, ConnectivityMonitor, ConnectivitySubscription, CHANNEL_CAPACITY};

/// Connectivity state driven directly by the application.
///
/// Only real transitions are announced: setting the current state again is
/// silent.
pub struct ManualMonitor {
    connected: Mutex<bool>,
    tx: broadcast::Sender<ConnectivityChange>,
}

impl ManualMonitor {
    pub fn new(connected: bool) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            connected: Mutex::new(connected),
            tx,
        }
    }

    /// Update the state. Returns `true` if this was a transition.
    pub fn set_connected(&self, connected: bool) -> bool {
        // Hold the lock across the send so concurrent setters announce in state order.
        let mut current = match self.connected.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *current == connected {
            return false;
        }
        *current = connected;

        // No receivers is not an error: nobody is listening yet.
        let _ = self.tx.send(ConnectivityChange { connected });
        tracing::info!(connected, "Connectivity changed");
        true
    }

    /// Flip the state and return the new value.
    pub fn toggle(&self) -> bool {
        let next = !self.is_connected();
        self.set_connected(next);
        next
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl ConnectivityMonitor for ManualMonitor {
    fn is_connected(&self) -> bool {
        match self.connected.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn subscribe(&self) -> ConnectivitySubscription {
        ConnectivitySubscription::new(self.tx.subscribe())
    }
}
