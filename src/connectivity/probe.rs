use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use super::{ConnectivityMonitor, ConnectivitySubscription, ManualMonitor};

/// Connectivity inferred from periodic TCP connects to a well-known address.
///
/// The probe task runs until the monitor is dropped.
pub struct ProbeMonitor {
    state: Arc<ManualMonitor>,
    handle: JoinHandle<()>,
}

impl ProbeMonitor {
    /// Start probing `addr` every `interval`, each attempt bounded by `timeout`.
    ///
    /// The state starts as `initial` and is first corrected by the probe that
    /// runs immediately after spawning.
    pub fn spawn(addr: String, interval: Duration, timeout: Duration, initial: bool) -> Self {
        let state = Arc::new(ManualMonitor::new(initial));
        let task_state = Arc::clone(&state);

        tracing::info!(addr = %addr, interval_ms = interval.as_millis() as u64, "Starting connectivity probe");

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let reachable = probe_once(&addr, timeout).await;
                tracing::trace!(addr = %addr, reachable, "Connectivity probe");
                task_state.set_connected(reachable);
            }
        });

        Self { state, handle }
    }
}

/// One reachability attempt.
pub async fn probe_once(addr: &str, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, TcpStream::connect(addr)).await,
        Ok(Ok(_))
    )
}

impl ConnectivityMonitor for ProbeMonitor {
    fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    fn subscribe(&self) -> ConnectivitySubscription {
        self.state.subscribe()
    }
}

impl Drop for ProbeMonitor {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("Aborted connectivity probe task on drop");
    }
}
