//! Helper functions for UI operations.
//!
//! Background sync tasks are spawned from here so that input handling and the
//! startup path share one code path.

use crate::app::{App, AppEvent, SyncKind};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// Instead of a spawned task silently disappearing (caught by Tokio's runtime
/// but not handled), panics are converted to `Err(String)` containing the
/// panic message so the UI can report them.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Run `load()` or `refresh()` in a background task.
///
/// Returns false without spawning when a sync task is still running. The
/// sync cache would reject the overlapping call anyway; skipping the spawn
/// keeps a single handle to abort on exit.
pub fn spawn_sync(app: &mut App, kind: SyncKind, event_tx: &mpsc::Sender<AppEvent>) -> bool {
    if app.sync_handle.as_ref().is_some_and(|h| !h.is_finished()) {
        tracing::debug!(?kind, "Sync task already running, not spawning another");
        return false;
    }

    let sync = app.sync.clone();
    let tx = event_tx.clone();
    tracing::debug!(?kind, "Spawning sync task");

    app.sync_handle = Some(tokio::spawn(async move {
        let task = match kind {
            SyncKind::Load => "load",
            SyncKind::Refresh => "refresh",
        };
        let outcome = catch_task_panic(async {
            match kind {
                SyncKind::Load => sync.load().await,
                SyncKind::Refresh => sync.refresh().await,
            }
        })
        .await;

        let event = match outcome {
            Ok(result) => AppEvent::SyncFinished {
                kind,
                result: result.map_err(|e| e.to_string()),
            },
            Err(error) => {
                tracing::error!(task, error = %error, "Sync task panicked");
                AppEvent::TaskPanicked { task, error }
            }
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send sync result (receiver dropped)");
        }
    }));
    true
}
