//! Background task event processing.

use crate::app::{App, AppEvent, SyncKind};
use crate::sync::LoadOutcome;

/// Apply the result of a background task to the presenter state.
///
/// Failures need no status text of their own: the sync cache raised the
/// matching advisory before returning the error.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::SyncFinished { kind, result } => {
            release_finished_handle(app);
            app.pull_sync_state();
            match result {
                Ok(LoadOutcome::Fetched { count }) => {
                    tracing::info!(?kind, count, "Sync finished");
                    if kind == SyncKind::Refresh {
                        app.set_status(format!("Refreshed {} articles", count));
                    }
                }
                Ok(LoadOutcome::Restored { count }) => {
                    tracing::info!(count, "Showing cached articles");
                    app.set_status(format!("Offline: showing {} cached articles", count));
                }
                Ok(LoadOutcome::AlreadyLoading) => {
                    tracing::debug!(?kind, "Sync skipped, another one was in flight");
                }
                Err(error) => {
                    tracing::warn!(?kind, error = %error, "Sync failed");
                }
            }
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            release_finished_handle(app);
            app.set_status(format!("Internal error in {}: {}", task, error));
        }
    }
}

/// Drop the sync handle only once its task is done.
///
/// Events may come from a task other than the tracked one, so a running
/// task's handle is kept for `App::drop` to abort.
fn release_finished_handle(app: &mut App) {
    if app.sync_handle.as_ref().is_some_and(|h| h.is_finished()) {
        app.sync_handle = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::FixtureSource;
    use crate::storage::MemoryStore;
    use crate::sync::SyncCache;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_app() -> App {
        let source = Arc::new(FixtureSource::builtin(Duration::ZERO));
        let (sync, _advisories) = SyncCache::new(source, Arc::new(MemoryStore::new()), true);
        App::new(Arc::new(sync), None)
    }

    #[tokio::test]
    async fn test_refresh_result_sets_status() {
        let mut app = test_app();
        app.sync.load().await.unwrap();
        handle_app_event(
            &mut app,
            AppEvent::SyncFinished {
                kind: SyncKind::Refresh,
                result: Ok(LoadOutcome::Fetched { count: 6 }),
            },
        );
        assert_eq!(app.snapshot.articles.len(), 6);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Refreshed 6 articles");
    }

    #[tokio::test]
    async fn test_initial_load_is_silent() {
        let mut app = test_app();
        handle_app_event(
            &mut app,
            AppEvent::SyncFinished {
                kind: SyncKind::Load,
                result: Ok(LoadOutcome::Fetched { count: 6 }),
            },
        );
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_panic_is_reported() {
        let mut app = test_app();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "refresh",
                error: "boom".to_string(),
            },
        );
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("boom"));
    }

    #[tokio::test]
    async fn test_event_keeps_running_task_handle() {
        let mut app = test_app();
        app.sync_handle = Some(tokio::spawn(std::future::pending::<()>()));
        handle_app_event(
            &mut app,
            AppEvent::SyncFinished {
                kind: SyncKind::Refresh,
                result: Ok(LoadOutcome::AlreadyLoading),
            },
        );
        assert!(app.sync_handle.is_some());
    }

    #[tokio::test]
    async fn test_event_releases_finished_task_handle() {
        let mut app = test_app();
        let handle = tokio::spawn(async {});
        while !handle.is_finished() {
            tokio::task::yield_now().await;
        }
        app.sync_handle = Some(handle);
        handle_app_event(
            &mut app,
            AppEvent::SyncFinished {
                kind: SyncKind::Load,
                result: Ok(LoadOutcome::Fetched { count: 6 }),
            },
        );
        assert!(app.sync_handle.is_none());
    }
}
