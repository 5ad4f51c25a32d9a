//! Input handling for the TUI.
//!
//! Keys are dispatched by the current view. Keys shared by both views
//! (quit, refresh, connectivity toggle) are handled first.

use crate::app::{App, AppEvent, SyncKind, View};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::spawn_sync;
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) => return Action::Quit,
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => return Action::Quit,
        (KeyCode::Char('r'), _) => {
            request_refresh(app, event_tx);
            return Action::Continue;
        }
        (KeyCode::Char('o'), _) => {
            toggle_connectivity(app);
            return Action::Continue;
        }
        _ => {}
    }

    match app.view {
        View::List => handle_list_input(app, code),
        View::Detail => handle_detail_input(app, code, modifiers),
    }
    Action::Continue
}

/// Handle input in the article list.
fn handle_list_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Enter => {
            if !app.open_detail() {
                app.set_status("No article selected");
            }
        }
        KeyCode::Char('c') | KeyCode::Char('f') => app.toggle_filter_bar(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => {
            app.show_filter_bar = true;
            app.cycle_filter(true);
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => {
            app.show_filter_bar = true;
            app.cycle_filter(false);
        }
        KeyCode::Esc if app.show_filter_bar => app.show_filter_bar = false,
        _ => {}
    }
}

/// Handle input in the detail view.
fn handle_detail_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    let page = app.detail_visible_lines.max(1);
    match code {
        KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace => app.close_detail(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => app.scroll_down(page / 2),
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => app.scroll_up(page / 2),
        KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_down(page),
        KeyCode::PageUp => app.scroll_up(page),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_offset = 0,
        _ => {}
    }
}

/// Start a user refresh in the background.
///
/// The offline check lives in the sync cache, which answers with an
/// advisory; the key press only starts the task. While another sync task
/// runs, an offline refresh is still handed to the cache so it is rejected
/// with that advisory rather than reported as busy.
fn request_refresh(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if spawn_sync(app, SyncKind::Refresh, event_tx) {
        return;
    }
    if app.sync.is_online() {
        app.set_status("Already loading...");
        return;
    }

    let sync = app.sync.clone();
    tokio::spawn(async move {
        if let Err(e) = sync.refresh().await {
            tracing::debug!(error = %e, "Refresh rejected during running sync");
        }
    });
}

fn toggle_connectivity(app: &mut App) {
    if app.toggle_connectivity().is_none() {
        app.set_status("Connectivity is detected automatically (start with --offline to toggle)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::{ConnectivityMonitor, ManualMonitor};
    use crate::news::{Category, CategoryFilter, FixtureSource};
    use crate::storage::MemoryStore;
    use crate::sync::{Advisory, SyncCache};
    use std::sync::Arc;
    use std::time::Duration;

    async fn test_app() -> App {
        let source = Arc::new(FixtureSource::builtin(Duration::ZERO));
        let (sync, _advisories) = SyncCache::new(source, Arc::new(MemoryStore::new()), true);
        let sync = Arc::new(sync);
        sync.load().await.unwrap();
        App::new(sync, Some(Arc::new(ManualMonitor::new(true))))
    }

    fn press(app: &mut App, code: KeyCode) -> Action {
        let (tx, _rx) = mpsc::channel(4);
        handle_input(app, code, KeyModifiers::NONE, &tx)
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = test_app().await;
        assert!(matches!(press(&mut app, KeyCode::Char('q')), Action::Quit));
        let (tx, _rx) = mpsc::channel(4);
        assert!(matches!(
            handle_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &tx),
            Action::Quit
        ));
    }

    #[tokio::test]
    async fn test_open_and_leave_detail() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view, View::Detail);

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.scroll_offset, 1);

        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.view, View::List);
        assert_eq!(app.selected, 1);
    }

    #[tokio::test]
    async fn test_filter_keys() {
        let mut app = test_app().await;
        press(&mut app, KeyCode::Char('c'));
        assert!(app.show_filter_bar);

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.snapshot.filter, CategoryFilter::Only(Category::World));

        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.snapshot.filter, CategoryFilter::Only(Category::Technology));

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_filter_bar);
        assert_eq!(app.snapshot.filter, CategoryFilter::Only(Category::Technology));
    }

    #[tokio::test]
    async fn test_toggle_connectivity_key() {
        let mut app = test_app().await;
        let monitor = app.manual_monitor.clone().unwrap();
        press(&mut app, KeyCode::Char('o'));
        assert!(!monitor.is_connected());
    }

    #[tokio::test]
    async fn test_toggle_without_manual_monitor_sets_status() {
        let mut app = test_app().await;
        app.manual_monitor = None;
        press(&mut app, KeyCode::Char('o'));
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_refresh_offline_during_load_is_rejected_with_advisory() {
        let source = Arc::new(FixtureSource::builtin(Duration::from_secs(60)));
        let (sync, mut advisories) =
            SyncCache::new(source, Arc::new(MemoryStore::new()), true);
        let mut app = App::new(Arc::new(sync), None);
        let (tx, _rx) = mpsc::channel(4);

        assert!(spawn_sync(&mut app, SyncKind::Load, &tx));
        while !app.sync.is_loading() {
            tokio::task::yield_now().await;
        }
        app.sync.on_connectivity_change(false);

        handle_input(&mut app, KeyCode::Char('r'), KeyModifiers::NONE, &tx);

        let advisory = tokio::time::timeout(Duration::from_secs(5), advisories.recv())
            .await
            .unwrap();
        assert_eq!(advisory, Some(Advisory::RefreshRejectedOffline));
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_refresh_online_during_load_reports_busy() {
        let source = Arc::new(FixtureSource::builtin(Duration::from_secs(60)));
        let (sync, _advisories) = SyncCache::new(source, Arc::new(MemoryStore::new()), true);
        let mut app = App::new(Arc::new(sync), None);
        let (tx, _rx) = mpsc::channel(4);

        assert!(spawn_sync(&mut app, SyncKind::Load, &tx));
        handle_input(&mut app, KeyCode::Char('r'), KeyModifiers::NONE, &tx);

        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Already loading...");
    }
}
