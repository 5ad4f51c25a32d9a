use crate::connectivity::ManualMonitor;
use crate::news::{Article, CategoryFilter};
use crate::sync::{Advisory, LoadOutcome, SyncCache, SyncView};
use std::borrow::Cow;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Seconds a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Views and Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Article list with header and optional category bar.
    List,
    /// Single article, scrollable.
    Detail,
}

/// Which sync operation a background task ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncKind {
    Load,
    Refresh,
}

/// Events from background tasks
pub enum AppEvent {
    /// A spawned `load()` or `refresh()` finished.
    ///
    /// Errors carry only their text: the matching advisory has already been
    /// raised by the sync cache.
    SyncFinished {
        kind: SyncKind,
        result: Result<LoadOutcome, String>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

/// Status-bar text for an advisory. Wording follows the reader's alert texts.
pub fn advisory_message(advisory: &Advisory) -> Cow<'static, str> {
    match advisory {
        Advisory::CameOnline => Cow::Borrowed(
            "Back Online: Connection restored. Press r to refresh for latest news.",
        ),
        Advisory::WentOffline => Cow::Borrowed("Offline Mode: Showing cached articles."),
        Advisory::NoCacheAvailable => Cow::Borrowed(
            "No Cache: No cached data available. Please connect to internet.",
        ),
        Advisory::RefreshRejectedOffline => Cow::Borrowed(
            "Offline: Cannot refresh while offline. Please check your connection.",
        ),
        Advisory::LoadFailed(error) => {
            tracing::debug!(error = %error, "Load failure shown to user");
            Cow::Borrowed("Error: Failed to load news. Please try again.")
        }
        Advisory::PersistFailed(error) => {
            Cow::Owned(format!("Warning: News updated but not saved for offline use ({error})"))
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Presenter state for the terminal UI.
///
/// Everything about the news itself is owned by [`SyncCache`]; `App` keeps a
/// copy of its last [`SyncView`] for rendering plus the purely visual state
/// (selection, scroll, open article, status line).
pub struct App {
    pub sync: Arc<SyncCache>,
    /// Present when connectivity is toggled by hand.
    pub manual_monitor: Option<Arc<ManualMonitor>>,

    /// Last rendered copy of the sync state.
    pub snapshot: SyncView,
    /// `SyncCache::version()` at the time `snapshot` was taken.
    pub snapshot_version: u64,

    // UI State
    pub view: View,
    pub selected: usize,
    pub show_filter_bar: bool,
    /// Article open in the detail view. Owned so a refresh cannot swap it out.
    pub detail: Option<Article>,
    pub scroll_offset: usize,
    pub detail_visible_lines: usize,
    pub spinner_frame: usize,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,

    /// In-flight load/refresh task, aborted on drop.
    pub sync_handle: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(sync: Arc<SyncCache>, manual_monitor: Option<Arc<ManualMonitor>>) -> Self {
        let snapshot = sync.view();
        let snapshot_version = sync.version();
        Self {
            sync,
            manual_monitor,
            snapshot,
            snapshot_version,
            view: View::List,
            selected: 0,
            show_filter_bar: false,
            detail: None,
            scroll_offset: 0,
            detail_visible_lines: 0,
            spinner_frame: 0,
            status_message: None,
            needs_redraw: true,
            sync_handle: None,
        }
    }

    /// Re-read the sync state if it changed. Returns true if it did.
    pub fn pull_sync_state(&mut self) -> bool {
        let version = self.sync.version();
        if version == self.snapshot_version {
            return false;
        }
        self.snapshot = self.sync.view();
        self.snapshot_version = version;
        self.clamp_selection();
        true
    }

    pub fn clamp_selection(&mut self) {
        let len = self.snapshot.articles.len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.snapshot.articles.get(self.selected)
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        if self.selected + 1 < self.snapshot.articles.len() {
            self.selected += 1;
        }
    }

    // ------------------------------------------------------------------------
    // Category filter
    // ------------------------------------------------------------------------

    pub fn toggle_filter_bar(&mut self) {
        self.show_filter_bar = !self.show_filter_bar;
    }

    /// Select the next (or previous) category and jump back to the top of the list.
    pub fn cycle_filter(&mut self, forward: bool) {
        let current = self.sync.filter();
        let next = if forward { current.next() } else { current.prev() };
        self.apply_filter(next);
    }

    pub fn apply_filter(&mut self, filter: CategoryFilter) {
        tracing::debug!(filter = %filter.label(), "Category filter selected");
        self.sync.set_filter(filter);
        self.selected = 0;
        self.pull_sync_state();
    }

    // ------------------------------------------------------------------------
    // Detail view
    // ------------------------------------------------------------------------

    /// Open the selected article. Returns false when the list is empty.
    pub fn open_detail(&mut self) -> bool {
        let Some(article) = self.selected_article().cloned() else {
            return false;
        };
        self.detail = Some(article);
        self.scroll_offset = 0;
        self.view = View::Detail;
        true
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.scroll_offset = 0;
        self.view = View::List;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Keep the scroll offset within `content_lines - visible_lines`.
    pub fn clamp_scroll(&mut self, content_lines: usize, visible_lines: usize) {
        let max = content_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(max);
    }

    // ------------------------------------------------------------------------
    // Connectivity
    // ------------------------------------------------------------------------

    /// Flip the manual connectivity state. Returns the new state, or `None`
    /// when connectivity is probed and cannot be overridden.
    pub fn toggle_connectivity(&mut self) -> Option<bool> {
        let monitor = self.manual_monitor.as_ref()?;
        let connected = monitor.toggle();
        tracing::info!(connected, "Connectivity toggled by user");
        Some(connected)
    }

    // ------------------------------------------------------------------------
    // Status line
    // ------------------------------------------------------------------------

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    pub fn show_advisory(&mut self, advisory: &Advisory) {
        self.set_status(advisory_message(advisory));
    }
}

/// Abort the in-flight sync task so it does not outlive the UI.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.sync_handle.take() {
            handle.abort();
            tracing::debug!("Aborted sync task on App drop");
        }
    }
}
