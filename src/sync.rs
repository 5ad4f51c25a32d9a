//! Offline-aware article synchronization.
//!
//! [`SyncCache`] owns the article list shown to the reader together with the
//! online flag, the last-update marker, the loading flag and the selected
//! category. On `load()`/`refresh()` it either fetches from the
//! [`ContentSource`] and rewrites the persisted snapshot, or (offline) adopts
//! the last persisted snapshot. Connectivity transitions only flip the online
//! flag and raise an [`Advisory`]; fetching again is always an explicit call.
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`, so the cache can be shared as `Arc<SyncCache>` between the UI
//! loop, background refresh tasks and the connectivity listener.

use chrono::{DateTime, SubsecRound, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::connectivity::ConnectivityMonitor;
use crate::news::{filter_by_category, Article, CategoryFilter, ContentSource, FetchError};
use crate::storage::{read_snapshot, write_snapshot, PersistentStore, StoreError};

/// Capacity of the advisory channel. Advisories beyond this are dropped with a warning.
const ADVISORY_CAPACITY: usize = 32;

// ============================================================================
// Errors, Outcomes and Advisories
// ============================================================================

/// Why a `load()` or `refresh()` did not produce a fresh, durable article list.
///
/// None of these are fatal: every path leaves the previous valid state in place
/// (or, for `PersistFailed`, the new in-memory state) and returns control to the caller.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The content source failed or timed out; previous state kept
    #[error("Failed to load news: {0}")]
    FetchFailed(#[from] FetchError),

    /// Offline with nothing cached
    #[error("No cached data available")]
    NoCachedData,

    /// Refresh requested while offline
    #[error("Cannot refresh while offline")]
    RefreshWhileOffline,

    /// Fetched articles are shown but could not be written to the store
    #[error("Fetched articles could not be cached: {0}")]
    PersistFailed(StoreError),

    /// Offline and the store could not be read
    #[error("Failed to read cached news: {0}")]
    CacheReadFailed(StoreError),
}

/// Successful result of a `load()` or `refresh()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fresh articles fetched and persisted
    Fetched { count: usize },
    /// Articles adopted from the persisted snapshot
    Restored { count: usize },
    /// Another load or refresh was already in flight; nothing was done
    AlreadyLoading,
}

/// Notifications for the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// Connectivity restored. Content is not refreshed automatically.
    CameOnline,
    /// Connectivity lost. Content is now served from the cache.
    WentOffline,
    /// Offline load found no cached articles.
    NoCacheAvailable,
    /// A refresh was requested while offline.
    RefreshRejectedOffline,
    /// A load or refresh failed; carries the error text.
    LoadFailed(String),
    /// Fresh articles are shown but were not persisted; carries the error text.
    PersistFailed(String),
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug)]
struct SyncState {
    /// Arc so readers can snapshot the list without copying it.
    articles: Arc<Vec<Article>>,
    online: bool,
    last_update: Option<DateTime<Utc>>,
    loading: bool,
    refreshing: bool,
    filter: CategoryFilter,
    /// Bumped on every observable change, for cheap change detection.
    version: u64,
}

impl SyncState {
    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// Point-in-time copy of everything the presenter renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncView {
    /// Articles after the category filter, in original order.
    pub articles: Vec<Article>,
    /// Size of the unfiltered list.
    pub total: usize,
    pub online: bool,
    pub last_update: Option<DateTime<Utc>>,
    pub loading: bool,
    pub refreshing: bool,
    pub filter: CategoryFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
    Startup,
    Refresh,
}

enum Begin<'a> {
    Started { guard: LoadingGuard<'a>, online: bool },
    Busy,
    Offline,
}

/// Clears `loading`/`refreshing` when the operation ends, however it ends
/// (including the future being dropped mid-fetch).
struct LoadingGuard<'a> {
    cache: &'a SyncCache,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.cache.lock();
        state.loading = false;
        state.refreshing = false;
        state.touch();
    }
}

// ============================================================================
// SyncCache
// ============================================================================

/// Owner of the article list and its cache synchronization.
pub struct SyncCache {
    source: Arc<dyn ContentSource>,
    store: Arc<dyn PersistentStore>,
    fetch_timeout: Option<Duration>,
    state: Mutex<SyncState>,
    advisories: mpsc::Sender<Advisory>,
}

impl SyncCache {
    /// Create a cache with an empty article list.
    ///
    /// `online` seeds the connectivity flag (normally the monitor's current
    /// state). Returns the receiving half of the advisory channel.
    pub fn new(
        source: Arc<dyn ContentSource>,
        store: Arc<dyn PersistentStore>,
        online: bool,
    ) -> (Self, mpsc::Receiver<Advisory>) {
        let (tx, rx) = mpsc::channel(ADVISORY_CAPACITY);
        let cache = Self {
            source,
            store,
            fetch_timeout: None,
            state: Mutex::new(SyncState {
                articles: Arc::new(Vec::new()),
                online,
                last_update: None,
                loading: false,
                refreshing: false,
                filter: CategoryFilter::All,
                version: 0,
            }),
            advisories: tx,
        };
        (cache, rx)
    }

    /// Bound every fetch by `timeout`. A zero duration disables the bound.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        // State is plain data; a panic elsewhere cannot leave it half-written.
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, advisory: Advisory) {
        tracing::debug!(?advisory, "Advisory");
        if let Err(e) = self.advisories.try_send(advisory) {
            tracing::warn!(error = %e, "Advisory dropped (channel full or receiver gone)");
        }
    }

    fn begin(&self, kind: LoadKind) -> Begin<'_> {
        let mut state = self.lock();
        if kind == LoadKind::Refresh && !state.online {
            return Begin::Offline;
        }
        if state.loading {
            return Begin::Busy;
        }
        state.loading = true;
        state.refreshing = kind == LoadKind::Refresh;
        state.touch();
        let online = state.online;
        drop(state);

        Begin::Started {
            guard: LoadingGuard { cache: self },
            online,
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Initial load: fetch when online, otherwise adopt the cached snapshot.
    ///
    /// The online flag is sampled once on entry, so exactly one branch runs
    /// even if connectivity changes mid-call. A call made while another load
    /// or refresh is in flight returns `LoadOutcome::AlreadyLoading`.
    pub async fn load(&self) -> Result<LoadOutcome, SyncError> {
        let (guard, online) = match self.begin(LoadKind::Startup) {
            Begin::Started { guard, online } => (guard, online),
            Begin::Busy | Begin::Offline => {
                tracing::debug!("Load skipped, another load is in flight");
                return Ok(LoadOutcome::AlreadyLoading);
            }
        };

        let result = if online {
            self.fetch_and_cache().await
        } else {
            self.restore_from_cache().await
        };
        drop(guard);
        result
    }

    /// User-initiated reload. Rejected while offline; a no-op while another
    /// load or refresh is in flight; otherwise identical to an online `load()`.
    pub async fn refresh(&self) -> Result<LoadOutcome, SyncError> {
        let guard = match self.begin(LoadKind::Refresh) {
            Begin::Started { guard, .. } => guard,
            Begin::Busy => {
                tracing::debug!("Refresh skipped, another load is in flight");
                return Ok(LoadOutcome::AlreadyLoading);
            }
            Begin::Offline => {
                tracing::info!("Refresh rejected while offline");
                self.emit(Advisory::RefreshRejectedOffline);
                return Err(SyncError::RefreshWhileOffline);
            }
        };

        let result = self.fetch_and_cache().await;
        drop(guard);
        result
    }

    async fn fetch(&self) -> Result<Vec<Article>, FetchError> {
        match self.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.source.fetch()).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(limit)),
            },
            None => self.source.fetch().await,
        }
    }

    async fn fetch_and_cache(&self) -> Result<LoadOutcome, SyncError> {
        let articles = match self.fetch().await {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!(error = %e, "Fetch failed, keeping current articles");
                self.emit(Advisory::LoadFailed(e.to_string()));
                return Err(SyncError::FetchFailed(e));
            }
        };

        // Millisecond precision, as persisted, so a later restore compares equal.
        let fetched_at = Utc::now().trunc_subsecs(3);
        let persisted = write_snapshot(self.store.as_ref(), &articles, fetched_at).await;

        // In-memory state is adopted even when the write failed.
        let count = articles.len();
        {
            let mut state = self.lock();
            state.articles = Arc::new(articles);
            state.last_update = Some(fetched_at);
            state.touch();
        }

        match persisted {
            Ok(()) => {
                tracing::info!(count, "Fetched and cached articles");
                Ok(LoadOutcome::Fetched { count })
            }
            Err(e) => {
                tracing::warn!(error = %e, count, "Fetched articles but failed to persist cache");
                self.emit(Advisory::PersistFailed(e.to_string()));
                Err(SyncError::PersistFailed(e))
            }
        }
    }

    async fn restore_from_cache(&self) -> Result<LoadOutcome, SyncError> {
        match read_snapshot(self.store.as_ref()).await {
            Ok(Some(snapshot)) => {
                let count = snapshot.articles.len();
                let mut state = self.lock();
                state.articles = Arc::new(snapshot.articles);
                state.last_update = snapshot.last_update;
                state.touch();
                drop(state);

                tracing::info!(count, "Restored articles from cache");
                Ok(LoadOutcome::Restored { count })
            }
            Ok(None) => {
                tracing::info!("Offline with no cached articles");
                self.emit(Advisory::NoCacheAvailable);
                Err(SyncError::NoCachedData)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read article cache");
                self.emit(Advisory::LoadFailed(e.to_string()));
                Err(SyncError::CacheReadFailed(e))
            }
        }
    }

    /// Record a connectivity transition.
    ///
    /// Only the online flag changes. Returns the advisory that was emitted:
    /// none if the state did not actually change or a load is in flight.
    pub fn on_connectivity_change(&self, connected: bool) -> Option<Advisory> {
        let advisory = {
            let mut state = self.lock();
            if state.online == connected {
                return None;
            }
            state.online = connected;
            state.touch();

            if state.loading {
                tracing::debug!(connected, "Connectivity changed during load, advisory suppressed");
                None
            } else if connected {
                Some(Advisory::CameOnline)
            } else {
                Some(Advisory::WentOffline)
            }
        };

        if let Some(advisory) = &advisory {
            self.emit(advisory.clone());
        }
        advisory
    }

    /// Subscribe to `monitor`, adopt its current state, and apply its
    /// transitions until the returned listener is dropped.
    pub fn listen(self: &Arc<Self>, monitor: &dyn ConnectivityMonitor) -> ConnectivityListener {
        let mut subscription = monitor.subscribe();
        let cache = Arc::clone(self);

        // A transition broadcast before the subscription existed was missed;
        // catch up with the monitor's current state.
        self.on_connectivity_change(monitor.is_connected());

        let handle = tokio::spawn(async move {
            while let Some(change) = subscription.recv().await {
                cache.on_connectivity_change(change.connected);
            }
            tracing::debug!("Connectivity monitor closed");
        });

        ConnectivityListener { handle }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn set_filter(&self, filter: CategoryFilter) {
        let mut state = self.lock();
        if state.filter != filter {
            state.filter = filter;
            state.touch();
        }
    }

    pub fn filter(&self) -> CategoryFilter {
        self.lock().filter.clone()
    }

    /// Full unfiltered article list.
    pub fn articles(&self) -> Arc<Vec<Article>> {
        Arc::clone(&self.lock().articles)
    }

    /// Articles matching the selected category, in original order.
    pub fn visible_articles(&self) -> Vec<Article> {
        let state = self.lock();
        filter_by_category(&state.articles, &state.filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn is_online(&self) -> bool {
        self.lock().online
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.lock().last_update
    }

    /// Change counter; differs whenever anything in [`SyncView`] may have changed.
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    pub fn view(&self) -> SyncView {
        let state = self.lock();
        SyncView {
            articles: filter_by_category(&state.articles, &state.filter)
                .into_iter()
                .cloned()
                .collect(),
            total: state.articles.len(),
            online: state.online,
            last_update: state.last_update,
            loading: state.loading,
            refreshing: state.refreshing,
            filter: state.filter.clone(),
        }
    }
}

/// Background task applying connectivity transitions to a [`SyncCache`].
///
/// Dropping the listener stops the task, which releases the subscription.
pub struct ConnectivityListener {
    handle: JoinHandle<()>,
}

impl Drop for ConnectivityListener {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("Aborted connectivity listener on drop");
    }
}
