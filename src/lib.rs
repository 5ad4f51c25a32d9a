//! newsdesk: a terminal news reader that keeps working offline.
//!
//! The core is [`sync::SyncCache`], which decides on every load, refresh and
//! connectivity transition whether to fetch fresh articles or fall back to the
//! last persisted snapshot. Everything else is a collaborator behind a trait:
//! [`news::ContentSource`], [`storage::PersistentStore`] and
//! [`connectivity::ConnectivityMonitor`]. The terminal UI lives in [`app`] and
//! [`ui`].

pub mod app;
pub mod config;
pub mod connectivity;
pub mod news;
pub mod storage;
pub mod sync;
pub mod ui;
pub mod util;
