//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - View rendering dispatch and header
//! - `helpers` - Panic capture and sync task spawning
//! - `articles` - Article list widget
//! - `categories` - Category filter bar
//! - `reader` - Article detail widget
//! - `status` - Status bar widget

mod articles;
mod categories;
mod events;
mod helpers;
mod input;
mod loop_runner;
mod reader;
mod render;
mod status;

pub use helpers::spawn_sync;
pub use loop_runner::{run, Action};
