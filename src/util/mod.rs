//! Utility functions for text display and relative dates.
//!
//! # Modules
//!
//! - [`text`] - Unicode-aware width calculation, truncation, wrapping and sanitizing
//! - [`time`] - Coarse "3h ago" style labels

mod text;
mod time;

pub use text::{display_width, single_line, strip_control_chars, truncate_to_width, wrap_to_width};
pub use time::{format_relative, format_relative_now};
