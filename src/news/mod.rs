//! News domain: articles, category filtering and the content source seam.
//!
//! - [`types`] - `Article`, `Category` and `CategoryFilter`
//! - [`filter`] - Pure category filter over an article list
//! - [`source`] - `ContentSource` trait and the fixture-backed implementation

mod filter;
mod source;
mod types;

pub use filter::filter_by_category;
pub use source::{builtin_articles, ContentSource, FetchError, FixtureSource};
pub use types::{Article, Category, CategoryFilter};
