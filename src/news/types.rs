use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Category
// ============================================================================

/// Topic an article is filed under.
///
/// The five named variants are the categories offered in the filter bar.
/// Any other value coming from a content source is kept verbatim in `Other`
/// so a cached payload always round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Technology,
    World,
    Business,
    Health,
    Sports,
    Other(String),
}

impl Category {
    /// Categories in the order the filter bar presents them.
    pub const KNOWN: [Category; 5] = [
        Category::Technology,
        Category::World,
        Category::Business,
        Category::Health,
        Category::Sports,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Category::Technology => "Technology",
            Category::World => "World",
            Category::Business => "Business",
            Category::Health => "Health",
            Category::Sports => "Sports",
            Category::Other(name) => name,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Technology" => Category::Technology,
            "World" => Category::World,
            "Business" => Category::Business,
            "Health" => Category::Health,
            "Sports" => Category::Sports,
            _ => Category::Other(value),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Category::from(value.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Category Filter
// ============================================================================

/// Category selection applied to the article list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Sentinel: show every article.
    #[default]
    All,
    /// Show only articles filed under this category.
    Only(Category),
}

impl CategoryFilter {
    /// Cycle order used by the filter bar: `All` followed by the known categories.
    pub fn choices() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::KNOWN.iter().cloned().map(CategoryFilter::Only))
            .collect()
    }

    /// Next filter in the cycle, wrapping around.
    ///
    /// A filter on an unrecognized category is not part of the cycle and
    /// advances back to `All`.
    pub fn next(&self) -> CategoryFilter {
        let choices = Self::choices();
        match choices.iter().position(|c| c == self) {
            Some(idx) => choices[(idx + 1) % choices.len()].clone(),
            None => CategoryFilter::All,
        }
    }

    /// Previous filter in the cycle, wrapping around.
    pub fn prev(&self) -> CategoryFilter {
        let choices = Self::choices();
        match choices.iter().position(|c| c == self) {
            Some(idx) => choices[(idx + choices.len() - 1) % choices.len()].clone(),
            None => CategoryFilter::All,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

// ============================================================================
// Article
// ============================================================================

/// A news article as delivered by a content source and stored in the cache.
///
/// Field names serialize in camelCase so the cached payload keeps the shape
/// `{"id", "title", "category", "excerpt", "content", "author", "publishedAt", "source"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
}
