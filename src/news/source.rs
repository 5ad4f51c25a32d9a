use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::types::{Article, Category};

/// Maximum accepted size of an article fixture file (5 MB).
const MAX_FIXTURE_SIZE: u64 = 5 * 1024 * 1024;

/// Errors a content source can report while producing the article set.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetch did not complete within the configured timeout
    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),
    /// The source could not deliver content
    #[error("Transport error: {0}")]
    Transport(String),
    /// The source delivered content that is not a valid article list
    #[error("Invalid article data: {0}")]
    InvalidData(String),
}

/// Producer of the current article set.
///
/// Implementations may suspend on I/O. Timeouts are applied by the caller.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Article>, FetchError>;
}

// ============================================================================
// Fixture Source
// ============================================================================

/// Static article set served with a simulated network delay.
pub struct FixtureSource {
    articles: Vec<Article>,
    latency: Duration,
}

impl FixtureSource {
    pub fn new(articles: Vec<Article>, latency: Duration) -> Self {
        Self { articles, latency }
    }

    /// The built-in demo articles.
    pub fn builtin(latency: Duration) -> Self {
        Self::new(builtin_articles(), latency)
    }

    /// Load the article set from a JSON file holding an array of articles.
    pub fn from_file(path: &Path, latency: Duration) -> Result<Self, FetchError> {
        let meta = std::fs::metadata(path)
            .map_err(|e| FetchError::Transport(format!("{}: {e}", path.display())))?;
        if meta.len() > MAX_FIXTURE_SIZE {
            return Err(FetchError::InvalidData(format!(
                "fixture is {} bytes (max {MAX_FIXTURE_SIZE} bytes)",
                meta.len()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| FetchError::Transport(format!("{}: {e}", path.display())))?;
        let articles: Vec<Article> =
            serde_json::from_str(&content).map_err(|e| FetchError::InvalidData(e.to_string()))?;

        tracing::info!(path = %path.display(), count = articles.len(), "Loaded article fixture");
        Ok(Self::new(articles, latency))
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[async_trait]
impl ContentSource for FixtureSource {
    async fn fetch(&self) -> Result<Vec<Article>, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        tracing::debug!(count = self.articles.len(), "Fixture source served articles");
        Ok(self.articles.clone())
    }
}

fn published(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn builtin_article(
    id: &str,
    title: &str,
    category: Category,
    excerpt: &str,
    content: &str,
    author: &str,
    published_at: &str,
    source: &str,
) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        category,
        excerpt: excerpt.to_string(),
        content: content.to_string(),
        author: author.to_string(),
        published_at: published(published_at),
        source: source.to_string(),
    }
}

/// Demo articles shipped with the reader.
pub fn builtin_articles() -> Vec<Article> {
    vec![
        builtin_article(
            "1",
            "React Native 0.75 Released with New Architecture",
            Category::Technology,
            "The latest version brings significant performance improvements and new features.",
            "React Native 0.75 has been officially released, marking a major milestone in the framework's evolution. The new architecture provides better performance, improved developer experience, and enhanced compatibility with native modules.\n\nKey features include:\n• Faster startup times\n• Reduced memory footprint\n• Better debugging tools\n• Enhanced TypeScript support\n\nDevelopers can now build more efficient and responsive mobile applications with these improvements.",
            "Sarah Johnson",
            "2025-10-09T08:30:00Z",
            "Tech News Daily",
        ),
        builtin_article(
            "2",
            "AI Revolutionizes Mobile App Development",
            Category::Technology,
            "Artificial Intelligence tools are changing how developers build mobile applications.",
            "Artificial Intelligence is transforming the mobile development landscape. AI-powered tools now assist developers in code generation, bug detection, UI/UX design, and automated testing.\n\nMajor impacts include:\n• 40% faster development cycles\n• Improved code quality\n• Better user experience\n• Reduced maintenance costs\n\nCompanies investing in AI development tools are seeing significant productivity gains.",
            "Michael Chen",
            "2025-10-09T07:15:00Z",
            "Developer Weekly",
        ),
        builtin_article(
            "3",
            "Global Climate Summit Reaches Historic Agreement",
            Category::World,
            "World leaders commit to ambitious carbon reduction targets.",
            "In a landmark decision, the Global Climate Summit concluded with 195 countries agreeing to aggressive carbon emission reduction targets.\n\nThe agreement includes:\n• 50% emission cuts by 2035\n• Increased renewable energy investments\n• Protection of natural ecosystems\n• Technology transfer to developing nations\n\nEnvironmental experts call this a crucial step in combating climate change.",
            "Emma Williams",
            "2025-10-08T18:45:00Z",
            "World News Network",
        ),
        builtin_article(
            "4",
            "Stock Markets Hit Record Highs Amid Tech Rally",
            Category::Business,
            "Major indices surge as technology sector leads market gains.",
            "Global stock markets reached new record highs today, driven by strong performance in the technology sector.\n\nKey highlights:\n• S&P 500 up 2.3%\n• NASDAQ gains 3.1%\n• Tech giants report strong earnings\n• Investor confidence at 5-year high\n\nAnalysts attribute the rally to positive economic indicators and strong corporate earnings.",
            "David Park",
            "2025-10-08T16:20:00Z",
            "Financial Times",
        ),
        builtin_article(
            "5",
            "New Breakthrough in Cancer Research",
            Category::Health,
            "Scientists discover promising treatment for aggressive tumors.",
            "Researchers have announced a breakthrough in cancer treatment showing remarkable results in early trials.\n\nKey findings:\n• 85% success rate in trials\n• Minimal side effects\n• Targets multiple cancer types\n• Personalized treatment approach\n\nThe treatment combines immunotherapy with targeted drug delivery, offering hope to patients worldwide.",
            "Dr. Lisa Anderson",
            "2025-10-08T14:00:00Z",
            "Medical Journal",
        ),
        builtin_article(
            "6",
            "Champions League: Dramatic Comeback Victory",
            Category::Sports,
            "Team stages incredible second-half turnaround in European competition.",
            "In one of the most dramatic matches of the season, the home team staged an incredible comeback from 3-0 down at halftime to win 4-3.\n\nMatch highlights:\n• First half: 0-3 deficit\n• Second half: 4 goals in 35 minutes\n• Record-breaking attendance\n• Manager's tactical masterclass\n\nFans are calling it one of the greatest comebacks in European football history.",
            "James Rodriguez",
            "2025-10-07T22:30:00Z",
            "Sports Daily",
        ),
    ]
}
