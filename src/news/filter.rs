use super::types::{Article, CategoryFilter};

/// Select the articles matching a category filter.
///
/// Returns the matching articles in their original relative order.
/// `CategoryFilter::All` yields every article unchanged.
pub fn filter_by_category<'a>(articles: &'a [Article], filter: &CategoryFilter) -> Vec<&'a Article> {
    match filter {
        CategoryFilter::All => articles.iter().collect(),
        CategoryFilter::Only(category) => articles
            .iter()
            .filter(|article| article.category == *category)
            .collect(),
    }
}
