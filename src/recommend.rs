//! Age-based article recommendation.
//!
//! Each age range maps to a fixed set of topic keywords; candidate articles
//! are kept when any keyword appears in their title or description. Pure
//! functions, no I/O.

use std::collections::HashSet;

use crate::news::Article;

const MAX_RESULTS: usize = 20;

fn categories_for(age_range: &str) -> &'static [&'static str] {
    match age_range.trim() {
        "13-17" => &["sports", "entertainment"],
        "18-24" => &["technology", "business"],
        "25-34" => &["health", "world"],
        "35-50" => &["politics", "science"],
        "50+" => &["health", "science"],
        // Unrecognized ranges still get something readable.
        _ => &["health"],
    }
}

/// Filter, dedupe, and cap candidates for one age range. Input order is
/// preserved; duplicates keep their first occurrence.
pub fn recommend(age_range: &str, candidates: &[Article]) -> Vec<Article> {
    let categories = categories_for(age_range);
    let mut seen = HashSet::new();
    let mut picked = Vec::new();

    for article in candidates {
        let haystack = format!(
            "{} {}",
            article.title.as_deref().unwrap_or(""),
            article.description.as_deref().unwrap_or("")
        )
        .to_lowercase();
        if !categories.iter().any(|category| haystack.contains(category)) {
            continue;
        }

        // Dedupe by title, falling back to URL for untitled articles.
        let key = article
            .title
            .clone()
            .or_else(|| article.url.clone())
            .unwrap_or_default();
        if !seen.insert(key) {
            continue;
        }

        picked.push(article.clone());
        if picked.len() == MAX_RESULTS {
            break;
        }
    }

    picked
}
