use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// How many leading characters of the review body participate in the
/// duplicate-detection key.
const DEDUP_CONTENT_PREFIX: usize = 20;

/// One product review as rendered on the store page.
///
/// Every field is total: a sub-element missing from the markup yields an
/// empty string (or zero for `image_count`), never an absent field, so
/// consumers can index any column of any record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub nickname: String,
    /// Raw date text as displayed; deliberately not parsed.
    pub date: String,
    /// Raw symbolic rating text ("5", "4", ...); kept as text because the
    /// rendered value is not guaranteed to be purely numeric.
    pub rating: String,
    /// First line of the purchase-option box only.
    pub option: String,
    /// Buyer metadata and the system-assigned tag joined by " | ",
    /// with empty sides omitted.
    pub auto_label: String,
    pub content: String,
    pub image_count: u32,
}

impl Review {
    /// Composite identity used to suppress re-rendered duplicates across
    /// page transitions: `nickname|date|<first 20 chars of content>`.
    ///
    /// The prefix is counted in characters, not bytes; review bodies are
    /// mostly Hangul.
    pub fn dedup_key(&self) -> String {
        let prefix: String = self.content.chars().take(DEDUP_CONTENT_PREFIX).collect();
        format!("{}|{}|{}", self.nickname, self.date, prefix)
    }
}

/// Insertion-ordered set of reviews, deduplicated by [`Review::dedup_key`].
///
/// Owned by the pagination engine for the lifetime of one run; the first
/// occurrence of a key wins and later duplicates are dropped silently.
#[derive(Debug, Default)]
pub struct ReviewAccumulator {
    seen: HashSet<String>,
    reviews: Vec<Review>,
}

impl ReviewAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one review; returns `true` if it was new.
    pub fn merge(&mut self, review: Review) -> bool {
        if self.seen.insert(review.dedup_key()) {
            self.reviews.push(review);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn into_reviews(self) -> Vec<Review> {
        self.reviews
    }
}

/// Final result of a run: the deduplicated, insertion-ordered review list
/// plus its count, in the shape the JSON output exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    pub count: usize,
    pub reviews: Vec<Review>,
}

impl ScrapeReport {
    pub fn new(reviews: Vec<Review>) -> Self {
        Self {
            count: reviews.len(),
            reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(nickname: &str, date: &str, content: &str) -> Review {
        Review {
            nickname: nickname.to_string(),
            date: date.to_string(),
            rating: "5".to_string(),
            option: String::new(),
            auto_label: String::new(),
            content: content.to_string(),
            image_count: 0,
        }
    }

    #[test]
    fn dedup_key_truncates_content_by_characters() {
        let long = "아".repeat(40);
        let r = review("구매자", "25.07.01.", &long);
        let key = r.dedup_key();
        assert_eq!(key, format!("구매자|25.07.01.|{}", "아".repeat(20)));
    }

    #[test]
    fn accumulator_keeps_first_occurrence() {
        let mut acc = ReviewAccumulator::new();
        let mut first = review("a", "d", "same body");
        first.rating = "5".to_string();
        let mut dupe = review("a", "d", "same body");
        dupe.rating = "1".to_string();

        assert!(acc.merge(first.clone()));
        assert!(!acc.merge(dupe));

        let reviews = acc.into_reviews();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].rating, "5");
    }

    #[test]
    fn accumulator_is_idempotent_over_repeated_pages() {
        let page: Vec<Review> = (0..5)
            .map(|i| review(&format!("user{i}"), "25.07.01.", &format!("body {i}")))
            .collect();

        let mut acc = ReviewAccumulator::new();
        for r in page.clone() {
            acc.merge(r);
        }
        let after_first = acc.len();
        for r in page {
            acc.merge(r);
        }
        assert_eq!(acc.len(), after_first);
    }

    #[test]
    fn records_distinct_in_first_twenty_chars_are_kept() {
        let mut acc = ReviewAccumulator::new();
        assert!(acc.merge(review("a", "d", "12345678901234567890 tail one")));
        // Same 20-char prefix: treated as the same review.
        assert!(!acc.merge(review("a", "d", "12345678901234567890 tail two")));
        // Differs within the prefix: kept.
        assert!(acc.merge(review("a", "d", "X2345678901234567890 tail one")));
        assert_eq!(acc.len(), 2);
    }
}
