//! Filtering and ranking of scored items
//!
//! Every supplied predicate must pass. Survivors are ordered by waste score
//! (highest first), then by size (largest first), then by title, and only
//! then cut down to the requested top N.

use std::cmp::Ordering;

use crate::media::{MediaItem, ScoredItem};

/// User-selected filters
#[derive(Debug, Clone, PartialEq)]
pub struct Filters {
    /// Drop items with nothing on disk
    pub downloaded_only: bool,
    /// Keep items with at least this many bytes on disk
    pub min_size: Option<u64>,
    /// Keep items rated at or below this; unrated items always pass
    pub max_rating: Option<f64>,
    /// Keep items scoring at or above this
    pub min_waste_score: Option<f64>,
    /// Keep only the N highest-scoring items
    pub top: Option<usize>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            downloaded_only: true,
            min_size: None,
            max_rating: None,
            min_waste_score: None,
            top: None,
        }
    }
}

impl Filters {
    /// Whether a scored item passes every predicate
    pub fn matches(&self, scored: &ScoredItem) -> bool {
        let item = &scored.item;

        if self.downloaded_only && !item.is_downloaded() {
            return false;
        }
        if self.min_size.is_some_and(|min| item.size_on_disk < min) {
            return false;
        }
        if let (Some(max), Some(rating)) = (self.max_rating, item.rating) {
            if rating > max {
                return false;
            }
        }
        if self
            .min_waste_score
            .is_some_and(|min| scored.waste_score < min)
        {
            return false;
        }
        true
    }
}

/// Ranking order: score desc, size desc, title asc, then id for stability
pub fn compare(a: &ScoredItem, b: &ScoredItem) -> Ordering {
    b.waste_score
        .total_cmp(&a.waste_score)
        .then_with(|| b.item.size_on_disk.cmp(&a.item.size_on_disk))
        .then_with(|| a.item.title.cmp(&b.item.title))
        .then_with(|| a.item.id.cmp(&b.item.id))
}

/// Score, filter, order and truncate a collection
pub fn rank(items: Vec<MediaItem>, filters: &Filters) -> Vec<ScoredItem> {
    let mut ranked: Vec<ScoredItem> = items
        .into_iter()
        .map(ScoredItem::new)
        .filter(|scored| filters.matches(scored))
        .collect();

    ranked.sort_by(compare);

    if let Some(top) = filters.top {
        ranked.truncate(top);
    }

    ranked
}
