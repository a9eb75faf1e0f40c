//! Normalized media records shared by every stage of the analysis

mod score;

pub use score::{score, UNRATED_DEFAULT};

use serde::{Deserialize, Serialize};

/// Kind of content an item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Series,
    Movie,
}

impl ContentType {
    /// Human-readable label used in tables
    pub fn label(self) -> &'static str {
        match self {
            Self::Series => "Series",
            Self::Movie => "Movie",
        }
    }
}

/// One series or movie as reported by its source, normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Identifier, unique within its source
    pub id: i64,
    pub title: String,
    pub content_type: ContentType,
    /// Release year, when the source knows it
    #[serde(default)]
    pub year: Option<u32>,
    /// Rating on a 0-10 scale; `None` when unrated
    #[serde(default)]
    pub rating: Option<f64>,
    /// Bytes stored on disk; 0 means nothing is downloaded
    pub size_on_disk: u64,
}

impl MediaItem {
    /// Whether any file for this item is stored on disk
    pub fn is_downloaded(&self) -> bool {
        self.size_on_disk > 0
    }
}

/// A media item together with its freshly computed waste score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: MediaItem,
    pub waste_score: f64,
}

impl ScoredItem {
    /// Score an item with the current formula
    pub fn new(item: MediaItem) -> Self {
        let waste_score = score(&item);
        Self { item, waste_score }
    }
}

impl From<MediaItem> for ScoredItem {
    fn from(item: MediaItem) -> Self {
        Self::new(item)
    }
}
