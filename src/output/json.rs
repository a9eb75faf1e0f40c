use serde::Serialize;

use crate::error::Result;
use crate::media::ScoredItem;

/// Format ranked items as JSON
pub fn format_items(items: &[ScoredItem]) -> Result<String> {
    format_json(&items)
}

/// Format any serializable value as JSON
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{ContentType, MediaItem};

    #[test]
    fn test_format_items_flattens_item_fields() {
        let items = vec![ScoredItem {
            item: MediaItem {
                id: 3,
                title: "Cats".to_string(),
                content_type: ContentType::Movie,
                year: Some(2019),
                rating: None,
                size_on_disk: 1024,
            },
            waste_score: 12.5,
        }];

        let json = format_items(&items).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed[0]["title"], "Cats");
        assert_eq!(parsed[0]["content_type"], "movie");
        assert_eq!(parsed[0]["size_on_disk"], 1024);
        assert!(parsed[0]["rating"].is_null());
        assert_eq!(parsed[0]["waste_score"], 12.5);
    }

    #[test]
    fn test_format_items_empty() {
        assert_eq!(format_items(&[]).unwrap(), "[]");
    }
}
