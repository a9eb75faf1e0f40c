//! Waste scoring
//!
//! A score is `size points × size weight × rating factor`:
//!
//! - Size points grow linearly up to 1 GiB (10 points) and logarithmically
//!   beyond it (+30 points per decade), so a 10 GiB item gets 40 points and a
//!   100 GiB item 70.
//! - The rating factor is a falling logistic curve between a floor (excellent
//!   content) and a ceiling (poor content), centred on the rating where
//!   content stops being "worth" its size.
//!
//! Series get a 40% size discount and a more forgiving rating curve, since
//! multi-season content is expected to be large. Scores of both types share one
//! scale and can be ranked together.

use super::{ContentType, MediaItem};

/// Rating assumed for unrated items: a neutral, middle-of-the-road 6.0
pub const UNRATED_DEFAULT: f64 = 6.0;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Per-content-type reference scales
struct Profile {
    size_weight: f64,
    floor: f64,
    ceiling: f64,
    midpoint: f64,
    spread: f64,
}

const SERIES: Profile = Profile {
    size_weight: 0.6,
    floor: 0.02,
    ceiling: 1.2,
    midpoint: 6.4,
    spread: 0.6,
};

const MOVIE: Profile = Profile {
    size_weight: 1.0,
    floor: 0.05,
    ceiling: 1.3,
    midpoint: 6.5,
    spread: 0.6,
};

impl Profile {
    fn for_type(content_type: ContentType) -> &'static Profile {
        match content_type {
            ContentType::Series => &SERIES,
            ContentType::Movie => &MOVIE,
        }
    }

    fn rating_factor(&self, rating: f64) -> f64 {
        let rating = rating.clamp(0.0, 10.0);
        let falloff = 1.0 + ((rating - self.midpoint) / self.spread).exp();
        self.floor + (self.ceiling - self.floor) / falloff
    }
}

fn size_points(size_bytes: u64) -> f64 {
    let gib = size_bytes as f64 / BYTES_PER_GIB;
    if gib <= 1.0 {
        gib * 10.0
    } else {
        10.0 + 30.0 * gib.log10()
    }
}

/// Compute the waste score of an item. Higher means more wasteful.
///
/// Always finite; items with nothing on disk score 0.
pub fn score(item: &MediaItem) -> f64 {
    let profile = Profile::for_type(item.content_type);
    let rating = item
        .rating
        .filter(|r| r.is_finite())
        .unwrap_or(UNRATED_DEFAULT);

    size_points(item.size_on_disk) * profile.size_weight * profile.rating_factor(rating)
}
