use serde::Deserialize;
use tracing::info;

use super::{normalize_rating, normalize_year, ArrClient, MediaSource, SourceKind};
use crate::config::Config;
use crate::error::Result;
use crate::media::MediaItem;

/// Movie record as returned by `GET /api/v3/movie`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieResource {
    id: i64,
    title: String,
    year: Option<u32>,
    size_on_disk: Option<u64>,
    ratings: Option<MovieRatings>,
}

/// Radarr reports one rating per provider; TMDB's is the one used
#[derive(Debug, Deserialize)]
struct MovieRatings {
    tmdb: Option<ProviderRating>,
}

#[derive(Debug, Deserialize)]
struct ProviderRating {
    value: Option<f64>,
}

impl From<MovieResource> for MediaItem {
    fn from(movie: MovieResource) -> Self {
        MediaItem {
            id: movie.id,
            title: movie.title,
            content_type: SourceKind::Radarr.content_type(),
            year: normalize_year(movie.year),
            rating: normalize_rating(movie.ratings.and_then(|r| r.tmdb).and_then(|t| t.value)),
            size_on_disk: movie.size_on_disk.unwrap_or(0),
        }
    }
}

/// Radarr API client
pub struct RadarrClient {
    api: ArrClient,
}

impl RadarrClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            api: ArrClient::new(SourceKind::Radarr, config)?,
        })
    }
}

impl MediaSource for RadarrClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Radarr
    }

    fn fetch_collection(&self) -> Result<Vec<MediaItem>> {
        let movies: Vec<MovieResource> = self.api.get("/api/v3/movie")?;
        info!("Fetched {} movies from Radarr", movies.len());
        Ok(movies.into_iter().map(MediaItem::from).collect())
    }
}
