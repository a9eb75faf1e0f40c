use serde::Deserialize;
use tracing::info;

use super::{normalize_rating, normalize_year, ArrClient, MediaSource, SourceKind};
use crate::config::Config;
use crate::error::Result;
use crate::media::MediaItem;

/// Series record as returned by `GET /api/v3/series`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesResource {
    id: i64,
    title: String,
    year: Option<u32>,
    statistics: Option<SeriesStatistics>,
    ratings: Option<SeriesRatings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesStatistics {
    #[serde(default)]
    size_on_disk: u64,
}

#[derive(Debug, Deserialize)]
struct SeriesRatings {
    value: Option<f64>,
}

impl From<SeriesResource> for MediaItem {
    fn from(series: SeriesResource) -> Self {
        MediaItem {
            id: series.id,
            title: series.title,
            content_type: SourceKind::Sonarr.content_type(),
            year: normalize_year(series.year),
            rating: normalize_rating(series.ratings.and_then(|r| r.value)),
            size_on_disk: series.statistics.map(|s| s.size_on_disk).unwrap_or(0),
        }
    }
}

/// Sonarr API client
pub struct SonarrClient {
    api: ArrClient,
}

impl SonarrClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            api: ArrClient::new(SourceKind::Sonarr, config)?,
        })
    }
}

impl MediaSource for SonarrClient {
    fn kind(&self) -> SourceKind {
        SourceKind::Sonarr
    }

    fn fetch_collection(&self) -> Result<Vec<MediaItem>> {
        let series: Vec<SeriesResource> = self.api.get("/api/v3/series")?;
        info!("Fetched {} series from Sonarr", series.len());
        Ok(series.into_iter().map(MediaItem::from).collect())
    }
}
