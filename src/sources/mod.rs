//! Clients for the media-management services that own the library
//!
//! Sonarr provides series and Radarr provides movies. Both expose the same
//! capability, fetching the whole collection as normalized [`MediaItem`]s,
//! through the [`MediaSource`] trait.

mod client;
mod radarr;
mod sonarr;

pub use client::{ArrClient, USER_AGENT};
pub use radarr::RadarrClient;
pub use sonarr::SonarrClient;

use clap::ValueEnum;

use crate::config::Config;
use crate::error::Result;
use crate::media::{ContentType, MediaItem};

/// The services Wastearr can analyze
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Sonarr (TV series)
    Sonarr,
    /// Radarr (movies)
    Radarr,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::Sonarr, SourceKind::Radarr];

    /// Display name of the service
    pub fn name(self) -> &'static str {
        match self {
            Self::Sonarr => "Sonarr",
            Self::Radarr => "Radarr",
        }
    }

    /// Key under which the collection is cached
    pub fn cache_key(self) -> &'static str {
        match self {
            Self::Sonarr => "series",
            Self::Radarr => "movies",
        }
    }

    /// Content type of every item the service returns
    pub fn content_type(self) -> ContentType {
        match self {
            Self::Sonarr => ContentType::Series,
            Self::Radarr => ContentType::Movie,
        }
    }

    /// Configuration key holding the service's API key
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::Sonarr => "SONARR_API_KEY",
            Self::Radarr => "RADARR_API_KEY",
        }
    }
}

/// A service that can list its whole collection
pub trait MediaSource: Send + Sync {
    /// Which service this is
    fn kind(&self) -> SourceKind;

    /// Fetch every item the service tracks, downloaded or not
    fn fetch_collection(&self) -> Result<Vec<MediaItem>>;
}

/// Create the client for a service from resolved configuration
pub fn connect(kind: SourceKind, config: &Config) -> Result<Box<dyn MediaSource>> {
    Ok(match kind {
        SourceKind::Sonarr => Box::new(SonarrClient::new(config)?),
        SourceKind::Radarr => Box::new(RadarrClient::new(config)?),
    })
}

/// Ratings of zero or below mean "not rated" in both services
fn normalize_rating(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Year zero means "unknown" in both services
fn normalize_year(year: Option<u32>) -> Option<u32> {
    year.filter(|y| *y > 0)
}
