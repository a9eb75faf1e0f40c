use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use super::paths::Paths;
use crate::error::{Result, WastearrError};
use crate::sources::SourceKind;

pub const DEFAULT_SONARR_URL: &str = "http://localhost:8989";
pub const DEFAULT_RADARR_URL: &str = "http://localhost:7878";

/// Per-request timeout for API calls
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub url: String,
    pub api_key: Option<String>,
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub sonarr: ServiceConfig,
    pub radarr: ServiceConfig,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sonarr: ServiceConfig {
                url: DEFAULT_SONARR_URL.to_string(),
                api_key: None,
            },
            radarr: ServiceConfig {
                url: DEFAULT_RADARR_URL.to_string(),
                api_key: None,
            },
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Resolve configuration from the process environment and the files in `paths`
    pub fn load_from(paths: &Paths) -> Self {
        Self::resolve(|key| std::env::var(key).ok(), paths)
    }

    /// Resolve configuration: `env` > dotfile > config file > defaults
    pub fn resolve(env: impl Fn(&str) -> Option<String>, paths: &Paths) -> Self {
        let dotenv = read_key_values(&paths.dotenv_file);
        let conf = read_key_values(&paths.config_file);

        let lookup = |key: &str| {
            env(key)
                .filter(|v| !v.is_empty())
                .or_else(|| dotenv.get(key).cloned())
                .or_else(|| conf.get(key).cloned())
        };

        Self {
            sonarr: ServiceConfig {
                url: lookup("SONARR_URL").unwrap_or_else(|| DEFAULT_SONARR_URL.to_string()),
                api_key: lookup("SONARR_API_KEY"),
            },
            radarr: ServiceConfig {
                url: lookup("RADARR_URL").unwrap_or_else(|| DEFAULT_RADARR_URL.to_string()),
                api_key: lookup("RADARR_API_KEY"),
            },
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Settings for one service
    pub fn service(&self, kind: SourceKind) -> &ServiceConfig {
        match kind {
            SourceKind::Sonarr => &self.sonarr,
            SourceKind::Radarr => &self.radarr,
        }
    }

    /// Get a service's API key or return an error with instructions
    pub fn require_api_key(&self, kind: SourceKind) -> Result<&str> {
        self.service(kind).api_key.as_deref().ok_or_else(|| {
            WastearrError::config_missing(format!(
                "{} is not set. Export it, add it to ./.env, or add it to ~/.config/wastearr/conf.",
                kind.api_key_var()
            ))
        })
    }
}

/// Read `KEY=VALUE` lines from a dotenv-style file without touching the
/// process environment. Unreadable files yield nothing; malformed lines and
/// empty values are skipped.
fn read_key_values(path: &Path) -> HashMap<String, String> {
    let Ok(lines) = dotenvy::from_path_iter(path) else {
        return HashMap::new();
    };
    debug!("Loaded settings from {}", path.display());

    lines
        .filter_map(|line| match line {
            Ok(pair) => Some(pair),
            Err(e) => {
                warn!("Skipping line in {}: {}", path.display(), e);
                None
            }
        })
        .filter(|(_, value)| !value.is_empty())
        .collect()
}
