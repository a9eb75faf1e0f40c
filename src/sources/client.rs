use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::SourceKind;
use crate::config::Config;
use crate::error::{Result, WastearrError};

pub const USER_AGENT: &str = concat!("wastearr/", env!("CARGO_PKG_VERSION"));

/// HTTP plumbing shared by the Sonarr and Radarr clients (both speak the
/// same v3 "*arr" API dialect)
pub struct ArrClient {
    client: Client,
    kind: SourceKind,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl ArrClient {
    /// Create a client for one service from configuration
    pub fn new(kind: SourceKind, config: &Config) -> Result<Self> {
        let api_key = config.require_api_key(kind)?.to_string();
        let base_url = config.service(kind).url.trim_end_matches('/').to_string();

        let parsed = Url::parse(&base_url).map_err(|e| {
            WastearrError::Config(format!("Invalid {} URL '{}': {}", kind.name(), base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(WastearrError::Config(format!(
                "Invalid {} URL '{}': expected http or https",
                kind.name(),
                base_url
            )));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| WastearrError::Config(format!("Cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            kind,
            base_url,
            api_key,
            timeout: config.timeout,
        })
    }

    /// Base URL of the service, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request to the service API and decode the JSON body
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(service = self.kind.name(), %url, "GET");

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(WastearrError::Auth {
                service: self.kind.name().to_string(),
                status: status.as_u16(),
                env_var: self.kind.api_key_var().to_string(),
            });
        }
        if !status.is_success() {
            return Err(WastearrError::connectivity(
                self.kind.name(),
                &self.base_url,
                format!("HTTP {}", status),
            ));
        }

        let body = response.text().map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| {
            WastearrError::response_format(self.kind.name(), format!("{path}: {e}"))
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> WastearrError {
        let message = if e.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs())
        } else if e.is_connect() {
            "connection failed".to_string()
        } else {
            e.to_string()
        };
        WastearrError::connectivity(self.kind.name(), &self.base_url, message)
    }
}
