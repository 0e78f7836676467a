// ── Runtime tracker configuration ──
//
// Describes where the statistics API lives and how eagerly cached data is
// considered stale. Never touches disk: `coronatracker-config` builds a
// `TrackerConfig` and hands it in.

use std::time::Duration;

use coronatracker_api::TransportConfig;
use url::Url;

use crate::error::CoreError;

/// Default statistics API root.
pub const DEFAULT_API_URL: &str = "https://covid19.mathdro.id/api";

/// Default country for the local summary.
pub const DEFAULT_COUNTRY: &str = "Poland";

/// Configuration shared by the API client and the repositories.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Statistics API root (e.g., `https://covid19.mathdro.id/api`).
    pub api_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Cached data younger than this is fresh; a non-forced refresh skips
    /// the network while data is fresh.
    pub refresh_threshold: Duration,
    /// Country used for the local summary.
    pub country: String,
}

impl TrackerConfig {
    /// Config with defaults and a custom API root.
    pub fn with_api_url(api_url: &str) -> Result<Self, CoreError> {
        let api_url = Url::parse(api_url).map_err(|e| CoreError::Config {
            message: format!("invalid API URL '{api_url}': {e}"),
        })?;
        Ok(Self {
            api_url,
            ..Self::default()
        })
    }

    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::with_timeout(self.timeout)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout: Duration::from_secs(30),
            refresh_threshold: Duration::from_secs(30 * 60),
            country: DEFAULT_COUNTRY.into(),
        }
    }
}
