// Statistics API HTTP client
//
// Wraps `reqwest::Client` with endpoint URL construction, status checking,
// and JSON decoding. Every method returns wire types from `models`.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{CountriesResponse, CountryResponse, SummaryResponse};
use crate::transport::TransportConfig;

/// Longest slice of an error body kept in [`Error::Server`].
const MAX_ERROR_BODY: usize = 256;

/// Raw HTTP client for the statistics API.
///
/// The `base_url` is the API root (e.g. `https://covid19.mathdro.id/api`);
/// endpoint paths are appended as percent-encoded segments, so country
/// names with spaces are safe to pass as-is.
#[derive(Debug, Clone)]
pub struct StatsClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl StatsClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            timeout_secs: 0,
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET {base}` -- worldwide totals.
    pub async fn global_summary(&self) -> Result<SummaryResponse, Error> {
        let url = self.endpoint(&[])?;
        self.get(url).await
    }

    /// `GET {base}/countries` -- every country the API knows about.
    pub async fn countries(&self) -> Result<Vec<CountryResponse>, Error> {
        let url = self.endpoint(&["countries"])?;
        let resp: CountriesResponse = self.get(url).await?;
        Ok(resp.countries)
    }

    /// `GET {base}/countries/{name}` -- totals for a single country.
    pub async fn country_summary(&self, country: &str) -> Result<SummaryResponse, Error> {
        let url = self.endpoint(&["countries", country])?;
        self.get(url).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Append path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a GET request and decode the JSON body.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_owned()
            } else {
                body.trim().chars().take(MAX_ERROR_BODY).collect()
            };
            return Err(Error::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}
