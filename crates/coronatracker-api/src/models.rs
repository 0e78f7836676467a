// Wire types for the statistics API.
//
// These mirror the JSON payloads verbatim. Domain types live in
// `coronatracker-core`; conversions happen there.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single counter as the API reports it: `{ "value": 123, "detail": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CounterResponse {
    #[serde(default)]
    pub value: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Response body of `GET {base}` and `GET {base}/countries/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(default)]
    pub confirmed: Option<CounterResponse>,
    #[serde(default)]
    pub recovered: Option<CounterResponse>,
    #[serde(default)]
    pub deaths: Option<CounterResponse>,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
}

impl SummaryResponse {
    pub fn confirmed_value(&self) -> Option<u64> {
        self.confirmed.as_ref().and_then(|c| c.value)
    }

    pub fn recovered_value(&self) -> Option<u64> {
        self.recovered.as_ref().and_then(|c| c.value)
    }

    pub fn deaths_value(&self) -> Option<u64> {
        self.deaths.as_ref().and_then(|c| c.value)
    }
}

/// One entry of `GET {base}/countries`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CountryResponse {
    pub name: String,
    #[serde(default)]
    pub iso2: Option<String>,
    #[serde(default)]
    pub iso3: Option<String>,
}

/// Envelope of `GET {base}/countries`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CountriesResponse {
    #[serde(default)]
    pub countries: Vec<CountryResponse>,
}
