use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Confirmed / recovered / deaths totals, worldwide or for one country.
///
/// Counters are optional: the API omits them while a region has no data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub confirmed: Option<u64>,
    pub recovered: Option<u64>,
    pub deaths: Option<u64>,
    pub last_update: Option<DateTime<Utc>>,
}

impl Summary {
    /// Confirmed cases that are neither recovered nor dead.
    pub fn active(&self) -> Option<u64> {
        let confirmed = self.confirmed?;
        Some(
            confirmed
                .saturating_sub(self.recovered.unwrap_or(0))
                .saturating_sub(self.deaths.unwrap_or(0)),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_none() && self.recovered.is_none() && self.deaths.is_none()
    }
}
