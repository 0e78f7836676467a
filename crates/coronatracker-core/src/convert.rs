// ── API-to-domain type conversions ──
//
// Bridges raw `coronatracker_api` response types into canonical
// `coronatracker_core::model` types.

use coronatracker_api::models::{CountryResponse, SummaryResponse};

use crate::model::{Country, Summary};

impl From<SummaryResponse> for Summary {
    fn from(resp: SummaryResponse) -> Self {
        Self {
            confirmed: resp.confirmed_value(),
            recovered: resp.recovered_value(),
            deaths: resp.deaths_value(),
            last_update: resp.last_update,
        }
    }
}

impl From<CountryResponse> for Country {
    fn from(resp: CountryResponse) -> Self {
        // Blank codes show up for cruise ships and similar pseudo-countries.
        let non_blank = |code: Option<String>| code.filter(|c| !c.trim().is_empty());
        Self {
            name: resp.name.trim().to_owned(),
            iso2: non_blank(resp.iso2),
            iso3: non_blank(resp.iso3),
        }
    }
}
