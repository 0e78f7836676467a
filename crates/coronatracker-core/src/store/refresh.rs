// ── Refresh application logic ──
//
// Applies fetched data to the DataStore and stamps the resource as fresh.
// Callers only reach these after a successful fetch; failures leave the
// cached data untouched.

use std::sync::Arc;

use chrono::Utc;

use super::DataStore;
use super::data_store::Resource;
use crate::model::{Country, Summary};

impl DataStore {
    /// Replace the cached country list.
    ///
    /// Countries are keyed by name with their ISO codes as aliases. The names
    /// stream keeps the API order and is published once, after the
    /// collection snapshot is rebuilt.
    pub(crate) fn apply_countries(&self, countries: Vec<Country>) {
        let names: Vec<String> = countries.iter().map(|c| c.name.clone()).collect();

        self.countries.replace_all(
            countries
                .into_iter()
                .map(|c| {
                    let key = c.name.clone();
                    let aliases = c.iso2.iter().chain(c.iso3.iter()).cloned().collect();
                    (key, aliases, c)
                })
                .collect(),
        );

        self.country_names.publish(Arc::new(names));
        self.mark_refreshed(Resource::Countries, Utc::now());
    }

    pub(crate) fn apply_global_summary(&self, summary: Summary) {
        self.global_summary.publish(Some(Arc::new(summary)));
        self.mark_refreshed(Resource::GlobalSummary, Utc::now());
    }

    pub(crate) fn apply_local_summary(&self, summary: Summary) {
        self.local_summary.publish(Some(Arc::new(summary)));
        self.mark_refreshed(Resource::LocalSummary, Utc::now());
    }

    /// Forget the local summary (the selected country changed).
    pub(crate) fn clear_local_summary(&self) {
        self.local_summary.publish_if_changed(None);
        self.invalidate(Resource::LocalSummary);
    }
}
