// ── Countries repository ──

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{DataRepository, RefreshOutcome, StatsSource};
use crate::config::TrackerConfig;
use crate::error::CoreError;
use crate::model::CountryNames;
use crate::store::{DataStore, Resource};
use crate::stream::{Observable, Subscription};

/// Country list backed by the [`DataStore`], refreshed from a [`StatsSource`].
pub struct CountriesRepository<S: StatsSource> {
    source: S,
    store: Arc<DataStore>,
    fetching: Observable<bool>,
    refresh_lock: Mutex<()>,
    refresh_threshold: Duration,
}

impl<S: StatsSource> CountriesRepository<S> {
    pub fn new(source: S, store: Arc<DataStore>, config: &TrackerConfig) -> Self {
        Self {
            source,
            store,
            fetching: Observable::new(false),
            refresh_lock: Mutex::new(()),
            refresh_threshold: config.refresh_threshold,
        }
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    fn is_fresh(&self) -> bool {
        self.store.has_countries() && self.store.is_fresh(Resource::Countries, self.refresh_threshold)
    }
}

impl<S: StatsSource> DataRepository for CountriesRepository<S> {
    type Dataset = CountryNames;

    fn dataset(&self) -> Subscription<CountryNames> {
        self.store.subscribe_country_names()
    }

    fn fetch_status(&self) -> Subscription<bool> {
        self.fetching.subscribe()
    }

    async fn refresh(&self, force: bool) -> Result<RefreshOutcome, CoreError> {
        // One network call at a time; queued callers re-check freshness.
        let _serial = self.refresh_lock.lock().await;

        if !force && self.is_fresh() {
            debug!("countries are fresh, skipping fetch");
            return Ok(RefreshOutcome::Skipped);
        }

        self.fetching.publish(true);
        let _reset = scopeguard::guard(self.fetching.clone(), |status| status.publish(false));

        let countries = self.source.countries().await.inspect_err(|e| {
            debug!(error = %e, "countries fetch failed");
        })?;

        info!(count = countries.len(), force, "countries refreshed");
        self.store.apply_countries(countries);
        Ok(RefreshOutcome::Fetched)
    }
}
