// ── Tracker facade ──
//
// Wires one API client and one shared DataStore into the three
// repositories. View models attach to the shared repositories, so every
// screen sees the same cache.

use std::sync::Arc;

use coronatracker_api::StatsClient;
use tracing::debug;

use crate::config::TrackerConfig;
use crate::error::CoreError;
use crate::repository::{CountriesRepository, SummaryRepository};
use crate::store::DataStore;
use crate::viewmodel::{CountriesViewModel, GlobalViewModel, LocalViewModel};

/// Entry point for consumers: owns the client, cache and repositories.
pub struct Tracker {
    config: TrackerConfig,
    client: StatsClient,
    store: Arc<DataStore>,
    countries: Arc<CountriesRepository<StatsClient>>,
    global: Arc<SummaryRepository<StatsClient>>,
    local: Arc<SummaryRepository<StatsClient>>,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Result<Self, CoreError> {
        let client = StatsClient::new(config.api_url.as_str(), &config.transport())?;
        let store = Arc::new(DataStore::new());

        let countries = Arc::new(CountriesRepository::new(
            client.clone(),
            Arc::clone(&store),
            &config,
        ));
        let global = Arc::new(SummaryRepository::global(
            client.clone(),
            Arc::clone(&store),
            &config,
        ));
        let local = Arc::new(SummaryRepository::local(
            client.clone(),
            Arc::clone(&store),
            &config,
        ));

        debug!(api_url = %config.api_url, country = %config.country, "tracker created");

        Ok(Self {
            config,
            client,
            store,
            countries,
            global,
            local,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn client(&self) -> &StatsClient {
        &self.client
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    pub fn countries_repository(&self) -> &Arc<CountriesRepository<StatsClient>> {
        &self.countries
    }

    pub fn global_repository(&self) -> &Arc<SummaryRepository<StatsClient>> {
        &self.global
    }

    pub fn local_repository(&self) -> &Arc<SummaryRepository<StatsClient>> {
        &self.local
    }

    // ── View models ─────────────────────────────────────────────────

    pub fn countries_view_model(&self) -> CountriesViewModel {
        CountriesViewModel::new(Arc::clone(&self.countries))
    }

    pub fn local_view_model(&self) -> LocalViewModel {
        LocalViewModel::new(Arc::clone(&self.local))
    }

    pub fn global_view_model(&self) -> GlobalViewModel {
        GlobalViewModel::new(Arc::clone(&self.global))
    }
}
