use std::sync::Arc;

use coronatracker_api::StatsClient;

use crate::controller::{RefreshController, RefreshHandle};
use crate::model::{CountryNames, FetchResult};
use crate::repository::{CountriesRepository, DataRepository};
use crate::stream::Subscription;

/// Country list screen.
pub struct CountriesViewModel<R = CountriesRepository<StatsClient>>
where
    R: DataRepository<Dataset = CountryNames>,
{
    controller: RefreshController<R>,
}

impl<R: DataRepository<Dataset = CountryNames>> CountriesViewModel<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            controller: RefreshController::attach(repository),
        }
    }

    /// Known country names, cached data first.
    pub fn countries(&self) -> Subscription<CountryNames> {
        self.controller.dataset()
    }

    pub fn fetch_status(&self) -> Subscription<bool> {
        self.controller.fetch_status()
    }

    pub fn refresh_countries(&self, force: bool) -> RefreshHandle {
        self.controller.refresh(force)
    }

    pub fn consume_event(&self) -> Option<FetchResult> {
        self.controller.consume_event()
    }

    pub fn controller(&self) -> &RefreshController<R> {
        &self.controller
    }
}
