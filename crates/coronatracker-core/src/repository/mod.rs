// ── Data repositories ──
//
// The contract a `RefreshController` consumes, plus the concrete
// repositories that own the staleness policy and talk to a `StatsSource`.

mod countries;
mod summary;

use std::future::Future;

use coronatracker_api::StatsClient;

use crate::error::CoreError;
use crate::model::{Country, Summary};
use crate::stream::Subscription;

pub use countries::CountriesRepository;
pub use summary::{SummaryRepository, SummaryScope};

/// What a refresh actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The network was hit and the cache updated.
    Fetched,
    /// Cached data was fresh (or superseded); nothing was fetched.
    Skipped,
}

/// Source of cached data and fetch status, with a remote refresh trigger.
///
/// `refresh(false)` may skip the network when cached data is still fresh;
/// `refresh(true)` must attempt it. Implementations serialize concurrent
/// refreshes themselves and must report `false` on the status stream once
/// an attempt ends, however it ends.
pub trait DataRepository: Send + Sync + 'static {
    type Dataset: Clone + Send + Sync + 'static;

    /// Stream of the current cached dataset.
    fn dataset(&self) -> Subscription<Self::Dataset>;

    /// Stream of "a fetch is in flight".
    fn fetch_status(&self) -> Subscription<bool>;

    /// Refresh from the remote source.
    fn refresh(&self, force: bool)
    -> impl Future<Output = Result<RefreshOutcome, CoreError>> + Send;
}

/// Remote statistics provider used by the repositories.
pub trait StatsSource: Send + Sync + 'static {
    fn countries(&self) -> impl Future<Output = Result<Vec<Country>, CoreError>> + Send;

    fn global_summary(&self) -> impl Future<Output = Result<Summary, CoreError>> + Send;

    fn country_summary(
        &self,
        country: &str,
    ) -> impl Future<Output = Result<Summary, CoreError>> + Send;
}

impl StatsSource for StatsClient {
    async fn countries(&self) -> Result<Vec<Country>, CoreError> {
        let countries = StatsClient::countries(self).await?;
        Ok(countries.into_iter().map(Country::from).collect())
    }

    async fn global_summary(&self) -> Result<Summary, CoreError> {
        Ok(StatsClient::global_summary(self).await?.into())
    }

    async fn country_summary(&self, country: &str) -> Result<Summary, CoreError> {
        Ok(StatsClient::country_summary(self, country).await?.into())
    }
}
