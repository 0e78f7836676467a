// ── Central reactive data store ──
//
// Thread-safe cache for countries and summaries. Mutations are broadcast
// to subscribers via `Observable`s; refresh timestamps live in `watch`
// channels.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use strum::{Display, EnumIter};
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::model::{Country, CountryNames, SummaryData};
use crate::stream::{Observable, Subscription};

/// A separately refreshed slice of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Resource {
    Countries,
    GlobalSummary,
    LocalSummary,
}

/// Central reactive store for all cached statistics.
pub struct DataStore {
    pub(crate) countries: EntityCollection<Country>,
    pub(crate) country_names: Observable<CountryNames>,
    pub(crate) global_summary: Observable<SummaryData>,
    pub(crate) local_summary: Observable<SummaryData>,
    pub(crate) last_countries_refresh: watch::Sender<Option<DateTime<Utc>>>,
    pub(crate) last_global_refresh: watch::Sender<Option<DateTime<Utc>>>,
    pub(crate) last_local_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (last_countries_refresh, _) = watch::channel(None);
        let (last_global_refresh, _) = watch::channel(None);
        let (last_local_refresh, _) = watch::channel(None);

        Self {
            countries: EntityCollection::new(),
            country_names: Observable::new(Arc::new(Vec::new())),
            global_summary: Observable::new(None),
            local_summary: Observable::new(None),
            last_countries_refresh,
            last_global_refresh,
            last_local_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn countries_snapshot(&self) -> Arc<Vec<Arc<Country>>> {
        self.countries.snapshot()
    }

    pub fn country_names_snapshot(&self) -> CountryNames {
        self.country_names.get()
    }

    pub fn global_summary(&self) -> SummaryData {
        self.global_summary.get()
    }

    pub fn local_summary(&self) -> SummaryData {
        self.local_summary.get()
    }

    // ── Country lookups ──────────────────────────────────────────────

    pub fn country_by_name(&self, name: &str) -> Option<Arc<Country>> {
        self.countries.get_by_key(name)
    }

    /// Resolve user input (exact name, ISO code, or case-insensitive name)
    /// to a cached country.
    pub fn resolve_country(&self, query: &str) -> Option<Arc<Country>> {
        let query = query.trim();
        self.countries
            .get_by_key(query)
            .or_else(|| self.countries.get_by_alias(query))
            .or_else(|| {
                self.countries
                    .snapshot()
                    .iter()
                    .find(|c| c.matches(query))
                    .cloned()
            })
    }

    pub fn country_count(&self) -> usize {
        self.countries.len()
    }

    pub fn has_countries(&self) -> bool {
        !self.countries.is_empty()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_countries(&self) -> Subscription<Arc<Vec<Arc<Country>>>> {
        self.countries.subscribe()
    }

    pub fn subscribe_country_names(&self) -> Subscription<CountryNames> {
        self.country_names.subscribe()
    }

    pub fn subscribe_global_summary(&self) -> Subscription<SummaryData> {
        self.global_summary.subscribe()
    }

    pub fn subscribe_local_summary(&self) -> Subscription<SummaryData> {
        self.local_summary.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    fn refresh_marker(&self, resource: Resource) -> &watch::Sender<Option<DateTime<Utc>>> {
        match resource {
            Resource::Countries => &self.last_countries_refresh,
            Resource::GlobalSummary => &self.last_global_refresh,
            Resource::LocalSummary => &self.last_local_refresh,
        }
    }

    /// When `resource` was last refreshed successfully.
    pub fn last_refresh(&self, resource: Resource) -> Option<DateTime<Utc>> {
        *self.refresh_marker(resource).borrow()
    }

    pub fn subscribe_last_refresh(&self, resource: Resource) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.refresh_marker(resource).subscribe()
    }

    /// How long ago `resource` was refreshed, or `None` if never.
    pub fn data_age(&self, resource: Resource) -> Option<chrono::Duration> {
        self.last_refresh(resource).map(|t| Utc::now() - t)
    }

    /// `true` when `resource` was refreshed less than `threshold` ago.
    pub fn is_fresh(&self, resource: Resource, threshold: Duration) -> bool {
        let Some(age) = self.data_age(resource) else {
            return false;
        };
        // A clock that went backwards yields a negative age: treat as fresh.
        age.to_std().map_or(true, |age| age < threshold)
    }

    /// Mark `resource` stale so the next non-forced refresh hits the network.
    pub fn invalidate(&self, resource: Resource) {
        self.refresh_marker(resource).send_replace(None);
    }

    pub(crate) fn mark_refreshed(&self, resource: Resource, at: DateTime<Utc>) {
        self.refresh_marker(resource).send_replace(Some(at));
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
