// ── Summary repository ──
//
// Serves either the worldwide totals or the totals of one selected country.
// The country can be switched at runtime; switching drops the cached local
// summary and discards any in-flight response for the previous country.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use parking_lot::Mutex as ScopeLock;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{DataRepository, RefreshOutcome, StatsSource};
use crate::config::TrackerConfig;
use crate::error::CoreError;
use crate::model::{Summary, SummaryData};
use crate::store::{DataStore, Resource};
use crate::stream::{Observable, Subscription};

/// Which totals a [`SummaryRepository`] serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryScope {
    Global,
    Country(String),
}

impl SummaryScope {
    fn resource(&self) -> Resource {
        match self {
            Self::Global => Resource::GlobalSummary,
            Self::Country(_) => Resource::LocalSummary,
        }
    }
}

/// Global or per-country summary backed by the [`DataStore`].
pub struct SummaryRepository<S: StatsSource> {
    source: S,
    store: Arc<DataStore>,
    scope: ArcSwap<SummaryScope>,
    // Held while switching scope and while applying a local summary.
    scope_lock: ScopeLock<()>,
    fetching: Observable<bool>,
    refresh_lock: Mutex<()>,
    refresh_threshold: Duration,
}

impl<S: StatsSource> SummaryRepository<S> {
    /// Repository for the worldwide totals.
    pub fn global(source: S, store: Arc<DataStore>, config: &TrackerConfig) -> Self {
        Self::with_scope(source, store, config, SummaryScope::Global)
    }

    /// Repository for the configured country's totals.
    pub fn local(source: S, store: Arc<DataStore>, config: &TrackerConfig) -> Self {
        let scope = SummaryScope::Country(config.country.clone());
        Self::with_scope(source, store, config, scope)
    }

    fn with_scope(
        source: S,
        store: Arc<DataStore>,
        config: &TrackerConfig,
        scope: SummaryScope,
    ) -> Self {
        Self {
            source,
            store,
            scope: ArcSwap::from_pointee(scope),
            scope_lock: ScopeLock::new(()),
            fetching: Observable::new(false),
            refresh_lock: Mutex::new(()),
            refresh_threshold: config.refresh_threshold,
        }
    }

    pub fn scope(&self) -> SummaryScope {
        self.scope.load().as_ref().clone()
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    /// Switch the local summary to another country.
    ///
    /// Returns `true` if the country changed. The cached local summary is
    /// cleared so the next refresh fetches regardless of `force`.
    pub fn select_country(&self, country: &str) -> Result<bool, CoreError> {
        let country = country.trim();
        if country.is_empty() {
            return Err(CoreError::CountryNotFound {
                name: country.to_owned(),
            });
        }

        let _scope = self.scope_lock.lock();
        match self.scope.load().as_ref() {
            SummaryScope::Global => {
                return Err(CoreError::Unsupported {
                    operation: "selecting a country for the global summary".into(),
                });
            }
            SummaryScope::Country(current) if current == country => return Ok(false),
            SummaryScope::Country(_) => {}
        }

        info!(country, "local country selected");
        self.scope
            .store(Arc::new(SummaryScope::Country(country.to_owned())));
        self.store.clear_local_summary();
        Ok(true)
    }

    /// Store `summary` if `scope` is still the selected one.
    fn apply_if_selected(&self, scope: &SummaryScope, summary: Summary) -> bool {
        let _scope = self.scope_lock.lock();
        if self.scope.load().as_ref() != scope {
            return false;
        }
        self.store.apply_local_summary(summary);
        true
    }

    fn is_fresh(&self, resource: Resource) -> bool {
        let cached = match resource {
            Resource::LocalSummary => self.store.local_summary().is_some(),
            _ => self.store.global_summary().is_some(),
        };
        cached && self.store.is_fresh(resource, self.refresh_threshold)
    }
}

impl<S: StatsSource> DataRepository for SummaryRepository<S> {
    type Dataset = SummaryData;

    fn dataset(&self) -> Subscription<SummaryData> {
        match self.scope.load().as_ref() {
            SummaryScope::Global => self.store.subscribe_global_summary(),
            SummaryScope::Country(_) => self.store.subscribe_local_summary(),
        }
    }

    fn fetch_status(&self) -> Subscription<bool> {
        self.fetching.subscribe()
    }

    async fn refresh(&self, force: bool) -> Result<RefreshOutcome, CoreError> {
        let _serial = self.refresh_lock.lock().await;

        let scope = self.scope();
        let resource = scope.resource();
        if !force && self.is_fresh(resource) {
            debug!(%resource, "summary is fresh, skipping fetch");
            return Ok(RefreshOutcome::Skipped);
        }

        self.fetching.publish(true);
        let _reset = scopeguard::guard(self.fetching.clone(), |status| status.publish(false));

        match &scope {
            SummaryScope::Global => {
                let summary = self.source.global_summary().await.inspect_err(|e| {
                    debug!(error = %e, "global summary fetch failed");
                })?;
                info!(confirmed = ?summary.confirmed, force, "global summary refreshed");
                self.store.apply_global_summary(summary);
            }
            SummaryScope::Country(country) => {
                let summary = self.source.country_summary(country).await.inspect_err(|e| {
                    debug!(error = %e, country = %country, "local summary fetch failed");
                })?;

                let confirmed = summary.confirmed;
                // The country may have been switched while we were waiting.
                if !self.apply_if_selected(&scope, summary) {
                    debug!(country = %country, "discarding summary for deselected country");
                    return Ok(RefreshOutcome::Skipped);
                }
                info!(country = %country, ?confirmed, force, "local summary refreshed");
            }
        }

        Ok(RefreshOutcome::Fetched)
    }
}
