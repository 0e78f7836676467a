// Test doubles shared by unit tests across the crate.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::CoreError;
use crate::model::{Country, CountryNames, Summary};
use crate::repository::{DataRepository, RefreshOutcome, StatsSource};
use crate::stream::{Observable, Subscription};

// ── FakeSource ──────────────────────────────────────────────────────

/// In-memory [`StatsSource`] with call counting, scripted failures, and a
/// gate for holding requests in flight.
#[derive(Clone, Default)]
pub(crate) struct FakeSource {
    inner: Arc<FakeSourceInner>,
}

#[derive(Default)]
struct FakeSourceInner {
    countries: Mutex<Vec<Country>>,
    global: Mutex<Summary>,
    by_country: Mutex<HashMap<String, Summary>>,
    failures: Mutex<VecDeque<CoreError>>,
    held: GateCell,
    countries_calls: AtomicUsize,
    global_calls: AtomicUsize,
    country_calls: Mutex<Vec<String>>,
}

struct GateCell(watch::Sender<bool>);

impl Default for GateCell {
    fn default() -> Self {
        Self(watch::channel(false).0)
    }
}

impl FakeSource {
    pub(crate) fn with_countries(names: &[&str]) -> Self {
        let source = Self::default();
        *source.inner.countries.lock() = names.iter().map(|n| Country::new(*n)).collect();
        source
    }

    pub(crate) fn global(self, summary: Summary) -> Self {
        *self.inner.global.lock() = summary;
        self
    }

    pub(crate) fn country(self, name: &str, summary: Summary) -> Self {
        self.inner.by_country.lock().insert(name.to_owned(), summary);
        self
    }

    /// Make the next request fail with `err`.
    pub(crate) fn fail_next(&self, err: CoreError) {
        self.inner.failures.lock().push_back(err);
    }

    /// Block requests until [`release`](Self::release).
    pub(crate) fn hold(&self) {
        self.inner.held.0.send_replace(true);
    }

    pub(crate) fn release(&self) {
        self.inner.held.0.send_replace(false);
    }

    pub(crate) fn countries_calls(&self) -> usize {
        self.inner.countries_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn global_calls(&self) -> usize {
        self.inner.global_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn country_calls(&self) -> Vec<String> {
        self.inner.country_calls.lock().clone()
    }

    async fn gate(&self) -> Result<(), CoreError> {
        let mut rx = self.inner.held.0.subscribe();
        let _ = rx.wait_for(|held| !*held).await;
        match self.inner.failures.lock().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl StatsSource for FakeSource {
    async fn countries(&self) -> Result<Vec<Country>, CoreError> {
        self.inner.countries_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        Ok(self.inner.countries.lock().clone())
    }

    async fn global_summary(&self) -> Result<Summary, CoreError> {
        self.inner.global_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        Ok(self.inner.global.lock().clone())
    }

    async fn country_summary(&self, country: &str) -> Result<Summary, CoreError> {
        self.inner.country_calls.lock().push(country.to_owned());
        self.gate().await?;
        self.inner
            .by_country
            .lock()
            .get(country)
            .cloned()
            .ok_or_else(|| CoreError::Server {
                status: 404,
                message: format!("Country {country} not found"),
            })
    }
}

// ── FakeRepository ──────────────────────────────────────────────────

/// Scripted [`DataRepository`] over country names, modelled on a mocked
/// repository: records every `refresh(force)` call.
#[derive(Clone)]
pub(crate) struct FakeRepository {
    pub(crate) names: Observable<CountryNames>,
    pub(crate) fetching: Observable<bool>,
    inner: Arc<FakeRepositoryInner>,
}

struct FakeRepositoryInner {
    fresh: Mutex<bool>,
    network_calls: AtomicUsize,
    refresh_calls: Mutex<Vec<bool>>,
    failures: Mutex<VecDeque<CoreError>>,
    held: GateCell,
}

impl FakeRepository {
    pub(crate) fn new(names: &[&str]) -> Self {
        Self {
            names: Observable::new(Arc::new(names.iter().map(|n| (*n).to_owned()).collect())),
            fetching: Observable::new(false),
            inner: Arc::new(FakeRepositoryInner {
                fresh: Mutex::new(false),
                network_calls: AtomicUsize::new(0),
                refresh_calls: Mutex::new(Vec::new()),
                failures: Mutex::new(VecDeque::new()),
                held: GateCell::default(),
            }),
        }
    }

    pub(crate) fn set_fresh(&self, fresh: bool) {
        *self.inner.fresh.lock() = fresh;
    }

    pub(crate) fn fail_next(&self, err: CoreError) {
        self.inner.failures.lock().push_back(err);
    }

    pub(crate) fn hold(&self) {
        self.inner.held.0.send_replace(true);
    }

    pub(crate) fn release(&self) {
        self.inner.held.0.send_replace(false);
    }

    pub(crate) fn emit(&self, names: &[&str]) {
        self.names
            .publish(Arc::new(names.iter().map(|n| (*n).to_owned()).collect()));
    }

    /// Every `refresh(force)` argument, in call order.
    pub(crate) fn refresh_calls(&self) -> Vec<bool> {
        self.inner.refresh_calls.lock().clone()
    }

    pub(crate) fn network_calls(&self) -> usize {
        self.inner.network_calls.load(Ordering::SeqCst)
    }
}

impl DataRepository for FakeRepository {
    type Dataset = CountryNames;

    fn dataset(&self) -> Subscription<CountryNames> {
        self.names.subscribe()
    }

    fn fetch_status(&self) -> Subscription<bool> {
        self.fetching.subscribe()
    }

    async fn refresh(&self, force: bool) -> Result<RefreshOutcome, CoreError> {
        self.inner.refresh_calls.lock().push(force);
        if !force && *self.inner.fresh.lock() {
            return Ok(RefreshOutcome::Skipped);
        }

        self.fetching.publish(true);
        let _reset = scopeguard::guard(self.fetching.clone(), |status| status.publish(false));
        self.inner.network_calls.fetch_add(1, Ordering::SeqCst);

        let mut rx = self.inner.held.0.subscribe();
        let _ = rx.wait_for(|held| !*held).await;

        let failure = self.inner.failures.lock().pop_front();
        match failure {
            Some(err) => Err(err),
            None => Ok(RefreshOutcome::Fetched),
        }
    }
}
