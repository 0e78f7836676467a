// ── Refresh controller ──
//
// Observable remote-data controller: one per UI attachment. Exposes a
// repository's dataset and fetch-status streams, triggers refreshes in the
// background and turns failures into one-shot `FetchResult` events.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::model::FetchResult;
use crate::repository::DataRepository;
use crate::stream::{EventSlot, Observable, Subscription};

// ── RefreshController ────────────────────────────────────────────

/// Controller over a [`DataRepository`].
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Projections stop and any
/// in-flight refresh is abandoned once the last clone is dropped or
/// [`detach()`](Self::detach) is called.
pub struct RefreshController<R: DataRepository> {
    inner: Arc<ControllerInner<R>>,
}

struct ControllerInner<R: DataRepository> {
    repository: Arc<R>,
    events: EventSlot<FetchResult>,
    cancel: CancellationToken,
}

impl<R: DataRepository> Drop for ControllerInner<R> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<R: DataRepository> Clone for RefreshController<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: DataRepository> RefreshController<R> {
    /// Attach to `repository`.
    ///
    /// The current cached dataset is available immediately, before any
    /// refresh.
    pub fn attach(repository: Arc<R>) -> Self {
        debug!("refresh controller attached");

        Self {
            inner: Arc::new(ControllerInner {
                repository,
                events: EventSlot::new(),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.inner.repository
    }

    /// The cached dataset, replayed to late subscribers.
    ///
    /// Subscribes straight to the repository stream, so a late subscriber
    /// always starts from the repository's latest value.
    pub fn dataset(&self) -> Subscription<R::Dataset> {
        self.inner.repository.dataset()
    }

    /// Whether a remote fetch is in flight.
    pub fn fetch_status(&self) -> Subscription<bool> {
        self.inner.repository.fetch_status()
    }

    /// Derived stream of the dataset, kept in step until the controller goes away.
    pub fn project<U, F>(&self, f: F) -> Observable<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&R::Dataset) -> U + Send + 'static,
    {
        self.inner
            .repository
            .dataset()
            .project(f, self.inner.cancel.child_token())
    }

    /// Ask the repository to refresh without waiting for it.
    ///
    /// `force == false` lets the repository skip the network when its data
    /// is fresh. A failure lands in the event slot, replacing any older
    /// unconsumed one; successes and skips leave the slot untouched.
    pub fn refresh(&self, force: bool) -> RefreshHandle {
        let repository = Arc::clone(&self.inner.repository);
        let events = self.inner.events.clone();
        let cancel = self.inner.cancel.child_token();

        let task = tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(force, "refresh abandoned");
                    return None;
                }
                result = repository.refresh(force) => result,
            };

            match result {
                Ok(outcome) => {
                    debug!(?outcome, force, "refresh finished");
                    Some(FetchResult::Success)
                }
                Err(err) => {
                    let event = FetchResult::from(&err);
                    warn!(error = %err, %event, force, "refresh failed");
                    if !cancel.is_cancelled() {
                        events.offer(event);
                    }
                    Some(event)
                }
            }
        });

        RefreshHandle { task }
    }

    /// Take the pending fetch event, if any. Never yields the same event twice.
    pub fn consume_event(&self) -> Option<FetchResult> {
        self.inner.events.take()
    }

    /// The pending fetch event, without consuming it.
    pub fn pending_event(&self) -> Option<FetchResult> {
        self.inner.events.peek()
    }

    /// Observe the event slot (`Some` on arrival, `None` once consumed).
    pub fn events(&self) -> Subscription<Option<FetchResult>> {
        self.inner.events.subscribe()
    }

    /// Stop projections, abandon in-flight refreshes and drop the pending event.
    pub fn detach(&self) {
        self.inner.cancel.cancel();
        self.inner.events.clear();
        debug!("refresh controller detached");
    }

    pub fn is_detached(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

// ── RefreshHandle ────────────────────────────────────────────────

/// Handle to a background refresh. Dropping it does not cancel the refresh.
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<Option<FetchResult>>,
}

impl RefreshHandle {
    /// Wait for the attempt to end.
    ///
    /// Returns `None` if it was abandoned by [`RefreshController::detach`]
    /// or aborted. A failure is still delivered through the event slot.
    pub async fn wait(self) -> Option<FetchResult> {
        self.task.await.ok().flatten()
    }

    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::CoreError;
    use crate::config::TrackerConfig;
    use crate::model::CountryNames;
    use crate::repository::CountriesRepository;
    use crate::store::DataStore;
    use crate::test_support::{FakeRepository, FakeSource};

    fn names(values: &[&str]) -> CountryNames {
        Arc::new(values.iter().map(|v| (*v).to_owned()).collect())
    }

    fn offline() -> CoreError {
        CoreError::Network {
            url: "https://covid19.mathdro.id/api/countries".into(),
            reason: "connection refused".into(),
        }
    }

    #[tokio::test]
    async fn cached_dataset_visible_without_refresh() {
        let repo = Arc::new(FakeRepository::new(&["Poland", "Germany"]));
        let controller = RefreshController::attach(Arc::clone(&repo));

        let dataset = controller.dataset();
        assert_eq!(*dataset.current(), names(&["Poland", "Germany"]));
        assert!(repo.refresh_calls().is_empty());
        assert_eq!(controller.consume_event(), None);
    }

    #[tokio::test]
    async fn every_subscriber_sees_the_same_sequence() {
        let repo = Arc::new(FakeRepository::new(&[]));
        let controller = RefreshController::attach(Arc::clone(&repo));
        let mut first = controller.dataset();
        let mut second = controller.dataset();

        repo.emit(&["Poland"]);
        repo.emit(&["Poland", "Germany"]);

        for sub in [&mut first, &mut second] {
            assert_eq!(sub.changed().await, Some(names(&["Poland"])));
            assert_eq!(sub.changed().await, Some(names(&["Poland", "Germany"])));
        }
    }

    #[tokio::test]
    async fn forced_refresh_reaches_repository_each_time() {
        let repo = Arc::new(FakeRepository::new(&["Poland"]));
        repo.set_fresh(true);
        let controller = RefreshController::attach(Arc::clone(&repo));

        for _ in 0..3 {
            assert_eq!(controller.refresh(true).wait().await, Some(FetchResult::Success));
        }
        assert_eq!(repo.refresh_calls(), vec![true, true, true]);
        assert_eq!(repo.network_calls(), 3);
        assert_eq!(controller.consume_event(), None);
    }

    #[tokio::test]
    async fn unforced_refresh_on_fresh_data_skips_network() {
        let repo = Arc::new(FakeRepository::new(&["Poland"]));
        repo.set_fresh(true);
        let controller = RefreshController::attach(Arc::clone(&repo));
        let mut status = controller.fetch_status();

        assert_eq!(controller.refresh(false).wait().await, Some(FetchResult::Success));
        assert_eq!(repo.refresh_calls(), vec![false]);
        assert_eq!(repo.network_calls(), 0);
        assert_eq!(status.try_changed(), None);
        assert_eq!(controller.consume_event(), None);
    }

    #[tokio::test]
    async fn failure_is_consumed_exactly_once() {
        let repo = Arc::new(FakeRepository::new(&["Poland"]));
        repo.fail_next(CoreError::Server {
            status: 500,
            message: "Internal Server Error".into(),
        });
        let controller = RefreshController::attach(Arc::clone(&repo));

        assert_eq!(
            controller.refresh(true).wait().await,
            Some(FetchResult::ServerError)
        );
        assert_eq!(controller.pending_event(), Some(FetchResult::ServerError));
        assert_eq!(controller.consume_event(), Some(FetchResult::ServerError));
        assert_eq!(controller.consume_event(), None);
    }

    #[tokio::test]
    async fn network_failure_resets_status() {
        let repo = Arc::new(FakeRepository::new(&["Poland"]));
        repo.fail_next(offline());
        let controller = RefreshController::attach(Arc::clone(&repo));
        let mut status = controller.fetch_status();
        assert!(!*status.current());

        controller.refresh(true).wait().await;

        assert_eq!(status.changed().await, Some(true));
        assert_eq!(status.changed().await, Some(false));
        assert_eq!(controller.consume_event(), Some(FetchResult::NetworkError));
        assert_eq!(*controller.dataset().current(), names(&["Poland"]));
    }

    #[tokio::test]
    async fn newer_failure_replaces_unconsumed_one() {
        let repo = Arc::new(FakeRepository::new(&[]));
        let controller = RefreshController::attach(Arc::clone(&repo));

        repo.fail_next(CoreError::Server {
            status: 503,
            message: "Service Unavailable".into(),
        });
        controller.refresh(true).wait().await;
        repo.fail_next(offline());
        controller.refresh(true).wait().await;

        assert_eq!(controller.consume_event(), Some(FetchResult::NetworkError));
        assert_eq!(controller.consume_event(), None);
    }

    #[tokio::test]
    async fn success_leaves_pending_failure_in_place() {
        let repo = Arc::new(FakeRepository::new(&[]));
        let controller = RefreshController::attach(Arc::clone(&repo));

        repo.fail_next(offline());
        controller.refresh(true).wait().await;
        controller.refresh(true).wait().await;

        assert_eq!(controller.consume_event(), Some(FetchResult::NetworkError));
    }

    #[tokio::test]
    async fn events_subscription_reports_arrival_and_consumption() {
        let repo = Arc::new(FakeRepository::new(&[]));
        repo.fail_next(offline());
        let controller = RefreshController::attach(Arc::clone(&repo));
        let mut events = controller.events();

        controller.refresh(true).wait().await;
        assert_eq!(events.changed().await, Some(Some(FetchResult::NetworkError)));

        controller.consume_event();
        assert_eq!(events.changed().await, Some(None));
    }

    #[tokio::test]
    async fn detach_abandons_in_flight_refresh() {
        let repo = Arc::new(FakeRepository::new(&["Poland"]));
        repo.hold();
        repo.fail_next(offline());
        let controller = RefreshController::attach(Arc::clone(&repo));
        let mut status = repo.fetch_status();

        let handle = controller.refresh(true);
        assert_eq!(status.changed().await, Some(true));

        controller.detach();
        assert!(controller.is_detached());
        assert_eq!(handle.wait().await, None);
        assert_eq!(status.changed().await, Some(false));
        assert_eq!(controller.consume_event(), None);
    }

    #[tokio::test]
    async fn overlapping_refreshes_all_reach_repository() {
        let repo = Arc::new(FakeRepository::new(&[]));
        repo.hold();
        let controller = RefreshController::attach(Arc::clone(&repo));

        let a = controller.refresh(false);
        let b = controller.refresh(true);
        tokio::time::sleep(Duration::from_millis(10)).await;
        repo.release();

        assert_eq!(a.wait().await, Some(FetchResult::Success));
        assert_eq!(b.wait().await, Some(FetchResult::Success));
        let mut calls = repo.refresh_calls();
        calls.sort_unstable();
        assert_eq!(calls, vec![false, true]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn late_subscriber_sees_refreshed_data_on_multi_thread_runtime() {
        let source = FakeSource::with_countries(&["Poland", "Germany"]);
        let config = TrackerConfig::default();

        for _ in 0..200 {
            let store = Arc::new(DataStore::new());
            let repo = Arc::new(CountriesRepository::new(source.clone(), store, &config));
            let controller = RefreshController::attach(repo);
            let counts = controller.project(|names: &CountryNames| names.len());

            assert_eq!(controller.refresh(true).wait().await, Some(FetchResult::Success));
            assert_eq!(*controller.dataset().current(), names(&["Poland", "Germany"]));
            assert_eq!(counts.get(), 2);
        }
    }

    #[tokio::test]
    async fn projection_follows_dataset() {
        let repo = Arc::new(FakeRepository::new(&["Poland"]));
        let controller = RefreshController::attach(Arc::clone(&repo));
        let counts = controller.project(|names: &CountryNames| names.len());
        let mut sub = counts.subscribe();
        assert_eq!(*sub.current(), 1);

        repo.emit(&["Poland", "Germany", "Italy"]);
        assert_eq!(sub.changed().await, Some(3));
    }
}
