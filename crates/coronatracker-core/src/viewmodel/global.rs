use std::sync::Arc;

use coronatracker_api::StatsClient;

use crate::controller::{RefreshController, RefreshHandle};
use crate::model::{FetchResult, PieEntry, SummaryData};
use crate::repository::{StatsSource, SummaryRepository};
use crate::stream::{Observable, Subscription};

/// Worldwide summary screen.
pub struct GlobalViewModel<S: StatsSource = StatsClient> {
    controller: RefreshController<SummaryRepository<S>>,
    pie_chart: Observable<Vec<PieEntry>>,
}

impl<S: StatsSource> GlobalViewModel<S> {
    pub fn new(repository: Arc<SummaryRepository<S>>) -> Self {
        let controller = RefreshController::attach(repository);
        let pie_chart = controller.project(|summary: &SummaryData| {
            PieEntry::from_summary(summary.as_deref())
        });
        Self {
            controller,
            pie_chart,
        }
    }

    pub fn summary(&self) -> Subscription<SummaryData> {
        self.controller.dataset()
    }

    pub fn pie_chart_data(&self) -> Subscription<Vec<PieEntry>> {
        self.pie_chart.subscribe()
    }

    pub fn fetch_status(&self) -> Subscription<bool> {
        self.controller.fetch_status()
    }

    pub fn refresh_global_summary(&self, force: bool) -> RefreshHandle {
        self.controller.refresh(force)
    }

    pub fn on_snackbar_shown(&self) -> Option<FetchResult> {
        self.controller.consume_event()
    }

    pub fn consume_event(&self) -> Option<FetchResult> {
        self.controller.consume_event()
    }

    pub fn controller(&self) -> &RefreshController<SummaryRepository<S>> {
        &self.controller
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::TrackerConfig;
    use crate::error::CoreError;
    use crate::model::Summary;
    use crate::store::DataStore;
    use crate::test_support::FakeSource;

    #[tokio::test]
    async fn failed_refresh_keeps_cached_summary() {
        let source = FakeSource::default().global(Summary {
            confirmed: Some(1_000),
            recovered: Some(400),
            deaths: Some(50),
            last_update: None,
        });
        let vm = GlobalViewModel::new(Arc::new(SummaryRepository::global(
            source.clone(),
            Arc::new(DataStore::new()),
            &TrackerConfig::default(),
        )));

        let mut pie = vm.pie_chart_data();
        vm.refresh_global_summary(false).wait().await;
        assert_eq!(pie.changed().await.unwrap().len(), 3);

        source.fail_next(CoreError::Deserialization {
            message: "expected value at line 1".into(),
        });
        vm.refresh_global_summary(true).wait().await;

        assert_eq!(vm.on_snackbar_shown(), Some(FetchResult::UnexpectedError));
        let cached = vm.controller().repository().store().global_summary();
        assert_eq!(cached.unwrap().confirmed, Some(1_000));
        assert_eq!(source.global_calls(), 2);
    }
}
