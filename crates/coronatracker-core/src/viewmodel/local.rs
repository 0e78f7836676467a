use std::sync::Arc;

use coronatracker_api::StatsClient;
use tracing::debug;

use crate::controller::{RefreshController, RefreshHandle};
use crate::error::CoreError;
use crate::model::{FetchResult, PieEntry, SummaryData};
use crate::repository::{StatsSource, SummaryRepository, SummaryScope};
use crate::stream::{Observable, Subscription};

/// Summary screen for the selected country.
pub struct LocalViewModel<S: StatsSource = StatsClient> {
    controller: RefreshController<SummaryRepository<S>>,
    pie_chart: Observable<Vec<PieEntry>>,
}

impl<S: StatsSource> LocalViewModel<S> {
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

    /// Active / Recovered / Deaths slices of the current summary.
    pub fn pie_chart_data(&self) -> Subscription<Vec<PieEntry>> {
        self.pie_chart.subscribe()
    }

    pub fn fetch_status(&self) -> Subscription<bool> {
        self.controller.fetch_status()
    }

    pub fn refresh_local_summary(&self, force: bool) -> RefreshHandle {
        self.controller.refresh(force)
    }

    /// The country currently shown.
    pub fn country(&self) -> Option<String> {
        match self.controller.repository().scope() {
            SummaryScope::Country(name) => Some(name),
            SummaryScope::Global => None,
        }
    }

    /// Show another country. Clears the cached summary and performs a
    /// forced refresh; returns `None` if that country is already shown.
    pub fn select_country(&self, country: &str) -> Result<Option<RefreshHandle>, CoreError> {
        if !self.controller.repository().select_country(country)? {
            debug!(country, "country already selected");
            return Ok(None);
        }
        Ok(Some(self.controller.refresh(true)))
    }

    /// The snackbar for the pending event was shown; take it.
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
