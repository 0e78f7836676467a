//! Reactive data layer between `coronatracker-api` and UI consumers.
//!
//! - **[`RefreshController`]** — Observable remote-data controller. Exposes a
//!   repository's dataset and fetch-status streams to any number of
//!   subscribers, runs refreshes in the background, and turns failures into
//!   one-shot [`FetchResult`] events.
//!
//! - **[`DataRepository`]** — The contract a controller consumes. Implemented
//!   by [`CountriesRepository`] and [`SummaryRepository`], which own the
//!   staleness policy and serialize network calls against a [`StatsSource`].
//!
//! - **[`DataStore`]** — Local cache of countries and summaries with
//!   per-resource refresh timestamps.
//!
//! - **[`Observable`] / [`Subscription`]** — Replay-latest broadcast with an
//!   explicit subscriber list. Every subscriber sees every value in order;
//!   projections are updated before `publish` returns.
//!
//! - **View models** ([`viewmodel`]) — `CountriesViewModel`, `LocalViewModel`,
//!   `GlobalViewModel`: the controller instantiated per screen.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod repository;
pub mod store;
pub mod stream;
pub mod tracker;
pub mod viewmodel;

#[cfg(test)]
pub(crate) mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::TrackerConfig;
pub use controller::{RefreshController, RefreshHandle};
pub use error::CoreError;
pub use repository::{
    CountriesRepository, DataRepository, RefreshOutcome, StatsSource, SummaryRepository,
    SummaryScope,
};
pub use store::{DataStore, Resource};
pub use stream::{EventSlot, Observable, Subscription};
pub use tracker::Tracker;
pub use viewmodel::{CountriesViewModel, GlobalViewModel, LocalViewModel};

pub use model::{CountryNames, Country, FetchResult, PieEntry, Summary, SummaryData};

pub use coronatracker_api::StatsClient;
