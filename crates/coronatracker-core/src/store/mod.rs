// ── Local data cache ──
//
// Concurrent storage with push-based change notification and per-resource
// refresh timestamps for the staleness policy.

mod collection;
mod data_store;
mod refresh;

pub use data_store::{DataStore, Resource};
