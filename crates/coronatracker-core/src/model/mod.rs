// ── Domain model ──
//
// Canonical types consumed by repositories, controllers, and UIs.

pub mod chart;
pub mod country;
pub mod fetch;
pub mod summary;

use std::sync::Arc;

pub use chart::PieEntry;
pub use country::Country;
pub use fetch::FetchResult;
pub use summary::Summary;

/// Dataset published by the countries repository: names in display order.
pub type CountryNames = Arc<Vec<String>>;

/// Dataset published by the summary repositories. `None` until the first
/// successful fetch.
pub type SummaryData = Option<Arc<Summary>>;
