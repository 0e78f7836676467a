// ── View models ──
//
// The refresh controller instantiated per screen: country list, local
// summary and global summary.

mod countries;
mod global;
mod local;

pub use countries::CountriesViewModel;
pub use global::GlobalViewModel;
pub use local::LocalViewModel;
