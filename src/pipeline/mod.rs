//! Sales aggregation pipeline - pure transforms from (sales, criteria) to dashboard views

pub mod dashboard;
pub mod filter;
pub mod histogram;
pub mod normalize;
pub mod ranking;
pub mod summary;
pub mod table;
pub mod trend;
pub mod types;

pub use dashboard::build_dashboard;
pub use filter::{filter, validity_options, FilteredView};
pub use types::*;
