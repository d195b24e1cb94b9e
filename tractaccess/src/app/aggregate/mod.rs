//! joins the per-origin travel time aggregates of the three analysis options
//! onto the county's tracts.
mod aggregated_files;
mod aggregation_error;
mod app;

pub use aggregated_files::{find_latest_aggregated, list_aggregated, AggregatedFiles};
pub use aggregation_error::AggregationError;
pub use app::{run, AggregationOutput, COMBINED_BEFORE_FILENAME, COMBINED_FILENAME};
