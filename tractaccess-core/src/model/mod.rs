mod aggregate_row;
mod analysis_option;
mod combined_tract_row;
mod comparison_row;
mod hospital;
mod model_error;
mod origin;
mod parcel;
mod top_x_summary;
mod tract;
mod travel_time_record;

pub use aggregate_row::AggregateRow;
pub use analysis_option::AnalysisOption;
pub use combined_tract_row::CombinedTractRow;
pub use comparison_row::{ComparisonColumn, ComparisonRow};
pub use hospital::Hospital;
pub use model_error::ModelError;
pub use origin::Origin;
pub use parcel::{assign_parcel_keys, Parcel, ParcelKey, ParcelTractLookup, MAX_PARCELS_PER_TRACT};
pub use top_x_summary::TopXSummary;
pub use tract::{ShapeMetrics, Tract, TractArena, TractId};
pub use travel_time_record::TravelTimeRecord;
