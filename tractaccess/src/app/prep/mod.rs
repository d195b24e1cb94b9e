//! county preparation: tract and parcel origins, and the hospitals around the
//! county, written as the inputs of the travel time stage.
mod app;
mod hospital_selection;
mod parcel_join;
mod prep_error;
mod tract_loader;

pub use app::{run, PrepSummary, HOSPITALS_FILENAME};
pub use hospital_selection::{select_hospitals, write_license_summary, HospitalSelection};
pub use parcel_join::{filter_residential, join_parcels, ParcelJoin};
pub use prep_error::PrepError;
pub use tract_loader::{load_tracts, CountyTracts};
