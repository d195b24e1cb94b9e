//! one module per batch stage of the pipeline. each stage reads the files
//! written by the previous one from the county directory.
pub mod aggregate;
pub mod plot;
pub mod post_process;
pub mod prep;
pub mod svi_merge;
pub mod travel_time;

mod tract_access_error;

pub use tract_access_error::TractAccessError;
