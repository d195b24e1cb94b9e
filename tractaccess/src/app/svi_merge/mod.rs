//! joins census tract polygons with the SVI attribute table, producing the
//! tract dataset read by the preparation stage.
mod app;
mod svi_merge_error;

pub use app::{pad_tract_id, run, MergeSummary, SviMergeRequest, TRACT_ID_WIDTH};
pub use svi_merge_error::SviMergeError;
