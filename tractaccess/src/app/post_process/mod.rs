//! the comparison table consumed by the box plots
mod app;
mod comparison_source;

pub use app::{read_comparison, run, PostProcessOutput, COMPARISON_FILENAME};
pub use comparison_source::ComparisonSource;
