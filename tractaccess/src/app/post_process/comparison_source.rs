use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// where the four comparison columns come from
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonSource {
    /// the per-origin aggregated files of each option, placed side by side by
    /// row position
    #[default]
    AggregatedFiles,
    /// one row per tract from `customized_combined_output.csv`
    CombinedTractTable,
}

impl Display for ComparisonSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ComparisonSource::AggregatedFiles => "aggregated_files",
            ComparisonSource::CombinedTractTable => "combined_tract_table",
        };
        write!(f, "{s}")
    }
}
