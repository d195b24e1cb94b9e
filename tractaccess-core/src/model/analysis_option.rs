use super::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// the spatial unit used to represent where residents start a trip
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisOption {
    /// census tract centroid
    Option1,
    /// average of the residential parcel coordinates within a tract
    Option2,
    /// every residential parcel
    Option3,
}

impl AnalysisOption {
    pub const ALL: [AnalysisOption; 3] = [
        AnalysisOption::Option1,
        AnalysisOption::Option2,
        AnalysisOption::Option3,
    ];

    pub fn number(&self) -> u8 {
        match self {
            AnalysisOption::Option1 => 1,
            AnalysisOption::Option2 => 2,
            AnalysisOption::Option3 => 3,
        }
    }

    /// name of the origin set file written by the spatial preparation stage
    pub fn origin_filename(&self) -> &'static str {
        match self {
            AnalysisOption::Option1 => "Option1_county_centroids.csv",
            AnalysisOption::Option2 => "Option2_county_centroids.csv",
            AnalysisOption::Option3 => "Option3_residential_parcel_centroids.csv",
        }
    }

    /// column of the origin set file holding the origin id
    pub fn origin_id_column(&self) -> &'static str {
        match self {
            AnalysisOption::Option1 => "poly_idx",
            AnalysisOption::Option2 => "county_index",
            AnalysisOption::Option3 => "new_index",
        }
    }

    pub fn aggregated_prefix(&self) -> String {
        format!("{self}_aggregated_")
    }

    pub fn travel_times_filename(&self, n_origins: usize, n_hospitals: usize, epoch: i64) -> String {
        format!("{self}_travel_times_{n_origins}locations_to_{n_hospitals}hospitals_{epoch}.csv")
    }

    pub fn aggregated_filename(&self, n_origins: usize, n_hospitals: usize, epoch: i64) -> String {
        format!(
            "{self}_aggregated_information_{n_origins}locations_to_{n_hospitals}hospitals__{epoch}.csv"
        )
    }
}

impl Display for AnalysisOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Option{}", self.number())
    }
}

impl TryFrom<u8> for AnalysisOption {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AnalysisOption::Option1),
            2 => Ok(AnalysisOption::Option2),
            3 => Ok(AnalysisOption::Option3),
            other => Err(ModelError::InvalidAnalysisOption(other)),
        }
    }
}
