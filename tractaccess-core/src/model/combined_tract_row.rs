use super::{TopXSummary, Tract};

/// the final per-tract record comparing the three spatial-unit strategies
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTractRow {
    pub tract: Tract,
    pub option1_min_travel_time: Option<f64>,
    pub option2_min_travel_time: Option<f64>,
    /// per-parcel minimum travel times of the tract's parcels, in aggregated file order
    pub option3_min_travel_times: Vec<f64>,
    pub top_x: TopXSummary,
    pub abs_option1_minus3: Option<f64>,
    pub abs_option2_minus3: Option<f64>,
}
