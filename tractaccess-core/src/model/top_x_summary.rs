use serde::{Deserialize, Serialize};

/// statistics over the `x` largest parcel minimum travel times of a tract,
/// where `x` is the tract's count of households without a vehicle. every
/// statistic is empty when the tract has fewer than `x` parcels or `x <= 0`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TopXSummary {
    pub top_x_values: Vec<f64>,
    pub min_top_x: Option<f64>,
    pub max_top_x: Option<f64>,
    pub avg_top_x: Option<f64>,
    pub median_top_x: Option<f64>,
    pub range_top_x: Option<f64>,
    pub std_dev_top_x: Option<f64>,
    /// count of parcels in the tract, always reported
    pub num_parcels: usize,
}

impl TopXSummary {
    pub fn empty(num_parcels: usize) -> TopXSummary {
        TopXSummary {
            num_parcels,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top_x_values.is_empty()
    }
}
