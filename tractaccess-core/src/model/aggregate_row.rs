use serde::{Deserialize, Serialize};

/// per-origin summary of travel times to all reachable hospitals
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub to_id: u64,
    pub min_travel_time: f64,
    /// empty when fewer than 2 hospitals are reachable
    pub second_min_travel_time: Option<f64>,
    /// empty when fewer than 3 hospitals are reachable
    pub third_min_travel_time: Option<f64>,
    pub median_travel_time: f64,
    pub average_travel_time: f64,
    pub q1_travel_time: f64,
    pub q3_travel_time: f64,
}
