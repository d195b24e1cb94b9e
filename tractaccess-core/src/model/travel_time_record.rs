use serde::{Deserialize, Serialize};

/// one origin-destination pair of a travel time matrix, in minutes. the routing
/// engine is queried with hospitals as `from` and residences as `to`, so
/// `to_id` is the residence (or tract) the record belongs to.
/// `travel_time` is empty when the pair is unreachable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TravelTimeRecord {
    pub from_id: u64,
    pub to_id: u64,
    pub travel_time: Option<f64>,
}

impl TravelTimeRecord {
    pub fn reachable_time(&self) -> Option<f64> {
        self.travel_time.filter(|t| t.is_finite())
    }
}
