use super::{MatrixRequest, RoutingEngine, RoutingError};
use geo::{line_string, Haversine, Length};
use rayon::prelude::*;
use tractaccess_core::model::{Origin, TravelTimeRecord};

const METERS_PER_MILE: f64 = 1609.344;

/// travel time estimate from great-circle distance. used for offline runs
/// and tests, it is not a routing algorithm.
pub struct CrowFlyEngine {
    circuity_factor: f64,
    speed_mph: f64,
}

impl CrowFlyEngine {
    pub fn new(circuity_factor: f64, speed_mph: f64) -> CrowFlyEngine {
        CrowFlyEngine {
            circuity_factor,
            speed_mph,
        }
    }

    /// minutes between two points
    pub fn travel_time(&self, a: &Origin, b: &Origin) -> f64 {
        let meters = Haversine.length(&line_string![
            (x: a.longitude, y: a.latitude),
            (x: b.longitude, y: b.latitude),
        ]);
        let miles = meters / METERS_PER_MILE * self.circuity_factor;
        miles / self.speed_mph * 60.0
    }
}

impl RoutingEngine for CrowFlyEngine {
    fn name(&self) -> &str {
        "crow_fly"
    }

    fn travel_time_matrix(
        &self,
        request: &MatrixRequest,
    ) -> Result<Vec<TravelTimeRecord>, RoutingError> {
        let records = request
            .from
            .par_iter()
            .flat_map_iter(|from| {
                request.to.iter().map(move |to| {
                    let t = self.travel_time(from, to);
                    TravelTimeRecord {
                        from_id: from.id,
                        to_id: to.id,
                        travel_time: Some(t).filter(|t| t.is_finite()),
                    }
                })
            })
            .collect();
        Ok(records)
    }
}
