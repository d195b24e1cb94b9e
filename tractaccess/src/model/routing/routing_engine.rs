use super::{MatrixRequest, RoutingError};
use tractaccess_core::model::TravelTimeRecord;

/// computes travel times over a road network built by
/// [`super::RoutingEngineConfig::build`]. the call blocks until the whole
/// matrix is available.
pub trait RoutingEngine: Send + Sync {
    fn name(&self) -> &str;

    /// one record per (from, to) pair. unreachable pairs carry no travel time.
    fn travel_time_matrix(
        &self,
        request: &MatrixRequest,
    ) -> Result<Vec<TravelTimeRecord>, RoutingError>;
}
