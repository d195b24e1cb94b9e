use super::{
    aggregate::AggregationError, plot::PlotError, prep::PrepError, svi_merge::SviMergeError,
    travel_time::TravelTimeError,
};
use crate::{
    config::ConfigError,
    model::{routing::RoutingError, spatial::SpatialError, table::TableError},
};
use tractaccess_core::model::ModelError;

/// any failure of a pipeline stage, as reported by the command line
#[derive(thiserror::Error, Debug)]
pub enum TractAccessError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Spatial(#[from] SpatialError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Prep(#[from] PrepError),
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error(transparent)]
    TravelTime(#[from] TravelTimeError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error(transparent)]
    SviMerge(#[from] SviMergeError),
}
