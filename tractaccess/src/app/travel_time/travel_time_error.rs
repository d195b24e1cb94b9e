use crate::model::{routing::RoutingError, table::TableError};
use tractaccess_core::model::ModelError;

#[derive(thiserror::Error, Debug)]
pub enum TravelTimeError {
    #[error("input file '{path}' not found, run the `{stage}` stage first")]
    MissingInput { path: String, stage: String },
    #[error("origin file '{0}' has no rows")]
    NoOrigins(String),
    #[error("hospital file '{0}' has no rows")]
    NoHospitals(String),
    #[error("routing engine returned {found} records for {expected} origin-hospital pairs")]
    IncompleteMatrix { expected: usize, found: usize },
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
