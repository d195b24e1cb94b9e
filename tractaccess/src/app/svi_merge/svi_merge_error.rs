use crate::model::{spatial::SpatialError, table::TableError};

#[derive(thiserror::Error, Debug)]
pub enum SviMergeError {
    #[error("column '{column}' not found in '{path}', available columns: {available}")]
    MissingIdColumn {
        path: String,
        column: String,
        available: String,
    },
    #[error("could not find a GEOID column in '{path}', available columns: {available}")]
    NoGeoidColumn { path: String, available: String },
    #[error("failure creating directory '{path}': {source}")]
    Directory {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Spatial(#[from] SpatialError),
    #[error(transparent)]
    Table(#[from] TableError),
}
