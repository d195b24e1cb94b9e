use super::OutputFormat;
use crate::{
    app::prep::PrepError,
    config::ConfigError,
    model::{spatial::SpatialError, table::TableError},
};

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("failed rendering plot: {0}")]
    Render(String),
    #[error("no {0} backend is available")]
    UnsupportedFormat(OutputFormat),
    #[error("input file '{path}' not found, run the `{stage}` stage first")]
    MissingInput { path: String, stage: String },
    #[error("no Option number found in '{0}', expected a name like 'Option3_aggregated_...'")]
    NoOptionNumber(String),
    #[error("file '{path}' has no column '{column}'")]
    MissingColumn { path: String, column: String },
    #[error("column '{column}' of '{path}' has no numeric values")]
    NoValues { path: String, column: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Prep(#[from] PrepError),
    #[error(transparent)]
    Spatial(#[from] SpatialError),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// maps any drawing area failure into a [`PlotError`]
pub fn render_error<E: std::fmt::Display>(error: E) -> PlotError {
    PlotError::Render(error.to_string())
}
