use crate::{
    config::ConfigError,
    model::{spatial::SpatialError, table::TableError},
};
use tractaccess_core::model::ModelError;

#[derive(thiserror::Error, Debug)]
pub enum PrepError {
    #[error("no land use rules for county '{county}', add it to the rule table (known counties: {known})")]
    UnknownCounty { county: String, known: String },
    #[error("no tracts in '{path}' have {field} == '{label}', check the county naming convention")]
    EmptyTracts {
        path: String,
        field: String,
        label: String,
    },
    #[error("none of the {before} parcels in '{path}' match the land use rules of {county}")]
    EmptyParcels {
        path: String,
        county: String,
        before: usize,
    },
    #[error("none of the {residential} residential parcels of {county} fall inside a tract")]
    NoMatchedParcels { county: String, residential: usize },
    #[error("no hospitals of '{path}' lie within {radius_miles} miles of the county center")]
    EmptyHospitals { path: String, radius_miles: f64 },
    #[error("tract at row {row} has an unusable geometry: {message}")]
    InvalidTractGeometry { row: usize, message: String },
    #[error("failure creating directory '{path}': {source}")]
    Directory {
        path: String,
        source: std::io::Error,
    },
    #[error("failed building progress bar: {0}")]
    Progress(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Spatial(#[from] SpatialError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Model(#[from] ModelError),
}
