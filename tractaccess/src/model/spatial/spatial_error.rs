#[derive(thiserror::Error, Debug)]
pub enum SpatialError {
    #[error("failed reading '{path}': {source}")]
    ShapefileRead {
        path: String,
        source: shapefile::Error,
    },
    #[error("failed writing '{path}': {source}")]
    ShapefileWrite {
        path: String,
        source: shapefile::Error,
    },
    #[error("failed reading '{path}': {message}")]
    GeoJsonRead { path: String, message: String },
    #[error("failure with file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("unexpected geometry type {found} at row {row} of '{path}', must be {expected}")]
    UnsupportedGeometry {
        path: String,
        row: usize,
        found: String,
        expected: &'static str,
    },
    #[error("field '{field}' missing from '{path}'")]
    MissingField { path: String, field: String },
    #[error("field '{field}' at row {row} has an invalid value: {message}")]
    InvalidFieldValue {
        field: String,
        row: usize,
        message: String,
    },
    #[error("unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),
    #[error("failed reprojecting ({x}, {y}): {message}")]
    Reprojection { x: f64, y: f64, message: String },
    #[error("failed decoding WKT geometry at row {row}: {message}")]
    Wkt { row: usize, message: String },
}
