//! reading and writing the vector datasets of the pipeline (shapefiles with
//! dbase attribute tables, GeoJSON) and point-in-polygon lookups over tracts.
mod attribute_value;
mod feature_source;
mod feature_writer;
mod spatial_error;
mod spatial_feature;
mod tract_index;

pub use attribute_value::AttributeValue;
pub use feature_source::FeatureSource;
pub use feature_writer::{write_geojson, PointShapefileWriter, ShapefileField};
pub use spatial_error::SpatialError;
pub use spatial_feature::{FeatureLayer, SpatialFeature};
pub use tract_index::TractIndex;
