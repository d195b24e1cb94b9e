//! coordinate reference systems of the input datasets and their conversion
//! to NAD83 geographic coordinates (EPSG:4269), the system every join runs in.
mod coordinate_system;
mod prj;
mod reprojection;

pub use coordinate_system::CoordinateSystem;
pub use prj::parse_prj;
pub use reprojection::Reprojection;
