pub mod crs;
pub mod routing;
pub mod spatial;
pub mod table;
