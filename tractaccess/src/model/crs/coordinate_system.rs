use super::Reprojection;
use crate::model::spatial::SpatialError;
use std::fmt::Display;

/// proj definition of the target system, NAD83 lon/lat
pub const NAD83_DEFINITION: &str = "+proj=longlat +ellps=GRS80 +no_defs";

const WEB_MERCATOR_DEFINITION: &str =
    "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs";
const NC_STATE_PLANE_METRES: &str = "+proj=lcc +lat_1=36.16666666666666 +lat_2=34.33333333333334 +lat_0=33.75 +lon_0=-79 +x_0=609601.22 +y_0=0 +ellps=GRS80 +units=m +no_defs";
const NC_STATE_PLANE_FEET: &str = "+proj=lcc +lat_1=36.16666666666666 +lat_2=34.33333333333334 +lat_0=33.75 +lon_0=-79 +x_0=609601.22 +y_0=0 +ellps=GRS80 +units=us-ft +no_defs";

/// the coordinate reference system of a source dataset. projected systems
/// carry a proj definition string that [`Reprojection`] hands to proj4rs.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateSystem {
    /// NAD83 or WGS84 lon/lat degrees. the datum shift between the two is
    /// below the precision of this analysis.
    Geographic,
    Projected { name: String, definition: String },
}

impl CoordinateSystem {
    /// the systems the pipeline knows by code. anything else needs a `.prj`.
    pub fn from_epsg(code: u32) -> Result<CoordinateSystem, SpatialError> {
        let definition = match code {
            4269 | 4326 | 4152 => return Ok(CoordinateSystem::Geographic),
            3857 | 900913 => WEB_MERCATOR_DEFINITION,
            2264 => NC_STATE_PLANE_FEET,
            32119 => NC_STATE_PLANE_METRES,
            other => return Err(SpatialError::UnsupportedCrs(format!("EPSG:{other}"))),
        };
        Ok(CoordinateSystem::Projected {
            name: format!("EPSG:{code}"),
            definition: definition.to_string(),
        })
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, CoordinateSystem::Geographic)
    }

    /// the conversion to NAD83 lon/lat, or `None` when coordinates are
    /// already geographic
    pub fn reprojection(&self) -> Result<Option<Reprojection>, SpatialError> {
        match self {
            CoordinateSystem::Geographic => Ok(None),
            CoordinateSystem::Projected { definition, .. } => {
                Reprojection::to_nad83(definition).map(Some)
            }
        }
    }
}

impl Display for CoordinateSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateSystem::Geographic => write!(f, "geographic"),
            CoordinateSystem::Projected { name, definition } => write!(f, "{name} ({definition})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{point, Geometry, Point};

    #[test]
    fn test_from_epsg() {
        assert!(CoordinateSystem::from_epsg(4269).unwrap().is_geographic());
        assert!(CoordinateSystem::from_epsg(4269)
            .unwrap()
            .reprojection()
            .unwrap()
            .is_none());
        match CoordinateSystem::from_epsg(2264).unwrap() {
            CoordinateSystem::Projected { name, definition } => {
                assert_eq!(name, "EPSG:2264");
                assert!(definition.contains("+units=us-ft"));
            }
            other => panic!("unexpected {other}"),
        }
        assert!(matches!(
            CoordinateSystem::from_epsg(27700),
            Err(SpatialError::UnsupportedCrs(_))
        ));
    }

    #[test]
    fn test_reproject_state_plane_point() {
        let reprojection = CoordinateSystem::from_epsg(32119)
            .unwrap()
            .reprojection()
            .unwrap()
            .unwrap();
        let g = Geometry::Point(point! { x: 642310.1140, y: 225206.9923 });
        let p: Point = reprojection.reproject(g).unwrap().try_into().unwrap();
        assert_relative_eq!(p.x(), -78.6382, epsilon = 1e-5);
        assert_relative_eq!(p.y(), 35.7796, epsilon = 1e-5);
    }

    #[test]
    fn test_state_plane_feet_matches_metres() {
        let feet = CoordinateSystem::from_epsg(2264)
            .unwrap()
            .reprojection()
            .unwrap()
            .unwrap();
        let us_foot = 1200.0 / 3937.0;
        let g = Geometry::Point(point! { x: 642310.1140 / us_foot, y: 225206.9923 / us_foot });
        let p: Point = feet.reproject(g).unwrap().try_into().unwrap();
        assert_relative_eq!(p.x(), -78.6382, epsilon = 1e-5);
        assert_relative_eq!(p.y(), 35.7796, epsilon = 1e-5);
    }

    #[test]
    fn test_web_mercator_point() {
        let reprojection = CoordinateSystem::from_epsg(3857)
            .unwrap()
            .reprojection()
            .unwrap()
            .unwrap();
        // Raleigh, NC
        let g = Geometry::Point(point! { x: -8753995.0, y: 4268730.0 });
        let p: Point = reprojection.reproject(g).unwrap().try_into().unwrap();
        assert_relative_eq!(p.x(), -78.63848, epsilon = 1e-4);
        assert_relative_eq!(p.y(), 35.76789, epsilon = 1e-4);
    }
}
