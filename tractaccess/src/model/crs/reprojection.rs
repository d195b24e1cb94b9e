use super::coordinate_system::NAD83_DEFINITION;
use crate::model::spatial::SpatialError;
use geo::{Coord, Geometry, MapCoords};
use proj4rs::{transform::transform, Proj};

/// converts projected coordinates to NAD83 lon/lat degrees
pub struct Reprojection {
    source: Proj,
    target: Proj,
}

impl Reprojection {
    pub fn to_nad83(definition: &str) -> Result<Reprojection, SpatialError> {
        let source = Proj::from_proj_string(definition)
            .map_err(|e| SpatialError::UnsupportedCrs(format!("{definition}: {e}")))?;
        let target = Proj::from_proj_string(NAD83_DEFINITION)
            .map_err(|e| SpatialError::UnsupportedCrs(format!("{NAD83_DEFINITION}: {e}")))?;
        Ok(Reprojection { source, target })
    }

    pub fn to_geographic(&self, c: Coord) -> Result<Coord, SpatialError> {
        let mut point = (c.x, c.y, 0.0);
        transform(&self.source, &self.target, &mut point).map_err(|e| {
            SpatialError::Reprojection {
                x: c.x,
                y: c.y,
                message: e.to_string(),
            }
        })?;
        // geographic output is in radians
        Ok(Coord::from((point.0.to_degrees(), point.1.to_degrees())))
    }

    /// the geometry in NAD83 lon/lat degrees
    pub fn reproject(&self, geometry: Geometry<f64>) -> Result<Geometry<f64>, SpatialError> {
        geometry.try_map_coords(|c| self.to_geographic(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Contains, Point};

    #[test]
    fn test_polygon_keeps_its_shape() {
        let reprojection = Reprojection::to_nad83(
            "+proj=lcc +lat_1=36.16666666666666 +lat_2=34.33333333333334 +lat_0=33.75 +lon_0=-79 +x_0=609601.22 +y_0=0 +ellps=GRS80 +units=m +no_defs",
        )
        .unwrap();
        let square = Geometry::Polygon(polygon![
            (x: 640000.0, y: 220000.0),
            (x: 645000.0, y: 220000.0),
            (x: 645000.0, y: 230000.0),
            (x: 640000.0, y: 230000.0),
        ]);
        let square = match reprojection.reproject(square).unwrap() {
            Geometry::Polygon(p) => p,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(square.exterior().0.len(), 5);
        assert!(square.contains(&Point::new(-78.6382, 35.7796)));
    }

    #[test]
    fn test_bad_definition() {
        assert!(matches!(
            Reprojection::to_nad83("+proj=not_a_projection"),
            Err(SpatialError::UnsupportedCrs(_))
        ));
    }
}
