use super::{AttributeValue, SpatialError};
use geo::{Centroid, Geometry, Point};
use std::collections::BTreeMap;

/// a geometry with its attribute record, in NAD83 lon/lat degrees
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialFeature {
    /// position of the feature in its source file
    pub row: usize,
    pub geometry: Geometry<f64>,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl SpatialFeature {
    pub fn get(&self, field: &str) -> Option<&AttributeValue> {
        self.attributes.get(field)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(|v| v.as_f64())
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(|v| v.as_i64())
    }

    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).and_then(|v| v.as_text())
    }

    /// point location of the feature. polygons resolve to their centroid.
    pub fn location(&self) -> Option<Point<f64>> {
        match &self.geometry {
            Geometry::Point(p) => Some(*p),
            Geometry::MultiPoint(mp) if mp.0.len() == 1 => mp.0.first().copied(),
            other => other.centroid(),
        }
    }
}

/// all features of one source file
#[derive(Debug, Clone, Default)]
pub struct FeatureLayer {
    pub name: String,
    pub fields: Vec<String>,
    pub features: Vec<SpatialFeature>,
}

impl FeatureLayer {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn require_field(&self, field: &str) -> Result<(), SpatialError> {
        if self.has_field(field) {
            Ok(())
        } else {
            Err(SpatialError::MissingField {
                path: self.name.clone(),
                field: field.to_string(),
            })
        }
    }

    /// first field whose name contains `fragment`, ignoring case
    pub fn find_field(&self, fragment: &str) -> Option<&str> {
        let needle = fragment.to_uppercase();
        self.fields
            .iter()
            .find(|f| f.to_uppercase().contains(&needle))
            .map(|f| f.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{point, polygon};

    #[test]
    fn test_location_of_polygon_is_centroid() {
        let feature = SpatialFeature {
            row: 0,
            geometry: Geometry::Polygon(polygon![
                (x: 0.0, y: 0.0),
                (x: 2.0, y: 0.0),
                (x: 2.0, y: 2.0),
                (x: 0.0, y: 2.0),
            ]),
            attributes: BTreeMap::new(),
        };
        assert_eq!(feature.location(), Some(point! { x: 1.0, y: 1.0 }));
    }

    #[test]
    fn test_find_field() {
        let layer = FeatureLayer {
            name: String::from("tracts"),
            fields: vec![String::from("STATEFP"), String::from("GEOID20")],
            features: vec![],
        };
        assert_eq!(layer.find_field("geoid"), Some("GEOID20"));
        assert!(layer.require_field("COUNTY").is_err());
    }
}
