use super::PrepError;
use crate::model::spatial::{FeatureLayer, SpatialFeature};
use geo::{Geometry, MultiPolygon};
use tractaccess_core::model::{ShapeMetrics, Tract, TractArena, TractId};

pub const COUNTY_FIELD: &str = "COUNTY";

/// the tracts of one county with the polygons used for the parcel join
pub struct CountyTracts {
    pub arena: TractArena,
    pub polygons: Vec<(TractId, MultiPolygon<f64>)>,
}

/// filters the tract layer to the rows whose `COUNTY` equals `label` and
/// builds the arena, assigning tract ids in row order of the filtered layer.
pub fn load_tracts(layer: &FeatureLayer, label: &str) -> Result<CountyTracts, PrepError> {
    layer.require_field(COUNTY_FIELD)?;
    let selected = layer
        .features
        .iter()
        .filter(|f| f.text(COUNTY_FIELD).as_deref() == Some(label))
        .map(|f| {
            let polygon = to_multipolygon(f)?;
            let centroid = f.location().ok_or_else(|| PrepError::InvalidTractGeometry {
                row: f.row,
                message: String::from("empty geometry has no centroid"),
            })?;
            Ok((f, polygon, centroid))
        })
        .collect::<Result<Vec<_>, PrepError>>()?;
    log::info!(
        "tracts before county filter: {}, after: {}",
        layer.len(),
        selected.len()
    );
    if selected.is_empty() {
        return Err(PrepError::EmptyTracts {
            path: layer.name.clone(),
            field: COUNTY_FIELD.to_string(),
            label: label.to_string(),
        });
    }

    let (rows, shapes): (Vec<_>, Vec<_>) = selected
        .into_iter()
        .map(|(feature, polygon, centroid)| ((feature, centroid), polygon))
        .unzip();
    let arena = TractArena::from_rows(rows, |id, (feature, centroid)| {
        tract_from_feature(id, feature, centroid.y(), centroid.x())
    });
    let polygons = arena.iter().map(|t| t.id).zip(shapes).collect();
    Ok(CountyTracts { arena, polygons })
}

fn tract_from_feature(id: TractId, f: &SpatialFeature, latitude: f64, longitude: f64) -> Tract {
    Tract {
        id,
        source_index: f.row,
        object_id: f.integer("OBJECTID"),
        latitude,
        longitude,
        e_noveh: f.number("E_NOVEH"),
        m_noveh: f.number("M_NOVEH"),
        shape_metrics: ShapeMetrics {
            area: f.number("area"),
            perimeter: f.number("perimeter"),
            pp_score_n: f.number("pp_score_n"),
            schwartz_n: f.number("schwartz_n"),
        },
    }
}

fn to_multipolygon(f: &SpatialFeature) -> Result<MultiPolygon<f64>, PrepError> {
    match &f.geometry {
        Geometry::MultiPolygon(mp) => Ok(mp.clone()),
        Geometry::Polygon(p) => Ok(MultiPolygon(vec![p.clone()])),
        _ => Err(PrepError::InvalidTractGeometry {
            row: f.row,
            message: String::from("tracts must be polygons"),
        }),
    }
}
