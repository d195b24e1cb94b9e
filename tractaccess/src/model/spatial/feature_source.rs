use super::{AttributeValue, FeatureLayer, SpatialError, SpatialFeature};
use crate::model::crs::{parse_prj, CoordinateSystem};
use geo::Geometry;
use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use shapefile::Shape;
use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    str::FromStr,
};

/// a vector dataset on disk. features are always returned in NAD83 lon/lat.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum FeatureSource {
    /// an ESRI shapefile. the coordinate system is read from the `.prj`
    /// sidecar unless an EPSG code is given.
    Shapefile {
        file: PathBuf,
        #[serde(default)]
        epsg: Option<u32>,
    },
    /// a GeoJSON FeatureCollection in lon/lat degrees
    GeoJson { file: PathBuf },
}

impl FeatureSource {
    /// picks the source type from the file extension
    pub fn from_path(file: &Path, epsg: Option<u32>) -> FeatureSource {
        match file.extension().and_then(|e| e.to_str()) {
            Some("geojson") | Some("json") => FeatureSource::GeoJson {
                file: file.to_path_buf(),
            },
            _ => FeatureSource::Shapefile {
                file: file.to_path_buf(),
                epsg,
            },
        }
    }

    pub fn file(&self) -> &Path {
        match self {
            FeatureSource::Shapefile { file, .. } => file,
            FeatureSource::GeoJson { file } => file,
        }
    }

    pub fn read(&self) -> Result<FeatureLayer, SpatialError> {
        match self {
            FeatureSource::Shapefile { file, epsg } => read_shapefile(file, *epsg),
            FeatureSource::GeoJson { file } => read_geojson(file),
        }
    }
}

fn source_crs(path: &Path, epsg: Option<u32>) -> Result<CoordinateSystem, SpatialError> {
    if let Some(code) = epsg {
        return CoordinateSystem::from_epsg(code);
    }
    let prj_path = path.with_extension("prj");
    if !prj_path.exists() {
        log::warn!(
            "no .prj found for '{}', assuming geographic coordinates",
            path.display()
        );
        return Ok(CoordinateSystem::Geographic);
    }
    let wkt = std::fs::read_to_string(&prj_path).map_err(|e| SpatialError::Io {
        path: prj_path.to_string_lossy().to_string(),
        source: e,
    })?;
    parse_prj(&wkt)
}

/// reads geometries and attribute records from a shapefile source
fn read_shapefile(path: &Path, epsg: Option<u32>) -> Result<FeatureLayer, SpatialError> {
    let filepath = path.to_string_lossy().to_string();
    let crs = source_crs(path, epsg)?;
    log::debug!("reading '{filepath}' with coordinate system {crs}");
    let reprojection = crs.reprojection()?;
    let rows = shapefile::read(path).map_err(|e| SpatialError::ShapefileRead {
        path: filepath.clone(),
        source: e,
    })?;

    let mut fields = BTreeSet::new();
    let mut features = Vec::with_capacity(rows.len());
    for (row, (shape, record)) in rows.into_iter().enumerate() {
        let geometry = match shape_to_geometry(&filepath, row, shape)? {
            Some(g) => match &reprojection {
                Some(r) => r.reproject(g)?,
                None => g,
            },
            None => {
                log::debug!("skipping null shape at row {row} of '{filepath}'");
                continue;
            }
        };
        let attributes = record
            .into_iter()
            .map(|(name, value)| {
                fields.insert(name.clone());
                (name, AttributeValue::from(value))
            })
            .collect::<BTreeMap<_, _>>();
        features.push(SpatialFeature {
            row,
            geometry,
            attributes,
        });
    }
    Ok(FeatureLayer {
        name: filepath,
        fields: fields.into_iter().collect(),
        features,
    })
}

fn shape_to_geometry(
    filepath: &str,
    row: usize,
    shape: Shape,
) -> Result<Option<Geometry<f64>>, SpatialError> {
    let unexpected = |shape: &Shape| SpatialError::UnsupportedGeometry {
        path: filepath.to_string(),
        row,
        found: shape.shapetype().to_string(),
        expected: "point or polygon",
    };
    let conversion = |e: String| SpatialError::UnsupportedGeometry {
        path: filepath.to_string(),
        row,
        found: e,
        expected: "valid point or polygon",
    };
    let geometry = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => Geometry::Point(p.into()),
        Shape::PointM(p) => Geometry::Point(p.into()),
        Shape::PointZ(p) => Geometry::Point(p.into()),
        Shape::Multipoint(mp) => {
            let mp: geo::MultiPoint<f64> = mp.try_into().map_err(|e| conversion(format!("{e}")))?;
            Geometry::MultiPoint(mp)
        }
        Shape::MultipointM(mp) => {
            let mp: geo::MultiPoint<f64> = mp.try_into().map_err(|e| conversion(format!("{e}")))?;
            Geometry::MultiPoint(mp)
        }
        Shape::Polygon(generic_polygon) => {
            let mp: geo::MultiPolygon<f64> = generic_polygon
                .try_into()
                .map_err(|e| conversion(format!("{e}")))?;
            Geometry::MultiPolygon(mp)
        }
        Shape::PolygonM(generic_polygon) => {
            let mp: geo::MultiPolygon<f64> = generic_polygon
                .try_into()
                .map_err(|e| conversion(format!("{e}")))?;
            Geometry::MultiPolygon(mp)
        }
        Shape::PolygonZ(generic_polygon) => {
            let mp: geo::MultiPolygon<f64> = generic_polygon
                .try_into()
                .map_err(|e| conversion(format!("{e}")))?;
            Geometry::MultiPolygon(mp)
        }
        other => return Err(unexpected(&other)),
    };
    Ok(Some(geometry))
}

/// reads a GeoJSON FeatureCollection
fn read_geojson(path: &Path) -> Result<FeatureLayer, SpatialError> {
    let filepath = path.to_string_lossy().to_string();
    let geojson_error = |message: String| SpatialError::GeoJsonRead {
        path: filepath.clone(),
        message,
    };
    let contents = std::fs::read_to_string(path).map_err(|e| SpatialError::Io {
        path: filepath.clone(),
        source: e,
    })?;
    let collection = match GeoJson::from_str(&contents).map_err(|e| geojson_error(e.to_string()))? {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(geojson_error(String::from(
                "expected a FeatureCollection at the root",
            )))
        }
    };

    let mut fields = BTreeSet::new();
    let mut features = Vec::with_capacity(collection.features.len());
    for (row, feature) in collection.features.into_iter().enumerate() {
        let geometry: Geometry<f64> = match feature.geometry {
            Some(g) => g
                .try_into()
                .map_err(|e: geojson::Error| geojson_error(format!("row {row}: {e}")))?,
            None => {
                log::debug!("skipping feature without geometry at row {row} of '{filepath}'");
                continue;
            }
        };
        let attributes = feature
            .properties
            .unwrap_or_default()
            .iter()
            .map(|(k, v)| {
                fields.insert(k.clone());
                (k.clone(), AttributeValue::from_json(v))
            })
            .collect::<BTreeMap<_, _>>();
        features.push(SpatialFeature {
            row,
            geometry,
            attributes,
        });
    }
    Ok(FeatureLayer {
        name: filepath,
        fields: fields.into_iter().collect(),
        features,
    })
}
