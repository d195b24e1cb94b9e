use super::SpatialError;
use geo::Geometry;
use geojson::{FeatureCollection, GeoJson};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// ESRI well-known text of NAD83 geographic coordinates, written next to
/// every shapefile this crate produces
const NAD83_PRJ: &str = r#"GEOGCS["GCS_North_American_1983",DATUM["D_North_American_1983",SPHEROID["GRS_1980",6378137.0,298.257222101]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

/// writes features as a GeoJSON FeatureCollection, returning the number of
/// features written
pub fn write_geojson(
    path: &Path,
    features: impl IntoIterator<Item = (Geometry<f64>, serde_json::Map<String, serde_json::Value>)>,
) -> Result<usize, SpatialError> {
    let features = features
        .into_iter()
        .map(|(geometry, properties)| geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::from(&geometry)),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        })
        .collect::<Vec<_>>();
    let n = features.len();
    let gj = GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    });
    let io_error = |e: std::io::Error| SpatialError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &gj).map_err(|e| io_error(e.into()))?;
    writer.flush().map_err(io_error)?;
    Ok(n)
}

/// a dbase column of a point shapefile
#[derive(Debug, Clone, PartialEq)]
pub enum ShapefileField {
    Character { name: String, length: u8 },
    Numeric { name: String, length: u8, decimals: u8 },
}

impl ShapefileField {
    pub fn name(&self) -> &str {
        match self {
            ShapefileField::Character { name, .. } => name,
            ShapefileField::Numeric { name, .. } => name,
        }
    }
}

/// writes point features with a fixed attribute schema, plus a NAD83 `.prj`
pub struct PointShapefileWriter {
    path: String,
    fields: Vec<ShapefileField>,
    writer: shapefile::Writer<BufWriter<File>>,
    count: usize,
}

impl PointShapefileWriter {
    pub fn create(path: &Path, fields: Vec<ShapefileField>) -> Result<Self, SpatialError> {
        let filepath = path.to_string_lossy().to_string();
        let mut builder = TableWriterBuilder::new();
        for field in fields.iter() {
            let name = FieldName::try_from(field.name()).map_err(|e| {
                SpatialError::InvalidFieldValue {
                    field: field.name().to_string(),
                    row: 0,
                    message: format!("{e:?}"),
                }
            })?;
            builder = match field {
                ShapefileField::Character { length, .. } => {
                    builder.add_character_field(name, *length)
                }
                ShapefileField::Numeric {
                    length, decimals, ..
                } => builder.add_numeric_field(name, *length, *decimals),
            };
        }
        let writer = shapefile::Writer::from_path(path, builder).map_err(|e| {
            SpatialError::ShapefileWrite {
                path: filepath.clone(),
                source: e,
            }
        })?;
        let prj_path = path.with_extension("prj");
        std::fs::write(&prj_path, NAD83_PRJ).map_err(|e| SpatialError::Io {
            path: prj_path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(PointShapefileWriter {
            path: filepath,
            fields,
            writer,
            count: 0,
        })
    }

    /// writes one point. `values` are given in schema order; `None` writes
    /// an empty value.
    pub fn write(
        &mut self,
        longitude: f64,
        latitude: f64,
        values: &[Option<String>],
    ) -> Result<(), SpatialError> {
        let mut record = Record::default();
        for (idx, field) in self.fields.iter().enumerate() {
            let value = values.get(idx).cloned().flatten();
            let field_value = match field {
                ShapefileField::Character { .. } => FieldValue::Character(value),
                ShapefileField::Numeric { name, .. } => {
                    let number = value
                        .map(|v| {
                            v.parse::<f64>().map_err(|e| SpatialError::InvalidFieldValue {
                                field: name.clone(),
                                row: self.count,
                                message: e.to_string(),
                            })
                        })
                        .transpose()?;
                    FieldValue::Numeric(number)
                }
            };
            record.insert(field.name().to_string(), field_value);
        }
        let point = shapefile::Point::new(longitude, latitude);
        self.writer
            .write_shape_and_record(&point, &record)
            .map_err(|e| SpatialError::ShapefileWrite {
                path: self.path.clone(),
                source: e,
            })?;
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// closes the file, completing the shapefile header
    pub fn finish(self) -> usize {
        self.count
    }
}
