use super::SviMergeError;
use crate::model::{
    spatial::{write_geojson, AttributeValue, FeatureSource},
    table::TableError,
};
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
};
use wkt::ToWkt;

/// census tract FIPS codes: 2 state + 3 county + 6 tract digits
pub const TRACT_ID_WIDTH: usize = 11;
const SAMPLE_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SviMergeRequest {
    pub shapefile: PathBuf,
    pub csv: PathBuf,
    pub output_directory: PathBuf,
    pub output_name: String,
    /// tract id column of the shapefile, the first field containing
    /// "GEOID" when not given
    pub shapefile_id_column: Option<String>,
    pub csv_id_column: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeSummary {
    pub merged: usize,
    pub attributes: usize,
    pub unmatched_tracts: usize,
    pub unmatched_records: usize,
    pub geojson: PathBuf,
    pub csv: PathBuf,
}

/// left-pads an identifier with zeros to [`TRACT_ID_WIDTH`] characters
pub fn pad_tract_id(id: &str) -> String {
    let trimmed = id.trim();
    format!("{trimmed:0>width$}", width = TRACT_ID_WIDTH)
}

struct SviTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

fn read_svi_table(path: &Path) -> Result<SviTable, TableError> {
    let filepath = path.to_string_lossy().to_string();
    let read_error = |e: csv::Error| TableError::Read {
        path: filepath.clone(),
        message: e.to_string(),
    };
    let mut reader = csv::Reader::from_path(path).map_err(read_error)?;
    let headers = reader
        .headers()
        .map_err(read_error)?
        .iter()
        .map(String::from)
        .collect::<Vec<_>>();
    let records = reader
        .records()
        .map(|r| {
            r.map(|record| record.iter().map(String::from).collect::<Vec<_>>())
                .map_err(read_error)
        })
        .collect::<Result<Vec<_>, TableError>>()?;
    Ok(SviTable { headers, records })
}

/// output column names. columns present on both sides get `_x` (shapefile)
/// and `_y` (table) suffixes, except a shared join column which is kept once.
fn merged_columns(
    shapefile_fields: &[String],
    csv_headers: &[String],
    shapefile_id: &str,
    csv_id: &str,
) -> (Vec<String>, Vec<Option<String>>) {
    let shared_key = shapefile_id == csv_id;
    let left = shapefile_fields.iter().collect::<HashSet<_>>();
    let right = csv_headers.iter().collect::<HashSet<_>>();
    let left_names = shapefile_fields
        .iter()
        .map(|f| {
            if right.contains(f) && !(shared_key && f == shapefile_id) {
                format!("{f}_x")
            } else {
                f.clone()
            }
        })
        .collect::<Vec<_>>();
    let right_names = csv_headers
        .iter()
        .map(|h| {
            if shared_key && h == csv_id {
                None
            } else if left.contains(h) {
                Some(format!("{h}_y"))
            } else {
                Some(h.clone())
            }
        })
        .collect::<Vec<_>>();
    (left_names, right_names)
}

fn unmatched_sample<'a>(
    ids: impl Iterator<Item = &'a String>,
    other: &HashSet<&String>,
) -> (usize, Vec<String>) {
    let unmatched = ids.filter(|id| !other.contains(id)).collect::<Vec<_>>();
    let sample = unmatched
        .iter()
        .take(SAMPLE_SIZE)
        .map(|s| s.to_string())
        .collect();
    (unmatched.len(), sample)
}

/// inner join of the tract polygons with the SVI table on zero-padded
/// identifiers, written as `{name}.geojson` and `{name}.csv` with a WKT
/// `geometry` column
pub fn run(request: &SviMergeRequest) -> Result<MergeSummary, SviMergeError> {
    let source = FeatureSource::from_path(&request.shapefile, None);
    let layer = source.read()?;
    log::info!(
        "loaded {} census tracts with columns {:?} from {}",
        layer.len(),
        layer.fields,
        request.shapefile.display()
    );
    let shapefile_path = request.shapefile.to_string_lossy().to_string();
    let shapefile_id = match &request.shapefile_id_column {
        Some(column) if layer.has_field(column) => column.clone(),
        Some(column) => {
            return Err(SviMergeError::MissingIdColumn {
                path: shapefile_path,
                column: column.clone(),
                available: layer.fields.join(", "),
            })
        }
        None => layer
            .find_field("GEOID")
            .map(String::from)
            .ok_or_else(|| SviMergeError::NoGeoidColumn {
                path: shapefile_path.clone(),
                available: layer.fields.join(", "),
            })?,
    };
    log::info!("tract identifier column of the shapefile: '{shapefile_id}'");

    let table = read_svi_table(&request.csv)?;
    log::info!(
        "loaded {} records with {} columns from {}",
        table.records.len(),
        table.headers.len(),
        request.csv.display()
    );
    let csv_id_idx = table
        .headers
        .iter()
        .position(|h| *h == request.csv_id_column)
        .ok_or_else(|| SviMergeError::MissingIdColumn {
            path: request.csv.to_string_lossy().to_string(),
            column: request.csv_id_column.clone(),
            available: table
                .headers
                .iter()
                .take(20)
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        })?;

    let tract_ids = layer
        .features
        .iter()
        .map(|f| pad_tract_id(&f.text(&shapefile_id).unwrap_or_default()))
        .collect::<Vec<_>>();
    let record_ids = table
        .records
        .iter()
        .map(|r| pad_tract_id(r.get(csv_id_idx).map(|s| s.as_str()).unwrap_or_default()))
        .collect::<Vec<_>>();
    let mut records_by_id: HashMap<&String, Vec<usize>> = HashMap::new();
    for (idx, id) in record_ids.iter().enumerate() {
        records_by_id.entry(id).or_default().push(idx);
    }

    let (left_names, right_names) = merged_columns(
        &layer.fields,
        &table.headers,
        &shapefile_id,
        &request.csv_id_column,
    );
    let mut columns = left_names.clone();
    columns.extend(right_names.iter().flatten().cloned());

    let mut merged = vec![];
    for (feature, id) in layer.features.iter().zip(tract_ids.iter()) {
        let matches = match records_by_id.get(id) {
            Some(m) => m,
            None => continue,
        };
        for record_idx in matches.iter() {
            let mut values: Vec<AttributeValue> = layer
                .fields
                .iter()
                .map(|f| {
                    if *f == shapefile_id {
                        AttributeValue::Text(id.clone())
                    } else {
                        feature.get(f).cloned().unwrap_or(AttributeValue::Null)
                    }
                })
                .collect();
            let record = &table.records[*record_idx];
            for (col_idx, name) in right_names.iter().enumerate() {
                if name.is_none() {
                    continue;
                }
                let value = if col_idx == csv_id_idx {
                    AttributeValue::Text(record_ids[*record_idx].clone())
                } else {
                    AttributeValue::from_csv(record.get(col_idx).map(|s| s.as_str()).unwrap_or_default())
                };
                values.push(value);
            }
            merged.push((feature.geometry.clone(), values));
        }
    }
    log::info!(
        "merged {} census tracts with {} attributes each on {shapefile_id} = {}",
        merged.len(),
        columns.len(),
        request.csv_id_column
    );

    let tract_set = tract_ids.iter().collect::<HashSet<_>>();
    let record_set = record_ids.iter().collect::<HashSet<_>>();
    let (unmatched_tracts, tract_sample) = unmatched_sample(tract_ids.iter(), &record_set);
    if unmatched_tracts > 0 {
        log::warn!("{unmatched_tracts} tracts in the shapefile are not in the table, sample ids: {tract_sample:?}");
    } else {
        log::info!("all shapefile tracts matched a table record");
    }
    let (unmatched_records, record_sample) = unmatched_sample(record_ids.iter(), &tract_set);
    if unmatched_records > 0 {
        log::warn!("{unmatched_records} table records are not in the shapefile, sample ids: {record_sample:?}");
    } else {
        log::info!("all table records matched a shapefile tract");
    }

    std::fs::create_dir_all(&request.output_directory).map_err(|e| SviMergeError::Directory {
        path: request.output_directory.to_string_lossy().to_string(),
        source: e,
    })?;
    let geojson_path = request
        .output_directory
        .join(format!("{}.geojson", request.output_name));
    let features = merged.iter().map(|(geometry, values)| {
        let properties = columns
            .iter()
            .zip(values.iter())
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        (geometry.clone(), properties)
    });
    let n = write_geojson(&geojson_path, features)?;
    log::info!("wrote {n} tracts to {}", geojson_path.display());

    let csv_path = request
        .output_directory
        .join(format!("{}.csv", request.output_name));
    let write_error = |e: csv::Error| TableError::Write {
        path: csv_path.to_string_lossy().to_string(),
        message: e.to_string(),
    };
    let mut writer = csv::Writer::from_path(&csv_path).map_err(write_error)?;
    let mut header = columns.clone();
    header.push(String::from("geometry"));
    writer.write_record(&header).map_err(write_error)?;
    for (geometry, values) in merged.iter() {
        let mut cells = values
            .iter()
            .map(|v| v.as_text().unwrap_or_default())
            .collect::<Vec<_>>();
        cells.push(geometry.wkt_string());
        writer.write_record(&cells).map_err(write_error)?;
    }
    writer.flush().map_err(|e| TableError::Write {
        path: csv_path.to_string_lossy().to_string(),
        message: e.to_string(),
    })?;
    log::info!("wrote {} tracts to {}", merged.len(), csv_path.display());

    Ok(MergeSummary {
        merged: merged.len(),
        attributes: columns.len(),
        unmatched_tracts,
        unmatched_records,
        geojson: geojson_path,
        csv: csv_path,
    })
}
