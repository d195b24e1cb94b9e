use super::TableError;
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::HashMap, path::Path};
use tractaccess_core::model::Origin;

/// writes serializable rows with a header, returning the row count
pub fn write_rows<T: Serialize>(
    path: &Path,
    rows: impl IntoIterator<Item = T>,
) -> Result<usize, TableError> {
    let write_error = |e: csv::Error| TableError::Write {
        path: path.to_string_lossy().to_string(),
        message: e.to_string(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(write_error)?;
    let mut n = 0;
    for row in rows {
        writer.serialize(row).map_err(write_error)?;
        n += 1;
    }
    writer.flush().map_err(|e| TableError::Write {
        path: path.to_string_lossy().to_string(),
        message: e.to_string(),
    })?;
    Ok(n)
}

pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, TableError> {
    let filepath = path.to_string_lossy().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|e| TableError::Read {
        path: filepath.clone(),
        message: e.to_string(),
    })?;
    reader
        .deserialize::<T>()
        .enumerate()
        .map(|(row, r)| {
            r.map_err(|e| TableError::Read {
                path: filepath.clone(),
                message: format!("row {row}: {e}"),
            })
        })
        .collect()
}

/// column name to column position
pub fn header_lookup(headers: &csv::StringRecord) -> HashMap<&str, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, s)| (s, i))
        .collect::<HashMap<_, _>>()
}

/// reads a point set whose identifier lives in `id_column`
pub fn read_origins(path: &Path, id_column: &str) -> Result<Vec<Origin>, TableError> {
    let filepath = path.to_string_lossy().to_string();
    let read_error = |e: csv::Error| TableError::Read {
        path: filepath.clone(),
        message: e.to_string(),
    };
    let mut reader = csv::Reader::from_path(path).map_err(read_error)?;
    let header_record = reader.headers().map_err(read_error)?.clone();
    let headers = header_lookup(&header_record);
    let column = |name: &str| {
        headers
            .get(name)
            .copied()
            .ok_or_else(|| TableError::MissingColumn {
                path: filepath.clone(),
                column: name.to_string(),
            })
    };
    let id_idx = column(id_column)?;
    let lat_idx = column("latitude")?;
    let lon_idx = column("longitude")?;

    let mut origins = vec![];
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(read_error)?;
        let value = |idx: usize, name: &str| -> Result<f64, TableError> {
            let cell = record.get(idx).unwrap_or_default();
            parse_float(cell)
                .and_then(|v| v.ok_or_else(|| String::from("empty value")))
                .map_err(|message| TableError::InvalidValue {
                    path: filepath.clone(),
                    row,
                    column: name.to_string(),
                    message,
                })
        };
        let id = value(id_idx, id_column)?;
        if id < 0.0 || id.fract() != 0.0 {
            return Err(TableError::InvalidValue {
                path: filepath.clone(),
                row,
                column: id_column.to_string(),
                message: format!("identifier must be a non-negative integer, found {id}"),
            });
        }
        origins.push(Origin::new(
            id as u64,
            value(lat_idx, "latitude")?,
            value(lon_idx, "longitude")?,
        ));
    }
    Ok(origins)
}

/// float cell. empty and NaN cells are missing values.
pub fn parse_float(cell: &str) -> Result<Option<f64>, String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value = trimmed
        .parse::<f64>()
        .map_err(|e| format!("'{trimmed}' is not a number: {e}"))?;
    Ok(Some(value).filter(|v| !v.is_nan()))
}

/// renders a float the way the tables have always spelled them ("12.0")
pub fn format_float(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{v:?}"),
        _ => String::new(),
    }
}

/// "[12.0, 7.5]"
pub fn format_list(values: &[f64]) -> String {
    let inner = values
        .iter()
        .map(|v| format!("{v:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{inner}]")
}

/// inverse of [`format_list`]. an empty cell is an empty list.
pub fn parse_list(cell: &str) -> Result<Vec<f64>, String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(vec![]);
    }
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("'{trimmed}' is not a list"))?;
    inner
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|e| format!("list value '{s}' is not a number: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lists() {
        assert_eq!(format_list(&[12.0, 7.5]), "[12.0, 7.5]");
        assert_eq!(parse_list("[12.0, 7.5]").unwrap(), vec![12.0, 7.5]);
        assert_eq!(parse_list("[]").unwrap(), Vec::<f64>::new());
        assert_eq!(parse_list("").unwrap(), Vec::<f64>::new());
        assert!(parse_list("12.0").is_err());
    }

    #[test]
    fn test_floats() {
        assert_eq!(format_float(Some(12.0)), "12.0");
        assert_eq!(format_float(None), "");
        assert_eq!(parse_float(" 3.25").unwrap(), Some(3.25));
        assert_eq!(parse_float("NaN").unwrap(), None);
        assert!(parse_float("abc").is_err());
    }

    #[test]
    fn test_read_origins_by_id_column() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "county_index,latitude,longitude").unwrap();
        writeln!(file, "1,36.05,-79.81").unwrap();
        writeln!(file, "2,36.10,-79.75").unwrap();
        let origins = read_origins(file.path(), "county_index").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[1].id, 2);
        assert_eq!(origins[1].longitude, -79.75);
        assert!(matches!(
            read_origins(file.path(), "poly_idx"),
            Err(TableError::MissingColumn { .. })
        ));
    }
}
