use super::{format_float, parse_float, TableError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tractaccess_core::model::{ShapeMetrics, Tract, TractId};

/// a tract as written to `Option1_county_centroids.csv`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TractRow {
    #[serde(alias = "index")]
    pub source_index: usize,
    #[serde(rename = "OBJECTID")]
    pub object_id: Option<i64>,
    pub poly_idx: u32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "E_NOVEH")]
    pub e_noveh: Option<f64>,
    #[serde(rename = "M_NOVEH")]
    pub m_noveh: Option<f64>,
    pub area: Option<f64>,
    pub perimeter: Option<f64>,
    pub pp_score_n: Option<f64>,
    pub schwartz_n: Option<f64>,
}

impl TractRow {
    pub const COLUMNS: [&'static str; 11] = [
        "source_index",
        "OBJECTID",
        "poly_idx",
        "latitude",
        "longitude",
        "E_NOVEH",
        "M_NOVEH",
        "area",
        "perimeter",
        "pp_score_n",
        "schwartz_n",
    ];

    /// cells in [`TractRow::COLUMNS`] order
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.source_index.to_string(),
            self.object_id.map(|v| v.to_string()).unwrap_or_default(),
            self.poly_idx.to_string(),
            format_float(Some(self.latitude)),
            format_float(Some(self.longitude)),
            format_float(self.e_noveh),
            format_float(self.m_noveh),
            format_float(self.area),
            format_float(self.perimeter),
            format_float(self.pp_score_n),
            format_float(self.schwartz_n),
        ]
    }

    /// reads the [`TractRow::COLUMNS`] cells of a wider record
    pub fn from_record(
        path: &str,
        row: usize,
        headers: &HashMap<&str, usize>,
        record: &csv::StringRecord,
    ) -> Result<TractRow, TableError> {
        let cell = |column: &str| -> Result<String, TableError> {
            let idx = headers
                .get(column)
                .or_else(|| match column {
                    "source_index" => headers.get("index"),
                    _ => None,
                })
                .ok_or_else(|| TableError::MissingColumn {
                    path: path.to_string(),
                    column: column.to_string(),
                })?;
            Ok(record.get(*idx).unwrap_or_default().to_string())
        };
        let invalid = |column: &str, message: String| TableError::InvalidValue {
            path: path.to_string(),
            row,
            column: column.to_string(),
            message,
        };
        let float = |column: &str| -> Result<Option<f64>, TableError> {
            parse_float(&cell(column)?).map_err(|m| invalid(column, m))
        };
        let required = |column: &str| -> Result<f64, TableError> {
            float(column)?.ok_or_else(|| invalid(column, String::from("empty value")))
        };
        let integer = |column: &str| -> Result<Option<i64>, TableError> {
            match float(column)? {
                Some(v) if v.fract() == 0.0 => Ok(Some(v as i64)),
                Some(v) => Err(invalid(column, format!("{v} is not an integer"))),
                None => Ok(None),
            }
        };
        let positive = |column: &str| -> Result<i64, TableError> {
            integer(column)?
                .filter(|v| *v >= 0)
                .ok_or_else(|| invalid(column, String::from("expected a non-negative integer")))
        };
        Ok(TractRow {
            source_index: positive("source_index")? as usize,
            object_id: integer("OBJECTID")?,
            poly_idx: positive("poly_idx")? as u32,
            latitude: required("latitude")?,
            longitude: required("longitude")?,
            e_noveh: float("E_NOVEH")?,
            m_noveh: float("M_NOVEH")?,
            area: float("area")?,
            perimeter: float("perimeter")?,
            pp_score_n: float("pp_score_n")?,
            schwartz_n: float("schwartz_n")?,
        })
    }
}

impl From<&Tract> for TractRow {
    fn from(tract: &Tract) -> Self {
        TractRow {
            source_index: tract.source_index,
            object_id: tract.object_id,
            poly_idx: tract.id.0,
            latitude: tract.latitude,
            longitude: tract.longitude,
            e_noveh: tract.e_noveh,
            m_noveh: tract.m_noveh,
            area: tract.shape_metrics.area,
            perimeter: tract.shape_metrics.perimeter,
            pp_score_n: tract.shape_metrics.pp_score_n,
            schwartz_n: tract.shape_metrics.schwartz_n,
        }
    }
}

impl From<TractRow> for Tract {
    fn from(row: TractRow) -> Self {
        Tract {
            id: TractId(row.poly_idx),
            source_index: row.source_index,
            object_id: row.object_id,
            latitude: row.latitude,
            longitude: row.longitude,
            e_noveh: row.e_noveh,
            m_noveh: row.m_noveh,
            shape_metrics: ShapeMetrics {
                area: row.area,
                perimeter: row.perimeter,
                pp_score_n: row.pp_score_n,
                schwartz_n: row.schwartz_n,
            },
        }
    }
}
