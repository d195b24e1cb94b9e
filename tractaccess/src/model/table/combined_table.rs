use super::{
    format_float, format_list, header_lookup, parse_float, parse_list, TableError, TractRow,
};
use std::path::Path;
use tractaccess_core::model::{CombinedTractRow, TopXSummary, Tract};

const OPTION1_COLUMN: &str = "Option1_aggregated_min_travel_time";
const OPTION2_COLUMN: &str = "Option2_aggregated_min_travel_time";
const OPTION3_COLUMN: &str = "Option3_aggregated_min_travel_time_list";

/// minima of the three options appended to the tract columns
pub const COMBINED_COLUMNS: [&str; 3] = [OPTION1_COLUMN, OPTION2_COLUMN, OPTION3_COLUMN];

/// worst-case statistics appended in `customized_combined_output.csv`
pub const TOP_X_COLUMNS: [&str; 10] = [
    "top_x_values",
    "min_top_x",
    "max_top_x",
    "avg_top_x",
    "median_top_x",
    "range_top_x",
    "std_dev_top_x",
    "num_parcels",
    "AbsOption1Minus3",
    "AbsOption2Minus3",
];

/// writes `customized_combined_output_BEFORE.csv`: tracts with the three
/// options' minima, before the worst-case statistics
pub fn write_combined_before(path: &Path, rows: &[CombinedTractRow]) -> Result<usize, TableError> {
    write_table(path, rows, false)
}

/// writes `customized_combined_output.csv`
pub fn write_combined(path: &Path, rows: &[CombinedTractRow]) -> Result<usize, TableError> {
    write_table(path, rows, true)
}

fn write_table(
    path: &Path,
    rows: &[CombinedTractRow],
    with_top_x: bool,
) -> Result<usize, TableError> {
    let write_error = |e: csv::Error| TableError::Write {
        path: path.to_string_lossy().to_string(),
        message: e.to_string(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(write_error)?;
    let mut header: Vec<&str> = TractRow::COLUMNS.to_vec();
    header.extend(COMBINED_COLUMNS);
    if with_top_x {
        header.extend(TOP_X_COLUMNS);
    }
    writer.write_record(&header).map_err(write_error)?;

    for row in rows.iter() {
        let mut cells = TractRow::from(&row.tract).cells();
        cells.push(format_float(row.option1_min_travel_time));
        cells.push(format_float(row.option2_min_travel_time));
        cells.push(format_list(&row.option3_min_travel_times));
        if with_top_x {
            let t = &row.top_x;
            cells.push(format_list(&t.top_x_values));
            cells.push(format_float(t.min_top_x));
            cells.push(format_float(t.max_top_x));
            cells.push(format_float(t.avg_top_x));
            cells.push(format_float(t.median_top_x));
            cells.push(format_float(t.range_top_x));
            cells.push(format_float(t.std_dev_top_x));
            cells.push(t.num_parcels.to_string());
            cells.push(format_float(row.abs_option1_minus3));
            cells.push(format_float(row.abs_option2_minus3));
        }
        writer.write_record(&cells).map_err(write_error)?;
    }
    writer.flush().map_err(|e| TableError::Write {
        path: path.to_string_lossy().to_string(),
        message: e.to_string(),
    })?;
    Ok(rows.len())
}

/// reads `customized_combined_output.csv` back into combined rows
pub fn read_combined(path: &Path) -> Result<Vec<CombinedTractRow>, TableError> {
    let filepath = path.to_string_lossy().to_string();
    let read_error = |e: csv::Error| TableError::Read {
        path: filepath.clone(),
        message: e.to_string(),
    };
    let mut reader = csv::Reader::from_path(path).map_err(read_error)?;
    let header_record = reader.headers().map_err(read_error)?.clone();
    let headers = header_lookup(&header_record);
    for column in COMBINED_COLUMNS.iter().chain(TOP_X_COLUMNS.iter()) {
        if !headers.contains_key(column) {
            return Err(TableError::MissingColumn {
                path: filepath.clone(),
                column: column.to_string(),
            });
        }
    }

    let mut rows = vec![];
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(read_error)?;
        let invalid = |column: &str, message: String| TableError::InvalidValue {
            path: filepath.clone(),
            row: row_idx,
            column: column.to_string(),
            message,
        };
        let cell = |column: &str| -> String {
            headers
                .get(column)
                .and_then(|idx| record.get(*idx))
                .unwrap_or_default()
                .to_string()
        };
        let float = |column: &str| parse_float(&cell(column)).map_err(|m| invalid(column, m));
        let list = |column: &str| parse_list(&cell(column)).map_err(|m| invalid(column, m));

        let tract: Tract = TractRow::from_record(&filepath, row_idx, &headers, &record)?.into();
        let num_parcels = cell("num_parcels")
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid("num_parcels", e.to_string()))?;
        let top_x = TopXSummary {
            top_x_values: list("top_x_values")?,
            min_top_x: float("min_top_x")?,
            max_top_x: float("max_top_x")?,
            avg_top_x: float("avg_top_x")?,
            median_top_x: float("median_top_x")?,
            range_top_x: float("range_top_x")?,
            std_dev_top_x: float("std_dev_top_x")?,
            num_parcels: num_parcels as usize,
        };
        rows.push(CombinedTractRow {
            tract,
            option1_min_travel_time: float(OPTION1_COLUMN)?,
            option2_min_travel_time: float(OPTION2_COLUMN)?,
            option3_min_travel_times: list(OPTION3_COLUMN)?,
            top_x,
            abs_option1_minus3: float("AbsOption1Minus3")?,
            abs_option2_minus3: float("AbsOption2Minus3")?,
        });
    }
    Ok(rows)
}
