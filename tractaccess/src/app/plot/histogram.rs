use super::{
    output_format::{save_with_fallback, Figure, OutputFormat},
    plot_error::render_error,
    PlotError,
};
use crate::{
    config::{normalize_county_name, PipelineConfiguration},
    model::table::read_rows,
};
use plotters::{coord::Shift, prelude::*};
use regex::Regex;
use std::path::PathBuf;
use tractaccess_core::{
    algorithm::stats::{self, describe},
    model::{AggregateRow, AnalysisOption},
};

const OPTION_NUMBER: &str = r"Option(\d+)_";
const BIN_WIDTH: f64 = 5.0;

/// the analysis option number of an aggregated file name
pub fn option_number(file_name: &str) -> Result<u8, PlotError> {
    let regex = Regex::new(OPTION_NUMBER).map_err(|e| PlotError::Render(e.to_string()))?;
    regex
        .captures(file_name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .ok_or_else(|| PlotError::NoOptionNumber(file_name.to_string()))
}

/// bin edges 0, 5, 10, ... strictly below `ceil(max_value) + 5`
pub fn histogram_edges(max_value: f64) -> Vec<f64> {
    if !max_value.is_finite() {
        return vec![];
    }
    let end = max_value.ceil() + BIN_WIDTH;
    let mut edges = vec![];
    let mut idx = 0;
    loop {
        let edge = idx as f64 * BIN_WIDTH;
        if edge >= end {
            break;
        }
        edges.push(edge);
        idx += 1;
    }
    edges
}

/// counts per bin `[e_i, e_i+1)`, the last bin closed on both sides.
/// values outside the edges are not counted.
pub fn histogram_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
    if edges.len() < 2 {
        return vec![];
    }
    let n_bins = edges.len() - 1;
    let last = edges[n_bins];
    let mut counts = vec![0; n_bins];
    for v in values.iter().copied().filter(|v| !v.is_nan()) {
        if v < edges[0] || v > last {
            continue;
        }
        let bin = if v == last {
            n_bins - 1
        } else {
            edges.partition_point(|e| *e <= v) - 1
        };
        counts[bin] += 1;
    }
    counts
}

pub struct HistogramFigure {
    pub title: String,
    pub x_label: String,
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Figure for HistogramFigure {
    fn size(&self) -> (u32, u32) {
        (1000, 600)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), PlotError> {
        let x_max = self.edges.last().copied().unwrap_or(BIN_WIDTH);
        let y_max = self.counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.05;
        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 28))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..x_max, 0.0..y_max)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc("Frequency")
            .draw()
            .map_err(render_error)?;
        let bars = self
            .edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(edge, count)| (edge[0], edge[1], *count as f64))
            .collect::<Vec<_>>();
        chart
            .draw_series(bars.iter().map(|(lo, hi, count)| {
                Rectangle::new([(*lo, 0.0), (*hi, *count)], BLUE.mix(0.7).filled())
            }))
            .map_err(render_error)?;
        chart
            .draw_series(
                bars.iter()
                    .map(|(lo, hi, count)| Rectangle::new([(*lo, 0.0), (*hi, *count)], BLACK)),
            )
            .map_err(render_error)?;
        Ok(())
    }
}

/// histograms of the minimum and median travel times of an aggregated file
/// `county_data/{County}/{file_name}.csv`, saved next to it
pub fn plot_histogram(
    conf: &PipelineConfiguration,
    county_name: &str,
    file_name: &str,
) -> Result<Vec<PathBuf>, PlotError> {
    let county = normalize_county_name(county_name);
    let option = AnalysisOption::try_from(option_number(file_name)?)
        .map_err(|_| PlotError::NoOptionNumber(file_name.to_string()))?;
    log::info!("the value of Option extracted from '{file_name}' is {}", option.number());
    let stem = file_name.strip_suffix(".csv").unwrap_or(file_name);
    let path = conf.layout.county_file(&county, &format!("{stem}.csv"));
    if !path.exists() {
        return Err(PlotError::MissingInput {
            path: path.to_string_lossy().to_string(),
            stage: String::from("travel-time"),
        });
    }
    let rows = read_rows::<AggregateRow>(&path)?;
    log_description(&rows);

    let min_values = rows.iter().map(|r| r.min_travel_time).collect::<Vec<_>>();
    let median_values = rows.iter().map(|r| r.median_travel_time).collect::<Vec<_>>();
    let max_median = stats::max(&median_values).ok_or_else(|| PlotError::NoValues {
        path: path.to_string_lossy().to_string(),
        column: String::from("median_travel_time"),
    })?;
    let edges = histogram_edges(max_median);

    let directory = conf.layout.county_directory(&county);
    let figures = [
        (
            "min",
            "Histogram of Minimum Travel Times",
            "Minimum Travel Time",
            &min_values,
        ),
        (
            "median",
            "Histogram of Median Travel Times",
            "Median Travel Time",
            &median_values,
        ),
    ];
    let mut saved = vec![];
    for (name, title, x_label, values) in figures {
        let figure = HistogramFigure {
            title: title.to_string(),
            x_label: x_label.to_string(),
            counts: histogram_counts(values, &edges),
            edges: edges.clone(),
        };
        let stem = format!("{option}_histogram_{name}_travel_time");
        if let Some(path) =
            save_with_fallback(&figure, &directory, &stem, &OutputFormat::DOCUMENT_FIRST)
        {
            saved.push(path);
        }
    }
    Ok(saved)
}

fn log_description(rows: &[AggregateRow]) {
    let columns: [(&str, Vec<Option<f64>>); 4] = [
        (
            "min_travel_time",
            rows.iter().map(|r| Some(r.min_travel_time)).collect(),
        ),
        (
            "second_min_travel_time",
            rows.iter().map(|r| r.second_min_travel_time).collect(),
        ),
        (
            "third_min_travel_time",
            rows.iter().map(|r| r.third_min_travel_time).collect(),
        ),
        (
            "median_travel_time",
            rows.iter().map(|r| Some(r.median_travel_time)).collect(),
        ),
    ];
    log::info!("descriptive statistics are");
    for (name, values) in columns.iter() {
        let d = describe(values);
        let f = |v: Option<f64>| v.map(|v| format!("{v:.6}")).unwrap_or_else(|| String::from("NaN"));
        log::info!(
            "{name}: count {} mean {} std {} min {} 25% {} 50% {} 75% {} max {}",
            d.count,
            f(d.mean),
            f(d.std),
            f(d.min),
            f(d.q1),
            f(d.median),
            f(d.q3),
            f(d.max)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_number() {
        assert_eq!(
            option_number("Option3_aggregated_information_10locations_to_2hospitals__1719917624")
                .unwrap(),
            3
        );
        assert!(matches!(
            option_number("aggregated_information"),
            Err(PlotError::NoOptionNumber(_))
        ));
    }

    #[test]
    fn test_bins_follow_median_maximum() {
        assert_eq!(histogram_edges(12.3), vec![0.0, 5.0, 10.0, 15.0]);
        assert_eq!(histogram_edges(10.0), vec![0.0, 5.0, 10.0]);
        assert!(histogram_edges(f64::NAN).is_empty());
    }

    #[test]
    fn test_last_bin_is_closed() {
        let edges = vec![0.0, 5.0, 10.0];
        let counts = histogram_counts(&[0.0, 4.9, 5.0, 9.0, 10.0, 10.5, -1.0], &edges);
        assert_eq!(counts, vec![2, 3]);
        assert!(histogram_counts(&[1.0], &[0.0]).is_empty());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let conf = PipelineConfiguration {
            layout: crate::config::DataLayout {
                data_directory: dir.path().to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = plot_histogram(&conf, "Wake", "Option1_aggregated_information_1locations_to_1hospitals__1");
        assert!(matches!(result, Err(PlotError::MissingInput { .. })));
    }
}
