use super::{
    colormap::{normalize, viridis},
    output_format::{save_with_fallback, Figure, OutputFormat},
    plot_error::render_error,
    PlotError,
};
use crate::{
    app::{aggregate::COMBINED_FILENAME, prep::load_tracts},
    config::{normalize_county_name, PipelineConfiguration},
    model::table::{header_lookup, parse_float, TableError},
};
use geo::{BoundingRect, MultiPolygon};
use plotters::{coord::Shift, prelude::*};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use tractaccess_core::{algorithm::stats, model::TractId};

const MISSING_COLOR: RGBColor = RGBColor(211, 211, 211);
const LEGEND_STEPS: usize = 50;

/// values of one numeric column of the combined table, keyed by `poly_idx`
pub fn read_tract_values(path: &Path, column: &str) -> Result<HashMap<TractId, f64>, PlotError> {
    let filepath = path.to_string_lossy().to_string();
    let read_error = |e: csv::Error| TableError::Read {
        path: filepath.clone(),
        message: e.to_string(),
    };
    let mut reader = csv::Reader::from_path(path).map_err(read_error)?;
    let header_record = reader.headers().map_err(read_error)?.clone();
    let headers = header_lookup(&header_record);
    let missing = |name: &str| PlotError::MissingColumn {
        path: filepath.clone(),
        column: name.to_string(),
    };
    let id_idx = *headers.get("poly_idx").ok_or_else(|| missing("poly_idx"))?;
    let value_idx = *headers.get(column).ok_or_else(|| missing(column))?;

    let mut values = HashMap::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(read_error)?;
        let invalid = |name: &str, message: String| TableError::InvalidValue {
            path: filepath.clone(),
            row,
            column: name.to_string(),
            message,
        };
        let id = parse_float(record.get(id_idx).unwrap_or_default())
            .map_err(|m| invalid("poly_idx", m))?;
        let value = parse_float(record.get(value_idx).unwrap_or_default())
            .map_err(|m| invalid(column, m))?;
        if let (Some(id), Some(value)) = (id, value) {
            values.insert(TractId(id as u32), value);
        }
    }
    Ok(values)
}

/// tract polygons colored by a value, with a color bar
pub struct ChoroplethFigure {
    pub title: String,
    pub column: String,
    pub tracts: Vec<(TractId, MultiPolygon<f64>)>,
    pub values: HashMap<TractId, f64>,
}

impl ChoroplethFigure {
    /// range of the values of the drawn tracts
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let values = self
            .tracts
            .iter()
            .filter_map(|(id, _)| self.values.get(id).copied())
            .collect::<Vec<_>>();
        Some((stats::min(&values)?, stats::max(&values)?))
    }

    pub fn color(&self, id: TractId) -> RGBColor {
        match (self.values.get(&id), self.value_range()) {
            (Some(v), Some((lo, hi))) => viridis(normalize(*v, lo, hi)),
            _ => MISSING_COLOR,
        }
    }
}

impl Figure for ChoroplethFigure {
    fn size(&self) -> (u32, u32) {
        (1100, 900)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), PlotError> {
        let bounds = MultiPolygon(
            self.tracts
                .iter()
                .flat_map(|(_, mp)| mp.0.iter().cloned())
                .collect::<Vec<_>>(),
        )
        .bounding_rect()
        .ok_or_else(|| PlotError::Render(String::from("no tract geometry to draw")))?;
        let (map_area, legend_area) = root.split_horizontally(root.dim_in_pixel().0 - 150);
        let range = self.value_range();

        let mut chart = ChartBuilder::on(&map_area)
            .caption(&self.title, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(bounds.min().x..bounds.max().x, bounds.min().y..bounds.max().y)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("longitude")
            .y_desc("latitude")
            .draw()
            .map_err(render_error)?;
        let rings = self
            .tracts
            .iter()
            .flat_map(|(id, mp)| {
                let color = self.color(*id);
                mp.0.iter().map(move |p| {
                    let points = p.exterior().coords().map(|c| (c.x, c.y)).collect::<Vec<_>>();
                    (points, color)
                })
            })
            .collect::<Vec<_>>();
        chart
            .draw_series(
                rings
                    .iter()
                    .map(|(points, color)| Polygon::new(points.clone(), color.filled())),
            )
            .map_err(render_error)?;
        chart
            .draw_series(
                rings
                    .iter()
                    .map(|(points, _)| PathElement::new(points.clone(), WHITE.stroke_width(1))),
            )
            .map_err(render_error)?;

        if let Some((lo, hi)) = range {
            let mut legend = ChartBuilder::on(&legend_area)
                .margin_top(60)
                .margin_bottom(60)
                .margin_right(20)
                .y_label_area_size(60)
                .caption(&self.column, ("sans-serif", 14))
                .build_cartesian_2d(0.0..1.0, lo..if hi > lo { hi } else { lo + 1.0 })
                .map_err(render_error)?;
            legend
                .configure_mesh()
                .disable_mesh()
                .disable_x_axis()
                .draw()
                .map_err(render_error)?;
            let step = if hi > lo { (hi - lo) / LEGEND_STEPS as f64 } else { 1.0 };
            legend
                .draw_series((0..LEGEND_STEPS).map(|i| {
                    let y0 = lo + i as f64 * step;
                    let color = viridis(i as f64 / (LEGEND_STEPS - 1) as f64);
                    Rectangle::new([(0.0, y0), (1.0, y0 + step)], color.filled())
                }))
                .map_err(render_error)?;
        }
        Ok(())
    }
}

/// colors the county's tracts by `column` of `customized_combined_output.csv`
pub fn plot_choropleth(
    conf: &PipelineConfiguration,
    county_name: &str,
    state_name: &str,
    column: &str,
) -> Result<Option<PathBuf>, PlotError> {
    let county = normalize_county_name(county_name);
    let combined_path = conf.layout.county_file(&county, COMBINED_FILENAME);
    if !combined_path.exists() {
        return Err(PlotError::MissingInput {
            path: combined_path.to_string_lossy().to_string(),
            stage: String::from("aggregate"),
        });
    }
    let values = read_tract_values(&combined_path, column)?;
    if values.is_empty() {
        return Err(PlotError::NoValues {
            path: combined_path.to_string_lossy().to_string(),
            column: column.to_string(),
        });
    }

    let rules = conf.land_use.build()?;
    let label = conf.county_naming(&county, &rules).tract_label(&county);
    let layer = conf.tract_source(state_name).read()?;
    let tracts = load_tracts(&layer, &label)?;
    log::info!(
        "coloring {} tracts of {county} by '{column}', {} with a value",
        tracts.polygons.len(),
        values.len()
    );
    let figure = ChoroplethFigure {
        title: format!(
            "{county} County, {}: {column}",
            conf.plot.state_abbreviation
        ),
        column: column.to_string(),
        tracts: tracts.polygons,
        values,
    };
    let stem = format!("{county}_{column}_choropleth");
    let directory = conf.layout.county_directory(&county);
    Ok(save_with_fallback(
        &figure,
        &directory,
        &stem,
        &OutputFormat::RASTER_FIRST,
    ))
}
