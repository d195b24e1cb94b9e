use super::{
    box_summary::{auto_range, BoxSummary},
    output_format::{render, save_with_fallback, Figure, OutputFormat},
    plot_error::render_error,
    PlotError,
};
use crate::{
    app::post_process::{read_comparison, COMPARISON_FILENAME},
    config::{normalize_county_name, PipelineConfiguration, PlotConfiguration},
};
use plotters::{
    coord::{types::RangedCoordf64, Shift},
    prelude::*,
    series::DashedLineSeries,
    style::text_anchor::{HPos, Pos, VPos},
};
use std::{fmt::Display, path::PathBuf};
use tractaccess_core::model::ComparisonColumn;

pub const GRID_STEM: &str = "combined_counties_box_plots";
pub const FIXED_SCALE_GRID_STEM: &str = "combined_counties_box_plots_fixed_scale";
const Y_LABEL: &str = "Travel time (minutes)";
const ERROR_MESSAGE_LENGTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountyKind {
    Urban,
    Rural,
}

impl Display for CountyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountyKind::Urban => write!(f, "Urban"),
            CountyKind::Rural => write!(f, "Rural"),
        }
    }
}

/// position of a county in the box plot grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub county: String,
    pub kind: CountyKind,
    pub row: usize,
    pub column: usize,
}

/// urban counties fill the left column in alphabetical order, rural
/// counties the right column in configured order. returns the row count
/// with the cells.
pub fn grid_cells(conf: &PlotConfiguration) -> (usize, Vec<GridCell>) {
    let urban = conf.sorted_urban_counties();
    let rural = &conf.rural_counties;
    let rows = urban.len().max(rural.len());
    let column = |counties: &[String], kind: CountyKind, column: usize| {
        counties
            .iter()
            .enumerate()
            .map(|(row, county)| GridCell {
                county: normalize_county_name(county),
                kind,
                row,
                column,
            })
            .collect::<Vec<_>>()
    };
    let mut cells = column(&urban, CountyKind::Urban, 0);
    cells.extend(column(rural, CountyKind::Rural, 1));
    (rows, cells)
}

/// what a grid cell shows
#[derive(Debug, Clone, PartialEq)]
pub enum CountyPanel {
    /// the defined values of each plotted column, in column order
    Data(Vec<(ComparisonColumn, Vec<f64>)>),
    NotFound,
    Error(String),
}

impl CountyPanel {
    /// reads the comparison table of a county. a missing or unreadable file
    /// becomes a placeholder panel.
    pub fn load(conf: &PipelineConfiguration, county: &str) -> CountyPanel {
        let path = conf.layout.county_file(county, COMPARISON_FILENAME);
        if !path.exists() {
            log::warn!("{} not found", path.display());
            return CountyPanel::NotFound;
        }
        match read_comparison(&path) {
            Ok(rows) => {
                let columns = conf
                    .plot
                    .columns
                    .iter()
                    .map(|c| {
                        let values = rows.iter().filter_map(|r| r.get(*c)).collect::<Vec<_>>();
                        (*c, values)
                    })
                    .collect();
                CountyPanel::Data(columns)
            }
            Err(e) => {
                log::warn!("failed loading {}: {e}", path.display());
                CountyPanel::Error(e.to_string())
            }
        }
    }

    /// text shown in place of the boxes, if any
    pub fn placeholder(&self, county: &str) -> Option<String> {
        match self {
            CountyPanel::Data(_) => None,
            CountyPanel::NotFound => Some(format!("Data not found for\n{county}")),
            CountyPanel::Error(message) => {
                let mut short = message
                    .chars()
                    .take(ERROR_MESSAGE_LENGTH)
                    .collect::<String>();
                if message.chars().count() > ERROR_MESSAGE_LENGTH {
                    short.push_str("...");
                }
                Some(format!("Error loading data for\n{county}\n{short}"))
            }
        }
    }
}

/// one panel of box plots with its title and scale
pub struct BoxPanel {
    pub county: String,
    pub kind: CountyKind,
    pub panel: CountyPanel,
    pub state_abbreviation: String,
    /// fixed y range, or `None` to fit the data
    pub y_range: Option<(f64, f64)>,
}

impl BoxPanel {
    pub fn title(&self) -> String {
        match self.panel {
            CountyPanel::Data(_) => format!(
                "{} County, {} ({})",
                self.county, self.state_abbreviation, self.kind
            ),
            _ => format!("{} County, {}", self.county, self.state_abbreviation),
        }
    }

    fn draw_on<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<(), PlotError> {
        let columns = match &self.panel {
            CountyPanel::Data(columns) => columns,
            _ => {
                let area = area
                    .titled(&self.title(), ("sans-serif", 20))
                    .map_err(render_error)?;
                let text = self.panel.placeholder(&self.county).unwrap_or_default();
                draw_centered_text(&area, &text)?;
                return Ok(());
            }
        };
        let summaries = columns
            .iter()
            .map(|(_, values)| BoxSummary::new(values))
            .collect::<Vec<_>>();
        let defined = summaries.iter().flatten().collect::<Vec<_>>();
        let (y_lo, y_hi) = self
            .y_range
            .or_else(|| auto_range(&defined))
            .unwrap_or((0.0, 1.0));
        let labels = columns
            .iter()
            .map(|(c, _)| c.label().to_string())
            .collect::<Vec<_>>();
        let n = labels.len();

        let mut chart = ChartBuilder::on(area)
            .caption(self.title(), ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5..(n as f64 - 0.5), y_lo..y_hi)
            .map_err(render_error)?;
        let x_label = |x: &f64| {
            let idx = x.round();
            if (x - idx).abs() < 1e-6 && idx >= 0.0 {
                labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&x_label)
            .y_desc(Y_LABEL)
            .draw()
            .map_err(render_error)?;

        for (idx, summary) in summaries.iter().enumerate() {
            if let Some(s) = summary {
                draw_box(&mut chart, idx as f64, s)?;
            }
        }

        // reference line at the Option 1 median
        let option1_median = columns
            .iter()
            .zip(summaries.iter())
            .find(|((c, _), _)| *c == ComparisonColumn::Option1)
            .and_then(|(_, s)| s.as_ref().map(|s| s.median));
        if let Some(median) = option1_median {
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(-0.5, median), (n as f64 - 0.5, median)],
                    6,
                    4,
                    RED.mix(0.5).stroke_width(2),
                ))
                .map_err(render_error)?;
        }
        Ok(())
    }
}

fn draw_box<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x: f64,
    s: &BoxSummary,
) -> Result<(), PlotError> {
    let half = 0.25;
    let cap = 0.12;
    let style = BLACK.stroke_width(1);
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(x - half, s.q1), (x + half, s.q3)],
            style,
        )))
        .map_err(render_error)?;
    let lines = vec![
        vec![(x - half, s.median), (x + half, s.median)],
        vec![(x, s.q3), (x, s.upper_whisker)],
        vec![(x, s.q1), (x, s.lower_whisker)],
        vec![(x - cap, s.upper_whisker), (x + cap, s.upper_whisker)],
        vec![(x - cap, s.lower_whisker), (x + cap, s.lower_whisker)],
    ];
    chart
        .draw_series(lines.into_iter().enumerate().map(|(idx, points)| {
            // the median line stands out from the whiskers
            let color = if idx == 0 { RGBColor(255, 127, 14) } else { BLACK };
            PathElement::new(points, color.stroke_width(if idx == 0 { 2 } else { 1 }))
        }))
        .map_err(render_error)?;
    chart
        .draw_series(
            s.outliers
                .iter()
                .map(|y| Circle::new((x, *y), 3, BLACK.stroke_width(1))),
        )
        .map_err(render_error)?;
    Ok(())
}

fn draw_centered_text<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    text: &str,
) -> Result<(), PlotError> {
    let (width, height) = area.dim_in_pixel();
    let lines = text.lines().collect::<Vec<_>>();
    let line_height = 20;
    let top = height as i32 / 2 - (lines.len() as i32 * line_height) / 2;
    let style = TextStyle::from(("sans-serif", 16).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (idx, line) in lines.iter().enumerate() {
        area.draw(&Text::new(
            line.to_string(),
            (width as i32 / 2, top + idx as i32 * line_height),
            style.clone(),
        ))
        .map_err(render_error)?;
    }
    Ok(())
}

/// the two-column grid of county box plots
pub struct BoxGridFigure {
    pub rows: usize,
    pub cells: Vec<(GridCell, BoxPanel)>,
    pub cell_size: (u32, u32),
}

impl BoxGridFigure {
    pub fn new(conf: &PipelineConfiguration, fixed_scale: bool) -> BoxGridFigure {
        let (rows, cells) = grid_cells(&conf.plot);
        let y_range = fixed_scale.then_some((0.0, conf.plot.fixed_scale_max));
        let cells = cells
            .into_iter()
            .map(|cell| {
                let panel = BoxPanel {
                    county: cell.county.clone(),
                    kind: cell.kind,
                    panel: CountyPanel::load(conf, &cell.county),
                    state_abbreviation: conf.plot.state_abbreviation.clone(),
                    y_range,
                };
                (cell, panel)
            })
            .collect();
        BoxGridFigure {
            rows,
            cells,
            cell_size: (conf.plot.cell_width, conf.plot.cell_height),
        }
    }
}

impl Figure for BoxGridFigure {
    fn size(&self) -> (u32, u32) {
        let (w, h) = self.cell_size;
        (w * 2, h * self.rows.max(1) as u32)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), PlotError> {
        let areas = root.split_evenly((self.rows.max(1), 2));
        for (cell, panel) in self.cells.iter() {
            let idx = cell.row * 2 + cell.column;
            if let Some(area) = areas.get(idx) {
                panel.draw_on(area)?;
            }
        }
        Ok(())
    }
}

impl Figure for BoxPanel {
    fn size(&self) -> (u32, u32) {
        (800, 600)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), PlotError> {
        self.draw_on(root)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxPlotOutput {
    pub grid: Option<PathBuf>,
    pub individual: Vec<PathBuf>,
}

/// draws the county grid, auto-scaled or on the fixed scale, and optionally
/// one plot per county with data. rendering failures are logged.
pub fn plot_boxes(
    conf: &PipelineConfiguration,
    fixed_scale: bool,
    individual: bool,
) -> Result<BoxPlotOutput, PlotError> {
    let directory = conf.layout.plot_directory();
    let figure = BoxGridFigure::new(conf, fixed_scale);
    let (stem, formats) = if fixed_scale {
        (FIXED_SCALE_GRID_STEM, OutputFormat::DOCUMENT_FIRST)
    } else {
        (GRID_STEM, OutputFormat::RASTER_FIRST)
    };
    let grid = save_with_fallback(&figure, directory, stem, &formats);

    let mut individual_paths = vec![];
    if individual {
        for (_, panel) in figure.cells.iter() {
            if !matches!(panel.panel, CountyPanel::Data(_)) {
                log::warn!("no box plot for {}, its data could not be loaded", panel.county);
                continue;
            }
            let path = directory.join(format!("{}_box_plot.png", panel.county.to_lowercase()));
            match render(panel, &path, OutputFormat::Png) {
                Ok(()) => {
                    log::info!("saved {}", path.display());
                    individual_paths.push(path);
                }
                Err(e) => log::warn!("failed to create plot for {}: {e}", panel.county),
            }
        }
    }
    Ok(BoxPlotOutput {
        grid,
        individual: individual_paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataLayout;
    use plotters_backend::{BackendColor, BackendCoord, BackendTextStyle, DrawingErrorKind};
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_grid_layout() {
        let conf = PlotConfiguration {
            urban_counties: vec!["wake".into(), "Durham".into(), "Buncombe".into()],
            rural_counties: vec!["Pender".into(), "Bertie".into()],
            ..Default::default()
        };
        let (rows, cells) = grid_cells(&conf);
        assert_eq!(rows, 3);
        let names = cells
            .iter()
            .map(|c| (c.county.as_str(), c.row, c.column))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                ("Buncombe", 0, 0),
                ("Durham", 1, 0),
                ("Wake", 2, 0),
                ("Pender", 0, 1),
                ("Bertie", 1, 1),
            ]
        );
    }

    #[test]
    fn test_missing_data_becomes_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let conf = PipelineConfiguration {
            layout: DataLayout {
                data_directory: dir.path().to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        };
        let panel = CountyPanel::load(&conf, "Bladen");
        assert_eq!(panel, CountyPanel::NotFound);
        assert_eq!(
            panel.placeholder("Bladen").unwrap(),
            "Data not found for\nBladen"
        );
        let error = CountyPanel::Error("x".repeat(60));
        let text = error.placeholder("Bladen").unwrap();
        assert!(text.starts_with("Error loading data for\nBladen\nxxxx"));
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_loads_columns_and_titles() {
        let dir = tempfile::tempdir().unwrap();
        let conf = PipelineConfiguration {
            layout: DataLayout {
                data_directory: dir.path().to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        };
        let county_dir = conf.layout.county_directory("Wake");
        std::fs::create_dir_all(&county_dir).unwrap();
        std::fs::write(
            county_dir.join(COMPARISON_FILENAME),
            "Option1_aggregated_min_travel_time,Option2_aggregated_min_travel_time,avg_all_parcel,avg_top_x\n\
             10.0,11.0,3.0,6.0\n,,4.0,\n",
        )
        .unwrap();
        let panel = CountyPanel::load(&conf, "Wake");
        assert_eq!(
            panel,
            CountyPanel::Data(vec![
                (ComparisonColumn::Option1, vec![10.0]),
                (ComparisonColumn::Option2, vec![11.0]),
                (ComparisonColumn::Option3Worst, vec![6.0]),
            ])
        );
        let box_panel = BoxPanel {
            county: String::from("Wake"),
            kind: CountyKind::Urban,
            panel,
            state_abbreviation: String::from("NC"),
            y_range: None,
        };
        assert_eq!(box_panel.title(), "Wake County, NC (Urban)");
    }

    /// records drawn text and counts pixels, measuring text by character count
    /// so that no font is ever loaded
    struct TextRecordingBackend {
        size: (u32, u32),
        pixels: Rc<RefCell<usize>>,
        texts: Rc<RefCell<Vec<String>>>,
    }

    impl DrawingBackend for TextRecordingBackend {
        type ErrorType = std::io::Error;

        fn get_size(&self) -> (u32, u32) {
            self.size
        }

        fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
            Ok(())
        }

        fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
            Ok(())
        }

        fn draw_pixel(
            &mut self,
            _point: BackendCoord,
            _color: BackendColor,
        ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
            *self.pixels.borrow_mut() += 1;
            Ok(())
        }

        fn draw_text<TStyle: BackendTextStyle>(
            &mut self,
            text: &str,
            _style: &TStyle,
            _pos: BackendCoord,
        ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
            self.texts.borrow_mut().push(text.to_string());
            Ok(())
        }

        fn estimate_text_size<TStyle: BackendTextStyle>(
            &self,
            text: &str,
            _style: &TStyle,
        ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
            Ok((text.chars().count() as u32 * 8, 16))
        }
    }

    #[test]
    fn test_missing_county_does_not_stop_its_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let mut conf = PipelineConfiguration {
            layout: DataLayout {
                data_directory: dir.path().to_path_buf(),
                ..Default::default()
            },
            ..Default::default()
        };
        conf.plot.cell_width = 300;
        conf.plot.cell_height = 200;
        for county in ["Wake", "Bertie"] {
            let county_dir = conf.layout.county_directory(county);
            std::fs::create_dir_all(&county_dir).unwrap();
            std::fs::write(
                county_dir.join(COMPARISON_FILENAME),
                "Option1_aggregated_min_travel_time,Option2_aggregated_min_travel_time,avg_all_parcel,avg_top_x\n\
                 10.0,11.0,3.0,6.0\n12.0,9.0,4.0,8.0\n14.0,13.0,5.0,30.0\n",
            )
            .unwrap();
        }
        // Bladen's file cannot be parsed
        let bladen_dir = conf.layout.county_directory("Bladen");
        std::fs::create_dir_all(&bladen_dir).unwrap();
        std::fs::write(
            bladen_dir.join(COMPARISON_FILENAME),
            "Option1_aggregated_min_travel_time\nnot a number\n",
        )
        .unwrap();

        let figure = BoxGridFigure::new(&conf, false);
        let data_panels = figure
            .cells
            .iter()
            .filter(|(_, p)| matches!(p.panel, CountyPanel::Data(_)))
            .count();
        assert_eq!(data_panels, 2);

        let pixels = Rc::new(RefCell::new(0));
        let texts = Rc::new(RefCell::new(vec![]));
        let backend = TextRecordingBackend {
            size: figure.size(),
            pixels: pixels.clone(),
            texts: texts.clone(),
        };
        let root = backend.into_drawing_area();
        figure.draw(&root).unwrap();
        root.present().unwrap();

        let texts = texts.borrow();
        assert!(texts.contains(&String::from("Wake County, NC (Urban)")));
        assert!(texts.contains(&String::from("Bertie County, NC (Rural)")));
        assert!(texts.contains(&String::from(Y_LABEL)));
        assert!(texts.contains(&String::from("Guilford County, NC")));
        assert_eq!(
            texts.iter().filter(|t| *t == "Data not found for").count(),
            7
        );
        assert_eq!(
            texts.iter().filter(|t| *t == "Error loading data for").count(),
            1
        );
        assert!(*pixels.borrow() > 0);
    }
}
