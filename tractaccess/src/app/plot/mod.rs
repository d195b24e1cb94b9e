//! box plots, histograms and choropleths of the pipeline results
mod box_plot;
mod box_summary;
mod choropleth;
mod colormap;
mod histogram;
mod output_format;
mod plot_error;

pub use box_plot::{grid_cells, plot_boxes, BoxPlotOutput, CountyKind, CountyPanel, GridCell};
pub use box_summary::BoxSummary;
pub use choropleth::{plot_choropleth, read_tract_values};
pub use colormap::viridis;
pub use histogram::{histogram_counts, histogram_edges, option_number, plot_histogram};
pub use output_format::{save_with_fallback, Figure, OutputFormat};
pub use plot_error::PlotError;
