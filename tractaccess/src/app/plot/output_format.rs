use super::{plot_error::render_error, PlotError};
use plotters::{coord::Shift, prelude::*};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Png,
    Jpg,
    Svg,
    Pdf,
}

impl OutputFormat {
    /// save order of plots drawn on their own scale
    pub const RASTER_FIRST: [OutputFormat; 4] = [
        OutputFormat::Png,
        OutputFormat::Jpg,
        OutputFormat::Svg,
        OutputFormat::Pdf,
    ];
    /// save order of publication figures
    pub const DOCUMENT_FIRST: [OutputFormat; 4] = [
        OutputFormat::Pdf,
        OutputFormat::Png,
        OutputFormat::Jpg,
        OutputFormat::Svg,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// something that can be drawn onto any plotters backend
pub trait Figure {
    /// pixel size of the whole figure
    fn size(&self) -> (u32, u32);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), PlotError>;
}

/// draws `figure` into `path` with the backend of `format`
pub fn render<F: Figure>(figure: &F, path: &Path, format: OutputFormat) -> Result<(), PlotError> {
    match format {
        OutputFormat::Png | OutputFormat::Jpg => {
            let root = BitMapBackend::new(path, figure.size()).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            figure.draw(&root)?;
            root.present().map_err(render_error)
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, figure.size()).into_drawing_area();
            root.fill(&WHITE).map_err(render_error)?;
            figure.draw(&root)?;
            root.present().map_err(render_error)
        }
        OutputFormat::Pdf => Err(PlotError::UnsupportedFormat(format)),
    }
}

/// saves `{directory}/{stem}.{ext}` with the first format in `formats` that
/// works. when every format fails a plain PNG is attempted one last time.
/// failures are logged, never returned.
pub fn save_with_fallback<F: Figure>(
    figure: &F,
    directory: &Path,
    stem: &str,
    formats: &[OutputFormat],
) -> Option<PathBuf> {
    for format in formats.iter() {
        let path = directory.join(format!("{stem}.{}", format.extension()));
        match render(figure, &path, *format) {
            Ok(()) => {
                log::info!("saved plot as {}", path.display());
                return Some(path);
            }
            Err(e) => {
                log::warn!("failed to save as {format}: {e}");
                // a partially written file is not a result
                let _ = std::fs::remove_file(&path);
            }
        }
    }
    let path = directory.join(format!("{stem}.png"));
    match render(figure, &path, OutputFormat::Png) {
        Ok(()) => {
            log::info!("saved plot as {} after every format failed", path.display());
            Some(path)
        }
        Err(e) => {
            log::error!("complete failure saving plot {stem}: {e}");
            let _ = std::fs::remove_file(&path);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingFigure;

    impl Figure for FailingFigure {
        fn size(&self) -> (u32, u32) {
            (10, 10)
        }

        fn draw<DB: DrawingBackend>(
            &self,
            _root: &DrawingArea<DB, Shift>,
        ) -> Result<(), PlotError> {
            Err(PlotError::Render(String::from("broken")))
        }
    }

    struct BlankFigure;

    impl Figure for BlankFigure {
        fn size(&self) -> (u32, u32) {
            (20, 10)
        }

        fn draw<DB: DrawingBackend>(
            &self,
            root: &DrawingArea<DB, Shift>,
        ) -> Result<(), PlotError> {
            root.fill(&BLUE).map_err(render_error)
        }
    }

    #[test]
    fn test_every_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_with_fallback(&FailingFigure, dir.path(), "plot", &OutputFormat::RASTER_FIRST);
        assert!(saved.is_none());
        assert!(!dir.path().join("plot.png").exists());
    }

    #[test]
    fn test_falls_back_past_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_with_fallback(&BlankFigure, dir.path(), "plot", &OutputFormat::DOCUMENT_FIRST);
        assert_eq!(saved, Some(dir.path().join("plot.png")));
        assert!(dir.path().join("plot.png").exists());
        assert!(!dir.path().join("plot.pdf").exists());
    }
}
