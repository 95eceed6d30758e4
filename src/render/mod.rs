//! Peak analysis and chart export.
//!
//! [`ChartRenderer::render`] is the single entry point used by the UI: it
//! filters the dataset with an optional [`ThresholdConfig`], writes the base
//! chart and, when asked for, a peak-only chart next to it.

pub mod artifact;
pub mod chart;

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use log::{error, info};

use crate::color::PlotColor;
use crate::data::filter::{peak_subset, PeakSubset};
use crate::data::model::Dataset;
use crate::error::RenderError;
use crate::peak::ThresholdConfig;

pub use artifact::ArtifactPaths;
pub use chart::{format_sci, ChartStyle, LineChart};

/// File name prefix used by the measurement group's result folder.
pub const DEFAULT_PREFIX: &str = "shilane";

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Peak rows and their mean for one threshold configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakAnalysis {
    pub subset: PeakSubset,
    /// Only set when averaging was requested and the subset is non-empty.
    pub average: Option<f64>,
}

impl PeakAnalysis {
    pub fn run(dataset: &Dataset, config: &ThresholdConfig) -> Self {
        let subset = peak_subset(dataset, config.y_threshold, config.x_threshold);
        let average = if config.compute_average {
            subset.mean_y()
        } else {
            None
        };
        PeakAnalysis { subset, average }
    }
}

// ---------------------------------------------------------------------------
// Render results
// ---------------------------------------------------------------------------

/// What happened to the optional peak-only chart.
#[derive(Debug)]
pub enum PeakChart {
    /// No thresholds were given or the peak chart was switched off.
    NotRequested,
    /// Requested, but no row passed both thresholds.
    NoPeakRows,
    Written(PathBuf),
    /// The base chart is still valid when this happens.
    Failed(RenderError),
}

impl PeakChart {
    pub fn path(&self) -> Option<&Path> {
        match self {
            PeakChart::Written(path) => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct RenderResult {
    pub base_chart: PathBuf,
    pub peak_chart: PeakChart,
    pub average: Option<f64>,
    /// Rows in the peak subset; 0 without thresholds.
    pub peak_rows: usize,
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Writes chart images into one output directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    prefix: String,
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            style: ChartStyle::default(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Render `dataset` with the current local time in the file names.
    pub fn render(
        &self,
        dataset: &Dataset,
        display_name: &str,
        color: PlotColor,
        config: Option<&ThresholdConfig>,
    ) -> Result<RenderResult, RenderError> {
        self.render_at(dataset, display_name, color, config, Local::now().naive_local())
    }

    /// Render with an explicit timestamp.
    ///
    /// An `Err` means the base chart was not written. Peak chart failures are
    /// reported through [`RenderResult::peak_chart`] instead.
    pub fn render_at(
        &self,
        dataset: &Dataset,
        display_name: &str,
        color: PlotColor,
        config: Option<&ThresholdConfig>,
        timestamp: NaiveDateTime,
    ) -> Result<RenderResult, RenderError> {
        let analysis = config.map(|cfg| PeakAnalysis::run(dataset, cfg));
        let average = analysis.as_ref().and_then(|a| a.average);

        let paths = ArtifactPaths::allocate(
            &self.output_dir,
            &self.prefix,
            basename(display_name),
            timestamp,
        );

        let annotation = match (config, average) {
            (Some(cfg), Some(avg)) => Some(self.annotation_lines(avg, cfg)),
            _ => None,
        };
        let base = LineChart {
            x_label: dataset.x_label(),
            y_label: dataset.y_label(),
            points: dataset.points().collect(),
            color: color.to_plotters(),
            floor_x: false,
            annotation,
        };
        let png = chart::render_line_png(&base, &self.style)?;
        artifact::write_atomic(&paths.base, &png)?;
        info!("Saved chart: {}", paths.base.display());

        let peak_chart = match (config, &analysis) {
            (Some(cfg), Some(analysis)) if cfg.emit_peak_chart => {
                if analysis.subset.is_empty() {
                    PeakChart::NoPeakRows
                } else {
                    match self.write_peak_chart(dataset, &analysis.subset, &paths.peak) {
                        Ok(()) => {
                            info!("Saved peak chart: {}", paths.peak.display());
                            PeakChart::Written(paths.peak.clone())
                        }
                        Err(e) => {
                            error!("Peak chart for {display_name} failed: {e}");
                            PeakChart::Failed(e)
                        }
                    }
                }
            }
            _ => PeakChart::NotRequested,
        };

        Ok(RenderResult {
            base_chart: paths.base,
            peak_chart,
            average,
            peak_rows: analysis.map(|a| a.subset.len()).unwrap_or(0),
        })
    }

    fn write_peak_chart(
        &self,
        dataset: &Dataset,
        subset: &PeakSubset,
        path: &Path,
    ) -> Result<(), RenderError> {
        let chart = LineChart {
            x_label: dataset.x_label(),
            y_label: dataset.y_label(),
            points: subset.points().collect(),
            color: PlotColor::peak().to_plotters(),
            floor_x: true,
            annotation: None,
        };
        let png = chart::render_line_png(&chart, &self.style)?;
        artifact::write_atomic(path, &png)
    }

    /// The three lines of the upper-left box on an averaged chart.
    pub fn annotation_lines(&self, average: f64, config: &ThresholdConfig) -> Vec<String> {
        let y_unit = &self.style.y_unit;
        let x_unit = &self.style.x_unit;
        vec![
            format!("Peak Average: {} {y_unit}", format_sci(average, 3)),
            format!("(Y > {} {y_unit})", format_sci(config.y_threshold, 3)),
            format!("(X > {:.2} {x_unit})", config.x_threshold),
        ]
    }
}

/// File stem of the displayed name: `run_01.xlsx` → `run_01`.
fn basename(display_name: &str) -> &str {
    Path::new(display_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(display_name)
}
