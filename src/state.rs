use std::path::{Path, PathBuf};

use crate::color::{ColorCycle, PlotColor};
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::peak::{ThresholdConfig, ThresholdInput};
use crate::render::{ChartRenderer, PeakChart};
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Per-tab record
// ---------------------------------------------------------------------------

/// Result of the last peak analysis shown in a tab.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakSummary {
    pub config: ThresholdConfig,
    pub average: Option<f64>,
    pub peak_rows: usize,
}

/// One opened file: its data, colour and the images currently shown.
#[derive(Debug, Clone)]
pub struct TabView {
    pub id: u64,
    /// File name shown on the tab, also the base of the image names.
    pub title: String,
    pub source: PathBuf,
    pub dataset: Dataset,
    pub color: PlotColor,
    pub chart: PathBuf,
    pub peak_chart: Option<PathBuf>,
    pub summary: Option<PeakSummary>,
}

/// Threshold dialog contents while it is open.
#[derive(Debug, Clone)]
pub struct PeakDialog {
    pub tab_id: u64,
    pub input: ThresholdInput,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub tabs: Vec<TabView>,
    /// Index into `tabs` of the selected tab.
    pub active: Option<usize>,
    next_id: u64,

    /// Line colours for newly opened files.
    pub colors: ColorCycle,

    pub settings: Settings,
    pub renderer: ChartRenderer,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    pub peak_dialog: Option<PeakDialog>,
}

impl AppState {
    pub fn new(settings: Settings, renderer: ChartRenderer) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_id: 0,
            colors: ColorCycle::default(),
            settings,
            renderer,
            status_message: None,
            peak_dialog: None,
        }
    }

    pub fn active_tab(&self) -> Option<&TabView> {
        self.active.and_then(|i| self.tabs.get(i))
    }

    /// Reopen the file from the previous session, if it still exists.
    pub fn open_default_file(&mut self) {
        match self.settings.last_opened_file.clone() {
            Some(path) if path.is_file() => {
                log::info!("Opening last file: {}", path.display());
                self.open_file(&path);
            }
            _ => log::info!("No previous file to open"),
        }
    }

    /// Load a file, render its base chart and add it as the selected tab.
    pub fn open_file(&mut self, path: &Path) {
        self.settings.remember_file(path);
        if let Err(e) = self.settings.save() {
            log::warn!("Failed to save settings: {e:#}");
        }

        let dataset = match load_file(path) {
            Ok(ds) => ds,
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error loading {}: {e}", path.display()));
                return;
            }
        };
        log::info!(
            "Loaded {} rows from {} ({} vs {})",
            dataset.len(),
            path.display(),
            dataset.y_label(),
            dataset.x_label()
        );

        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let color = self.colors.next_color();

        match self.renderer.render(&dataset, &title, color, None) {
            Ok(result) => {
                let id = self.next_id;
                self.next_id += 1;
                self.tabs.push(TabView {
                    id,
                    title,
                    source: path.to_path_buf(),
                    dataset,
                    color,
                    chart: result.base_chart,
                    peak_chart: None,
                    summary: None,
                });
                self.active = Some(self.tabs.len() - 1);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to render {title}: {e}");
                self.status_message = Some(format!("Error rendering {title}: {e}"));
            }
        }
    }

    /// Open the threshold dialog for the selected tab.
    pub fn open_peak_dialog(&mut self) {
        match self.active_tab() {
            Some(tab) => {
                self.peak_dialog = Some(PeakDialog {
                    tab_id: tab.id,
                    input: ThresholdInput::default(),
                    error: None,
                });
            }
            None => self.status_message = Some("No tab is open.".into()),
        }
    }

    /// Validate the dialog; on success close it and re-render the tab.
    /// Invalid input keeps the dialog open with an error.
    pub fn submit_peak_dialog(&mut self) {
        let Some(dialog) = self.peak_dialog.as_mut() else {
            return;
        };
        match dialog.input.parse() {
            Ok(config) => {
                let tab_id = dialog.tab_id;
                self.peak_dialog = None;
                self.apply_peak_config(tab_id, &config);
            }
            Err(e) => dialog.error = Some(e.to_string()),
        }
    }

    /// Re-render a tab with thresholds. The tab keeps its previous images if
    /// the base chart cannot be written.
    pub fn apply_peak_config(&mut self, tab_id: u64, config: &ThresholdConfig) {
        let Some(tab) = self.tabs.iter_mut().find(|t| t.id == tab_id) else {
            self.status_message = Some("The tab was closed.".into());
            return;
        };
        log::info!(
            "Applying peak settings to {}: {}",
            tab.title,
            serde_json::to_string(config).unwrap_or_default()
        );

        match self.renderer.render(&tab.dataset, &tab.title, tab.color, Some(config)) {
            Ok(result) => {
                tab.chart = result.base_chart;
                tab.summary = Some(PeakSummary {
                    config: *config,
                    average: result.average,
                    peak_rows: result.peak_rows,
                });
                self.status_message = match &result.peak_chart {
                    PeakChart::Failed(e) => Some(format!("Peak chart failed: {e}")),
                    PeakChart::NoPeakRows => {
                        Some("No rows above the thresholds; no peak chart written.".into())
                    }
                    _ => None,
                };
                tab.peak_chart = result.peak_chart.path().map(Path::to_path_buf);
            }
            Err(e) => {
                log::error!("Failed to render {}: {e}", tab.title);
                self.status_message = Some(format!("Error rendering {}: {e}", tab.title));
            }
        }
    }

    pub fn close_tab(&mut self, index: usize) {
        if index >= self.tabs.len() {
            return;
        }
        let closed = self.tabs.remove(index);
        if self.peak_dialog.as_ref().is_some_and(|d| d.tab_id == closed.id) {
            self.peak_dialog = None;
        }
        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(a) if a > index => Some(a - 1),
            Some(a) => Some(a.min(self.tabs.len() - 1)),
            None => None,
        };
    }

    pub fn close_active_tab(&mut self) {
        if let Some(index) = self.active {
            self.close_tab(index);
        }
    }

    pub fn close_all_tabs(&mut self) {
        while !self.tabs.is_empty() {
            self.close_tab(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("silane-peak-state-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn state(dir: &Path) -> AppState {
        AppState::new(
            Settings::new(dir.join("app.config"), dir),
            ChartRenderer::new(dir.join("missing-output")),
        )
    }

    fn tab(id: u64) -> TabView {
        TabView {
            id,
            title: format!("run{id}.csv"),
            source: PathBuf::from(format!("run{id}.csv")),
            dataset: Dataset::from_points("t", "i", &[(0.0, 1.0), (1.0, 5.0)]).unwrap(),
            color: PlotColor::peak(),
            chart: PathBuf::from(format!("chart{id}.png")),
            peak_chart: None,
            summary: None,
        }
    }

    fn with_tabs(dir: &Path, n: u64) -> AppState {
        let mut s = state(dir);
        s.tabs = (0..n).map(tab).collect();
        s.active = Some(0);
        s
    }

    #[test]
    fn closing_tabs_keeps_selection_valid() {
        let dir = scratch_dir("close");
        let mut s = with_tabs(&dir, 3);
        s.active = Some(2);
        s.close_tab(0);
        assert_eq!(s.active, Some(1));
        assert_eq!(s.active_tab().unwrap().id, 2);

        s.close_active_tab();
        assert_eq!(s.active, Some(0));
        assert_eq!(s.active_tab().unwrap().id, 1);

        s.close_all_tabs();
        assert!(s.tabs.is_empty());
        assert_eq!(s.active, None);
    }

    #[test]
    fn unsupported_file_adds_no_tab() {
        let dir = scratch_dir("unsupported");
        let path = dir.join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        let mut s = state(&dir);
        s.open_file(&path);
        assert!(s.tabs.is_empty());
        assert!(s.status_message.as_deref().unwrap().contains("unsupported"));
        assert_eq!(s.settings.last_opened_file.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn peak_dialog_needs_a_tab() {
        let dir = scratch_dir("no-tab");
        let mut s = state(&dir);
        s.open_peak_dialog();
        assert!(s.peak_dialog.is_none());
        assert!(s.status_message.is_some());
    }

    #[test]
    fn invalid_thresholds_keep_the_dialog_open() {
        let dir = scratch_dir("invalid");
        let mut s = with_tabs(&dir, 1);
        s.open_peak_dialog();
        if let Some(d) = s.peak_dialog.as_mut() {
            d.input.mantissa = "abc".into();
            d.input.exponent = "-6".into();
        }
        s.submit_peak_dialog();
        let dialog = s.peak_dialog.as_ref().unwrap();
        assert!(dialog.error.is_some());
        assert_eq!(s.tabs[0].summary, None);
    }

    #[test]
    fn failed_render_keeps_the_previous_chart() {
        let dir = scratch_dir("render-fail");
        let mut s = with_tabs(&dir, 1);
        s.open_peak_dialog();
        if let Some(d) = s.peak_dialog.as_mut() {
            d.input.mantissa = "2.5".into();
            d.input.exponent = "0".into();
        }
        s.submit_peak_dialog();
        assert!(s.peak_dialog.is_none());
        assert_eq!(s.tabs[0].chart, PathBuf::from("chart0.png"));
        assert_eq!(s.tabs[0].summary, None);
        assert!(s.status_message.as_deref().unwrap().starts_with("Error rendering"));
    }

    #[test]
    fn closing_a_tab_drops_its_dialog() {
        let dir = scratch_dir("dialog-close");
        let mut s = with_tabs(&dir, 2);
        s.open_peak_dialog();
        s.close_tab(0);
        assert!(s.peak_dialog.is_none());
    }
}
