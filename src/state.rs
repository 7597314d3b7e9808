use std::path::Path;

use anyhow::Context;

use crate::chart::{self, Chart, ChartKind, ChartRequest};
use crate::data::export;
use crate::data::filter::{self, FilterState};
use crate::data::loader;
use crate::data::model::Table;
use crate::data::summary::{self, Summary};
use crate::error::DashboardResult;

// ---------------------------------------------------------------------------
// Derived view of one interaction cycle
// ---------------------------------------------------------------------------

/// Everything derived from the loaded table for the current controls.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub preview: Table,
    pub summary: Summary,
    /// Loaded table narrowed by every range filter.
    pub filtered: Table,
    pub chart: Option<Chart>,
    pub histograms: Vec<Chart>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file parses). Never mutated after load.
    pub dataset: Option<Table>,

    /// Display name of the loaded source.
    pub source_name: Option<String>,

    /// Per-column range selections.
    pub filters: FilterState,

    /// Column driving the single-column chart.
    pub selected_column: Option<String>,

    /// Columns chosen for the histogram section, in selection order.
    pub histogram_columns: Vec<String>,

    pub chart_kind: ChartKind,

    /// Derived view (cached until a control changes).
    pub view: Option<DashboardView>,

    /// Status / error message shown in the UI.
    pub status_message: Option<StatusMessage>,
}

impl AppState {
    /// Read a `.csv` file from disk and install it through
    /// [`AppState::load_bytes`].
    pub fn load_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = match loader::read_upload(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.clear_with_error(format!("Error: {e:#}"));
                return Err(e);
            }
        };
        self.load_bytes(&bytes, &name)
            .with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse uploaded bytes and install the result. On failure the previous
    /// dataset is discarded so no section renders.
    pub fn load_bytes(&mut self, bytes: &[u8], source_name: &str) -> DashboardResult<()> {
        match loader::parse_csv(bytes) {
            Ok(table) => {
                self.set_dataset(table, source_name);
                Ok(())
            }
            Err(e) => {
                self.clear_with_error(format!("Failed to load {source_name}: {e}"));
                Err(e)
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise controls and the view.
    pub fn set_dataset(&mut self, dataset: Table, source_name: &str) {
        log::info!(
            "Loaded {} rows with columns {:?} from {source_name}",
            dataset.row_count(),
            dataset.column_names()
        );

        self.filters = filter::init_filter_state(&dataset);
        // Default selection: first column, like a select box.
        self.selected_column = dataset.column_names().into_iter().next();
        self.histogram_columns.clear();
        self.chart_kind = ChartKind::default();
        self.source_name = Some(source_name.to_string());
        self.status_message = Some(StatusMessage::Info(format!(
            "File uploaded successfully: {source_name}"
        )));

        self.dataset = Some(dataset);
        self.refresh();
    }

    /// Drop the dataset and show only the failure.
    pub fn clear_with_error(&mut self, message: String) {
        log::error!("{message}");
        self.dataset = None;
        self.source_name = None;
        self.filters.clear();
        self.selected_column = None;
        self.histogram_columns.clear();
        self.view = None;
        self.status_message = Some(StatusMessage::Error(message));
    }

    /// Re-run the pipeline from the loaded table with the current controls.
    pub fn refresh(&mut self) {
        self.view = self.dataset.as_ref().map(|ds| {
            let filtered = filter::apply_filters(ds, &self.filters);
            let request = ChartRequest {
                column: self.selected_column.clone(),
                kind: self.chart_kind,
            };
            DashboardView {
                preview: summary::preview(ds),
                summary: summary::describe(ds),
                chart: chart::render(&filtered, &request),
                histograms: chart::render_histograms(&filtered, &self.histogram_columns),
                filtered,
            }
        });
    }

    pub fn set_selected_column(&mut self, column: Option<String>) {
        if self.selected_column != column {
            self.selected_column = column;
            self.refresh();
        }
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        if self.chart_kind != kind {
            self.chart_kind = kind;
            self.refresh();
        }
    }

    /// Add or remove a column from the histogram selection.
    pub fn toggle_histogram_column(&mut self, column: &str) {
        if let Some(pos) = self.histogram_columns.iter().position(|c| c == column) {
            self.histogram_columns.remove(pos);
        } else {
            self.histogram_columns.push(column.to_string());
        }
        self.refresh();
    }

    pub fn set_filter_range(&mut self, column: &str, low: f64, high: f64) {
        if filter::set_range(&mut self.filters, column, low, high) {
            self.refresh();
        }
    }

    pub fn reset_filter(&mut self, column: &str) {
        if let Some(f) = self.filters.get_mut(column) {
            f.reset();
            self.refresh();
        }
    }

    pub fn reset_filters(&mut self) {
        filter::reset_all(&mut self.filters);
        self.refresh();
    }

    /// CSV bytes of the filtered table, `None` before a dataset is loaded.
    pub fn export_bytes(&self) -> Option<DashboardResult<Vec<u8>>> {
        self.view.as_ref().map(|v| export::to_csv_bytes(&v.filtered))
    }

    /// Write the filtered table to `path` and report the outcome in the
    /// status line.
    pub fn save_export(&mut self, path: &Path) -> anyhow::Result<()> {
        match self.write_export(path) {
            Ok(rows) => {
                log::info!(
                    "Exported {rows} rows to {} ({})",
                    path.display(),
                    export::EXPORT_MIME
                );
                self.status_message =
                    Some(StatusMessage::Info(format!("Saved {}", path.display())));
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                self.status_message = Some(StatusMessage::Error(format!("Error: {e:#}")));
                Err(e)
            }
        }
    }

    fn write_export(&self, path: &Path) -> anyhow::Result<usize> {
        let bytes = self
            .export_bytes()
            .context("no dataset loaded")?
            .context("encoding CSV export")?;
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(self.view.as_ref().map_or(0, |v| v.filtered.row_count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    const SAMPLE: &[u8] = b"id,category,value\n1,a,10.0\n2,b,20.0\n3,a,30.0\n";

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.load_bytes(SAMPLE, "sample.csv").unwrap();
        state
    }

    #[test]
    fn loading_initialises_controls_and_view() {
        let state = loaded();
        assert_eq!(state.selected_column.as_deref(), Some("id"));
        assert_eq!(state.filters.len(), 2);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.filtered.row_count(), 3);
        assert_eq!(view.preview.row_count(), 3);
        assert!(matches!(view.summary, Summary::Numeric(ref rows) if rows.len() == 2));
        assert!(matches!(view.chart, Some(Chart::Line { .. })));
        assert!(matches!(state.status_message, Some(StatusMessage::Info(_))));
    }

    #[test]
    fn parse_failure_discards_everything() {
        let mut state = loaded();
        assert!(state.load_bytes(b"a,b\n1,2,3\n", "bad.csv").is_err());
        assert!(state.dataset.is_none());
        assert!(state.view.is_none());
        assert!(state.export_bytes().is_none());
        assert!(matches!(state.status_message, Some(StatusMessage::Error(_))));
    }

    #[test]
    fn filtering_narrows_chart_and_export_but_not_summary() {
        let mut state = loaded();
        state.set_selected_column(Some("category".into()));
        state.set_chart_kind(ChartKind::Bar);
        state.set_filter_range("value", 15.0, 30.0);

        let view = state.view.as_ref().unwrap();
        assert_eq!(view.filtered.index(), &[1, 2]);
        let Some(Chart::Bar { counts, .. }) = &view.chart else {
            panic!("expected a bar chart");
        };
        assert_eq!(counts.len(), 2);
        assert!(counts.iter().all(|(_, n)| *n == 1));
        let Summary::Numeric(rows) = &view.summary else {
            panic!("expected numeric summary");
        };
        assert_eq!(rows[0].count, 3);

        let bytes = state.export_bytes().unwrap().unwrap();
        assert_eq!(parse_csv(&bytes).unwrap().row_count(), 2);
    }

    #[test]
    fn type_mismatch_only_skips_the_chart() {
        let mut state = loaded();
        state.set_selected_column(Some("category".into()));
        state.set_chart_kind(ChartKind::Line);
        let view = state.view.as_ref().unwrap();
        assert!(view.chart.is_none());
        assert_eq!(view.filtered.row_count(), 3);
    }

    #[test]
    fn widening_after_narrowing_restores_rows() {
        let mut state = loaded();
        state.set_filter_range("value", 30.0, 30.0);
        assert_eq!(state.view.as_ref().unwrap().filtered.row_count(), 1);

        state.set_filter_range("value", 10.0, 30.0);
        assert_eq!(
            state.view.as_ref().unwrap().filtered,
            *state.dataset.as_ref().unwrap()
        );

        state.set_filter_range("id", 2.0, 2.0);
        state.reset_filter("id");
        assert_eq!(state.view.as_ref().unwrap().filtered.row_count(), 3);

        state.set_filter_range("id", 3.0, 3.0);
        state.reset_filters();
        assert_eq!(state.view.as_ref().unwrap().filtered.row_count(), 3);
    }

    #[test]
    fn histogram_selection_toggles() {
        let mut state = loaded();
        state.toggle_histogram_column("value");
        state.toggle_histogram_column("category");
        assert_eq!(state.histogram_columns, vec!["value", "category"]);
        assert_eq!(state.view.as_ref().unwrap().histograms.len(), 1);

        state.toggle_histogram_column("value");
        assert_eq!(state.histogram_columns, vec!["category"]);
        assert!(state.view.as_ref().unwrap().histograms.is_empty());
    }

    #[test]
    fn empty_selection_renders_no_chart() {
        let mut state = loaded();
        state.set_selected_column(None);
        assert!(state.view.as_ref().unwrap().chart.is_none());
    }

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("csv-dashboard-{}-{name}", std::process::id()))
    }

    #[test]
    fn load_path_installs_a_csv_file() {
        let path = scratch_path("load.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let mut state = AppState::default();
        state.load_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(state.dataset.as_ref().unwrap().row_count(), 3);
        assert_eq!(
            state.source_name.as_deref(),
            path.file_name().and_then(|n| n.to_str())
        );
        assert!(matches!(state.status_message, Some(StatusMessage::Info(_))));
    }

    #[test]
    fn load_path_failures_clear_the_session() {
        let mut state = loaded();
        assert!(state.load_path(Path::new("data.parquet")).is_err());
        assert!(state.dataset.is_none());
        assert!(state.view.is_none());

        let path = scratch_path("ragged.csv");
        std::fs::write(&path, "a,b\n1,2,3\n").unwrap();
        let mut state = loaded();
        let err = state.load_path(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(format!("{err:#}").contains("Expected 2 fields"));
        assert!(state.dataset.is_none());
        assert!(matches!(state.status_message, Some(StatusMessage::Error(_))));
    }

    #[test]
    fn save_export_writes_the_filtered_rows() {
        let mut state = loaded();
        state.set_filter_range("value", 15.0, 30.0);

        let path = scratch_path(export::EXPORT_FILE_NAME);
        state.save_export(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(written, "id,category,value\n2,b,20.0\n3,a,30.0\n");
        assert!(matches!(state.status_message, Some(StatusMessage::Info(_))));
    }

    #[test]
    fn save_export_without_a_dataset_reports_an_error() {
        let mut state = AppState::default();
        assert!(state.save_export(&scratch_path("none.csv")).is_err());
        assert!(matches!(state.status_message, Some(StatusMessage::Error(_))));
    }
}
