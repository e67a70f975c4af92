use std::path::Path;

use anyhow::{Context, Result};

use crate::color::ColorScale;
use crate::config::{PathConfig, ViewerConfig};
use crate::data::filter::{
    self, FilteredView, Selection, filter_by_range, select_depth_field, select_property_field,
};
use crate::data::loader::{LoadedContent, LoadedFile, load_file};
use crate::data::model::Dataset;
use crate::error::SelectionError;

/// MIME type of the filtered download.
pub const CSV_MIME: &str = "text/csv";

// ---------------------------------------------------------------------------
// Download payload
// ---------------------------------------------------------------------------

/// What the download responder receives.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Opened file (None until the user loads one).
    pub file: Option<LoadedFile>,

    /// Current depth/property/interval choices, when the dataset allows one.
    pub selection: Option<Selection>,

    /// Observed `(min, max)` of the current depth field; slider limits.
    pub bounds: Option<(f64, f64)>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Bumped on every file load; keeps image URIs unique across files.
    pub generation: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            file: None,
            selection: None,
            bounds: None,
            status_message: None,
            generation: 0,
        }
    }

    /// Load a file from disk and make it current. Failures land in the
    /// status line; the previous file stays open.
    pub fn open_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(file) => self.set_file(file),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded file and reset the selection to defaults.
    pub fn set_file(&mut self, file: LoadedFile) {
        self.file = Some(file);
        self.generation += 1;
        self.selection = None;
        self.bounds = None;
        self.status_message = None;
        self.reset_selection();
    }

    /// Dataset of the current file, for the tabular and well-log paths.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.file.as_ref().and_then(|f| f.content.dataset())
    }

    /// Well logs always use their index as depth.
    pub fn depth_is_fixed(&self) -> bool {
        matches!(
            self.file.as_ref().map(|f| &f.content),
            Some(LoadedContent::WellLog(_))
        )
    }

    fn path_config(&self) -> &PathConfig {
        if self.depth_is_fixed() {
            &self.config.well_log
        } else {
            &self.config.tabular
        }
    }

    pub fn color_scale(&self) -> ColorScale {
        self.path_config().color_scale
    }

    /// Suggested name for the filtered download.
    pub fn download_name(&self) -> &str {
        &self.path_config().download_name
    }

    /// Pick the default depth field, falling back to the first field that
    /// has numeric bounds so the controls always start in a valid state.
    fn reset_selection(&mut self) {
        let Some(ds) = self.dataset() else {
            return;
        };
        let mut candidates: Vec<String> =
            ds.default_depth_field().map(String::from).into_iter().collect();
        if !self.depth_is_fixed() {
            candidates.extend(ds.field_names().iter().skip(1).cloned());
        }

        let mut first_error = None;
        for name in candidates {
            match self.try_depth(&name) {
                Ok(()) => break,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            self.status_message = Some(format!("Error: {e}"));
        }
    }

    fn try_depth(&mut self, name: &str) -> crate::error::Result<()> {
        let Some(ds) = self.dataset() else {
            return Ok(());
        };
        let depth = select_depth_field(ds, name)?;
        let selection = Selection::for_depth(ds, depth)?;
        self.bounds = Some((selection.lower, selection.upper));
        self.selection = Some(selection);
        Ok(())
    }

    /// Change the depth field: bounds reset to the new field's full range and
    /// the property moves off the depth field if needed.
    pub fn select_depth(&mut self, name: &str) {
        let previous_property = self
            .selection
            .as_ref()
            .and_then(|s| s.property.as_ref())
            .map(|p| p.name().to_string());

        match self.try_depth(name) {
            Ok(()) => {
                self.status_message = None;
                if let Some(prop) = previous_property.filter(|p| p != name) {
                    self.select_property(&prop);
                }
            }
            Err(e) => self.report(e),
        }
    }

    pub fn select_property(&mut self, name: &str) {
        let (Some(ds), Some(sel)) = (self.dataset(), self.selection.as_ref()) else {
            return;
        };
        match select_property_field(ds, &sel.depth, name) {
            Ok(prop) => {
                if let Some(sel) = self.selection.as_mut() {
                    sel.property = Some(prop);
                }
                self.status_message = None;
            }
            Err(e) => self.report(e),
        }
    }

    /// Set the depth interval. A reversed or non-finite interval is rejected
    /// and the previous one kept.
    pub fn set_range(&mut self, lower: f64, upper: f64) {
        let (Some(ds), Some(sel)) = (self.dataset(), self.selection.as_ref()) else {
            return;
        };
        let checked = filter_by_range(ds, &sel.depth, lower, upper).map(|_| ());
        match checked {
            Ok(()) => {
                if let Some(sel) = self.selection.as_mut() {
                    sel.lower = lower;
                    sel.upper = upper;
                }
            }
            Err(e) => self.report(e),
        }
    }

    /// Restore the full observed range.
    pub fn reset_range(&mut self) {
        if let Some((lo, hi)) = self.bounds {
            self.set_range(lo, hi);
        }
    }

    fn report(&mut self, e: SelectionError) {
        log::warn!("{e}");
        self.status_message = Some(format!("Error: {e}"));
    }

    /// Re-derive the filtered view for the current selection.
    pub fn filtered_view(&self) -> Option<crate::error::Result<FilteredView<'_>>> {
        let ds = self.dataset()?;
        let sel = self.selection.as_ref()?;
        Some(filter::apply(ds, sel))
    }

    /// Serialize the current view for download.
    pub fn download(&self) -> Result<Download> {
        let view = self
            .filtered_view()
            .context("no tabular data loaded")??;
        Ok(Download {
            file_name: self.download_name().to_string(),
            mime: CSV_MIME,
            bytes: filter::serialize(&view)?,
        })
    }

    /// Write the current download to `path`.
    pub fn save_download(&mut self, path: &Path) {
        let result = self.download().and_then(|d| {
            std::fs::write(path, &d.bytes)
                .with_context(|| format!("writing {}", path.display()))?;
            Ok(d)
        });
        match result {
            Ok(d) => {
                log::info!("Saved {} bytes ({}) to {}", d.bytes.len(), d.mime, path.display());
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to save download: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn tabular(fields: &[&str], rows: Vec<Vec<CellValue>>) -> LoadedFile {
        LoadedFile {
            name: "test.csv".into(),
            content: LoadedContent::Tabular(
                Dataset::columnar(fields.iter().map(|s| s.to_string()).collect(), rows).unwrap(),
            ),
        }
    }

    fn n(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    fn state() -> AppState {
        let mut st = AppState::default();
        st.set_file(tabular(
            &["DEPTH", "GR", "RHOB"],
            vec![
                vec![n(100.0), n(30.0), n(2.3)],
                vec![n(150.0), n(45.0), n(2.4)],
                vec![n(200.0), n(60.0), n(2.5)],
            ],
        ));
        st
    }

    fn property(st: &AppState) -> Option<&str> {
        st.selection.as_ref()?.property.as_ref().map(|p| p.name())
    }

    #[test]
    fn defaults_after_load() {
        let st = state();
        let sel = st.selection.as_ref().unwrap();
        assert_eq!(sel.depth.name(), "DEPTH");
        assert_eq!((sel.lower, sel.upper), (100.0, 200.0));
        assert_eq!(property(&st), Some("GR"));
        assert_eq!(st.filtered_view().unwrap().unwrap().len(), 3);
        assert_eq!(st.color_scale(), ColorScale::Viridis);
    }

    #[test]
    fn depth_change_moves_property_off_depth() {
        let mut st = state();
        st.select_depth("GR");
        assert_eq!(st.bounds, Some((30.0, 60.0)));
        assert_eq!(property(&st), Some("DEPTH"));

        st.select_property("RHOB");
        st.select_depth("DEPTH");
        assert_eq!(property(&st), Some("RHOB"), "compatible property is kept");
    }

    #[test]
    fn property_equal_to_depth_is_reported() {
        let mut st = state();
        st.select_property("DEPTH");
        assert_eq!(property(&st), Some("GR"));
        assert!(st.status_message.as_deref().unwrap().contains("depth field"));
    }

    #[test]
    fn reversed_range_keeps_previous() {
        let mut st = state();
        st.set_range(120.0, 180.0);
        st.set_range(190.0, 110.0);
        let sel = st.selection.as_ref().unwrap();
        assert_eq!((sel.lower, sel.upper), (120.0, 180.0));
        assert!(st.status_message.is_some());
        assert_eq!(st.filtered_view().unwrap().unwrap().len(), 1);

        st.reset_range();
        assert_eq!(st.filtered_view().unwrap().unwrap().len(), 3);
    }

    #[test]
    fn non_numeric_first_column_falls_back() {
        let mut st = AppState::default();
        st.set_file(tabular(
            &["WELL", "DEPTH"],
            vec![vec!["A-1".into(), n(10.0)], vec!["A-1".into(), n(20.0)]],
        ));
        let sel = st.selection.as_ref().unwrap();
        assert_eq!(sel.depth.name(), "DEPTH");
        assert!(st.status_message.as_deref().unwrap().contains("not numeric"));
    }

    #[test]
    fn download_uses_configured_name() {
        let mut st = state();
        st.set_range(150.0, 200.0);
        let d = st.download().unwrap();
        assert_eq!(d.file_name, "filtered_data.csv");
        assert_eq!(d.mime, "text/csv");
        assert_eq!(
            String::from_utf8(d.bytes).unwrap(),
            "DEPTH,GR,RHOB\n150,45,2.4\n200,60,2.5\n"
        );
    }

    #[test]
    fn no_file_no_download() {
        assert!(AppState::default().download().is_err());
    }
}
