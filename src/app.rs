use eframe::egui::{self, ScrollArea, Ui};

use crate::data::loader::LoadedContent;
use crate::state::AppState;
use crate::ui::{panels, plot, preview};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PetroViewerApp {
    pub state: AppState,
}

impl PetroViewerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl Default for PetroViewerApp {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl eframe::App for PetroViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: depth / property selection ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: preview and plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| central(ui, &self.state));
        });
    }
}

fn central(ui: &mut Ui, state: &AppState) {
    let Some(file) = &state.file else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to begin  (File → Open…)");
        });
        return;
    };
    let uri_prefix = format!("{}-{}", state.generation, file.name);

    match &file.content {
        LoadedContent::Tabular(ds) => {
            ui.heading("CSV Data Preview");
            preview::data_table(ui, ds);
            plots(ui, state);
        }
        LoadedContent::WellLog(log) => {
            ui.heading("LAS File Data");
            preview::las_header(ui, log);
            ui.strong("Preview of LAS Data:");
            preview::data_table(ui, &log.data);
            plots(ui, state);
        }
        LoadedContent::Image(img) => {
            ui.heading("Log Image");
            preview::raster(ui, img, img.uri(&uri_prefix), "Uploaded Log Image");
        }
        LoadedContent::Document(doc) => {
            ui.heading("PDF Content");
            preview::document(ui, doc, &uri_prefix);
        }
    }
}

/// Scatter and histogram for the current selection, re-derived every frame.
fn plots(ui: &mut Ui, state: &AppState) {
    let Some(sel) = &state.selection else {
        return;
    };
    let Some(result) = state.filtered_view() else {
        return;
    };
    let view = match result {
        Ok(view) => view,
        Err(e) => {
            ui.colored_label(egui::Color32::RED, e.to_string());
            return;
        }
    };
    let Some(property) = &sel.property else {
        ui.label("No property column to plot.");
        return;
    };

    ui.add_space(12.0);
    plot::depth_scatter(ui, state, &view, &sel.depth, property);
    ui.add_space(12.0);
    plot::property_histogram(ui, state, &view, property);
}
