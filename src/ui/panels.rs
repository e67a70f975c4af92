use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::property_candidates;
use crate::data::loader::LoadedContent;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Changes requested by the side panel, applied after rendering so widgets
/// can borrow the state immutably.
enum Action {
    Depth(String),
    Property(String),
    Range(f64, f64),
    ResetRange,
    Download,
}

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    let Some(dataset) = state.dataset() else {
        let msg = match state.file.as_ref().map(|f| &f.content) {
            Some(LoadedContent::Image(_)) | Some(LoadedContent::Document(_)) => {
                "No depth data in this file."
            }
            _ => "No file loaded.",
        };
        ui.label(msg);
        return;
    };

    let mut actions = Vec::new();
    let selection = state.selection.as_ref();
    let depth_name = selection.map(|s| s.depth.name()).unwrap_or_default();

    // ---- Depth field ----
    if let Some(LoadedContent::WellLog(log)) = state.file.as_ref().map(|f| &f.content) {
        let unit = log.depth_unit().map(|u| format!(" [{u}]")).unwrap_or_default();
        ui.label(format!("Depth: {depth_name}{unit} (index)"));
    } else {
        ui.strong("Select Depth Column:");
        egui::ComboBox::from_id_salt("depth_column")
            .selected_text(depth_name)
            .show_ui(ui, |ui: &mut Ui| {
                for col in dataset.field_names() {
                    if ui.selectable_label(depth_name == col.as_str(), col.as_str()).clicked() {
                        actions.push(Action::Depth(col.clone()));
                    }
                }
            });
    }
    ui.separator();

    let (Some(sel), Some((lo, hi))) = (selection, state.bounds) else {
        ui.label("Pick a numeric depth column.");
        apply(state, actions);
        return;
    };

    // ---- Depth range ----
    ui.strong("Select Depth Range:");
    let mut lower = sel.lower;
    let mut upper = sel.upper;
    let lower_changed = ui
        .add(egui::Slider::new(&mut lower, lo..=hi).text("min"))
        .changed();
    let upper_changed = ui
        .add(egui::Slider::new(&mut upper, lo..=hi).text("max"))
        .changed();
    if lower_changed || upper_changed {
        // The slider being dragged pushes the other one along.
        if lower > upper {
            if lower_changed {
                upper = lower;
            } else {
                lower = upper;
            }
        }
        actions.push(Action::Range(lower, upper));
    }
    if ui.small_button("Full range").clicked() {
        actions.push(Action::ResetRange);
    }
    ui.separator();

    // ---- Property field ----
    let label = if state.depth_is_fixed() {
        "Select Log Property to Plot:"
    } else {
        "Select Property Column to Plot:"
    };
    ui.strong(label);
    let current = sel.property.as_ref().map(|p| p.name()).unwrap_or_default();
    egui::ComboBox::from_id_salt("property_column")
        .selected_text(current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in property_candidates(dataset, &sel.depth) {
                if ui.selectable_label(current == col, col).clicked() {
                    actions.push(Action::Property(col.to_string()));
                }
            }
        });
    ui.separator();

    // ---- Download ----
    let label = if state.depth_is_fixed() {
        "Download Filtered LAS Data"
    } else {
        "Download Filtered Data"
    };
    if ui.button(label).clicked() {
        actions.push(Action::Download);
    }

    apply(state, actions);
}

fn apply(state: &mut AppState, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::Depth(name) => state.select_depth(&name),
            Action::Property(name) => state.select_property(&name),
            Action::Range(lower, upper) => state.set_range(lower, upper),
            Action::ResetRange => state.reset_range(),
            Action::Download => save_file_dialog(state),
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(file) = &state.file {
            ui.label(file.name.as_str());
            if let Some(ds) = file.content.dataset() {
                let visible = match state.filtered_view() {
                    Some(Ok(view)) => view.len().to_string(),
                    _ => "–".to_string(),
                };
                ui.label(format!("{} records, {visible} in range", ds.len()));
            }
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open petrophysical data")
        .add_filter(
            "Supported files",
            &["csv", "las", "png", "pdf", "json", "parquet", "pq"],
        )
        .add_filter("CSV", &["csv"])
        .add_filter("LAS well log", &["las"])
        .add_filter("PNG image", &["png"])
        .add_filter("PDF document", &["pdf"])
        .add_filter("JSON / Parquet", &["json", "parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(state.download_name())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.save_download(&path);
    }
}
