use std::sync::Arc;

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::document::{DocumentContent, RasterImage};
use crate::data::las::WellLog;
use crate::data::model::Dataset;

const ROW_HEIGHT: f32 = 18.0;
const TABLE_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Dataset preview
// ---------------------------------------------------------------------------

/// Scrollable table of every record; virtualised, so large files are fine.
pub fn data_table(ui: &mut Ui, dataset: &Dataset) {
    let fields = dataset.field_names();
    let index = dataset.index_name();

    ScrollArea::horizontal()
        .id_salt("preview_table")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(true)
                .max_scroll_height(TABLE_HEIGHT)
                .columns(Column::auto().at_least(60.0).resizable(true), fields.len())
                .header(ROW_HEIGHT + 2.0, |mut header| {
                    for name in fields {
                        header.col(|ui: &mut Ui| {
                            let mut text = RichText::new(name.as_str()).strong();
                            if Some(name.as_str()) == index {
                                text = text.italics();
                            }
                            ui.label(text);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                        let Some(record) = dataset.row(row.index()) else {
                            return;
                        };
                        for cell in record {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                });
        });
}

// ---------------------------------------------------------------------------
// LAS header
// ---------------------------------------------------------------------------

pub fn las_header(ui: &mut Ui, log: &WellLog) {
    egui::CollapsingHeader::new(RichText::new("LAS header").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ScrollArea::vertical()
                .id_salt("las_header")
                .max_height(220.0)
                .show(ui, |ui: &mut Ui| {
                    ui.label(RichText::new(log.to_string()).monospace());
                });
        });
}

// ---------------------------------------------------------------------------
// Images and documents
// ---------------------------------------------------------------------------

pub fn raster(ui: &mut Ui, image: &RasterImage, uri: String, caption: &str) {
    ui.add(
        egui::Image::from_bytes(uri, Arc::clone(&image.bytes))
            .max_width(ui.available_width())
            .maintain_aspect_ratio(true),
    );
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(format!("{caption} ({}×{})", image.width, image.height)).weak());
    });
}

/// Extracted text in a read-only box, followed by any embedded images.
pub fn document(ui: &mut Ui, doc: &DocumentContent, uri_prefix: &str) {
    ui.label(format!("{} pages", doc.page_count));
    ui.strong("Extracted PDF Text");
    ScrollArea::vertical()
        .id_salt("pdf_text")
        .max_height(300.0)
        .show(ui, |ui: &mut Ui| {
            let mut text = doc.text.as_str();
            ui.add(
                egui::TextEdit::multiline(&mut text)
                    .desired_width(f32::INFINITY)
                    .font(egui::TextStyle::Monospace),
            );
        });

    if doc.images.is_empty() {
        return;
    }
    ui.add_space(8.0);
    ui.heading("Extracted Images from PDF");
    for (i, img) in doc.images.iter().enumerate() {
        raster(ui, img, img.uri(&format!("{uri_prefix}-{i}")), "Extracted Image");
        ui.add_space(6.0);
    }
}
