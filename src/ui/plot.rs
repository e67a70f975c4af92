use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::chart::{histogram, numeric_values, scatter_points, value_range};
use crate::data::filter::{FieldRef, FilteredView};
use crate::state::AppState;

/// Scatter points are drawn in this many colour batches.
const COLOR_BUCKETS: usize = 24;

const PLOT_HEIGHT: f32 = 380.0;

// ---------------------------------------------------------------------------
// Depth vs property scatter
// ---------------------------------------------------------------------------

/// Property on x, depth on y increasing downward, points shaded by property.
pub fn depth_scatter(
    ui: &mut Ui,
    state: &AppState,
    view: &FilteredView<'_>,
    depth: &FieldRef,
    property: &FieldRef,
) {
    let title = if state.depth_is_fixed() {
        format!("{} vs. Depth with Zoom and Pan", property.name())
    } else {
        format!("{} vs. {} with Color Scale", property.name(), depth.name())
    };
    ui.heading(title);

    let points = match scatter_points(view, depth, property) {
        Ok(points) => points,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            return;
        }
    };
    let Some(range) = value_range(&points.iter().map(|p| p[0]).collect::<Vec<_>>()) else {
        ui.label("No points in the selected depth range.");
        return;
    };

    let color_map = ColorMap::new(state.color_scale(), range);
    let colors = color_map.bucket_colors(COLOR_BUCKETS);
    let mut buckets: Vec<Vec<[f64; 2]>> = vec![Vec::new(); COLOR_BUCKETS];
    for [p, d] in points {
        // Negated so depth grows downward.
        buckets[color_map.bucket(p, COLOR_BUCKETS)].push([p, -d]);
    }

    let depth_label = if state.depth_is_fixed() {
        "Depth".to_string()
    } else {
        depth.name().to_string()
    };
    let hover_depth = depth_label.clone();
    let hover_prop = property.name().to_string();
    let radius = state.config.point_radius;

    Plot::new("depth_scatter")
        .height(PLOT_HEIGHT)
        .x_axis_label(property.name())
        .y_axis_label(depth_label)
        .y_axis_formatter(|mark, _range| format!("{}", -mark.value))
        .label_formatter(move |_name, value| {
            format!("{hover_prop}: {:.3}\n{hover_depth}: {:.3}", value.x, -value.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (bucket, color) in buckets.into_iter().zip(colors) {
                if bucket.is_empty() {
                    continue;
                }
                let series: PlotPoints = bucket.into_iter().collect();
                plot_ui.points(Points::new(series).color(color).radius(radius));
            }
        });
}

// ---------------------------------------------------------------------------
// Property histogram
// ---------------------------------------------------------------------------

/// Distribution of the property over the filtered records.
pub fn property_histogram(
    ui: &mut Ui,
    state: &AppState,
    view: &FilteredView<'_>,
    property: &FieldRef,
) {
    ui.heading(format!("Histogram of {}", property.name()));

    let values = match numeric_values(view, property) {
        Ok(values) => values,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            return;
        }
    };
    let bins = histogram(&values, state.config.histogram_bins);
    if bins.is_empty() {
        ui.label("No values in the selected depth range.");
        return;
    }

    let fill = state.color_scale().color_at(0.5);
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| Bar::new(b.center(), b.count as f64).width(b.width()).fill(fill))
        .collect();

    Plot::new("property_histogram")
        .height(PLOT_HEIGHT)
        .x_axis_label(property.name())
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars).name(format!("Distribution of {}", property.name())),
            );
        });
}
