//! Normalized signal-vs-background step overlay for one variable.

use sc_analysis::{HistSeries, VariableOverlay};

use crate::canvas::Canvas;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::legend::{draw_legend, LegendEntry, LegendKind};
use crate::layout::margins::PlotArea;
use crate::plots::axes_draw::draw_axes;
use crate::primitives::*;
use crate::Result;

/// Render one variable overlay to an SVG string.
pub fn render(region_label: &str, var: &VariableOverlay, config: &VizConfig) -> Result<String> {
    let mut canvas = Canvas::new(config.figure.width, config.figure.height);

    let (x_lo, x_hi) = x_extent(var);
    let x_axis = Axis::auto_linear(x_lo, x_hi, 6).with_label(&var.axis_title);

    let y_max = var
        .signal
        .y
        .iter()
        .chain(var.background.y.iter())
        .fold(0.0_f64, |a, &b| a.max(b));
    // Headroom so the legend does not sit on the tallest bin.
    let y_axis = Axis::auto_linear(0.0, (y_max * 1.25).max(1e-3), 5).with_label("Fraction of events");

    let area = PlotArea::auto(&canvas, Some(&y_axis), Some(&x_axis), config);

    let sig_color = config.colors.signal;
    let bg_color = config.colors.background;

    // Background first so the signal fill reads on top of the hatching.
    let bg_pts = step_points(&var.background, &x_axis, &y_axis, &area);
    canvas.hatch_polygon(&bg_pts, "hatch_bg", bg_color, 4.0);
    canvas.polyline(&bg_pts, &LineStyle::solid(bg_color, 1.2));

    let sig_pts = step_points(&var.signal, &x_axis, &y_axis, &area);
    canvas.polygon(
        &sig_pts,
        &Style::filled(sig_color.with_alpha(config.colors.signal_fill_alpha)),
    );
    canvas.polyline(&sig_pts, &LineStyle::solid(sig_color, 1.2));

    draw_axes(&mut canvas, &area, &x_axis, &y_axis, config);

    let entries = vec![
        LegendEntry {
            label: "Signal".to_string(),
            color: sig_color.with_alpha(config.colors.signal_fill_alpha),
            kind: LegendKind::FilledRect,
        },
        LegendEntry {
            label: "Background".to_string(),
            color: bg_color,
            kind: LegendKind::HatchedRect,
        },
    ];
    let legend_bottom = draw_legend(&mut canvas, &area, &entries, config.font.label_size, true);

    let annotation_style = TextStyle {
        size: config.font.label_size * 0.9,
        color: config.colors.annotation,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    canvas.text(area.right() - 11.0, legend_bottom + 4.0, region_label, &annotation_style);

    Ok(canvas.finish_svg())
}

/// X extent: display hint when present, bin edge extremes otherwise.
fn x_extent(var: &VariableOverlay) -> (f64, f64) {
    if let Some([lo, hi]) = var.display_range {
        return (lo, hi);
    }
    let lo = edge_min(&var.signal).min(edge_min(&var.background));
    let hi = edge_max(&var.signal).max(edge_max(&var.background));
    (lo, hi)
}

fn edge_min(s: &HistSeries) -> f64 {
    s.bin_edges.first().copied().unwrap_or(0.0)
}

fn edge_max(s: &HistSeries) -> f64 {
    s.bin_edges.last().copied().unwrap_or(1.0)
}

/// Closed step-histogram outline in pixel coordinates.
///
/// Edges can lie outside the display range; x is clamped to the axis bounds so
/// the outline stays inside the frame.
fn step_points(series: &HistSeries, x_axis: &Axis, y_axis: &Axis, area: &PlotArea) -> Vec<(f64, f64)> {
    let px = |v: f64| {
        let clamped = v.clamp(x_axis.min, x_axis.max);
        x_axis.data_to_pixel(clamped, area.left, area.right())
    };
    let py = |v: f64| y_axis.data_to_pixel(v, area.bottom(), area.top);

    let n = series.y.len();
    let mut pts = Vec::with_capacity(2 * n + 2);
    if n == 0 || series.bin_edges.len() != n + 1 {
        return pts;
    }

    pts.push((px(series.bin_edges[0]), py(0.0)));
    for i in 0..n {
        let y = py(series.y[i]);
        pts.push((px(series.bin_edges[i]), y));
        pts.push((px(series.bin_edges[i + 1]), y));
    }
    pts.push((px(series.bin_edges[n]), py(0.0)));
    pts
}
