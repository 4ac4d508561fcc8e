//! Box frame, tick marks and axis labels around a plot area.

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::VizConfig;
use crate::layout::axes::Axis;
use crate::layout::margins::PlotArea;
use crate::primitives::{LineStyle, Style, TextAnchor, TextBaseline, TextStyle};

const INK: Color = Color::rgb(0, 0, 0);

/// One tick mark: pixel position along the axis, mark length, optional label.
struct Tick {
    px: f64,
    len: f64,
    label: Option<String>,
}

/// Major and minor tick marks mapped to pixels, dropping any that fall
/// outside the plot area. Only majors carry labels.
fn ticks(axis: &Axis, px_min: f64, px_max: f64, config: &VizConfig) -> Vec<Tick> {
    let lo = px_min.min(px_max) - 0.5;
    let hi = px_min.max(px_max) + 0.5;

    let majors = axis.tick_positions.iter().enumerate().map(|(i, &v)| Tick {
        px: axis.data_to_pixel(v, px_min, px_max),
        len: config.axes.tick_length,
        label: axis.tick_labels.get(i).cloned(),
    });
    let minors = axis.minor_ticks.iter().map(|&v| Tick {
        px: axis.data_to_pixel(v, px_min, px_max),
        len: config.axes.minor_tick_length,
        label: None,
    });
    majors.chain(minors).filter(|t| t.px >= lo && t.px <= hi).collect()
}

/// Draw the box frame with inward ticks, tick labels and axis labels.
pub fn draw_axes(
    canvas: &mut Canvas,
    area: &PlotArea,
    x_axis: &Axis,
    y_axis: &Axis,
    config: &VizConfig,
) {
    canvas.rect(area.left, area.top, area.width, area.height, &Style::stroked(INK, 0.8));

    let mark = LineStyle::solid(INK, 0.6);

    let x_tick_text = TextStyle {
        size: config.font.tick_size,
        color: INK,
        anchor: TextAnchor::Middle,
        baseline: TextBaseline::Hanging,
        ..Default::default()
    };
    for t in ticks(x_axis, area.left, area.right(), config) {
        canvas.line(t.px, area.bottom(), t.px, area.bottom() - t.len, &mark);
        if config.axes.show_top_ticks {
            canvas.line(t.px, area.top, t.px, area.top + t.len, &mark);
        }
        if let Some(label) = &t.label {
            canvas.text(t.px, area.bottom() + 3.0, label, &x_tick_text);
        }
    }

    let y_tick_text = TextStyle {
        size: config.font.tick_size,
        color: INK,
        anchor: TextAnchor::End,
        baseline: TextBaseline::Central,
        ..Default::default()
    };
    for t in ticks(y_axis, area.bottom(), area.top, config) {
        canvas.line(area.left, t.px, area.left + t.len, t.px, &mark);
        if config.axes.show_right_ticks {
            canvas.line(area.right(), t.px, area.right() - t.len, t.px, &mark);
        }
        if let Some(label) = &t.label {
            canvas.text(area.left - 4.0, t.px, label, &y_tick_text);
        }
    }

    let label_text = TextStyle {
        size: config.font.label_size,
        color: INK,
        anchor: TextAnchor::Middle,
        ..Default::default()
    };
    if !x_axis.label.is_empty() {
        let y = area.bottom() + config.font.tick_size + 14.0;
        canvas.text(area.left + area.width / 2.0, y, &x_axis.label, &label_text);
    }
    if !y_axis.label.is_empty() {
        let (x, y) = (area.left - 40.0, area.top + area.height / 2.0);
        canvas.text_rotated(x, y, &y_axis.label, &label_text, -90.0);
    }
}
