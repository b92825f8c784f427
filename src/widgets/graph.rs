//! Auto-scaling line graph for the 24h temperature page.

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};
use embedded_graphics_simulator::SimulatorDisplay;

use crate::colors::GRAY;

/// Draw a line graph of `samples` across the given area.
///
/// The Y axis auto-scales to the local min/max with 2px padding; a flat
/// series draws a centered horizontal line. X spreads the samples across the
/// full width so sparse series still fill the area. Fewer than 2 samples
/// draws nothing.
pub fn draw_line_graph(
    display: &mut SimulatorDisplay<Rgb565>,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    samples: &[f32],
    color: Rgb565,
) {
    if samples.len() < 2 || w < 5 || h < 5 {
        return;
    }

    Rectangle::new(Point::new(x, y), Size::new(w, h))
        .into_styled(PrimitiveStyle::with_stroke(GRAY, 1))
        .draw(display)
        .ok();

    let graph_w = w as i32 - 4;
    let graph_h = h as i32 - 4;
    let graph_x = x + 2;
    let graph_y = y + 2;
    let max_x = graph_x + graph_w - 1;
    let max_y = graph_y + graph_h - 1;

    let data_min = samples.iter().copied().fold(f32::INFINITY, f32::min);
    let data_max = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = data_max - data_min;
    let y_scale = if range > 0.1 { (graph_h - 1) as f32 / range } else { 0.0 };
    let x_step = (graph_w - 1) as f32 / (samples.len() - 1) as f32;

    let style = PrimitiveStyle::with_stroke(color, 1);
    let mut prev: Option<Point> = None;
    for (i, &value) in samples.iter().enumerate() {
        let sx = (graph_x + (i as f32 * x_step) as i32).min(max_x);
        let sy = if y_scale > 0.0 {
            // Screen Y grows downward; higher values go to the top
            (graph_y + graph_h - 1 - ((value - data_min) * y_scale) as i32).clamp(graph_y, max_y)
        } else {
            graph_y + (graph_h - 1) / 2
        };
        let point = Point::new(sx, sy);
        if let Some(p) = prev {
            Line::new(p, point).into_styled(style).draw(display).ok();
        }
        prev = Some(point);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
