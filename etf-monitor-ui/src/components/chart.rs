//! Chart Helpers
//!
//! Shared HTML5 Canvas drawing used by the top holdings and price charts.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Chart background (gray-800)
pub const BACKGROUND: &str = "#1f2937";
/// Grid lines (gray-700)
pub const GRID: &str = "#374151";
/// Axis labels (gray-400)
pub const LABEL: &str = "#9ca3af";
/// Series color
pub const ACCENT: &str = "#9C27B0";

const GRID_LINES: usize = 5;

/// Plot area inside a canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Frame {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin_left: 60.0,
            margin_right: 20.0,
            margin_top: 20.0,
            margin_bottom: 40.0,
        }
    }

    pub fn chart_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn chart_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// Canvas y for a value (canvas y grows downward)
    pub fn y_for(&self, value: f64, min: f64, max: f64) -> f64 {
        self.margin_top + ((max - value) / (max - min)) * self.chart_height()
    }

    /// Canvas x for the i-th of `count` evenly spaced points
    pub fn x_for(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            return self.margin_left + self.chart_width() / 2.0;
        }
        self.margin_left + (index as f64 / (count - 1) as f64) * self.chart_width()
    }
}

/// Y-axis range for a series, padded by 10% and never empty
pub fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values
        .into_iter()
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((min, max)) => Some((min.min(v), max.max(v))),
            None => Some((v, v)),
        })?;

    let span = max - min;
    let padding = if span > 0.0 { span * 0.1 } else { 1.0 };
    Some((min - padding, max + padding))
}

/// 2D drawing context of a canvas
pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// Fill the whole canvas with the background color
pub fn clear(ctx: &CanvasRenderingContext2d, frame: &Frame) {
    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
}

/// Horizontal grid lines with value labels on the left
pub fn draw_y_grid(ctx: &CanvasRenderingContext2d, frame: &Frame, min: f64, max: f64) {
    ctx.set_stroke_style(&GRID.into());
    ctx.set_line_width(1.0);
    ctx.set_fill_style(&LABEL.into());
    ctx.set_font("12px sans-serif");

    for i in 0..=GRID_LINES {
        let y = frame.margin_top + (i as f64 / GRID_LINES as f64) * frame.chart_height();
        ctx.begin_path();
        ctx.move_to(frame.margin_left, y);
        ctx.line_to(frame.width - frame.margin_right, y);
        ctx.stroke();

        let value = max - (i as f64 / GRID_LINES as f64) * (max - min);
        let _ = ctx.fill_text(&format!("{:.1}", value), 5.0, y + 4.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_padding() {
        assert_eq!(value_range([10.0, 20.0]), Some((9.0, 21.0)));
        assert_eq!(value_range([5.0]), Some((4.0, 6.0)));
        assert_eq!(value_range(std::iter::empty()), None);
    }

    #[test]
    fn test_frame_mapping() {
        let frame = Frame::new(800.0, 400.0);
        assert_eq!(frame.chart_width(), 720.0);
        assert_eq!(frame.chart_height(), 340.0);

        assert_eq!(frame.y_for(10.0, 0.0, 10.0), 20.0);
        assert_eq!(frame.y_for(0.0, 0.0, 10.0), 360.0);

        assert_eq!(frame.x_for(0, 3), 60.0);
        assert_eq!(frame.x_for(2, 3), 780.0);
        assert_eq!(frame.x_for(0, 1), 420.0);
    }
}
