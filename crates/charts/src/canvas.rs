//! Raster backend
//!
//! `CanvasSurface` records drawing calls as a display list of
//! `DrawCommand`s in CSS pixels. A host replays the list onto a 2-D canvas
//! context whose backing store is `client size × device_pixel_ratio`.

use serde::Serialize;

use crate::error::ChartResult;
use crate::layout::{LayoutPoint, LayoutRect};
use crate::model::Color;
use crate::surface::{DrawingSurface, Stroke, TextAlign, TextBaseline, TextStyle};

/// A single replayable canvas operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Reset the transform to `scale(factor, factor)`
    Scale { factor: f64 },
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Save state and clip to a rectangle
    Clip {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Restore the state saved by the matching `Clip`
    Restore,
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
        stroke_width: f64,
        dash: Vec<f64>,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        stroke: String,
        stroke_width: f64,
        dash: Vec<f64>,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        fill: String,
    },
    Wedge {
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        fill: String,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        fill: String,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font: String,
        fill: String,
        align: TextAlign,
        baseline: TextBaseline,
        rotation: f64,
    },
}

/// Display-list recorder standing in for an HTML canvas
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    width: f64,
    height: f64,
    device_pixel_ratio: f64,
    commands: Vec<DrawCommand>,
    clip_depth: usize,
}

impl CanvasSurface {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        let mut surface = Self {
            width,
            height,
            device_pixel_ratio: 1.0,
            commands: Vec::new(),
            clip_depth: 0,
        };
        surface.resize(width, height, device_pixel_ratio);
        surface
    }

    /// Update client size and pixel ratio; takes effect on the next render
    pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) {
        self.width = width;
        self.height = height;
        self.device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Backing store size in device pixels
    pub fn backing_size(&self) -> (u32, u32) {
        let scale = |v: f64| (v * self.device_pixel_ratio).round().max(0.0) as u32;
        (scale(self.width), scale(self.height))
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Current clip nesting; zero between passes
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    /// Display list as JSON for a host to replay
    pub fn to_json(&self) -> ChartResult<String> {
        Ok(serde_json::to_string(&self.commands)?)
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

fn points(points: &[LayoutPoint]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.x, p.y)).collect()
}

impl DrawingSurface for CanvasSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        if self.clip_depth > 0 {
            tracing::warn!(depth = self.clip_depth, "canvas cleared with clips still pushed");
            self.clip_depth = 0;
        }
        self.commands.clear();
        let factor = self.device_pixel_ratio;
        self.push(DrawCommand::Scale { factor });
        self.push(DrawCommand::ClearRect {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
        });
    }

    fn clear_rect(&mut self, rect: LayoutRect) {
        self.push(DrawCommand::ClearRect {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        });
    }

    fn draw_line(&mut self, from: LayoutPoint, to: LayoutPoint, stroke: &Stroke) {
        self.push(DrawCommand::Line {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
            stroke: stroke.color.to_css(),
            stroke_width: stroke.width,
            dash: stroke.dash.clone(),
        });
    }

    fn draw_polyline(&mut self, pts: &[LayoutPoint], stroke: &Stroke) {
        if pts.len() < 2 {
            return;
        }
        self.push(DrawCommand::Polyline {
            points: points(pts),
            stroke: stroke.color.to_css(),
            stroke_width: stroke.width,
            dash: stroke.dash.clone(),
        });
    }

    fn fill_rect(&mut self, rect: LayoutRect, fill: Color) {
        self.push(DrawCommand::Rect {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            fill: fill.to_css(),
        });
    }

    fn fill_polygon(&mut self, pts: &[LayoutPoint], fill: Color) {
        if pts.len() < 3 {
            return;
        }
        self.push(DrawCommand::Polygon {
            points: points(pts),
            fill: fill.to_css(),
        });
    }

    fn fill_arc(&mut self, center: LayoutPoint, radius: f64, start_angle: f64, end_angle: f64, fill: Color) {
        self.push(DrawCommand::Wedge {
            cx: center.x,
            cy: center.y,
            radius,
            start_angle,
            end_angle,
            fill: fill.to_css(),
        });
    }

    fn fill_circle(&mut self, center: LayoutPoint, radius: f64, fill: Color) {
        self.push(DrawCommand::Circle {
            cx: center.x,
            cy: center.y,
            radius,
            fill: fill.to_css(),
        });
    }

    fn draw_text(&mut self, text: &str, position: LayoutPoint, style: &TextStyle) {
        self.push(DrawCommand::Text {
            x: position.x,
            y: position.y,
            text: text.to_string(),
            font: style.font.to_css(),
            fill: style.color.to_css(),
            align: style.align,
            baseline: style.baseline,
            rotation: style.rotation,
        });
    }

    fn push_clip(&mut self, rect: LayoutRect) {
        self.clip_depth += 1;
        self.push(DrawCommand::Clip {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        });
    }

    fn pop_clip(&mut self) {
        if self.clip_depth == 0 {
            tracing::warn!("pop_clip without a matching push_clip");
            return;
        }
        self.clip_depth -= 1;
        self.push(DrawCommand::Restore);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{with_clip, FontSpec};

    #[test]
    fn test_clear_records_scale() {
        let mut canvas = CanvasSurface::new(300.0, 200.0, 2.0);
        canvas.fill_rect(LayoutRect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        canvas.clear();
        assert_eq!(canvas.commands()[0], DrawCommand::Scale { factor: 2.0 });
        assert_eq!(canvas.commands().len(), 2);
        assert_eq!(canvas.backing_size(), (600, 400));
    }

    #[test]
    fn test_invalid_pixel_ratio_defaults_to_one() {
        let canvas = CanvasSurface::new(300.0, 200.0, f64::NAN);
        assert_eq!(canvas.device_pixel_ratio(), 1.0);
        assert_eq!(canvas.backing_size(), (300, 200));
    }

    #[test]
    fn test_clip_balance() {
        let mut canvas = CanvasSurface::new(100.0, 100.0, 1.0);
        with_clip(&mut canvas, LayoutRect::new(0.0, 0.0, 50.0, 50.0), |c| {
            assert_eq!(c.clip_depth(), 1);
            c.fill_circle(LayoutPoint::new(1.0, 1.0), 3.0, Color::BLACK);
        });
        assert_eq!(canvas.clip_depth(), 0);
        canvas.pop_clip();
        assert_eq!(canvas.clip_depth(), 0);
        assert_eq!(canvas.commands().last(), Some(&DrawCommand::Restore));
    }

    #[test]
    fn test_degenerate_shapes_skipped() {
        let mut canvas = CanvasSurface::new(100.0, 100.0, 1.0);
        let stroke = Stroke::solid(Color::BLACK, 1.0);
        canvas.draw_polyline(&[LayoutPoint::new(0.0, 0.0)], &stroke);
        canvas.fill_polygon(&[LayoutPoint::new(0.0, 0.0), LayoutPoint::new(1.0, 1.0)], Color::BLACK);
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn test_display_list_json() {
        let mut canvas = CanvasSurface::new(100.0, 100.0, 1.0);
        let style = TextStyle::new(FontSpec::bold(12.0), Color::BLACK);
        canvas.draw_text("Hi", LayoutPoint::new(5.0, 6.0), &style);
        let json = canvas.to_json().unwrap();
        assert!(json.contains(r#""op":"text""#));
        assert!(json.contains(r#""font":"bold 12px Arial""#));
        assert!(json.contains(r#""align":"left""#));
    }
}
