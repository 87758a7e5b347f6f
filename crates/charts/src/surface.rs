//! Drawing surface abstraction
//!
//! Renderers draw through `DrawingSurface` only. The raster backend
//! (`CanvasSurface`) records a replayable display list; the vector backend
//! (`SvgDocument`) writes an SVG document. Both receive identical calls for
//! the same frame.

use serde::{Deserialize, Serialize};

use crate::layout::{EstimatedTextMeasure, LayoutPoint, LayoutRect, TextMeasure};
use crate::model::Color;

pub const FONT_FAMILY: &str = "Arial";

/// Font size and weight; the family is always [`FONT_FAMILY`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub size: f64,
    pub bold: bool,
}

impl FontSpec {
    pub const fn regular(size: f64) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: f64) -> Self {
        Self { size, bold: true }
    }

    /// CSS font shorthand, e.g. "bold 12px Arial"
    pub fn to_css(&self) -> String {
        if self.bold {
            format!("bold {}px {}", self.size, FONT_FAMILY)
        } else {
            format!("{}px {}", self.size, FONT_FAMILY)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Middle,
    Alphabetic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontSpec,
    pub color: Color,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    /// Rotation in radians around the anchor point
    pub rotation: f64,
}

impl TextStyle {
    pub fn new(font: FontSpec, color: Color) -> Self {
        Self {
            font,
            color,
            align: TextAlign::Left,
            baseline: TextBaseline::Alphabetic,
            rotation: 0.0,
        }
    }

    pub fn aligned(mut self, align: TextAlign, baseline: TextBaseline) -> Self {
        self.align = align;
        self.baseline = baseline;
        self
    }

    pub fn rotated(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// Dash pattern in CSS pixels; empty means solid
    pub dash: Vec<f64>,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
        }
    }

    pub fn dashed(color: Color, width: f64, dash: &[f64]) -> Self {
        Self {
            color,
            width,
            dash: dash.to_vec(),
        }
    }
}

/// Target of every chart drawing call, in CSS pixels
pub trait DrawingSurface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    /// Erase everything
    fn clear(&mut self);
    fn clear_rect(&mut self, rect: LayoutRect);

    fn draw_line(&mut self, from: LayoutPoint, to: LayoutPoint, stroke: &Stroke);
    fn draw_polyline(&mut self, points: &[LayoutPoint], stroke: &Stroke);
    fn fill_rect(&mut self, rect: LayoutRect, fill: Color);
    fn fill_polygon(&mut self, points: &[LayoutPoint], fill: Color);
    /// Filled wedge from the center, angles in radians clockwise from 3 o'clock
    fn fill_arc(&mut self, center: LayoutPoint, radius: f64, start_angle: f64, end_angle: f64, fill: Color);
    fn fill_circle(&mut self, center: LayoutPoint, radius: f64, fill: Color);
    fn draw_text(&mut self, text: &str, position: LayoutPoint, style: &TextStyle);

    /// Restrict drawing to `rect` until the matching `pop_clip`
    fn push_clip(&mut self, rect: LayoutRect);
    fn pop_clip(&mut self);

    /// Width of `text` in this surface's metrics
    fn measure_text(&self, text: &str, font: &FontSpec) -> f64 {
        EstimatedTextMeasure.text_width(text, font)
    }
}

/// Text metrics of a surface, handed to layout
#[derive(Clone, Copy)]
pub struct SurfaceMetrics<'a>(pub &'a dyn DrawingSurface);

impl TextMeasure for SurfaceMetrics<'_> {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        self.0.measure_text(text, font)
    }
}

/// Run `draw` with a clip pushed, always popping it afterwards
pub fn with_clip<S, F>(surface: &mut S, rect: LayoutRect, draw: F)
where
    S: DrawingSurface + ?Sized,
    F: FnOnce(&mut S),
{
    surface.push_clip(rect);
    draw(surface);
    surface.pop_clip();
}
