//! Pointer interaction: tooltips, drag-pan and wheel-zoom

use serde::{Deserialize, Serialize};

/// Largest zoom factor a line chart accepts
pub const MAX_ZOOM_LEVEL: f64 = 1000.0;
/// Tooltip distance from the cursor, both axes
pub const TOOLTIP_OFFSET: f64 = 10.0;
/// Line tooltip hit radius around a data point
pub const HIT_RADIUS: f64 = 5.0;

/// Pointer input in canvas CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    /// Negative `delta_y` zooms in
    Wheel { x: f64, y: f64, delta_y: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

impl Tooltip {
    /// Place `text` at the cursor plus the tooltip offset
    pub fn at_cursor(text: String, x: f64, y: f64) -> Self {
        Self {
            text,
            x: x + TOOLTIP_OFFSET,
            y: y + TOOLTIP_OFFSET,
        }
    }
}

/// Horizontal pan and zoom of a line chart's category axis
#[derive(Debug, Clone, PartialEq)]
pub struct PanZoom {
    pan_offset: f64,
    zoom_level: f64,
    category_count: usize,
    category_step: f64,
    plot_width: f64,
    drag_origin: Option<f64>,
}

impl PanZoom {
    pub fn new(category_count: usize, category_step: f64, plot_width: f64) -> Self {
        Self {
            pan_offset: 0.0,
            zoom_level: 1.0,
            category_count,
            category_step,
            plot_width,
            drag_origin: None,
        }
    }

    pub fn pan_offset(&self) -> f64 {
        self.pan_offset
    }

    pub fn zoom_level(&self) -> f64 {
        self.zoom_level
    }

    fn span(&self) -> f64 {
        self.category_count.saturating_sub(1) as f64 * self.category_step
    }

    /// Fewer than two categories have nothing to pan or zoom
    pub fn is_fixed(&self) -> bool {
        self.category_count < 2 || !(self.category_step > 0.0)
    }

    /// Leftmost allowed pan: the last category at the plot's right edge
    pub fn min_pan_offset(&self) -> f64 {
        if self.is_fixed() {
            return 0.0;
        }
        (-self.span() * self.zoom_level + self.plot_width).min(0.0)
    }

    pub fn min_zoom_level(&self) -> f64 {
        if self.is_fixed() {
            return 1.0;
        }
        (self.plot_width / self.span()).min(1.0)
    }

    /// Category x offset from the plot's left edge under the current view
    pub fn offset_of(&self, category: usize) -> f64 {
        category as f64 * self.category_step * self.zoom_level + self.pan_offset
    }

    /// Returns true when the view changed
    pub fn pan_by(&mut self, dx: f64) -> bool {
        if self.is_fixed() || !dx.is_finite() {
            return false;
        }
        let before = self.pan_offset;
        self.pan_offset = (self.pan_offset + dx).clamp(self.min_pan_offset(), 0.0);
        self.pan_offset != before
    }

    /// Apply one wheel notch; returns true when the view changed
    pub fn zoom_wheel(&mut self, delta_y: f64) -> bool {
        if self.is_fixed() || delta_y == 0.0 || !delta_y.is_finite() {
            return false;
        }
        let direction = if delta_y < 0.0 { 1.0 } else { -1.0 };
        let intensity = (self.category_count as f64 / 10_000.0).max(0.1);
        let before = (self.pan_offset, self.zoom_level);
        self.zoom_level = (self.zoom_level + direction * intensity)
            .clamp(self.min_zoom_level(), MAX_ZOOM_LEVEL);
        self.pan_offset = self.pan_offset.clamp(self.min_pan_offset(), 0.0);
        tracing::trace!(zoom = self.zoom_level, pan = self.pan_offset, "zoom");
        (self.pan_offset, self.zoom_level) != before
    }

    pub fn begin_drag(&mut self, x: f64) {
        self.drag_origin = Some(x);
    }

    /// Pan by the distance moved since the last drag position
    pub fn drag_to(&mut self, x: f64) -> bool {
        let Some(origin) = self.drag_origin else {
            return false;
        };
        self.drag_origin = Some(x);
        self.pan_by(x - origin)
    }

    pub fn end_drag(&mut self) {
        self.drag_origin = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }
}
