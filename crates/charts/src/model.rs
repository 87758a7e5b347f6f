//! Chart model types
//!
//! Colors, chart kinds, themes, titles and the render request snapshot
//! handed to every render and export call.

use serde::{Deserialize, Serialize};
use table_model::Table;

use crate::series::SeriesConfig;
use crate::styles::Palette;

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color from RGB values (fully opaque)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse "#RRGGBB", "#RRGGBBAA" or the short "#RGB" form
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(hex.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *slot = v * 17;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Self::rgba(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Hex string with a leading '#', alpha omitted when opaque
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert to CSS color string
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f64 / 255.0
            )
        }
    }

    /// Alpha as a 0..=1 opacity
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// Scale every channel toward black by `percent`
    pub fn darken(&self, percent: f64) -> Color {
        let factor = 1.0 - (percent / 100.0).clamp(0.0, 1.0);
        let scale = |c: u8| (c as f64 * factor).round() as u8;
        Color::rgba(scale(self.r), scale(self.g), scale(self.b), self.a)
    }

    /// Move every channel toward white by `percent`
    pub fn lighten(&self, percent: f64) -> Color {
        let factor = (percent / 100.0).clamp(0.0, 1.0);
        let scale = |c: u8| (c as f64 + (255.0 - c as f64) * factor).round() as u8;
        Color::rgba(scale(self.r), scale(self.g), scale(self.b), self.a)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const LIGHT_GRAY: Color = Color::rgb(204, 204, 204);
    pub const GRID: Color = Color::rgb(224, 224, 224);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Chart kinds the renderer can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Bar3d,
    Pie,
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Bar3d => "bar3d",
            ChartKind::Pie => "pie",
        }
    }
}

/// Page theme; only the text color follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn text_color(&self) -> Color {
        match self {
            Theme::Light => Color::BLACK,
            Theme::Dark => Color::WHITE,
        }
    }
}

/// Title and axis titles; empty strings are not drawn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLabels {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
}

impl ChartLabels {
    pub fn new(
        title: impl Into<String>,
        x_axis: impl Into<String>,
        y_axis: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_axis: x_axis.into(),
            y_axis: y_axis.into(),
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    pub fn has_y_axis(&self) -> bool {
        !self.y_axis.is_empty()
    }
}

/// Chart-wide options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Requested bar thickness in CSS pixels; `None` uses the computed default
    pub bar_thickness: Option<f64>,
    pub theme: Theme,
    pub palette: Palette,
}

/// Immutable snapshot of everything one render needs
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub kind: ChartKind,
    pub table: &'a Table,
    pub labels: &'a ChartLabels,
    pub series: &'a SeriesConfig,
    pub options: &'a ChartOptions,
}

/// Format a data value for labels and tooltips
pub(crate) fn format_value(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_round_trip() {
        let color = Color::from_hex("#4E79A7").unwrap();
        assert_eq!(color, Color::rgb(0x4E, 0x79, 0xA7));
        assert_eq!(color.to_hex(), "#4E79A7");
        assert_eq!(Color::from_hex("ff000080").unwrap().a, 0x80);
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_color_to_css() {
        assert_eq!(Color::rgb(255, 0, 0).to_css(), "rgb(255, 0, 0)");
        assert_eq!(Color::rgba(0, 0, 0, 0).to_css(), "rgba(0, 0, 0, 0.000)");
    }

    #[test]
    fn test_darken_and_lighten() {
        let c = Color::rgb(100, 200, 50);
        assert_eq!(c.darken(30.0), Color::rgb(70, 140, 35));
        assert_eq!(c.lighten(20.0), Color::rgb(131, 211, 91));
        assert_eq!(c.darken(0.0), c);
        assert_eq!(c.darken(150.0), Color::BLACK);
    }

    #[test]
    fn test_theme_text_color() {
        assert_eq!(Theme::Light.text_color(), Color::BLACK);
        assert_eq!(Theme::Dark.text_color(), Color::WHITE);
    }

    #[test]
    fn test_chart_kind_serde_names() {
        assert_eq!(serde_json::to_string(&ChartKind::Bar3d).unwrap(), "\"bar3d\"");
        let kind: ChartKind = serde_json::from_str("\"pie\"").unwrap();
        assert_eq!(kind, ChartKind::Pie);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(10.0), "10");
        assert_eq!(format_value(2.5), "2.5");
        assert_eq!(format_value(-0.0), "0");
    }
}
