//! Chart layout calculation
//!
//! Pure geometry: padding, plot area, category step, value scale, bar
//! thickness, legend slots and pie slices. Renderers and hit-testing read
//! the same results, so the settled frame and tooltips always agree.

use std::f64::consts::TAU;

use serde::Serialize;
use table_model::Table;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{ChartError, ChartResult};
use crate::model::{ChartLabels, Color};
use crate::series::SeriesDescriptor;
use crate::styles::Palette;
use crate::surface::FontSpec;

/// Number of intervals between horizontal grid lines
pub const GRID_INTERVALS: usize = 5;

pub const LINE_PADDING: f64 = 50.0;
pub const LINE_PADDING_WITH_Y_TITLE: f64 = 70.0;
pub const LINE_LEGEND_HEIGHT: f64 = 60.0;

pub const BAR_PADDING: f64 = 80.0;
pub const BAR_PADDING_WITH_Y_TITLE: f64 = 70.0;
pub const BAR_LEGEND_HEIGHT: f64 = 50.0;

pub const PIE_BASE_PADDING: f64 = 50.0;
pub const PIE_TITLE_PADDING: f64 = 30.0;

pub const LEGEND_BOX: f64 = 20.0;
pub const LEGEND_GAP: f64 = 10.0;

const ELLIPSIS: &str = "...";

/// A rectangle in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Grow on every side by `amount`
    pub fn grow(&self, amount: f64) -> Self {
        self.grow_sides(amount, amount, amount, amount)
    }

    pub fn grow_sides(&self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            x: self.x - left,
            y: self.y - top,
            width: self.width + left + right,
            height: self.height + top + bottom,
        }
    }

    /// Offset by (dx, dy) keeping the size
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Inclusive containment test
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// A point in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }

    pub fn lerp(&self, other: LayoutPoint, t: f64) -> LayoutPoint {
        LayoutPoint::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Text width policy shared by layout and both drawing backends
pub trait TextMeasure {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64;
}

/// Average-glyph estimate: 0.6 em per grapheme, bold 10% wider
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedTextMeasure;

impl TextMeasure for EstimatedTextMeasure {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        let glyphs = text.graphemes(true).count() as f64;
        let weight = if font.bold { 1.1 } else { 1.0 };
        glyphs * font.size * 0.6 * weight
    }
}

/// Shorten `text` with a trailing "..." until it fits `max_width`
pub fn truncate_to_width(
    text: &str,
    max_width: f64,
    font: &FontSpec,
    measure: &dyn TextMeasure,
) -> String {
    if measure.text_width(text, font) <= max_width {
        return text.to_string();
    }
    let mut graphemes: Vec<&str> = text.graphemes(true).collect();
    while !graphemes.is_empty() {
        graphemes.pop();
        let candidate = format!("{}{}", graphemes.concat(), ELLIPSIS);
        if measure.text_width(&candidate, font) <= max_width {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}

/// Linear map from a value range onto a vertical pixel span
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
    pub pixel_bottom: f64,
    pub pixel_top: f64,
}

/// One horizontal grid line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub value: f64,
    pub y: f64,
}

impl ValueScale {
    /// Zero, inverted or non-finite ranges become a unit range
    pub fn new(min: f64, max: f64, pixel_bottom: f64, pixel_top: f64) -> Self {
        let (min, max) = if !min.is_finite() || !max.is_finite() {
            (0.0, 1.0)
        } else if max <= min {
            degenerate_range(min)
        } else {
            (min, max)
        };
        Self {
            min,
            max,
            pixel_bottom,
            pixel_top,
        }
    }

    /// `max - min`; infinite when the endpoints are finite but far apart
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Position of `value` within the range, 0 at `min` and 1 at `max`
    pub fn fraction(&self, value: f64) -> f64 {
        let range = self.range();
        if range.is_finite() {
            (value - self.min) / range
        } else {
            (value * 0.5 - self.min * 0.5) / (self.max * 0.5 - self.min * 0.5)
        }
    }

    /// Value at `fraction` of the range
    pub fn value_at(&self, fraction: f64) -> f64 {
        let range = self.range();
        if range.is_finite() {
            self.min + fraction * range
        } else {
            self.min * (1.0 - fraction) + self.max * fraction
        }
    }

    pub fn to_pixel(&self, value: f64) -> f64 {
        self.pixel_bottom - self.fraction(value) * (self.pixel_bottom - self.pixel_top)
    }

    /// `GRID_INTERVALS + 1` evenly spaced lines from min to max
    pub fn grid_lines(&self) -> Vec<GridLine> {
        (0..=GRID_INTERVALS)
            .map(|i| {
                let fraction = i as f64 / GRID_INTERVALS as f64;
                GridLine {
                    value: self.value_at(fraction),
                    y: self.pixel_bottom - fraction * (self.pixel_bottom - self.pixel_top),
                }
            })
            .collect()
    }
}

/// Unit range above `min`, or a relative one where adding 1 is lost to rounding
fn degenerate_range(min: f64) -> (f64, f64) {
    if min + 1.0 > min {
        return (min, min + 1.0);
    }
    let pad = min.abs() * 1e-9;
    if min > 0.0 {
        (min - pad, min)
    } else {
        (min, min + pad)
    }
}

/// Shared geometry of a line or bar chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutResult {
    pub padding: f64,
    pub plot: LayoutRect,
    pub legend_height: f64,
    pub category_step: f64,
    pub value_scale: ValueScale,
}

fn plot_area(width: f64, height: f64, padding: f64, legend_height: f64) -> ChartResult<LayoutRect> {
    let plot = LayoutRect::new(
        padding,
        padding,
        width - 2.0 * padding,
        height - 2.0 * padding - legend_height,
    );
    if !(plot.width > 0.0 && plot.height > 0.0) {
        return Err(ChartError::CanvasTooSmall { width, height });
    }
    Ok(plot)
}

fn value_range(table: &Table, series: &[SeriesDescriptor], zero_based: bool) -> (f64, f64) {
    let values = series
        .iter()
        .flat_map(|s| table.series_values(s.index));
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if zero_based {
        (0.0, max.max(0.0))
    } else {
        (min, max)
    }
}

/// Layout of a line chart; `series` holds the enabled series only
pub fn line_layout(
    table: &Table,
    series: &[SeriesDescriptor],
    width: f64,
    height: f64,
    labels: &ChartLabels,
) -> ChartResult<LayoutResult> {
    let padding = if labels.has_y_axis() {
        LINE_PADDING_WITH_Y_TITLE
    } else {
        LINE_PADDING
    };
    let plot = plot_area(width, height, padding, LINE_LEGEND_HEIGHT)?;
    let categories = table.category_count();
    let category_step = if categories > 1 {
        plot.width / (categories - 1) as f64
    } else {
        0.0
    };
    let (min, max) = value_range(table, series, false);
    let value_scale = ValueScale::new(min, max, plot.bottom(), plot.y);

    tracing::debug!(
        padding,
        plot_width = plot.width,
        plot_height = plot.height,
        category_step,
        min = value_scale.min,
        max = value_scale.max,
        "line layout"
    );

    Ok(LayoutResult {
        padding,
        plot,
        legend_height: LINE_LEGEND_HEIGHT,
        category_step,
        value_scale,
    })
}

/// Layout of a bar or 3-D bar chart; `series` holds the enabled series only
pub fn bar_layout(
    table: &Table,
    series: &[SeriesDescriptor],
    width: f64,
    height: f64,
    labels: &ChartLabels,
) -> ChartResult<LayoutResult> {
    let padding = if labels.has_y_axis() {
        BAR_PADDING_WITH_Y_TITLE
    } else {
        BAR_PADDING
    };
    let plot = plot_area(width, height, padding, BAR_LEGEND_HEIGHT)?;
    let category_step = plot.width / table.category_count().max(1) as f64;
    let (min, max) = value_range(table, series, true);
    let value_scale = ValueScale::new(min, max, plot.bottom(), plot.y);

    tracing::debug!(
        padding,
        plot_width = plot.width,
        plot_height = plot.height,
        category_step,
        max = value_scale.max,
        "bar layout"
    );

    Ok(LayoutResult {
        padding,
        plot,
        legend_height: BAR_LEGEND_HEIGHT,
        category_step,
        value_scale,
    })
}

/// Effective bar thickness after validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarThickness {
    pub thickness: f64,
    pub default: f64,
    /// Set when the requested value was replaced by the default
    pub corrected: Option<f64>,
}

/// `max(step * 0.8 / enabled, 1)`, capped so groups never overlap
pub fn default_bar_thickness(category_step: f64, enabled: usize) -> f64 {
    let enabled = enabled.max(1) as f64;
    let slot = category_step / enabled;
    (category_step * 0.8 / enabled).max(1.0).min(slot)
}

/// Accept a requested thickness only when it is positive and no wider
/// than the default
pub fn resolve_bar_thickness(requested: Option<f64>, category_step: f64, enabled: usize) -> BarThickness {
    let default = default_bar_thickness(category_step, enabled);
    match requested {
        Some(t) if t.is_finite() && t > 0.0 && t <= default => BarThickness {
            thickness: t,
            default,
            corrected: None,
        },
        _ => BarThickness {
            thickness: default,
            default,
            corrected: Some(default),
        },
    }
}

/// Full-height rectangle of one bar
pub fn bar_rect(
    layout: &LayoutResult,
    category: usize,
    rank: usize,
    enabled: usize,
    thickness: f64,
    value: f64,
) -> LayoutRect {
    let group_offset = (layout.category_step - enabled as f64 * thickness) / 2.0;
    let x = layout.plot.x
        + category as f64 * layout.category_step
        + group_offset
        + rank as f64 * thickness;
    let top = layout.value_scale.to_pixel(value.max(0.0)).min(layout.plot.bottom());
    LayoutRect::new(x, top, thickness, layout.plot.bottom() - top)
}

/// A legend swatch with its (possibly truncated) label
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub swatch: LayoutRect,
    pub text_position: LayoutPoint,
    pub text: String,
    pub color: Color,
}

fn legend_entry(x: f64, y: f64, text: String, color: Color) -> LegendEntry {
    LegendEntry {
        swatch: LayoutRect::new(x, y, LEGEND_BOX, LEGEND_BOX),
        text_position: LayoutPoint::new(x + LEGEND_BOX + LEGEND_GAP, y + LEGEND_BOX / 2.0),
        text,
        color,
    }
}

/// Horizontal legend: one equal slot per item, labels truncated to the slot
pub fn legend_row(
    items: &[(String, Color)],
    left: f64,
    top: f64,
    row_width: f64,
    font: &FontSpec,
    measure: &dyn TextMeasure,
) -> Vec<LegendEntry> {
    if items.is_empty() {
        return Vec::new();
    }
    let slot = row_width / items.len() as f64;
    let max_text = slot - LEGEND_BOX - 2.0 * LEGEND_GAP;
    items
        .iter()
        .enumerate()
        .map(|(i, (label, color))| {
            let text = truncate_to_width(label, max_text, font, measure);
            legend_entry(left + i as f64 * slot, top, text, *color)
        })
        .collect()
}

/// Vertical legend, one row per item
pub fn legend_column(items: &[(String, Color)], left: f64, top: f64) -> Vec<LegendEntry> {
    items
        .iter()
        .enumerate()
        .map(|(i, (label, color))| {
            legend_entry(left, top + i as f64 * (LEGEND_BOX + LEGEND_GAP), label.clone(), *color)
        })
        .collect()
}

/// One pie wedge
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub row: usize,
    pub label: String,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub percentage: f64,
    pub color: Color,
}

impl PieSlice {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieLayout {
    pub padding: f64,
    pub center: LayoutPoint,
    pub radius: f64,
    /// Sum of the non-negative values; infinite when it overflows
    pub total: f64,
    pub slices: Vec<PieSlice>,
    pub legend: Vec<LegendEntry>,
}

impl PieLayout {
    /// True when no slice has a positive share
    pub fn is_empty(&self) -> bool {
        !(self.total > 0.0)
    }
}

/// Layout of a pie over one series; negative values count as zero
#[allow(clippy::too_many_arguments)]
pub fn pie_layout(
    table: &Table,
    series: usize,
    width: f64,
    height: f64,
    has_title: bool,
    palette: &Palette,
    legend_font: &FontSpec,
    measure: &dyn TextMeasure,
) -> ChartResult<PieLayout> {
    let title_padding = if has_title { PIE_TITLE_PADDING } else { 0.0 };
    let padding = PIE_BASE_PADDING + title_padding;

    let items: Vec<(String, Color)> = table
        .categories()
        .enumerate()
        .map(|(row, label)| (label.to_string(), palette.color_at(row)))
        .collect();
    let longest = items
        .iter()
        .map(|(label, _)| measure.text_width(label, legend_font))
        .fold(0.0, f64::max);
    let legend_column_width = LEGEND_BOX + LEGEND_GAP + longest;

    let pie_width = width - legend_column_width;
    let radius = pie_width.min(height) / 3.0;
    if !(radius > 0.0) {
        return Err(ChartError::CanvasTooSmall { width, height });
    }
    let center = LayoutPoint::new(pie_width / 2.0, height / 2.0 + title_padding / 2.0);

    let values: Vec<f64> = table
        .series_values(series)
        .into_iter()
        .map(|v| v.max(0.0))
        .collect();
    let total: f64 = values.iter().sum();
    // shares are scale free; an overflowing sum is taken relative to the largest value
    let (weights, weight_total) = if total.is_finite() {
        (values.clone(), total)
    } else {
        let largest = values.iter().copied().fold(0.0, f64::max);
        let weights: Vec<f64> = values.iter().map(|v| v / largest).collect();
        let sum: f64 = weights.iter().sum();
        (weights, sum)
    };

    let mut angle = 0.0;
    let slices = items
        .iter()
        .zip(values.iter().zip(&weights))
        .enumerate()
        .map(|(row, ((label, color), (&value, &weight)))| {
            let share = if weight_total > 0.0 { weight / weight_total } else { 0.0 };
            let start_angle = angle;
            angle += share * TAU;
            PieSlice {
                row,
                label: label.clone(),
                value,
                start_angle,
                end_angle: angle,
                percentage: share * 100.0,
                color: *color,
            }
        })
        .collect();

    let legend = legend_column(&items, center.x + radius + padding / 2.0, padding);

    tracing::debug!(radius, total, center_x = center.x, center_y = center.y, "pie layout");

    Ok(PieLayout {
        padding,
        center,
        radius,
        total,
        slices,
        legend,
    })
}
