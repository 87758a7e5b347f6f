//! Per-series visual configuration
//!
//! A `SeriesConfig` is keyed by series index (table column minus one) and is
//! rebuilt whenever the table changes. Hosts mutate it between renders.

use serde::{Deserialize, Serialize};
use table_model::Table;

use crate::error::{ChartError, ChartResult};
use crate::model::Color;
use crate::styles::Palette;

/// Line width used when none (or an unusable one) is configured
pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

/// Stroke pattern for line series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    DashDot,
}

impl LineStyle {
    /// Dash pattern in CSS pixels; empty means solid
    pub fn dash_pattern(&self) -> &'static [f64] {
        match self {
            LineStyle::Solid => &[],
            LineStyle::Dashed => &[10.0, 5.0],
            LineStyle::DashDot => &[10.0, 5.0, 2.0, 5.0],
        }
    }
}

/// User controls for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSettings {
    pub label: String,
    pub enabled: bool,
    /// Explicit color; `None` takes the palette color for the series index
    pub color: Option<Color>,
    pub thickness: f64,
    pub style: LineStyle,
}

/// Resolved series description used by layout and renderers
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDescriptor {
    pub index: usize,
    pub label: String,
    pub color: Color,
    pub enabled: bool,
    pub thickness: f64,
    pub style: LineStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    series: Vec<SeriesSettings>,
}

impl SeriesConfig {
    /// Default configuration for every series of a table: enabled, palette
    /// color, default width, solid
    pub fn for_table(table: &Table) -> Self {
        let series = table
            .series_names()
            .iter()
            .map(|name| SeriesSettings {
                label: name.clone(),
                enabled: true,
                color: None,
                thickness: DEFAULT_LINE_WIDTH,
                style: LineStyle::Solid,
            })
            .collect();
        Self { series }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SeriesSettings> {
        self.series.get(index)
    }

    fn settings_mut(&mut self, index: usize) -> ChartResult<&mut SeriesSettings> {
        self.series
            .get_mut(index)
            .ok_or(ChartError::UnknownSeries(index))
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> ChartResult<()> {
        self.settings_mut(index)?.enabled = enabled;
        Ok(())
    }

    pub fn set_color(&mut self, index: usize, color: Option<Color>) -> ChartResult<()> {
        self.settings_mut(index)?.color = color;
        Ok(())
    }

    pub fn set_thickness(&mut self, index: usize, thickness: f64) -> ChartResult<()> {
        self.settings_mut(index)?.thickness = thickness;
        Ok(())
    }

    pub fn set_style(&mut self, index: usize, style: LineStyle) -> ChartResult<()> {
        self.settings_mut(index)?.style = style;
        Ok(())
    }

    pub fn enabled_count(&self) -> usize {
        self.series.iter().filter(|s| s.enabled).count()
    }

    /// Resolve every series against a palette, disabled ones included
    pub fn descriptors(&self, palette: &Palette) -> Vec<SeriesDescriptor> {
        self.series
            .iter()
            .enumerate()
            .map(|(index, settings)| {
                let thickness = if settings.thickness.is_finite() && settings.thickness > 0.0 {
                    settings.thickness
                } else {
                    tracing::warn!(
                        series = index,
                        thickness = settings.thickness,
                        "unusable line width, using default"
                    );
                    DEFAULT_LINE_WIDTH
                };
                SeriesDescriptor {
                    index,
                    label: settings.label.clone(),
                    color: settings.color.unwrap_or_else(|| palette.color_at(index)),
                    enabled: settings.enabled,
                    thickness,
                    style: settings.style,
                }
            })
            .collect()
    }

    /// Enabled series only, in column order
    pub fn enabled(&self, palette: &Palette) -> Vec<SeriesDescriptor> {
        self.descriptors(palette)
            .into_iter()
            .filter(|d| d.enabled)
            .collect()
    }
}
