//! Studio settings
//!
//! Loaded from a JSON file. Every field has a default, and a file that
//! fails to parse falls back to the defaults with a warning.

use std::path::{Path, PathBuf};

use anyhow::Context;
use charts::{ChartKind, ChartLabels, ChartOptions, Color, LineStyle, Palette, SeriesConfig, Theme};
use serde::{Deserialize, Serialize};
use table_model::Table;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudioSettings {
    pub canvas: CanvasSettings,
    pub theme: Theme,
    pub chart: ChartKind,
    pub labels: ChartLabels,
    /// Hex colors; empty uses the default palette
    pub palette: Vec<String>,
    pub bar_thickness: Option<f64>,
    pub series: Vec<SeriesOverride>,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            device_pixel_ratio: 1.0,
        }
    }
}

/// Overrides for one series, matched by its header name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeriesOverride {
    pub name: String,
    pub enabled: Option<bool>,
    pub color: Option<String>,
    pub thickness: Option<f64>,
    pub style: Option<LineStyle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    pub svg: PathBuf,
    /// Where to write the settled canvas display list, if anywhere
    pub display_list: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            svg: PathBuf::from("chart.svg"),
            display_list: None,
        }
    }
}

impl StudioSettings {
    /// Load settings from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        match serde_json::from_str::<StudioSettings>(content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            bar_thickness: self.bar_thickness,
            theme: self.theme,
            palette: Palette::from_hex_list(self.palette.as_slice()),
        }
    }

    /// Default series configuration for `table` with the overrides applied
    pub fn series_config(&self, table: &Table) -> anyhow::Result<SeriesConfig> {
        let mut config = SeriesConfig::for_table(table);
        for item in &self.series {
            let Some(index) = table.series_names().iter().position(|n| n == &item.name) else {
                tracing::warn!(series = %item.name, "override names a series not in the table");
                continue;
            };
            if let Some(enabled) = item.enabled {
                config.set_enabled(index, enabled)?;
            }
            if let Some(hex) = &item.color {
                match Color::from_hex(hex) {
                    Some(color) => config.set_color(index, Some(color))?,
                    None => tracing::warn!(series = %item.name, color = %hex, "ignoring unparseable color"),
                }
            }
            if let Some(thickness) = item.thickness {
                config.set_thickness(index, thickness)?;
            }
            if let Some(style) = item.style {
                config.set_style(index, style)?;
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_rows(vec![
            vec!["Month".into(), "Sales".into(), "Costs".into()],
            vec!["Jan".into(), "1".into(), "2".into()],
        ])
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = StudioSettings::default();
        assert_eq!(settings.canvas.width, 800.0);
        assert_eq!(settings.chart, ChartKind::Line);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.output.svg, PathBuf::from("chart.svg"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = StudioSettings::parse(r#"{"chart": "bar3d", "theme": "dark", "canvas": {"width": 1024}}"#);
        assert_eq!(settings.chart, ChartKind::Bar3d);
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.canvas.width, 1024.0);
        assert_eq!(settings.canvas.height, 600.0);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        assert_eq!(StudioSettings::parse("{ not json"), StudioSettings::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = StudioSettings::load(Path::new("/nonexistent/studio.json")).unwrap();
        assert_eq!(settings, StudioSettings::default());
    }

    #[test]
    fn test_series_overrides() {
        let settings = StudioSettings::parse(
            r##"{"series": [
                {"name": "Costs", "enabled": false, "color": "#000000", "style": "dash-dot"},
                {"name": "Missing", "enabled": false}
            ]}"##,
        );
        let config = settings.series_config(&table()).unwrap();
        let costs = config.get(1).unwrap();
        assert!(!costs.enabled);
        assert_eq!(costs.color, Some(Color::BLACK));
        assert_eq!(costs.style, LineStyle::DashDot);
        assert!(config.get(0).unwrap().enabled);
    }

    #[test]
    fn test_chart_options_palette() {
        let settings = StudioSettings::parse(r##"{"palette": ["#FF0000"], "bar_thickness": 12}"##);
        let options = settings.chart_options();
        assert_eq!(options.palette.color_at(3), Color::rgb(255, 0, 0));
        assert_eq!(options.bar_thickness, Some(12.0));
    }
}
