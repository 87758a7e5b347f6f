//! Color schemes and palettes
//!
//! Series take `palette[series % len]`; pie slices take `palette[row % len]`.

use serde::{Deserialize, Serialize};

use crate::model::Color;

/// Predefined color schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Muted blue/orange/red/teal/green
    #[default]
    Tableau,
    /// Flat UI colors
    Flat,
    /// Microsoft Office default colors
    Office,
}

impl ColorScheme {
    /// Get the colors for this scheme
    pub fn colors(&self) -> Vec<Color> {
        match self {
            ColorScheme::Tableau => vec![
                Color::rgb(0x4E, 0x79, 0xA7),
                Color::rgb(0xF2, 0x8E, 0x2B),
                Color::rgb(0xE1, 0x57, 0x59),
                Color::rgb(0x76, 0xB7, 0xB2),
                Color::rgb(0x59, 0xA1, 0x4F),
            ],
            ColorScheme::Flat => vec![
                Color::rgb(0x1A, 0xBC, 0x9C),
                Color::rgb(0x2E, 0xCC, 0x71),
                Color::rgb(0x34, 0x98, 0xDB),
                Color::rgb(0x9B, 0x59, 0xB6),
                Color::rgb(0xF1, 0xC4, 0x0F),
                Color::rgb(0xE6, 0x7E, 0x22),
                Color::rgb(0xE7, 0x4C, 0x3C),
            ],
            ColorScheme::Office => vec![
                Color::rgb(79, 129, 189),
                Color::rgb(192, 80, 77),
                Color::rgb(155, 187, 89),
                Color::rgb(128, 100, 162),
                Color::rgb(75, 172, 198),
                Color::rgb(247, 150, 70),
            ],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::Tableau => "Tableau",
            ColorScheme::Flat => "Flat",
            ColorScheme::Office => "Office",
        }
    }

    pub fn all() -> &'static [ColorScheme] {
        &[ColorScheme::Tableau, ColorScheme::Flat, ColorScheme::Office]
    }
}

/// An ordered, non-empty list of colors assigned cyclically
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Build a palette; an empty list falls back to the default scheme
    pub fn new(colors: Vec<Color>) -> Self {
        if colors.is_empty() {
            Self::default()
        } else {
            Self { colors }
        }
    }

    pub fn from_scheme(scheme: ColorScheme) -> Self {
        Self {
            colors: scheme.colors(),
        }
    }

    /// Parse a list of hex strings, skipping any that do not parse
    pub fn from_hex_list<S: AsRef<str>>(hex: &[S]) -> Self {
        let colors = hex
            .iter()
            .filter_map(|h| {
                let h: &str = h.as_ref();
                let parsed = Color::from_hex(h);
                if parsed.is_none() {
                    tracing::warn!(color = h, "ignoring unparseable palette color");
                }
                parsed
            })
            .collect();
        Self::new(colors)
    }

    pub fn color_at(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_scheme(ColorScheme::default())
    }
}

impl From<Vec<Color>> for Palette {
    fn from(colors: Vec<Color>) -> Self {
        Palette::new(colors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_scheme_colors() {
        for scheme in ColorScheme::all() {
            assert!(!scheme.colors().is_empty(), "{} has no colors", scheme.name());
        }
    }

    #[test]
    fn test_palette_cycles() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 5);
        assert_eq!(palette.color_at(0), Color::rgb(0x4E, 0x79, 0xA7));
        assert_eq!(palette.color_at(5), palette.color_at(0));
        assert_eq!(palette.color_at(7), palette.color_at(2));
    }

    #[test]
    fn test_empty_palette_falls_back() {
        assert_eq!(Palette::new(Vec::new()), Palette::default());
        let decoded: Palette = serde_json::from_str("[]").unwrap();
        assert_eq!(decoded, Palette::default());
    }

    #[test]
    fn test_palette_from_hex_list() {
        let palette = Palette::from_hex_list(&["#000000", "bogus", "#FFFFFF"]);
        assert_eq!(palette.colors(), &[Color::BLACK, Color::WHITE]);
    }
}
