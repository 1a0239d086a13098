//! Color representation and the categorical palette used for treemap groups.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color with values in the range [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component [0.0, 1.0]
    pub r: f32,
    /// Green component [0.0, 1.0]
    pub g: f32,
    /// Blue component [0.0, 1.0]
    pub b: f32,
    /// Alpha component [0.0, 1.0]
    pub a: f32,
}

impl Color {
    /// Create a new color, clamping values to [0.0, 1.0].
    #[must_use]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Create an opaque color from RGB values.
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Create an opaque color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// Parse a hex color string (e.g., "#ff0000" or "ff0000").
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return Err(ColorParseError::InvalidLength);
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or(ColorParseError::InvalidHex)
        };
        Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Convert to hex string (RGB only).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }

    /// Black color
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Invalid hex characters
    #[error("invalid hex characters")]
    InvalidHex,
    /// Invalid string length
    #[error("invalid hex string length (expected 6)")]
    InvalidLength,
}

/// The twenty category colors: four shades each of blue, orange, green,
/// purple and grey.
const CATEGORY_20C: [(u8, u8, u8); 20] = [
    (0x31, 0x82, 0xbd),
    (0x6b, 0xae, 0xd6),
    (0x9e, 0xca, 0xe1),
    (0xc6, 0xdb, 0xef),
    (0xe6, 0x55, 0x0d),
    (0xfd, 0x8d, 0x3c),
    (0xfd, 0xae, 0x6b),
    (0xfd, 0xd0, 0xa2),
    (0x31, 0xa3, 0x54),
    (0x74, 0xc4, 0x76),
    (0xa1, 0xd9, 0x9b),
    (0xc7, 0xe9, 0xc0),
    (0x75, 0x6b, 0xb1),
    (0x9e, 0x9a, 0xc8),
    (0xbc, 0xbd, 0xdc),
    (0xda, 0xda, 0xeb),
    (0x63, 0x63, 0x63),
    (0x96, 0x96, 0x96),
    (0xbd, 0xbd, 0xbd),
    (0xd9, 0xd9, 0xd9),
];

/// Deterministic name → color assignment.
///
/// Names are hashed with 32-bit FNV-1a and reduced modulo the palette size,
/// so the same group name gets the same color in every run.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPalette {
    colors: Vec<Color>,
}

impl CategoryPalette {
    /// Number of entries in the default palette.
    pub const SIZE: usize = CATEGORY_20C.len();

    /// The default 20-entry palette.
    #[must_use]
    pub fn category20c() -> Self {
        Self {
            colors: CATEGORY_20C
                .iter()
                .map(|&(r, g, b)| Color::from_rgb8(r, g, b))
                .collect(),
        }
    }

    /// A palette over custom colors. Falls back to the default when empty.
    #[must_use]
    pub fn from_colors(colors: Vec<Color>) -> Self {
        if colors.is_empty() {
            Self::category20c()
        } else {
            Self { colors }
        }
    }

    /// Number of colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; a palette holds at least one color.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Palette slot for a name.
    #[must_use]
    pub fn index_for(&self, name: &str) -> usize {
        fnv1a(name.as_bytes()) as usize % self.colors.len()
    }

    /// Color for a name.
    #[must_use]
    pub fn color_for(&self, name: &str) -> Color {
        self.colors[self.index_for(name)]
    }
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self::category20c()
    }
}

fn fnv1a(bytes: &[u8]) -> u32 {
    const OFFSET: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u32::from(b)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#3182bd").unwrap();
        assert_eq!(c.to_hex(), "#3182bd");
        assert_eq!(Color::from_hex("zz0000"), Err(ColorParseError::InvalidHex));
        assert_eq!(Color::from_hex("#fff"), Err(ColorParseError::InvalidLength));
    }

    #[test]
    fn test_color_parse_error_display() {
        assert_eq!(
            ColorParseError::InvalidHex.to_string(),
            "invalid hex characters"
        );
    }

    #[test]
    fn test_fnv1a_known_vectors() {
        assert_eq!(fnv1a(b""), 0x811c_9dc5);
        assert_eq!(fnv1a(b"a"), 0xe40c_292c);
    }

    #[test]
    fn test_palette_has_twenty_distinct_colors() {
        let palette = CategoryPalette::category20c();
        assert_eq!(palette.len(), CategoryPalette::SIZE);
        assert_eq!(palette.len(), 20);
        let distinct: HashSet<String> = palette.colors.iter().map(Color::to_hex).collect();
        assert_eq!(distinct.len(), 20);
    }

    #[test]
    fn test_palette_is_stable() {
        let a = CategoryPalette::default();
        let b = CategoryPalette::category20c();
        for name in ["chrome", "sublime-text", "terminal", "AppUsage"] {
            assert_eq!(a.color_for(name), b.color_for(name));
            assert_eq!(a.index_for(name), fnv1a(name.as_bytes()) as usize % 20);
        }
    }

    #[test]
    fn test_palette_covers_many_categories() {
        let palette = CategoryPalette::default();
        let used: HashSet<usize> = (0..500)
            .map(|i| palette.index_for(&format!("app-{i}")))
            .collect();
        assert_eq!(used.len(), 20);
    }

    #[test]
    fn test_empty_custom_palette_falls_back() {
        let palette = CategoryPalette::from_colors(Vec::new());
        assert_eq!(palette, CategoryPalette::category20c());
        assert!(!palette.is_empty());
    }
}
