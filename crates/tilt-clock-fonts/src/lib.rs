//! Stroke fonts for the tilt-clock dial numerals.
//!
//! A glyph is a handful of line segments in a cell one unit tall. Text
//! geometry thickens every segment into a quad so the scene can rasterize
//! numerals like any other flat part of the dial.

mod builtin;
mod geometry;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use geometry::{Quad, TextGeometry};

/// Stroke width relative to glyph height when a font does not specify one.
pub const DEFAULT_WEIGHT: f32 = 0.14;

/// Errors raised while reading a font file.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid font file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("glyph key {0:?} must be a single character")]
    InvalidGlyphKey(String),

    #[error("font has no glyphs")]
    Empty,

    #[error("advance and weight must be positive")]
    InvalidMetrics,
}

/// Line segments making up one character, as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub strokes: Vec<[f32; 4]>,
}

/// A set of stroke glyphs with shared metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeFont {
    /// Horizontal distance between glyph origins, in glyph heights.
    advance: f32,
    /// Stroke width, in glyph heights.
    weight: f32,
    glyphs: HashMap<char, Glyph>,
}

#[derive(Debug, Deserialize)]
struct FontFile {
    advance: f32,
    weight: Option<f32>,
    glyphs: HashMap<String, Vec<[f32; 4]>>,
}

impl StrokeFont {
    /// The seven-segment digit font that ships with the clock.
    pub fn builtin() -> Self {
        builtin::seven_segment()
    }

    /// Read a TOML font file.
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let text = std::fs::read_to_string(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse a TOML font description.
    pub fn from_toml_str(text: &str) -> Result<Self, FontError> {
        let file: FontFile = toml::from_str(text)?;
        let weight = file.weight.unwrap_or(DEFAULT_WEIGHT);
        if file.advance <= 0.0 || weight <= 0.0 {
            return Err(FontError::InvalidMetrics);
        }

        let mut glyphs = HashMap::with_capacity(file.glyphs.len());
        for (key, strokes) in file.glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                return Err(FontError::InvalidGlyphKey(key));
            };
            glyphs.insert(ch, Glyph { strokes });
        }
        if glyphs.is_empty() {
            return Err(FontError::Empty);
        }

        Ok(Self {
            advance: file.advance,
            weight,
            glyphs,
        })
    }

    pub(crate) fn from_parts(advance: f32, weight: f32, glyphs: HashMap<char, Glyph>) -> Self {
        Self {
            advance,
            weight,
            glyphs,
        }
    }

    pub fn advance(&self) -> f32 {
        self.advance
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Whether every character of `text` has a glyph.
    pub fn covers(&self, text: &str) -> bool {
        text.chars().all(|ch| self.glyphs.contains_key(&ch))
    }

    /// Build centered geometry for `text` with glyphs `size` units tall.
    pub fn text_geometry(&self, text: &str, size: f32) -> TextGeometry {
        geometry::layout(self, text, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_FONT: &str = r#"
advance = 0.8
weight = 0.2

[glyphs]
"1" = [[0.3, 0.0, 0.3, 1.0]]
"-" = [[0.0, 0.5, 0.6, 0.5]]
"#;

    #[test]
    fn test_builtin_covers_dial_numerals() {
        let font = StrokeFont::builtin();
        for n in 1..=12 {
            assert!(font.covers(&n.to_string()), "missing glyphs for {n}");
        }
    }

    #[test]
    fn test_parse_font_file() {
        let font = StrokeFont::from_toml_str(SMALL_FONT).unwrap();
        assert_eq!(font.advance(), 0.8);
        assert_eq!(font.weight(), 0.2);
        assert_eq!(font.glyph('1').unwrap().strokes.len(), 1);
        assert!(font.glyph('2').is_none());
    }

    #[test]
    fn test_default_weight() {
        let font = StrokeFont::from_toml_str("advance = 1.0\n[glyphs]\n\"x\" = []\n").unwrap();
        assert_eq!(font.weight(), DEFAULT_WEIGHT);
    }

    #[test]
    fn test_rejects_multi_char_key() {
        let err = StrokeFont::from_toml_str("advance = 1.0\n[glyphs]\n\"12\" = []\n").unwrap_err();
        assert!(matches!(err, FontError::InvalidGlyphKey(key) if key == "12"));
    }

    #[test]
    fn test_rejects_empty_font() {
        let err = StrokeFont::from_toml_str("advance = 1.0\n[glyphs]\n").unwrap_err();
        assert!(matches!(err, FontError::Empty));
    }

    #[test]
    fn test_rejects_bad_metrics() {
        let err = StrokeFont::from_toml_str("advance = 0.0\n[glyphs]\n\"x\" = []\n").unwrap_err();
        assert!(matches!(err, FontError::InvalidMetrics));
    }

    #[test]
    fn test_missing_file() {
        let err = StrokeFont::load(Path::new("/nonexistent/font.toml")).unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
    }
}
