use serde::{Deserialize, Serialize};

use crate::types::TextExtent;

use super::font::{self, GLYPH_HEIGHT};

/// Synchronous text measurement supplied by the rendering surface.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f64) -> TextExtent;
}

/// Size of one terminal cell in abstract pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellMetrics {
    pub width_px: f64,
    pub height_px: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width_px: 4.0,
            height_px: 8.0,
        }
    }
}

/// Measures text set in the block font, scaled so that one glyph is
/// `font_size` pixels tall and every dot is square.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapMeasure;

impl BitmapMeasure {
    pub fn dot_size(font_size: f64) -> f64 {
        font_size / GLYPH_HEIGHT as f64
    }
}

impl TextMeasure for BitmapMeasure {
    fn measure(&self, text: &str, font_size: f64) -> TextExtent {
        TextExtent {
            width: font::text_width(text) as f64 * Self::dot_size(font_size),
            height: font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_scales_with_font_size() {
        let e = BitmapMeasure.measure("AB", 40.0);
        assert_eq!(e.width, 11.0 * 8.0);
        assert_eq!(e.height, 40.0);
        let e = BitmapMeasure.measure("AB", 80.0);
        assert_eq!(e.width, 11.0 * 16.0);
    }

    #[test]
    fn very_long_text_measures_full_width() {
        let text = "A".repeat(11_000);
        let e = BitmapMeasure.measure(&text, 40.0);
        assert_eq!(e.width, (11_000 * 6 - 1) as f64 * BitmapMeasure::dot_size(40.0));
    }

    #[test]
    fn empty_text_has_zero_width() {
        let e = BitmapMeasure.measure("", 64.0);
        assert_eq!(e.width, 0.0);
        assert_eq!(e.height, 64.0);
    }
}
