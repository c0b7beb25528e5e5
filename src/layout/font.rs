//! Font metrics for the reference measurer

use serde::{Deserialize, Serialize};

/// Metrics needed for text layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontMetrics {
    /// Line height in layout units
    pub line_height: f32,
    /// Width of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Default width for non-ASCII characters
    pub default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        // 14px * 1.2 = 16.8, 8.41px per monospace char
        Self::monospace(16.8, 8.41)
    }
}

impl FontMetrics {
    pub fn new(line_height: f32, char_widths: Vec<f32>, default_width: f32) -> Self {
        Self {
            line_height,
            char_widths,
            default_width,
        }
    }

    /// Every character shares one advance width
    pub fn monospace(line_height: f32, char_width: f32) -> Self {
        Self::new(line_height, vec![char_width; 128], char_width)
    }

    /// Get width of a character
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        self.default_width
    }

    /// Width of one grapheme cluster
    pub fn grapheme_width(&self, grapheme: &str) -> f32 {
        if grapheme == "\t" {
            self.default_width * 4.0
        } else if grapheme.chars().all(|c| c.is_control()) {
            0.0
        } else {
            grapheme.chars().map(|c| self.width(c)).sum()
        }
    }
}
