//! Page geometry consumed as plain numbers

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

/// Page dimensions and margins, all in the same unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: 612.0, // US Letter
            page_height: 792.0,
            margin_top: 72.0, // 1 inch
            margin_bottom: 72.0,
            margin_left: 72.0,
            margin_right: 72.0,
        }
    }
}

impl PageGeometry {
    /// Uniform margins on a page of the given size
    pub fn with_margins(page_width: f32, page_height: f32, margin: f32) -> Self {
        Self {
            page_width,
            page_height,
            margin_top: margin,
            margin_bottom: margin,
            margin_left: margin,
            margin_right: margin,
        }
    }

    /// Get usable content width
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Get usable content height per page
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    /// Reject geometry that leaves no content area
    pub fn validate(&self) -> Result<(), GeometryError> {
        let fields = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(GeometryError::NonFinite { field });
        }
        // Zero margins are fine, negative ones would grow the page
        if let Some(&(field, value)) = fields[2..].iter().find(|(_, value)| *value < 0.0) {
            return Err(GeometryError::NegativeMargin { field, value });
        }

        let width = self.content_width();
        if width <= 0.0 {
            return Err(GeometryError::NonPositiveContentWidth { width });
        }
        let height = self.content_height();
        if height <= 0.0 {
            return Err(GeometryError::NonPositiveContentHeight { height });
        }
        Ok(())
    }
}
