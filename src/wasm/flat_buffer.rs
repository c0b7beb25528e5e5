//! Flat buffer protocol for zero-copy WASM bridge
//!
//! Binary format for layout data:
//!
//! ## u32 Buffer Layout:
//! ```text
//! Header:
//! [0]     MAGIC (0x464F4C49 = "FOLI" for validation)
//! [1]     SCHEMA_VERSION (protocol version, currently 1)
//! [2]     version_lo (session generation)
//! [3]     version_hi (session generation)
//! [4]     page_count
//! [5]     converged (0 or 1)
//! [6]     iterations
//! [7]     oversized_page_count
//! [8..]   page data...
//!
//! Per-page:
//!   [page_index, range_start, range_end, unit_start, unit_end, footnote_count]
//!   per-footnote: [id_lo, id_hi]
//! ```
//!
//! ## f32 Buffer Layout:
//! ```text
//! Per-page: [y_offset, text_x, text_y, text_width, text_height,
//!            footnote_x, footnote_y, footnote_width, footnote_height, measured_text_height]
//!   footnote_* are all zero for pages without footnotes
//! ```

use crate::layout::{Diagnostic, LayoutResult, PageGeometry};
use crate::render::PageFrame;

/// Magic number for format validation: "FOLI"
pub const MAGIC: u32 = 0x464F4C49;

/// Schema version for protocol compatibility checking
pub const SCHEMA_VERSION: u32 = 1;

/// Header size in u32 elements
pub const HEADER_SIZE: usize = 8;

/// Number of fixed u32 values per page, before footnote ids
pub const U32_PER_PAGE: usize = 6;

/// Number of u32 values per footnote id
pub const U32_PER_FOOTNOTE: usize = 2;

/// Number of f32 values per page
pub const F32_PER_PAGE: usize = 10;

/// Layout buffer for zero-copy WASM transfer
#[derive(Debug, Default)]
pub struct LayoutBuffer {
    /// Integer data (header, ranges, footnote ids)
    pub u32_data: Vec<u32>,
    /// Float data (frame geometry)
    pub f32_data: Vec<f32>,
}

impl LayoutBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.u32_data.clear();
        self.f32_data.clear();
    }

    /// Encode a layout, replacing any previous contents
    pub fn write(&mut self, version: u64, layout: &LayoutResult, geometry: &PageGeometry) {
        let footnote_total: usize = layout.pages.iter().map(|page| page.footnotes.len()).sum();
        self.clear();
        self.u32_data.reserve(
            HEADER_SIZE + layout.pages.len() * U32_PER_PAGE + footnote_total * U32_PER_FOOTNOTE,
        );
        self.f32_data.reserve(layout.pages.len() * F32_PER_PAGE);

        let oversized = layout
            .diagnostics
            .iter()
            .filter(|diagnostic| matches!(diagnostic, Diagnostic::OversizedFootnote { .. }))
            .count();

        self.u32_data.push(MAGIC); // [0] magic number
        self.u32_data.push(SCHEMA_VERSION); // [1] schema version
        self.u32_data.push((version & 0xFFFF_FFFF) as u32); // [2] version_lo
        self.u32_data.push((version >> 32) as u32); // [3] version_hi
        self.u32_data.push(layout.pages.len() as u32); // [4] page_count
        self.u32_data.push(layout.is_converged() as u32); // [5] converged
        self.u32_data.push(layout.convergence.iterations as u32); // [6] iterations
        self.u32_data.push(oversized as u32); // [7] oversized_page_count

        for page in &layout.pages {
            self.u32_data.extend_from_slice(&[
                page.page_index as u32,
                page.content_range.start as u32,
                page.content_range.end as u32,
                page.units.start as u32,
                page.units.end as u32,
                page.footnotes.len() as u32,
            ]);
            for id in &page.footnotes {
                self.u32_data.push((id.0 & 0xFFFF_FFFF) as u32);
                self.u32_data.push((id.0 >> 32) as u32);
            }

            let frame = PageFrame::new(page, geometry);
            let footnotes = frame.footnotes.unwrap_or_default();
            self.f32_data.extend_from_slice(&[
                frame.y_offset(geometry),
                frame.text.x,
                frame.text.y,
                frame.text.width,
                frame.text.height,
                footnotes.x,
                footnotes.y,
                footnotes.width,
                footnotes.height,
                page.text_height,
            ]);
        }

        debug_assert_eq!(self.f32_data.len(), layout.pages.len() * F32_PER_PAGE);
    }

    /// Page count recorded in the header, if the header is valid
    pub fn page_count(&self) -> Option<usize> {
        match self.u32_data.get(..HEADER_SIZE) {
            Some([MAGIC, SCHEMA_VERSION, _, _, count, ..]) => Some(*count as usize),
            _ => None,
        }
    }
}
