//! Page frames: descriptor heights turned into page-space rectangles

use crate::layout::{PageDescriptor, PageGeometry};
use crate::Rect;

/// Where body text and footnotes go on a physical page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    pub page_index: usize,
    /// Body text container, anchored under the top margin
    pub text: Rect,
    /// Footnote area, anchored on the bottom margin
    pub footnotes: Option<Rect>,
}

impl PageFrame {
    pub fn new(page: &PageDescriptor, geometry: &PageGeometry) -> Self {
        let width = geometry.content_width();
        let text = Rect::new(
            geometry.margin_left,
            geometry.margin_top,
            width,
            page.text_container_height,
        );

        // An oversized footnote area may reach above the text container;
        // the whole reservation is kept either way.
        let footnotes = page.has_footnotes().then(|| {
            Rect::new(
                geometry.margin_left,
                geometry.page_height - geometry.margin_bottom - page.footnote_area_height,
                width,
                page.footnote_area_height,
            )
        });

        Self {
            page_index: page.page_index,
            text,
            footnotes,
        }
    }

    /// Vertical offset of this page in a continuous scroll view
    pub fn y_offset(&self, geometry: &PageGeometry) -> f32 {
        self.page_index as f32 * geometry.page_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FootnoteId;
    use smallvec::smallvec;

    fn page(footnote_area_height: f32) -> PageDescriptor {
        PageDescriptor {
            page_index: 1,
            content_range: 10..20,
            units: 2..3,
            footnotes: if footnote_area_height > 0.0 {
                smallvec![FootnoteId(1)]
            } else {
                smallvec![]
            },
            footnote_area_height,
            text_container_height: 648.0 - footnote_area_height,
            text_height: 100.0,
        }
    }

    #[test]
    fn test_footnote_area_sits_on_bottom_margin() {
        let geometry = PageGeometry::default();
        let frame = PageFrame::new(&page(130.0), &geometry);

        assert_eq!(frame.text, Rect::new(72.0, 72.0, 468.0, 518.0));
        assert_eq!(frame.footnotes, Some(Rect::new(72.0, 590.0, 468.0, 130.0)));
        assert_eq!(frame.y_offset(&geometry), 792.0);
        let footnotes = frame.footnotes.unwrap();
        assert_eq!(frame.text.y + frame.text.height, footnotes.y);
    }

    #[test]
    fn test_page_without_footnotes() {
        let frame = PageFrame::new(&page(0.0), &PageGeometry::default());
        assert_eq!(frame.text.height, 648.0);
        assert_eq!(frame.footnotes, None);
    }
}
