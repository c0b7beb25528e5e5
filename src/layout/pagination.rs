//! Page breaking and page descriptor assembly

use crate::document::{DocumentSnapshot, FootnoteId};
use crate::error::{PaginationError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::Range;

/// Tolerance used when comparing layout heights
pub const HEIGHT_EPSILON: f32 = 1e-3;

/// Footnote ids assigned to one page, in anchor order
pub type FootnoteIds = SmallVec<[FootnoteId; 4]>;

/// A tentative page: a run of whole content units
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice {
    /// Unit indices placed on the page
    pub units: Range<usize>,
    /// Summed measured height of those units
    pub used_height: f32,
}

/// Split measured units into pages
///
/// Page `i` may hold up to `available[i]` of text; slots past the end of
/// `available` get `default_height`. A unit that does not fit on a fresh
/// page is placed alone rather than left unplaced.
pub fn break_pages(unit_heights: &[f32], available: &[f32], default_height: f32) -> Vec<PageSlice> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut used: f32 = 0.0;

    for (index, &height) in unit_heights.iter().enumerate() {
        let limit = available.get(pages.len()).copied().unwrap_or(default_height);
        let should_break = index > start && used + height > limit + HEIGHT_EPSILON;

        if should_break {
            pages.push(PageSlice {
                units: start..index,
                used_height: used,
            });
            start = index;
            used = height;
        } else {
            used += height;
        }
    }

    pages.push(PageSlice {
        units: start..unit_heights.len(),
        used_height: used,
    });

    pages
}

/// Stream range covered by a run of units
pub fn content_range(document: &DocumentSnapshot, units: &Range<usize>) -> Range<usize> {
    let all = document.units();
    let start = all.get(units.start).map_or(document.stream_len(), |u| u.start_offset);
    let end = match units.end.checked_sub(1).and_then(|last| all.get(last)) {
        Some(unit) if units.end > units.start => unit.end_offset(),
        _ => start,
    };
    start..end
}

/// Group footnotes by page, returning index ranges into `document.footnotes()`
///
/// Anchors are non-decreasing, so each page owns a contiguous run. A page
/// takes every anchor before its end offset; the final page also takes
/// anchors sitting exactly at the stream end.
pub fn assign_footnotes(document: &DocumentSnapshot, pages: &[PageSlice]) -> Vec<Range<usize>> {
    let footnotes = document.footnotes();
    let mut next = 0;

    pages
        .iter()
        .enumerate()
        .map(|(page_index, page)| {
            let start = next;
            if page_index + 1 == pages.len() {
                next = footnotes.len();
            } else {
                let end_offset = content_range(document, &page.units).end;
                while next < footnotes.len() && footnotes[next].anchor < end_offset {
                    next += 1;
                }
            }
            start..next
        })
        .collect()
}

/// Layout information for a finished page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    /// Page index (0-based)
    pub page_index: usize,
    /// Byte range of the content stream on this page
    pub content_range: Range<usize>,
    /// Content unit indices on this page
    pub units: Range<usize>,
    /// Footnotes anchored on this page
    pub footnotes: FootnoteIds,
    /// Space reserved at the page bottom, zero without footnotes
    pub footnote_area_height: f32,
    /// Height the body text may occupy
    pub text_container_height: f32,
    /// Measured height of the placed units
    pub text_height: f32,
}

impl PageDescriptor {
    pub fn has_footnotes(&self) -> bool {
        !self.footnotes.is_empty()
    }

    /// Check if this page contains a stream offset
    ///
    /// Ranges are end-exclusive except on the last page, which also owns
    /// the stream end.
    pub fn contains_offset(&self, offset: usize, is_last: bool) -> bool {
        self.content_range.contains(&offset) || (is_last && offset == self.content_range.end)
    }
}

/// Per-page output of the final layout pass
#[derive(Debug, Clone)]
pub struct PageReservation {
    pub footnotes: FootnoteIds,
    pub footnote_area_height: f32,
    pub text_container_height: f32,
}

/// Build descriptors and verify they partition the stream
pub fn assemble_pages(
    document: &DocumentSnapshot,
    slices: &[PageSlice],
    reservations: Vec<PageReservation>,
) -> Result<Vec<PageDescriptor>> {
    if slices.len() != reservations.len() {
        return Err(PaginationError::Internal(format!(
            "{} pages but {} footnote reservations",
            slices.len(),
            reservations.len()
        )));
    }

    let pages: Vec<_> = slices
        .iter()
        .zip(reservations)
        .enumerate()
        .map(|(page_index, (slice, reservation))| PageDescriptor {
            page_index,
            content_range: content_range(document, &slice.units),
            units: slice.units.clone(),
            footnotes: reservation.footnotes,
            footnote_area_height: reservation.footnote_area_height,
            text_container_height: reservation.text_container_height,
            text_height: slice.used_height,
        })
        .collect();

    validate_partition(document, &pages)?;
    Ok(pages)
}

/// Check the partition and footnote assignment invariants
pub fn validate_partition(document: &DocumentSnapshot, pages: &[PageDescriptor]) -> Result<()> {
    let broken = |reason: String| Err(PaginationError::Internal(reason));

    let Some(last) = pages.last() else {
        return broken("no pages produced".to_string());
    };
    if last.content_range.end != document.stream_len() {
        return broken(format!(
            "pages end at {}, stream ends at {}",
            last.content_range.end,
            document.stream_len()
        ));
    }

    let mut expected_start = 0;
    for (index, page) in pages.iter().enumerate() {
        if page.page_index != index {
            return broken(format!("page {} carries index {}", index, page.page_index));
        }
        if page.content_range.start != expected_start || page.content_range.end < expected_start {
            return broken(format!(
                "page {} covers {:?}, expected to start at {}",
                index, page.content_range, expected_start
            ));
        }
        expected_start = page.content_range.end;
    }

    let mut assigned = pages.iter().enumerate().flat_map(|(index, page)| {
        page.footnotes.iter().map(move |id| (index, *id))
    });
    for footnote in document.footnotes() {
        let Some((index, id)) = assigned.next() else {
            return broken(format!("footnote {} was not assigned", footnote.id));
        };
        let is_last = index + 1 == pages.len();
        if id != footnote.id || !pages[index].contains_offset(footnote.anchor, is_last) {
            return broken(format!(
                "footnote {} anchored at {} misplaced on page {}",
                footnote.id, footnote.anchor, index
            ));
        }
    }
    if let Some((index, id)) = assigned.next() {
        return broken(format!("unknown footnote {} on page {}", id, index));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;

    fn slice(units: Range<usize>, used_height: f32) -> PageSlice {
        PageSlice { units, used_height }
    }

    #[test]
    fn test_single_empty_page_for_no_units() {
        assert_eq!(break_pages(&[], &[], 100.0), vec![slice(0..0, 0.0)]);
    }

    #[test]
    fn test_splits_when_units_overflow() {
        let pages = break_pages(&[10.0, 10.0, 10.0], &[], 25.0);
        assert_eq!(pages, vec![slice(0..2, 20.0), slice(2..3, 10.0)]);
    }

    #[test]
    fn test_exact_fit_stays_on_page() {
        let pages = break_pages(&[10.0, 15.0, 5.0], &[], 25.0);
        assert_eq!(pages, vec![slice(0..2, 25.0), slice(2..3, 5.0)]);
    }

    #[test]
    fn test_oversized_unit_forms_a_page() {
        let pages = break_pages(&[30.0, 5.0], &[], 20.0);
        assert_eq!(pages, vec![slice(0..1, 30.0), slice(1..2, 5.0)]);
    }

    #[test]
    fn test_per_page_available_height() {
        // first page shrunk by footnotes, later pages fall back to the default
        let pages = break_pages(&[10.0, 10.0, 10.0, 10.0], &[15.0], 30.0);
        assert_eq!(pages, vec![slice(0..1, 10.0), slice(1..4, 30.0)]);
    }

    fn three_unit_doc() -> DocumentSnapshot {
        DocumentSnapshot::builder()
            .paragraph("aaaa") // 0..4
            .paragraph("bbbb") // 4..8
            .paragraph("cccc") // 8..12
            .footnote(FootnoteId(1), 0, Block::paragraph("x"))
            .footnote(FootnoteId(2), 4, Block::paragraph("y"))
            .footnote(FootnoteId(3), 12, Block::paragraph("z"))
            .build()
    }

    #[test]
    fn test_boundary_anchor_goes_to_the_page_that_starts_there() {
        let doc = three_unit_doc();
        let pages = vec![slice(0..1, 0.0), slice(1..3, 0.0)];

        assert_eq!(content_range(&doc, &pages[0].units), 0..4);
        assert_eq!(content_range(&doc, &pages[1].units), 4..12);
        // anchor 4 opens page 1; anchor 12 is the stream end, owned by the last page
        assert_eq!(assign_footnotes(&doc, &pages), vec![0..1, 1..3]);
    }

    #[test]
    fn test_assemble_validates_partition() {
        let doc = three_unit_doc();
        let slices = vec![slice(0..1, 4.0), slice(1..3, 8.0)];
        let reservation = |ids: &[u64]| PageReservation {
            footnotes: ids.iter().map(|&id| FootnoteId(id)).collect(),
            footnote_area_height: 0.0,
            text_container_height: 10.0,
        };

        let pages = assemble_pages(
            &doc,
            &slices,
            vec![reservation(&[1]), reservation(&[2, 3])],
        )
        .unwrap();
        assert_eq!(pages[1].content_range, 4..12);
        assert!(pages[1].contains_offset(12, true));
        assert!(!pages[0].contains_offset(4, false));

        let misplaced = assemble_pages(
            &doc,
            &slices,
            vec![reservation(&[1, 2]), reservation(&[3])],
        );
        assert!(matches!(misplaced, Err(PaginationError::Internal(_))));
    }
}
