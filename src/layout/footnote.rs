//! Footnote area height estimation

use crate::document::{Block, FootnoteId, FootnoteRef};
use crate::layout::measure::ContentMeasurer;
use rustc_hash::FxHashMap;

/// Sums footnote body heights plus one separator allowance per footnote
///
/// The first allowance separates the footnote area from body text, the rest
/// sit between consecutive footnotes. Body heights are memoised per
/// (footnote, width) for the lifetime of the estimator, which is one
/// pagination run.
pub struct FootnoteHeightEstimator<'a, M: ContentMeasurer + ?Sized> {
    measurer: &'a M,
    separator: f32,
    measured: FxHashMap<(FootnoteId, u32), f32>,
}

impl<'a, M: ContentMeasurer + ?Sized> FootnoteHeightEstimator<'a, M> {
    pub fn new(measurer: &'a M, separator: f32) -> Self {
        Self {
            measurer,
            separator: separator.max(0.0),
            measured: FxHashMap::default(),
        }
    }

    pub fn separator(&self) -> f32 {
        self.separator
    }

    /// Total height of `bodies` stacked at `content_width`
    pub fn estimate<'b>(
        &self,
        bodies: impl IntoIterator<Item = &'b Block>,
        content_width: f32,
    ) -> f32 {
        bodies
            .into_iter()
            .map(|body| self.measurer.measure(body, content_width).max(0.0) + self.separator)
            .sum()
    }

    /// Same as [`estimate`](Self::estimate), reusing earlier measurements
    pub fn estimate_refs(&mut self, footnotes: &[&FootnoteRef], content_width: f32) -> f32 {
        let mut total = 0.0;
        for footnote in footnotes {
            total += self.body_height(footnote, content_width) + self.separator;
        }
        total
    }

    fn body_height(&mut self, footnote: &FootnoteRef, content_width: f32) -> f32 {
        let measurer = self.measurer;
        *self
            .measured
            .entry((footnote.id, content_width.to_bits()))
            .or_insert_with(|| measurer.measure(&footnote.body, content_width).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn by_length(block: &Block, _width: f32) -> f32 {
        block.text.len() as f32 * 10.0
    }

    #[test]
    fn test_two_footnotes_include_both_separators() {
        let estimator = FootnoteHeightEstimator::new(&by_length, 6.0);
        let first = Block::paragraph("abc");
        let second = Block::paragraph("abcde");

        let height = estimator.estimate([&first, &second], 400.0);
        assert_eq!(height, 30.0 + 6.0 + 50.0 + 6.0);
    }

    #[test]
    fn test_no_footnotes_need_no_space() {
        let estimator = FootnoteHeightEstimator::new(&by_length, 6.0);
        assert_eq!(estimator.estimate(std::iter::empty(), 400.0), 0.0);
    }

    #[test]
    fn test_adding_a_footnote_never_shrinks_the_area() {
        let estimator = FootnoteHeightEstimator::new(&by_length, 0.0);
        let first = Block::paragraph("abc");
        let empty = Block::paragraph("");

        let one = estimator.estimate([&first], 400.0);
        let two = estimator.estimate([&first, &empty], 400.0);
        assert!(two >= one);
    }

    #[test]
    fn test_refs_are_measured_once_per_width() {
        let calls = Cell::new(0);
        let counting = |block: &Block, _width: f32| {
            calls.set(calls.get() + 1);
            block.text.len() as f32
        };
        let mut estimator = FootnoteHeightEstimator::new(&counting, 1.0);
        let note = FootnoteRef::new(FootnoteId(1), 0, Block::paragraph("twelve chars"));

        assert_eq!(estimator.estimate_refs(&[&note], 300.0), 13.0);
        assert_eq!(estimator.estimate_refs(&[&note], 300.0), 13.0);
        assert_eq!(calls.get(), 1);

        estimator.estimate_refs(&[&note], 200.0);
        assert_eq!(calls.get(), 2);
    }
}
