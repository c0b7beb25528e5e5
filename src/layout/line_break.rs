//! Line breaking measurer

use crate::document::Block;
use crate::layout::font::FontMetrics;
use crate::layout::measure::ContentMeasurer;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Indentation width per list level
pub const INDENT_WIDTH: f32 = 24.0;

/// Measures blocks by greedy line breaking with fixed font metrics
#[derive(Debug, Clone, Default)]
pub struct LineMeasurer {
    metrics: FontMetrics,
}

impl LineMeasurer {
    pub fn new(metrics: FontMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Count the lines `text` wraps into at `max_width`
    pub fn line_count(&self, text: &str, max_width: f32) -> usize {
        let text = text.trim_end_matches(|c: char| c == '\n' || c == '\r');
        if text.is_empty() {
            // Empty paragraph still has one line
            return 1;
        }

        let mut lines = 1;
        let mut x: f32 = 0.0;
        let mut segment_start = 0;

        for (break_at, opportunity) in linebreaks(text) {
            let segment = &text[segment_start..break_at];
            segment_start = break_at;

            // Trailing whitespace may hang past the margin
            let visible = self.text_width(segment.trim_end());
            if x > 0.0 && x + visible > max_width {
                lines += 1;
                x = 0.0;
            }

            if visible > max_width {
                // Emergency break inside an unbreakable segment
                for grapheme in segment.graphemes(true) {
                    let width = self.metrics.grapheme_width(grapheme);
                    if x > 0.0 && x + width > max_width {
                        lines += 1;
                        x = 0.0;
                    }
                    x += width;
                }
            } else {
                x += self.text_width(segment);
            }

            if opportunity == BreakOpportunity::Mandatory && break_at < text.len() {
                lines += 1;
                x = 0.0;
            }
        }

        lines
    }

    fn text_width(&self, text: &str) -> f32 {
        text.graphemes(true)
            .map(|grapheme| self.metrics.grapheme_width(grapheme))
            .sum()
    }
}

impl ContentMeasurer for LineMeasurer {
    fn measure(&self, block: &Block, width: f32) -> f32 {
        // Adjust width for list indentation
        let effective_width = (width - block.kind.indent_level() as f32 * INDENT_WIDTH)
            .max(self.metrics.default_width);
        let line_height = self.metrics.line_height * block.kind.line_height_multiplier();
        let lines = self.line_count(&block.text, effective_width);

        lines as f32 * line_height + block.kind.spacing_after() * self.metrics.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{BlockKind, ListMarker};

    fn test_measurer() -> LineMeasurer {
        // With 8px per char, 40px width = 5 chars per line
        LineMeasurer::new(FontMetrics::monospace(10.0, 8.0))
    }

    #[test]
    fn test_empty_paragraph() {
        let measurer = test_measurer();
        assert_eq!(measurer.line_count("", 40.0), 1);
        assert_eq!(measurer.measure(&Block::paragraph(""), 40.0), 20.0);
    }

    #[test]
    fn test_single_line() {
        let measurer = test_measurer();
        assert_eq!(measurer.line_count("Hello", 40.0), 1);
        assert_eq!(measurer.line_count("Hello\n", 40.0), 1);
    }

    #[test]
    fn test_line_wrap() {
        let measurer = test_measurer();
        assert_eq!(measurer.line_count("Hello World", 40.0), 2);
        assert_eq!(measurer.line_count("aa bb cc dd", 40.0), 2);
        assert_eq!(measurer.line_count("aaa bbb ccc", 40.0), 3);
    }

    #[test]
    fn test_emergency_break() {
        let measurer = test_measurer();
        assert_eq!(measurer.line_count("abcdefghijkl", 40.0), 3);
    }

    #[test]
    fn test_explicit_newline() {
        let measurer = test_measurer();
        assert_eq!(measurer.line_count("Hello\nWorld", 1000.0), 2);
    }

    #[test]
    fn test_heading_and_list_heights() {
        let measurer = test_measurer();

        let heading = Block::new(BlockKind::heading(1), "Title");
        // one line at 1.5x plus half a line of spacing
        assert_eq!(measurer.measure(&heading, 400.0), 15.0 + 5.0);

        let item = Block::new(
            BlockKind::ListItem {
                indent_level: 1,
                marker: ListMarker::Bullet,
            },
            "abcd efgh",
        );
        // 64 - 24 = 40 wide, so the two words land on separate lines
        assert_eq!(measurer.measure(&item, 64.0), 2.0 * 10.0 + 2.5);
    }

    #[test]
    fn test_wider_pages_never_need_more_height() {
        let measurer = test_measurer();
        let block = Block::paragraph("the quick brown fox jumps over the lazy dog");
        let narrow = measurer.measure(&block, 48.0);
        let wide = measurer.measure(&block, 480.0);
        assert!(wide <= narrow);
    }
}
