//! The content-measuring capability the paginator is built on

use crate::document::Block;

/// Reports the height a block occupies when laid out at a given width
///
/// Implementations must be deterministic for fixed inputs: the paginator
/// relies on repeated measurements agreeing to detect convergence.
pub trait ContentMeasurer {
    fn measure(&self, block: &Block, width: f32) -> f32;
}

impl<F> ContentMeasurer for F
where
    F: Fn(&Block, f32) -> f32,
{
    fn measure(&self, block: &Block, width: f32) -> f32 {
        self(block, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn height_of<M: ContentMeasurer>(measurer: M, block: &Block) -> f32 {
        measurer.measure(block, 100.0)
    }

    #[test]
    fn test_closure_measurer() {
        let block = Block::paragraph("twelve bytes");
        let by_length = |block: &Block, _width: f32| block.text.len() as f32 * 2.0;
        assert_eq!(height_of(by_length, &block), 24.0);
        assert_eq!(height_of(&by_length, &block), 24.0);

        let as_dyn: &dyn ContentMeasurer = &by_length;
        assert_eq!(as_dyn.measure(&block, 100.0), 24.0);
    }
}
