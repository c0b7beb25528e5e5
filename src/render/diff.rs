//! Render diff protocol for incremental updates

use crate::layout::{LayoutResult, PageDescriptor};
use serde::{Deserialize, Serialize};

/// A single patch operation for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "op")]
pub enum RenderPatch {
    /// A page that did not exist before
    InsertPage { page: PageDescriptor },
    /// A page whose range, footnotes or reservations changed
    UpdatePage { page: PageDescriptor },
    /// Remove a trailing page
    #[serde(rename_all = "camelCase")]
    RemovePage { page_index: usize },
}

impl RenderPatch {
    pub fn page_index(&self) -> usize {
        match self {
            RenderPatch::InsertPage { page } | RenderPatch::UpdatePage { page } => page.page_index,
            RenderPatch::RemovePage { page_index } => *page_index,
        }
    }
}

/// Complete render diff to send to renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderDiff {
    pub version: u64,
    pub patches: Vec<RenderPatch>,
}

impl RenderDiff {
    /// Create empty diff
    pub fn new(version: u64) -> Self {
        Self {
            version,
            patches: Vec::new(),
        }
    }

    /// Page-level patches that turn `old` into `new`
    ///
    /// Unchanged pages produce nothing, so equal layouts give an empty diff.
    pub fn between(old: Option<&LayoutResult>, new: &LayoutResult, version: u64) -> Self {
        let mut diff = Self::new(version);
        let old_pages: &[PageDescriptor] = old.map_or(&[][..], |layout| layout.pages.as_slice());

        for (index, page) in new.pages.iter().enumerate() {
            match old_pages.get(index) {
                Some(previous) if previous == page => {}
                Some(_) => diff.add_patch(RenderPatch::UpdatePage { page: page.clone() }),
                None => diff.add_patch(RenderPatch::InsertPage { page: page.clone() }),
            }
        }

        // Remove from the back so indices stay valid while applying
        for page_index in (new.pages.len()..old_pages.len()).rev() {
            diff.add_patch(RenderPatch::RemovePage { page_index });
        }

        diff
    }

    /// Add a patch
    pub fn add_patch(&mut self, patch: RenderPatch) {
        self.patches.push(patch);
    }

    /// Check if there are any patches
    pub fn has_patches(&self) -> bool {
        !self.patches.is_empty()
    }

    /// Get patch count
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Convergence;

    fn page(page_index: usize, start: usize, end: usize) -> PageDescriptor {
        PageDescriptor {
            page_index,
            content_range: start..end,
            units: page_index..page_index + 1,
            footnotes: Default::default(),
            footnote_area_height: 0.0,
            text_container_height: 100.0,
            text_height: 50.0,
        }
    }

    fn layout(pages: Vec<PageDescriptor>) -> LayoutResult {
        LayoutResult {
            pages,
            convergence: Convergence {
                iterations: 1,
                converged: true,
            },
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn test_first_layout_inserts_every_page() {
        let new = layout(vec![page(0, 0, 10), page(1, 10, 20)]);
        let diff = RenderDiff::between(None, &new, 1);
        assert_eq!(diff.patch_count(), 2);
        assert!(matches!(diff.patches[0], RenderPatch::InsertPage { .. }));
    }

    #[test]
    fn test_equal_layouts_need_no_patches() {
        let old = layout(vec![page(0, 0, 10)]);
        let diff = RenderDiff::between(Some(&old), &old.clone(), 2);
        assert!(!diff.has_patches());
    }

    #[test]
    fn test_shrinking_layout() {
        let old = layout(vec![page(0, 0, 10), page(1, 10, 20), page(2, 20, 30)]);
        let new = layout(vec![page(0, 0, 30)]);
        let diff = RenderDiff::between(Some(&old), &new, 3);

        let touched: Vec<_> = diff.patches.iter().map(RenderPatch::page_index).collect();
        assert_eq!(touched, vec![0, 2, 1]);
        assert!(matches!(diff.patches[0], RenderPatch::UpdatePage { .. }));
        assert!(matches!(diff.patches[1], RenderPatch::RemovePage { page_index: 2 }));
    }
}
