//! Folio: footnote-aware pagination core
//!
//! This crate splits a flow of content units into fixed-size pages while
//! reserving room at the bottom of each page for the footnotes anchored on
//! it. Because footnotes shrink the text area and the text area decides
//! which footnotes land on a page, pagination is solved as a bounded
//! fixed-point iteration:
//! - Pure engine: snapshot + geometry in, self-contained result out
//! - Injected content measurer, so layout is testable without a font stack
//! - Explicit convergence record and non-fatal diagnostics
//! - Page-level render diffs for incremental repaint

pub mod document;
pub mod error;
pub mod layout;
pub mod render;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use document::{
    Block, BlockKind, ContentUnit, DocumentSnapshot, DocumentSource, FootnoteId, FootnoteRef,
    ListMarker, ParagraphId,
};
pub use error::{DocumentConsistencyError, GeometryError, PaginationError};
pub use layout::{
    ContentMeasurer, Convergence, Diagnostic, FontMetrics, LayoutResult, LineMeasurer,
    PageDescriptor, PageGeometry, PaginationConfig, Paginator,
};
pub use render::{PageFrame, RenderDiff, RenderPatch};

use std::sync::Arc;

/// Page-space rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}

/// Paginate with the reference line measurer and default settings
pub fn paginate(
    document: &DocumentSnapshot,
    geometry: &PageGeometry,
) -> Result<LayoutResult, PaginationError> {
    let measurer = LineMeasurer::default();
    Paginator::new(&measurer, PaginationConfig::default()).paginate(document, geometry)
}

/// Measurer shared between a session and the jobs it hands out
pub type SharedMeasurer = Arc<dyn ContentMeasurer + Send + Sync>;

/// A self-contained pagination request that may run on any thread
#[derive(Clone)]
pub struct PaginationJob {
    generation: u64,
    document: Arc<DocumentSnapshot>,
    geometry: PageGeometry,
    config: PaginationConfig,
    measurer: SharedMeasurer,
    seed: Option<Arc<LayoutResult>>,
}

impl PaginationJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn document(&self) -> &Arc<DocumentSnapshot> {
        &self.document
    }

    /// Run the engine over the job's frozen inputs
    pub fn run(&self) -> Result<LayoutResult, PaginationError> {
        let paginator = Paginator::new(self.measurer.as_ref(), self.config);
        match &self.seed {
            Some(previous) => paginator.repaginate(&self.document, &self.geometry, previous),
            None => paginator.paginate(&self.document, &self.geometry),
        }
    }
}

/// Tracks the latest document and geometry and the layout derived from them
///
/// Every change bumps a generation counter. Jobs begun before the latest
/// change are stale: their results are discarded on completion, so callers
/// running jobs off-thread can simply start a new one after each edit.
pub struct PaginationSession {
    document: Arc<DocumentSnapshot>,
    geometry: PageGeometry,
    config: PaginationConfig,
    measurer: SharedMeasurer,
    layout: Option<Arc<LayoutResult>>,
    /// Inputs the current layout was computed from
    layout_inputs: Option<(Arc<DocumentSnapshot>, PageGeometry, PaginationConfig)>,
    generation: u64,
    layout_dirty: bool,
}

impl PaginationSession {
    /// Create a session with the reference measurer
    pub fn new(geometry: PageGeometry) -> Self {
        Self::with_measurer(
            Arc::new(LineMeasurer::default()),
            geometry,
            PaginationConfig::default(),
        )
    }

    pub fn with_measurer(
        measurer: SharedMeasurer,
        geometry: PageGeometry,
        config: PaginationConfig,
    ) -> Self {
        Self {
            document: Arc::new(DocumentSnapshot::default()),
            geometry,
            config,
            measurer,
            layout: None,
            layout_inputs: None,
            generation: 0,
            layout_dirty: true,
        }
    }

    /// Replace the document snapshot
    pub fn set_document(&mut self, document: impl Into<Arc<DocumentSnapshot>>) {
        self.document = document.into();
        self.invalidate();
    }

    /// Replace the document with plain text, one paragraph per line
    pub fn set_text(&mut self, text: &str) {
        self.set_document(DocumentSnapshot::from_text(text));
    }

    pub fn set_geometry(&mut self, geometry: PageGeometry) {
        if geometry != self.geometry {
            self.geometry = geometry;
            self.invalidate();
        }
    }

    pub fn set_config(&mut self, config: PaginationConfig) {
        if config != self.config {
            self.config = config;
            self.invalidate();
        }
    }

    /// Force the next relayout, e.g. after the measurer's fonts changed
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.layout_dirty = true;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn document(&self) -> &Arc<DocumentSnapshot> {
        &self.document
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Snapshot the current inputs into a job
    ///
    /// When the inputs are exactly those of a converged current layout, the
    /// job is seeded with it and confirms the layout in a single pass. A
    /// capped layout is never used as a seed: starting from its last pass
    /// would land elsewhere on the oscillation than a fresh run.
    pub fn begin(&self) -> PaginationJob {
        let unchanged = self.layout_inputs.as_ref().is_some_and(|(doc, geometry, config)| {
            Arc::ptr_eq(doc, &self.document) && *geometry == self.geometry && *config == self.config
        });

        PaginationJob {
            generation: self.generation,
            document: Arc::clone(&self.document),
            geometry: self.geometry,
            config: self.config,
            measurer: Arc::clone(&self.measurer),
            seed: self
                .layout
                .clone()
                .filter(|layout| unchanged && layout.is_converged()),
        }
    }

    /// Accept a finished job's layout unless a newer change superseded it
    ///
    /// Returns the page-level diff against the previously accepted layout,
    /// or `None` for a stale job.
    pub fn complete(&mut self, job: &PaginationJob, layout: LayoutResult) -> Option<RenderDiff> {
        if job.generation != self.generation {
            log::debug!(
                "discarding layout for generation {}, current is {}",
                job.generation,
                self.generation
            );
            return None;
        }

        let diff = RenderDiff::between(self.layout.as_deref(), &layout, job.generation);
        self.layout = Some(Arc::new(layout));
        self.layout_inputs = Some((Arc::clone(&job.document), job.geometry, job.config));
        self.layout_dirty = false;
        Some(diff)
    }

    /// Perform layout if needed and return render diff
    pub fn relayout(&mut self) -> Result<Option<RenderDiff>, PaginationError> {
        if !self.layout_dirty {
            return Ok(None);
        }

        let job = self.begin();
        let layout = job.run()?;
        Ok(self.complete(&job, layout))
    }

    /// The most recently accepted layout
    pub fn layout(&self) -> Option<&LayoutResult> {
        self.layout.as_deref()
    }

    /// Get total page count
    pub fn page_count(&self) -> usize {
        self.layout().map_or(0, LayoutResult::page_count)
    }

    /// Page frames of the current layout
    pub fn frames(&self) -> Vec<PageFrame> {
        self.layout()
            .map(|layout| {
                layout
                    .pages
                    .iter()
                    .map(|page| PageFrame::new(page, &self.geometry))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_length(block: &Block, _width: f32) -> f32 {
        block.text.len() as f32
    }

    fn session(content_height: f32) -> PaginationSession {
        PaginationSession::with_measurer(
            Arc::new(by_length),
            PageGeometry::with_margins(200.0, content_height + 20.0, 10.0),
            PaginationConfig {
                footnote_separator: 0.0,
                ..PaginationConfig::default()
            },
        )
    }

    #[test]
    fn test_paginate_with_defaults() {
        let doc = DocumentSnapshot::from_text("Hello, World!\nSecond paragraph");
        let result = paginate(&doc, &PageGeometry::default()).unwrap();
        assert_eq!(result.page_count(), 1);
        assert_eq!(result.pages[0].content_range, 0..doc.stream_len());
    }

    #[test]
    fn test_relayout_only_when_dirty() {
        let mut session = session(100.0);
        session.set_text(&"x".repeat(150));

        let diff = session.relayout().unwrap().unwrap();
        assert_eq!(diff.patch_count(), 1);
        assert_eq!(session.page_count(), 1);
        assert_eq!(session.relayout().unwrap(), None);
    }

    #[test]
    fn test_stale_job_is_discarded() {
        let mut session = session(100.0);
        session.set_text("first\nsecond");
        let stale = session.begin();

        session.set_text("replacement");
        let fresh = session.begin();

        let stale_layout = stale.run().unwrap();
        assert_eq!(session.complete(&stale, stale_layout), None);

        let fresh_layout = std::thread::spawn(move || {
            let layout = fresh.run();
            (fresh, layout)
        })
        .join()
        .unwrap();
        let (fresh, layout) = fresh_layout;
        assert!(session.complete(&fresh, layout.unwrap()).is_some());
        assert_eq!(session.layout().unwrap().pages[0].content_range, 0..11);
    }

    #[test]
    fn test_unchanged_inputs_reuse_the_layout() {
        let mut session = session(100.0);
        let doc = DocumentSnapshot::builder()
            .paragraph("x".repeat(40))
            .footnote_on_last_unit(FootnoteId(1), Block::paragraph("y".repeat(30)))
            .paragraph("x".repeat(40))
            .build();
        session.set_document(doc);
        session.relayout().unwrap();
        assert_eq!(session.layout().unwrap().convergence.iterations, 2);

        session.invalidate();
        let diff = session.relayout().unwrap().unwrap();
        assert!(!diff.has_patches());
        assert_eq!(session.layout().unwrap().convergence.iterations, 1);
    }

    #[test]
    fn test_capped_layout_is_recomputed_from_scratch() {
        // Alternates between one page and two pages forever
        let mut session = session(100.0);
        session.set_config(PaginationConfig {
            max_iterations: 5,
            ..*session.config()
        });
        let doc = DocumentSnapshot::builder()
            .paragraph("x".repeat(60))
            .footnote_on_last_unit(FootnoteId(1), Block::paragraph("y".repeat(10)))
            .paragraph("x".repeat(30))
            .footnote_on_last_unit(FootnoteId(2), Block::paragraph("y".repeat(20)))
            .build();
        session.set_document(doc);

        session.relayout().unwrap();
        let first = session.layout().unwrap().clone();
        assert!(!first.is_converged());
        assert!(session.begin().seed.is_none());

        session.invalidate();
        let diff = session.relayout().unwrap().unwrap();
        assert!(!diff.has_patches());
        assert_eq!(session.layout().unwrap(), &first);

        let fresh = Paginator::new(&by_length, *session.config())
            .paginate(session.document(), session.geometry())
            .unwrap();
        assert_eq!(fresh.pages, first.pages);
    }

    #[test]
    fn test_frames_follow_geometry() {
        let mut session = session(100.0);
        session.set_text("abc");
        session.relayout().unwrap();

        let frames = session.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].text, Rect::new(10.0, 10.0, 180.0, 100.0));
    }
}
