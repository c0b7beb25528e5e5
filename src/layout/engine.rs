//! Fixed-point pagination engine
//!
//! Body text and footnotes depend on each other: the footnotes on a page
//! shrink its text area, which moves text, which moves footnotes. The engine
//! breaks the cycle by iterating a dry page-breaking pass until the text
//! container heights it assumed match the ones the resulting footnotes
//! require, or until the iteration cap is hit.

use crate::document::{DocumentSnapshot, FootnoteId};
use crate::error::Result;
use crate::layout::footnote::FootnoteHeightEstimator;
use crate::layout::geometry::PageGeometry;
use crate::layout::measure::ContentMeasurer;
use crate::layout::pagination::{
    assemble_pages, assign_footnotes, break_pages, FootnoteIds, PageDescriptor, PageReservation,
    PageSlice, HEIGHT_EPSILON,
};
use serde::{Deserialize, Serialize};

/// Tunables for a pagination run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationConfig {
    /// Upper bound on layout passes before giving up on convergence
    pub max_iterations: usize,
    /// Smallest text container a page keeps, however tall its footnotes
    pub min_text_height: f32,
    /// Allowance above each footnote (separator rule and gap)
    pub footnote_separator: f32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 8,
            min_text_height: 36.0,
            footnote_separator: 12.0,
        }
    }
}

/// How the fixed-point loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Convergence {
    pub iterations: usize,
    pub converged: bool,
}

/// Non-fatal conditions observed during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Diagnostic {
    /// The iteration cap was reached; pages come from the last pass
    #[serde(rename_all = "camelCase")]
    NonConvergence { iterations: usize },
    /// Footnotes left less than the minimum text height on a page
    #[serde(rename_all = "camelCase")]
    OversizedFootnote {
        page_index: usize,
        required: f32,
        content_height: f32,
    },
}

/// Complete output of one pagination run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub pages: Vec<PageDescriptor>,
    pub convergence: Convergence,
    pub diagnostics: Vec<Diagnostic>,
}

impl LayoutResult {
    /// Get page count
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_converged(&self) -> bool {
        self.convergence.converged
    }

    /// Page containing a stream offset
    pub fn page_at_offset(&self, offset: usize) -> Option<&PageDescriptor> {
        let last = self.pages.len().checked_sub(1)?;
        self.pages
            .iter()
            .find(|page| page.contains_offset(offset, page.page_index == last))
    }

    /// Page a footnote was placed on
    pub fn page_of_footnote(&self, id: FootnoteId) -> Option<&PageDescriptor> {
        self.pages.iter().find(|page| page.footnotes.contains(&id))
    }

    /// Text container heights, one per page
    pub fn container_heights(&self) -> Vec<f32> {
        self.pages
            .iter()
            .map(|page| page.text_container_height)
            .collect()
    }
}

/// Starting assumptions for the first pass
struct Seed {
    containers: Vec<f32>,
    footnotes: Vec<FootnoteIds>,
}

/// One dry layout pass with its derived reservations
struct Pass {
    slices: Vec<PageSlice>,
    reservations: Vec<PageReservation>,
    oversized: Vec<(usize, f32)>,
}

/// Paginates documents with an injected content measurer
pub struct Paginator<'a, M: ContentMeasurer + ?Sized> {
    measurer: &'a M,
    config: PaginationConfig,
}

impl<'a, M: ContentMeasurer + ?Sized> Paginator<'a, M> {
    pub fn new(measurer: &'a M, config: PaginationConfig) -> Self {
        Self { measurer, config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Paginate from scratch, assuming no page has footnotes
    pub fn paginate(
        &self,
        document: &DocumentSnapshot,
        geometry: &PageGeometry,
    ) -> Result<LayoutResult> {
        let seed = Seed {
            containers: Vec::new(),
            footnotes: Vec::new(),
        };
        self.run(document, geometry, seed)
    }

    /// Paginate starting from a previous result's reservations
    ///
    /// With unchanged inputs the first pass already reproduces `previous`,
    /// so a converged layout is confirmed in a single iteration.
    pub fn repaginate(
        &self,
        document: &DocumentSnapshot,
        geometry: &PageGeometry,
        previous: &LayoutResult,
    ) -> Result<LayoutResult> {
        let seed = Seed {
            containers: previous.container_heights(),
            footnotes: previous
                .pages
                .iter()
                .map(|page| page.footnotes.clone())
                .collect(),
        };
        self.run(document, geometry, seed)
    }

    fn run(
        &self,
        document: &DocumentSnapshot,
        geometry: &PageGeometry,
        seed: Seed,
    ) -> Result<LayoutResult> {
        geometry.validate()?;
        document.validate()?;

        let content_width = geometry.content_width();
        let content_height = geometry.content_height();
        let max_iterations = self.config.max_iterations.max(1);

        // Unit heights do not depend on the footnotes, measure them once
        let unit_heights: Vec<f32> = document
            .units()
            .iter()
            .map(|unit| self.measurer.measure(&unit.block, content_width).max(0.0))
            .collect();
        let mut estimator =
            FootnoteHeightEstimator::new(self.measurer, self.config.footnote_separator);

        let Seed {
            containers: mut available,
            footnotes: mut previous_footnotes,
        } = seed;
        let mut iterations = 0;

        let (pass, converged) = loop {
            iterations += 1;
            let pass = self.layout_pass(
                document,
                &unit_heights,
                &available,
                geometry,
                &mut estimator,
            );

            let mut changed_pages = 0;
            for (index, reservation) in pass.reservations.iter().enumerate() {
                let assumed = available.get(index).copied().unwrap_or(content_height);
                let assumed_footnotes = previous_footnotes
                    .get(index)
                    .map_or(&[][..], |ids| &ids[..]);
                if (assumed - reservation.text_container_height).abs() > HEIGHT_EPSILON
                    || assumed_footnotes != &reservation.footnotes[..]
                {
                    changed_pages += 1;
                }
            }
            let converged = changed_pages == 0;

            log::debug!(
                "pagination pass {}: {} pages, {} changed",
                iterations,
                pass.slices.len(),
                changed_pages
            );

            if converged || iterations >= max_iterations {
                break (pass, converged);
            }

            available = pass
                .reservations
                .iter()
                .map(|reservation| reservation.text_container_height)
                .collect();
            previous_footnotes = pass
                .reservations
                .iter()
                .map(|reservation| reservation.footnotes.clone())
                .collect();
        };

        let mut diagnostics = Vec::new();
        if !converged {
            log::warn!(
                "pagination did not converge after {} iterations, using last pass",
                iterations
            );
            diagnostics.push(Diagnostic::NonConvergence { iterations });
        }
        for &(page_index, required) in &pass.oversized {
            log::warn!(
                "footnotes on page {} need {:.1} of {:.1} content height",
                page_index,
                required,
                content_height
            );
            diagnostics.push(Diagnostic::OversizedFootnote {
                page_index,
                required,
                content_height,
            });
        }

        let pages = assemble_pages(document, &pass.slices, pass.reservations)?;
        log::info!(
            "paginated {} units into {} pages in {} iterations",
            document.units().len(),
            pages.len(),
            iterations
        );

        Ok(LayoutResult {
            pages,
            convergence: Convergence {
                iterations,
                converged,
            },
            diagnostics,
        })
    }

    /// Break pages with the assumed container heights, then derive the
    /// heights the resulting footnote placement actually requires
    fn layout_pass(
        &self,
        document: &DocumentSnapshot,
        unit_heights: &[f32],
        available: &[f32],
        geometry: &PageGeometry,
        estimator: &mut FootnoteHeightEstimator<'_, M>,
    ) -> Pass {
        let content_width = geometry.content_width();
        let content_height = geometry.content_height();
        let floor = self
            .config
            .min_text_height
            .max(HEIGHT_EPSILON)
            .min(content_height);

        let slices = break_pages(unit_heights, available, content_height);
        let footnote_ranges = assign_footnotes(document, &slices);

        let mut oversized = Vec::new();
        let reservations = footnote_ranges
            .into_iter()
            .enumerate()
            .map(|(page_index, range)| {
                let refs: Vec<_> = document.footnotes()[range].iter().collect();
                if refs.is_empty() {
                    return PageReservation {
                        footnotes: FootnoteIds::new(),
                        footnote_area_height: 0.0,
                        text_container_height: content_height,
                    };
                }

                let required = estimator.estimate_refs(&refs, content_width);
                let remaining = content_height - required;
                if remaining <= floor {
                    oversized.push((page_index, required));
                }

                PageReservation {
                    footnotes: refs.iter().map(|footnote| footnote.id).collect(),
                    footnote_area_height: required,
                    text_container_height: remaining.max(floor),
                }
            })
            .collect();

        Pass {
            slices,
            reservations,
            oversized,
        }
    }
}
