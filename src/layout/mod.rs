//! Pagination engine with footnote-aware page breaking

mod engine;
pub mod font;
mod footnote;
mod geometry;
mod line_break;
mod measure;
mod pagination;

pub use engine::{Convergence, Diagnostic, LayoutResult, PaginationConfig, Paginator};
pub use font::FontMetrics;
pub use footnote::FootnoteHeightEstimator;
pub use geometry::PageGeometry;
pub use line_break::{LineMeasurer, INDENT_WIDTH};
pub use measure::ContentMeasurer;
pub use pagination::{FootnoteIds, PageDescriptor, HEIGHT_EPSILON};
