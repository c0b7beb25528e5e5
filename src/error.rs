//! Error taxonomy for pagination runs

use crate::document::FootnoteId;
use thiserror::Error;

/// Page geometry that leaves no usable content area
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GeometryError {
    #[error("content width must be positive, got {width}")]
    NonPositiveContentWidth { width: f32 },

    #[error("content height must be positive, got {height}")]
    NonPositiveContentHeight { height: f32 },

    #[error("page geometry value `{field}` is not finite")]
    NonFinite { field: &'static str },

    #[error("margin `{field}` must not be negative, got {value}")]
    NegativeMargin { field: &'static str, value: f32 },
}

/// Document snapshot whose footnote anchors cannot be placed in the stream
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentConsistencyError {
    #[error("footnote {id} anchored at {anchor}, beyond stream length {stream_len}")]
    AnchorOutOfBounds {
        id: FootnoteId,
        anchor: usize,
        stream_len: usize,
    },

    #[error("footnote {id} anchored at {anchor} precedes previous anchor {previous}")]
    AnchorsOutOfOrder {
        id: FootnoteId,
        anchor: usize,
        previous: usize,
    },

    #[error("footnote {0} is referenced more than once")]
    DuplicateFootnote(FootnoteId),
}

/// Fatal outcome of a pagination call
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaginationError {
    #[error("invalid page geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("inconsistent document: {0}")]
    DocumentConsistency(#[from] DocumentConsistencyError),

    /// Assembled pages broke the partition invariant
    #[error("internal layout error: {0}")]
    Internal(String),
}

pub type Result<T, E = PaginationError> = std::result::Result<T, E>;
