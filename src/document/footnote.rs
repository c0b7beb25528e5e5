//! Footnote references anchored into the content stream

use crate::document::Block;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a footnote
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct FootnoteId(pub u64);

impl fmt::Display for FootnoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A pointer from a body position to footnote content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootnoteRef {
    pub id: FootnoteId,
    /// Byte offset into the content stream
    pub anchor: usize,
    pub body: Block,
}

impl FootnoteRef {
    pub fn new(id: FootnoteId, anchor: usize, body: Block) -> Self {
        Self { id, anchor, body }
    }
}
