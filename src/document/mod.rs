//! Immutable document snapshots handed to the paginator

mod block;
mod footnote;

pub use block::{Block, BlockKind, ListMarker};
pub use footnote::{FootnoteId, FootnoteRef};

use crate::error::DocumentConsistencyError;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Position of a content unit within its snapshot
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct ParagraphId(pub u64);

/// One indivisible flow unit placed in the content stream
#[derive(Debug, Clone, PartialEq)]
pub struct ContentUnit {
    pub id: ParagraphId,
    pub block: Block,
    /// Byte offset where this unit starts in the stream
    pub start_offset: usize,
}

impl ContentUnit {
    /// Length of this unit in bytes
    pub fn byte_len(&self) -> usize {
        self.block.byte_len()
    }

    /// Get the end offset of this unit
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.byte_len()
    }
}

/// A frozen view of a document: contiguous units plus footnote references
///
/// Snapshots are never mutated after construction. Share them across threads
/// with `Arc<DocumentSnapshot>`.
#[derive(Debug, Clone, Default)]
pub struct DocumentSnapshot {
    units: Vec<ContentUnit>,
    footnotes: Vec<FootnoteRef>,
    stream_len: usize,
}

impl DocumentSnapshot {
    /// Start building a snapshot unit by unit
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    /// Create a snapshot with one paragraph per line and no footnotes
    ///
    /// The newline stays with the line it terminates so the units cover
    /// every byte of `text`.
    pub fn from_text(text: &str) -> Self {
        text.split_inclusive('\n')
            .fold(Self::builder(), |builder, line| builder.paragraph(line))
            .build()
    }

    pub fn units(&self) -> &[ContentUnit] {
        &self.units
    }

    /// Footnote references in document order
    pub fn footnotes(&self) -> &[FootnoteRef] {
        &self.footnotes
    }

    /// Total length of the content stream in bytes
    pub fn stream_len(&self) -> usize {
        self.stream_len
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Check that every footnote can be placed in the stream
    pub fn validate(&self) -> Result<(), DocumentConsistencyError> {
        let mut seen = FxHashSet::default();
        let mut previous = 0;

        for footnote in &self.footnotes {
            if footnote.anchor > self.stream_len {
                return Err(DocumentConsistencyError::AnchorOutOfBounds {
                    id: footnote.id,
                    anchor: footnote.anchor,
                    stream_len: self.stream_len,
                });
            }
            if footnote.anchor < previous {
                return Err(DocumentConsistencyError::AnchorsOutOfOrder {
                    id: footnote.id,
                    anchor: footnote.anchor,
                    previous,
                });
            }
            if !seen.insert(footnote.id) {
                return Err(DocumentConsistencyError::DuplicateFootnote(footnote.id));
            }
            previous = footnote.anchor;
        }

        Ok(())
    }
}

/// Incremental constructor for [`DocumentSnapshot`]
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    snapshot: DocumentSnapshot,
}

impl DocumentBuilder {
    /// Append a block as the next content unit
    pub fn block(mut self, block: Block) -> Self {
        let doc = &mut self.snapshot;
        let id = ParagraphId(doc.units.len() as u64);
        let start_offset = doc.stream_len;

        doc.stream_len += block.byte_len();
        doc.units.push(ContentUnit {
            id,
            block,
            start_offset,
        });
        self
    }

    /// Append a plain paragraph
    pub fn paragraph(self, text: impl Into<String>) -> Self {
        self.block(Block::paragraph(text))
    }

    /// Append a footnote reference at an absolute stream offset
    pub fn footnote(mut self, id: FootnoteId, anchor: usize, body: Block) -> Self {
        self.snapshot
            .footnotes
            .push(FootnoteRef::new(id, anchor, body));
        self
    }

    /// Anchor a footnote at the start of the most recently added unit
    pub fn footnote_on_last_unit(self, id: FootnoteId, body: Block) -> Self {
        let anchor = self
            .snapshot
            .units
            .last()
            .map(|unit| unit.start_offset)
            .unwrap_or(0);
        self.footnote(id, anchor, body)
    }

    /// Current length of the stream
    pub fn stream_len(&self) -> usize {
        self.snapshot.stream_len
    }

    pub fn build(self) -> DocumentSnapshot {
        self.snapshot
    }
}

/// Serialized document shape accepted by the CLI and the WASM bridge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSource {
    pub units: Vec<Block>,
    #[serde(default)]
    pub footnotes: Vec<FootnoteRef>,
}

impl From<DocumentSource> for DocumentSnapshot {
    fn from(source: DocumentSource) -> Self {
        let builder = source
            .units
            .into_iter()
            .fold(DocumentSnapshot::builder(), DocumentBuilder::block);
        source
            .footnotes
            .into_iter()
            .fold(builder, |builder, footnote| {
                builder.footnote(footnote.id, footnote.anchor, footnote.body)
            })
            .build()
    }
}
