//! Block-level content: the measurable flow units

use serde::{Deserialize, Serialize};

/// Type of list marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ListMarker {
    Bullet,
    Numbered { ordinal: u32 },
}

/// The kind of block element
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum BlockKind {
    /// Regular paragraph
    #[default]
    Paragraph,
    /// Heading with level (1-6)
    Heading { level: u8 },
    /// List item
    #[serde(rename_all = "camelCase")]
    ListItem { indent_level: u8, marker: ListMarker },
}

impl BlockKind {
    /// Create a heading, clamping the level into 1..=6
    pub fn heading(level: u8) -> Self {
        BlockKind::Heading {
            level: level.clamp(1, 6),
        }
    }

    /// Get the line height multiplier for this block kind
    pub fn line_height_multiplier(&self) -> f32 {
        match self {
            BlockKind::Paragraph => 1.0,
            BlockKind::Heading { level } => match level {
                1 => 1.5,
                2 => 1.4,
                3 => 1.3,
                _ => 1.2,
            },
            BlockKind::ListItem { .. } => 1.0,
        }
    }

    /// Get the spacing after this block (in line heights)
    pub fn spacing_after(&self) -> f32 {
        match self {
            BlockKind::Paragraph => 1.0,
            BlockKind::Heading { .. } => 0.5,
            BlockKind::ListItem { .. } => 0.25,
        }
    }

    /// Nesting depth for list items, zero otherwise
    pub fn indent_level(&self) -> u8 {
        match self {
            BlockKind::ListItem { indent_level, .. } => *indent_level,
            _ => 0,
        }
    }
}

/// A measurable piece of content: body paragraphs and footnote bodies alike
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub kind: BlockKind,
    pub text: String,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Create a plain paragraph block
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph, text)
    }

    /// Length of this block in the content stream, in bytes
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind() {
        assert_eq!(BlockKind::heading(9), BlockKind::Heading { level: 6 });
        assert_eq!(BlockKind::heading(0), BlockKind::Heading { level: 1 });

        let list = BlockKind::ListItem {
            indent_level: 2,
            marker: ListMarker::Bullet,
        };
        assert_eq!(list.indent_level(), 2);
        assert_eq!(BlockKind::Paragraph.indent_level(), 0);
    }

    #[test]
    fn test_block_kind_json_shape() {
        let block: Block =
            serde_json::from_str(r#"{"kind":{"type":"heading","level":2},"text":"Intro"}"#)
                .unwrap();
        assert_eq!(block.kind, BlockKind::Heading { level: 2 });

        let plain: Block = serde_json::from_str(r#"{"text":"body"}"#).unwrap();
        assert_eq!(plain.kind, BlockKind::Paragraph);
    }
}
