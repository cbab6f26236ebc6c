use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::parsing::{blocks::TableData, inline::StyledSegment};

/// Stable identifier of a block across reconciliations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub Uuid);

impl BlockId {
    /// A fresh random (v4) id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document-model block types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Paragraph,
    Heading,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    Quote,
    Callout,
    Code,
    Equation,
    Table,
    Divider,
    TableOfContents,
    Breadcrumb,
    Image,
    Video,
    Audio,
    File,
    Bookmark,
    /// A type with no target representation, named as it arrived.
    Unsupported(String),
}

impl BlockType {
    pub fn name(&self) -> &str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading => "heading",
            BlockType::BulletedListItem => "bulleted_list_item",
            BlockType::NumberedListItem => "numbered_list_item",
            BlockType::ToDo => "to_do",
            BlockType::Toggle => "toggle",
            BlockType::Quote => "quote",
            BlockType::Callout => "callout",
            BlockType::Code => "code",
            BlockType::Equation => "equation",
            BlockType::Table => "table",
            BlockType::Divider => "divider",
            BlockType::TableOfContents => "table_of_contents",
            BlockType::Breadcrumb => "breadcrumb",
            BlockType::Image => "image",
            BlockType::Video => "video",
            BlockType::Audio => "audio",
            BlockType::File => "file",
            BlockType::Bookmark => "bookmark",
            BlockType::Unsupported(name) => name,
        }
    }
}

/// Per-type block properties. Only the fields a type uses are set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub toggleable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Inline equation or inline code rather than a block.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableData>,
    /// Editor inline items that could not be read and were left out.
    #[serde(skip_serializing_if = "is_zero")]
    pub dropped_inline: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Bookkeeping that never takes part in the content hash.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockMeta {
    /// SHA-256 hex of the block's canonical content, children included.
    pub content_hash: String,
    /// Milliseconds since the Unix epoch of the reconciliation that produced it.
    pub modified_at: u64,
}

/// A block with a stable identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub block_type: BlockType,
    pub props: BlockProps,
    pub inline_content: Vec<StyledSegment>,
    pub children: Vec<Block>,
    pub meta: BlockMeta,
}

/// An ordered tree of identified blocks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Depth-first, pre-order walk over every block.
    pub fn iter(&self) -> DocumentIter<'_> {
        DocumentIter {
            stack: self.blocks.iter().rev().collect(),
        }
    }

    pub fn find(&self, id: BlockId) -> Option<&Block> {
        self.iter().find(|b| b.id == id)
    }

    /// Number of blocks at every depth.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

pub struct DocumentIter<'a> {
    stack: Vec<&'a Block>,
}

impl<'a> Iterator for DocumentIter<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.stack.pop()?;
        self.stack.extend(block.children.iter().rev());
        Some(block)
    }
}
