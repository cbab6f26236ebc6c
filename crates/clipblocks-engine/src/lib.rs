//! # clipblocks-engine
//!
//! Everything after lexing: inline formatting, block parsing, conversion to
//! target API blocks and the identity layer that keeps block ids stable
//! across edits.
//!
//! ```text
//! text ──► clipblocks_syntax::Lexer ──► parsing::blocks ──► AbstractNode tree
//!                                                             │
//!                          identity::drafts_from_nodes ◄──────┤
//! editor JSON ──► identity::drafts_from_editor                │
//!                          │                                  ▼
//!                  identity::reconcile ──► Document    convert::convert_nodes
//!                                             │
//!                                             ▼
//!                                 convert::convert_document
//! ```
//!
//! Conversions never fail. Lossy decisions and dropped blocks are listed in
//! the [`ConversionReport`] returned with the blocks.

pub mod convert;
pub mod error;
pub mod identity;
pub mod options;
pub mod parsing;

pub use convert::{Conversion, ConversionReport, TargetBlock, convert_document, convert_nodes};
pub use error::ConvertError;
pub use identity::{
    Block, BlockId, Document, DraftBlock, EditorNode, IdMapping, Reconciliation, drafts_from_editor,
    drafts_from_nodes, reconcile,
};
pub use options::ConvertOptions;
pub use parsing::{
    blocks::{AbstractNode, NodeKind},
    inline::{StyledSegment, parse_inline},
    parse_text,
};

/// Lexes, parses and flattens `text` in one call.
pub fn convert_text(text: &str, options: &ConvertOptions) -> Conversion {
    convert_nodes(&parse_text(text, &options.lexer), options)
}
