//! # Identity and Diff
//!
//! Gives blocks stable ids across repeated conversions of the same content
//! and reports what changed.
//!
//! ```text
//! AbstractNode tree ─ drafts_from_nodes ─┐
//!                                        ├─ DraftBlock tree ─ reconcile ─ Document
//! EditorNode tree ── drafts_from_editor ─┘        (+ previous Document, IdMapping)
//! ```
//!
//! Every draft carries a `source_key`. The [`IdMapping`] returned by one
//! reconciliation maps those keys to ids and is passed to the next one, so a
//! re-parse of unchanged text keeps every id and reports no changes.
//! Content hashes cover type, props, inline content and children, so an edit
//! deep in a tree marks each ancestor modified as well.

pub mod drafts;
pub mod editor;
pub mod hash;
pub mod model;
pub mod reconcile;

pub use drafts::{DraftBlock, drafts_from_nodes};
pub use editor::{EditorInline, EditorNode, EditorStyles, drafts_from_editor};
pub use hash::content_hash;
pub use model::{Block, BlockId, BlockMeta, BlockProps, BlockType, Document};
pub use reconcile::{IdMapping, Reconciliation, reconcile};
