//! # Block Parsing
//!
//! Turns a [`TokenStream`](clipblocks_syntax::TokenStream) into a tree of
//! [`AbstractNode`]s.
//!
//! ## Construction
//!
//! The builder walks tokens left to right. Single-line tokens map directly to
//! nodes; three constructs gather runs first:
//!
//! - **Lists** (`lists`): consecutive list items, rebuilt into a hierarchy
//!   from their indent levels with a stack
//! - **Quotes** (`quotes`): quote-prefixed lines on adjacent lines, split
//!   into toggleable headings, callouts, toggles and plain quotes
//! - **Tables** (`tables`): adjacent rows of one delimiter style, with header
//!   detection and width normalization
//!
//! ## Key Invariants
//!
//! - Parsing never fails; tokens with no builder degrade to text
//! - Nested quote markers never appear in node text
//! - `children: None` is a leaf, `Some(vec![])` an empty container

pub mod builder;
pub mod lists;
pub mod quotes;
pub mod tables;
pub mod types;

pub use builder::parse;
pub use lists::build_list_tree;
pub use quotes::is_toggle_run;
pub use tables::{EMPTY_TABLE, detect_delimiter, extract_header};
pub use types::{AbstractNode, NodeKind, TableData};
