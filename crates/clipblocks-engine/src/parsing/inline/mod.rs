//! # Inline Formatting
//!
//! Turns the visible text of a block into [`StyledSegment`]s.
//!
//! ## Architecture
//!
//! Inline parsing runs after block parsing, over the text of each
//! inline-eligible node (paragraphs, headings, list items, toggle titles,
//! callouts, table cells).
//!
//! Matching is "earliest start wins": every [`Pattern`] is searched from the
//! current position and the match that begins first is taken. Emphasis and
//! link labels are parsed again with the accumulated annotations, so
//! `**bold *italic* end**` yields three segments. Code spans are raw zones and
//! are never parsed further.
//!
//! ## Modules
//!
//! - **`types`**: `StyledSegment`, `Annotations`, `SegmentKind`
//! - **`patterns`**: `Pattern` priority order and its compiled regexes
//! - **`parser`**: `parse_inline()` entry point, URL sanitizing, run splitting

pub mod parser;
pub mod patterns;
pub mod types;

pub use parser::{parse_inline, plain_text, sanitize_url, split_long_segments};
pub use patterns::Pattern;
pub use types::{Annotations, SegmentKind, StyledSegment};
