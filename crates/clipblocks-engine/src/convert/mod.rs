//! Structural converters from parsed or identified blocks to target blocks.
//!
//! Two shapes are produced from the same per-block rules:
//!
//! - [`convert_nodes`] flattens: children follow their parent as further
//!   top-level entries and the parent carries `has_children: true`.
//! - [`convert_document`] nests: children live inside the parent's payload
//!   for the types that allow them.
//!
//! Both are total. Anything lost along the way is listed in the returned
//! [`ConversionReport`].

mod flat;
mod nested;
mod payload;
pub mod report;
pub mod rules;
pub mod target;
pub mod validate;

pub use flat::convert_nodes;
pub use nested::{can_have_children, convert_document};
pub use report::ConversionReport;
pub use rules::{heading_level, is_pdf, is_valid_audio_url, normalize_language, resolve_color};
pub use target::{BlockPayload, RichText, TargetBlock};
pub use validate::{ValidationError, validate_block};

use serde::Serialize;

/// Blocks produced by one conversion call and what happened along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub blocks: Vec<TargetBlock>,
    pub report: ConversionReport,
}

impl Conversion {
    /// The blocks as a JSON array in the target API shape.
    pub fn blocks_json(&self) -> Result<serde_json::Value, crate::ConvertError> {
        Ok(serde_json::to_value(&self.blocks)?)
    }
}
