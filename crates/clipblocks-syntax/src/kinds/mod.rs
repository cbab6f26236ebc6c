//! Block-specific syntax knowledge, one module per construct.

pub mod block_quote;
pub mod callout;
pub mod code_fence;
pub mod html;
pub mod media;
pub mod table_row;

pub use block_quote::BlockQuote;
pub use callout::{Callout, CalloutLine};
pub use code_fence::{CodeFence, FenceKind};
pub use html::strip_tags;
pub use table_row::TableRow;
