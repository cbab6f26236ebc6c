use clipblocks_syntax::LexerOptions;
use serde::{Deserialize, Serialize};

/// Content length limit of one rich-text run in the target API.
pub const DEFAULT_MAX_RICH_TEXT_LEN: usize = 2000;

/// Options shared by every conversion entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Log each conversion decision through `log`. Never changes output.
    pub diagnostics: bool,
    pub lexer: LexerOptions,
    /// Rich-text runs longer than this many characters are split.
    pub max_rich_text_len: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            diagnostics: false,
            lexer: LexerOptions::default(),
            max_rich_text_len: DEFAULT_MAX_RICH_TEXT_LEN,
        }
    }
}
