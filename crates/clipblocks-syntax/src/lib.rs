//! # clipblocks-syntax
//!
//! The first stage of the clipping pipeline: turning loosely formatted text
//! into a position-tracked [`TokenStream`].
//!
//! ```text
//! Source Text → strip quote prefixes → LineMarker (Logos) → Token
//!                                      └ fences / $$ switch to raw mode
//! ```
//!
//! Besides classic markdown the lexer recognises the block extensions the
//! converter needs: toggles and toggle headings (any quote-prefixed line
//! carries `quote_depth > 0`), native and HTML callouts, `$$` equations,
//! typed code fences, pipe/csv/tsv table rows and bare media URLs sniffed by
//! extension.
//!
//! The lexer never fails. Unrecognised lines become [`TokenKind::Text`] and
//! the stream always ends with [`TokenKind::Eof`].
//!
//! ## Module Structure
//!
//! ```text
//! clipblocks-syntax/
//! ├── lib.rs       # This file - public API
//! ├── span.rs      # Byte spans and line ranges
//! ├── token.rs     # Token, TokenKind (per-kind metadata), TokenStream
//! ├── marker.rs    # Logos enum for leading line markers
//! ├── lexer.rs     # Line loop, raw zones, LexerOptions
//! └── kinds/       # Syntax knowledge per construct (quotes, fences, ...)
//! ```

pub mod kinds;
pub mod lexer;
pub mod marker;
pub mod span;
pub mod token;

pub use lexer::{Lexer, LexerOptions, tokenize};
pub use span::{LineRange, Span};
pub use token::{Delimiter, ListType, MediaKind, Token, TokenKind, TokenStream};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    /// Formats a token stream one token per line for snapshot testing.
    fn format_stream(stream: &TokenStream) -> String {
        stream
            .all()
            .iter()
            .map(|t| {
                format!(
                    "{}@{}..{} q{} {:?}",
                    t.kind.name(),
                    t.span.start,
                    t.span.end,
                    t.quote_depth,
                    t.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn snapshot_mixed_document() {
        let input = "# Title\n\n> a\n> - b\n\n---\n| x | y |\n";
        assert_snapshot!(format_stream(&tokenize(input)), @r#"
        heading@0..7 q0 "Title"
        text@9..12 q1 "a"
        list_item@13..18 q1 "b"
        divider@20..23 q0 ""
        table_row@24..33 q0 "| x | y |"
        eof@34..34 q0 """#);
    }
}
