//! Leading line markers recognised with [Logos].
//!
//! [Logos]: https://docs.rs/logos
//!
//! Only the start of a line is lexed: the lexer asks for the first marker of
//! the (quote-stripped, indentation-stripped) line body and decides the token
//! kind from it. Anything Logos does not recognise is plain text.

use logos::Logos;

/// Markers that can open a line.
///
/// Logos picks the longest match, so `- [ ] ` wins over `- ` and
/// `<aside>` wins over a generic tag.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMarker {
    /// `#` to `######` followed by whitespace
    #[regex(r"#{1,6}[ \t]")]
    Heading,

    /// `- [ ] `, `* [x] `
    #[regex(r"[-*+][ \t]+\[[ xX]\][ \t]")]
    Todo,

    /// `- `, `* `, `+ `
    #[regex(r"[-*+][ \t]")]
    Bullet,

    /// `1. ` or `1) `
    #[regex(r"[0-9]{1,9}[.)][ \t]")]
    Numbered,

    /// `|` opening a markdown table row
    #[token("|")]
    Pipe,

    /// `[!note]` native callout marker
    #[regex(r"\[![A-Za-z]+\]")]
    Callout,

    /// `![` opening a markdown image
    #[token("![")]
    Image,

    /// `<aside ...>` HTML callout
    #[regex(r"<[aA][sS][iI][dD][eE][^>]*>")]
    Aside,

    /// Any other HTML tag opener
    #[regex(r"</?[A-Za-z][A-Za-z0-9-]*")]
    HtmlTag,
}

/// Returns the first marker of `body` and its byte length.
pub fn leading_marker(body: &str) -> Option<(LineMarker, usize)> {
    let mut lexer = LineMarker::lexer(body);
    match lexer.next() {
        Some(Ok(marker)) if lexer.span().start == 0 => Some((marker, lexer.span().end)),
        _ => None,
    }
}
