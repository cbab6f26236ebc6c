use serde::Serialize;

use crate::span::{LineRange, Span};

/// Which marker introduced a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Bulleted,
    Numbered,
    Todo,
}

impl ListType {
    /// Parses a loose list-type tag such as `"todo"` or `"numbered"`.
    ///
    /// Anything unrecognised is treated as a bulleted list.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "todo" | "to_do" | "checklist" | "check" | "task" => ListType::Todo,
            "numbered" | "ordered" | "number" => ListType::Numbered,
            _ => ListType::Bulleted,
        }
    }
}

/// Cell delimiter style of a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// Markdown `| a | b |`
    Pipe,
    Csv,
    Tsv,
}

/// Media category sniffed from a URL extension or markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    File,
}

/// Token kinds with their per-kind metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenKind {
    /// `#`..`###` heading; deeper headings clamp to level 3.
    Heading { level: u8 },
    /// Bulleted, numbered or todo list item.
    ListItem {
        list_type: ListType,
        indent: usize,
        checked: bool,
    },
    /// A plain line of text.
    Text,
    /// Fenced code block spanning several lines.
    CodeBlock {
        language: Option<String>,
        content: String,
        closed: bool,
    },
    /// `$$ ... $$` equation, single or multi line.
    EquationBlock { expression: String },
    /// Native `[!kind]` or `<aside>` callout.
    Callout {
        icon: Option<String>,
        color: Option<String>,
        html: bool,
    },
    TableRow {
        delimiter: Delimiter,
        cells: Vec<String>,
    },
    /// Markdown image or a bare URL sniffed by extension.
    Media {
        media: MediaKind,
        url: String,
        alt: Option<String>,
    },
    /// A bare URL that is not a recognised media file.
    Bookmark { url: String },
    Divider,
    /// An HTML line the lexer could not interpret.
    Html,
    /// A quote-prefixed line with no content (`>` alone).
    Blank,
    /// End of input. Always the final token.
    Eof,
}

impl TokenKind {
    /// Short stable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Heading { .. } => "heading",
            TokenKind::ListItem { .. } => "list_item",
            TokenKind::Text => "text",
            TokenKind::CodeBlock { .. } => "code_block",
            TokenKind::EquationBlock { .. } => "equation_block",
            TokenKind::Callout { .. } => "callout",
            TokenKind::TableRow { .. } => "table_row",
            TokenKind::Media { .. } => "media",
            TokenKind::Bookmark { .. } => "bookmark",
            TokenKind::Divider => "divider",
            TokenKind::Html => "html",
            TokenKind::Blank => "blank",
            TokenKind::Eof => "eof",
        }
    }
}

/// A lexed token.
///
/// `raw` holds the source line(s) exactly as written (minus the final line
/// ending); `text` holds the visible content with quote prefixes and block
/// markers stripped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub raw: String,
    pub text: String,
    pub span: Span,
    pub lines: LineRange,
    /// Number of `>` prefixes the line carried. Non-zero marks the token as
    /// part of a quote or toggle run.
    pub quote_depth: u8,
}

impl Token {
    pub fn is_quoted(&self) -> bool {
        self.quote_depth > 0
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// The ordered output of the lexer, always terminated by [`TokenKind::Eof`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Builds a stream from tokens, appending the end marker.
    pub fn new(mut tokens: Vec<Token>, source_len: usize) -> Self {
        tokens.retain(|t| !t.is_eof());
        let last_line = tokens.last().map(|t| t.lines.last + 1).unwrap_or(0);
        tokens.push(Token {
            kind: TokenKind::Eof,
            raw: String::new(),
            text: String::new(),
            span: Span::new(source_len, source_len),
            lines: LineRange::single(last_line),
            quote_depth: 0,
        });
        Self { tokens }
    }

    /// All tokens including the end marker.
    pub fn all(&self) -> &[Token] {
        &self.tokens
    }

    /// Content tokens, without the end marker.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens[..self.tokens.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens().iter()
    }

    /// Number of content tokens.
    pub fn len(&self) -> usize {
        self.tokens.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
