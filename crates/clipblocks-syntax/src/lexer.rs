//! # Lexer - Tokenizing Clipped Text
//!
//! The lexer turns raw text into a [`TokenStream`] in a single left-to-right
//! pass over lines. Each line is handled in three steps:
//!
//! 1. Quote prefixes (`>`, `>>`, `> >`) are stripped and counted. A non-zero
//!    count is the token's toggle flag.
//! 2. The indentation of the remaining body is measured (tab = 4 columns,
//!    2 columns per level).
//! 3. The leading [`LineMarker`] is lexed with Logos and decides the token
//!    kind; lines without a marker are sniffed for bare URLs and delimited
//!    table rows before falling back to plain text.
//!
//! Fenced code and `$$` equations are the only multi-line constructs: the
//! lexer switches into a raw mode until the matching closer and emits a
//! single token for the whole fence.
//!
//! ```
//! use clipblocks_syntax::{tokenize, TokenKind};
//!
//! let stream = tokenize("# Hello\n- item");
//! assert_eq!(stream.len(), 2);
//! assert!(matches!(stream.tokens()[0].kind, TokenKind::Heading { level: 1 }));
//! ```
//!
//! Unquoted blank lines produce no token; adjacency is recovered from each
//! token's [`LineRange`]. Empty or whitespace-only input yields a stream that
//! holds only the end marker.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::kinds::{BlockQuote, Callout, CodeFence, FenceKind, TableRow, media};
use crate::marker::{LineMarker, leading_marker};
use crate::span::{LineRange, Span};
use crate::token::{Delimiter, ListType, MediaKind, Token, TokenKind, TokenStream};

/// Columns a tab counts for when measuring indentation.
const TAB_WIDTH: usize = 4;
/// Columns per list nesting level.
const INDENT_WIDTH: usize = 2;

/// Feature flags for the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerOptions {
    /// Recognise `$$` equation fences.
    pub equations: bool,
    /// Recognise native `[!kind]` callouts.
    pub callouts: bool,
    /// Recognise single-line `<aside>` callouts.
    pub html_callouts: bool,
    /// Recognise markdown pipe tables.
    pub tables: bool,
    pub tsv_tables: bool,
    /// Off by default: comma separated lines are easily confused with prose.
    pub csv_tables: bool,
    /// Classify bare URL lines as media or bookmarks.
    pub media_sniffing: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            equations: true,
            callouts: true,
            html_callouts: true,
            tables: true,
            tsv_tables: true,
            csv_tables: false,
            media_sniffing: true,
        }
    }
}

/// Tokenizes `text` with default options.
pub fn tokenize(text: &str) -> TokenStream {
    Lexer::default().tokenize(text)
}

/// A configured lexer. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct Lexer {
    options: LexerOptions,
}

/// A physical line with its position.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    index: usize,
    /// Span including the line ending.
    span: Span,
    /// Text without the line ending.
    text: &'a str,
}

/// Multi-line construct currently being collected.
#[derive(Debug)]
enum RawZone<'a> {
    Fence {
        kind: FenceKind,
        language: Option<String>,
        opener: Line<'a>,
        quote_depth: u8,
        body: Vec<&'a str>,
    },
    Equation {
        opener: Line<'a>,
        quote_depth: u8,
        body: Vec<&'a str>,
    },
}

impl Lexer {
    pub fn new(options: LexerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    pub fn tokenize(&self, text: &str) -> TokenStream {
        let mut tokens = Vec::new();
        let mut zone: Option<RawZone<'_>> = None;
        let mut last: Option<Line<'_>> = None;

        for line in lines(text) {
            last = Some(line);
            zone = match zone.take() {
                Some(open) => self.continue_zone(open, line, text, &mut tokens),
                None => self.lex_line(line, &mut tokens),
            };
        }

        if let (Some(open), Some(last)) = (zone, last) {
            tokens.push(close_zone(open, last, text, false));
        }

        TokenStream::new(tokens, text.len())
    }

    /// Lexes one line outside any raw zone. Returns a zone when the line
    /// opens a fence.
    fn lex_line<'a>(&self, line: Line<'a>, tokens: &mut Vec<Token>) -> Option<RawZone<'a>> {
        let (quote_depth, idx) = BlockQuote::strip_prefixes(line.text);
        let rest = &line.text[idx..];

        if rest.trim().is_empty() {
            if quote_depth > 0 {
                tokens.push(make_token(TokenKind::Blank, line, String::new(), quote_depth));
            }
            return None;
        }

        let indent = indent_level(rest);
        let body = rest.trim_start();

        if self.options.equations && body.starts_with("$$") {
            let t = body.trim_end();
            if t.len() > 4 && t.ends_with("$$") {
                let expression = t[2..t.len() - 2].trim().to_string();
                tokens.push(make_token(
                    TokenKind::EquationBlock {
                        expression: expression.clone(),
                    },
                    line,
                    expression,
                    quote_depth,
                ));
                return None;
            }
            let mut body_lines = Vec::new();
            let after = t[2..].trim();
            if !after.is_empty() {
                body_lines.push(after);
            }
            return Some(RawZone::Equation {
                opener: line,
                quote_depth,
                body: body_lines,
            });
        }

        if let Some((kind, language)) = CodeFence::open(body) {
            return Some(RawZone::Fence {
                kind,
                language,
                opener: line,
                quote_depth,
                body: Vec::new(),
            });
        }

        if is_divider(body) {
            tokens.push(make_token(TokenKind::Divider, line, String::new(), quote_depth));
            return None;
        }

        let (kind, visible) = self.classify_body(body, indent);
        tokens.push(make_token(kind, line, visible, quote_depth));
        None
    }

    /// Decides the kind and visible text of a single-line body.
    fn classify_body(&self, body: &str, indent: usize) -> (TokenKind, String) {
        let body = body.trim_end();
        if let Some((marker, len)) = leading_marker(body) {
            let after = body[len..].trim();
            match marker {
                LineMarker::Heading => {
                    let hashes = body.bytes().take_while(|b| *b == b'#').count();
                    let level = hashes.min(3) as u8;
                    return (TokenKind::Heading { level }, strip_closing_hashes(after));
                }
                LineMarker::Todo => {
                    let checked = body[..len].contains(['x', 'X']);
                    return (
                        TokenKind::ListItem {
                            list_type: ListType::Todo,
                            indent,
                            checked,
                        },
                        after.to_string(),
                    );
                }
                LineMarker::Bullet | LineMarker::Numbered => {
                    let list_type = if marker == LineMarker::Numbered {
                        ListType::Numbered
                    } else {
                        ListType::Bulleted
                    };
                    return (
                        TokenKind::ListItem {
                            list_type,
                            indent,
                            checked: false,
                        },
                        after.to_string(),
                    );
                }
                LineMarker::Pipe if self.options.tables => {
                    let cells = TableRow::split_pipe(body);
                    return (
                        TokenKind::TableRow {
                            delimiter: Delimiter::Pipe,
                            cells,
                        },
                        body.to_string(),
                    );
                }
                LineMarker::Callout if self.options.callouts => {
                    if let Some(c) = Callout::parse_native(body) {
                        return (
                            TokenKind::Callout {
                                icon: c.icon,
                                color: c.color,
                                html: false,
                            },
                            c.text,
                        );
                    }
                }
                LineMarker::Aside if self.options.html_callouts => {
                    if let Some(c) = Callout::parse_html(body) {
                        return (
                            TokenKind::Callout {
                                icon: c.icon,
                                color: c.color,
                                html: true,
                            },
                            c.text,
                        );
                    }
                    return (TokenKind::Html, body.to_string());
                }
                LineMarker::Aside => return (TokenKind::Html, body.to_string()),
                LineMarker::HtmlTag if !is_autolink(body) => {
                    return (TokenKind::Html, body.to_string());
                }
                LineMarker::Image => {
                    if let Some((alt, url)) = parse_image(body) {
                        let media = media::sniff(&url)
                            .filter(|k| *k == MediaKind::Video || *k == MediaKind::Audio)
                            .unwrap_or(MediaKind::Image);
                        return (
                            TokenKind::Media {
                                media,
                                url,
                                alt: alt.clone(),
                            },
                            alt.unwrap_or_default(),
                        );
                    }
                }
                LineMarker::Pipe | LineMarker::Callout | LineMarker::HtmlTag => {}
            }
        }

        if self.options.media_sniffing && !body.contains(char::is_whitespace) {
            let url = body.trim_start_matches('<').trim_end_matches('>');
            if media::is_http_url(url) {
                let kind = match media::sniff(url) {
                    Some(media) => TokenKind::Media {
                        media,
                        url: url.to_string(),
                        alt: None,
                    },
                    None => TokenKind::Bookmark {
                        url: url.to_string(),
                    },
                };
                return (kind, url.to_string());
            }
        }

        if self.options.tsv_tables
            && let Some(cells) = TableRow::split_tsv(body)
        {
            return (
                TokenKind::TableRow {
                    delimiter: Delimiter::Tsv,
                    cells,
                },
                body.to_string(),
            );
        }

        if self.options.csv_tables
            && let Some(cells) = TableRow::split_csv(body)
        {
            return (
                TokenKind::TableRow {
                    delimiter: Delimiter::Csv,
                    cells,
                },
                body.to_string(),
            );
        }

        (TokenKind::Text, body.to_string())
    }

    /// Feeds one line into an open raw zone.
    fn continue_zone<'a>(
        &self,
        zone: RawZone<'a>,
        line: Line<'a>,
        text: &str,
        tokens: &mut Vec<Token>,
    ) -> Option<RawZone<'a>> {
        match zone {
            RawZone::Fence {
                kind,
                language,
                opener,
                quote_depth,
                mut body,
            } => {
                let content = strip_zone_prefix(line.text, quote_depth);
                if CodeFence::closes(kind, content) {
                    let zone = RawZone::Fence {
                        kind,
                        language,
                        opener,
                        quote_depth,
                        body,
                    };
                    tokens.push(close_zone(zone, line, text, true));
                    return None;
                }
                body.push(content);
                Some(RawZone::Fence {
                    kind,
                    language,
                    opener,
                    quote_depth,
                    body,
                })
            }
            RawZone::Equation {
                opener,
                quote_depth,
                mut body,
            } => {
                let content = strip_zone_prefix(line.text, quote_depth).trim();
                if let Some(before) = content.strip_suffix("$$") {
                    let before = before.trim();
                    if !before.is_empty() {
                        body.push(before);
                    }
                    let zone = RawZone::Equation {
                        opener,
                        quote_depth,
                        body,
                    };
                    tokens.push(close_zone(zone, line, text, true));
                    return None;
                }
                body.push(content);
                Some(RawZone::Equation {
                    opener,
                    quote_depth,
                    body,
                })
            }
        }
    }
}

/// Emits the token for a finished (or unterminated) raw zone.
fn close_zone(zone: RawZone<'_>, last: Line<'_>, text: &str, closed: bool) -> Token {
    match zone {
        RawZone::Fence {
            language,
            opener,
            quote_depth,
            body,
            ..
        } => {
            let content = body.join("\n");
            zone_token(
                TokenKind::CodeBlock {
                    language,
                    content: content.clone(),
                    closed,
                },
                opener,
                last,
                text,
                content,
                quote_depth,
            )
        }
        RawZone::Equation {
            opener,
            quote_depth,
            body,
        } => {
            let expression = body.join("\n");
            zone_token(
                TokenKind::EquationBlock {
                    expression: expression.clone(),
                },
                opener,
                last,
                text,
                expression,
                quote_depth,
            )
        }
    }
}

fn zone_token(
    kind: TokenKind,
    opener: Line<'_>,
    last: Line<'_>,
    text: &str,
    visible: String,
    quote_depth: u8,
) -> Token {
    let end = opener.span.start + trim_line_ending(&text[opener.span.start..last.span.end]).len();
    Token {
        kind,
        raw: text[opener.span.start..end].to_string(),
        text: visible,
        span: Span::new(opener.span.start, end),
        lines: LineRange {
            first: opener.index,
            last: last.index,
        },
        quote_depth,
    }
}

fn make_token(kind: TokenKind, line: Line<'_>, visible: String, quote_depth: u8) -> Token {
    Token {
        kind,
        raw: line.text.to_string(),
        text: visible,
        span: Span::new(line.span.start, line.span.start + line.text.len()),
        lines: LineRange::single(line.index),
        quote_depth,
    }
}

/// Lines of a fence opened on a quoted line lose the same prefixes.
fn strip_zone_prefix(line: &str, quote_depth: u8) -> &str {
    if quote_depth == 0 {
        line
    } else {
        BlockQuote::strip(line)
    }
}

fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0usize;
    text.split_inclusive('\n').enumerate().map(move |(index, raw)| {
        let start = offset;
        offset += raw.len();
        Line {
            index,
            span: Span::new(start, offset),
            text: trim_line_ending(raw),
        }
    })
}

fn trim_line_ending(s: &str) -> &str {
    s.trim_end_matches(['\r', '\n'])
}

/// Indentation level of a line body: leading columns / 2, tabs count as 4.
pub fn indent_level(s: &str) -> usize {
    let mut columns = 0;
    for c in s.chars() {
        match c {
            ' ' => columns += 1,
            '\t' => columns += TAB_WIDTH,
            _ => break,
        }
    }
    columns / INDENT_WIDTH
}

/// `<https://...>` on its own.
fn is_autolink(body: &str) -> bool {
    body.strip_prefix('<')
        .and_then(|b| b.strip_suffix('>'))
        .is_some_and(|inner| media::is_http_url(inner) && !inner.contains(char::is_whitespace))
}

/// `---`, `***` or `___` (three or more, spaces allowed between).
pub fn is_divider(body: &str) -> bool {
    let compact: Vec<char> = body.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && matches!(compact[0], '-' | '*' | '_')
        && compact.iter().all(|c| *c == compact[0])
}

fn strip_closing_hashes(s: &str) -> String {
    let trimmed = s.trim_end_matches('#');
    if trimmed.len() == s.len() || trimmed.is_empty() || trimmed.ends_with([' ', '\t']) {
        trimmed.trim().to_string()
    } else {
        s.trim().to_string()
    }
}

/// Parses a whole-line markdown image `![alt](url "title")`.
fn parse_image(body: &str) -> Option<(Option<String>, String)> {
    static IMAGE: OnceLock<Regex> = OnceLock::new();
    let image = IMAGE.get_or_init(|| {
        Regex::new(r#"^!\[([^\]]*)\]\(\s*<?([^)\s>]+)>?(?:\s+"[^"]*")?\s*\)$"#)
            .expect("Invalid image regex")
    });
    let caps = image.captures(body)?;
    let alt = caps
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());
    Some((alt, caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).iter().map(|t| t.kind.clone()).collect()
    }

    #[test]
    fn empty_input_yields_only_eof() {
        let stream = tokenize("");
        assert!(stream.is_empty());
        assert!(stream.all()[0].is_eof());
    }

    #[test]
    fn whitespace_only_input_yields_only_eof() {
        let stream = tokenize("  \n\t\n   ");
        assert!(stream.is_empty());
        assert_eq!(stream.all().len(), 1);
    }

    #[test]
    fn heading_levels_clamp_to_three() {
        assert_eq!(
            kinds("# a\n## b\n### c\n#### d"),
            vec![
                TokenKind::Heading { level: 1 },
                TokenKind::Heading { level: 2 },
                TokenKind::Heading { level: 3 },
                TokenKind::Heading { level: 3 },
            ]
        );
    }

    #[test]
    fn heading_text_strips_marker_and_closing_hashes() {
        let stream = tokenize("## Title ##");
        assert_eq!(stream.tokens()[0].text, "Title");
    }

    #[rstest]
    #[case("- a", ListType::Bulleted, 0, false)]
    #[case("  * a", ListType::Bulleted, 1, false)]
    #[case("\t1. a", ListType::Numbered, 2, false)]
    #[case("    - [x] a", ListType::Todo, 2, true)]
    #[case("- [ ] a", ListType::Todo, 0, false)]
    fn list_items(
        #[case] line: &str,
        #[case] list_type: ListType,
        #[case] indent: usize,
        #[case] checked: bool,
    ) {
        let stream = tokenize(line);
        assert_eq!(
            stream.tokens()[0].kind,
            TokenKind::ListItem {
                list_type,
                indent,
                checked
            }
        );
        assert_eq!(stream.tokens()[0].text, "a");
    }

    #[test]
    fn quote_prefix_sets_toggle_flag_and_strips_markers() {
        let stream = tokenize("> # Heading\n>> nested\n> > spaced");
        let t = stream.tokens();
        assert_eq!(t[0].kind, TokenKind::Heading { level: 1 });
        assert_eq!(t[0].quote_depth, 1);
        assert_eq!(t[0].text, "Heading");
        assert_eq!(t[1].text, "nested");
        assert_eq!(t[1].quote_depth, 2);
        assert_eq!(t[2].text, "spaced");
        assert_eq!(t[2].quote_depth, 2);
    }

    #[test]
    fn quoted_blank_line_is_a_token() {
        assert_eq!(
            kinds("> a\n>\n> b"),
            vec![TokenKind::Text, TokenKind::Blank, TokenKind::Text]
        );
    }

    #[test]
    fn unquoted_blank_lines_produce_no_tokens() {
        let stream = tokenize("a\n\nb");
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.tokens()[1].lines, LineRange::single(2));
    }

    #[test]
    fn fenced_code_block() {
        let stream = tokenize("```ts\nlet a = 1;\n\nlet b = 2;\n```\nafter");
        let t = stream.tokens();
        assert_eq!(
            t[0].kind,
            TokenKind::CodeBlock {
                language: Some("ts".to_string()),
                content: "let a = 1;\n\nlet b = 2;".to_string(),
                closed: true,
            }
        );
        assert_eq!(t[0].lines, LineRange { first: 0, last: 4 });
        assert_eq!(t[0].raw, "```ts\nlet a = 1;\n\nlet b = 2;\n```");
        assert_eq!(t[1].kind, TokenKind::Text);
    }

    #[test]
    fn unterminated_fence_runs_to_eof() {
        let stream = tokenize("~~~\ncode\nmore");
        assert_eq!(
            stream.tokens()[0].kind,
            TokenKind::CodeBlock {
                language: None,
                content: "code\nmore".to_string(),
                closed: false,
            }
        );
    }

    #[test]
    fn quoted_fence_strips_prefixes_inside() {
        let stream = tokenize("> ```\n> x > y\n> ```");
        let t = &stream.tokens()[0];
        assert_eq!(t.quote_depth, 1);
        assert!(matches!(&t.kind, TokenKind::CodeBlock { content, .. } if content == "x > y"));
    }

    #[test]
    fn markdown_inside_fence_is_raw() {
        assert_eq!(kinds("```\n# not a heading\n```").len(), 1);
    }

    #[test]
    fn equation_forms() {
        let stream = tokenize("$$ E = mc^2 $$\n$$\na^2 + b^2\n= c^2\n$$");
        let t = stream.tokens();
        assert_eq!(
            t[0].kind,
            TokenKind::EquationBlock {
                expression: "E = mc^2".to_string()
            }
        );
        assert_eq!(
            t[1].kind,
            TokenKind::EquationBlock {
                expression: "a^2 + b^2\n= c^2".to_string()
            }
        );
    }

    #[test]
    fn equations_disabled_fall_back_to_text() {
        let lexer = Lexer::new(LexerOptions {
            equations: false,
            ..LexerOptions::default()
        });
        let stream = lexer.tokenize("$$ x $$");
        assert_eq!(stream.tokens()[0].kind, TokenKind::Text);
    }

    #[rstest]
    #[case("---")]
    #[case("***")]
    #[case("___")]
    #[case("- - -")]
    fn dividers(#[case] line: &str) {
        assert_eq!(kinds(line), vec![TokenKind::Divider]);
    }

    #[test]
    fn native_and_html_callouts() {
        let stream = tokenize("[!tip] Try it\n<aside>💡 Note this</aside>");
        let t = stream.tokens();
        assert_eq!(
            t[0].kind,
            TokenKind::Callout {
                icon: Some("💡".to_string()),
                color: Some("green_background".to_string()),
                html: false,
            }
        );
        assert_eq!(t[0].text, "Try it");
        assert_eq!(
            t[1].kind,
            TokenKind::Callout {
                icon: Some("💡".to_string()),
                color: None,
                html: true,
            }
        );
        assert_eq!(t[1].text, "Note this");
    }

    #[test]
    fn unclosed_aside_is_html() {
        assert_eq!(kinds("<aside>"), vec![TokenKind::Html]);
        assert_eq!(kinds("<div class=\"x\">"), vec![TokenKind::Html]);
    }

    #[test]
    fn table_rows() {
        let stream = tokenize("| a | b |\n|---|---|\nx\ty");
        let t = stream.tokens();
        assert_eq!(
            t[0].kind,
            TokenKind::TableRow {
                delimiter: Delimiter::Pipe,
                cells: vec!["a".into(), "b".into()],
            }
        );
        assert_eq!(
            t[2].kind,
            TokenKind::TableRow {
                delimiter: Delimiter::Tsv,
                cells: vec!["x".into(), "y".into()],
            }
        );
    }

    #[test]
    fn csv_rows_need_the_flag() {
        assert_eq!(kinds("a,b,c"), vec![TokenKind::Text]);
        let lexer = Lexer::new(LexerOptions {
            csv_tables: true,
            ..LexerOptions::default()
        });
        assert!(matches!(
            lexer.tokenize("a,b,c").tokens()[0].kind,
            TokenKind::TableRow {
                delimiter: Delimiter::Csv,
                ..
            }
        ));
    }

    #[rstest]
    #[case("https://cdn.site/pic.jpg", MediaKind::Image)]
    #[case("https://cdn.site/clip.webm", MediaKind::Video)]
    #[case("https://cdn.site/song.mp3?x=1", MediaKind::Audio)]
    #[case("https://cdn.site/doc.pdf", MediaKind::File)]
    fn bare_media_urls(#[case] line: &str, #[case] media: MediaKind) {
        assert_eq!(
            kinds(line),
            vec![TokenKind::Media {
                media,
                url: line.to_string(),
                alt: None
            }]
        );
    }

    #[test]
    fn bare_page_url_is_bookmark() {
        assert_eq!(
            kinds("<https://rust-lang.org>"),
            vec![TokenKind::Bookmark {
                url: "https://rust-lang.org".to_string()
            }]
        );
    }

    #[test]
    fn markdown_image() {
        assert_eq!(
            kinds("![A cat](https://x.io/cat.png \"title\")"),
            vec![TokenKind::Media {
                media: MediaKind::Image,
                url: "https://x.io/cat.png".to_string(),
                alt: Some("A cat".to_string()),
            }]
        );
    }

    #[test]
    fn url_inside_sentence_stays_text() {
        assert_eq!(kinds("see https://x.io/a.png here"), vec![TokenKind::Text]);
    }

    #[test]
    fn offsets_point_at_source() {
        let input = "# A\r\n\r\n- b\n";
        let stream = tokenize(input);
        for t in stream.iter() {
            assert_eq!(&input[t.span.start..t.span.end], t.raw);
        }
        let eof = stream.all().last().unwrap();
        assert_eq!(eof.span, Span::new(input.len(), input.len()));
    }

    #[test]
    fn mid_line_quote_marker_is_text() {
        let stream = tokenize("a > b");
        assert_eq!(stream.tokens()[0].quote_depth, 0);
        assert_eq!(stream.tokens()[0].text, "a > b");
    }
}
