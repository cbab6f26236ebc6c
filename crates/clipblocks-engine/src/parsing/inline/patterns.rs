//! Inline patterns and their priority order.
//!
//! Every emphasis pattern requires a non-whitespace character directly
//! inside each delimiter, so `** text**` never matches.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Candidate inline constructs. Declaration order is the tie-break priority
/// when two patterns match at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Pattern {
    Equation,
    Link,
    Autolink,
    BoldItalic,
    Bold,
    Italic,
    Code,
    Strike,
    Underline,
}

impl Pattern {
    pub const ALL: [Pattern; 9] = [
        Pattern::Equation,
        Pattern::Link,
        Pattern::Autolink,
        Pattern::BoldItalic,
        Pattern::Bold,
        Pattern::Italic,
        Pattern::Code,
        Pattern::Strike,
        Pattern::Underline,
    ];

    pub fn regex(self) -> &'static Regex {
        static EQUATION: OnceLock<Regex> = OnceLock::new();
        static LINK: OnceLock<Regex> = OnceLock::new();
        static AUTOLINK: OnceLock<Regex> = OnceLock::new();
        static BOLD_ITALIC: OnceLock<Regex> = OnceLock::new();
        static BOLD: OnceLock<Regex> = OnceLock::new();
        static ITALIC: OnceLock<Regex> = OnceLock::new();
        static CODE: OnceLock<Regex> = OnceLock::new();
        static STRIKE: OnceLock<Regex> = OnceLock::new();
        static UNDERLINE: OnceLock<Regex> = OnceLock::new();

        let (cell, pattern) = match self {
            Pattern::Equation => (&EQUATION, r"\$([^\s$](?:[^$]*[^\s$])?)\$"),
            Pattern::Link => (
                &LINK,
                r#"\[([^\[\]]+)\]\(\s*<?([^()\s<>]+)>?(?:\s+"[^"]*")?\s*\)"#,
            ),
            Pattern::Autolink => (
                &AUTOLINK,
                r"<([A-Za-z][A-Za-z0-9+.-]*:[^<>\s]+)>|(https?://[^\s<>\[\]()]+)",
            ),
            Pattern::BoldItalic => (
                &BOLD_ITALIC,
                r"\*\*\*([^\s*](?:[^*]*?[^\s*])?)\*\*\*|___([^\s_](?:[^_]*?[^\s_])?)___",
            ),
            Pattern::Bold => (&BOLD, r"\*\*(\S(?:.*?\S)?)\*\*|__(\S(?:.*?\S)?)__"),
            Pattern::Italic => (
                &ITALIC,
                r"\*([^\s*](?:[^*]*?[^\s*])?)\*|\b_([^\s_](?:[^_]*?[^\s_])?)_\b",
            ),
            Pattern::Code => (&CODE, r"`([^`]+)`"),
            Pattern::Strike => (&STRIKE, r"~~([^\s~](?:[^~]*?[^\s~])?)~~"),
            Pattern::Underline => (&UNDERLINE, r"<u>(.+?)</u>"),
        };
        cell.get_or_init(|| Regex::new(pattern).expect("Invalid inline regex"))
    }
}

/// A pattern match located in the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found<'t> {
    pub pattern: Pattern,
    pub start: usize,
    pub end: usize,
    /// Captured inner content (label for links).
    pub inner: &'t str,
    /// Link target, for links and autolinks.
    pub url: Option<&'t str>,
}

/// Finds the first match of `pattern` at or after `pos`.
pub fn find_at(pattern: Pattern, text: &str, pos: usize) -> Option<Found<'_>> {
    let caps = pattern.regex().captures_at(text, pos)?;
    let whole = caps.get(0)?;
    let first = first_group(&caps)?;
    let mut found = Found {
        pattern,
        start: whole.start(),
        end: whole.end(),
        inner: first,
        url: None,
    };
    match pattern {
        Pattern::Link => {
            found.url = caps.get(2).map(|m| m.as_str());
        }
        Pattern::Autolink => {
            if caps.get(1).is_some() {
                found.url = Some(first);
            } else {
                let trimmed = trim_trailing_punctuation(first);
                found.end = found.start + trimmed.len();
                found.inner = trimmed;
                found.url = Some(trimmed);
            }
        }
        _ => {}
    }
    Some(found)
}

fn first_group<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.iter().skip(1).flatten().next().map(|m| m.as_str())
}

/// Removes punctuation that usually ends a sentence rather than a URL.
fn trim_trailing_punctuation(url: &str) -> &str {
    url.trim_end_matches(['.', ',', ':', ';', '!', '?', ')', ']', '}', '\'', '"'])
}
