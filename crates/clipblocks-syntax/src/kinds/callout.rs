use std::sync::OnceLock;

use regex::Regex;

use super::html::strip_tags;

/// Icon used when a callout names no icon of its own.
pub const DEFAULT_ICON: &str = "💡";

/// A callout recognised on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutLine {
    pub icon: Option<String>,
    pub color: Option<String>,
    pub text: String,
}

pub struct Callout;

impl Callout {
    /// Icon and background color for a native `[!kind]` marker.
    pub fn native_style(kind: &str) -> (&'static str, Option<&'static str>) {
        match kind.to_ascii_lowercase().as_str() {
            "note" => ("💡", Some("blue_background")),
            "info" => ("ℹ️", Some("blue_background")),
            "tip" | "hint" => ("💡", Some("green_background")),
            "important" => ("❗", Some("purple_background")),
            "warning" => ("⚠️", Some("yellow_background")),
            "caution" => ("⚠️", Some("orange_background")),
            "danger" | "error" => ("🚨", Some("red_background")),
            _ => (DEFAULT_ICON, None),
        }
    }

    /// Parses the body of a native callout line, `[!kind] text`.
    pub fn parse_native(body: &str) -> Option<CalloutLine> {
        let rest = body.trim_start().strip_prefix("[!")?;
        let close = rest.find(']')?;
        let kind = &rest[..close];
        if kind.is_empty() || !kind.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let text = rest[close + 1..].trim_start_matches(['+', '-']).trim();
        let (icon, color) = Self::native_style(kind);
        Some(CalloutLine {
            icon: Some(icon.to_string()),
            color: color.map(str::to_string),
            text: text.to_string(),
        })
    }

    /// Parses a single-line `<aside ...>...</aside>` callout.
    ///
    /// Reads `data-icon`/`data-color` attributes, falls back to a leading
    /// emoji for the icon, strips inner tags and decodes HTML entities.
    pub fn parse_html(body: &str) -> Option<CalloutLine> {
        static ASIDE: OnceLock<Regex> = OnceLock::new();
        static ATTR: OnceLock<Regex> = OnceLock::new();
        let aside = ASIDE.get_or_init(|| {
            Regex::new(r"(?is)^\s*<aside\b([^>]*)>(.*)</aside>\s*$").expect("Invalid aside regex")
        });
        let attr = ATTR.get_or_init(|| {
            Regex::new(r#"(?i)data-(color|icon)\s*=\s*"([^"]*)""#).expect("Invalid attr regex")
        });

        let caps = aside.captures(body)?;
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        let inner = caps.get(2).map_or("", |m| m.as_str());

        let mut icon: Option<String> = None;
        let mut color = None;
        for a in attr.captures_iter(attrs) {
            let value = a[2].trim().to_string();
            if value.is_empty() {
                continue;
            }
            if a[1].eq_ignore_ascii_case("icon") {
                icon = Some(value);
            } else {
                color = Some(value);
            }
        }

        let collapsed = strip_tags(inner);
        let (icon, text) = match icon {
            Some(icon) => (Some(icon), collapsed.as_str()),
            None => split_leading_emoji(&collapsed),
        };

        Some(CalloutLine {
            icon,
            color,
            text: text.trim().to_string(),
        })
    }
}

/// Splits a leading emoji (with any variation selector / joiner sequence)
/// off the front of `s`.
pub fn split_leading_emoji(s: &str) -> (Option<String>, &str) {
    let Some(first) = s.chars().next() else {
        return (None, s);
    };
    if !is_pictographic(first) {
        return (None, s);
    }
    let mut end = 0;
    let mut expect_joined = true;
    for (i, c) in s.char_indices() {
        let joiner = c == '\u{200D}' || c == '\u{FE0F}' || ('\u{1F3FB}'..='\u{1F3FF}').contains(&c);
        if joiner {
            end = i + c.len_utf8();
            expect_joined = c == '\u{200D}';
            continue;
        }
        if expect_joined && is_pictographic(c) {
            end = i + c.len_utf8();
            expect_joined = false;
            continue;
        }
        break;
    }
    (Some(s[..end].to_string()), &s[end..])
}

fn is_pictographic(c: char) -> bool {
    matches!(c as u32,
        0x2139 | 0x2190..=0x21FF | 0x2300..=0x23FF | 0x2460..=0x27BF
        | 0x2900..=0x297F | 0x2B00..=0x2BFF | 0x3030 | 0x303D | 0x3297 | 0x3299
        | 0x1F000..=0x1FAFF)
}
