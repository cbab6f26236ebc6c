use super::{
    patterns::{Found, Pattern, find_at},
    types::{Annotations, SegmentKind, StyledSegment},
};

/// Nesting depth after which inner content is taken literally.
const MAX_DEPTH: usize = 8;

/// Parses inline markup into styled segments.
///
/// # Strategy
/// At each scan position every [`Pattern`] is tried; the match starting
/// earliest wins and ties go to the higher-priority pattern
/// (equation > link > autolink > bold-italic > bold > italic > code >
/// strike > underline). Emphasis and link labels are parsed again with the
/// same matcher and their annotation sets merged, so styles nest freely.
///
/// # Returns
/// Segments covering the whole input. Text without markup comes back as a
/// single plain segment equal to the input. Empty segments are removed after
/// scanning.
pub fn parse_inline(text: &str) -> Vec<StyledSegment> {
    let mut out = Vec::new();
    scan(text, &Annotations::default(), 0, &mut out);
    out.retain(|s| !s.is_empty());
    merge_adjacent(out)
}

fn scan(text: &str, base: &Annotations, depth: usize, out: &mut Vec<StyledSegment>) {
    if depth >= MAX_DEPTH {
        out.push(StyledSegment::styled(text, base.clone()));
        return;
    }

    let mut pos = 0;
    while pos < text.len() {
        let Some(found) = earliest_match(text, pos) else {
            break;
        };
        out.push(StyledSegment::styled(&text[pos..found.start], base.clone()));
        emit(&found, base, depth, out);
        pos = found.end.max(found.start + 1);
    }
    if pos < text.len() {
        out.push(StyledSegment::styled(&text[pos..], base.clone()));
    }
}

/// Tries every pattern from `pos`, keeping the earliest start.
fn earliest_match(text: &str, pos: usize) -> Option<Found<'_>> {
    let mut best: Option<Found<'_>> = None;
    for pattern in Pattern::ALL {
        let Some(found) = find_at(pattern, text, pos) else {
            continue;
        };
        let better = match &best {
            None => true,
            Some(b) => found.start < b.start || (found.start == b.start && found.pattern < b.pattern),
        };
        if better {
            best = Some(found);
        }
    }
    best
}

fn emit(found: &Found<'_>, base: &Annotations, depth: usize, out: &mut Vec<StyledSegment>) {
    let with = |f: fn(&mut Annotations)| {
        let mut a = base.clone();
        f(&mut a);
        a
    };

    match found.pattern {
        Pattern::Equation => {
            let mut seg = StyledSegment::equation(found.inner.trim());
            seg.annotations = base.clone();
            out.push(seg);
        }
        Pattern::Code => {
            out.push(StyledSegment::styled(found.inner, with(|a| a.code = true)));
        }
        Pattern::BoldItalic => scan(
            found.inner,
            &with(|a| {
                a.bold = true;
                a.italic = true;
            }),
            depth + 1,
            out,
        ),
        Pattern::Bold => scan(found.inner, &with(|a| a.bold = true), depth + 1, out),
        Pattern::Italic => scan(found.inner, &with(|a| a.italic = true), depth + 1, out),
        Pattern::Strike => scan(found.inner, &with(|a| a.strikethrough = true), depth + 1, out),
        Pattern::Underline => scan(found.inner, &with(|a| a.underline = true), depth + 1, out),
        Pattern::Link => {
            let mut label = Vec::new();
            scan(found.inner, base, depth + 1, &mut label);
            match found.url.and_then(sanitize_url) {
                Some(url) => out.extend(label.into_iter().map(|mut seg| {
                    if seg.kind == SegmentKind::Text {
                        seg.kind = SegmentKind::Link;
                        seg.url = Some(url.clone());
                    }
                    seg
                })),
                None => out.extend(label),
            }
        }
        Pattern::Autolink => match found.url.and_then(sanitize_url) {
            Some(url) => {
                let mut seg = StyledSegment::link(found.inner, url);
                seg.annotations = base.clone();
                out.push(seg);
            }
            None => out.push(StyledSegment::styled(found.inner, base.clone())),
        },
    }
}

/// Keeps only absolute `http`/`https` URLs.
pub fn sanitize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed).ok()?;
    if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// Joins neighbouring plain-text segments that share annotations.
fn merge_adjacent(segments: Vec<StyledSegment>) -> Vec<StyledSegment> {
    let mut out: Vec<StyledSegment> = Vec::with_capacity(segments.len());
    for seg in segments {
        if let Some(last) = out.last_mut()
            && last.kind == SegmentKind::Text
            && seg.kind == SegmentKind::Text
            && last.annotations == seg.annotations
        {
            last.content.push_str(&seg.content);
            continue;
        }
        out.push(seg);
    }
    out
}

/// Concatenated visible text of a segment list.
pub fn plain_text(segments: &[StyledSegment]) -> String {
    segments.iter().map(|s| s.content.as_str()).collect()
}

/// Splits text and link runs longer than `max_chars` characters into
/// consecutive runs with the same style.
pub fn split_long_segments(segments: Vec<StyledSegment>, max_chars: usize) -> Vec<StyledSegment> {
    if max_chars == 0 {
        return segments;
    }
    let mut out = Vec::with_capacity(segments.len());
    for seg in segments {
        if seg.kind == SegmentKind::Equation || seg.content.chars().count() <= max_chars {
            out.push(seg);
            continue;
        }
        let chars: Vec<char> = seg.content.chars().collect();
        for chunk in chars.chunks(max_chars) {
            let mut part = seg.clone();
            part.content = chunk.iter().collect();
            out.push(part);
        }
    }
    out
}
