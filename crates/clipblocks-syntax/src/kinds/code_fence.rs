#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    /// Detects a fence opener, returning its kind and the trimmed info string.
    pub fn open(body: &str) -> Option<(FenceKind, Option<String>)> {
        let t = body.trim();
        let (kind, rest) = if let Some(rest) = t.strip_prefix(Self::BACKTICKS) {
            (FenceKind::Backticks, rest)
        } else if let Some(rest) = t.strip_prefix(Self::TILDES) {
            (FenceKind::Tildes, rest)
        } else {
            return None;
        };
        let fence_char = match kind {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        };
        let info = rest.trim_start_matches(fence_char).trim();
        let language = info
            .split_whitespace()
            .next()
            .map(|s| s.trim_start_matches('{').trim_end_matches('}').to_string())
            .filter(|s| !s.is_empty());
        Some((kind, language))
    }

    /// True when `body` is a bare closing fence for `kind`.
    pub fn closes(kind: FenceKind, body: &str) -> bool {
        let t = body.trim();
        let fence_char = match kind {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        };
        t.len() >= 3 && t.chars().all(|c| c == fence_char)
    }
}
