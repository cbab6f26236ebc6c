use serde::Serialize;

/// A byte range `[start, end)` into the source text.
///
/// Tokens store spans alongside their copied text so diagnostics can point
/// back at the exact source bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// Inclusive range of 0-based source line numbers a token was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LineRange {
    pub first: usize,
    pub last: usize,
}

impl LineRange {
    pub fn single(line: usize) -> Self {
        Self {
            first: line,
            last: line,
        }
    }

    /// Number of source lines covered.
    pub fn count(self) -> usize {
        self.last.saturating_sub(self.first) + 1
    }

    /// True when `next` starts on the line directly after this range ends.
    pub fn is_followed_by(self, next: LineRange) -> bool {
        next.first == self.last + 1
    }
}
