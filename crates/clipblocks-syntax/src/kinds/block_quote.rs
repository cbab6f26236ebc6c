/// Quote prefix handling.
///
/// All knowledge of the `>` marker lives here so the lexer never has to
/// special-case nested forms.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: u8 = b'>';

    /// Strips quote prefixes from the start of a line, returning
    /// `(depth, byte_offset)`.
    ///
    /// Handles `> text`, `>> nested` and `> > spaced nested`. Leading
    /// whitespace is only consumed when a `>` follows it, so the indentation
    /// of the content after the prefixes is preserved. A `>` that is not at
    /// the start of the line (after optional whitespace) is never touched.
    pub fn strip_prefixes(s: &str) -> (u8, usize) {
        let b = s.as_bytes();
        let mut i = 0usize;
        let mut depth = 0u8;

        loop {
            let mut j = i;
            while j < b.len() && (b[j] == b' ' || b[j] == b'\t') {
                j += 1;
            }
            if j < b.len() && b[j] == Self::PREFIX {
                depth = depth.saturating_add(1);
                i = j + 1;
                if i < b.len() && b[i] == b' ' {
                    i += 1;
                }
            } else {
                break;
            }
        }
        (depth, i)
    }

    /// Returns the line with every leading quote prefix removed.
    pub fn strip(s: &str) -> &str {
        let (_, idx) = Self::strip_prefixes(s);
        &s[idx..]
    }
}
