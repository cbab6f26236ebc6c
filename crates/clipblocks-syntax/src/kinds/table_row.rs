use crate::token::Delimiter;

pub struct TableRow;

impl TableRow {
    /// Splits a markdown pipe row into trimmed cells.
    ///
    /// Outer pipes are optional and `\|` stays inside a cell.
    pub fn split_pipe(body: &str) -> Vec<String> {
        let t = body.trim();
        let t = t.strip_prefix('|').unwrap_or(t);
        let t = if t.ends_with('|') && !t.ends_with("\\|") {
            &t[..t.len() - 1]
        } else {
            t
        };

        let mut cells = Vec::new();
        let mut current = String::new();
        let mut chars = t.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'|') => {
                    current.push('|');
                    chars.next();
                }
                '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
                _ => current.push(c),
            }
        }
        cells.push(current.trim().to_string());
        cells
    }

    /// Splits a tab separated row when it has at least two cells.
    pub fn split_tsv(body: &str) -> Option<Vec<String>> {
        if !body.contains('\t') {
            return None;
        }
        let cells: Vec<String> = body
            .trim_end()
            .split('\t')
            .map(|c| c.trim().to_string())
            .collect();
        (cells.len() >= 2).then_some(cells)
    }

    /// Splits a comma separated row.
    ///
    /// Requires at least three cells and no cell starting with whitespace,
    /// which keeps ordinary prose (`a, b, c`) out of tables.
    pub fn split_csv(body: &str) -> Option<Vec<String>> {
        let body = body.trim_end();
        let raw: Vec<&str> = body.split(',').collect();
        if raw.len() < 3 || raw.iter().any(|c| c.starts_with(char::is_whitespace)) {
            return None;
        }
        Some(
            raw.into_iter()
                .map(|c| c.trim().trim_matches('"').to_string())
                .collect(),
        )
    }

    /// True for a markdown header separator cell such as `---`, `:--` or `:-:`.
    pub fn is_separator_cell(cell: &str) -> bool {
        let c = cell.trim();
        let c = c.strip_prefix(':').unwrap_or(c);
        let c = c.strip_suffix(':').unwrap_or(c);
        !c.is_empty() && c.chars().all(|ch| ch == '-')
    }

    pub fn delimiter_name(delimiter: Delimiter) -> &'static str {
        match delimiter {
            Delimiter::Pipe => "markdown",
            Delimiter::Csv => "csv",
            Delimiter::Tsv => "tsv",
        }
    }
}
