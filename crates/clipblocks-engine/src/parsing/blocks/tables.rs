//! Table assembly from consecutive table-row tokens.

use clipblocks_syntax::{Delimiter, Token, TokenKind, kinds::TableRow};

use super::types::{AbstractNode, NodeKind, TableData};

/// Text emitted in place of a table that has no columns.
pub const EMPTY_TABLE: &str = "[Empty table]";

/// Delimiter style of a run: fixed by its first row.
pub fn detect_delimiter(rows: &[&Token]) -> Option<Delimiter> {
    rows.iter().find_map(|t| match &t.kind {
        TokenKind::TableRow { delimiter, .. } => Some(*delimiter),
        _ => None,
    })
}

/// Splits the header off the raw rows.
///
/// Markdown tables have a header only when the second row is a separator
/// (`---`, `:--:`); separator rows never reach the data. Delimited tables use
/// their first row as the header when more than one row exists.
pub fn extract_header(
    delimiter: Delimiter,
    rows: Vec<Vec<String>>,
) -> (Option<Vec<String>>, Vec<Vec<String>>) {
    match delimiter {
        Delimiter::Pipe => {
            let has_header = rows.get(1).is_some_and(|r| is_separator_row(r));
            let mut rows = rows.into_iter();
            let headers = if has_header { rows.next() } else { None };
            (headers, rows.filter(|r| !is_separator_row(r)).collect())
        }
        Delimiter::Csv | Delimiter::Tsv => {
            if rows.len() > 1 {
                let mut rows = rows.into_iter();
                let headers = rows.next();
                (headers, rows.collect())
            } else {
                (None, rows)
            }
        }
    }
}

fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty() && cells.iter().all(|c| TableRow::is_separator_cell(c))
}

/// Builds a table node from a run of row tokens of the same delimiter style.
pub fn build_table(rows: &[&Token]) -> AbstractNode {
    let Some(delimiter) = detect_delimiter(rows) else {
        return AbstractNode::text(EMPTY_TABLE);
    };
    let cells: Vec<Vec<String>> = rows
        .iter()
        .filter_map(|t| match &t.kind {
            TokenKind::TableRow { cells, .. } => Some(cells.clone()),
            _ => None,
        })
        .filter(|r| r.iter().any(|c| !c.is_empty()))
        .collect();

    let (headers, rows) = extract_header(delimiter, cells);
    let table = TableData { headers, rows }.normalized();
    if table.width() == 0 {
        return AbstractNode::text(EMPTY_TABLE);
    }
    let summary = format!("{} table", TableRow::delimiter_name(delimiter));
    AbstractNode::leaf(NodeKind::Table(table), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipblocks_syntax::{Lexer, LexerOptions};
    use pretty_assertions::assert_eq;

    fn table_of(input: &str, options: LexerOptions) -> AbstractNode {
        let stream = Lexer::new(options).tokenize(input);
        let rows: Vec<&Token> = stream.iter().collect();
        build_table(&rows)
    }

    fn data(node: &AbstractNode) -> &TableData {
        match &node.kind {
            NodeKind::Table(t) => t,
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn markdown_header_and_separator() {
        let node = table_of(
            "| a | b |\n|---|:-:|\n| 1 | 2 |\n| 3 |",
            LexerOptions::default(),
        );
        let table = data(&node);
        assert_eq!(table.headers, Some(vec!["a".into(), "b".into()]));
        assert_eq!(
            table.rows,
            vec![vec!["1".to_string(), "2".into()], vec!["3".into(), "".into()]]
        );
    }

    #[test]
    fn markdown_without_separator_has_no_header() {
        let node = table_of("| a | b |\n| 1 | 2 |", LexerOptions::default());
        let table = data(&node);
        assert_eq!(table.headers, None);
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn tsv_first_row_is_header() {
        let node = table_of("name\tage\nann\t3\tx", LexerOptions::default());
        let table = data(&node);
        assert_eq!(table.headers, Some(vec!["name".into(), "age".into()]));
        assert_eq!(table.rows, vec![vec!["ann".to_string(), "3".into()]]);
    }

    #[test]
    fn single_csv_row_has_no_header() {
        let options = LexerOptions {
            csv_tables: true,
            ..Default::default()
        };
        let node = table_of("a,b,c", options);
        assert_eq!(data(&node).headers, None);
    }

    #[test]
    fn all_empty_cells_is_placeholder() {
        let node = table_of("| |\n| |", LexerOptions::default());
        assert_eq!(node, AbstractNode::text(EMPTY_TABLE));
    }

    #[test]
    fn every_data_row_has_header_width() {
        let node = table_of("|a|b|c|\n|-|-|-|\n|1|\n|1|2|3|4|", LexerOptions::default());
        let table = data(&node);
        assert!(table.rows.iter().all(|r| r.len() == 3));
    }
}
