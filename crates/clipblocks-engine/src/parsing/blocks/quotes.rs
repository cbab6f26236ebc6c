//! Quote runs: plain quotes, toggles, toggleable headings and quoted callouts.
//!
//! A run is a sequence of quote-prefixed tokens on adjacent lines. Quoted
//! headings and callouts open a group that owns every following line of the
//! run up to the next opener. Lines before the first opener are judged by
//! [`is_toggle_run`]: long or structured runs become toggles, the rest stay
//! plain quotes.

use clipblocks_syntax::{Token, TokenKind};

use super::{
    builder::build_nodes,
    types::{AbstractNode, NodeKind},
};

/// Minimum number of source lines that turns a plain quote into a toggle.
const TOGGLE_MIN_LINES: usize = 4;

/// True when a quoted run should become a toggle rather than a quote.
///
/// Any of: four or more lines, a heading on the first line, a list item, or
/// a fenced code block. Quoted blank lines (`>` alone) count as lines; a
/// fence counts once per source line it spans.
pub fn is_toggle_run(tokens: &[Token]) -> bool {
    let line_count: usize = tokens
        .iter()
        .filter(|t| !t.is_eof())
        .map(|t| t.lines.count())
        .sum();
    line_count >= TOGGLE_MIN_LINES
        || tokens
            .iter()
            .find(|t| !is_blank(t))
            .is_some_and(|t| matches!(t.kind, TokenKind::Heading { .. }))
        || tokens.iter().any(|t| {
            matches!(
                t.kind,
                TokenKind::ListItem { .. } | TokenKind::CodeBlock { .. }
            )
        })
}

/// Index one past the last token of the quote run starting at `start`.
pub fn run_end(tokens: &[Token], start: usize) -> usize {
    let mut end = start + 1;
    while end < tokens.len()
        && tokens[end].is_quoted()
        && tokens[end - 1].lines.is_followed_by(tokens[end].lines)
    {
        end += 1;
    }
    end
}

/// Builds the nodes for one quote run.
pub fn build_quote_run(run: &[Token]) -> Vec<AbstractNode> {
    let mut out = Vec::new();
    let openers: Vec<usize> = run
        .iter()
        .enumerate()
        .filter(|(_, t)| is_opener(t))
        .map(|(i, _)| i)
        .collect();

    let first_opener = openers.first().copied().unwrap_or(run.len());
    if let Some(node) = build_plain(&run[..first_opener]) {
        out.push(node);
    }

    for (n, &at) in openers.iter().enumerate() {
        let end = openers.get(n + 1).copied().unwrap_or(run.len());
        let owner = &run[at];
        let children = build_nodes(&unquote(&run[at + 1..end]));
        let kind = match &owner.kind {
            TokenKind::Heading { level } => NodeKind::Heading {
                level: *level,
                toggleable: true,
            },
            TokenKind::Callout { icon, color, .. } => NodeKind::Callout {
                icon: icon.clone(),
                color: color.clone(),
            },
            _ => continue,
        };
        out.push(AbstractNode::parent(kind, owner.text.clone(), children));
    }
    out
}

/// Quoted headings and callouts at the outermost depth own the lines after them.
fn is_opener(token: &Token) -> bool {
    token.quote_depth == 1
        && matches!(
            token.kind,
            TokenKind::Heading { .. } | TokenKind::Callout { .. }
        )
}

/// A quote or toggle from lines that no heading or callout owns.
fn build_plain(tokens: &[Token]) -> Option<AbstractNode> {
    let first = tokens.iter().position(|t| !is_blank(t))?;
    let last = tokens.iter().rposition(|t| !is_blank(t))?;
    let lines = &tokens[first..=last];

    if is_toggle_run(lines) {
        // Only a plain first line becomes the title; code, lists and the
        // like stay intact as children of an untitled toggle.
        let (title, body) = match lines[0].kind {
            TokenKind::Text => (lines[0].text.clone(), &lines[1..]),
            _ => (String::new(), lines),
        };
        let children = build_nodes(&unquote(body));
        return Some(AbstractNode::parent(NodeKind::Toggle, title, children));
    }

    let text = lines
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    Some(AbstractNode::leaf(NodeKind::Quote, text))
}

/// Copies of `tokens` with one quote level removed.
fn unquote(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .map(|t| Token {
            quote_depth: t.quote_depth.saturating_sub(1),
            ..t.clone()
        })
        .collect()
}

fn is_blank(token: &Token) -> bool {
    matches!(token.kind, TokenKind::Blank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipblocks_syntax::tokenize;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn run_of(input: &str) -> Vec<Token> {
        tokenize(input).tokens().to_vec()
    }

    #[rstest]
    #[case("> a\n> b\n> c", false)]
    #[case("> a\n> b\n> c\n> d", true)]
    #[case("> a\n>\n> b\n> c", true)]
    #[case("> a\n>\n> b", false)]
    #[case("> # Title\n> body", true)]
    #[case("> intro\n> - item", true)]
    #[case("> ```\n> code\n> ```", true)]
    fn toggle_heuristic(#[case] input: &str, #[case] toggle: bool) {
        assert_eq!(is_toggle_run(&run_of(input)), toggle);
    }

    #[test]
    fn short_run_is_quote_with_joined_lines() {
        let nodes = build_quote_run(&run_of("> short\n> quote"));
        assert_eq!(nodes, vec![AbstractNode::leaf(NodeKind::Quote, "short\nquote")]);
    }

    #[test]
    fn long_run_is_toggle_with_title_and_children() {
        let nodes = build_quote_run(&run_of("> a\n> b\n> c\n> d"));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NodeKind::Toggle);
        assert_eq!(nodes[0].text, "a");
        let children: Vec<_> = nodes[0].child_nodes().iter().map(|n| n.text.as_str()).collect();
        assert_eq!(children, vec!["b", "c", "d"]);
    }

    #[test]
    fn lone_quoted_heading_is_empty_toggleable_heading() {
        let nodes = build_quote_run(&run_of("> ## Details"));
        assert_eq!(
            nodes,
            vec![AbstractNode::parent(
                NodeKind::Heading {
                    level: 2,
                    toggleable: true
                },
                "Details",
                vec![]
            )]
        );
    }

    #[test]
    fn quoted_headings_split_the_run() {
        let nodes = build_quote_run(&run_of("> # One\n> a\n> # Two\n> b\n> c"));
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].text, "One");
        assert_eq!(nodes[0].child_nodes().len(), 1);
        assert_eq!(nodes[1].text, "Two");
        assert_eq!(nodes[1].child_nodes().len(), 2);
    }

    #[test]
    fn quoted_callout_owns_following_lines() {
        let nodes = build_quote_run(&run_of("> [!warning] Careful\n> details here"));
        assert_eq!(nodes.len(), 1);
        assert!(matches!(nodes[0].kind, NodeKind::Callout { .. }));
        assert_eq!(nodes[0].text, "Careful");
        assert_eq!(nodes[0].child_nodes(), &[AbstractNode::text("details here")]);
    }

    #[test]
    fn quoted_fence_survives_as_toggle_child() {
        let nodes = build_quote_run(&run_of("> ```rust\n> fn main() {}\n> ```"));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind, NodeKind::Toggle);
        assert_eq!(nodes[0].text, "");
        let children = nodes[0].child_nodes();
        assert_eq!(children.len(), 1);
        assert!(matches!(
            &children[0].kind,
            NodeKind::Code { language: Some(lang), .. } if lang == "rust"
        ));
        assert_eq!(children[0].text, "fn main() {}");
    }

    #[test]
    fn quoted_list_keeps_every_item() {
        let nodes = build_quote_run(&run_of("> - one\n> - two"));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text, "");
        let items: Vec<_> = nodes[0].child_nodes().iter().map(|n| n.text.as_str()).collect();
        assert_eq!(items, vec!["one", "two"]);
        assert!(
            nodes[0]
                .child_nodes()
                .iter()
                .all(|n| matches!(n.kind, NodeKind::ListItem { .. }))
        );
    }

    #[test]
    fn text_first_line_is_the_title() {
        let nodes = build_quote_run(&run_of("> intro\n> - item"));
        assert_eq!(nodes[0].text, "intro");
        assert_eq!(nodes[0].child_nodes().len(), 1);
    }

    #[test]
    fn nested_markers_never_reach_text() {
        let nodes = build_quote_run(&run_of(">> deep\n> > also"));
        assert_eq!(nodes, vec![AbstractNode::leaf(NodeKind::Quote, "deep\nalso")]);
    }

    #[test]
    fn nested_quote_inside_toggle() {
        let nodes = build_quote_run(&run_of("> t\n> a\n> b\n>> inner"));
        let children = nodes[0].child_nodes();
        assert_eq!(children.last(), Some(&AbstractNode::leaf(NodeKind::Quote, "inner")));
    }
}
