use clipblocks_syntax::{Token, TokenKind, TokenStream, kinds::strip_tags};

use super::{
    lists::build_list_tree,
    quotes::{build_quote_run, run_end},
    tables::build_table,
    types::{AbstractNode, NodeKind},
};

/// Builds the abstract node tree for a token stream.
pub fn parse(stream: &TokenStream) -> Vec<AbstractNode> {
    build_nodes(stream.tokens())
}

/// Dispatches tokens to node builders.
///
/// Multi-token constructs are gathered first: quote runs, list runs and
/// table runs. Everything else maps one token to at most one node.
pub(crate) fn build_nodes(tokens: &[Token]) -> Vec<AbstractNode> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        if token.is_quoted() {
            let end = run_end(tokens, i);
            out.extend(build_quote_run(&tokens[i..end]));
            i = end;
            continue;
        }

        match &token.kind {
            TokenKind::ListItem { .. } => {
                let end = list_run_end(tokens, i);
                let items = tokens[i..end]
                    .iter()
                    .filter_map(|t| match &t.kind {
                        TokenKind::ListItem { indent, .. } => Some((*indent, single_node(t)?)),
                        _ => None,
                    })
                    .collect();
                out.extend(build_list_tree(items));
                i = end;
            }
            TokenKind::TableRow { delimiter, .. } => {
                let mut end = i + 1;
                while end < tokens.len()
                    && !tokens[end].is_quoted()
                    && tokens[end - 1].lines.is_followed_by(tokens[end].lines)
                    && matches!(&tokens[end].kind, TokenKind::TableRow { delimiter: d, .. } if d == delimiter)
                {
                    end += 1;
                }
                let rows: Vec<&Token> = tokens[i..end].iter().collect();
                out.push(build_table(&rows));
                i = end;
            }
            _ => {
                out.extend(single_node(token));
                i += 1;
            }
        }
    }
    out
}

/// End of a list run. Blank lines between items stay inside the run.
fn list_run_end(tokens: &[Token], start: usize) -> usize {
    let mut end = start + 1;
    let mut j = start + 1;
    while j < tokens.len() && !tokens[j].is_quoted() {
        match tokens[j].kind {
            TokenKind::ListItem { .. } => end = j + 1,
            TokenKind::Blank => {}
            _ => break,
        }
        j += 1;
    }
    end
}

/// The node for a single token, or `None` for tokens with no content.
fn single_node(token: &Token) -> Option<AbstractNode> {
    let text = token.text.clone();
    let node = match &token.kind {
        TokenKind::Text => AbstractNode::text(text),
        TokenKind::Html => {
            let visible = strip_tags(&token.text);
            if visible.is_empty() {
                return None;
            }
            AbstractNode::text(visible)
        }
        TokenKind::Heading { level } => AbstractNode::leaf(
            NodeKind::Heading {
                level: *level,
                toggleable: false,
            },
            text,
        ),
        TokenKind::ListItem {
            list_type,
            indent,
            checked,
        } => AbstractNode::parent(
            NodeKind::ListItem {
                list_type: *list_type,
                indent: *indent,
                checked: *checked,
            },
            text,
            vec![],
        ),
        TokenKind::CodeBlock { language, .. } => AbstractNode::leaf(
            NodeKind::Code {
                language: language.clone(),
                caption: None,
                inline: false,
            },
            text,
        ),
        TokenKind::EquationBlock { expression } => {
            AbstractNode::leaf(NodeKind::Equation { inline: false }, expression.clone())
        }
        TokenKind::Callout { icon, color, .. } => AbstractNode::leaf(
            NodeKind::Callout {
                icon: icon.clone(),
                color: color.clone(),
            },
            text,
        ),
        TokenKind::TableRow { .. } => build_table(&[token]),
        TokenKind::Media { media, url, alt } => AbstractNode::leaf(
            NodeKind::Media {
                media: *media,
                url: Some(url.clone()),
                caption: alt.clone(),
                mime: None,
            },
            alt.clone().unwrap_or_else(|| url.clone()),
        ),
        TokenKind::Bookmark { url } => {
            AbstractNode::leaf(NodeKind::Bookmark { url: url.clone() }, url.clone())
        }
        TokenKind::Divider => AbstractNode::leaf(NodeKind::Divider, ""),
        TokenKind::Blank | TokenKind::Eof => return None,
    };
    Some(node)
}
