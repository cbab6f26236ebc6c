pub mod blocks;
pub mod inline;

use clipblocks_syntax::{Lexer, LexerOptions};

use blocks::AbstractNode;

/// Lexes and parses `text` into abstract nodes.
pub fn parse_text(text: &str, options: &LexerOptions) -> Vec<AbstractNode> {
    let stream = Lexer::new(options.clone()).tokenize(text);
    blocks::parse(&stream)
}
