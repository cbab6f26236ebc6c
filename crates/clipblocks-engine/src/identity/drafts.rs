//! Draft blocks: document-model blocks that do not have an identity yet.

use clipblocks_syntax::{ListType, MediaKind};

use super::model::{BlockProps, BlockType};
use crate::parsing::{
    blocks::{AbstractNode, NodeKind},
    inline::{StyledSegment, parse_inline},
};

/// A block before reconciliation.
///
/// `source_key` identifies where the draft came from (an editor node id or a
/// positional path like `0/2/1`) and is the key of the id mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftBlock {
    pub source_key: String,
    pub block_type: BlockType,
    pub props: BlockProps,
    pub inline_content: Vec<StyledSegment>,
    pub children: Vec<DraftBlock>,
}

impl DraftBlock {
    pub fn new(source_key: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            source_key: source_key.into(),
            block_type,
            props: BlockProps::default(),
            inline_content: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Drafts for parsed text. Keys are positional paths.
pub fn drafts_from_nodes(nodes: &[AbstractNode]) -> Vec<DraftBlock> {
    drafts_at(nodes, "")
}

fn drafts_at(nodes: &[AbstractNode], prefix: &str) -> Vec<DraftBlock> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let key = if prefix.is_empty() {
                i.to_string()
            } else {
                format!("{prefix}/{i}")
            };
            let mut draft = draft_for_node(node, &key);
            draft.children = drafts_at(node.child_nodes(), &key);
            draft
        })
        .collect()
}

fn draft_for_node(node: &AbstractNode, key: &str) -> DraftBlock {
    let text = node.text.as_str();
    let (block_type, props, inline_content) = match &node.kind {
        NodeKind::Text => (BlockType::Paragraph, BlockProps::default(), parse_inline(text)),
        NodeKind::Heading { level, toggleable } => (
            BlockType::Heading,
            BlockProps {
                level: Some(*level),
                toggleable: *toggleable,
                ..Default::default()
            },
            parse_inline(text),
        ),
        NodeKind::ListItem {
            list_type, checked, ..
        } => {
            let (block_type, checked) = match list_type {
                ListType::Bulleted => (BlockType::BulletedListItem, None),
                ListType::Numbered => (BlockType::NumberedListItem, None),
                ListType::Todo => (BlockType::ToDo, Some(*checked)),
            };
            let props = BlockProps {
                checked,
                ..Default::default()
            };
            (block_type, props, parse_inline(text))
        }
        NodeKind::Quote => (BlockType::Quote, BlockProps::default(), parse_inline(text)),
        NodeKind::Toggle => (BlockType::Toggle, BlockProps::default(), parse_inline(text)),
        NodeKind::Callout { icon, color } => {
            let (text_color, background_color) = split_color(color.as_deref());
            let props = BlockProps {
                icon: icon.clone(),
                text_color,
                background_color,
                ..Default::default()
            };
            (BlockType::Callout, props, parse_inline(text))
        }
        NodeKind::Code {
            language,
            caption,
            inline,
        } => {
            let props = BlockProps {
                language: language.clone(),
                caption: caption.clone(),
                inline: *inline,
                ..Default::default()
            };
            (BlockType::Code, props, literal(text))
        }
        NodeKind::Equation { inline } => {
            let props = BlockProps {
                expression: Some(text.to_string()),
                inline: *inline,
                ..Default::default()
            };
            (BlockType::Equation, props, Vec::new())
        }
        NodeKind::Table(table) => {
            let props = BlockProps {
                table: Some(table.clone()),
                ..Default::default()
            };
            (BlockType::Table, props, Vec::new())
        }
        NodeKind::Divider => (BlockType::Divider, BlockProps::default(), Vec::new()),
        NodeKind::Media {
            media,
            url,
            caption,
            mime,
        } => {
            let block_type = match media {
                MediaKind::Image => BlockType::Image,
                MediaKind::Video => BlockType::Video,
                MediaKind::Audio => BlockType::Audio,
                MediaKind::File => BlockType::File,
            };
            let props = BlockProps {
                url: url.clone(),
                caption: caption.clone(),
                mime: mime.clone(),
                ..Default::default()
            };
            (block_type, props, literal(text))
        }
        NodeKind::Bookmark { url } => {
            let props = BlockProps {
                url: Some(url.clone()),
                ..Default::default()
            };
            (BlockType::Bookmark, props, Vec::new())
        }
        NodeKind::Unsupported { reason } => (
            BlockType::Unsupported(reason.clone()),
            BlockProps::default(),
            literal(text),
        ),
    };

    DraftBlock {
        source_key: key.to_string(),
        block_type,
        props,
        inline_content,
        children: Vec::new(),
    }
}

/// One unstyled segment, or nothing for empty text.
fn literal(text: &str) -> Vec<StyledSegment> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![StyledSegment::text(text)]
    }
}

/// Splits a lexer color such as `blue_background` into foreground and
/// background names.
fn split_color(color: Option<&str>) -> (Option<String>, Option<String>) {
    match color {
        Some(c) => match c.strip_suffix("_background") {
            Some(bg) => (None, Some(bg.to_string())),
            None => (Some(c.to_string()), None),
        },
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_text;
    use clipblocks_syntax::LexerOptions;
    use pretty_assertions::assert_eq;

    fn drafts(input: &str) -> Vec<DraftBlock> {
        drafts_from_nodes(&parse_text(input, &LexerOptions::default()))
    }

    #[test]
    fn positional_keys() {
        let d = drafts("- a\n  - b\n  - c\n- d");
        assert_eq!(d[0].source_key, "0");
        assert_eq!(d[0].children[1].source_key, "0/1");
        assert_eq!(d[1].source_key, "1");
    }

    #[test]
    fn todo_carries_checked() {
        let d = drafts("- [x] done\n- [ ] open");
        assert_eq!(d[0].block_type, BlockType::ToDo);
        assert_eq!(d[0].props.checked, Some(true));
        assert_eq!(d[1].props.checked, Some(false));
    }

    #[test]
    fn callout_background_color_is_split() {
        let d = drafts("[!warning] careful");
        assert_eq!(d[0].block_type, BlockType::Callout);
        assert_eq!(d[0].props.background_color.as_deref(), Some("yellow"));
        assert_eq!(d[0].props.text_color, None);
    }

    #[test]
    fn code_content_is_literal() {
        let d = drafts("```\n**x**\n```");
        assert_eq!(d[0].inline_content, vec![StyledSegment::text("**x**")]);
    }

    #[test]
    fn heading_keeps_level_and_toggle() {
        let d = drafts("> ## H");
        assert_eq!(d[0].block_type, BlockType::Heading);
        assert_eq!(d[0].props.level, Some(2));
        assert!(d[0].props.toggleable);
    }
}
