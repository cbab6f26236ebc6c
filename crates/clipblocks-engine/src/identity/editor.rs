//! Rich-editor node trees.
//!
//! Editor nodes arrive as JSON objects:
//!
//! ```json
//! { "type": "heading", "id": "h1", "props": { "level": 2 },
//!   "content": [{ "type": "text", "text": "Hi", "styles": { "bold": true } }],
//!   "children": [] }
//! ```
//!
//! Attributes may sit at the top level or inside a `props` object; the
//! `props` value wins when both exist.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{
    drafts::DraftBlock,
    model::{BlockProps, BlockType},
};
use crate::{
    convert::rules::{DEFAULT_COLOR, heading_level, resolve_color},
    error::ConvertError,
    parsing::{
        blocks::TableData,
        inline::{Annotations, SegmentKind, StyledSegment, parse_inline, sanitize_url},
    },
};

/// One node of an editor tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditorNode {
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Plain markup text, used when `content` is absent.
    #[serde(default)]
    pub text: Option<String>,
    /// Inline content items. Kept raw because tables put an object here.
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub children: Vec<EditorNode>,
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

/// An inline content item of an editor node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorInline {
    Text {
        #[serde(default)]
        text: String,
        #[serde(default)]
        styles: EditorStyles,
    },
    Link {
        href: String,
        #[serde(default)]
        content: Vec<EditorInline>,
    },
    Equation {
        expression: String,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorStyles {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub code: bool,
    pub text_color: Option<String>,
    pub background_color: Option<String>,
}

impl EditorNode {
    /// Parses an array of nodes or a single root node.
    pub fn from_json(json: &str) -> Result<Vec<EditorNode>, ConvertError> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Array(_) => Ok(serde_json::from_value(value)?),
            Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
            Value::Null => Err(ConvertError::UnexpectedRoot("null")),
            Value::Bool(_) => Err(ConvertError::UnexpectedRoot("a boolean")),
            Value::Number(_) => Err(ConvertError::UnexpectedRoot("a number")),
            Value::String(_) => Err(ConvertError::UnexpectedRoot("a string")),
        }
    }

    /// Attribute lookup, `props` first.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs
            .get("props")
            .and_then(|p| p.get(name))
            .or_else(|| self.attrs.get(name))
            .filter(|v| !v.is_null())
    }

    fn attr_str(&self, name: &str) -> Option<String> {
        match self.attr(name)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn attr_bool(&self, name: &str) -> bool {
        match self.attr(name) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn attr_u8(&self, name: &str) -> Option<u8> {
        match self.attr(name)? {
            Value::Number(n) => n.as_u64().map(|v| v.min(u64::from(u8::MAX)) as u8),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Inline content as styled segments.
    ///
    /// `content` items win; otherwise `text` is parsed as inline markup.
    pub fn segments(&self) -> Vec<StyledSegment> {
        self.inline().0
    }

    /// Inline content plus the number of `content` items that could not be
    /// read. A bad item is skipped on its own; its neighbours survive.
    pub fn inline(&self) -> (Vec<StyledSegment>, usize) {
        let Some(Value::Array(items)) = &self.content else {
            let segments = self.text.as_deref().map(parse_inline).unwrap_or_default();
            return (segments, 0);
        };
        let mut out = Vec::new();
        let mut dropped = 0;
        for item in items {
            match EditorInline::deserialize(item) {
                Ok(item) => inline_segments(&item, &Annotations::default(), &mut out),
                Err(e) => {
                    log::debug!("skipping inline item of {} node: {e}", self.node_type);
                    dropped += 1;
                }
            }
        }
        out.retain(|s| !s.is_empty());
        (out, dropped)
    }

    fn plain_text(&self) -> String {
        self.segments().iter().map(|s| s.content.as_str()).collect()
    }
}

fn inline_segments(item: &EditorInline, base: &Annotations, out: &mut Vec<StyledSegment>) {
    match item {
        EditorInline::Text { text, styles } => {
            out.push(StyledSegment::styled(text.as_str(), base.merge(&annotations(styles))));
        }
        EditorInline::Link { href, content } => {
            let url = sanitize_url(href);
            let mut label = Vec::new();
            for inner in content {
                inline_segments(inner, base, &mut label);
            }
            if label.is_empty() {
                label.push(StyledSegment::styled(href.as_str(), base.clone()));
            }
            for mut seg in label {
                if let Some(url) = &url
                    && seg.kind == SegmentKind::Text
                {
                    seg.kind = SegmentKind::Link;
                    seg.url = Some(url.clone());
                }
                out.push(seg);
            }
        }
        EditorInline::Equation { expression } => {
            let mut seg = StyledSegment::equation(expression.trim());
            seg.annotations = base.clone();
            out.push(seg);
        }
        EditorInline::Unknown => {}
    }
}

fn annotations(styles: &EditorStyles) -> Annotations {
    let color = resolve_color(styles.text_color.as_deref(), styles.background_color.as_deref());
    Annotations {
        bold: styles.bold,
        italic: styles.italic,
        underline: styles.underline,
        strikethrough: styles.strike,
        code: styles.code,
        color: (color != DEFAULT_COLOR).then_some(color),
    }
}

/// Drafts for an editor tree. Keys are node ids, or positional paths for
/// nodes without one.
pub fn drafts_from_editor(nodes: &[EditorNode]) -> Vec<DraftBlock> {
    drafts_at(nodes, "")
}

fn drafts_at(nodes: &[EditorNode], prefix: &str) -> Vec<DraftBlock> {
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let path = if prefix.is_empty() {
                i.to_string()
            } else {
                format!("{prefix}/{i}")
            };
            let key = node
                .id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| path.clone());
            let mut draft = draft_for_editor(node, key);
            draft.children = drafts_at(&node.children, &path);
            draft
        })
        .collect()
}

fn draft_for_editor(node: &EditorNode, key: String) -> DraftBlock {
    let name = node.node_type.as_str();
    let (mut inline_content, dropped_inline) = node.inline();
    let mut props = BlockProps {
        text_color: node.attr_str("textColor").filter(|c| c != DEFAULT_COLOR),
        background_color: node
            .attr_str("backgroundColor")
            .filter(|c| c != DEFAULT_COLOR),
        dropped_inline,
        ..Default::default()
    };

    let block_type = match name {
        "paragraph" => BlockType::Paragraph,
        "heading" | "heading_1" | "heading_2" | "heading_3" => {
            props.level = Some(heading_level(node.attr_u8("level"), name));
            props.toggleable = node.attr_bool("isToggleable");
            BlockType::Heading
        }
        "bulletListItem" => BlockType::BulletedListItem,
        "numberedListItem" => BlockType::NumberedListItem,
        "checkListItem" => {
            props.checked = Some(node.attr_bool("checked"));
            BlockType::ToDo
        }
        "toggleListItem" => BlockType::Toggle,
        "quote" => BlockType::Quote,
        "callout" => {
            props.icon = node.attr_str("icon");
            BlockType::Callout
        }
        "codeBlock" => {
            props.language = node.attr_str("language");
            let code = node.plain_text();
            inline_content = if code.is_empty() {
                Vec::new()
            } else {
                vec![StyledSegment::text(code)]
            };
            BlockType::Code
        }
        "equation" => {
            props.expression = node
                .attr_str("expression")
                .or_else(|| Some(node.plain_text()).filter(|t| !t.is_empty()));
            props.inline = node.attr_bool("inline");
            inline_content = Vec::new();
            BlockType::Equation
        }
        "table" => {
            props.table = Some(editor_table(node));
            inline_content = Vec::new();
            BlockType::Table
        }
        "divider" => BlockType::Divider,
        "tableOfContents" => BlockType::TableOfContents,
        "breadcrumb" => BlockType::Breadcrumb,
        "image" | "video" | "audio" | "file" => {
            props.url = node.attr_str("url");
            props.caption = node.attr_str("caption");
            props.mime = node.attr_str("mime");
            match name {
                "image" => BlockType::Image,
                "video" => BlockType::Video,
                "audio" => BlockType::Audio,
                _ => BlockType::File,
            }
        }
        "bookmark" => {
            props.url = node.attr_str("url");
            BlockType::Bookmark
        }
        other => BlockType::Unsupported(other.to_string()),
    };

    DraftBlock {
        source_key: key,
        block_type,
        props,
        inline_content,
        children: Vec::new(),
    }
}

/// Reads `rows: [[string]]` and `hasHeader`.
fn editor_table(node: &EditorNode) -> TableData {
    let rows: Vec<Vec<String>> = node
        .attr("rows")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .filter_map(Value::as_array)
                .map(|cells| cells.iter().map(cell_text).collect())
                .collect()
        })
        .unwrap_or_default();

    let (headers, rows) = if node.attr_bool("hasHeader") && !rows.is_empty() {
        let mut rows = rows.into_iter();
        (rows.next(), rows.collect())
    } else {
        (None, rows)
    };
    TableData { headers, rows }.normalized()
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
