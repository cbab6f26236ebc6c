//! Target block API types.
//!
//! Every block serializes as `{ "type": t, t: { ... }, "has_children"?: bool }`
//! where the payload object is named after the type.

use serde::{Serialize, Serializer, ser::SerializeMap};

use super::rules::DEFAULT_COLOR;
use crate::parsing::inline::{SegmentKind, StyledSegment};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiAnnotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: String,
}

impl Default for ApiAnnotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkTarget {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContent {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquationContent {
    pub expression: String,
}

/// One rich-text item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichText {
    Text {
        text: TextContent,
        annotations: ApiAnnotations,
    },
    Equation {
        equation: EquationContent,
        annotations: ApiAnnotations,
    },
}

impl RichText {
    /// An unstyled text run.
    pub fn plain(content: impl Into<String>) -> Self {
        RichText::Text {
            text: TextContent {
                content: content.into(),
                link: None,
            },
            annotations: ApiAnnotations::default(),
        }
    }

    pub fn from_segment(segment: &StyledSegment) -> Self {
        let a = &segment.annotations;
        let annotations = ApiAnnotations {
            bold: a.bold,
            italic: a.italic,
            strikethrough: a.strikethrough,
            underline: a.underline,
            code: a.code,
            color: a.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        };
        match segment.kind {
            SegmentKind::Equation => RichText::Equation {
                equation: EquationContent {
                    expression: segment.content.clone(),
                },
                annotations,
            },
            SegmentKind::Text | SegmentKind::Link => RichText::Text {
                text: TextContent {
                    content: segment.content.clone(),
                    link: segment.url.clone().map(|url| LinkTarget { url }),
                },
                annotations,
            },
        }
    }

    /// Visible content (the expression for equations).
    pub fn content(&self) -> &str {
        match self {
            RichText::Text { text, .. } => &text.content,
            RichText::Equation { equation, .. } => &equation.expression,
        }
    }

    pub fn annotations(&self) -> &ApiAnnotations {
        match self {
            RichText::Text { annotations, .. } | RichText::Equation { annotations, .. } => {
                annotations
            }
        }
    }
}

/// Paragraphs, list items, toggles and quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub rich_text: Vec<RichText>,
    pub color: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TargetBlock>,
}

impl TextBlock {
    pub fn new(rich_text: Vec<RichText>) -> Self {
        Self {
            rich_text,
            color: DEFAULT_COLOR.to_string(),
            children: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: String) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingBlock {
    pub rich_text: Vec<RichText>,
    pub color: String,
    pub is_toggleable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TargetBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToDoBlock {
    pub rich_text: Vec<RichText>,
    pub checked: bool,
    pub color: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TargetBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Icon {
    Emoji { emoji: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalloutBlock {
    pub rich_text: Vec<RichText>,
    pub icon: Icon,
    pub color: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TargetBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub rich_text: Vec<RichText>,
    pub caption: Vec<RichText>,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquationBlock {
    pub expression: String,
}

/// Payload of property-less types; serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EmptyBlock {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBlock {
    pub table_width: usize,
    pub has_column_header: bool,
    pub has_row_header: bool,
    pub children: Vec<TargetBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRowBlock {
    pub cells: Vec<Vec<RichText>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalUrl {
    pub url: String,
}

/// Image, video, audio, pdf and file payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileBlock {
    #[serde(rename = "type")]
    pub source: &'static str,
    pub external: ExternalUrl,
    pub caption: Vec<RichText>,
}

impl FileBlock {
    pub fn external(url: impl Into<String>, caption: Vec<RichText>) -> Self {
        Self {
            source: "external",
            external: ExternalUrl { url: url.into() },
            caption,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkBlock {
    pub url: String,
    pub caption: Vec<RichText>,
}

/// Type-specific content of a target block.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockPayload {
    Paragraph(TextBlock),
    Heading1(HeadingBlock),
    Heading2(HeadingBlock),
    Heading3(HeadingBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    ToDo(ToDoBlock),
    Toggle(TextBlock),
    Quote(TextBlock),
    Callout(CalloutBlock),
    Code(CodeBlock),
    Equation(EquationBlock),
    Divider(EmptyBlock),
    TableOfContents(EmptyBlock),
    Breadcrumb(EmptyBlock),
    Table(TableBlock),
    TableRow(TableRowBlock),
    Image(FileBlock),
    Video(FileBlock),
    Audio(FileBlock),
    Pdf(FileBlock),
    File(FileBlock),
    Bookmark(BookmarkBlock),
}

impl BlockPayload {
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockPayload::Paragraph(_) => "paragraph",
            BlockPayload::Heading1(_) => "heading_1",
            BlockPayload::Heading2(_) => "heading_2",
            BlockPayload::Heading3(_) => "heading_3",
            BlockPayload::BulletedListItem(_) => "bulleted_list_item",
            BlockPayload::NumberedListItem(_) => "numbered_list_item",
            BlockPayload::ToDo(_) => "to_do",
            BlockPayload::Toggle(_) => "toggle",
            BlockPayload::Quote(_) => "quote",
            BlockPayload::Callout(_) => "callout",
            BlockPayload::Code(_) => "code",
            BlockPayload::Equation(_) => "equation",
            BlockPayload::Divider(_) => "divider",
            BlockPayload::TableOfContents(_) => "table_of_contents",
            BlockPayload::Breadcrumb(_) => "breadcrumb",
            BlockPayload::Table(_) => "table",
            BlockPayload::TableRow(_) => "table_row",
            BlockPayload::Image(_) => "image",
            BlockPayload::Video(_) => "video",
            BlockPayload::Audio(_) => "audio",
            BlockPayload::Pdf(_) => "pdf",
            BlockPayload::File(_) => "file",
            BlockPayload::Bookmark(_) => "bookmark",
        }
    }

    /// Whether children may be embedded in this payload.
    ///
    /// Headings qualify only when toggleable. Tables carry their rows but
    /// accept nothing else, so they are not listed.
    pub fn can_have_children(&self) -> bool {
        match self {
            BlockPayload::Paragraph(_)
            | BlockPayload::BulletedListItem(_)
            | BlockPayload::NumberedListItem(_)
            | BlockPayload::ToDo(_)
            | BlockPayload::Toggle(_)
            | BlockPayload::Quote(_)
            | BlockPayload::Callout(_) => true,
            BlockPayload::Heading1(h) | BlockPayload::Heading2(h) | BlockPayload::Heading3(h) => {
                h.is_toggleable
            }
            _ => false,
        }
    }

    /// Embeds `children`. Returns them back when the type cannot hold any.
    pub fn set_children(&mut self, children: Vec<TargetBlock>) -> Result<(), Vec<TargetBlock>> {
        if !self.can_have_children() {
            return Err(children);
        }
        match self {
            BlockPayload::Paragraph(b)
            | BlockPayload::BulletedListItem(b)
            | BlockPayload::NumberedListItem(b)
            | BlockPayload::Toggle(b)
            | BlockPayload::Quote(b) => b.children = children,
            BlockPayload::Heading1(b) | BlockPayload::Heading2(b) | BlockPayload::Heading3(b) => {
                b.children = children
            }
            BlockPayload::ToDo(b) => b.children = children,
            BlockPayload::Callout(b) => b.children = children,
            _ => return Err(children),
        }
        Ok(())
    }

    /// Rich text of text-bearing payloads.
    pub fn rich_text(&self) -> &[RichText] {
        match self {
            BlockPayload::Paragraph(b)
            | BlockPayload::BulletedListItem(b)
            | BlockPayload::NumberedListItem(b)
            | BlockPayload::Toggle(b)
            | BlockPayload::Quote(b) => &b.rich_text,
            BlockPayload::Heading1(b) | BlockPayload::Heading2(b) | BlockPayload::Heading3(b) => {
                &b.rich_text
            }
            BlockPayload::ToDo(b) => &b.rich_text,
            BlockPayload::Callout(b) => &b.rich_text,
            BlockPayload::Code(b) => &b.rich_text,
            _ => &[],
        }
    }

    fn serialize_body<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        let name = self.type_name();
        match self {
            BlockPayload::Paragraph(b)
            | BlockPayload::BulletedListItem(b)
            | BlockPayload::NumberedListItem(b)
            | BlockPayload::Toggle(b)
            | BlockPayload::Quote(b) => map.serialize_entry(name, b),
            BlockPayload::Heading1(b) | BlockPayload::Heading2(b) | BlockPayload::Heading3(b) => {
                map.serialize_entry(name, b)
            }
            BlockPayload::ToDo(b) => map.serialize_entry(name, b),
            BlockPayload::Callout(b) => map.serialize_entry(name, b),
            BlockPayload::Code(b) => map.serialize_entry(name, b),
            BlockPayload::Equation(b) => map.serialize_entry(name, b),
            BlockPayload::Divider(b)
            | BlockPayload::TableOfContents(b)
            | BlockPayload::Breadcrumb(b) => map.serialize_entry(name, b),
            BlockPayload::Table(b) => map.serialize_entry(name, b),
            BlockPayload::TableRow(b) => map.serialize_entry(name, b),
            BlockPayload::Image(b)
            | BlockPayload::Video(b)
            | BlockPayload::Audio(b)
            | BlockPayload::Pdf(b)
            | BlockPayload::File(b) => map.serialize_entry(name, b),
            BlockPayload::Bookmark(b) => map.serialize_entry(name, b),
        }
    }
}

/// A block in the target API shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetBlock {
    pub payload: BlockPayload,
    /// Set by the flattening converter on blocks whose children follow them.
    pub has_children: Option<bool>,
}

impl TargetBlock {
    pub fn new(payload: BlockPayload) -> Self {
        Self {
            payload,
            has_children: None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.payload.type_name()
    }
}

impl Serialize for TargetBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.has_children.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", self.type_name())?;
        self.payload.serialize_body(&mut map)?;
        if let Some(has_children) = self.has_children {
            map.serialize_entry("has_children", &has_children)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use serde_json::json;

    #[test]
    fn divider_serializes_empty_payload() {
        let block = TargetBlock::new(BlockPayload::Divider(EmptyBlock {}));
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({"type": "divider", "divider": {}})
        );
    }

    #[test]
    fn has_children_only_when_set() {
        let mut block = TargetBlock::new(BlockPayload::Paragraph(TextBlock::new(vec![
            RichText::plain("hi"),
        ])));
        let value = serde_json::to_value(&block).unwrap();
        assert!(value.get("has_children").is_none());

        block.has_children = Some(true);
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["has_children"], json!(true));
    }

    #[test]
    fn snapshot_link_run() {
        let seg = StyledSegment::link("docs", "https://x.io");
        let json = serde_json::to_string_pretty(&RichText::from_segment(&seg)).unwrap();
        assert_snapshot!(json, @r#"
        {
          "type": "text",
          "text": {
            "content": "docs",
            "link": {
              "url": "https://x.io"
            }
          },
          "annotations": {
            "bold": false,
            "italic": false,
            "strikethrough": false,
            "underline": false,
            "code": false,
            "color": "default"
          }
        }
        "#);
    }

    #[test]
    fn heading_children_need_toggle() {
        let heading = |is_toggleable| HeadingBlock {
            rich_text: vec![],
            color: DEFAULT_COLOR.into(),
            is_toggleable,
            children: vec![],
        };
        assert!(!BlockPayload::Heading1(heading(false)).can_have_children());
        assert!(BlockPayload::Heading2(heading(true)).can_have_children());
        assert!(!BlockPayload::Equation(EquationBlock { expression: "x".into() }).can_have_children());
    }

    #[test]
    fn set_children_rejects_leaf_types() {
        let child = TargetBlock::new(BlockPayload::Divider(EmptyBlock {}));
        let mut code = BlockPayload::Code(CodeBlock {
            rich_text: vec![],
            caption: vec![],
            language: "rust".into(),
        });
        assert_eq!(code.set_children(vec![child.clone()]), Err(vec![child]));
    }
}
