use clipblocks_syntax::{ListType, MediaKind};
use serde::{Deserialize, Serialize};

/// The kind of an abstract node, with its per-kind metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// Plain paragraph text.
    Text,
    Heading {
        level: u8,
        /// Set for quote-prefixed headings, which own the quoted lines after them.
        toggleable: bool,
    },
    ListItem {
        list_type: ListType,
        indent: usize,
        checked: bool,
    },
    /// A short quote. Its lines are joined into the node text.
    Quote,
    /// Collapsible block. The node text is the title.
    Toggle,
    Callout {
        icon: Option<String>,
        color: Option<String>,
    },
    /// Code block; the node text is the code.
    Code {
        language: Option<String>,
        caption: Option<String>,
        inline: bool,
    },
    /// Equation; the node text is the expression.
    Equation { inline: bool },
    Table(TableData),
    Divider,
    Media {
        media: MediaKind,
        url: Option<String>,
        caption: Option<String>,
        mime: Option<String>,
    },
    Bookmark { url: String },
    /// Something with no target representation.
    Unsupported { reason: String },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Heading { .. } => "heading",
            NodeKind::ListItem { .. } => "list_item",
            NodeKind::Quote => "quote",
            NodeKind::Toggle => "toggle",
            NodeKind::Callout { .. } => "callout",
            NodeKind::Code { .. } => "code",
            NodeKind::Equation { .. } => "equation",
            NodeKind::Table(_) => "table",
            NodeKind::Divider => "divider",
            NodeKind::Media { .. } => "media",
            NodeKind::Bookmark { .. } => "bookmark",
            NodeKind::Unsupported { .. } => "unsupported",
        }
    }
}

/// A node of the parsed tree.
///
/// `children == None` marks a leaf. `Some(vec![])` marks a node that can hold
/// children but currently has none (an empty toggle, a list item without
/// nested items, a lone toggleable heading).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbstractNode {
    #[serde(flatten)]
    pub kind: NodeKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AbstractNode>>,
}

impl AbstractNode {
    pub fn leaf(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            children: None,
        }
    }

    pub fn parent(kind: NodeKind, text: impl Into<String>, children: Vec<AbstractNode>) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Some(children),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Text, text)
    }

    /// Children, or an empty slice for leaves.
    pub fn child_nodes(&self) -> &[AbstractNode] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn has_children(&self) -> bool {
        !self.child_nodes().is_empty()
    }
}

/// Cells of a parsed table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Column count: the header width, or the widest row without a header.
    pub fn width(&self) -> usize {
        match &self.headers {
            Some(h) => h.len(),
            None => self.rows.iter().map(Vec::len).max().unwrap_or(0),
        }
    }

    /// Pads short rows with `""` and truncates long ones to [`Self::width`].
    pub fn normalized(mut self) -> Self {
        let width = self.width();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
        self
    }
}
