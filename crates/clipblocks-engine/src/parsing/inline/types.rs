use serde::{Deserialize, Serialize};

/// What a styled segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    #[default]
    Text,
    Link,
    Equation,
}

/// Sparse style flags carried by a segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
    /// Semantic color name such as `red` or `red_background`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Annotations {
    /// Union of both flag sets. The inner color wins when both have one.
    pub fn merge(&self, inner: &Annotations) -> Annotations {
        Annotations {
            bold: self.bold || inner.bold,
            italic: self.italic || inner.italic,
            underline: self.underline || inner.underline,
            strikethrough: self.strikethrough || inner.strikethrough,
            code: self.code || inner.code,
            color: inner.color.clone().or_else(|| self.color.clone()),
        }
    }
}

/// One styled run of inline content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyledSegment {
    pub kind: SegmentKind,
    /// Visible text, or the expression for equations.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub annotations: Annotations,
}

impl StyledSegment {
    pub fn text(content: impl Into<String>) -> Self {
        Self::styled(content, Annotations::default())
    }

    pub fn styled(content: impl Into<String>, annotations: Annotations) -> Self {
        Self {
            kind: SegmentKind::Text,
            content: content.into(),
            url: None,
            annotations,
        }
    }

    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Link,
            content: content.into(),
            url: Some(url.into()),
            annotations: Annotations::default(),
        }
    }

    pub fn equation(expression: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Equation,
            content: expression.into(),
            url: None,
            annotations: Annotations::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
