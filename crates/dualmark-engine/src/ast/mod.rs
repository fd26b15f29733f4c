//! Canonical document model.
//!
//! Every conversion in the engine goes through [`AstNode`]: Markdown text is
//! parsed into it, markup is serialized out of it, and the rich editing
//! surface mutates it structurally. The tree is independent of both source
//! formats; neither Markdown syntax nor markup tags leak into it.
//!
//! Structural invariants:
//! - A whole document has exactly one [`AstNode::Doc`] root. Sub-trees
//!   (callout bodies, quoted content) omit the root wrapper.
//! - A [`AstNode::Table`]'s children are exclusively [`AstNode::TableRow`],
//!   whose children are exclusively [`AstNode::TableCell`].
//! - `marks` order on a text node defines nesting when serialized.

pub mod builders;

use serde::{Deserialize, Serialize};

/// Inline formatting applied to a text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

/// Horizontal alignment for paragraph-level blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn css_value(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

/// Block-level presentation attributes carried by paragraphs and headings.
///
/// These survive only in markup; the Markdown serializer drops them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
}

impl BlockStyle {
    pub fn is_empty(&self) -> bool {
        self.align.is_none() && self.line_height.is_none()
    }
}

/// Character-level presentation attributes carried by text nodes.
///
/// Like [`BlockStyle`], these are markup-only and lost on the Markdown side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
}

impl TextStyle {
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
            && self.background.is_none()
            && self.font_family.is_none()
            && self.font_size.is_none()
    }
}

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AstNode {
    Doc {
        content: Vec<AstNode>,
    },
    Paragraph {
        #[serde(default, skip_serializing_if = "BlockStyle::is_empty")]
        style: BlockStyle,
        content: Vec<AstNode>,
    },
    Heading {
        level: u8,
        #[serde(default, skip_serializing_if = "BlockStyle::is_empty")]
        style: BlockStyle,
        content: Vec<AstNode>,
    },
    Blockquote {
        content: Vec<AstNode>,
    },
    CodeBlock {
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        code: String,
    },
    List {
        ordered: bool,
        content: Vec<AstNode>,
    },
    ListItem {
        content: Vec<AstNode>,
    },
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        marks: Vec<Mark>,
        #[serde(default, skip_serializing_if = "TextStyle::is_empty")]
        style: TextStyle,
    },
    HardBreak,
    Image {
        src: String,
        alt: String,
    },
    Link {
        href: String,
        content: Vec<AstNode>,
    },
    HorizontalRule,
    Callout {
        color: String,
        content: Vec<AstNode>,
    },
    Embed {
        url: String,
    },
    Table {
        content: Vec<AstNode>,
    },
    TableRow {
        content: Vec<AstNode>,
    },
    TableCell {
        #[serde(default)]
        header: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        background: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        foreground: Option<String>,
        content: Vec<AstNode>,
    },
}

impl AstNode {
    /// Child nodes of a container variant, `None` for leaf variants.
    pub fn children(&self) -> Option<&[AstNode]> {
        match self {
            AstNode::Doc { content }
            | AstNode::Paragraph { content, .. }
            | AstNode::Heading { content, .. }
            | AstNode::Blockquote { content }
            | AstNode::List { content, .. }
            | AstNode::ListItem { content }
            | AstNode::Link { content, .. }
            | AstNode::Callout { content, .. }
            | AstNode::Table { content }
            | AstNode::TableRow { content }
            | AstNode::TableCell { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<AstNode>> {
        match self {
            AstNode::Doc { content }
            | AstNode::Paragraph { content, .. }
            | AstNode::Heading { content, .. }
            | AstNode::Blockquote { content }
            | AstNode::List { content, .. }
            | AstNode::ListItem { content }
            | AstNode::Link { content, .. }
            | AstNode::Callout { content, .. }
            | AstNode::Table { content }
            | AstNode::TableRow { content }
            | AstNode::TableCell { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Whether this variant lives at block level (direct child of a doc,
    /// callout body, blockquote or list item).
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            AstNode::Paragraph { .. }
                | AstNode::Heading { .. }
                | AstNode::Blockquote { .. }
                | AstNode::CodeBlock { .. }
                | AstNode::List { .. }
                | AstNode::HorizontalRule
                | AstNode::Callout { .. }
                | AstNode::Embed { .. }
                | AstNode::Table { .. }
        )
    }

    /// Concatenated text content of this subtree, markers and tags excluded.
    pub fn plain_text(&self) -> String {
        match self {
            AstNode::Text { text, .. } => text.clone(),
            AstNode::CodeBlock { code, .. } => code.clone(),
            AstNode::Image { alt, .. } => alt.clone(),
            AstNode::HardBreak => "\n".to_string(),
            _ => self
                .children()
                .map(|children| children.iter().map(AstNode::plain_text).collect())
                .unwrap_or_default(),
        }
    }

    /// Checks the table shape invariant for this subtree: tables contain
    /// only rows, rows contain only cells.
    pub fn table_shape_is_valid(&self) -> bool {
        match self {
            AstNode::Table { content } => content.iter().all(|row| {
                matches!(row, AstNode::TableRow { .. }) && row.table_shape_is_valid()
            }),
            AstNode::TableRow { content } => content.iter().all(|cell| {
                matches!(cell, AstNode::TableCell { .. }) && cell.table_shape_is_valid()
            }),
            _ => self
                .children()
                .map(|children| children.iter().all(AstNode::table_shape_is_valid))
                .unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::builders::*;
    use super::*;

    #[test]
    fn test_children_on_containers_and_leaves() {
        let para = paragraph(vec![text("hi")]);
        assert_eq!(para.children().unwrap().len(), 1);
        assert!(AstNode::HorizontalRule.children().is_none());
        assert!(text("x").children().is_none());
    }

    #[test]
    fn test_plain_text_recurses() {
        let node = doc(vec![
            heading(1, vec![text("Title")]),
            paragraph(vec![text("Hello "), bold_text("world")]),
        ]);
        assert_eq!(node.plain_text(), "TitleHello world");
    }

    #[test]
    fn test_table_shape_invariant() {
        let good = table(vec![table_row(vec![table_cell(false, vec![text("a")])])]);
        assert!(good.table_shape_is_valid());

        let bad = AstNode::Table {
            content: vec![paragraph(vec![text("not a row")])],
        };
        assert!(!bad.table_shape_is_valid());
    }

    #[test]
    fn test_mark_order_is_preserved() {
        let node = marked_text("x", vec![Mark::Bold, Mark::Italic]);
        match node {
            AstNode::Text { marks, .. } => assert_eq!(marks, vec![Mark::Bold, Mark::Italic]),
            _ => panic!("expected Text"),
        }
    }

    #[test]
    fn test_block_classification() {
        assert!(paragraph(vec![]).is_block());
        assert!(AstNode::HorizontalRule.is_block());
        assert!(!text("x").is_block());
        assert!(!table_row(vec![]).is_block());
    }
}
