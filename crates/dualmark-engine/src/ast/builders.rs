//! Constructor helpers for [`AstNode`] variants.
//!
//! Conversion code builds trees out of these instead of spelling out enum
//! variants with their default style fields everywhere.

use super::{AstNode, BlockStyle, Mark, TextStyle};

pub fn doc(content: Vec<AstNode>) -> AstNode {
    AstNode::Doc { content }
}

pub fn paragraph(content: Vec<AstNode>) -> AstNode {
    AstNode::Paragraph {
        style: BlockStyle::default(),
        content,
    }
}

pub fn heading(level: u8, content: Vec<AstNode>) -> AstNode {
    AstNode::Heading {
        level: level.clamp(1, 3),
        style: BlockStyle::default(),
        content,
    }
}

pub fn blockquote(content: Vec<AstNode>) -> AstNode {
    AstNode::Blockquote { content }
}

pub fn code_block(language: Option<String>, code: impl Into<String>) -> AstNode {
    AstNode::CodeBlock {
        language: language.filter(|l| !l.is_empty()),
        code: code.into(),
    }
}

pub fn list(ordered: bool, items: Vec<AstNode>) -> AstNode {
    AstNode::List {
        ordered,
        content: items,
    }
}

pub fn list_item(content: Vec<AstNode>) -> AstNode {
    AstNode::ListItem { content }
}

pub fn text(s: impl Into<String>) -> AstNode {
    AstNode::Text {
        text: s.into(),
        marks: Vec::new(),
        style: TextStyle::default(),
    }
}

pub fn marked_text(s: impl Into<String>, marks: Vec<Mark>) -> AstNode {
    AstNode::Text {
        text: s.into(),
        marks,
        style: TextStyle::default(),
    }
}

pub fn bold_text(s: impl Into<String>) -> AstNode {
    marked_text(s, vec![Mark::Bold])
}

pub fn italic_text(s: impl Into<String>) -> AstNode {
    marked_text(s, vec![Mark::Italic])
}

pub fn hard_break() -> AstNode {
    AstNode::HardBreak
}

pub fn image(src: impl Into<String>, alt: impl Into<String>) -> AstNode {
    AstNode::Image {
        src: src.into(),
        alt: alt.into(),
    }
}

pub fn link(href: impl Into<String>, content: Vec<AstNode>) -> AstNode {
    AstNode::Link {
        href: href.into(),
        content,
    }
}

pub fn horizontal_rule() -> AstNode {
    AstNode::HorizontalRule
}

pub fn callout(color: impl Into<String>, content: Vec<AstNode>) -> AstNode {
    AstNode::Callout {
        color: color.into(),
        content,
    }
}

pub fn embed(url: impl Into<String>) -> AstNode {
    AstNode::Embed { url: url.into() }
}

pub fn table(rows: Vec<AstNode>) -> AstNode {
    AstNode::Table { content: rows }
}

pub fn table_row(cells: Vec<AstNode>) -> AstNode {
    AstNode::TableRow { content: cells }
}

pub fn table_cell(header: bool, content: Vec<AstNode>) -> AstNode {
    AstNode::TableCell {
        header,
        background: None,
        foreground: None,
        content,
    }
}

/// An empty paragraph, the seed block of a fresh rich surface.
pub fn empty_paragraph() -> AstNode {
    paragraph(vec![text("")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_is_clamped() {
        match heading(7, vec![]) {
            AstNode::Heading { level, .. } => assert_eq!(level, 3),
            _ => panic!("expected Heading"),
        }
        match heading(0, vec![]) {
            AstNode::Heading { level, .. } => assert_eq!(level, 1),
            _ => panic!("expected Heading"),
        }
    }

    #[test]
    fn test_code_block_empty_language_is_none() {
        match code_block(Some(String::new()), "x") {
            AstNode::CodeBlock { language, .. } => assert!(language.is_none()),
            _ => panic!("expected CodeBlock"),
        }
    }
}
