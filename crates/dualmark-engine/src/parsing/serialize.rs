//! AST → canonical Markdown text.
//!
//! Structural recursion over the tree. Presentation-only attributes
//! (alignment, fonts, colors on text runs) have no Markdown spelling and
//! are dropped; that loss is one-directional and accepted.

use crate::ast::{AstNode, Mark};

/// Serializes a node (usually a `Doc`) to Markdown.
pub fn serialize(node: &AstNode) -> String {
    match node {
        AstNode::Doc { content } => serialize_blocks(content),
        _ => serialize_block(node),
    }
}

pub(crate) fn serialize_blocks(blocks: &[AstNode]) -> String {
    blocks
        .iter()
        .map(serialize_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn serialize_block(node: &AstNode) -> String {
    match node {
        AstNode::Doc { content } => serialize_blocks(content),
        AstNode::Paragraph { content, .. } => serialize_inline_seq(content),
        AstNode::Heading { level, content, .. } => {
            format!("{} {}", "#".repeat(*level as usize), serialize_inline_seq(content))
        }
        AstNode::Blockquote { content } => quote_lines(&serialize_blocks(content)),
        AstNode::Callout { color, content } => {
            let body = serialize_blocks(content);
            let inner = if body.is_empty() {
                format!("[!{color}]")
            } else {
                format!("[!{color}]\n{body}")
            };
            quote_lines(&inner)
        }
        AstNode::CodeBlock { language, code } => {
            format!("```{}\n{}\n```", language.as_deref().unwrap_or(""), code)
        }
        AstNode::List { ordered, content } => content
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let body = item
                    .children()
                    .map(serialize_inline_seq)
                    .unwrap_or_default();
                if *ordered {
                    format!("{}. {}", idx + 1, body)
                } else {
                    format!("- {body}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        AstNode::HorizontalRule => "---".to_string(),
        AstNode::Embed { url } => format!("{{{{embed {url}}}}}"),
        AstNode::Table { content } => serialize_table(content),
        // Inline nodes reached directly (sub-tree serialization).
        other => serialize_inline(other),
    }
}

fn quote_lines(body: &str) -> String {
    body.lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pipe-table serialization. A table whose first row is not made of header
/// cells still gets a header line: the first data row is promoted, so the
/// output always parses back as a table.
fn serialize_table(rows: &[AstNode]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut lines = Vec::new();
    let header = &rows[0];
    let cols = header.children().map(|c| c.len()).unwrap_or(0).max(1);

    lines.push(row_line(header));
    lines.push(format!("|{}", " --- |".repeat(cols)));
    for row in &rows[1..] {
        lines.push(row_line(row));
    }
    lines.join("\n")
}

fn row_line(row: &AstNode) -> String {
    let cells = row
        .children()
        .map(|cells| {
            cells
                .iter()
                .map(|cell| {
                    cell.children()
                        .map(serialize_inline_seq)
                        .unwrap_or_default()
                        .replace('|', "\\|")
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    format!("| {} |", cells.join(" | "))
}

pub(crate) fn serialize_inline_seq(nodes: &[AstNode]) -> String {
    nodes.iter().map(serialize_inline).collect()
}

fn serialize_inline(node: &AstNode) -> String {
    match node {
        AstNode::Text { text, marks, .. } => wrap_marks(text, marks),
        AstNode::HardBreak => "\n".to_string(),
        AstNode::Image { src, alt } => format!("![{alt}]({src})"),
        AstNode::Link { href, content } => {
            format!("[{}]({href})", serialize_inline_seq(content))
        }
        other => other.plain_text(),
    }
}

/// Mark order defines nesting: the first mark ends up outermost.
fn wrap_marks(text: &str, marks: &[Mark]) -> String {
    if marks.len() == 2
        && marks.contains(&Mark::Bold)
        && marks.contains(&Mark::Italic)
    {
        return format!("***{text}***");
    }
    marks.iter().rev().fold(text.to_string(), |acc, mark| match mark {
        Mark::Bold => format!("**{acc}**"),
        Mark::Italic => format!("*{acc}*"),
        Mark::Underline => format!("++{acc}++"),
        Mark::Strikethrough => format!("~~{acc}~~"),
        Mark::Code => format!("`{acc}`"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::parsing::parse_document;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_heading_and_paragraph() {
        let ast = doc(vec![
            heading(1, vec![text("Title")]),
            paragraph(vec![text("Hello "), bold_text("world")]),
        ]);
        assert_eq!(serialize(&ast), "# Title\n\nHello **world**");
    }

    #[test]
    fn test_marks_nest_in_order() {
        assert_eq!(wrap_marks("x", &[Mark::Bold, Mark::Italic]), "***x***");
        assert_eq!(
            wrap_marks("x", &[Mark::Strikethrough, Mark::Code]),
            "~~`x`~~"
        );
        assert_eq!(wrap_marks("x", &[Mark::Underline]), "++x++");
    }

    #[test]
    fn test_list_serialization() {
        let ast = doc(vec![list(
            true,
            vec![list_item(vec![text("first")]), list_item(vec![text("second")])],
        )]);
        assert_eq!(serialize(&ast), "1. first\n2. second");
    }

    #[test]
    fn test_callout_serialization() {
        let ast = doc(vec![callout("#ffe066", vec![paragraph(vec![text("note")])])]);
        assert_eq!(serialize(&ast), "> [!#ffe066]\n> note");
    }

    #[test]
    fn test_table_header_synthesis() {
        // No header cells anywhere: first data row is promoted.
        let ast = table(vec![
            table_row(vec![
                table_cell(false, vec![text("a")]),
                table_cell(false, vec![text("b")]),
            ]),
            table_row(vec![
                table_cell(false, vec![text("1")]),
                table_cell(false, vec![text("2")]),
            ]),
        ]);
        assert_eq!(serialize(&ast), "| a | b |\n| --- | --- |\n| 1 | 2 |");
    }

    #[test]
    fn test_embed_shortcode_roundtrip() {
        let ast = doc(vec![embed("https://vimeo.com/12345")]);
        let md = serialize(&ast);
        assert_eq!(md, "{{embed https://vimeo.com/12345}}");
        assert_eq!(parse_document(&md), ast);
    }

    #[test]
    fn test_parse_serialize_roundtrip_for_common_constructs() {
        let md = "# Title\n\nHello **world** and *italics*\n\n- one\n- two\n\n> quoted\n\n---\n\n| h1 | h2 |\n| --- | --- |\n| a | b |";
        let ast = parse_document(md);
        assert_eq!(serialize(&ast), md);
    }

    #[test]
    fn test_hard_break_survives_roundtrip() {
        let md = "line one\nline two";
        assert_eq!(serialize(&parse_document(md)), md);
    }
}
