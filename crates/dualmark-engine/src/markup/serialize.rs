//! AST → markup.
//!
//! Mirrors the Markdown serializer's recursion, mapping variants to their
//! tag equivalents. Blocks concatenate without separators; whitespace
//! between tags is never significant to the rich surface. Embed nodes
//! re-derive their playable URL here at render time rather than storing it
//! in the tree.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::ast::{AstNode, BlockStyle, Mark, TextStyle};
use crate::markup::embed;

/// Serializes a node (usually a `Doc`) to markup.
pub fn serialize(node: &AstNode) -> String {
    match node {
        AstNode::Doc { content } => content.iter().map(serialize_block).collect(),
        _ => serialize_block(node),
    }
}

fn serialize_block(node: &AstNode) -> String {
    match node {
        AstNode::Doc { content } => content.iter().map(serialize_block).collect(),
        AstNode::Paragraph { style, content } => {
            format!("<p{}>{}</p>", block_style_attr(style), inline_seq(content))
        }
        AstNode::Heading { level, style, content } => {
            format!(
                "<h{level}{}>{}</h{level}>",
                block_style_attr(style),
                inline_seq(content)
            )
        }
        AstNode::Blockquote { content } => {
            format!(
                "<blockquote>{}</blockquote>",
                content.iter().map(serialize_block).collect::<String>()
            )
        }
        AstNode::Callout { color, content } => {
            format!(
                "<div class=\"callout\" style=\"background-color: {}\">{}</div>",
                encode_double_quoted_attribute(color),
                content.iter().map(serialize_block).collect::<String>()
            )
        }
        AstNode::CodeBlock { language, code } => {
            let class = language
                .as_deref()
                .map(|lang| {
                    format!(" class=\"language-{}\"", encode_double_quoted_attribute(lang))
                })
                .unwrap_or_default();
            format!("<pre><code{class}>{}</code></pre>", encode_text(code))
        }
        AstNode::List { ordered, content } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let items: String = content
                .iter()
                .map(|item| {
                    format!(
                        "<li>{}</li>",
                        item.children().map(inline_seq).unwrap_or_default()
                    )
                })
                .collect();
            format!("<{tag}>{items}</{tag}>")
        }
        AstNode::HorizontalRule => "<hr>".to_string(),
        AstNode::Embed { url } => match embed::playable_url(url) {
            Some(playable) => format!(
                "<div class=\"embed\"><iframe src=\"{}\" frameborder=\"0\" allowfullscreen></iframe></div>",
                encode_double_quoted_attribute(&playable)
            ),
            // Unrecognized host: degrade to a link card, never a broken frame.
            None => format!(
                "<p><a class=\"link-card\" href=\"{}\">{}</a></p>",
                encode_double_quoted_attribute(url),
                encode_text(url)
            ),
        },
        AstNode::Table { content } => serialize_table(content),
        other => serialize_inline(other),
    }
}

fn serialize_table(rows: &[AstNode]) -> String {
    let (head, body): (Vec<_>, Vec<_>) = rows.iter().partition(|row| {
        row.children()
            .map(|cells| {
                !cells.is_empty()
                    && cells
                        .iter()
                        .all(|cell| matches!(cell, AstNode::TableCell { header: true, .. }))
            })
            .unwrap_or(false)
    });

    let mut out = String::from("<table>");
    if !head.is_empty() {
        out.push_str("<thead>");
        for row in &head {
            out.push_str(&serialize_row(row));
        }
        out.push_str("</thead>");
    }
    out.push_str("<tbody>");
    for row in &body {
        out.push_str(&serialize_row(row));
    }
    out.push_str("</tbody></table>");
    out
}

fn serialize_row(row: &AstNode) -> String {
    let cells: String = row
        .children()
        .map(|cells| cells.iter().map(serialize_cell).collect())
        .unwrap_or_default();
    format!("<tr>{cells}</tr>")
}

fn serialize_cell(cell: &AstNode) -> String {
    let AstNode::TableCell {
        header,
        background,
        foreground,
        content,
    } = cell
    else {
        return String::new();
    };

    let tag = if *header { "th" } else { "td" };
    let mut props = Vec::new();
    if let Some(bg) = background {
        props.push(format!("background-color: {bg}"));
    }
    if let Some(fg) = foreground {
        props.push(format!("color: {fg}"));
    }
    let style = if props.is_empty() {
        String::new()
    } else {
        format!(
            " style=\"{}\"",
            encode_double_quoted_attribute(&props.join("; "))
        )
    };
    format!("<{tag}{style}>{}</{tag}>", inline_seq(content))
}

fn inline_seq(nodes: &[AstNode]) -> String {
    nodes.iter().map(serialize_inline).collect()
}

fn serialize_inline(node: &AstNode) -> String {
    match node {
        AstNode::Text { text, marks, style } => {
            let mut out = wrap_marks(&encode_text(text), marks);
            if let Some(attr) = text_style_attr(style) {
                out = format!("<span{attr}>{out}</span>");
            }
            out
        }
        AstNode::HardBreak => "<br>".to_string(),
        AstNode::Image { src, alt } => format!(
            "<img src=\"{}\" alt=\"{}\">",
            encode_double_quoted_attribute(src),
            encode_double_quoted_attribute(alt)
        ),
        AstNode::Link { href, content } => format!(
            "<a href=\"{}\">{}</a>",
            encode_double_quoted_attribute(href),
            inline_seq(content)
        ),
        other => encode_text(&other.plain_text()).into_owned(),
    }
}

/// Mark order defines nesting: the first mark ends up outermost.
fn wrap_marks(text: &str, marks: &[Mark]) -> String {
    marks.iter().rev().fold(text.to_string(), |acc, mark| {
        let tag = match mark {
            Mark::Bold => "strong",
            Mark::Italic => "em",
            Mark::Underline => "u",
            Mark::Strikethrough => "del",
            Mark::Code => "code",
        };
        format!("<{tag}>{acc}</{tag}>")
    })
}

fn block_style_attr(style: &BlockStyle) -> String {
    let mut props = Vec::new();
    if let Some(align) = &style.align {
        props.push(format!("text-align: {}", align.css_value()));
    }
    if let Some(lh) = &style.line_height {
        props.push(format!("line-height: {lh}"));
    }
    if props.is_empty() {
        String::new()
    } else {
        format!(
            " style=\"{}\"",
            encode_double_quoted_attribute(&props.join("; "))
        )
    }
}

fn text_style_attr(style: &TextStyle) -> Option<String> {
    let mut props = Vec::new();
    if let Some(color) = &style.color {
        props.push(format!("color: {color}"));
    }
    if let Some(bg) = &style.background {
        props.push(format!("background-color: {bg}"));
    }
    if let Some(family) = &style.font_family {
        props.push(format!("font-family: {family}"));
    }
    if let Some(size) = &style.font_size {
        props.push(format!("font-size: {size}"));
    }
    if props.is_empty() {
        None
    } else {
        Some(format!(
            " style=\"{}\"",
            encode_double_quoted_attribute(&props.join("; "))
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Alignment, builders::*};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_heading_and_paragraph() {
        let ast = doc(vec![
            heading(1, vec![text("Title")]),
            paragraph(vec![text("Hello "), bold_text("world")]),
        ]);
        assert_eq!(
            serialize(&ast),
            "<h1>Title</h1><p>Hello <strong>world</strong></p>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let ast = paragraph(vec![text("a < b & c")]);
        assert_eq!(serialize(&ast), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_mark_nesting_order() {
        let ast = paragraph(vec![marked_text("x", vec![Mark::Bold, Mark::Italic])]);
        assert_eq!(serialize(&ast), "<p><strong><em>x</em></strong></p>");
    }

    #[test]
    fn test_block_style_attrs() {
        let mut node = paragraph(vec![text("centered")]);
        if let AstNode::Paragraph { style, .. } = &mut node {
            style.align = Some(Alignment::Center);
            style.line_height = Some("1.8".to_string());
        }
        assert_eq!(
            serialize(&node),
            "<p style=\"text-align: center; line-height: 1.8\">centered</p>"
        );
    }

    #[test]
    fn test_recognized_embed_gets_iframe() {
        let ast = embed("https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(
            serialize(&ast),
            "<div class=\"embed\"><iframe src=\"https://www.youtube.com/embed/dQw4w9WgXcQ\" frameborder=\"0\" allowfullscreen></iframe></div>"
        );
    }

    #[test]
    fn test_unrecognized_embed_degrades_to_link_card() {
        let ast = embed("https://example.com/video/9");
        assert_eq!(
            serialize(&ast),
            "<p><a class=\"link-card\" href=\"https://example.com/video/9\">https://example.com/video/9</a></p>"
        );
    }

    #[test]
    fn test_table_with_header_and_cell_colors() {
        let mut cell = table_cell(false, vec![text("x")]);
        if let AstNode::TableCell { background, .. } = &mut cell {
            *background = Some("#ffe0e0".to_string());
        }
        let ast = table(vec![
            table_row(vec![table_cell(true, vec![text("h")])]),
            table_row(vec![cell]),
        ]);
        assert_eq!(
            serialize(&ast),
            "<table><thead><tr><th>h</th></tr></thead><tbody><tr><td style=\"background-color: #ffe0e0\">x</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_code_block_language_class() {
        let ast = code_block(Some("rust".into()), "let x = 1;");
        assert_eq!(
            serialize(&ast),
            "<pre><code class=\"language-rust\">let x = 1;</code></pre>"
        );
    }

    #[test]
    fn test_callout_markup() {
        let ast = callout("#ffe066", vec![paragraph(vec![text("note")])]);
        assert_eq!(
            serialize(&ast),
            "<div class=\"callout\" style=\"background-color: #ffe066\"><p>note</p></div>"
        );
    }
}
