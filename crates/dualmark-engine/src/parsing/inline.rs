//! Inline Markdown parsing.
//!
//! One regex alternation recognizes, in precedence order: bold-italic,
//! bold, italic, underline, strikethrough, code span, image, link. Plain
//! text runs between matches are backfilled as text nodes. Unmatched
//! markers (an unclosed `**`, a lone backtick) never match the pattern and
//! therefore survive as literal text.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{AstNode, Mark, builders};

static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
          \*\*\*(?P<bolditalic>[^*]+)\*\*\*
        | \*\*(?P<bold>[^*]+)\*\*
        | \*(?P<italic>[^*]+)\*
        | \+\+(?P<underline>[^+]+)\+\+
        | ~~(?P<strike>[^~]+)~~
        | `(?P<code>[^`]+)`
        | !\[(?P<img_alt>[^\]]*)\]\((?P<img_src>[^)]+)\)
        | \[(?P<link_text>[^\]]+)\]\((?P<link_href>[^)]+)\)
        ",
    )
    .expect("inline pattern is valid")
});

/// Parses one line of inline content into a node sequence.
///
/// Returns an empty vector for empty input; callers wrap as needed.
pub fn parse_inline(text: &str) -> Vec<AstNode> {
    let mut out = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(text) {
        let whole = caps.get(0).expect("group 0 always present");
        if whole.start() > last {
            out.push(builders::text(&text[last..whole.start()]));
        }
        out.push(node_for(&caps));
        last = whole.end();
    }

    if last < text.len() {
        out.push(builders::text(&text[last..]));
    }
    out
}

fn node_for(caps: &regex::Captures<'_>) -> AstNode {
    if let Some(m) = caps.name("bolditalic") {
        return builders::marked_text(m.as_str(), vec![Mark::Bold, Mark::Italic]);
    }
    if let Some(m) = caps.name("bold") {
        return builders::marked_text(m.as_str(), vec![Mark::Bold]);
    }
    if let Some(m) = caps.name("italic") {
        return builders::marked_text(m.as_str(), vec![Mark::Italic]);
    }
    if let Some(m) = caps.name("underline") {
        return builders::marked_text(m.as_str(), vec![Mark::Underline]);
    }
    if let Some(m) = caps.name("strike") {
        return builders::marked_text(m.as_str(), vec![Mark::Strikethrough]);
    }
    if let Some(m) = caps.name("code") {
        return builders::marked_text(m.as_str(), vec![Mark::Code]);
    }
    if let Some(src) = caps.name("img_src") {
        let alt = caps.name("img_alt").map(|m| m.as_str()).unwrap_or("");
        return builders::image(src.as_str(), alt);
    }
    match (caps.name("link_text"), caps.name("link_href")) {
        (Some(text), Some(href)) => {
            builders::link(href.as_str(), vec![builders::text(text.as_str())])
        }
        _ => builders::text(caps.get(0).map(|m| m.as_str()).unwrap_or("")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;

    #[test]
    fn test_plain_text_is_one_node() {
        assert_eq!(parse_inline("hello world"), vec![text("hello world")]);
    }

    #[test]
    fn test_bold_run_with_surrounding_text() {
        assert_eq!(
            parse_inline("Hello **world** again"),
            vec![text("Hello "), bold_text("world"), text(" again")]
        );
    }

    #[test]
    fn test_bold_italic_beats_bold() {
        assert_eq!(
            parse_inline("***x***"),
            vec![marked_text("x", vec![Mark::Bold, Mark::Italic])]
        );
    }

    #[test]
    fn test_strike_underline_code() {
        assert_eq!(
            parse_inline("~~a~~ ++b++ `c`"),
            vec![
                marked_text("a", vec![Mark::Strikethrough]),
                text(" "),
                marked_text("b", vec![Mark::Underline]),
                text(" "),
                marked_text("c", vec![Mark::Code]),
            ]
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            parse_inline("[site](https://example.com) ![pic](/a.png)"),
            vec![
                link("https://example.com", vec![text("site")]),
                text(" "),
                image("/a.png", "pic"),
            ]
        );
    }

    #[test]
    fn test_unclosed_markers_stay_literal() {
        assert_eq!(parse_inline("**unclosed"), vec![text("**unclosed")]);
        assert_eq!(parse_inline("`tick"), vec![text("`tick")]);
        assert_eq!(parse_inline("[text](no-close"), vec![text("[text](no-close")]);
    }

    #[test]
    fn test_empty_input_is_empty() {
        assert!(parse_inline("").is_empty());
    }
}
