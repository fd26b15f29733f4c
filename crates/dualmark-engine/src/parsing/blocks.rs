//! Block-level Markdown parsing.
//!
//! A single forward scan over lines. Each line is tested against block
//! starters in priority order: embed shortcode, pipe table, horizontal
//! rule, fenced code block, ATX heading, callout quote, blockquote,
//! unordered list, ordered list, blank. Anything else accumulates into the
//! current paragraph until the next starter or blank line.
//!
//! Quoted content is re-parsed recursively after stripping one `>` level,
//! so nested quotes and callout bodies reuse the same scan.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::{AstNode, builders};
use crate::parsing::inline::parse_inline;

static EMBED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\{embed\s+(\S+)\}\}\s*$").expect("embed pattern"));
static TABLE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|.*\|\s*$").expect("table row pattern"));
static TABLE_SEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|(?:\s*:?-{2,}:?\s*\|)+\s*$").expect("table sep pattern"));
static HR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,})\s*$").expect("hr pattern"));
static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(\S*)\s*$").expect("fence pattern"));
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,3})\s+(.*)$").expect("heading pattern"));
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s?(.*)$").expect("quote pattern"));
static CALLOUT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[!([^\]\s][^\]]*)\]\s*$").expect("callout marker pattern"));
static UL_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*+]\s+(.*)$").expect("ul pattern"));
static OL_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").expect("ol pattern"));

/// Parses a whole Markdown document into a `Doc`-rooted tree.
pub fn parse_document(input: &str) -> AstNode {
    builders::doc(parse_blocks(input))
}

/// Parses Markdown into a block sequence without the `Doc` wrapper.
///
/// Used for sub-trees (blockquote and callout bodies) as well as the
/// document body.
pub(crate) fn parse_blocks(input: &str) -> Vec<AstNode> {
    let lines: Vec<&str> = input.lines().collect();
    let mut blocks = Vec::new();
    let mut paragraph_lines: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            flush_paragraph(&mut blocks, &mut paragraph_lines);
            i += 1;
            continue;
        }

        if let Some(caps) = EMBED.captures(line) {
            flush_paragraph(&mut blocks, &mut paragraph_lines);
            blocks.push(builders::embed(&caps[1]));
            i += 1;
            continue;
        }

        if is_table_start(&lines, i) {
            flush_paragraph(&mut blocks, &mut paragraph_lines);
            i = parse_table(&lines, i, &mut blocks);
            continue;
        }

        if HR.is_match(line) {
            flush_paragraph(&mut blocks, &mut paragraph_lines);
            blocks.push(builders::horizontal_rule());
            i += 1;
            continue;
        }

        if let Some(caps) = FENCE_OPEN.captures(line) {
            flush_paragraph(&mut blocks, &mut paragraph_lines);
            let language = Some(caps[1].to_string());
            i = parse_fence(&lines, i + 1, language, &mut blocks);
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            flush_paragraph(&mut blocks, &mut paragraph_lines);
            let level = caps[1].len() as u8;
            blocks.push(builders::heading(level, parse_inline(&caps[2])));
            i += 1;
            continue;
        }

        if QUOTE.is_match(line) {
            flush_paragraph(&mut blocks, &mut paragraph_lines);
            i = parse_quote(&lines, i, &mut blocks);
            continue;
        }

        if UL_ITEM.is_match(line) {
            flush_paragraph(&mut blocks, &mut paragraph_lines);
            i = parse_list(&lines, i, false, &mut blocks);
            continue;
        }

        if OL_ITEM.is_match(line) {
            flush_paragraph(&mut blocks, &mut paragraph_lines);
            i = parse_list(&lines, i, true, &mut blocks);
            continue;
        }

        paragraph_lines.push(line);
        i += 1;
    }

    flush_paragraph(&mut blocks, &mut paragraph_lines);
    blocks
}

fn flush_paragraph(blocks: &mut Vec<AstNode>, lines: &mut Vec<&str>) {
    if lines.is_empty() {
        return;
    }
    let mut content = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            content.push(builders::hard_break());
        }
        content.extend(parse_inline(line));
    }
    blocks.push(builders::paragraph(content));
    lines.clear();
}

fn is_table_start(lines: &[&str], i: usize) -> bool {
    TABLE_ROW.is_match(lines[i])
        && lines
            .get(i + 1)
            .map(|next| TABLE_SEP.is_match(next))
            .unwrap_or(false)
}

fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed
        .strip_prefix('|')
        .unwrap_or(trimmed)
        .strip_suffix('|')
        .unwrap_or(trimmed);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

fn parse_table(lines: &[&str], mut i: usize, blocks: &mut Vec<AstNode>) -> usize {
    let header_cells = split_row(lines[i]);
    i += 2; // header + separator

    let mut rows = vec![builders::table_row(
        header_cells
            .iter()
            .map(|cell| builders::table_cell(true, parse_inline(cell)))
            .collect(),
    )];

    while i < lines.len() && TABLE_ROW.is_match(lines[i]) && !TABLE_SEP.is_match(lines[i]) {
        let cells = split_row(lines[i]);
        rows.push(builders::table_row(
            cells
                .iter()
                .map(|cell| builders::table_cell(false, parse_inline(cell)))
                .collect(),
        ));
        i += 1;
    }

    blocks.push(builders::table(rows));
    i
}

fn parse_fence(
    lines: &[&str],
    mut i: usize,
    language: Option<String>,
    blocks: &mut Vec<AstNode>,
) -> usize {
    let mut code_lines = Vec::new();
    // Greedy: an unclosed fence swallows the rest of the input.
    while i < lines.len() {
        if lines[i].trim_end() == "```" {
            i += 1;
            break;
        }
        code_lines.push(lines[i]);
        i += 1;
    }
    blocks.push(builders::code_block(language, code_lines.join("\n")));
    i
}

fn parse_quote(lines: &[&str], mut i: usize, blocks: &mut Vec<AstNode>) -> usize {
    let mut body = Vec::new();
    while i < lines.len() {
        match QUOTE.captures(lines[i]) {
            Some(caps) => {
                body.push(caps.get(1).map(|m| m.as_str()).unwrap_or("").to_string());
                i += 1;
            }
            None => break,
        }
    }

    if let Some(first) = body.first()
        && let Some(caps) = CALLOUT_MARKER.captures(first)
    {
        let color = caps[1].to_string();
        let rest = body[1..].join("\n");
        blocks.push(builders::callout(color, parse_blocks(&rest)));
    } else {
        blocks.push(builders::blockquote(parse_blocks(&body.join("\n"))));
    }
    i
}

fn parse_list(lines: &[&str], mut i: usize, ordered: bool, blocks: &mut Vec<AstNode>) -> usize {
    let pattern: &Regex = if ordered { &OL_ITEM } else { &UL_ITEM };
    let mut items = Vec::new();

    while i < lines.len() {
        match pattern.captures(lines[i]) {
            Some(caps) => {
                items.push(builders::list_item(parse_inline(&caps[1])));
                i += 1;
            }
            None => break,
        }
    }

    blocks.push(builders::list(ordered, items));
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Mark;
    use crate::ast::builders::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_heading_and_paragraph() {
        let ast = parse_document("# Title\n\nHello **world**");
        assert_eq!(
            ast,
            doc(vec![
                heading(1, vec![text("Title")]),
                paragraph(vec![text("Hello "), bold_text("world")]),
            ])
        );
    }

    #[rstest]
    #[case("# one", 1)]
    #[case("## two", 2)]
    #[case("### three", 3)]
    fn test_heading_levels(#[case] input: &str, #[case] level: u8) {
        let ast = parse_document(input);
        assert_eq!(ast, doc(vec![heading(level, vec![text(&input[level as usize + 1..])])]));
    }

    #[test]
    fn test_four_hashes_is_a_paragraph() {
        let ast = parse_document("#### nope");
        assert_eq!(ast, doc(vec![paragraph(vec![text("#### nope")])]));
    }

    #[test]
    fn test_paragraph_accumulates_until_starter() {
        let ast = parse_document("line one\nline two\n# Head");
        assert_eq!(
            ast,
            doc(vec![
                paragraph(vec![text("line one"), hard_break(), text("line two")]),
                heading(1, vec![text("Head")]),
            ])
        );
    }

    #[test]
    fn test_fenced_code_block() {
        let ast = parse_document("```rust\nfn main() {}\n```\nafter");
        assert_eq!(
            ast,
            doc(vec![
                code_block(Some("rust".into()), "fn main() {}"),
                paragraph(vec![text("after")]),
            ])
        );
    }

    #[test]
    fn test_unclosed_fence_is_greedy() {
        let ast = parse_document("```\ncode\nmore");
        assert_eq!(ast, doc(vec![code_block(None, "code\nmore")]));
    }

    #[test]
    fn test_unordered_and_ordered_lists() {
        let ast = parse_document("- a\n- b\n\n1. x\n2. y");
        assert_eq!(
            ast,
            doc(vec![
                list(false, vec![list_item(vec![text("a")]), list_item(vec![text("b")])]),
                list(true, vec![list_item(vec![text("x")]), list_item(vec![text("y")])]),
            ])
        );
    }

    #[test]
    fn test_blockquote_nested_content() {
        let ast = parse_document("> # quoted head\n> body");
        assert_eq!(
            ast,
            doc(vec![blockquote(vec![
                heading(1, vec![text("quoted head")]),
                paragraph(vec![text("body")]),
            ])])
        );
    }

    #[test]
    fn test_callout_quote() {
        let ast = parse_document("> [!#ffe066]\n> note body");
        assert_eq!(
            ast,
            doc(vec![callout("#ffe066", vec![paragraph(vec![text("note body")])])])
        );
    }

    #[test]
    fn test_plain_quote_without_marker_stays_blockquote() {
        let ast = parse_document("> just a quote");
        assert_eq!(
            ast,
            doc(vec![blockquote(vec![paragraph(vec![text("just a quote")])])])
        );
    }

    #[test]
    fn test_pipe_table_with_header() {
        let ast = parse_document("| a | b |\n| --- | --- |\n| 1 | 2 |");
        assert_eq!(
            ast,
            doc(vec![table(vec![
                table_row(vec![
                    table_cell(true, vec![text("a")]),
                    table_cell(true, vec![text("b")]),
                ]),
                table_row(vec![
                    table_cell(false, vec![text("1")]),
                    table_cell(false, vec![text("2")]),
                ]),
            ])])
        );
    }

    #[test]
    fn test_pipe_row_without_separator_is_paragraph() {
        let ast = parse_document("| not | a table |");
        assert_eq!(ast, doc(vec![paragraph(vec![text("| not | a table |")])]));
    }

    #[test]
    fn test_horizontal_rule_variants() {
        for rule in ["---", "-----", "***", "___"] {
            assert_eq!(
                parse_document(rule),
                doc(vec![horizontal_rule()]),
                "input: {rule}"
            );
        }
    }

    #[test]
    fn test_embed_shortcode() {
        let ast = parse_document("{{embed https://youtu.be/abc123}}");
        assert_eq!(ast, doc(vec![embed("https://youtu.be/abc123")]));
    }

    #[test]
    fn test_embed_requires_exact_shape() {
        let ast = parse_document("{{embed}}");
        assert_eq!(ast, doc(vec![paragraph(vec![text("{{embed}}")])]));
    }

    #[test]
    fn test_inline_marks_inside_heading() {
        let ast = parse_document("## with *em*");
        assert_eq!(
            ast,
            doc(vec![heading(
                2,
                vec![text("with "), marked_text("em", vec![Mark::Italic])]
            )])
        );
    }

    #[test]
    fn test_empty_input_is_empty_doc() {
        assert_eq!(parse_document(""), doc(vec![]));
        assert_eq!(parse_document("\n\n\n"), doc(vec![]));
    }
}
