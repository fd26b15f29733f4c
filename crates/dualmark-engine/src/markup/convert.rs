//! Heuristic markup → Markdown conversion.
//!
//! A best-effort, non-parsing, ordered sequence of pattern substitutions.
//! The order is load-bearing: inline substitutions must run before the
//! block wrappers that assume they already ran, tables before links so
//! anchor tags inside cells survive into pipe cells, and tag stripping and
//! entity decoding come last. This is a pragmatic inverse of the markup
//! serializer, not a verified round-trip; repeated conversion of the same
//! content is not guaranteed to be idempotent.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-3])[^>]*>(.*?)</h[1-3]>").expect("heading"));
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<pre>\s*<code(?:\s+class="language-([^"]*)")?[^>]*>(.*?)</code>\s*</pre>"#)
        .expect("code block")
});
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:strong|b)\b[^>]*>(.*?)</(?:strong|b)>").expect("bold"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:em|i)\b[^>]*>(.*?)</(?:em|i)>").expect("italic"));
static UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<u\b[^>]*>(.*?)</u>").expect("underline"));
static STRIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:del|s|strike)\b[^>]*>(.*?)</(?:del|s|strike)>").expect("strike")
});
static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<code\b[^>]*>(.*?)</code>").expect("code"));
static TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<table\b[^>]*>(.*?)</table>").expect("table"));
static TABLE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").expect("row"));
static TABLE_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(t[dh])[^>]*>(.*?)</t[dh]>").expect("cell"));
static EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div class="embed">\s*<iframe[^>]*src="([^"]*)"[^>]*>\s*</iframe>\s*</div>"#)
        .expect("embed")
});
static CALLOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div class="callout" style="background-color:\s*([^";]+)[^"]*">(.*?)</div>"#)
        .expect("callout")
});
static HR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<hr\s*/?>").expect("hr"));
static IMG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("img"));
static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)src\s*=\s*["']([^"']*)["']"#).expect("img src"));
static IMG_ALT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)alt\s*=\s*["']([^"']*)["']"#).expect("img alt"));
static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#).expect("link")
});
static OL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<ol\b[^>]*>(.*?)</ol>").expect("ol"));
static UL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<ul\b[^>]*>(.*?)</ul>").expect("ul"));
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li>").expect("li"));
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<blockquote\b[^>]*>(.*?)</blockquote>").expect("quote"));
static BLOCK_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(?:p|div)>").expect("block close"));
static BLOCK_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:p|div)\b[^>]*>").expect("block open"));
static BR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("br"));
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("any tag"));
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newlines"));

/// Converts markup to Markdown, best-effort.
pub fn markup_to_markdown(input: &str) -> String {
    let mut text = input.replace("\r\n", "\n");

    // Code blocks first so their content is out of reach of the inline
    // passes below.
    text = CODE_BLOCK
        .replace_all(&text, |caps: &Captures<'_>| {
            let lang = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            format!("\n\n```{lang}\n{}\n```\n\n", caps[2].trim_matches('\n'))
        })
        .into_owned();

    text = HEADING
        .replace_all(&text, |caps: &Captures<'_>| {
            let level: usize = caps[1].parse().unwrap_or(1);
            format!("\n\n{} {}\n\n", "#".repeat(level), caps[2].trim())
        })
        .into_owned();

    // Inline substitutions must precede every block wrapper below.
    text = BOLD.replace_all(&text, "**$1**").into_owned();
    text = ITALIC.replace_all(&text, "*$1*").into_owned();
    text = UNDERLINE.replace_all(&text, "++$1++").into_owned();
    text = STRIKE.replace_all(&text, "~~$1~~").into_owned();
    text = CODE.replace_all(&text, "`$1`").into_owned();

    text = TABLE
        .replace_all(&text, |caps: &Captures<'_>| convert_table(&caps[1]))
        .into_owned();

    text = EMBED
        .replace_all(&text, "\n\n{{embed $1}}\n\n")
        .into_owned();

    text = CALLOUT
        .replace_all(&text, |caps: &Captures<'_>| {
            let color = caps[1].trim();
            let body = markup_to_markdown(&caps[2]);
            let mut lines = vec![format!("[!{color}]")];
            lines.extend(body.lines().map(str::to_string));
            let quoted: Vec<String> = lines
                .iter()
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {line}")
                    }
                })
                .collect();
            format!("\n\n{}\n\n", quoted.join("\n"))
        })
        .into_owned();

    text = HR.replace_all(&text, "\n\n---\n\n").into_owned();

    text = IMG
        .replace_all(&text, |caps: &Captures<'_>| {
            let tag = caps.get(0).map(|m| m.as_str()).unwrap_or("");
            let src = IMG_SRC
                .captures(tag)
                .map(|c| c[1].to_string())
                .unwrap_or_default();
            let alt = IMG_ALT
                .captures(tag)
                .map(|c| c[1].to_string())
                .unwrap_or_default();
            if src.is_empty() {
                String::new()
            } else {
                format!("![{alt}]({src})")
            }
        })
        .into_owned();

    text = LINK.replace_all(&text, "[$2]($1)").into_owned();

    text = OL
        .replace_all(&text, |caps: &Captures<'_>| {
            let items: Vec<String> = LIST_ITEM
                .captures_iter(&caps[1])
                .enumerate()
                .map(|(idx, item)| format!("{}. {}", idx + 1, item[1].trim()))
                .collect();
            format!("\n\n{}\n\n", items.join("\n"))
        })
        .into_owned();

    text = UL
        .replace_all(&text, |caps: &Captures<'_>| {
            let items: Vec<String> = LIST_ITEM
                .captures_iter(&caps[1])
                .map(|item| format!("- {}", item[1].trim()))
                .collect();
            format!("\n\n{}\n\n", items.join("\n"))
        })
        .into_owned();

    text = BLOCKQUOTE
        .replace_all(&text, |caps: &Captures<'_>| {
            let body = markup_to_markdown(&caps[1]);
            let quoted: Vec<String> = body
                .lines()
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {line}")
                    }
                })
                .collect();
            format!("\n\n{}\n\n", quoted.join("\n"))
        })
        .into_owned();

    text = BLOCK_CLOSE.replace_all(&text, "\n\n").into_owned();
    text = BLOCK_OPEN.replace_all(&text, "").into_owned();
    text = BR.replace_all(&text, "\n").into_owned();

    // Cleanup: strip whatever tags are left, decode entities, collapse
    // the blank-line runs the substitutions above introduced.
    text = ANY_TAG.replace_all(&text, "").into_owned();
    text = html_escape::decode_html_entities(&text).into_owned();
    text = EXCESS_NEWLINES.replace_all(&text, "\n\n").into_owned();
    text.trim().to_string()
}

fn convert_table(inner: &str) -> String {
    let mut header: Option<Vec<String>> = None;
    let mut body: Vec<Vec<String>> = Vec::new();

    for row in TABLE_ROW.captures_iter(inner) {
        let mut is_header_row = false;
        let cells: Vec<String> = TABLE_CELL
            .captures_iter(&row[1])
            .map(|cell| {
                if cell[1].eq_ignore_ascii_case("th") {
                    is_header_row = true;
                }
                cell[2].split_whitespace().collect::<Vec<_>>().join(" ")
            })
            .collect();
        if cells.is_empty() {
            continue;
        }
        if is_header_row && header.is_none() {
            header = Some(cells);
        } else {
            body.push(cells);
        }
    }

    // No <th> row: promote the first data row so the output still parses
    // as a pipe table.
    let header = match header {
        Some(h) => h,
        None => {
            if body.is_empty() {
                return String::new();
            }
            body.remove(0)
        }
    };

    let mut lines = Vec::new();
    lines.push(format!("| {} |", header.join(" | ")));
    lines.push(format!("|{}", " --- |".repeat(header.len())));
    for row in body {
        lines.push(format!("| {} |", row.join(" | ")));
    }
    format!("\n\n{}\n\n", lines.join("\n"))
}
