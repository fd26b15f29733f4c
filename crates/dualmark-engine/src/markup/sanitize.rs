//! Allow-list markup sanitizer.
//!
//! Everything rendered into the rich surface passes through here first.
//! Tags outside the allow-list are stripped (their text content survives),
//! attributes are rebuilt from a per-tag allow-list, style declarations are
//! limited to a fixed property set, and URLs with executable schemes are
//! dropped. Iframes are special-cased: the whole element is removed unless
//! its `src` is one of the recognized playable embed hosts.
//!
//! Hostile input degrades to plain text and structure; it never errors.

use std::sync::LazyLock;

use regex::Regex;

use crate::markup::embed;

const ALLOWED_TAGS: [&str; 29] = [
    "p", "h1", "h2", "h3", "ul", "ol", "li", "blockquote", "pre", "code", "strong", "em", "b",
    "i", "u", "del", "s", "a", "img", "br", "hr", "table", "thead", "tbody", "tr", "th", "td",
    "div", "span",
];

const ALLOWED_STYLE_PROPS: [&str; 6] = [
    "color",
    "background-color",
    "text-align",
    "line-height",
    "font-family",
    "font-size",
];

const ALLOWED_CLASSES: [&str; 3] = ["callout", "embed", "link-card"];

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern"));
static SCRIPT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").expect("script pattern")
});
static IFRAME_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<iframe\b[^>]*>.*?</iframe>|<iframe\b[^>]*/?>").expect("iframe pattern")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:"[^"]*"|'[^']*'|[^>"'])*)>"#)
        .expect("tag pattern")
});
static ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z][a-zA-Z0-9-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("attr pattern")
});
static SRC_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)src\s*=\s*["']([^"']*)["']"#).expect("src attr pattern")
});

/// Sanitizes markup for the rich surface.
pub fn sanitize(input: &str) -> String {
    let no_comments = COMMENT.replace_all(input, "");
    let no_scripts = SCRIPT_ELEMENT.replace_all(&no_comments, "");

    // Whole-element filter for iframes: either the src is a playable embed
    // host and the element survives untouched here (the tag pass rebuilds
    // its attributes), or the element disappears entirely.
    let iframes_checked = IFRAME_ELEMENT.replace_all(&no_scripts, |caps: &regex::Captures<'_>| {
        let element = caps.get(0).map(|m| m.as_str()).unwrap_or("");
        let src_ok = SRC_ATTR
            .captures(element)
            .map(|src| embed::is_allowed_iframe_src(&src[1]))
            .unwrap_or(false);
        if src_ok {
            element.to_string()
        } else {
            String::new()
        }
    });

    TAG.replace_all(&iframes_checked, |caps: &regex::Captures<'_>| {
        let closing = !caps[1].is_empty();
        let name = caps[2].to_lowercase();
        if !ALLOWED_TAGS.contains(&name.as_str()) && name != "iframe" {
            return String::new();
        }
        if closing {
            return format!("</{name}>");
        }
        format!("<{name}{}>", rebuild_attrs(&name, &caps[3]))
    })
    .into_owned()
}

fn rebuild_attrs(tag: &str, raw: &str) -> String {
    let mut out = String::new();
    for caps in ATTR.captures_iter(raw) {
        let name = caps[1].to_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str());

        let kept: Option<String> = match (tag, name.as_str()) {
            (_, "style") => value.and_then(filter_style),
            ("a" | "div" | "span", "class") => value.and_then(filter_class),
            ("a", "href") => value.and_then(safe_url),
            ("img", "src") => value.and_then(safe_url),
            ("img", "alt") => Some(value.unwrap_or("").to_string()),
            ("iframe", "src") => value
                .filter(|v| embed::is_allowed_iframe_src(v))
                .map(str::to_string),
            ("iframe", "frameborder") => value.map(str::to_string),
            ("iframe", "allowfullscreen") => {
                out.push_str(" allowfullscreen");
                continue;
            }
            _ => None,
        };

        if let Some(v) = kept {
            out.push_str(&format!(" {name}=\"{v}\""));
        }
    }
    out
}

fn filter_style(raw: &str) -> Option<String> {
    let kept: Vec<String> = raw
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_lowercase();
            let value = value.trim();
            if !ALLOWED_STYLE_PROPS.contains(&prop.as_str()) || value.is_empty() {
                return None;
            }
            // Values that smuggle expressions or URLs are rejected wholesale.
            let lowered = value.to_lowercase();
            if lowered.contains("url(") || lowered.contains("expression") {
                return None;
            }
            Some(format!("{prop}: {value}"))
        })
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join("; "))
    }
}

fn filter_class(raw: &str) -> Option<String> {
    let kept: Vec<&str> = raw
        .split_whitespace()
        .filter(|token| ALLOWED_CLASSES.contains(token))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

fn safe_url(raw: &str) -> Option<String> {
    // Control characters and whitespace are stripped before the scheme
    // check so "jav\tascript:" cannot sneak through.
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    let lowered = compact.to_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("data:")
        || lowered.starts_with("vbscript:")
    {
        return None;
    }
    Some(raw.trim().to_string())
}
