//! AST → sanitizable markup, the allow-list sanitizer, and the heuristic
//! markup → Markdown fallback path.
//!
//! The serializer and the converter are deliberately asymmetric: the
//! serializer is a structural recursion over the tree, the converter is an
//! ordered regex substitution pass that approximately inverts it. The
//! converter is the accepted lossy path for rich-mode content entering the
//! Markdown surface.

pub mod color;
pub mod convert;
pub mod embed;
pub mod sanitize;
pub mod serialize;

use std::sync::LazyLock;

use regex::Regex;

pub use convert::markup_to_markdown;
pub use sanitize::sanitize;
pub use serialize::serialize as serialize_markup;

static MARKUP_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)</?(p|h[1-6]|ul|ol|li|table|thead|tbody|tr|td|th|div|span|strong|em|b|i|u|del|s|strike|br|img|a|blockquote|pre|code|iframe|hr)\b",
    )
    .expect("markup shape pattern")
});

/// Cheap format sniff used at mode-switch boundaries: content containing
/// any known tag is treated as markup, everything else as Markdown.
pub fn looks_like_markup(content: &str) -> bool {
    MARKUP_SHAPE.is_match(content)
}
