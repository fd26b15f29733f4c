//! Color value validation.
//!
//! Callout and table-cell colors arrive as raw strings from dialogs and
//! from converted markup. Before a value is trusted in generated markup it
//! must be a hex color, an `rgb()`/`rgba()` form with numeric components,
//! or one of a small named set. Invalid values fall back to the default
//! palette entry instead of erroring.

use std::sync::LazyLock;

use regex::Regex;

/// Fallback used when a requested color fails validation.
pub const DEFAULT_CALLOUT_COLOR: &str = "#fff9c4";

/// Built-in callout palette offered to hosts.
pub const CALLOUT_PALETTE: [&str; 6] = [
    "#fff9c4", "#ffe0e0", "#e0f0ff", "#e2f7e2", "#f3e5f5", "#eeeeee",
];

static HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").expect("hex color")
});
static RGB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba?\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*(?:,\s*(?:0|1|0?\.\d+)\s*)?\)$")
        .expect("rgb color")
});

const NAMED: [&str; 12] = [
    "black", "white", "red", "green", "blue", "yellow", "orange", "purple", "pink", "gray",
    "grey", "transparent",
];

pub fn is_valid_color(value: &str) -> bool {
    let value = value.trim();
    HEX.is_match(value) || RGB.is_match(value) || NAMED.contains(&value.to_ascii_lowercase().as_str())
}

/// Returns the value when valid, the default callout color otherwise.
pub fn validated(value: &str) -> String {
    if is_valid_color(value) {
        value.trim().to_string()
    } else {
        DEFAULT_CALLOUT_COLOR.to_string()
    }
}
