//! The two editing modes and their shared contract.
//!
//! A [`Mode`] owns a live editing surface and translates the shared
//! [`EditOp`] vocabulary into that surface's semantics. [`RichMode`] edits
//! a structured document serialized as sanitizable markup; [`MarkdownMode`]
//! edits Markdown source in a plain text buffer. The core owns exactly one
//! mode at a time and destroys it fully before the next one goes live.
//!
//! [`EditOp`]: crate::editing::commands::EditOp
//! [`RichMode`]: rich::RichMode
//! [`MarkdownMode`]: markdown::MarkdownMode

pub mod markdown;
pub mod rich;

pub use markdown::MarkdownMode;
pub use rich::RichMode;

use std::ops::Range;

use crate::editing::commands::{Applied, EditOp, SurfaceSnapshot};
use crate::editing::events::{CursorInfo, FormatState};
use crate::editing::toolbar::ToolbarItem;
use crate::editing::EditorError;

/// Which mode is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Rich,
    Markdown,
}

impl std::fmt::Display for ModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeKind::Rich => write!(f, "rich"),
            ModeKind::Markdown => write!(f, "markdown"),
        }
    }
}

/// The host slot a mode mounts into. Purely a hand-off point: the mode
/// writes its rendered content here on mount, the host owns the rest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Container {
    pub id: String,
    pub rendered: Option<String>,
}

impl Container {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rendered: None,
        }
    }
}

/// A selection change as forwarded by the host, interpreted per mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionTarget {
    /// Byte-offset range in a plain text surface.
    TextRange(Range<usize>),
    /// Child-index path into a structured surface plus a character range
    /// within the node the path resolves to.
    NodePath { path: Vec<usize>, range: Range<usize> },
}

/// The uniform mode contract consumed by the editor core.
pub trait Mode {
    fn kind(&self) -> ModeKind;

    /// Renders current content into the container. Mounting an already
    /// destroyed mode is a no-op.
    fn mount(&mut self, container: &mut Container);

    /// Detaches from the surface. Idempotent.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;

    /// Serialized surface content: markup for rich, Markdown for markdown.
    fn content(&self) -> String;

    /// Replaces surface content with a string in this mode's own format.
    fn set_content(&mut self, content: &str);

    /// Toolbar the host renders while this mode is live.
    fn toolbar_items(&self) -> Vec<ToolbarItem>;

    /// Translates content possibly coming from the other mode's format
    /// into this mode's format. Same-format input passes through.
    fn transform_data(&self, incoming: &str) -> String;

    /// Realizes an editing intent on the surface.
    fn apply(&mut self, op: &EditOp) -> Result<Applied, EditorError>;

    /// Immutable capture of content + selection, for snapshot-based undo.
    fn snapshot(&self) -> SurfaceSnapshot;

    /// Restores a previously captured snapshot wholesale.
    fn restore(&mut self, snapshot: &SurfaceSnapshot);

    /// Moves the selection. Returns false (and changes nothing) when the
    /// target does not land inside this surface.
    fn select(&mut self, target: &SelectionTarget) -> bool;

    fn selected_text(&self) -> String;

    fn caret(&self) -> CursorInfo;

    fn format_state(&self) -> FormatState;

    fn in_table(&self) -> bool;
}

/// Prefixes a scheme onto bare-host links so `example.com` becomes a
/// working href. Fragment, mailto and already-qualified URLs pass through.
pub(crate) fn normalize_href(href: &str) -> String {
    let trimmed = href.trim();
    if trimmed.is_empty()
        || trimmed.contains("://")
        || trimmed.starts_with('#')
        || trimmed.starts_with('/')
        || trimmed.starts_with("mailto:")
        || trimmed.starts_with("tel:")
    {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_href() {
        assert_eq!(normalize_href("example.com"), "https://example.com");
        assert_eq!(normalize_href("https://example.com"), "https://example.com");
        assert_eq!(normalize_href("mailto:a@b.c"), "mailto:a@b.c");
        assert_eq!(normalize_href("/relative/path"), "/relative/path");
        assert_eq!(normalize_href("#anchor"), "#anchor");
    }
}
