//! Plain-text surface backed by an xi-rope buffer.
//!
//! The buffer is the single source of truth for the Markdown mode: a
//! `xi_rope::Rope` plus a byte-range selection and an edit version
//! counter. All edits clamp to char boundaries and keep the selection
//! inside the buffer.

use std::ops::Range;

use xi_rope::Rope;

use crate::editing::events::CursorInfo;

pub struct TextSurface {
    buffer: Rope,
    selection: Range<usize>,
    version: u64,
}

impl TextSurface {
    pub fn new(text: &str) -> Self {
        let buffer = Rope::from(text);
        let len = buffer.len();
        Self {
            buffer,
            selection: len..len,
            version: 0,
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Clamps to buffer length and snaps to char boundaries; host-supplied
    /// offsets are not trusted to land on either.
    pub fn set_selection(&mut self, range: Range<usize>) {
        let text = self.text();
        let start = snap_to_boundary(&text, range.start.min(text.len()));
        let end = snap_to_boundary(&text, range.end.clamp(start, text.len()));
        self.selection = start..end;
    }

    pub fn selected_text(&self) -> String {
        self.buffer
            .slice_to_cow(self.selection.clone())
            .into_owned()
    }

    /// Replaces a range with new text and collapses the selection to the
    /// end of the insertion.
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        self.buffer.edit(range.clone(), text);
        let caret = range.start + text.len();
        self.selection = caret..caret;
        self.version += 1;
    }

    pub fn insert(&mut self, at: usize, text: &str) {
        self.replace(at..at, text);
    }

    /// Replaces the whole buffer, cursor to end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = Rope::from(text);
        let len = self.buffer.len();
        self.selection = len..len;
        self.version += 1;
    }

    /// Wraps the selection in inline markers, or inserts an empty marker
    /// pair at the cursor and parks the cursor between them.
    pub fn wrap_selection(&mut self, prefix: &str, suffix: &str) {
        let sel = self.selection.clone();
        if sel.is_empty() {
            let insert = format!("{prefix}{suffix}");
            self.replace(sel.start..sel.start, &insert);
            let caret = sel.start + prefix.len();
            self.selection = caret..caret;
        } else {
            let selected = self.selected_text();
            let wrapped = format!("{prefix}{selected}{suffix}");
            self.replace(sel.clone(), &wrapped);
            self.selection = sel.start..sel.start + wrapped.len();
        }
    }

    /// Byte offset of the start of the line containing the selection start.
    pub fn current_line_start(&self) -> usize {
        let upto = self.buffer.slice_to_cow(0..self.selection.start);
        upto.rfind('\n').map(|pos| pos + 1).unwrap_or(0)
    }

    /// Text of the line starting at the given offset, newline excluded.
    pub fn line_at(&self, line_start: usize) -> String {
        let rest = self.buffer.slice_to_cow(line_start..self.buffer.len());
        match rest.find('\n') {
            Some(pos) => rest[..pos].to_string(),
            None => rest.into_owned(),
        }
    }

    /// Replaces the current line's block prefix (heading hashes, list
    /// marker, quote marker) with a new one. An identical existing prefix
    /// is removed instead, making the operation a toggle.
    pub fn set_line_prefix(&mut self, prefix: &str) {
        let line_start = self.current_line_start();
        let line = self.line_at(line_start);
        let existing_len = block_prefix_len(&line);
        let existing = &line[..existing_len];

        let new_prefix = if existing == prefix { "" } else { prefix };
        self.replace(line_start..line_start + existing_len, new_prefix);
        let caret = line_start + new_prefix.len();
        self.selection = caret..caret;
    }

    /// Inserts a block-level snippet at the cursor, padding with blank
    /// lines so it parses as its own block.
    pub fn insert_block_snippet(&mut self, snippet: &str) {
        let at = self.selection.start;
        let before_needs_break = at > 0 && !self.slice(0..at).ends_with("\n\n");
        let after = self.slice(at..self.len());
        let after_needs_break = !after.is_empty() && !after.starts_with('\n');

        let mut text = String::new();
        if before_needs_break {
            text.push_str(if self.slice(0..at).ends_with('\n') { "\n" } else { "\n\n" });
        }
        text.push_str(snippet);
        if after_needs_break {
            text.push_str("\n\n");
        }
        self.replace(at..at, &text);
    }

    /// Deletes the character before the cursor, if any.
    pub fn delete_backward(&mut self) -> bool {
        let at = self.selection.start;
        if !self.selection.is_empty() {
            self.replace(self.selection.clone(), "");
            return true;
        }
        if at == 0 {
            return false;
        }
        // Walk back to the previous char boundary.
        let upto = self.slice(0..at);
        let prev = upto
            .char_indices()
            .next_back()
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        self.replace(prev..at, "");
        true
    }

    /// Line/column/char-count recomputed from raw text offsets.
    pub fn caret(&self) -> CursorInfo {
        let upto = self.slice(0..self.selection.start);
        let line = upto.matches('\n').count() + 1;
        let column = upto
            .rfind('\n')
            .map(|pos| upto[pos + 1..].chars().count())
            .unwrap_or_else(|| upto.chars().count())
            + 1;
        let chars = self.text().chars().count();
        CursorInfo { line, column, chars }
    }

    fn slice(&self, range: Range<usize>) -> String {
        self.buffer.slice_to_cow(range).into_owned()
    }
}

fn snap_to_boundary(text: &str, mut at: usize) -> usize {
    while at > 0 && !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

/// Length of a recognized block prefix at the start of a line.
fn block_prefix_len(line: &str) -> usize {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();

    for heading in ["### ", "## ", "# "] {
        if trimmed.starts_with(heading) {
            return indent + heading.len();
        }
    }
    for marker in ["- ", "* ", "+ ", "> "] {
        if trimmed.starts_with(marker) {
            return indent + marker.len();
        }
    }
    if trimmed.starts_with(|c: char| c.is_ascii_digit())
        && let Some(dot) = trimmed.find(". ")
        && trimmed[..dot].chars().all(|c| c.is_ascii_digit())
    {
        return indent + dot + 2;
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_and_selection() {
        let mut surface = TextSurface::new("Hello World");
        surface.replace(6..11, "Universe");
        assert_eq!(surface.text(), "Hello Universe");
        assert_eq!(surface.selection(), 14..14);
        assert_eq!(surface.version(), 1);
    }

    #[test]
    fn test_wrap_selection_with_text_selected() {
        let mut surface = TextSurface::new("make bold please");
        surface.set_selection(5..9);
        surface.wrap_selection("**", "**");
        assert_eq!(surface.text(), "make **bold** please");
        assert_eq!(surface.selected_text(), "**bold**");
    }

    #[test]
    fn test_wrap_selection_collapsed_parks_cursor_inside() {
        let mut surface = TextSurface::new("");
        surface.set_selection(0..0);
        surface.wrap_selection("**", "**");
        assert_eq!(surface.text(), "****");
        assert_eq!(surface.selection(), 2..2);
    }

    #[test]
    fn test_set_line_prefix_replaces_existing() {
        let mut surface = TextSurface::new("# old heading");
        surface.set_selection(5..5);
        surface.set_line_prefix("## ");
        assert_eq!(surface.text(), "## old heading");
    }

    #[test]
    fn test_set_line_prefix_toggles_identical() {
        let mut surface = TextSurface::new("- item");
        surface.set_selection(3..3);
        surface.set_line_prefix("- ");
        assert_eq!(surface.text(), "item");
    }

    #[test]
    fn test_set_line_prefix_on_numbered_line() {
        let mut surface = TextSurface::new("12. item");
        surface.set_selection(5..5);
        surface.set_line_prefix("- ");
        assert_eq!(surface.text(), "- item");
    }

    #[test]
    fn test_insert_block_snippet_pads_blank_lines() {
        let mut surface = TextSurface::new("before");
        surface.set_selection(6..6);
        surface.insert_block_snippet("---");
        assert_eq!(surface.text(), "before\n\n---");
    }

    #[test]
    fn test_delete_backward() {
        let mut surface = TextSurface::new("ab");
        surface.set_selection(2..2);
        assert!(surface.delete_backward());
        assert_eq!(surface.text(), "a");
        surface.set_selection(0..0);
        assert!(!surface.delete_backward());
    }

    #[test]
    fn test_delete_backward_multibyte() {
        let mut surface = TextSurface::new("a한");
        let len = surface.len();
        surface.set_selection(len..len);
        assert!(surface.delete_backward());
        assert_eq!(surface.text(), "a");
    }

    #[test]
    fn test_caret_line_and_column() {
        let mut surface = TextSurface::new("one\ntwo\nthree");
        surface.set_selection(6..6);
        let caret = surface.caret();
        assert_eq!(caret.line, 2);
        assert_eq!(caret.column, 3);
        assert_eq!(caret.chars, 13);
    }

    #[test]
    fn test_selection_clamped_to_len() {
        let mut surface = TextSurface::new("ab");
        surface.set_selection(5..9);
        assert_eq!(surface.selection(), 2..2);
    }
}
