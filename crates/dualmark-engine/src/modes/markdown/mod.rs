//! Markdown mode: a plain-text surface holding Markdown source.
//!
//! Editing intents become text edits: inline marks wrap the selection (or
//! insert an empty marker pair at the cursor), block intents rewrite the
//! current line's prefix, and block-level constructs insert a snippet.
//! Intents with no Markdown realization (fonts, colors, alignment, table
//! structure edits) report [`Applied::Unsupported`].

pub mod surface;

use crate::ast::Mark;
use crate::editing::commands::{Applied, EditOp, SnapshotContent, SurfaceSnapshot};
use crate::editing::events::{CursorInfo, DialogKind, FormatState};
use crate::editing::toolbar::{SelectTarget, ToolbarAction, ToolbarItem};
use crate::editing::EditorError;
use crate::markup;
use crate::modes::{Container, Mode, ModeKind, SelectionTarget, normalize_href};
use surface::TextSurface;

/// Header-cell label used in inserted table skeletons.
const TABLE_HEADER_LABEL: &str = "헤더";

pub struct MarkdownMode {
    surface: TextSurface,
    destroyed: bool,
}

impl MarkdownMode {
    pub fn new(initial: &str) -> Self {
        Self {
            surface: TextSurface::new(initial),
            destroyed: false,
        }
    }

    pub fn empty() -> Self {
        Self::new("")
    }

    fn inline_markers(mark: Mark) -> (&'static str, &'static str) {
        match mark {
            Mark::Bold => ("**", "**"),
            Mark::Italic => ("*", "*"),
            Mark::Underline => ("++", "++"),
            Mark::Strikethrough => ("~~", "~~"),
            Mark::Code => ("`", "`"),
        }
    }

    fn table_skeleton(rows: usize, cols: usize, with_header: bool) -> String {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let mut lines = Vec::new();

        if with_header {
            let header: Vec<String> = (1..=cols)
                .map(|idx| format!("{TABLE_HEADER_LABEL} {idx}"))
                .collect();
            lines.push(format!("| {} |", header.join(" | ")));
            lines.push(format!("|{}", " --- |".repeat(cols)));
        }

        let body_rows = if with_header { rows.saturating_sub(1) } else { rows };
        for _ in 0..body_rows {
            lines.push(format!("|{}", "  |".repeat(cols)));
        }
        lines.join("\n")
    }

    fn surface_mut(&mut self) -> &mut TextSurface {
        &mut self.surface
    }
}

impl Mode for MarkdownMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Markdown
    }

    fn mount(&mut self, container: &mut Container) {
        if self.destroyed {
            return;
        }
        container.rendered = Some(self.surface.text());
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn content(&self) -> String {
        self.surface.text()
    }

    fn set_content(&mut self, content: &str) {
        self.surface.set_text(content);
    }

    fn toolbar_items(&self) -> Vec<ToolbarItem> {
        vec![
            ToolbarItem::select(
                "heading",
                vec!["1".into(), "2".into(), "3".into(), "paragraph".into()],
                SelectTarget::HeadingLevel,
            ),
            ToolbarItem::separator(),
            ToolbarItem::button("bold", ToolbarAction::Command(EditOp::ToggleMark(Mark::Bold))),
            ToolbarItem::button(
                "italic",
                ToolbarAction::Command(EditOp::ToggleMark(Mark::Italic)),
            ),
            ToolbarItem::button(
                "strike",
                ToolbarAction::Command(EditOp::ToggleMark(Mark::Strikethrough)),
            ),
            ToolbarItem::button("code", ToolbarAction::Command(EditOp::ToggleMark(Mark::Code))),
            ToolbarItem::separator(),
            ToolbarItem::button(
                "bullet-list",
                ToolbarAction::Command(EditOp::ToggleBulletList),
            ),
            ToolbarItem::button(
                "ordered-list",
                ToolbarAction::Command(EditOp::ToggleOrderedList),
            ),
            ToolbarItem::button(
                "blockquote",
                ToolbarAction::Command(EditOp::ToggleBlockquote),
            ),
            ToolbarItem::button("hr", ToolbarAction::Command(EditOp::InsertHorizontalRule)),
            ToolbarItem::button(
                "code-block",
                ToolbarAction::Command(EditOp::InsertCodeBlock { language: None }),
            ),
            ToolbarItem::separator(),
            ToolbarItem::button("link", ToolbarAction::OpenDialog(DialogKind::Link)),
            ToolbarItem::button("image", ToolbarAction::OpenDialog(DialogKind::Image)),
            ToolbarItem::button("table", ToolbarAction::OpenDialog(DialogKind::Table)),
            ToolbarItem::button("embed", ToolbarAction::OpenDialog(DialogKind::Embed)),
            ToolbarItem::button(
                "special-char",
                ToolbarAction::OpenDialog(DialogKind::SpecialChar),
            ),
        ]
    }

    /// Markdown passes through unchanged; markup-shaped input runs through
    /// the heuristic converter.
    fn transform_data(&self, incoming: &str) -> String {
        if markup::looks_like_markup(incoming) {
            markup::markup_to_markdown(incoming)
        } else {
            incoming.to_string()
        }
    }

    fn apply(&mut self, op: &EditOp) -> Result<Applied, EditorError> {
        let surface = self.surface_mut();
        match op {
            EditOp::ToggleMark(mark) => {
                let (prefix, suffix) = Self::inline_markers(*mark);
                surface.wrap_selection(prefix, suffix);
            }
            EditOp::SetHeading(level) => {
                let level = (*level).clamp(1, 3) as usize;
                surface.set_line_prefix(&format!("{} ", "#".repeat(level)));
            }
            EditOp::SetParagraph => surface.set_line_prefix(""),
            EditOp::ToggleBulletList => surface.set_line_prefix("- "),
            EditOp::ToggleOrderedList => surface.set_line_prefix("1. "),
            EditOp::ToggleBlockquote => surface.set_line_prefix("> "),
            EditOp::InsertHorizontalRule => surface.insert_block_snippet("---"),
            EditOp::InsertCodeBlock { language } => {
                let lang = language.as_deref().unwrap_or("");
                surface.insert_block_snippet(&format!("```{lang}\n\n```"));
            }
            EditOp::InsertCallout { color } => {
                let color = markup::color::validated(color);
                surface.insert_block_snippet(&format!("> [!{color}]\n> "));
            }
            EditOp::InsertTable {
                rows,
                cols,
                with_header,
            } => {
                surface.insert_block_snippet(&Self::table_skeleton(*rows, *cols, *with_header));
            }
            EditOp::InsertEmbed { url } => {
                surface.insert_block_snippet(&format!("{{{{embed {url}}}}}"));
            }
            EditOp::InsertLink { href, text } => {
                let href = normalize_href(href);
                let label = if text.is_empty() { href.clone() } else { text.clone() };
                surface.replace(surface.selection(), &format!("[{label}]({href})"));
            }
            EditOp::InsertImage { src, alt } => {
                surface.replace(surface.selection(), &format!("![{alt}]({src})"));
            }
            EditOp::InsertSpecialChar(ch) => {
                surface.replace(surface.selection(), &ch.to_string());
            }
            EditOp::InsertText(text) => {
                surface.replace(surface.selection(), text);
            }
            EditOp::DeleteBackward => {
                if !surface.delete_backward() {
                    return Ok(Applied::Rejected);
                }
            }
            // No Markdown realization for surface styling or structural
            // table edits.
            EditOp::SetAlignment(_)
            | EditOp::SetFontFamily(_)
            | EditOp::SetFontSize(_)
            | EditOp::SetTextColor(_)
            | EditOp::SetHighlightColor(_)
            | EditOp::SetLineHeight(_)
            | EditOp::RemoveCallout
            | EditOp::Table(_) => return Ok(Applied::Unsupported),
        }
        Ok(Applied::Applied)
    }

    fn snapshot(&self) -> SurfaceSnapshot {
        SurfaceSnapshot {
            content: SnapshotContent::Text(self.surface.text()),
            selection: SelectionTarget::TextRange(self.surface.selection()),
        }
    }

    fn restore(&mut self, snapshot: &SurfaceSnapshot) {
        if let SnapshotContent::Text(text) = &snapshot.content {
            self.surface.set_text(text);
        }
        if let SelectionTarget::TextRange(range) = &snapshot.selection {
            self.surface.set_selection(range.clone());
        }
    }

    fn select(&mut self, target: &SelectionTarget) -> bool {
        match target {
            SelectionTarget::TextRange(range) => {
                if range.start > self.surface.len() {
                    return false;
                }
                self.surface.set_selection(range.clone());
                true
            }
            SelectionTarget::NodePath { .. } => false,
        }
    }

    fn selected_text(&self) -> String {
        self.surface.selected_text()
    }

    fn caret(&self) -> CursorInfo {
        self.surface.caret()
    }

    /// Marker sniffing around the selection; purely presentational.
    fn format_state(&self) -> FormatState {
        let text = self.surface.text();
        let sel = self.surface.selection();
        let before = &text[..sel.start.min(text.len())];
        let after = &text[sel.end.min(text.len())..];

        let surrounded = |marker: &str| before.ends_with(marker) && after.starts_with(marker);
        FormatState {
            bold: surrounded("**"),
            italic: surrounded("*") && !surrounded("**") || surrounded("***"),
            underline: surrounded("++"),
            strikethrough: surrounded("~~"),
            code: surrounded("`"),
        }
    }

    fn in_table(&self) -> bool {
        let line_start = self.surface.current_line_start();
        self.surface.line_at(line_start).trim_start().starts_with('|')
    }
}
