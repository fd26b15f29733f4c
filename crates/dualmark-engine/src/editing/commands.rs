//! Commands and the shared editing intent set.
//!
//! [`EditOp`] is the closed vocabulary of user intents. Each mode realizes
//! the ops it supports in its own semantics (structural tree edits on the
//! rich surface, text edits on the Markdown surface) and reports
//! [`Applied::Unsupported`] for the rest, so callers never branch on the
//! concrete mode type.
//!
//! Undo is snapshot-based, not operational: [`EditCommand`] captures an
//! immutable [`SurfaceSnapshot`] of the surface before executing and
//! restores it wholesale on undo. Simple, correct at this scale, and free
//! of aliasing against the live surface.

use crate::editing::EditorError;
use crate::modes::{Mode, SelectionTarget};

/// Outcome of applying an [`EditOp`] to a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The surface changed; the command belongs in history.
    Applied,
    /// The op was understood but refused (e.g. deleting the last table
    /// row). Nothing changed, nothing is pushed.
    Rejected,
    /// The mode has no realization of this op.
    Unsupported,
}

/// Structural table operations, resolved against the selection's
/// enclosing cell/row/table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableOp {
    InsertRowAbove,
    InsertRowBelow,
    InsertColumnLeft,
    InsertColumnRight,
    DeleteRow,
    DeleteColumn,
    SetCellBackground(String),
    SetCellForeground(String),
}

/// The closed set of editing intents shared by both modes.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    ToggleMark(crate::ast::Mark),
    SetHeading(u8),
    SetParagraph,
    ToggleBulletList,
    ToggleOrderedList,
    ToggleBlockquote,
    SetAlignment(crate::ast::Alignment),
    SetFontFamily(String),
    SetFontSize(String),
    SetTextColor(String),
    SetHighlightColor(String),
    SetLineHeight(String),
    InsertHorizontalRule,
    InsertCodeBlock { language: Option<String> },
    InsertCallout { color: String },
    RemoveCallout,
    InsertTable { rows: usize, cols: usize, with_header: bool },
    Table(TableOp),
    InsertLink { href: String, text: String },
    InsertImage { src: String, alt: String },
    InsertEmbed { url: String },
    InsertSpecialChar(char),
    InsertText(String),
    DeleteBackward,
}

impl EditOp {
    /// Human label used as the command description.
    pub fn label(&self) -> String {
        match self {
            EditOp::ToggleMark(mark) => format!("Toggle {mark:?}").to_lowercase(),
            EditOp::SetHeading(level) => format!("Heading {level}"),
            EditOp::SetParagraph => "Paragraph".to_string(),
            EditOp::ToggleBulletList => "Bullet list".to_string(),
            EditOp::ToggleOrderedList => "Numbered list".to_string(),
            EditOp::ToggleBlockquote => "Blockquote".to_string(),
            EditOp::SetAlignment(align) => format!("Align {align:?}").to_lowercase(),
            EditOp::SetFontFamily(_) => "Font family".to_string(),
            EditOp::SetFontSize(_) => "Font size".to_string(),
            EditOp::SetTextColor(_) => "Text color".to_string(),
            EditOp::SetHighlightColor(_) => "Highlight color".to_string(),
            EditOp::SetLineHeight(_) => "Line height".to_string(),
            EditOp::InsertHorizontalRule => "Horizontal rule".to_string(),
            EditOp::InsertCodeBlock { .. } => "Code block".to_string(),
            EditOp::InsertCallout { .. } => "Insert callout".to_string(),
            EditOp::RemoveCallout => "Remove callout".to_string(),
            EditOp::InsertTable { .. } => "Insert table".to_string(),
            EditOp::Table(op) => format!("Table: {op:?}"),
            EditOp::InsertLink { .. } => "Insert link".to_string(),
            EditOp::InsertImage { .. } => "Insert image".to_string(),
            EditOp::InsertEmbed { .. } => "Insert embed".to_string(),
            EditOp::InsertSpecialChar(_) => "Special character".to_string(),
            EditOp::InsertText(_) => "Type".to_string(),
            EditOp::DeleteBackward => "Delete".to_string(),
        }
    }
}

/// A surface's content in its native representation: raw text for the
/// Markdown surface, the document tree for the rich surface. Tree
/// snapshots restore styles and structure exactly instead of re-entering
/// through the lossy converter.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotContent {
    Text(String),
    Tree(crate::ast::AstNode),
}

/// Immutable capture of a surface's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSnapshot {
    pub content: SnapshotContent,
    pub selection: SelectionTarget,
}

/// A reversible unit of editing history.
pub trait Command {
    fn description(&self) -> &str;
    fn execute(&mut self, mode: &mut dyn Mode) -> Result<Applied, EditorError>;
    fn undo(&mut self, mode: &mut dyn Mode) -> Result<(), EditorError>;
}

/// The one command implementation both modes share: apply an [`EditOp`],
/// undo by restoring the pre-execution snapshot.
pub struct EditCommand {
    op: EditOp,
    description: String,
    before: Option<SurfaceSnapshot>,
}

impl EditCommand {
    pub fn new(op: EditOp) -> Self {
        let description = op.label();
        Self {
            op,
            description,
            before: None,
        }
    }

    pub fn op(&self) -> &EditOp {
        &self.op
    }
}

impl Command for EditCommand {
    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&mut self, mode: &mut dyn Mode) -> Result<Applied, EditorError> {
        let before = mode.snapshot();
        let applied = mode.apply(&self.op)?;
        if applied == Applied::Applied {
            self.before = Some(before);
        }
        Ok(applied)
    }

    fn undo(&mut self, mode: &mut dyn Mode) -> Result<(), EditorError> {
        if let Some(snapshot) = &self.before {
            mode.restore(snapshot);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Mark;
    use crate::modes::markdown::MarkdownMode;

    #[test]
    fn test_execute_captures_snapshot_and_undo_restores_it() {
        let mut mode = MarkdownMode::new("hello");
        let mut cmd = EditCommand::new(EditOp::InsertText(" world".to_string()));

        mode.select(&SelectionTarget::TextRange(5..5));
        let applied = cmd.execute(&mut mode).unwrap();
        assert_eq!(applied, Applied::Applied);
        assert_eq!(mode.content(), "hello world");

        cmd.undo(&mut mode).unwrap();
        assert_eq!(mode.content(), "hello");
    }

    #[test]
    fn test_unsupported_op_leaves_no_snapshot() {
        let mut mode = MarkdownMode::new("x");
        let mut cmd = EditCommand::new(EditOp::SetFontFamily("serif".to_string()));

        let applied = cmd.execute(&mut mode).unwrap();
        assert_eq!(applied, Applied::Unsupported);
        assert_eq!(mode.content(), "x");

        // Undo after a non-applied execute is a no-op.
        cmd.undo(&mut mode).unwrap();
        assert_eq!(mode.content(), "x");
    }

    #[test]
    fn test_labels_are_human_readable() {
        assert_eq!(EditOp::ToggleMark(Mark::Bold).label(), "toggle bold");
        assert_eq!(EditOp::SetHeading(2).label(), "Heading 2");
        assert_eq!(
            EditOp::InsertTable {
                rows: 3,
                cols: 3,
                with_header: true
            }
            .label(),
            "Insert table"
        );
    }
}
