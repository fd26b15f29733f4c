//! Toolbar descriptors.
//!
//! A mode describes its toolbar as a flat list of [`ToolbarItem`]s; the
//! host renders that list and routes every interaction back through
//! [`EditorCore::dispatch`] without special-casing any item. Picker items
//! carry their option lists; the chosen value travels back as the
//! `dispatch` value argument.
//!
//! [`EditorCore::dispatch`]: crate::editing::core::EditorCore::dispatch

use crate::editing::commands::EditOp;
use crate::editing::events::DialogKind;

/// What a color picked from a toolbar color-picker applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Text,
    Highlight,
    CalloutBackground,
    CellBackground,
    CellForeground,
}

/// What a value chosen from a toolbar select applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectTarget {
    HeadingLevel,
    FontFamily,
    FontSize,
    LineHeight,
}

/// Everything a toolbar interaction can ask of the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    Command(EditOp),
    OpenDialog(DialogKind),
    PickColor(ColorTarget),
    SelectOption(SelectTarget),
    Undo,
    Redo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarItemKind {
    Button { action: ToolbarAction },
    Separator,
    ColorPicker { colors: Vec<String>, target: ColorTarget },
    Select { options: Vec<String>, target: SelectTarget },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarItem {
    pub id: &'static str,
    pub kind: ToolbarItemKind,
}

impl ToolbarItem {
    pub fn button(id: &'static str, action: ToolbarAction) -> Self {
        Self {
            id,
            kind: ToolbarItemKind::Button { action },
        }
    }

    pub fn separator() -> Self {
        Self {
            id: "separator",
            kind: ToolbarItemKind::Separator,
        }
    }

    pub fn color_picker(id: &'static str, colors: Vec<String>, target: ColorTarget) -> Self {
        Self {
            id,
            kind: ToolbarItemKind::ColorPicker { colors, target },
        }
    }

    pub fn select(id: &'static str, options: Vec<String>, target: SelectTarget) -> Self {
        Self {
            id,
            kind: ToolbarItemKind::Select { options, target },
        }
    }
}
