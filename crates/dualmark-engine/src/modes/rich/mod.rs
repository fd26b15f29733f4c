//! Rich mode: structural editing over the document tree, serialized as
//! sanitizable markup.
//!
//! Every intent becomes a structural edit on [`RichSurface`]: marks and
//! text styles split the focused text node around the selection, block
//! intents convert or wrap the enclosing block, and insertions land after
//! the current block. Table intents resolve through the selection's
//! ancestor chain (see [`tables`]). Undo restores a full tree snapshot.
//!
//! [`RichSurface`]: surface::RichSurface

pub mod surface;
mod tables;

use crate::ast::{builders, AstNode, Mark};
use crate::editing::commands::{Applied, EditOp, SnapshotContent, SurfaceSnapshot};
use crate::editing::events::{CursorInfo, DialogKind, FormatState};
use crate::editing::toolbar::{ColorTarget, SelectTarget, ToolbarAction, ToolbarItem};
use crate::editing::EditorError;
use crate::markup;
use crate::markup::color;
use crate::modes::{normalize_href, Container, Mode, ModeKind, SelectionTarget};
use crate::parsing;
use surface::RichSurface;

/// Header-cell label used in inserted tables.
const TABLE_HEADER_LABEL: &str = "헤더";

pub struct RichMode {
    surface: RichSurface,
    destroyed: bool,
}

impl RichMode {
    pub fn empty() -> Self {
        Self {
            surface: RichSurface::new(),
            destroyed: false,
        }
    }

    pub fn with_markup(markup_text: &str) -> Self {
        Self {
            surface: RichSurface::from_markup(markup_text),
            destroyed: false,
        }
    }

    pub fn surface(&self) -> &RichSurface {
        &self.surface
    }

    fn build_table(rows: usize, cols: usize, with_header: bool) -> AstNode {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let mut out = Vec::new();

        if with_header {
            out.push(builders::table_row(
                (1..=cols)
                    .map(|idx| {
                        builders::table_cell(
                            true,
                            vec![builders::text(format!("{TABLE_HEADER_LABEL} {idx}"))],
                        )
                    })
                    .collect(),
            ));
        }
        let body_rows = if with_header { rows.saturating_sub(1) } else { rows };
        for _ in 0..body_rows {
            out.push(builders::table_row(
                (0..cols)
                    .map(|_| builders::table_cell(false, vec![builders::text("")]))
                    .collect(),
            ));
        }
        builders::table(out)
    }

    fn toggle_mark(&mut self, mark: Mark) -> Applied {
        let (current, _) = self.surface.focused_format();
        let had = current.contains(&mark);
        let changed = self.surface.apply_to_selected_text(|marks, _| {
            if had {
                marks.retain(|m| *m != mark);
            } else {
                marks.push(mark);
            }
        });
        if changed { Applied::Applied } else { Applied::Rejected }
    }

    fn toggle_list(&mut self, want_ordered: bool) -> Applied {
        if let Some(list_path) = self
            .surface
            .ancestor_path(|n| matches!(n, AstNode::List { .. }))
        {
            let Some(AstNode::List { ordered, content }) = self.surface.node_at_mut(&list_path)
            else {
                return Applied::Rejected;
            };
            if *ordered == want_ordered {
                // Unwrap: every item becomes a paragraph again.
                let paragraphs: Vec<AstNode> = content
                    .iter()
                    .map(|item| {
                        builders::paragraph(item.children().map(<[AstNode]>::to_vec).unwrap_or_default())
                    })
                    .collect();
                self.surface.splice_blocks(&list_path, paragraphs);
            } else {
                *ordered = want_ordered;
                self.surface.touch();
            }
            return Applied::Applied;
        }

        // Wrap the enclosing text block into a single-item list.
        let block_path = vec![self.surface.current_block_index()];
        let Some(block) = self.surface.node_at(&block_path) else {
            return Applied::Rejected;
        };
        let inline = match block {
            AstNode::Paragraph { content, .. } | AstNode::Heading { content, .. } => {
                content.clone()
            }
            _ => return Applied::Rejected,
        };
        self.surface.splice_blocks(
            &block_path,
            vec![builders::list(want_ordered, vec![builders::list_item(inline)])],
        );
        Applied::Applied
    }

    fn toggle_blockquote(&mut self) -> Applied {
        if let Some(quote_path) = self
            .surface
            .ancestor_path(|n| matches!(n, AstNode::Blockquote { .. }))
        {
            let children = self
                .surface
                .node_at(&quote_path)
                .and_then(AstNode::children)
                .map(<[AstNode]>::to_vec)
                .unwrap_or_default();
            self.surface.splice_blocks(&quote_path, children);
            return Applied::Applied;
        }

        let block_path = vec![self.surface.current_block_index()];
        let Some(block) = self.surface.node_at(&block_path) else {
            return Applied::Rejected;
        };
        let wrapped = builders::blockquote(vec![block.clone()]);
        self.surface.splice_blocks(&block_path, vec![wrapped]);
        Applied::Applied
    }

    fn remove_callout(&mut self) -> Applied {
        let Some(callout_path) = self
            .surface
            .ancestor_path(|n| matches!(n, AstNode::Callout { .. }))
        else {
            return Applied::Rejected;
        };
        let body = self
            .surface
            .node_at(&callout_path)
            .and_then(AstNode::children)
            .map(<[AstNode]>::to_vec)
            .unwrap_or_default();
        self.surface.splice_blocks(&callout_path, body);
        Applied::Applied
    }

    /// Delete-backward at the start of an empty callout body removes the
    /// callout itself; anywhere else it is a plain character delete.
    fn delete_backward(&mut self) -> Applied {
        let at_start = self.surface.selection().range == (0..0);
        if at_start
            && let Some(callout_path) = self
                .surface
                .ancestor_path(|n| matches!(n, AstNode::Callout { .. }))
            && callout_body_is_empty(self.surface.node_at(&callout_path))
        {
            self.surface.splice_blocks(&callout_path, vec![]);
            return Applied::Applied;
        }
        if self.surface.delete_backward_in_text() {
            Applied::Applied
        } else {
            Applied::Rejected
        }
    }

    fn insert_embed(&mut self, url: &str) -> Applied {
        if markup::embed::is_embeddable(url) {
            self.surface.insert_block_after_current(builders::embed(url));
        } else {
            // Degrade to a link card rather than a broken embed.
            let href = normalize_href(url);
            self.surface.insert_block_after_current(builders::paragraph(vec![
                builders::link(href, vec![builders::text(url)]),
            ]));
        }
        Applied::Applied
    }
}

fn callout_body_is_empty(node: Option<&AstNode>) -> bool {
    match node {
        Some(AstNode::Callout { content, .. }) => {
            content.len() <= 1
                && content
                    .first()
                    .map(|block| block.plain_text().is_empty())
                    .unwrap_or(true)
        }
        _ => false,
    }
}

impl Mode for RichMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Rich
    }

    fn mount(&mut self, container: &mut Container) {
        if self.destroyed {
            return;
        }
        container.rendered = Some(self.surface.markup());
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn content(&self) -> String {
        self.surface.markup()
    }

    fn set_content(&mut self, content: &str) {
        self.surface = RichSurface::from_markup(content);
    }

    fn toolbar_items(&self) -> Vec<ToolbarItem> {
        vec![
            ToolbarItem::select(
                "heading",
                vec!["1".into(), "2".into(), "3".into(), "paragraph".into()],
                SelectTarget::HeadingLevel,
            ),
            ToolbarItem::select(
                "font-family",
                vec!["sans-serif".into(), "serif".into(), "monospace".into()],
                SelectTarget::FontFamily,
            ),
            ToolbarItem::select(
                "font-size",
                vec!["12px".into(), "14px".into(), "16px".into(), "20px".into()],
                SelectTarget::FontSize,
            ),
            ToolbarItem::select(
                "line-height",
                vec!["1.2".into(), "1.5".into(), "1.8".into(), "2.0".into()],
                SelectTarget::LineHeight,
            ),
            ToolbarItem::separator(),
            ToolbarItem::button("bold", ToolbarAction::Command(EditOp::ToggleMark(Mark::Bold))),
            ToolbarItem::button(
                "italic",
                ToolbarAction::Command(EditOp::ToggleMark(Mark::Italic)),
            ),
            ToolbarItem::button(
                "underline",
                ToolbarAction::Command(EditOp::ToggleMark(Mark::Underline)),
            ),
            ToolbarItem::button(
                "strike",
                ToolbarAction::Command(EditOp::ToggleMark(Mark::Strikethrough)),
            ),
            ToolbarItem::color_picker(
                "text-color",
                color::CALLOUT_PALETTE.iter().map(|c| c.to_string()).collect(),
                ColorTarget::Text,
            ),
            ToolbarItem::color_picker(
                "highlight-color",
                color::CALLOUT_PALETTE.iter().map(|c| c.to_string()).collect(),
                ColorTarget::Highlight,
            ),
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
            ToolbarItem::color_picker(
                "callout",
                color::CALLOUT_PALETTE.iter().map(|c| c.to_string()).collect(),
                ColorTarget::CalloutBackground,
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

    /// Markup passes through structurally as-is (sanitized); Markdown-
    /// shaped input is parsed to the tree and serialized to markup.
    fn transform_data(&self, incoming: &str) -> String {
        if markup::looks_like_markup(incoming) {
            markup::sanitize(incoming)
        } else {
            markup::serialize_markup(&parsing::parse_document(incoming))
        }
    }

    fn apply(&mut self, op: &EditOp) -> Result<Applied, EditorError> {
        let applied = match op {
            EditOp::ToggleMark(mark) => self.toggle_mark(*mark),
            EditOp::SetHeading(level) => {
                let level = *level;
                if self.surface.convert_text_block(|node| match node {
                    AstNode::Paragraph { style, content } | AstNode::Heading { style, content, .. } => {
                        AstNode::Heading { level: level.clamp(1, 3), style, content }
                    }
                    other => other,
                }) {
                    Applied::Applied
                } else {
                    Applied::Rejected
                }
            }
            EditOp::SetParagraph => {
                if self.surface.convert_text_block(|node| match node {
                    AstNode::Heading { style, content, .. } => {
                        AstNode::Paragraph { style, content }
                    }
                    other => other,
                }) {
                    Applied::Applied
                } else {
                    Applied::Rejected
                }
            }
            EditOp::ToggleBulletList => self.toggle_list(false),
            EditOp::ToggleOrderedList => self.toggle_list(true),
            EditOp::ToggleBlockquote => self.toggle_blockquote(),
            EditOp::SetAlignment(align) => {
                let align = *align;
                if self.surface.convert_text_block(|node| match node {
                    AstNode::Paragraph { mut style, content } => {
                        style.align = Some(align);
                        AstNode::Paragraph { style, content }
                    }
                    AstNode::Heading { level, mut style, content } => {
                        style.align = Some(align);
                        AstNode::Heading { level, style, content }
                    }
                    other => other,
                }) {
                    Applied::Applied
                } else {
                    Applied::Rejected
                }
            }
            EditOp::SetLineHeight(value) => {
                let value = value.clone();
                if self.surface.convert_text_block(|node| match node {
                    AstNode::Paragraph { mut style, content } => {
                        style.line_height = Some(value);
                        AstNode::Paragraph { style, content }
                    }
                    AstNode::Heading { level, mut style, content } => {
                        style.line_height = Some(value);
                        AstNode::Heading { level, style, content }
                    }
                    other => other,
                }) {
                    Applied::Applied
                } else {
                    Applied::Rejected
                }
            }
            EditOp::SetFontFamily(value) => {
                let value = value.clone();
                styled(self.surface.apply_to_selected_text(|_, style| {
                    style.font_family = Some(value);
                }))
            }
            EditOp::SetFontSize(value) => {
                let value = value.clone();
                styled(self.surface.apply_to_selected_text(|_, style| {
                    style.font_size = Some(value);
                }))
            }
            EditOp::SetTextColor(value) => {
                let value = color::validated(value);
                styled(self.surface.apply_to_selected_text(|_, style| {
                    style.color = Some(value);
                }))
            }
            EditOp::SetHighlightColor(value) => {
                let value = color::validated(value);
                styled(self.surface.apply_to_selected_text(|_, style| {
                    style.background = Some(value);
                }))
            }
            EditOp::InsertHorizontalRule => {
                self.surface
                    .insert_block_after_current(builders::horizontal_rule());
                Applied::Applied
            }
            EditOp::InsertCodeBlock { language } => {
                self.surface
                    .insert_block_after_current(builders::code_block(language.clone(), ""));
                Applied::Applied
            }
            EditOp::InsertCallout { color: requested } => {
                let validated = color::validated(requested);
                self.surface.insert_block_after_current(builders::callout(
                    validated,
                    vec![builders::empty_paragraph()],
                ));
                Applied::Applied
            }
            EditOp::RemoveCallout => self.remove_callout(),
            EditOp::InsertTable {
                rows,
                cols,
                with_header,
            } => {
                self.surface
                    .insert_block_after_current(Self::build_table(*rows, *cols, *with_header));
                Applied::Applied
            }
            EditOp::Table(table_op) => tables::apply(&mut self.surface, table_op),
            EditOp::InsertLink { href, text } => {
                let href = normalize_href(href);
                let label = if text.is_empty() { href.clone() } else { text.clone() };
                if self
                    .surface
                    .insert_inline(builders::link(href, vec![builders::text(label)]))
                {
                    Applied::Applied
                } else {
                    Applied::Rejected
                }
            }
            EditOp::InsertImage { src, alt } => {
                if self.surface.insert_inline(builders::image(src, alt)) {
                    Applied::Applied
                } else {
                    Applied::Rejected
                }
            }
            EditOp::InsertEmbed { url } => self.insert_embed(url),
            EditOp::InsertSpecialChar(ch) => {
                if self.surface.insert_text(&ch.to_string()) {
                    Applied::Applied
                } else {
                    Applied::Rejected
                }
            }
            EditOp::InsertText(text) => {
                if self.surface.insert_text(text) {
                    Applied::Applied
                } else {
                    Applied::Rejected
                }
            }
            EditOp::DeleteBackward => self.delete_backward(),
        };
        Ok(applied)
    }

    fn snapshot(&self) -> SurfaceSnapshot {
        let selection = self.surface.selection();
        SurfaceSnapshot {
            content: SnapshotContent::Tree(self.surface.doc_clone()),
            selection: SelectionTarget::NodePath {
                path: selection.path.clone(),
                range: selection.range.clone(),
            },
        }
    }

    fn restore(&mut self, snapshot: &SurfaceSnapshot) {
        if let SnapshotContent::Tree(doc) = &snapshot.content {
            self.surface.set_doc(doc.clone());
        }
        if let SelectionTarget::NodePath { path, range } = &snapshot.selection {
            self.surface.select(path, range.clone());
        }
    }

    fn select(&mut self, target: &SelectionTarget) -> bool {
        match target {
            SelectionTarget::NodePath { path, range } => {
                self.surface.select(path, range.clone())
            }
            SelectionTarget::TextRange(_) => false,
        }
    }

    fn selected_text(&self) -> String {
        self.surface.selected_text()
    }

    fn caret(&self) -> CursorInfo {
        self.surface.caret()
    }

    fn format_state(&self) -> FormatState {
        let (marks, _) = self.surface.focused_format();
        FormatState {
            bold: marks.contains(&Mark::Bold),
            italic: marks.contains(&Mark::Italic),
            underline: marks.contains(&Mark::Underline),
            strikethrough: marks.contains(&Mark::Strikethrough),
            code: marks.contains(&Mark::Code),
        }
    }

    fn in_table(&self) -> bool {
        self.surface
            .ancestor_path(|n| matches!(n, AstNode::Table { .. }))
            .is_some()
    }
}

fn styled(changed: bool) -> Applied {
    if changed { Applied::Applied } else { Applied::Rejected }
}
