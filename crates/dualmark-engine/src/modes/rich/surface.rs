//! Structured surface backing the rich mode.
//!
//! The surface is one `Doc` tree plus a [`RichSelection`]: a child-index
//! path to the focused node and a character range within it when the node
//! is text. Selection state is owned here and passed into operations;
//! nothing reads ambient state. The invariant that the document always
//! holds at least one block (an empty paragraph at minimum) is maintained
//! by every structural edit, so the selection always has somewhere to land.

use std::ops::Range;

use crate::ast::{builders, AstNode, Mark, TextStyle};
use crate::editing::events::CursorInfo;
use crate::markup;
use crate::parsing;

/// Focused node path plus char range within it (for text nodes).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichSelection {
    pub path: Vec<usize>,
    pub range: Range<usize>,
}

pub struct RichSurface {
    doc: AstNode,
    selection: RichSelection,
    version: u64,
}

impl RichSurface {
    pub fn new() -> Self {
        Self::from_blocks(Vec::new())
    }

    /// Builds a surface from markup: sanitize, convert, parse.
    pub fn from_markup(markup_text: &str) -> Self {
        let sanitized = markup::sanitize(markup_text);
        let markdown = markup::markup_to_markdown(&sanitized);
        let doc = parsing::parse_document(&markdown);
        match doc {
            AstNode::Doc { content } => Self::from_blocks(content),
            other => Self::from_blocks(vec![other]),
        }
    }

    fn from_blocks(mut blocks: Vec<AstNode>) -> Self {
        if blocks.is_empty() {
            blocks.push(builders::empty_paragraph());
        }
        let mut surface = Self {
            doc: builders::doc(blocks),
            selection: RichSelection::default(),
            version: 0,
        };
        surface.select_first_text_in(&[0]);
        surface
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Records an in-place mutation done through [`node_at_mut`].
    ///
    /// [`node_at_mut`]: Self::node_at_mut
    pub(crate) fn touch(&mut self) {
        self.version += 1;
    }

    pub fn doc(&self) -> &AstNode {
        &self.doc
    }

    pub fn doc_clone(&self) -> AstNode {
        self.doc.clone()
    }

    /// Replaces the whole tree, keeping the non-empty invariant.
    pub fn set_doc(&mut self, doc: AstNode) {
        let blocks = match doc {
            AstNode::Doc { content } if !content.is_empty() => content,
            AstNode::Doc { .. } => vec![builders::empty_paragraph()],
            other => vec![other],
        };
        self.doc = builders::doc(blocks);
        self.select_first_text_in(&[0]);
        self.version += 1;
    }

    pub fn markup(&self) -> String {
        markup::serialize_markup(&self.doc)
    }

    pub fn selection(&self) -> &RichSelection {
        &self.selection
    }

    // ---- path resolution ----

    pub fn node_at(&self, path: &[usize]) -> Option<&AstNode> {
        let mut node = &self.doc;
        for &idx in path {
            node = node.children()?.get(idx)?;
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut AstNode> {
        let mut node = &mut self.doc;
        for &idx in path {
            node = node.children_mut()?.get_mut(idx)?;
        }
        Some(node)
    }

    /// Longest prefix of the selection path whose node satisfies the
    /// predicate — the "walk the ancestor chain" primitive table and
    /// callout operations build on.
    pub fn ancestor_path(&self, pred: impl Fn(&AstNode) -> bool) -> Option<Vec<usize>> {
        let mut path = self.selection.path.clone();
        loop {
            if let Some(node) = self.node_at(&path)
                && pred(node)
            {
                return Some(path);
            }
            if path.is_empty() {
                return None;
            }
            path.pop();
        }
    }

    /// Nearest paragraph or heading enclosing the selection.
    fn text_block_path(&self) -> Option<Vec<usize>> {
        self.ancestor_path(|node| {
            matches!(node, AstNode::Paragraph { .. } | AstNode::Heading { .. })
        })
    }

    // ---- selection ----

    /// Moves the selection. Returns false when the path does not resolve
    /// into the tree.
    pub fn select(&mut self, path: &[usize], range: Range<usize>) -> bool {
        let Some(node) = self.node_at(path) else {
            return false;
        };
        let range = match node {
            AstNode::Text { text, .. } => {
                let chars = text.chars().count();
                range.start.min(chars)..range.end.clamp(range.start.min(chars), chars)
            }
            _ => 0..0,
        };
        self.selection = RichSelection {
            path: path.to_vec(),
            range,
        };
        true
    }

    /// Points the selection at the first text node under `path`, falling
    /// back to the path itself for text-free subtrees.
    pub fn select_first_text_in(&mut self, path: &[usize]) {
        let mut path = path.to_vec();
        if self.node_at(&path).is_none() {
            path = vec![0];
            if self.node_at(&path).is_none() {
                self.selection = RichSelection::default();
                return;
            }
        }
        loop {
            let node = self.node_at(&path).expect("path validated above");
            match node {
                AstNode::Text { .. } => break,
                _ => match node.children() {
                    Some(children) if !children.is_empty() => path.push(0),
                    _ => break,
                },
            }
        }
        self.selection = RichSelection { path, range: 0..0 };
    }

    pub fn selected_text(&self) -> String {
        let Some(AstNode::Text { text, .. }) = self.node_at(&self.selection.path) else {
            return String::new();
        };
        text.chars()
            .skip(self.selection.range.start)
            .take(self.selection.range.len())
            .collect()
    }

    /// Marks and style on the focused text node.
    pub fn focused_format(&self) -> (Vec<Mark>, TextStyle) {
        match self.node_at(&self.selection.path) {
            Some(AstNode::Text { marks, style, .. }) => (marks.clone(), style.clone()),
            _ => (Vec::new(), TextStyle::default()),
        }
    }

    pub fn caret(&self) -> CursorInfo {
        CursorInfo {
            line: self.selection.path.first().copied().unwrap_or(0) + 1,
            column: self.selection.range.start + 1,
            chars: self.doc.plain_text().chars().count(),
        }
    }

    // ---- inline edits ----

    /// Applies a closure to the selected span of the focused text node,
    /// splitting the node when the selection covers only part of it. A
    /// collapsed selection applies to the whole node.
    pub fn apply_to_selected_text(
        &mut self,
        f: impl FnOnce(&mut Vec<Mark>, &mut TextStyle),
    ) -> bool {
        let Some(AstNode::Text { text, .. }) = self.node_at(&self.selection.path) else {
            return false;
        };
        let char_len = text.chars().count();
        let range = self.selection.range.clone();
        let (start, end) = (range.start.min(char_len), range.end.min(char_len));
        let whole = start == end || (start == 0 && end == char_len);

        if whole {
            let path = self.selection.path.clone();
            let Some(AstNode::Text { marks, style, .. }) = self.node_at_mut(&path) else {
                return false;
            };
            f(marks, style);
            self.version += 1;
            return true;
        }

        // Partial selection: split into up to three siblings, mutate the
        // middle one, and refocus the selection on it.
        let (parent_path, node_idx) = match self.selection.path.split_last() {
            Some((last, init)) => (init.to_vec(), *last),
            None => return false,
        };
        let Some(parent) = self.node_at_mut(&parent_path) else {
            return false;
        };
        let Some(content) = parent.children_mut() else {
            return false;
        };
        let Some(AstNode::Text { text, marks, style }) = content.get(node_idx).cloned() else {
            return false;
        };

        let before: String = text.chars().take(start).collect();
        let middle: String = text.chars().skip(start).take(end - start).collect();
        let after: String = text.chars().skip(end).collect();

        let mut replacement = Vec::new();
        if !before.is_empty() {
            replacement.push(AstNode::Text {
                text: before,
                marks: marks.clone(),
                style: style.clone(),
            });
        }
        let middle_len = middle.chars().count();
        let mut mid_marks = marks.clone();
        let mut mid_style = style.clone();
        f(&mut mid_marks, &mut mid_style);
        let middle_idx = node_idx + replacement.len();
        replacement.push(AstNode::Text {
            text: middle,
            marks: mid_marks,
            style: mid_style,
        });
        if !after.is_empty() {
            replacement.push(AstNode::Text {
                text: after,
                marks,
                style,
            });
        }

        content.splice(node_idx..node_idx + 1, replacement);

        let mut new_path = parent_path;
        new_path.push(middle_idx);
        self.selection = RichSelection {
            path: new_path,
            range: 0..middle_len,
        };
        self.version += 1;
        true
    }

    /// Inserts text at the cursor inside the focused text node, replacing
    /// any selected span.
    pub fn insert_text(&mut self, insert: &str) -> bool {
        let path = self.selection.path.clone();
        let range = self.selection.range.clone();
        let Some(AstNode::Text { text, .. }) = self.node_at_mut(&path) else {
            return false;
        };
        let prefix: String = text.chars().take(range.start).collect();
        let suffix: String = text.chars().skip(range.end).collect();
        *text = format!("{prefix}{insert}{suffix}");
        let caret = range.start + insert.chars().count();
        self.selection.range = caret..caret;
        self.version += 1;
        true
    }

    /// Deletes the selection, or the character before a collapsed cursor.
    /// Returns false when there is nothing to delete at this position.
    pub fn delete_backward_in_text(&mut self) -> bool {
        let path = self.selection.path.clone();
        let range = self.selection.range.clone();
        let Some(AstNode::Text { text, .. }) = self.node_at_mut(&path) else {
            return false;
        };
        if !range.is_empty() {
            let prefix: String = text.chars().take(range.start).collect();
            let suffix: String = text.chars().skip(range.end).collect();
            *text = format!("{prefix}{suffix}");
            self.selection.range = range.start..range.start;
            self.version += 1;
            return true;
        }
        if range.start == 0 {
            return false;
        }
        let prefix: String = text.chars().take(range.start - 1).collect();
        let suffix: String = text.chars().skip(range.start).collect();
        *text = format!("{prefix}{suffix}");
        let caret = range.start - 1;
        self.selection.range = caret..caret;
        self.version += 1;
        true
    }

    /// Appends an inline node after the focused text node, or at the end
    /// of the nearest text block.
    pub fn insert_inline(&mut self, node: AstNode) -> bool {
        if let Some((last, init)) = self.selection.path.split_last()
            && matches!(self.node_at(&self.selection.path), Some(AstNode::Text { .. }))
        {
            let insert_at = last + 1;
            let parent_path = init.to_vec();
            if let Some(parent) = self.node_at_mut(&parent_path)
                && let Some(content) = parent.children_mut()
            {
                content.insert(insert_at.min(content.len()), node);
                let mut path = parent_path;
                path.push(insert_at);
                self.selection = RichSelection { path, range: 0..0 };
                self.version += 1;
                return true;
            }
        }
        let Some(block_path) = self.text_block_path() else {
            return false;
        };
        let Some(block) = self.node_at_mut(&block_path) else {
            return false;
        };
        let Some(content) = block.children_mut() else {
            return false;
        };
        content.push(node);
        let mut path = block_path;
        path.push(self.node_at(&path).and_then(AstNode::children).map(|c| c.len() - 1).unwrap_or(0));
        self.selection = RichSelection { path, range: 0..0 };
        self.version += 1;
        true
    }

    // ---- block edits ----

    /// Index of the top-level block containing the selection.
    pub fn current_block_index(&self) -> usize {
        self.selection.path.first().copied().unwrap_or(0)
    }

    pub fn block_count(&self) -> usize {
        self.doc.children().map(|c| c.len()).unwrap_or(0)
    }

    /// Inserts a block after the current one and moves the selection into
    /// it.
    pub fn insert_block_after_current(&mut self, block: AstNode) {
        let at = (self.current_block_index() + 1).min(self.block_count());
        if let Some(blocks) = self.doc.children_mut() {
            blocks.insert(at, block);
        }
        self.select_first_text_in(&[at]);
        self.version += 1;
    }

    /// Converts the nearest paragraph/heading to the given variant,
    /// preserving inline content and block style.
    pub fn convert_text_block(
        &mut self,
        convert: impl FnOnce(AstNode) -> AstNode,
    ) -> bool {
        let Some(path) = self.text_block_path() else {
            return false;
        };
        let Some(node) = self.node_at_mut(&path) else {
            return false;
        };
        let converted = convert(node.clone());
        *node = converted;
        self.select_first_text_in(&path);
        self.version += 1;
        true
    }

    /// Replaces the block subtree at `path` with a sequence of blocks,
    /// keeping the non-empty invariant, and reselects at the splice point.
    pub fn splice_blocks(&mut self, path: &[usize], replacement: Vec<AstNode>) -> bool {
        let Some((last, init)) = path.split_last() else {
            return false;
        };
        let parent_path = init.to_vec();
        let Some(parent) = self.node_at_mut(&parent_path) else {
            return false;
        };
        let Some(content) = parent.children_mut() else {
            return false;
        };
        if *last >= content.len() {
            return false;
        }
        content.splice(*last..*last + 1, replacement);
        if self
            .doc
            .children()
            .map(|blocks| blocks.is_empty())
            .unwrap_or(true)
        {
            if let Some(blocks) = self.doc.children_mut() {
                blocks.push(builders::empty_paragraph());
            }
        }
        let mut select_at = parent_path;
        select_at.push((*last).min(self.node_at(&select_at).and_then(AstNode::children).map(|c| c.len().saturating_sub(1)).unwrap_or(0)));
        self.select_first_text_in(&select_at);
        self.version += 1;
        true
    }
}

impl Default for RichSurface {
    fn default() -> Self {
        Self::new()
    }
}
