//! Structural table operations on the rich surface.
//!
//! Every operation locates the active cell by walking the selection's
//! ancestor chain to the nearest cell, row and table, then works by
//! structural index. Deleting the last remaining row or column is refused:
//! the table is left unchanged and nothing enters history.

use crate::ast::{AstNode, builders};
use crate::editing::commands::{Applied, TableOp};
use crate::markup::color;
use crate::modes::rich::surface::RichSurface;

/// Resolved location of the selection inside a table.
struct TableContext {
    table_path: Vec<usize>,
    row_index: usize,
    cell_index: usize,
}

fn locate(surface: &RichSurface) -> Option<TableContext> {
    let cell_path = surface.ancestor_path(|n| matches!(n, AstNode::TableCell { .. }))?;
    let row_path = surface.ancestor_path(|n| matches!(n, AstNode::TableRow { .. }))?;
    let table_path = surface.ancestor_path(|n| matches!(n, AstNode::Table { .. }))?;
    Some(TableContext {
        table_path,
        row_index: *row_path.last()?,
        cell_index: *cell_path.last()?,
    })
}

pub(super) fn apply(surface: &mut RichSurface, op: &TableOp) -> Applied {
    let Some(ctx) = locate(surface) else {
        // Selection is not inside a table; the op is understood but
        // refused.
        return Applied::Rejected;
    };

    match op {
        TableOp::InsertRowAbove => insert_row(surface, &ctx, ctx.row_index),
        TableOp::InsertRowBelow => insert_row(surface, &ctx, ctx.row_index + 1),
        TableOp::InsertColumnLeft => insert_column(surface, &ctx, ctx.cell_index),
        TableOp::InsertColumnRight => insert_column(surface, &ctx, ctx.cell_index + 1),
        TableOp::DeleteRow => delete_row(surface, &ctx),
        TableOp::DeleteColumn => delete_column(surface, &ctx),
        TableOp::SetCellBackground(value) => set_cell_color(surface, value, true),
        TableOp::SetCellForeground(value) => set_cell_color(surface, value, false),
    }
}

fn rows_of<'a>(surface: &'a RichSurface, ctx: &TableContext) -> Option<&'a [AstNode]> {
    surface.node_at(&ctx.table_path)?.children()
}

fn column_count(surface: &RichSurface, ctx: &TableContext) -> usize {
    rows_of(surface, ctx)
        .and_then(|rows| rows.get(ctx.row_index))
        .and_then(AstNode::children)
        .map(|cells| cells.len())
        .unwrap_or(0)
}

fn insert_row(surface: &mut RichSurface, ctx: &TableContext, at: usize) -> Applied {
    let cols = column_count(surface, ctx).max(1);
    let new_row = builders::table_row(
        (0..cols)
            .map(|_| builders::table_cell(false, vec![builders::text("")]))
            .collect(),
    );

    let Some(AstNode::Table { content }) = surface.node_at_mut(&ctx.table_path) else {
        return Applied::Rejected;
    };
    let at = at.min(content.len());
    content.insert(at, new_row);
    surface.touch();

    let mut path = ctx.table_path.clone();
    path.push(at);
    surface.select_first_text_in(&path);
    Applied::Applied
}

fn insert_column(surface: &mut RichSurface, ctx: &TableContext, at: usize) -> Applied {
    let Some(AstNode::Table { content }) = surface.node_at_mut(&ctx.table_path) else {
        return Applied::Rejected;
    };
    for row in content.iter_mut() {
        let Some(cells) = row.children_mut() else {
            continue;
        };
        let header = matches!(
            cells.first(),
            Some(AstNode::TableCell { header: true, .. })
        );
        let at = at.min(cells.len());
        cells.insert(
            at,
            builders::table_cell(header, vec![builders::text("")]),
        );
    }
    surface.touch();

    let mut path = ctx.table_path.clone();
    path.push(ctx.row_index);
    path.push(at);
    surface.select_first_text_in(&path);
    Applied::Applied
}

fn delete_row(surface: &mut RichSurface, ctx: &TableContext) -> Applied {
    let Some(AstNode::Table { content }) = surface.node_at_mut(&ctx.table_path) else {
        return Applied::Rejected;
    };
    // Refuse to empty the table.
    if content.len() <= 1 {
        return Applied::Rejected;
    }
    content.remove(ctx.row_index.min(content.len() - 1));
    surface.touch();
    surface.select_first_text_in(&ctx.table_path);
    Applied::Applied
}

fn delete_column(surface: &mut RichSurface, ctx: &TableContext) -> Applied {
    if column_count(surface, ctx) <= 1 {
        return Applied::Rejected;
    }
    let Some(AstNode::Table { content }) = surface.node_at_mut(&ctx.table_path) else {
        return Applied::Rejected;
    };
    for row in content.iter_mut() {
        if let Some(cells) = row.children_mut()
            && ctx.cell_index < cells.len()
        {
            cells.remove(ctx.cell_index);
        }
    }
    surface.touch();
    surface.select_first_text_in(&ctx.table_path);
    Applied::Applied
}

fn set_cell_color(surface: &mut RichSurface, value: &str, background: bool) -> Applied {
    let validated = color::validated(value);
    let Some(cell_path) = surface.ancestor_path(|n| matches!(n, AstNode::TableCell { .. }))
    else {
        return Applied::Rejected;
    };
    let Some(AstNode::TableCell {
        background: bg,
        foreground: fg,
        ..
    }) = surface.node_at_mut(&cell_path)
    else {
        return Applied::Rejected;
    };
    if background {
        *bg = Some(validated);
    } else {
        *fg = Some(validated);
    }
    surface.touch();
    Applied::Applied
}
