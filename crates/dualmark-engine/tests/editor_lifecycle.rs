//! End-to-end editor behavior: command history exactness, mode switching,
//! and event contract, driven through the public API only.

use dualmark_engine::editing::{EditOp, EditorCore, EventKind};
use dualmark_engine::{
    Applied, Container, EditorEvent, Mark, MarkdownMode, Mode, ModeKind, RichMode, SelectionTarget,
};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn markdown_core(initial: &str) -> EditorCore {
    let mut core = EditorCore::new();
    core.init_mode(Box::new(MarkdownMode::new(initial)));
    core
}

#[test]
fn executing_then_fully_undoing_restores_original_content() {
    let mut core = markdown_core("# Start\n\nbody");
    let original = core.content().unwrap();

    core.select(&SelectionTarget::TextRange(13..13)).unwrap();
    core.execute(EditOp::InsertText(" more".to_string())).unwrap();
    core.execute(EditOp::InsertHorizontalRule).unwrap();
    core.execute(EditOp::InsertTable {
        rows: 2,
        cols: 2,
        with_header: true,
    })
    .unwrap();
    core.execute(EditOp::InsertEmbed {
        url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
    })
    .unwrap();
    assert_ne!(core.content().unwrap(), original);

    for _ in 0..4 {
        core.undo().unwrap();
    }
    assert_eq!(core.content().unwrap(), original);
}

#[test]
fn rich_mode_undo_exactness_across_structural_edits() {
    let mut core = EditorCore::new();
    core.init_mode(Box::new(RichMode::with_markup(
        "<h1>Title</h1><p>Hello world</p>",
    )));
    let original = core.content().unwrap();

    core.select(&SelectionTarget::NodePath {
        path: vec![1, 0],
        range: 0..5,
    })
    .unwrap();
    core.execute(EditOp::ToggleMark(Mark::Bold)).unwrap();
    core.execute(EditOp::InsertTable {
        rows: 2,
        cols: 3,
        with_header: true,
    })
    .unwrap();
    core.execute(EditOp::InsertCallout {
        color: "#ffe0e0".to_string(),
    })
    .unwrap();

    for _ in 0..3 {
        core.undo().unwrap();
    }
    assert_eq!(core.content().unwrap(), original);
}

#[test]
fn history_is_empty_after_mode_switch() {
    let mut core = markdown_core("hello");
    core.execute(EditOp::InsertText("!".to_string())).unwrap();
    core.undo().unwrap();
    core.execute(EditOp::InsertText("?".to_string())).unwrap();
    assert!(core.can_undo());

    core.set_mode(Box::new(RichMode::empty())).unwrap();
    assert!(!core.can_undo());
    assert!(!core.can_redo());
}

#[test]
fn mode_switch_returns_transformed_content_for_caller_to_apply() {
    let mut core = markdown_core("# Title\n\nHello **world**");

    let transformed = core.set_mode(Box::new(RichMode::empty())).unwrap();
    assert_eq!(
        transformed,
        "<h1>Title</h1><p>Hello <strong>world</strong></p>"
    );

    // The caller mounts and seeds, exactly as a host would.
    let mut container = Container::new("editor");
    core.mount(&mut container).unwrap();
    core.set_content(&transformed).unwrap();
    assert_eq!(core.mode_kind(), Some(ModeKind::Rich));
    assert_eq!(core.content().unwrap(), transformed);
}

#[test]
fn double_mode_switch_preserves_representable_markup() {
    let source = "# Title\n\nHello **world** and *italics*\n\n- one\n- two\n\n[site](https://example.com)\n\n![pic](/a.png)";

    let mut core = EditorCore::new();
    core.init_mode(Box::new(MarkdownMode::new(source)));

    // markdown -> rich
    let markup = core.set_mode(Box::new(RichMode::empty())).unwrap();
    core.set_content(&markup).unwrap();

    // rich -> markdown
    let markdown = core.set_mode(Box::new(MarkdownMode::empty())).unwrap();
    core.set_content(&markdown).unwrap();

    // markdown -> rich again
    let markup_again = core.set_mode(Box::new(RichMode::empty())).unwrap();
    assert_eq!(markup_again, markup);
}

#[test]
fn mode_changed_and_content_events_reach_subscribers() {
    let mut core = markdown_core("x");
    let events = Rc::new(RefCell::new(Vec::new()));

    let sink = events.clone();
    core.on(EventKind::ModeChanged, move |event| {
        if let EditorEvent::ModeChanged { mode } = event {
            sink.borrow_mut().push(format!("mode:{mode}"));
        }
    });
    let sink = events.clone();
    core.on(EventKind::ContentChanged, move |event| {
        if let EditorEvent::ContentChanged { content } = event {
            sink.borrow_mut().push(format!("content:{content}"));
        }
    });

    core.execute(EditOp::InsertText("y".to_string())).unwrap();
    core.set_mode(Box::new(RichMode::empty())).unwrap();

    assert_eq!(
        *events.borrow(),
        vec!["content:xy".to_string(), "mode:rich".to_string()]
    );
}

#[test]
fn subscriber_removed_with_off_stops_receiving() {
    let mut core = markdown_core("");
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    let id = core.on(EventKind::ContentChanged, move |_| {
        *sink.borrow_mut() += 1;
    });

    core.execute(EditOp::InsertText("a".to_string())).unwrap();
    core.off(id);
    core.execute(EditOp::InsertText("b".to_string())).unwrap();

    assert_eq!(*count.borrow(), 1);
}

#[test]
fn rejected_table_edit_pushes_no_command_and_changes_nothing() {
    let mut core = EditorCore::new();
    core.init_mode(Box::new(RichMode::with_markup("<p>x</p>")));
    core.execute(EditOp::InsertTable {
        rows: 1,
        cols: 1,
        with_header: false,
    })
    .unwrap();
    let before = core.content().unwrap();
    let history_depth_before = core.can_undo();

    let applied = core
        .execute(EditOp::Table(
            dualmark_engine::editing::TableOp::DeleteRow,
        ))
        .unwrap();
    assert_eq!(applied, Applied::Rejected);
    assert_eq!(core.content().unwrap(), before);
    assert_eq!(core.can_undo(), history_depth_before);

    let applied = core
        .execute(EditOp::Table(
            dualmark_engine::editing::TableOp::DeleteColumn,
        ))
        .unwrap();
    assert_eq!(applied, Applied::Rejected);
    assert_eq!(core.content().unwrap(), before);
}

#[test]
fn destroyed_core_stays_destroyed_and_inert() {
    let mut core = markdown_core("x");
    core.execute(EditOp::InsertText("y".to_string())).unwrap();
    core.destroy();
    core.destroy();
    assert!(core.is_destroyed());
    assert!(!core.can_undo());
    assert!(core.content().is_err());
}

#[test]
fn toolbar_lists_differ_per_mode_but_render_uniformly() {
    let rich = RichMode::empty();
    let markdown = MarkdownMode::empty();

    let rich_ids: Vec<&str> = rich.toolbar_items().iter().map(|i| i.id).collect();
    let markdown_ids: Vec<&str> = markdown.toolbar_items().iter().map(|i| i.id).collect();

    // Both expose the shared basics.
    for id in ["bold", "italic", "link", "table", "embed"] {
        assert!(rich_ids.contains(&id), "rich missing {id}");
        assert!(markdown_ids.contains(&id), "markdown missing {id}");
    }
    // Surface styling exists only on the rich side.
    assert!(rich_ids.contains(&"text-color"));
    assert!(!markdown_ids.contains(&"text-color"));
}
