//! Typed event bus.
//!
//! The event set is closed: each variant carries exactly the payload its
//! subscribers need, nothing dynamic. The bus belongs to [`EditorCore`];
//! modes and the host publish and subscribe through it but never hold
//! subscriber state of their own. Emission is synchronous and in
//! subscription order.
//!
//! [`EditorCore`]: crate::editing::core::EditorCore

use uuid::Uuid;

use crate::modes::ModeKind;

/// Per-mark activity at the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
}

/// Cursor position plus document size, as shown in a status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorInfo {
    /// 1-based line (markdown surface) or block ordinal (rich surface).
    pub line: usize,
    /// 1-based column within the line or block.
    pub column: usize,
    /// Total character count of the surface's plain text.
    pub chars: usize,
}

/// Which host dialog is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Link,
    Image,
    Embed,
    SpecialChar,
    Table,
}

/// Seed data a dialog opens with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogSeed {
    /// Link dialog pre-fills the selected text as the label.
    Link { selected_text: String },
    /// The remaining dialogs open empty; the image dialog additionally
    /// awaits the host's upload callback, which never enters the engine.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub kind: DialogKind,
    pub seed: DialogSeed,
}

/// Everything the editor can tell the host.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ContentChanged { content: String },
    ModeChanged { mode: ModeKind },
    SelectionChanged { collapsed: bool, text: String },
    HistoryChanged { can_undo: bool, can_redo: bool },
    CursorChanged { cursor: CursorInfo },
    FormatActive { state: FormatState },
    TableActive { active: bool },
    DialogRequested { request: DialogRequest },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ContentChanged,
    ModeChanged,
    SelectionChanged,
    HistoryChanged,
    CursorChanged,
    FormatActive,
    TableActive,
    DialogRequested,
}

impl EditorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            EditorEvent::ContentChanged { .. } => EventKind::ContentChanged,
            EditorEvent::ModeChanged { .. } => EventKind::ModeChanged,
            EditorEvent::SelectionChanged { .. } => EventKind::SelectionChanged,
            EditorEvent::HistoryChanged { .. } => EventKind::HistoryChanged,
            EditorEvent::CursorChanged { .. } => EventKind::CursorChanged,
            EditorEvent::FormatActive { .. } => EventKind::FormatActive,
            EditorEvent::TableActive { .. } => EventKind::TableActive,
            EditorEvent::DialogRequested { .. } => EventKind::DialogRequested,
        }
    }
}

/// Handle returned by [`EventBus::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(Uuid);

type Callback = Box<dyn FnMut(&EditorEvent)>;

/// Subscriber registry. Subscribers for one kind fire in the order they
/// subscribed; emission is fully synchronous.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, EventKind, Callback)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: EventKind, callback: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        self.subscribers.push((id, kind, Box::new(callback)));
        id
    }

    pub fn off(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _, _)| *sub_id != id);
    }

    pub fn emit(&mut self, event: &EditorEvent) {
        let kind = event.kind();
        for (_, sub_kind, callback) in &mut self.subscribers {
            if *sub_kind == kind {
                callback(event);
            }
        }
    }

    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_matching_subscribers_in_order() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_a = seen.clone();
        bus.on(EventKind::ContentChanged, move |_| seen_a.borrow_mut().push("a"));
        let seen_b = seen.clone();
        bus.on(EventKind::ContentChanged, move |_| seen_b.borrow_mut().push("b"));
        let seen_c = seen.clone();
        bus.on(EventKind::ModeChanged, move |_| seen_c.borrow_mut().push("c"));

        bus.emit(&EditorEvent::ContentChanged {
            content: "x".to_string(),
        });

        assert_eq!(*seen.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_off_removes_subscription() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let count_inner = count.clone();
        let id = bus.on(EventKind::HistoryChanged, move |_| {
            *count_inner.borrow_mut() += 1;
        });

        let event = EditorEvent::HistoryChanged {
            can_undo: false,
            can_redo: false,
        };
        bus.emit(&event);
        bus.off(id);
        bus.emit(&event);

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut bus = EventBus::new();
        bus.on(EventKind::ContentChanged, |_| {});
        bus.on(EventKind::CursorChanged, |_| {});
        assert_eq!(bus.len(), 2);
        bus.clear();
        assert!(bus.is_empty());
    }
}
