//! [`EditorCore`]: command execution, history, mode lifecycle.

use crate::editing::commands::{Applied, Command, EditCommand, EditOp};
use crate::editing::events::{
    DialogKind, DialogRequest, DialogSeed, EditorEvent, EventBus, EventKind, SubscriptionId,
};
use crate::editing::toolbar::{ColorTarget, SelectTarget, ToolbarAction};
use crate::editing::EditorError;
use crate::modes::{Container, Mode, SelectionTarget};

/// One key press as forwarded by the host.
///
/// `composing` is true while a multi-keystroke (IME) composition is in
/// progress; shortcuts are suppressed then so the in-progress character is
/// not corrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: char,
    pub ctrl: bool,
    pub composing: bool,
}

/// Owns the live mode, the undo/redo stacks and the event bus.
///
/// At most one mode is live at a time. Both stacks only ever contain
/// commands created against the live mode: they are cleared before any
/// mode switch, so a command can never target a destroyed surface.
#[derive(Default)]
pub struct EditorCore {
    mode: Option<Box<dyn Mode>>,
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    bus: EventBus,
    destroyed: bool,
}

impl EditorCore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- events ----

    pub fn on(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&EditorEvent) + 'static,
    ) -> SubscriptionId {
        self.bus.on(kind, callback)
    }

    pub fn off(&mut self, id: SubscriptionId) {
        self.bus.off(id);
    }

    pub fn emit(&mut self, event: &EditorEvent) {
        self.bus.emit(event);
    }

    // ---- history ----

    /// Executes a command against the live mode. Applied commands go on
    /// the undo stack and invalidate the redo stack; rejected and
    /// unsupported ones leave history untouched.
    pub fn execute_command(
        &mut self,
        mut command: Box<dyn Command>,
    ) -> Result<Applied, EditorError> {
        let mode = self.mode.as_deref_mut().ok_or(EditorError::NoLiveMode)?;
        let applied = command.execute(mode)?;
        if applied == Applied::Applied {
            self.undo_stack.push(command);
            self.redo_stack.clear();
            self.emit_history();
            self.emit_surface_state();
        }
        Ok(applied)
    }

    /// Convenience wrapper: execute a bare [`EditOp`].
    pub fn execute(&mut self, op: EditOp) -> Result<Applied, EditorError> {
        self.execute_command(Box::new(EditCommand::new(op)))
    }

    /// Undoes the most recent command. A no-op on an empty stack.
    pub fn undo(&mut self) -> Result<(), EditorError> {
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(());
        };
        let mode = self.mode.as_deref_mut().ok_or(EditorError::NoLiveMode)?;
        command.undo(mode)?;
        self.redo_stack.push(command);
        self.emit_history();
        self.emit_surface_state();
        Ok(())
    }

    /// Re-executes the most recently undone command. A no-op on an empty
    /// stack.
    pub fn redo(&mut self) -> Result<(), EditorError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(());
        };
        let mode = self.mode.as_deref_mut().ok_or(EditorError::NoLiveMode)?;
        command.execute(mode)?;
        self.undo_stack.push(command);
        self.emit_history();
        self.emit_surface_state();
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    // ---- mode lifecycle ----

    /// First-time mode registration. No content transformation happens;
    /// the caller mounts and seeds afterwards.
    pub fn init_mode(&mut self, mode: Box<dyn Mode>) {
        let kind = mode.kind();
        self.mode = Some(mode);
        self.emit(&EditorEvent::ModeChanged { mode: kind });
    }

    /// Switches to a new mode.
    ///
    /// The old mode is asked for its content and destroyed, the new mode
    /// translates that content via [`Mode::transform_data`], and both
    /// history stacks are cleared — command semantics differ per mode, so
    /// history cannot survive the switch. Returns the transformed content;
    /// the caller mounts the new mode and applies the content afterwards.
    /// The core does not mount.
    pub fn set_mode(&mut self, new_mode: Box<dyn Mode>) -> Result<String, EditorError> {
        let mut old = self.mode.take().ok_or(EditorError::NoLiveMode)?;
        let old_content = old.content();
        old.destroy();

        let transformed = new_mode.transform_data(&old_content);
        let kind = new_mode.kind();
        self.mode = Some(new_mode);

        self.undo_stack.clear();
        self.redo_stack.clear();

        self.emit(&EditorEvent::ModeChanged { mode: kind });
        self.emit_history();
        Ok(transformed)
    }

    pub fn mode_kind(&self) -> Option<crate::modes::ModeKind> {
        self.mode.as_deref().map(Mode::kind)
    }

    pub fn mount(&mut self, container: &mut Container) -> Result<(), EditorError> {
        let mode = self.mode.as_deref_mut().ok_or(EditorError::NoLiveMode)?;
        mode.mount(container);
        Ok(())
    }

    // ---- content ----

    pub fn content(&self) -> Result<String, EditorError> {
        let mode = self.mode.as_deref().ok_or(EditorError::NoLiveMode)?;
        Ok(mode.content())
    }

    pub fn set_content(&mut self, content: &str) -> Result<(), EditorError> {
        let mode = self.mode.as_deref_mut().ok_or(EditorError::NoLiveMode)?;
        mode.set_content(content);
        self.emit_surface_state();
        Ok(())
    }

    // ---- selection ----

    /// Forwards a selection change into the live mode. Events fire only
    /// when the selection actually lands inside the surface.
    pub fn select(&mut self, target: &SelectionTarget) -> Result<(), EditorError> {
        let mode = self.mode.as_deref_mut().ok_or(EditorError::NoLiveMode)?;
        if !mode.select(target) {
            return Ok(());
        }
        let text = mode.selected_text();
        let collapsed = text.is_empty();
        self.emit(&EditorEvent::SelectionChanged { collapsed, text });
        self.emit_cursor_state();
        Ok(())
    }

    // ---- host dispatch ----

    /// Routes a toolbar interaction. `value` carries the picked color or
    /// selected option where the action calls for one.
    pub fn dispatch(
        &mut self,
        action: &ToolbarAction,
        value: Option<&str>,
    ) -> Result<(), EditorError> {
        match action {
            ToolbarAction::Command(op) => {
                self.execute(op.clone())?;
            }
            ToolbarAction::OpenDialog(kind) => self.request_dialog(*kind)?,
            ToolbarAction::PickColor(target) => {
                let Some(color) = value else { return Ok(()) };
                let op = match target {
                    ColorTarget::Text => EditOp::SetTextColor(color.to_string()),
                    ColorTarget::Highlight => EditOp::SetHighlightColor(color.to_string()),
                    ColorTarget::CalloutBackground => EditOp::InsertCallout {
                        color: color.to_string(),
                    },
                    ColorTarget::CellBackground => EditOp::Table(
                        crate::editing::commands::TableOp::SetCellBackground(color.to_string()),
                    ),
                    ColorTarget::CellForeground => EditOp::Table(
                        crate::editing::commands::TableOp::SetCellForeground(color.to_string()),
                    ),
                };
                self.execute(op)?;
            }
            ToolbarAction::SelectOption(target) => {
                let Some(choice) = value else { return Ok(()) };
                let op = match target {
                    SelectTarget::HeadingLevel => match choice.parse::<u8>() {
                        Ok(level @ 1..=3) => EditOp::SetHeading(level),
                        _ => EditOp::SetParagraph,
                    },
                    SelectTarget::FontFamily => EditOp::SetFontFamily(choice.to_string()),
                    SelectTarget::FontSize => EditOp::SetFontSize(choice.to_string()),
                    SelectTarget::LineHeight => EditOp::SetLineHeight(choice.to_string()),
                };
                self.execute(op)?;
            }
            ToolbarAction::Undo => self.undo()?,
            ToolbarAction::Redo => self.redo()?,
        }
        Ok(())
    }

    /// Shared keyboard shortcuts, identical in both modes. Returns whether
    /// the key was consumed. Suppressed entirely during composition.
    pub fn handle_key(&mut self, input: KeyInput) -> Result<bool, EditorError> {
        if input.composing || !input.ctrl {
            return Ok(false);
        }
        match input.key.to_ascii_lowercase() {
            'b' => {
                self.execute(EditOp::ToggleMark(crate::ast::Mark::Bold))?;
            }
            'i' => {
                self.execute(EditOp::ToggleMark(crate::ast::Mark::Italic))?;
            }
            'z' => self.undo()?,
            'y' => self.redo()?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Emits a dialog request carrying the seed data the dialog needs.
    pub fn request_dialog(&mut self, kind: DialogKind) -> Result<(), EditorError> {
        let mode = self.mode.as_deref().ok_or(EditorError::NoLiveMode)?;
        let seed = match kind {
            DialogKind::Link => DialogSeed::Link {
                selected_text: mode.selected_text(),
            },
            _ => DialogSeed::Empty,
        };
        self.emit(&EditorEvent::DialogRequested {
            request: DialogRequest { kind, seed },
        });
        Ok(())
    }

    // ---- teardown ----

    /// Idempotent teardown: destroys the mode, clears listeners and both
    /// stacks. Calling it twice is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Some(mode) = self.mode.as_deref_mut() {
            mode.destroy();
        }
        self.mode = None;
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.bus.clear();
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ---- event helpers ----

    fn emit_history(&mut self) {
        let event = EditorEvent::HistoryChanged {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        };
        self.emit(&event);
    }

    fn emit_surface_state(&mut self) {
        if let Some(mode) = self.mode.as_deref() {
            let content = mode.content();
            self.emit(&EditorEvent::ContentChanged { content });
        }
        self.emit_cursor_state();
    }

    fn emit_cursor_state(&mut self) {
        let Some(mode) = self.mode.as_deref() else {
            return;
        };
        let cursor = mode.caret();
        let state = mode.format_state();
        let in_table = mode.in_table();
        self.emit(&EditorEvent::CursorChanged { cursor });
        self.emit(&EditorEvent::FormatActive { state });
        self.emit(&EditorEvent::TableActive { active: in_table });
    }
}

impl std::fmt::Debug for EditorCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorCore")
            .field("mode", &self.mode_kind())
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::markdown::MarkdownMode;
    use crate::modes::rich::RichMode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn markdown_core(initial: &str) -> EditorCore {
        let mut core = EditorCore::new();
        core.init_mode(Box::new(MarkdownMode::new(initial)));
        core
    }

    #[test]
    fn test_execute_undo_redo_cycle() {
        let mut core = markdown_core("start");
        core.select(&SelectionTarget::TextRange(5..5)).unwrap();
        core.execute(EditOp::InsertText(" end".to_string())).unwrap();
        assert_eq!(core.content().unwrap(), "start end");
        assert!(core.can_undo());
        assert!(!core.can_redo());

        core.undo().unwrap();
        assert_eq!(core.content().unwrap(), "start");
        assert!(core.can_redo());

        core.redo().unwrap();
        assert_eq!(core.content().unwrap(), "start end");
    }

    #[test]
    fn test_undo_redo_underflow_is_silent() {
        let mut core = markdown_core("x");
        core.undo().unwrap();
        core.redo().unwrap();
        assert_eq!(core.content().unwrap(), "x");
    }

    #[test]
    fn test_new_command_clears_redo() {
        let mut core = markdown_core("");
        core.execute(EditOp::InsertText("a".to_string())).unwrap();
        core.undo().unwrap();
        assert!(core.can_redo());
        core.execute(EditOp::InsertText("b".to_string())).unwrap();
        assert!(!core.can_redo());
    }

    #[test]
    fn test_rejected_command_not_pushed() {
        let mut core = markdown_core("");
        core.select(&SelectionTarget::TextRange(0..0)).unwrap();
        let applied = core.execute(EditOp::DeleteBackward).unwrap();
        assert_eq!(applied, Applied::Rejected);
        assert!(!core.can_undo());
    }

    #[test]
    fn test_unsupported_command_not_pushed() {
        let mut core = markdown_core("x");
        let applied = core
            .execute(EditOp::SetFontFamily("serif".to_string()))
            .unwrap();
        assert_eq!(applied, Applied::Unsupported);
        assert!(!core.can_undo());
    }

    #[test]
    fn test_set_mode_transforms_and_resets_history() {
        let mut core = markdown_core("# Title");
        core.execute(EditOp::InsertText("!".to_string())).unwrap();
        assert!(core.can_undo());

        let transformed = core.set_mode(Box::new(RichMode::empty())).unwrap();
        assert_eq!(transformed, "<h1>Title!</h1>");
        assert!(!core.can_undo());
        assert!(!core.can_redo());
        assert_eq!(core.mode_kind(), Some(crate::modes::ModeKind::Rich));
    }

    #[test]
    fn test_history_event_fires_on_execute_and_switch() {
        let mut core = markdown_core("");
        let states = Rc::new(RefCell::new(Vec::new()));
        let sink = states.clone();
        core.on(EventKind::HistoryChanged, move |event| {
            if let EditorEvent::HistoryChanged { can_undo, can_redo } = event {
                sink.borrow_mut().push((*can_undo, *can_redo));
            }
        });

        core.execute(EditOp::InsertText("a".to_string())).unwrap();
        core.set_mode(Box::new(RichMode::empty())).unwrap();

        assert_eq!(*states.borrow(), vec![(true, false), (false, false)]);
    }

    #[test]
    fn test_content_changed_fires_with_full_content() {
        let mut core = markdown_core("");
        let contents = Rc::new(RefCell::new(Vec::new()));
        let sink = contents.clone();
        core.on(EventKind::ContentChanged, move |event| {
            if let EditorEvent::ContentChanged { content } = event {
                sink.borrow_mut().push(content.clone());
            }
        });

        core.execute(EditOp::InsertText("hi".to_string())).unwrap();
        assert_eq!(*contents.borrow(), vec!["hi".to_string()]);
    }

    #[test]
    fn test_handle_key_shortcuts() {
        let mut core = markdown_core("");
        assert!(core
            .handle_key(KeyInput {
                key: 'b',
                ctrl: true,
                composing: false
            })
            .unwrap());
        assert_eq!(core.content().unwrap(), "****");
    }

    #[test]
    fn test_handle_key_suppressed_while_composing() {
        let mut core = markdown_core("");
        assert!(!core
            .handle_key(KeyInput {
                key: 'b',
                ctrl: true,
                composing: true
            })
            .unwrap());
        assert_eq!(core.content().unwrap(), "");
    }

    #[test]
    fn test_link_dialog_seeded_with_selection() {
        let mut core = markdown_core("pick me");
        core.select(&SelectionTarget::TextRange(0..4)).unwrap();

        let seeds = Rc::new(RefCell::new(Vec::new()));
        let sink = seeds.clone();
        core.on(EventKind::DialogRequested, move |event| {
            if let EditorEvent::DialogRequested { request } = event {
                sink.borrow_mut().push(request.clone());
            }
        });
        core.request_dialog(DialogKind::Link).unwrap();

        assert_eq!(
            seeds.borrow()[0].seed,
            DialogSeed::Link {
                selected_text: "pick".to_string()
            }
        );
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut core = markdown_core("x");
        core.on(EventKind::ContentChanged, |_| {});
        core.destroy();
        assert!(core.is_destroyed());
        assert!(core.content().is_err());
        // Second destroy is a no-op, not a panic or error.
        core.destroy();
        assert!(core.is_destroyed());
    }

    #[test]
    fn test_selection_outside_surface_emits_nothing() {
        let mut core = markdown_core("ab");
        let fired = Rc::new(RefCell::new(0));
        let sink = fired.clone();
        core.on(EventKind::CursorChanged, move |_| {
            *sink.borrow_mut() += 1;
        });
        core.select(&SelectionTarget::TextRange(50..60)).unwrap();
        assert_eq!(*fired.borrow(), 0);
        core.select(&SelectionTarget::TextRange(1..1)).unwrap();
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_dispatch_toolbar_color_pick() {
        let mut core = EditorCore::new();
        core.init_mode(Box::new(RichMode::with_markup("<p>tint</p>")));
        core.dispatch(
            &ToolbarAction::PickColor(ColorTarget::Text),
            Some("#ffe066"),
        )
        .unwrap();
        assert!(core.content().unwrap().contains("color: #ffe066"));
    }
}
