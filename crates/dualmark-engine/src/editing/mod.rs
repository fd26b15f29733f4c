//! Editor core.
//!
//! The pieces that sit above the two modes and below the host UI:
//!
//! - **`events`**: the closed [`EditorEvent`] set and the [`EventBus`] the
//!   core owns. Events fire synchronously in emission order.
//! - **`commands`**: the [`Command`] history unit, the shared [`EditOp`]
//!   intent set both modes realize, and the snapshot-carrying
//!   [`EditCommand`] implementation.
//! - **`core`**: [`EditorCore`] — command execution, undo/redo stacks,
//!   mode lifecycle and switching, toolbar/keyboard dispatch.
//! - **`toolbar`**: the descriptor list hosts render their toolbar from.
//!
//! Ownership discipline: the live mode exclusively owns its surface; the
//! core exclusively owns the undo/redo stacks and the subscriber registry.
//! Exactly one mode is live at a time, so commands can never outlive the
//! surface they were recorded against — both stacks are cleared before a
//! mode switch.
//!
//! [`EditorEvent`]: events::EditorEvent
//! [`EventBus`]: events::EventBus
//! [`Command`]: commands::Command
//! [`EditOp`]: commands::EditOp
//! [`EditCommand`]: commands::EditCommand
//! [`EditorCore`]: core::EditorCore

pub mod commands;
pub mod core;
pub mod events;
pub mod toolbar;

pub use commands::{Applied, Command, EditCommand, EditOp, SnapshotContent, SurfaceSnapshot, TableOp};
pub use core::{EditorCore, KeyInput};
pub use events::{
    CursorInfo, DialogKind, DialogRequest, DialogSeed, EditorEvent, EventBus, EventKind,
    FormatState, SubscriptionId,
};
pub use toolbar::{ColorTarget, SelectTarget, ToolbarAction, ToolbarItem, ToolbarItemKind};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no live mode")]
    NoLiveMode,
    #[error("selection does not resolve to a node: {0}")]
    InvalidSelection(String),
}
