//! Dual-mode content editing engine.
//!
//! A headless authoring core with two interchangeable editing modes over
//! one document:
//!
//! - **Rich mode** edits a structured document tree ([`ast::AstNode`])
//!   serialized as sanitizable markup.
//! - **Markdown mode** edits Markdown source in a plain text buffer.
//!
//! Conversions between the two formats go through the tree: a
//! recursive-descent Markdown parser and serializer ([`parsing`]), a
//! markup serializer and allow-list sanitizer ([`markup`]), and a
//! heuristic markup→Markdown fallback for rich-mode content entering the
//! Markdown surface.
//!
//! [`editing::EditorCore`] coordinates the live mode: commands with
//! snapshot-based undo/redo, a typed event bus, toolbar and keyboard
//! dispatch, and mode switching (which transforms content and resets
//! history, since command semantics differ per mode).
//!
//! ## Usage pattern
//!
//! ```rust
//! use dualmark_engine::editing::{EditOp, EditorCore};
//! use dualmark_engine::modes::{Container, MarkdownMode, RichMode};
//!
//! // 1. Create the core with an initial mode and seed content once.
//! let mut core = EditorCore::new();
//! core.init_mode(Box::new(MarkdownMode::new("# Hello")));
//! let mut container = Container::new("editor-root");
//! core.mount(&mut container).unwrap();
//!
//! // 2. Edit through commands; undo/redo comes for free.
//! core.execute(EditOp::InsertText("\n\nWorld".to_string())).unwrap();
//! core.undo().unwrap();
//!
//! // 3. Switch modes: content is transformed, history resets.
//! let transformed = core.set_mode(Box::new(RichMode::empty())).unwrap();
//! core.mount(&mut container).unwrap();
//! core.set_content(&transformed).unwrap();
//! assert!(transformed.starts_with("<h1>"));
//! ```

pub mod ast;
pub mod editing;
pub mod markup;
pub mod modes;
pub mod parsing;

// Re-export key types for easier usage
pub use ast::{AstNode, Mark};
pub use editing::{Applied, Command, EditCommand, EditOp, EditorCore, EditorError, EditorEvent};
pub use modes::{Container, MarkdownMode, Mode, ModeKind, RichMode, SelectionTarget};
