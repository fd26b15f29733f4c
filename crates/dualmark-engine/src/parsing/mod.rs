//! Markdown text ⇄ [`AstNode`] conversion.
//!
//! The parser is two single passes: a forward line scan that recognizes
//! block constructs in a fixed priority order ([`blocks`]), and one
//! ordered-alternation regex pass over each block's text for inline
//! constructs ([`inline`]). Malformed input never errors; anything that
//! fails to match a construct falls back to literal text or paragraph
//! accumulation.
//!
//! [`serialize`] is the structural inverse, mapping each variant to its
//! canonical Markdown spelling.
//!
//! [`AstNode`]: crate::ast::AstNode

pub mod blocks;
pub mod inline;
pub mod serialize;

pub use blocks::parse_document;
pub use inline::parse_inline;
pub use serialize::serialize as serialize_markdown;
