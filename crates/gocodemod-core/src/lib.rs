//! Core infrastructure for gocodemod.
//!
//! This crate provides language-agnostic infrastructure shared by the
//! syntax tree crate and the codemod engine:
//! - Byte spans over source text
//! - Line indexes for offset to line:column conversion
//! - Text helpers used for textual matching of rendered code

pub mod span;
pub mod text;

pub use span::Span;
pub use text::{normalize_string, quote, unquote, LineIndex};
