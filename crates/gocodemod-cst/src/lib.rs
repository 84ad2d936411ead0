// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A Go parser, syntax tree and gofmt-style printer.
//!
//! # Overview
//!
//! - **Parsing**: [`parse_file`] turns a complete source file into an owned
//!   syntax tree plus the table of comments attached to its nodes.
//! - **Printing**: [`print_file`] formats a (possibly modified) tree the way
//!   gofmt does; [`source_code`] renders a single node compactly.
//! - **Traversal**: the [`visitor`] module walks trees read-only or mutably.
//!
//! # Quick Start
//!
//! ```
//! use gocodemod_cst::{parse_file, print_file};
//!
//! let parsed = parse_file("package main\nfunc main(){println(1)}\n").expect("parse error");
//! assert_eq!(print_file(&parsed), "package main\n\nfunc main() { println(1) }\n");
//! ```
//!
//! Nodes carry their source positions inline. Nodes built in code (or
//! cleaned with [`visitor::clear_positions`]) have no positions and are laid
//! out compactly wherever they are printed.

use std::cmp::min;

#[macro_use]
mod macros;

/// gofmt-style printer.
pub mod codegen;
pub use codegen::{print_file, print_file_with, source_code, Codegen, CodegenState, PrinterConfig};

/// Syntax tree node types.
pub mod nodes;
pub use nodes::*;

/// PEG parser over the token stream.
pub mod parser;
pub use parser::{parse_file, ParseLoc, ParsedFile, ParserError};

/// Tokenizer with automatic semicolon insertion.
pub mod tokenizer;

/// Visitor infrastructure for tree traversal.
pub mod visitor;

/// Render a parse error with the offending source line, for reports.
///
/// # Example
///
/// ```
/// use gocodemod_cst::{parse_file, prettify_error};
///
/// let source = "package p\n\nfunc f( {\n}\n";
/// if let Err(e) = parse_file(source) {
///     let formatted = prettify_error(&e, source, "example.go");
///     assert!(formatted.contains("example.go"));
/// }
/// ```
pub fn prettify_error(err: &ParserError, source: &str, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let lines = gocodemod_core::LineIndex::new(source);
    let offset = min(err.offset(), source.len());
    let line = lines.line_of(offset);
    // One line of context on each side.
    let first = line.saturating_sub(1).max(1);
    let start_offset = lines.line_start(first).unwrap_or(0);
    let end_offset = lines.line_start(line + 2).unwrap_or(source.len());
    let snippet = &source[start_offset..end_offset];

    let start = offset - start_offset;
    let end = min(start + 1, snippet.len()).max(start);
    let message = err.message();
    let rendered = Renderer::styled()
        .render(
            Level::Error.title(label).snippet(
                Snippet::source(snippet)
                    .line_start(first as usize)
                    .fold(false)
                    .annotation(Level::Error.span(start..end).label(&message)),
            ),
        )
        .to_string();
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prettify_error_shows_line() {
        let source = "package p\n\nvar = 1\n";
        let err = parse_file(source).unwrap_err();
        let rendered = prettify_error(&err, source, "bad.go");
        assert!(rendered.contains("bad.go"));
        assert!(rendered.contains("var = 1"));
    }

    #[test]
    fn test_prettify_error_at_end_of_input() {
        let source = "package p\n\nfunc f() {";
        let err = parse_file(source).unwrap_err();
        let rendered = prettify_error(&err, source, "eof.go");
        assert!(rendered.contains("eof.go"));
    }

    #[test]
    fn test_missing_package_clause_fails() {
        assert!(parse_file("func main() {}\n").is_err());
    }
}
