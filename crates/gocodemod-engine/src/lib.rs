//! Scoped queries and statement-level mutations over Go source files.
//!
//! This crate provides the codemod engine on top of `gocodemod-cst`:
//! - [`SourceFile`]: a parsed file that prints back to gofmt-formatted text
//! - Ancestry chains and function scopes for every located node
//! - Queries for calls, assignments, if and switch statements, function and
//!   type declarations, map literals and imports, grouped by [`Scope`]
//! - Insert, remove and replace edits anchored on the enclosing statement list
//! - Fragment parsing to build new nodes from Go snippets
//!
//! # Example
//!
//! ```
//! use gocodemod_engine::{parse_expr, SourceFile};
//!
//! let mut file = SourceFile::new(
//!     "package main\n\nfunc main() {\n\terrors.New(\"boom\")\n}\n",
//! )
//! .unwrap();
//! for call in file.find_function_calls("errors.New").into_values().flatten() {
//!     call.replace(&mut file, parse_expr("fmt.Errorf(\"boom\")").unwrap());
//! }
//! file.imports().add("fmt");
//! assert!(file.print().contains("fmt.Errorf(\"boom\")"));
//! ```

pub mod ancestry;
pub mod calls;
pub mod declarations;
pub mod error;
pub mod fragment;
pub mod imports;
pub mod literals;
pub mod source_file;
pub mod statements;

mod splice;

pub use ancestry::{Ancestors, NodeWithAncestry, Scope};
pub use calls::FunctionCall;
pub use declarations::{Function, Method, MethodOrigin, TypeDeclaration};
pub use error::{CodemodError, CodemodResult};
pub use fragment::{parse_expr, parse_fragment, parse_stmt, Fragment};
pub use imports::Imports;
pub use literals::{MapLiteral, StructLiteral};
pub use source_file::{MatchMode, Package, ScopedMatches, SourceFile};
pub use statements::{Assignment, IfStatement, SwitchStatement};

/// The syntax tree crate, for codemods that edit nodes directly.
pub use gocodemod_cst as cst;
