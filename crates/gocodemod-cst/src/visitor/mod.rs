// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for syntax tree traversal.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `enter_node` and `visit_*` methods
//! - **Post-order** for `leave_*` and `leave_node` methods
//! - Children are visited in source order (left-to-right, top-to-bottom)
//!
//! [`Visitor`] reads a tree; [`VisitorMut`] may change nodes in place as it
//! goes. Both are driven by the `walk_*` functions in [`dispatch`] or by the
//! [`Walk`] trait implemented for every node type.
//!
//! # Example
//!
//! ```
//! use gocodemod_cst::visitor::{VisitResult, VisitorMut, Walk};
//! use gocodemod_cst::{parse_file, Ident};
//!
//! struct Renamer;
//!
//! impl VisitorMut for Renamer {
//!     fn visit_ident(&mut self, node: &mut Ident) -> VisitResult {
//!         if node.name == "old" {
//!             node.name = "new".to_string();
//!         }
//!         VisitResult::Continue
//!     }
//! }
//!
//! let mut parsed = parse_file("package p\n\nvar old = 1\n").unwrap();
//! parsed.file.walk_mut(&mut Renamer);
//! ```

mod clear;
pub mod dispatch;
mod traits;

pub use clear::{
    assign_ids, assign_missing_ids, clear_positions, edit_by_id, find_by_id, AssignIds, ClearPositions,
};
pub use dispatch::*;
pub use traits::{VisitResult, Visitor, VisitorMut};
