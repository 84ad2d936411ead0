// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for syntax tree traversal.

use crate::nodes::*;

/// Result of visiting a node - controls traversal behavior.
///
/// When a visitor method returns a `VisitResult`, it controls how the walker
/// proceeds with traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// The walker will not descend into this node's children, but `leave_*`
    /// will still be called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` methods will be called. The walk
    /// function will return immediately.
    Stop,
}

/// Generate `visit_*`/`leave_*` pairs taking shared references.
macro_rules! visitor_methods {
    ($($name:ident: $ty:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Visit a [`", stringify!($ty), "`] node.")]
                #[doc = ""]
                #[doc = "Called after `enter_node`, before descending into children."]
                #[allow(unused_variables)]
                fn [<visit_ $name>](&mut self, node: &$ty) -> VisitResult {
                    VisitResult::Continue
                }

                #[doc = concat!("Leave a [`", stringify!($ty), "`] node.")]
                #[allow(unused_variables)]
                fn [<leave_ $name>](&mut self, node: &$ty) {}
            )*
        }
    };
}

/// Generate `visit_*`/`leave_*` pairs taking mutable references.
macro_rules! visitor_mut_methods {
    ($($name:ident: $ty:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Visit a [`", stringify!($ty), "`] node.")]
                #[allow(unused_variables)]
                fn [<visit_ $name>](&mut self, node: &mut $ty) -> VisitResult {
                    VisitResult::Continue
                }

                #[doc = concat!("Leave a [`", stringify!($ty), "`] node.")]
                #[allow(unused_variables)]
                fn [<leave_ $name>](&mut self, node: &mut $ty) {}
            )*
        }
    };
}

/// Read-only visitor for syntax tree traversal.
///
/// Every node kind has a `visit_*`/`leave_*` pair. Visitors that treat all
/// kinds alike (searches by id, collectors keyed on [`NodeKind`]) override
/// the generic [`enter_node`](Visitor::enter_node) and
/// [`leave_node`](Visitor::leave_node) hooks instead.
///
/// # Traversal Order
///
/// For each node the walker calls, in order:
/// 1. `visit_node_id`
/// 2. `enter_node`, then `visit_*` if `enter_node` returned `Continue`
/// 3. `visit_pos` for each position and the walk of each child, in source order
/// 4. `leave_*`, then `leave_node`
///
/// # Example
///
/// ```
/// use gocodemod_cst::visitor::{walk_file, VisitResult, Visitor};
/// use gocodemod_cst::{parse_file, CallExpr};
///
/// struct CallCounter(usize);
///
/// impl Visitor for CallCounter {
///     fn visit_call_expr(&mut self, _node: &CallExpr) -> VisitResult {
///         self.0 += 1;
///         VisitResult::Continue
///     }
/// }
///
/// let parsed = parse_file("package p\n\nfunc f() {\n\tg(h())\n}\n").unwrap();
/// let mut counter = CallCounter(0);
/// walk_file(&mut counter, &parsed.file);
/// assert_eq!(counter.0, 2);
/// ```
pub trait Visitor {
    /// Called first for every node.
    #[allow(unused_variables)]
    fn visit_node_id(&mut self, id: &Option<NodeId>) {}

    /// Called for every position-bearing token of a node.
    #[allow(unused_variables)]
    fn visit_pos(&mut self, pos: &Pos) {}

    #[allow(unused_variables)]
    fn enter_node(&mut self, node: NodeRef<'_>) -> VisitResult {
        VisitResult::Continue
    }

    #[allow(unused_variables)]
    fn leave_node(&mut self, node: NodeRef<'_>) {}

    for_each_node_kind!(visitor_methods);
}

/// Mutating visitor for syntax tree traversal.
///
/// Same traversal order as [`Visitor`]. Changes made in `enter_node` or
/// `visit_*` are seen by the walk of the node's children.
pub trait VisitorMut {
    #[allow(unused_variables)]
    fn visit_node_id(&mut self, id: &mut Option<NodeId>) {}

    #[allow(unused_variables)]
    fn visit_pos(&mut self, pos: &mut Pos) {}

    #[allow(unused_variables)]
    fn enter_node(&mut self, node: NodeMut<'_>) -> VisitResult {
        VisitResult::Continue
    }

    #[allow(unused_variables)]
    fn leave_node(&mut self, node: NodeMut<'_>) {}

    for_each_node_kind!(visitor_mut_methods);
}
