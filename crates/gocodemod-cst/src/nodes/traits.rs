// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Core traits and types for syntax tree nodes.
//!
//! # Node Identity
//!
//! [`NodeId`] gives every node parsed from source a unique, deterministic
//! identifier. The query engine captures ids when it matches a node and later
//! uses them to find the exact node again for mutation, so two textually
//! identical statements are never confused with each other.
//!
//! Nodes built by hand or cloned out of a fragment may carry `None`; the engine
//! assigns fresh ids when it splices such nodes into a file.
//!
//! # Positions
//!
//! Layout tokens (braces, parentheses, keywords, identifiers, literals) carry a
//! [`Pos`]: a 1-based byte offset into the parsed source, or [`Pos::NONE`] for
//! synthesized nodes. Positions only steer layout decisions in the printer
//! (line breaks, blank lines); no syntax is ever encoded in them.
//!
//! # Comments
//!
//! Comments live in a side table, [`CommentTable`], keyed by the id of the
//! statement, declaration, spec, field or element they belong to.

use std::collections::HashMap;
use std::fmt;

use gocodemod_core::LineIndex;

use super::*;

// ============================================================================
// Node Identity
// ============================================================================

/// A stable, unique identifier for a syntax tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId with the given value.
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Generator for assigning sequential [`NodeId`]s.
#[derive(Debug, Default, Clone)]
pub struct NodeIdGenerator {
    next_id: u32,
}

impl NodeIdGenerator {
    /// Create a new generator starting from NodeId(0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator whose first id is `first`.
    pub fn starting_at(first: u32) -> Self {
        Self { next_id: first }
    }

    /// Generate the next NodeId.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Get the number of ids generated so far (equivalently, the next id value).
    pub fn count(&self) -> u32 {
        self.next_id
    }
}

// ============================================================================
// Positions
// ============================================================================

/// A source position: 1-based byte offset, `0` meaning "no position".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pos(pub u32);

impl Pos {
    /// The position of a synthesized token.
    pub const NONE: Pos = Pos(0);

    /// Position of the byte at 0-based `offset`.
    pub fn from_offset(offset: usize) -> Self {
        Pos(offset as u32 + 1)
    }

    /// The 0-based byte offset, if this position is valid.
    pub fn offset(self) -> Option<usize> {
        if self.is_valid() {
            Some(self.0 as usize - 1)
        } else {
            None
        }
    }

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// The 1-based source line of this position.
    pub fn line(self, lines: &LineIndex) -> Option<u32> {
        self.offset().map(|offset| lines.line_of(offset))
    }
}

// ============================================================================
// Node Kinds
// ============================================================================

macro_rules! define_node_kinds {
    ($($name:ident: $ty:ident),* $(,)?) => {
        /// The kind of a syntax tree node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($ty,)*
        }

        impl NodeKind {
            /// The node's type name, e.g. `"CallExpr"`.
            pub fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$ty => stringify!($ty),)*
                }
            }
        }

        /// A shared reference to any node.
        #[derive(Debug, Clone, Copy)]
        pub enum NodeRef<'a> {
            $($ty(&'a $ty),)*
        }

        /// A mutable reference to any node.
        #[derive(Debug)]
        pub enum NodeMut<'a> {
            $($ty(&'a mut $ty),)*
        }

        impl NodeRef<'_> {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(NodeRef::$ty(_) => NodeKind::$ty,)*
                }
            }

            pub fn node_id(&self) -> Option<NodeId> {
                match self {
                    $(NodeRef::$ty(node) => node.node_id,)*
                }
            }
        }

        impl NodeMut<'_> {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(NodeMut::$ty(_) => NodeKind::$ty,)*
                }
            }

            pub fn node_id(&self) -> Option<NodeId> {
                match self {
                    $(NodeMut::$ty(node) => node.node_id,)*
                }
            }
        }

        $(
            impl Node for $ty {
                const KIND: NodeKind = NodeKind::$ty;

                fn node_id(&self) -> Option<NodeId> {
                    self.node_id
                }

                fn from_ref<'a>(node: NodeRef<'a>) -> Option<&'a Self> {
                    match node {
                        NodeRef::$ty(node) => Some(node),
                        _ => None,
                    }
                }

                fn from_mut<'a>(node: NodeMut<'a>) -> Option<&'a mut Self> {
                    match node {
                        NodeMut::$ty(node) => Some(node),
                        _ => None,
                    }
                }
            }
        )*
    };
}

for_each_node_kind!(define_node_kinds);

impl NodeKind {
    /// Whether nodes of this kind own a list of statements that mutation
    /// primitives may splice into.
    pub fn is_statement_list(self) -> bool {
        matches!(
            self,
            NodeKind::BlockStmt | NodeKind::CaseClause | NodeKind::CommClause
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Behaviour shared by every concrete node type.
pub trait Node: Clone + fmt::Debug + PartialEq + 'static {
    const KIND: NodeKind;

    fn node_id(&self) -> Option<NodeId>;

    /// Downcast a [`NodeRef`] to this node type.
    fn from_ref<'a>(node: NodeRef<'a>) -> Option<&'a Self>;

    /// Downcast a [`NodeMut`] to this node type.
    fn from_mut<'a>(node: NodeMut<'a>) -> Option<&'a mut Self>;
}

// ============================================================================
// Comments
// ============================================================================

/// A single `//` or `/* */` comment, text included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub pos: Pos,
    pub text: String,
}

impl Comment {
    pub fn new(pos: Pos, text: impl Into<String>) -> Self {
        Comment {
            pos,
            text: text.into(),
        }
    }

    /// `true` for `//` comments, which must be followed by a line break.
    pub fn is_line_comment(&self) -> bool {
        self.text.starts_with("//")
    }

    /// The source line the comment starts on.
    pub fn line(&self, lines: &LineIndex) -> Option<u32> {
        self.pos.line(lines)
    }

    /// The source line the comment ends on.
    pub fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        self.line(lines)
            .map(|line| line + self.text.matches('\n').count() as u32)
    }
}

/// Comments attached to one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeComments {
    /// Comments on the lines before the node (doc comments).
    pub leading: Vec<Comment>,
    /// Comments after the node on its last line, plus comments found inside it.
    pub trailing: Vec<Comment>,
    /// Comments on the same line as the node's opening brace.
    pub opening: Vec<Comment>,
    /// Comments dangling before the node's closing brace.
    pub closing: Vec<Comment>,
}

impl NodeComments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty()
            && self.trailing.is_empty()
            && self.opening.is_empty()
            && self.closing.is_empty()
    }
}

/// Side table of comments keyed by the owning node's id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentTable {
    comments: HashMap<NodeId, NodeComments>,
}

impl CommentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comments recorded for `id`, if any.
    pub fn get(&self, id: Option<NodeId>) -> Option<&NodeComments> {
        id.and_then(|id| self.comments.get(&id))
    }

    /// Mutable access to the comments of `id`, creating an empty entry.
    pub fn entry(&mut self, id: NodeId) -> &mut NodeComments {
        self.comments.entry(id).or_default()
    }

    pub fn leading(&self, id: Option<NodeId>) -> &[Comment] {
        self.get(id).map_or(&[], |c| c.leading.as_slice())
    }

    pub fn trailing(&self, id: Option<NodeId>) -> &[Comment] {
        self.get(id).map_or(&[], |c| c.trailing.as_slice())
    }

    pub fn opening(&self, id: Option<NodeId>) -> &[Comment] {
        self.get(id).map_or(&[], |c| c.opening.as_slice())
    }

    pub fn closing(&self, id: Option<NodeId>) -> &[Comment] {
        self.get(id).map_or(&[], |c| c.closing.as_slice())
    }

    /// Total number of comments in the table.
    pub fn len(&self) -> usize {
        self.comments
            .values()
            .map(|c| c.leading.len() + c.trailing.len() + c.opening.len() + c.closing.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop empty entries left behind by the parser.
    pub(crate) fn prune(&mut self) {
        self.comments.retain(|_, c| !c.is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_generator_sequence() {
        let mut ids = NodeIdGenerator::starting_at(5);
        assert_eq!(ids.next_id(), NodeId(5));
        assert_eq!(ids.next_id(), NodeId(6));
        assert_eq!(ids.count(), 7);
    }

    #[test]
    fn test_pos_offsets() {
        assert!(!Pos::NONE.is_valid());
        assert_eq!(Pos::NONE.offset(), None);
        assert_eq!(Pos::from_offset(0), Pos(1));
        assert_eq!(Pos::from_offset(9).offset(), Some(9));

        let lines = LineIndex::new("package main\n\nfunc f() {}\n");
        assert_eq!(Pos::from_offset(14).line(&lines), Some(3));
        assert_eq!(Pos::NONE.line(&lines), None);
    }

    #[test]
    fn test_node_kind_names() {
        assert_eq!(NodeKind::CallExpr.name(), "CallExpr");
        assert_eq!(NodeKind::BlockStmt.to_string(), "BlockStmt");
        assert!(NodeKind::CaseClause.is_statement_list());
        assert!(!NodeKind::IfStmt.is_statement_list());
    }

    #[test]
    fn test_comment_table_lookup() {
        let mut table = CommentTable::new();
        table
            .entry(NodeId(3))
            .leading
            .push(Comment::new(Pos(1), "// doc"));
        table.entry(NodeId(4));
        table.prune();

        assert_eq!(table.len(), 1);
        assert_eq!(table.leading(Some(NodeId(3)))[0].text, "// doc");
        assert!(table.leading(Some(NodeId(4))).is_empty());
        assert!(table.trailing(None).is_empty());
        assert!(Comment::new(Pos(1), "// x").is_line_comment());
        assert!(!Comment::new(Pos(1), "/* x */").is_line_comment());
    }
}
