//! Ancestry chains and function scopes.
//!
//! A traversal of a file hands every node a [`NodeWithAncestry`]: the node's
//! kind and id plus a shared link to its parent's record, up to the file
//! root. The chain is built fresh on every traversal and only records
//! identities, so it never keeps tree nodes alive or lets anyone mutate
//! upward. Mutations use it to find the statement list to splice into.
//!
//! The same traversal tracks the [`Scope`]: the function declaration on the
//! path from the root to the current node, if any.

use std::fmt;
use std::rc::Rc;

use gocodemod_cst::visitor::{VisitResult, Visitor};
use gocodemod_cst::{FuncDecl, NodeId, NodeKind, NodeRef};

// ============================================================================
// NodeWithAncestry
// ============================================================================

/// A located node and the chain of its ancestors.
#[derive(Debug)]
pub struct NodeWithAncestry {
    kind: NodeKind,
    node_id: Option<NodeId>,
    parent: Option<Rc<NodeWithAncestry>>,
}

impl NodeWithAncestry {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.node_id
    }

    pub fn parent(&self) -> Option<&NodeWithAncestry> {
        self.parent.as_deref()
    }

    /// Iterate over the ancestors, nearest first, ending at the file root.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Number of links between this node and the file root.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// The nearest ancestor of the given kind.
    pub fn find_ancestor(&self, kind: NodeKind) -> Option<&NodeWithAncestry> {
        self.ancestors().find(|a| a.kind == kind)
    }

    /// The nearest enclosing statement list and the statement in it that
    /// holds this node (which may be the node itself).
    ///
    /// Returns `(container, anchor)`, or `None` outside function bodies.
    pub fn statement_anchor(&self) -> Option<(&NodeWithAncestry, &NodeWithAncestry)> {
        let mut current = self;
        loop {
            let parent = current.parent()?;
            if parent.kind.is_statement_list() {
                return Some((parent, current));
            }
            current = parent;
        }
    }
}

/// Iterator over the ancestors of a [`NodeWithAncestry`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a NodeWithAncestry>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a NodeWithAncestry;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

// ============================================================================
// Scope
// ============================================================================

/// The function declaration a match was found in, or the top level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Scope {
    function: Option<NodeId>,
    name: Option<String>,
}

static TOP_LEVEL: Scope = Scope {
    function: None,
    name: None,
};

impl Scope {
    /// The scope of constructs outside any function declaration.
    pub fn top_level() -> Self {
        Scope::default()
    }

    pub(crate) fn of_function(decl: &FuncDecl) -> Self {
        Scope {
            function: decl.node_id,
            name: Some(decl.name.name.clone()),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.function.is_none() && self.name.is_none()
    }

    /// Name of the enclosing function declaration.
    pub fn function_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Id of the enclosing function declaration.
    pub fn function_id(&self) -> Option<NodeId> {
        self.function
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "func {}", name),
            None => f.write_str("top level"),
        }
    }
}

// ============================================================================
// Traversal
// ============================================================================

/// Walks a tree once, handing each node its ancestry and scope.
///
/// A function declaration belongs to the scope it is declared in; only the
/// nodes below it are in its own scope.
pub(crate) struct ScopedTraversal<F> {
    stack: Vec<Rc<NodeWithAncestry>>,
    scopes: Vec<Scope>,
    callback: F,
}

impl<F> ScopedTraversal<F>
where
    F: FnMut(NodeRef<'_>, &Rc<NodeWithAncestry>, &Scope),
{
    pub(crate) fn new(callback: F) -> Self {
        ScopedTraversal {
            stack: Vec::new(),
            scopes: Vec::new(),
            callback,
        }
    }
}

impl<F> Visitor for ScopedTraversal<F>
where
    F: FnMut(NodeRef<'_>, &Rc<NodeWithAncestry>, &Scope),
{
    fn enter_node(&mut self, node: NodeRef<'_>) -> VisitResult {
        let link = Rc::new(NodeWithAncestry {
            kind: node.kind(),
            node_id: node.node_id(),
            parent: self.stack.last().cloned(),
        });
        let scope = self.scopes.last().unwrap_or(&TOP_LEVEL);
        (self.callback)(node, &link, scope);

        if let NodeRef::FuncDecl(decl) = node {
            self.scopes.push(Scope::of_function(decl));
        }
        self.stack.push(link);
        VisitResult::Continue
    }

    fn leave_node(&mut self, node: NodeRef<'_>) {
        self.stack.pop();
        if let NodeRef::FuncDecl(_) = node {
            self.scopes.pop();
        }
    }
}
