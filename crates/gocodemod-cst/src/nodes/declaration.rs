// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declarations, specs and the file root.

use gocodemod_core::LineIndex;

use super::expression::{BasicLit, Expr, FieldList, FuncType, Ident};
use super::op::DeclKeyword;
use super::statement::BlockStmt;
use super::traits::{NodeId, Pos};

/// A parsed Go source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub node_id: Option<NodeId>,
    pub package_pos: Pos,
    pub name: Ident,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Gen(Box<GenDecl>),
    Func(Box<FuncDecl>),
}

/// An `import`, `const`, `type` or `var` declaration. Printed with
/// parentheses whenever the source had them or it holds several specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenDecl {
    pub node_id: Option<NodeId>,
    pub tok_pos: Pos,
    pub tok: DeclKeyword,
    pub lparen: Pos,
    pub specs: Vec<Spec>,
    pub rparen: Pos,
}

/// A function or method declaration. The signature's `func_pos` is the
/// position of the `func` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub node_id: Option<NodeId>,
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub ty: FuncType,
    pub body: Option<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Spec {
    Import(Box<ImportSpec>),
    Value(Box<ValueSpec>),
    Type(Box<TypeSpec>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub node_id: Option<NodeId>,
    /// Local name: an identifier, `.` or `_`.
    pub name: Option<Ident>,
    pub path: BasicLit,
}

impl ImportSpec {
    /// A synthesized unnamed import of `path`.
    pub fn new(path: &str) -> Self {
        ImportSpec {
            node_id: None,
            name: None,
            path: BasicLit::string(path),
        }
    }
}

/// A const or var spec: `names [type] [= values]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub node_id: Option<NodeId>,
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
}

/// `name[params] type` or the alias form `name = type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub node_id: Option<NodeId>,
    pub name: Ident,
    pub type_params: Option<FieldList>,
    pub alias: bool,
    pub ty: Expr,
}

// ============================================================================
// Layout helpers
// ============================================================================

impl Decl {
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Decl::Gen(d) => d.node_id,
            Decl::Func(d) => d.node_id,
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Decl::Gen(d) => d.tok_pos,
            Decl::Func(d) => d.ty.func_pos,
        }
    }

    pub fn line(&self, lines: &LineIndex) -> Option<u32> {
        self.pos().line(lines)
    }

    pub fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        match self {
            Decl::Gen(d) => d.end_line(lines),
            Decl::Func(d) => d.end_line(lines),
        }
    }

    pub fn as_gen(&self) -> Option<&GenDecl> {
        match self {
            Decl::Gen(d) => Some(d),
            Decl::Func(_) => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncDecl> {
        match self {
            Decl::Func(d) => Some(d),
            Decl::Gen(_) => None,
        }
    }
}

impl GenDecl {
    /// Whether the printer wraps the specs in parentheses.
    pub fn is_grouped(&self) -> bool {
        self.lparen.is_valid() || self.specs.len() > 1
    }

    pub fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        if self.rparen.is_valid() {
            return self.rparen.line(lines);
        }
        self.specs.last().and_then(|spec| spec.end_line(lines))
    }
}

impl FuncDecl {
    pub fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        match &self.body {
            Some(body) => body.rbrace.line(lines),
            None => self.ty.end_line(lines),
        }
    }

    /// The receiver's base type name: `T` for both `(t T)` and `(t *T)`,
    /// generic receivers `(t *T[K])` included.
    pub fn receiver_type_name(&self) -> Option<&str> {
        let field = self.recv.as_ref()?.list.first()?;
        let mut ty = field.ty.unparen();
        loop {
            match ty {
                Expr::Star(star) => ty = star.x.unparen(),
                Expr::Index(index) => ty = index.x.unparen(),
                Expr::Ident(ident) => return Some(&ident.name),
                _ => return None,
            }
        }
    }
}

impl Spec {
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Spec::Import(s) => s.node_id,
            Spec::Value(s) => s.node_id,
            Spec::Type(s) => s.node_id,
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Spec::Import(s) => match &s.name {
                Some(name) if name.pos.is_valid() => name.pos,
                _ => s.path.pos,
            },
            Spec::Value(s) => s.names.first().map_or(Pos::NONE, |n| n.pos),
            Spec::Type(s) => s.name.pos,
        }
    }

    pub fn line(&self, lines: &LineIndex) -> Option<u32> {
        self.pos().line(lines)
    }

    pub fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        match self {
            Spec::Import(s) => s.path.pos.line(lines),
            Spec::Value(s) => match (s.values.last(), &s.ty) {
                (Some(value), _) => value.end_line(lines),
                (None, Some(ty)) => ty.end_line(lines),
                (None, None) => s.names.last().and_then(|n| n.pos.line(lines)),
            },
            Spec::Type(s) => s.ty.end_line(lines),
        }
    }
}

impl File {
    /// Iterate over all import specs of the file, in order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.decls
            .iter()
            .filter_map(Decl::as_gen)
            .filter(|d| d.tok == DeclKeyword::Import)
            .flat_map(|d| d.specs.iter())
            .filter_map(|spec| match spec {
                Spec::Import(import) => Some(import.as_ref()),
                _ => None,
            })
    }
}
