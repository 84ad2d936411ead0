// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression and type nodes.

use gocodemod_core::LineIndex;

use super::op::{BinaryOp, ChanDir, LitKind, UnaryOp};
use super::statement::BlockStmt;
use super::traits::{NodeId, Pos};

/// Any Go expression, including type expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    CompositeLit(Box<CompositeLit>),
    FuncLit(Box<FuncLit>),
    Paren(Box<ParenExpr>),
    Selector(Box<SelectorExpr>),
    Index(Box<IndexExpr>),
    Slice(Box<SliceExpr>),
    TypeAssert(Box<TypeAssertExpr>),
    Call(Box<CallExpr>),
    Star(Box<StarExpr>),
    Unary(Box<UnaryExpr>),
    Binary(Box<BinaryExpr>),
    KeyValue(Box<KeyValueExpr>),
    ArrayType(Box<ArrayType>),
    Ellipsis(Box<Ellipsis>),
    StructType(Box<StructType>),
    FuncType(Box<FuncType>),
    InterfaceType(Box<InterfaceType>),
    MapType(Box<MapType>),
    ChanType(Box<ChanType>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub node_id: Option<NodeId>,
    pub pos: Pos,
    pub name: String,
}

impl Ident {
    /// A synthesized identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Ident {
            node_id: None,
            pos: Pos::NONE,
            name: name.into(),
        }
    }

    /// `true` for the blank identifier `_`.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }

    /// `true` when the name starts with an upper-case letter.
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

/// An int, float, imaginary, rune or string literal, stored as source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    pub node_id: Option<NodeId>,
    pub pos: Pos,
    pub kind: LitKind,
    pub value: String,
}

impl BasicLit {
    /// A synthesized interpreted string literal with `value` between quotes.
    pub fn string(value: &str) -> Self {
        BasicLit {
            node_id: None,
            pos: Pos::NONE,
            kind: LitKind::String,
            value: gocodemod_core::quote(value),
        }
    }

    pub fn int(value: impl Into<String>) -> Self {
        BasicLit {
            node_id: None,
            pos: Pos::NONE,
            kind: LitKind::Int,
            value: value.into(),
        }
    }

    /// The literal text without its surrounding quotes.
    pub fn unquoted(&self) -> &str {
        gocodemod_core::unquote(&self.value)
    }

    pub fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        self.pos
            .line(lines)
            .map(|line| line + self.value.matches('\n').count() as u32)
    }
}

/// `T{elts}`; `ty` is `None` for elided element types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeLit {
    pub node_id: Option<NodeId>,
    pub ty: Option<Expr>,
    pub lbrace: Pos,
    pub elts: Vec<Expr>,
    pub rbrace: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncLit {
    pub node_id: Option<NodeId>,
    pub ty: FuncType,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParenExpr {
    pub node_id: Option<NodeId>,
    pub lparen: Pos,
    pub x: Expr,
    pub rparen: Pos,
}

/// `x.sel`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorExpr {
    pub node_id: Option<NodeId>,
    pub x: Expr,
    pub sel: Ident,
}

/// `x[i]`, or `x[A, B]` for generic instantiations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexExpr {
    pub node_id: Option<NodeId>,
    pub x: Expr,
    pub lbrack: Pos,
    pub indices: Vec<Expr>,
    pub rbrack: Pos,
}

/// `x[low:high]` or `x[low:high:max]` when `slice3` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceExpr {
    pub node_id: Option<NodeId>,
    pub x: Expr,
    pub lbrack: Pos,
    pub low: Option<Expr>,
    pub high: Option<Expr>,
    pub max: Option<Expr>,
    pub slice3: bool,
    pub rbrack: Pos,
}

/// `x.(T)`, or `x.(type)` in a type switch when `ty` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAssertExpr {
    pub node_id: Option<NodeId>,
    pub x: Expr,
    pub lparen: Pos,
    pub ty: Option<Expr>,
    pub rparen: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub node_id: Option<NodeId>,
    pub fun: Expr,
    pub lparen: Pos,
    pub args: Vec<Expr>,
    /// `f(xs...)`
    pub has_ellipsis: bool,
    pub ellipsis: Pos,
    pub rparen: Pos,
}

impl CallExpr {
    /// A synthesized call `fun(args)`.
    pub fn new(fun: Expr, args: Vec<Expr>) -> Self {
        CallExpr {
            node_id: None,
            fun,
            lparen: Pos::NONE,
            args,
            has_ellipsis: false,
            ellipsis: Pos::NONE,
            rparen: Pos::NONE,
        }
    }
}

/// `*x`, both pointer types and dereferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarExpr {
    pub node_id: Option<NodeId>,
    pub star: Pos,
    pub x: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryExpr {
    pub node_id: Option<NodeId>,
    pub op_pos: Pos,
    pub op: UnaryOp,
    pub x: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryExpr {
    pub node_id: Option<NodeId>,
    pub x: Expr,
    pub op_pos: Pos,
    pub op: BinaryOp,
    pub y: Expr,
}

/// `key: value` inside a composite literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValueExpr {
    pub node_id: Option<NodeId>,
    pub key: Expr,
    pub colon: Pos,
    pub value: Expr,
}

/// `[len]elt`, `[...]elt` (len is an [`Ellipsis`]) or `[]elt` (no len).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType {
    pub node_id: Option<NodeId>,
    pub lbrack: Pos,
    pub len: Option<Expr>,
    pub elt: Expr,
}

/// `...T` in a parameter list, or `...` as an array length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ellipsis {
    pub node_id: Option<NodeId>,
    pub pos: Pos,
    pub elt: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructType {
    pub node_id: Option<NodeId>,
    pub struct_pos: Pos,
    pub fields: FieldList,
}

/// A function signature. `func_pos` is [`Pos::NONE`] for interface methods
/// and function declarations print their own `func` keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncType {
    pub node_id: Option<NodeId>,
    pub func_pos: Pos,
    pub type_params: Option<FieldList>,
    pub params: FieldList,
    pub results: Option<FieldList>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub node_id: Option<NodeId>,
    pub interface_pos: Pos,
    pub methods: FieldList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapType {
    pub node_id: Option<NodeId>,
    pub map_pos: Pos,
    pub key: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChanType {
    pub node_id: Option<NodeId>,
    pub begin: Pos,
    /// Position of `<-`, if any.
    pub arrow: Pos,
    pub dir: ChanDir,
    pub value: Expr,
}

/// A parenthesized, bracketed or braced list of fields: parameters, results,
/// type parameters, receivers, struct fields or interface elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldList {
    pub node_id: Option<NodeId>,
    pub opening: Pos,
    pub list: Vec<Field>,
    pub closing: Pos,
}

impl FieldList {
    /// An empty synthesized list.
    pub fn empty() -> Self {
        FieldList {
            node_id: None,
            opening: Pos::NONE,
            list: Vec::new(),
            closing: Pos::NONE,
        }
    }

    /// Number of declared entities: each name counts, an anonymous field counts once.
    pub fn num_fields(&self) -> usize {
        self.list.iter().map(|f| f.names.len().max(1)).sum()
    }
}

/// One entry of a [`FieldList`]. Interface methods have one name and a
/// [`FuncType`]; embedded fields and type unions have no names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub node_id: Option<NodeId>,
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<BasicLit>,
}

// ============================================================================
// Layout helpers
// ============================================================================

impl Expr {
    /// A synthesized identifier expression.
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(Ident::new(name))
    }

    /// A synthesized `x.sel` expression.
    pub fn selector(x: Expr, sel: impl Into<String>) -> Self {
        Expr::Selector(Box::new(SelectorExpr {
            node_id: None,
            x,
            sel: Ident::new(sel),
        }))
    }

    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Expr::Ident(x) => x.node_id,
            Expr::BasicLit(x) => x.node_id,
            Expr::CompositeLit(x) => x.node_id,
            Expr::FuncLit(x) => x.node_id,
            Expr::Paren(x) => x.node_id,
            Expr::Selector(x) => x.node_id,
            Expr::Index(x) => x.node_id,
            Expr::Slice(x) => x.node_id,
            Expr::TypeAssert(x) => x.node_id,
            Expr::Call(x) => x.node_id,
            Expr::Star(x) => x.node_id,
            Expr::Unary(x) => x.node_id,
            Expr::Binary(x) => x.node_id,
            Expr::KeyValue(x) => x.node_id,
            Expr::ArrayType(x) => x.node_id,
            Expr::Ellipsis(x) => x.node_id,
            Expr::StructType(x) => x.node_id,
            Expr::FuncType(x) => x.node_id,
            Expr::InterfaceType(x) => x.node_id,
            Expr::MapType(x) => x.node_id,
            Expr::ChanType(x) => x.node_id,
        }
    }

    /// Position of the first token.
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Ident(x) => x.pos,
            Expr::BasicLit(x) => x.pos,
            Expr::CompositeLit(x) => match &x.ty {
                Some(ty) if ty.pos().is_valid() => ty.pos(),
                _ => x.lbrace,
            },
            Expr::FuncLit(x) => x.ty.func_pos,
            Expr::Paren(x) => x.lparen,
            Expr::Selector(x) => first_valid(x.x.pos(), x.sel.pos),
            Expr::Index(x) => first_valid(x.x.pos(), x.lbrack),
            Expr::Slice(x) => first_valid(x.x.pos(), x.lbrack),
            Expr::TypeAssert(x) => first_valid(x.x.pos(), x.lparen),
            Expr::Call(x) => first_valid(x.fun.pos(), x.lparen),
            Expr::Star(x) => x.star,
            Expr::Unary(x) => x.op_pos,
            Expr::Binary(x) => first_valid(x.x.pos(), x.op_pos),
            Expr::KeyValue(x) => first_valid(x.key.pos(), x.colon),
            Expr::ArrayType(x) => x.lbrack,
            Expr::Ellipsis(x) => x.pos,
            Expr::StructType(x) => x.struct_pos,
            Expr::FuncType(x) => x.pos(),
            Expr::InterfaceType(x) => x.interface_pos,
            Expr::MapType(x) => x.map_pos,
            Expr::ChanType(x) => x.begin,
        }
    }

    /// Source line of the first token.
    pub fn line(&self, lines: &LineIndex) -> Option<u32> {
        self.pos().line(lines)
    }

    /// Source line of the last token.
    pub fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        match self {
            Expr::Ident(x) => x.pos.line(lines),
            Expr::BasicLit(x) => x.end_line(lines),
            Expr::CompositeLit(x) => x.rbrace.line(lines),
            Expr::FuncLit(x) => x.body.rbrace.line(lines),
            Expr::Paren(x) => x.rparen.line(lines),
            Expr::Selector(x) => x.sel.pos.line(lines),
            Expr::Index(x) => x.rbrack.line(lines),
            Expr::Slice(x) => x.rbrack.line(lines),
            Expr::TypeAssert(x) => x.rparen.line(lines),
            Expr::Call(x) => x.rparen.line(lines),
            Expr::Star(x) => x.x.end_line(lines),
            Expr::Unary(x) => x.x.end_line(lines),
            Expr::Binary(x) => x.y.end_line(lines),
            Expr::KeyValue(x) => x.value.end_line(lines),
            Expr::ArrayType(x) => x.elt.end_line(lines),
            Expr::Ellipsis(x) => match &x.elt {
                Some(elt) => elt.end_line(lines),
                None => x.pos.line(lines),
            },
            Expr::StructType(x) => x.fields.closing.line(lines),
            Expr::FuncType(x) => x.end_line(lines),
            Expr::InterfaceType(x) => x.methods.closing.line(lines),
            Expr::MapType(x) => x.value.end_line(lines),
            Expr::ChanType(x) => x.value.end_line(lines),
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr {
        let mut expr = self;
        while let Expr::Paren(paren) = expr {
            expr = &paren.x;
        }
        expr
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&CallExpr> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_basic_lit(&self) -> Option<&BasicLit> {
        match self {
            Expr::BasicLit(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn as_composite_lit(&self) -> Option<&CompositeLit> {
        match self {
            Expr::CompositeLit(lit) => Some(lit),
            _ => None,
        }
    }
}

impl FuncType {
    pub fn pos(&self) -> Pos {
        if self.func_pos.is_valid() {
            self.func_pos
        } else if let Some(type_params) = &self.type_params {
            type_params.opening
        } else {
            self.params.opening
        }
    }

    pub fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        match &self.results {
            Some(results) if results.closing.is_valid() => results.closing.line(lines),
            Some(results) => results.list.last().and_then(|f| f.ty.end_line(lines)),
            None => self.params.closing.line(lines),
        }
    }
}

impl Field {
    pub fn pos(&self) -> Pos {
        match self.names.first() {
            Some(name) => first_valid(name.pos, self.ty.pos()),
            None => self.ty.pos(),
        }
    }

    pub fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        match &self.tag {
            Some(tag) => tag.end_line(lines),
            None => self.ty.end_line(lines),
        }
    }
}

fn first_valid(a: Pos, b: Pos) -> Pos {
    if a.is_valid() {
        a
    } else {
        b
    }
}
