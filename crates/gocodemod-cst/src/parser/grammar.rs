// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The Go grammar, written as a PEG over the token stream.
//!
//! Rules follow the productions of the Go spec. Tokens are matched through
//! the `##` methods of [`TokVec`], which fail silently; the few rules that
//! name what they expected (`tok`, `expr`, `type_expr`, ...) are what error
//! messages are built from.
//!
//! Go resolves the composite literal ambiguity of control clauses
//! (`if x == T {} {`) with a parser flag. Here the flag is the `lit`
//! argument threaded through the expression rules: inside `if`, `for` and
//! `switch` headers it is `false` and `T{` does not start a literal, inside
//! any bracket it is `true` again.

use std::fmt;

use gocodemod_core::LineIndex;
use peg::{Parse, RuleResult};

use crate::nodes::{
    AssignOp, BasicLit, BinaryOp, BlockStmt, BranchKind, ChanDir, Decl, DeclKeyword, Expr, Field,
    FieldList, File, FuncDecl, FuncType, GenDecl, Ident, ImportSpec, IncDecOp, NodeId, Spec,
    Stmt, TypeSpec, UnaryOp, ValueSpec,
};
use crate::tokenizer::{TokType, Token};

/// The token stream of one source text, as grammar input.
pub struct TokVec<'a> {
    source: &'a str,
    tokens: &'a [Token],
    lines: &'a LineIndex,
}

impl<'a> TokVec<'a> {
    pub(crate) fn new(source: &'a str, tokens: &'a [Token], lines: &'a LineIndex) -> Self {
        TokVec {
            source,
            tokens,
            lines,
        }
    }

    fn next_of(&self, pos: usize, kind: TokType) -> RuleResult<Token> {
        match self.tokens.get(pos) {
            Some(tok) if tok.kind == kind => RuleResult::Matched(pos + 1, *tok),
            _ => RuleResult::Failed,
        }
    }

    fn next_mapped<T>(&self, pos: usize, f: impl Fn(TokType) -> Option<T>) -> RuleResult<(Token, T)> {
        match self.tokens.get(pos) {
            Some(tok) => match f(tok.kind) {
                Some(value) => RuleResult::Matched(pos + 1, (*tok, value)),
                None => RuleResult::Failed,
            },
            None => RuleResult::Failed,
        }
    }

    fn next_literal(&self, pos: usize) -> RuleResult<Token> {
        match self.tokens.get(pos) {
            Some(tok) if tok.kind.is_literal() => RuleResult::Matched(pos + 1, *tok),
            _ => RuleResult::Failed,
        }
    }

    fn next_binary_op(&self, pos: usize, prec: u8) -> RuleResult<(Token, BinaryOp)> {
        self.next_mapped(pos, |kind| binary_op(kind).filter(|op| op.precedence() == prec))
    }

    fn next_unary_op(&self, pos: usize) -> RuleResult<(Token, UnaryOp)> {
        self.next_mapped(pos, unary_op)
    }

    fn next_assign_op(&self, pos: usize) -> RuleResult<(Token, AssignOp)> {
        self.next_mapped(pos, assign_op)
    }

    fn next_inc_dec(&self, pos: usize) -> RuleResult<(Token, IncDecOp)> {
        self.next_mapped(pos, |kind| match kind {
            TokType::Inc => Some(IncDecOp::Inc),
            TokType::Dec => Some(IncDecOp::Dec),
            _ => None,
        })
    }

    /// Lookahead: the next token is one of `kinds`.
    fn at_any(&self, pos: usize, kinds: &[TokType]) -> RuleResult<()> {
        match self.tokens.get(pos) {
            Some(tok) if kinds.contains(&tok.kind) => RuleResult::Matched(pos, ()),
            _ => RuleResult::Failed,
        }
    }

    fn when(&self, pos: usize, cond: bool) -> RuleResult<()> {
        if cond {
            RuleResult::Matched(pos, ())
        } else {
            RuleResult::Failed
        }
    }
}

/// Where a parse stopped, and the token found there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLoc {
    /// Byte offset of the token.
    pub offset: usize,
    /// Index of the token in the stream.
    pub index: usize,
    pub line: u32,
    pub column: u32,
    /// `'text'`, `newline` for an inserted semicolon, or `EOF`.
    pub found: String,
}

impl fmt::Display for ParseLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Parse for TokVec<'_> {
    type PositionRepr = ParseLoc;

    fn start(&self) -> usize {
        0
    }

    fn is_eof(&self, pos: usize) -> bool {
        pos >= self.tokens.len()
    }

    fn position_repr(&self, pos: usize) -> ParseLoc {
        let (offset, found) = match self.tokens.get(pos).or_else(|| self.tokens.last()) {
            Some(tok) if tok.kind == TokType::EndMarker => (tok.start, "EOF".to_string()),
            Some(tok) if tok.is_implicit_semicolon() => (tok.start, "newline".to_string()),
            Some(tok) => (tok.start, format!("'{}'", tok.text(self.source))),
            None => (self.source.len(), "EOF".to_string()),
        };
        let (line, column) = self.lines.position(offset);
        ParseLoc {
            offset,
            index: pos,
            line,
            column,
            found,
        }
    }
}

fn binary_op(kind: TokType) -> Option<BinaryOp> {
    let op = match kind {
        TokType::LogOr => BinaryOp::LogOr,
        TokType::LogAnd => BinaryOp::LogAnd,
        TokType::Eql => BinaryOp::Eq,
        TokType::Neq => BinaryOp::NotEq,
        TokType::Lss => BinaryOp::Lt,
        TokType::Leq => BinaryOp::LtEq,
        TokType::Gtr => BinaryOp::Gt,
        TokType::Geq => BinaryOp::GtEq,
        TokType::Add => BinaryOp::Add,
        TokType::Sub => BinaryOp::Sub,
        TokType::Or => BinaryOp::Or,
        TokType::Xor => BinaryOp::Xor,
        TokType::Mul => BinaryOp::Mul,
        TokType::Quo => BinaryOp::Quo,
        TokType::Rem => BinaryOp::Rem,
        TokType::Shl => BinaryOp::Shl,
        TokType::Shr => BinaryOp::Shr,
        TokType::And => BinaryOp::And,
        TokType::AndNot => BinaryOp::AndNot,
        _ => return None,
    };
    Some(op)
}

fn unary_op(kind: TokType) -> Option<UnaryOp> {
    let op = match kind {
        TokType::Add => UnaryOp::Plus,
        TokType::Sub => UnaryOp::Minus,
        TokType::Not => UnaryOp::Not,
        TokType::Xor => UnaryOp::Xor,
        TokType::And => UnaryOp::Addr,
        TokType::Arrow => UnaryOp::Arrow,
        TokType::Tilde => UnaryOp::Tilde,
        _ => return None,
    };
    Some(op)
}

fn assign_op(kind: TokType) -> Option<AssignOp> {
    let op = match kind {
        TokType::Assign => AssignOp::Assign,
        TokType::Define => AssignOp::Define,
        TokType::AddAssign => AssignOp::AddAssign,
        TokType::SubAssign => AssignOp::SubAssign,
        TokType::MulAssign => AssignOp::MulAssign,
        TokType::QuoAssign => AssignOp::QuoAssign,
        TokType::RemAssign => AssignOp::RemAssign,
        TokType::AndAssign => AssignOp::AndAssign,
        TokType::OrAssign => AssignOp::OrAssign,
        TokType::XorAssign => AssignOp::XorAssign,
        TokType::ShlAssign => AssignOp::ShlAssign,
        TokType::ShrAssign => AssignOp::ShrAssign,
        TokType::AndNotAssign => AssignOp::AndNotAssign,
        _ => return None,
    };
    Some(op)
}

// ============================================================================
// Intermediate results
// ============================================================================

/// One postfix operation of a primary expression.
pub(crate) enum Suffix {
    Selector(Ident),
    Assert {
        lparen: Token,
        ty: Option<Expr>,
        rparen: Token,
    },
    Index {
        lbrack: Token,
        indices: Vec<Expr>,
        rbrack: Token,
    },
    Slice {
        lbrack: Token,
        low: Option<Expr>,
        high: Option<Expr>,
        max: Option<Expr>,
        slice3: bool,
        rbrack: Token,
    },
    Call {
        lparen: Token,
        args: Vec<Expr>,
        ellipsis: Option<Token>,
        rparen: Token,
    },
    Literal(LitBody),
}

/// What follows the first operand inside `[ ]`.
pub(crate) enum IndexTail {
    Slice(Vec<(Token, Option<Expr>)>),
    Index(Vec<Expr>),
}

/// The braced part of a composite literal.
pub(crate) struct LitBody {
    pub(crate) node_id: Option<NodeId>,
    pub(crate) lbrace: Token,
    pub(crate) elts: Vec<Expr>,
    pub(crate) rbrace: Token,
}

/// What follows the expression list of a simple statement.
pub(crate) enum SimpleTail {
    Range((Token, AssignOp), Expr),
    Assign((Token, AssignOp), Vec<Expr>),
    Label(Token, Stmt),
    Send(Token, Expr),
    IncDec((Token, IncDecOp)),
    Expr,
}

/// A simple statement, or the header of a range clause.
pub(crate) enum Simple {
    Stmt(Stmt),
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        tok: Option<(Token, AssignOp)>,
        x: Expr,
    },
}

/// What a simple statement may turn into at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SimpleMode {
    Basic,
    LabelOk,
    RangeOk,
}

/// `for first {`, or `for first; cond; post {`.
pub(crate) struct ForHeader {
    pub(crate) first: Option<Simple>,
    pub(crate) rest: Option<(Option<Stmt>, Option<Stmt>)>,
}

/// Whether `{` after `x` may open a composite literal of type `x`.
pub(crate) fn is_literal_type(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) | Expr::ArrayType(_) | Expr::StructType(_) | Expr::MapType(_) => true,
        Expr::Selector(sel) => matches!(sel.x, Expr::Ident(_)),
        Expr::Index(index) => is_literal_type(&index.x),
        _ => false,
    }
}

/// `x := y.(type)` or `y.(type)`.
pub(crate) fn is_type_switch_guard(stmt: &Stmt) -> bool {
    let is_guard = |x: &Expr| matches!(x, Expr::TypeAssert(ta) if ta.ty.is_none());
    match stmt {
        Stmt::Expr(s) => is_guard(&s.x),
        Stmt::Assign(s) => {
            s.tok == AssignOp::Define && s.lhs.len() == 1 && s.rhs.len() == 1 && is_guard(&s.rhs[0])
        }
        _ => false,
    }
}

/// Only a single identifier can be a label.
fn tail_mode(mode: SimpleMode, lhs: &[Expr]) -> SimpleMode {
    match (mode, lhs) {
        (SimpleMode::LabelOk, [Expr::Ident(_)]) => SimpleMode::LabelOk,
        (SimpleMode::LabelOk, _) => SimpleMode::Basic,
        (mode, _) => mode,
    }
}

peg::parser! {
    pub grammar go<'a>(state: &crate::parser::state::ParseState<'a>) for TokVec<'a> {

        // ====================================================================
        // Tokens
        // ====================================================================

        rule kw(kind: TokType) -> Token = ##next_of(kind)

        rule tok(kind: TokType, what: &'static str) -> Token
            = t:kw(kind) { t }
            / expected!(what)

        rule rparen() -> Token = tok(TokType::RParen, "')'")
        rule rbrack() -> Token = tok(TokType::RBrack, "']'")
        rule lbrace() -> Token = tok(TokType::LBrace, "'{'")
        rule rbrace() -> Token = tok(TokType::RBrace, "'}'")
        rule colon() -> Token = tok(TokType::Colon, "':'")
        rule semi() -> Token = tok(TokType::Semicolon, "';' or newline")
        rule comma() -> Token = kw(TokType::Comma)

        rule ident() -> Ident = t:tok(TokType::Ident, "identifier") { state.ident(t) }

        rule basic_lit() -> BasicLit = t:##next_literal() { state.basic_lit(t) }

        rule enter() = p:position!() {? state.enter(p) }
        rule leave() = { state.leave() }

        // ====================================================================
        // Files and declarations
        // ====================================================================

        pub rule file() -> File
            = p:tok(TokType::Package, "'package'") name:package_name() e:position!() decl_end() a:position!()
              decls:decl_item()* eof:position!() tok(TokType::EndMarker, "declaration")
              { state.file(p, name, (e, a), decls, eof) }

        rule package_name() -> Ident
            = name:ident() p:position!() {? state.package_name(name, p) }

        rule decl_item() -> Decl
            = s:position!() d:decl() e:position!() decl_end() a:position!()
              { state.item(d.node_id(), s, e, a); d }

        rule decl_end()
            = semi() { }
            / ##at_any(&[TokType::EndMarker])

        rule decl() -> Decl
            = g:gen_decl(true) { Decl::Gen(Box::new(g)) }
            / f:func_decl() { Decl::Func(Box::new(f)) }

        rule decl_keyword(imports: bool) -> (Token, DeclKeyword)
            = ##when(imports) t:kw(TokType::Import) { (t, DeclKeyword::Import) }
            / t:kw(TokType::Const) { (t, DeclKeyword::Const) }
            / t:kw(TokType::Type) { (t, DeclKeyword::Type) }
            / t:kw(TokType::Var) { (t, DeclKeyword::Var) }

        rule gen_decl(imports: bool) -> GenDecl
            = k:decl_keyword(imports) lp:kw(TokType::LParen) o:position!() specs:spec_item(k.1)*
              c:position!() rp:rparen()
              { state.grouped_decl(k, lp, (o, c), specs, rp) }
            / k:decl_keyword(imports) s:spec(k.1) { state.gen_decl(k, s) }

        rule spec_item(keyword: DeclKeyword) -> Spec
            = s:position!() sp:spec(keyword) e:position!() spec_end() a:position!()
              { state.item(sp.node_id(), s, e, a); sp }

        rule spec_end()
            = semi() { }
            / ##at_any(&[TokType::RParen])

        rule spec(keyword: DeclKeyword) -> Spec
            = ##when(keyword == DeclKeyword::Import) s:import_spec() { Spec::Import(Box::new(s)) }
            / ##when(keyword == DeclKeyword::Type) s:type_spec() { Spec::Type(Box::new(s)) }
            / ##when(keyword == DeclKeyword::Const || keyword == DeclKeyword::Var) s:value_spec(keyword)
              { Spec::Value(Box::new(s)) }

        rule import_spec() -> ImportSpec
            = name:import_name()? path:tok(TokType::String, "import path")
              { state.import_spec(name, path) }

        rule import_name() -> Ident
            = t:kw(TokType::Ident) { state.ident(t) }
            / t:kw(TokType::Period) { state.ident(t) }

        rule value_spec(keyword: DeclKeyword) -> ValueSpec
            = names:ident() ++ comma() ty:type_expr()? values:(kw(TokType::Assign) v:expr_list(true) { v })?
              {? state.value_spec(keyword, names, ty, values) }

        rule type_spec() -> TypeSpec
            = name:ident() tp:type_params()? alias:kw(TokType::Assign)? ty:type_expr()
              { state.type_spec(name, tp, alias.is_some(), ty) }

        rule func_decl() -> FuncDecl
            = f:kw(TokType::Func) recv:(&kw(TokType::LParen) r:parameters() { r })? name:ident()
              tp:type_params()? params:parameters() results:results()
              body:(&kw(TokType::LBrace) b:block() { b })?
              { state.func_decl(recv, name, state.func_type(f, tp, params, results), body) }

        // ====================================================================
        // Field lists
        // ====================================================================

        rule parameters() -> FieldList
            = lp:tok(TokType::LParen, "'('") entries:param_entry() ** comma() comma()? rp:rparen()
              p:position!()
              {? state.parameters(lp, entries, rp, p) }

        // A lone identifier is returned as a name; grouping decides whether
        // it was a type.
        rule param_entry() -> (Option<Ident>, Option<Expr>)
            = t:kw(TokType::Ident) &(comma() / kw(TokType::RParen)) { (Some(state.ident(t)), None) }
            / t:kw(TokType::Ident) ty:param_type() { (Some(state.ident(t)), Some(ty)) }
            / ty:param_type() { (None, Some(ty)) }

        rule param_type() -> Expr
            = e:kw(TokType::Ellipsis) ty:type_expr() { state.ellipsis(e, Some(ty)) }
            / type_expr()

        rule results() -> Option<FieldList>
            = &kw(TokType::LParen) p:parameters() { Some(p) }
            / ty:type_expr() { Some(state.single_result(ty)) }
            / { None }

        rule type_params() -> FieldList
            = lb:kw(TokType::LBrack) list:type_param() ++ comma() comma()? rb:rbrack()
              { state.field_list(lb, list, rb) }

        rule type_param() -> Field
            = names:ident() ++ comma() ty:constraint() { state.field(names, ty, None) }

        rule constraint() -> Expr
            = x:constraint_term() rest:(o:kw(TokType::Or) y:constraint_term() { (o, y) })*
              { state.union(x, rest) }

        rule constraint_term() -> Expr
            = t:kw(TokType::Tilde) x:type_expr() { state.unary((t, UnaryOp::Tilde), x) }
            / type_expr()

        rule field_block(iface: bool) -> FieldList
            = lb:lbrace() o:position!() list:field_item(iface)* c:position!() rb:rbrace()
              { state.braced_fields(lb, (o, c), list, rb) }

        rule field_item(iface: bool) -> Field
            = s:position!() f:field(iface) e:position!() field_end() a:position!()
              { state.item(f.node_id, s, e, a); f }

        rule field_end()
            = semi() { }
            / ##at_any(&[TokType::RBrace])

        rule field(iface: bool) -> Field
            = ##when(iface) f:interface_elem() { f }
            / ##when(!iface) f:struct_field() { f }

        rule struct_field() -> Field
            = names:ident() ++ comma() ty:type_expr() tag:tag()? { state.field(names, ty, tag) }
            / ty:embedded_type() tag:tag()? { state.field(Vec::new(), ty, tag) }

        rule embedded_type() -> Expr
            = s:kw(TokType::Mul) x:type_name() { state.star(s, x) }
            / type_name()

        rule tag() -> BasicLit = t:kw(TokType::String) { state.basic_lit(t) }

        rule interface_elem() -> Field
            = name:ident() &kw(TokType::LParen) params:parameters() results:results()
              { state.method(name, params, results) }
            / ty:constraint() { state.field(Vec::new(), ty, None) }

        // ====================================================================
        // Types
        // ====================================================================

        rule type_expr() -> Expr
            = enter() t:type_inner()? leave() {? t.ok_or("type") }

        rule type_inner() -> Expr
            = type_name()
            / literal_type()
            / s:kw(TokType::Mul) x:type_expr() { state.star(s, x) }
            / f:func_type() { Expr::FuncType(Box::new(f)) }
            / interface_type()
            / chan_type()
            / lp:kw(TokType::LParen) x:type_expr() rp:rparen() { state.paren(lp, x, rp) }

        // `T`, `pkg.T`, optionally instantiated as `T[A, B]`.
        rule type_name() -> Expr
            = t:kw(TokType::Ident) sel:(kw(TokType::Period) s:ident() { s })? args:type_args()?
              { state.type_name(t, sel, args) }

        rule type_args() -> (Token, Vec<Expr>, Token)
            = lb:kw(TokType::LBrack) args:type_expr() ++ comma() comma()? rb:rbrack() { (lb, args, rb) }

        // Types that can also head a composite literal.
        rule literal_type() -> Expr
            = lb:kw(TokType::LBrack) len:array_len()? rbrack() elt:type_expr()
              { state.array_type(lb, len, elt) }
            / s:kw(TokType::Struct) fields:field_block(false) { state.struct_type(s, fields) }
            / m:kw(TokType::Map) tok(TokType::LBrack, "'['") key:type_expr() rbrack() value:type_expr()
              { state.map_type(m, key, value) }

        rule array_len() -> Expr
            = e:kw(TokType::Ellipsis) { state.ellipsis(e, None) }
            / expr(true)

        rule chan_type() -> Expr
            = a:kw(TokType::Arrow) tok(TokType::Chan, "'chan'") value:type_expr()
              { state.chan_type(a, Some(a), ChanDir::Recv, value) }
            / c:kw(TokType::Chan) a:kw(TokType::Arrow) value:type_expr()
              { state.chan_type(c, Some(a), ChanDir::Send, value) }
            / c:kw(TokType::Chan) value:type_expr() { state.chan_type(c, None, ChanDir::Both, value) }

        rule func_type() -> FuncType
            = f:kw(TokType::Func) params:parameters() results:results()
              { state.func_type(f, None, params, results) }

        rule interface_type() -> Expr
            = i:kw(TokType::Interface) methods:field_block(true) { state.interface_type(i, methods) }

        // ====================================================================
        // Expressions
        // ====================================================================

        rule expr_list(lit: bool) -> Vec<Expr> = x:expr(lit) ++ comma() { x }

        rule expr(lit: bool) -> Expr
            = enter() x:binary_expr(lit)? leave() {? x.ok_or("expression") }

        rule binary_expr(lit: bool) -> Expr = precedence!{
            x:(@) o:binary_op(1) y:@ { state.binary(x, o, y) }
            --
            x:(@) o:binary_op(2) y:@ { state.binary(x, o, y) }
            --
            x:(@) o:binary_op(3) y:@ { state.binary(x, o, y) }
            --
            x:(@) o:binary_op(4) y:@ { state.binary(x, o, y) }
            --
            x:(@) o:binary_op(5) y:@ { state.binary(x, o, y) }
            --
            u:unary_expr(lit) { u }
        }

        rule binary_op(prec: u8) -> (Token, BinaryOp) = ##next_binary_op(prec)

        rule unary_expr(lit: bool) -> Expr
            = &(kw(TokType::Arrow) kw(TokType::Chan)) t:chan_type() { t }
            / s:kw(TokType::Mul) x:unary_operand(lit) { state.star(s, x) }
            / o:##next_unary_op() x:unary_operand(lit) { state.unary(o, x) }
            / primary_expr(lit)

        rule unary_operand(lit: bool) -> Expr
            = enter() x:unary_expr(lit)? leave() {? x.ok_or("expression") }

        rule primary_expr(lit: bool) -> Expr
            = x:operand() suffixes:suffix(lit)* p:position!() {? state.primary(x, suffixes, p) }

        rule operand() -> Expr
            = t:kw(TokType::Ident) { Expr::Ident(state.ident(t)) }
            / l:basic_lit() { Expr::BasicLit(l) }
            / lp:kw(TokType::LParen) x:expr(true) rp:rparen() { state.paren(lp, x, rp) }
            / f:func_type() body:(&kw(TokType::LBrace) b:block() { b })? { state.func_lit(f, body) }
            / t:literal_type() body:(&kw(TokType::LBrace) b:literal_body() { b })?
              { match body { Some(b) => state.composite(Some(t), b), None => t } }
            / chan_type()
            / interface_type()

        rule suffix(lit: bool) -> Suffix
            = kw(TokType::Period) s:selector_tail() { s }
            / index_suffix()
            / lp:kw(TokType::LParen) args:call_arg() ** comma() comma()? rp:rparen()
              { state.call_suffix(lp, args, rp) }
            / ##when(lit) &kw(TokType::LBrace) b:literal_body() { Suffix::Literal(b) }

        rule selector_tail() -> Suffix
            = sel:ident() { Suffix::Selector(sel) }
            / lp:tok(TokType::LParen, "'('") ty:assert_type() rp:rparen()
              { Suffix::Assert { lparen: lp, ty, rparen: rp } }

        rule assert_type() -> Option<Expr>
            = kw(TokType::Type) { None }
            / ty:type_expr() { Some(ty) }

        rule call_arg() -> (Expr, Option<Token>)
            = x:expr(true) e:kw(TokType::Ellipsis)? { (x, e) }

        rule index_suffix() -> Suffix
            = lb:kw(TokType::LBrack) low:expr(true)? tail:index_tail() rb:rbrack() p:position!()
              {? state.index_suffix(lb, low, tail, rb, p) }

        rule index_tail() -> IndexTail
            = parts:(c:kw(TokType::Colon) x:expr(true)? { (c, x) })*<1,2> { IndexTail::Slice(parts) }
            / more:(comma() x:expr(true) { x })* comma()? { IndexTail::Index(more) }

        rule literal_body() -> LitBody
            = enter() b:literal_body_inner()? leave() {? b.ok_or("'{'") }

        rule literal_body_inner() -> LitBody
            = lb:kw(TokType::LBrace) o:position!() elts:element_item()* c:position!() rb:rbrace()
              { state.literal_body(lb, (o, c), elts, rb) }

        rule element_item() -> Expr
            = s:position!() x:element() e:position!() element_end() a:position!()
              { state.item(x.node_id(), s, e, a); x }

        rule element_end()
            = comma() { }
            / ##at_any(&[TokType::RBrace])

        rule element() -> Expr
            = key:element_value() value:(c:kw(TokType::Colon) v:element_value() { (c, v) })?
              { state.element(key, value) }

        rule element_value() -> Expr
            = &kw(TokType::LBrace) b:literal_body() { state.composite(None, b) }
            / expr(true)

        // ====================================================================
        // Statements
        // ====================================================================

        rule block() -> BlockStmt
            = enter() b:block_inner()? leave() {? b.ok_or("'{'") }

        rule block_inner() -> BlockStmt
            = lb:lbrace() o:position!() stmts:stmt_list() c:position!() rb:rbrace()
              { state.block(lb, (o, c), stmts, rb) }

        rule stmt_list() -> Vec<Stmt> = stmt_entry()*

        rule stmt_entry() -> Stmt
            = t:kw(TokType::Semicolon) { state.empty_stmt(t) }
            / s:position!() x:stmt() e:position!() stmt_end() a:position!()
              { state.item(x.node_id(), s, e, a); x }

        rule stmt_end()
            = semi() { }
            / ##at_any(&[TokType::RBrace, TokType::Case, TokType::Default])

        rule stmt() -> Stmt
            = d:gen_decl(false) { state.decl_stmt(d) }
            / t:kw(TokType::Go) call:expr(true) { state.go_stmt(t, call) }
            / t:kw(TokType::Defer) call:expr(true) { state.defer_stmt(t, call) }
            / t:kw(TokType::Return) results:expr_list(true)? { state.return_stmt(t, results.unwrap_or_default()) }
            / branch_stmt()
            / &kw(TokType::LBrace) b:block() { Stmt::Block(Box::new(b)) }
            / if_stmt()
            / switch_stmt()
            / select_stmt()
            / for_stmt()
            / s:simple_stmt(true, SimpleMode::LabelOk) {? state.plain(s) }
            / &kw(TokType::Semicolon) p:position!() { state.empty_at(p) }

        rule branch_stmt() -> Stmt
            = t:kw(TokType::Fallthrough) { state.branch((t, BranchKind::Fallthrough), None) }
            / k:branch_keyword() label:(t:kw(TokType::Ident) { state.ident(t) })? { state.branch(k, label) }

        rule branch_keyword() -> (Token, BranchKind)
            = t:kw(TokType::Break) { (t, BranchKind::Break) }
            / t:kw(TokType::Continue) { (t, BranchKind::Continue) }
            / t:kw(TokType::Goto) { (t, BranchKind::Goto) }

        rule simple_stmt(lit: bool, mode: SimpleMode) -> Simple
            = ##when(mode == SimpleMode::RangeOk) kw(TokType::Range) x:expr(lit)
              { Simple::Range { key: None, value: None, tok: None, x } }
            / lhs:expr_list(lit) tail:simple_tail(lit, tail_mode(mode, &lhs)) p:position!()
              {? state.simple(lhs, tail, p) }

        rule simple_tail(lit: bool, mode: SimpleMode) -> SimpleTail
            = ##when(mode == SimpleMode::RangeOk) o:range_op() kw(TokType::Range) x:expr(lit)
              { SimpleTail::Range(o, x) }
            / o:##next_assign_op() rhs:expr_list(lit) { SimpleTail::Assign(o, rhs) }
            / ##when(mode == SimpleMode::LabelOk) c:kw(TokType::Colon) s:labeled_body()
              { SimpleTail::Label(c, s) }
            / a:kw(TokType::Arrow) value:expr(lit) { SimpleTail::Send(a, value) }
            / o:##next_inc_dec() { SimpleTail::IncDec(o) }
            / { SimpleTail::Expr }

        rule range_op() -> (Token, AssignOp)
            = t:kw(TokType::Define) { (t, AssignOp::Define) }
            / t:kw(TokType::Assign) { (t, AssignOp::Assign) }

        rule simple_basic(lit: bool) -> Stmt
            = s:simple_stmt(lit, SimpleMode::Basic) {? state.plain(s) }

        rule labeled_body() -> Stmt
            = &kw(TokType::RBrace) p:position!() { state.implicit_empty(p) }
            / enter() s:stmt()? leave() {? s.ok_or("statement") }

        rule if_stmt() -> Stmt
            = i:kw(TokType::If) h:if_header() body:block() else_:else_branch()?
              { state.if_stmt(i, h, body, else_) }

        rule if_header() -> (Option<Stmt>, Expr)
            = first:simple_basic(false)? rest:(kw(TokType::Semicolon) c:simple_basic(false)? { c })?
              p:position!()
              {? state.if_header(first, rest, p) }

        rule else_branch() -> Stmt
            = kw(TokType::Else) s:else_body() { s }

        rule else_body() -> Stmt
            = &kw(TokType::If) enter() s:if_stmt()? leave() {? s.ok_or("if statement") }
            / &kw(TokType::LBrace) b:block() { Stmt::Block(Box::new(b)) }
            / {? Err("if statement or block") }

        rule switch_stmt() -> Stmt
            = s:kw(TokType::Switch) h:switch_header() body:clause_block(false) p:position!()
              {? state.switch_stmt(s, h, body, p) }

        rule switch_header() -> (Option<Stmt>, Option<Stmt>)
            = first:simple_basic(false)? rest:(kw(TokType::Semicolon) s:simple_basic(false)? { s })?
              { match rest { Some(tag) => (first, tag), None => (None, first) } }

        rule select_stmt() -> Stmt
            = s:kw(TokType::Select) body:clause_block(true) { state.select_stmt(s, body) }

        rule clause_block(select: bool) -> BlockStmt
            = enter() b:clause_block_inner(select)? leave() {? b.ok_or("'{'") }

        rule clause_block_inner(select: bool) -> BlockStmt
            = lb:lbrace() o:position!() clauses:clause_item(select)* c:position!() rb:rbrace()
              { state.block(lb, (o, c), clauses, rb) }

        rule clause_item(select: bool) -> Stmt
            = s:position!() c:clause(select) { state.leading(c.node_id(), s); c }

        rule clause(select: bool) -> Stmt
            = ##when(select) c:comm_clause() { c }
            / ##when(!select) c:case_clause() { c }

        rule case_clause() -> Stmt
            = t:kw(TokType::Case) list:expr_list(true) col:colon() o:position!() body:stmt_list()
              { state.case_clause(t, list, col, o, body) }
            / t:kw(TokType::Default) col:colon() o:position!() body:stmt_list()
              { state.case_clause(t, Vec::new(), col, o, body) }

        rule comm_clause() -> Stmt
            = t:kw(TokType::Case) comm:simple_basic(true) col:colon() o:position!() body:stmt_list()
              { state.comm_clause(t, Some(comm), col, o, body) }
            / t:kw(TokType::Default) col:colon() o:position!() body:stmt_list()
              { state.comm_clause(t, None, col, o, body) }

        rule for_stmt() -> Stmt
            = f:kw(TokType::For) h:for_header() body:block() p:position!()
              {? state.for_stmt(f, h, body, p) }

        rule for_header() -> ForHeader
            = first:simple_stmt(false, SimpleMode::RangeOk)?
              rest:(kw(TokType::Semicolon) cond:simple_basic(false)? semi() post:simple_basic(false)? { (cond, post) })?
              { ForHeader { first, rest } }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokType, start: usize, end: usize) -> Token {
        Token { kind, start, end }
    }

    #[test]
    fn test_position_repr_describes_found_token() {
        let source = "package p\nfunc";
        let tokens = [
            token(TokType::Package, 0, 7),
            token(TokType::Ident, 8, 9),
            token(TokType::Semicolon, 9, 9),
            token(TokType::Func, 10, 14),
            token(TokType::EndMarker, 14, 14),
        ];
        let lines = LineIndex::new(source);
        let input = TokVec::new(source, &tokens, &lines);

        let loc = input.position_repr(3);
        assert_eq!(loc.found, "'func'");
        assert_eq!((loc.offset, loc.index), (10, 3));
        assert_eq!(loc.to_string(), "2:1");
        assert_eq!(input.position_repr(2).found, "newline");
        assert_eq!(input.position_repr(4).found, "EOF");
        assert_eq!(input.position_repr(99).found, "EOF");
    }

    #[test]
    fn test_binary_op_levels() {
        let source = "a*b";
        let tokens = [
            token(TokType::Ident, 0, 1),
            token(TokType::Mul, 1, 2),
            token(TokType::Ident, 2, 3),
        ];
        let lines = LineIndex::new(source);
        let input = TokVec::new(source, &tokens, &lines);
        assert!(matches!(
            input.next_binary_op(1, 5),
            RuleResult::Matched(2, (_, BinaryOp::Mul))
        ));
        assert!(matches!(input.next_binary_op(1, 4), RuleResult::Failed));
        assert!(matches!(input.at_any(1, &[TokType::Mul]), RuleResult::Matched(1, ())));
    }

    #[test]
    fn test_literal_types() {
        assert!(is_literal_type(&Expr::ident("T")));
        assert!(is_literal_type(&Expr::selector(Expr::ident("pkg"), "T")));
        assert!(!is_literal_type(&Expr::selector(
            Expr::selector(Expr::ident("a"), "b"),
            "T"
        )));
    }
}
