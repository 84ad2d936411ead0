// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node constructors called from the grammar's actions.
//!
//! Every node gets a fresh id here. Checks the grammar cannot express
//! (grouping of parameters, the shape of `if` and `for` headers) return
//! `Err` through [`ParseState::fail`] so the message survives as the parse
//! error.

use super::grammar::{
    is_literal_type, is_type_switch_guard, ForHeader, IndexTail, LitBody, Simple, SimpleTail,
    Suffix,
};
use super::state::ParseState;
use crate::nodes::{
    ArrayType, AssignStmt, BasicLit, BinaryExpr, BinaryOp, BlockStmt, BranchKind,
    BranchStmt, CallExpr, CaseClause, ChanDir, ChanType, CommClause, CompositeLit, Decl, DeclKeyword,
    DeclStmt, DeferStmt, Ellipsis, EmptyStmt, Expr, ExprStmt, Field, FieldList, File, ForStmt,
    FuncDecl, FuncLit, FuncType, GenDecl, GoStmt, Ident, IfStmt, ImportSpec, IncDecStmt,
    IndexExpr, InterfaceType, KeyValueExpr, LabeledStmt, LitKind, MapType, ParenExpr, Pos,
    RangeStmt, ReturnStmt, SelectStmt, SelectorExpr, SendStmt, SliceExpr, Spec, StarExpr, Stmt,
    StructType, SwitchStmt, TypeAssertExpr, TypeSpec, TypeSwitchStmt, UnaryExpr, UnaryOp,
    ValueSpec,
};
use crate::tokenizer::{TokType, Token};

type Failed = &'static str;

impl ParseState<'_> {
    // ========================================================================
    // Leaves and files
    // ========================================================================

    pub(crate) fn ident(&self, tok: Token) -> Ident {
        Ident {
            node_id: self.id(),
            pos: self.pos(tok),
            name: self.text(tok),
        }
    }

    pub(crate) fn basic_lit(&self, tok: Token) -> BasicLit {
        let kind = match tok.kind {
            TokType::Float => LitKind::Float,
            TokType::Imag => LitKind::Imag,
            TokType::Char => LitKind::Char,
            TokType::String => LitKind::String,
            _ => LitKind::Int,
        };
        BasicLit {
            node_id: self.id(),
            pos: self.pos(tok),
            kind,
            value: self.text(tok),
        }
    }

    pub(crate) fn package_name(&self, name: Ident, index: usize) -> Result<Ident, Failed> {
        if name.is_blank() {
            let offset = name.pos.offset().unwrap_or_default();
            return self.fail(index, offset, "invalid package name _");
        }
        Ok(name)
    }

    /// The file root; `clause` brackets the terminator of the package
    /// clause, `eof` is the index of the end marker.
    pub(crate) fn file(
        &self,
        package: Token,
        name: Ident,
        clause: (usize, usize),
        decls: Vec<Decl>,
        eof: usize,
    ) -> File {
        let node_id = self.id();
        self.item(node_id, 0, clause.0, clause.1);
        self.rest(node_id, eof);
        File {
            node_id,
            package_pos: self.pos(package),
            name,
            decls,
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub(crate) fn grouped_decl(
        &self,
        keyword: (Token, DeclKeyword),
        lparen: Token,
        inner: (usize, usize),
        specs: Vec<Spec>,
        rparen: Token,
    ) -> GenDecl {
        let node_id = self.id();
        self.container(node_id, inner.0, inner.1);
        GenDecl {
            node_id,
            tok_pos: self.pos(keyword.0),
            tok: keyword.1,
            lparen: self.pos(lparen),
            specs,
            rparen: self.pos(rparen),
        }
    }

    pub(crate) fn gen_decl(&self, keyword: (Token, DeclKeyword), spec: Spec) -> GenDecl {
        GenDecl {
            node_id: self.id(),
            tok_pos: self.pos(keyword.0),
            tok: keyword.1,
            lparen: Pos::NONE,
            specs: vec![spec],
            rparen: Pos::NONE,
        }
    }

    pub(crate) fn import_spec(&self, name: Option<Ident>, path: Token) -> ImportSpec {
        ImportSpec {
            node_id: self.id(),
            name,
            path: self.basic_lit(path),
        }
    }

    pub(crate) fn value_spec(
        &self,
        keyword: DeclKeyword,
        names: Vec<Ident>,
        ty: Option<Expr>,
        values: Option<Vec<Expr>>,
    ) -> Result<ValueSpec, Failed> {
        let values = values.unwrap_or_default();
        if keyword == DeclKeyword::Var && ty.is_none() && values.is_empty() {
            return Err("type");
        }
        Ok(ValueSpec {
            node_id: self.id(),
            names,
            ty,
            values,
        })
    }

    pub(crate) fn type_spec(
        &self,
        name: Ident,
        type_params: Option<FieldList>,
        alias: bool,
        ty: Expr,
    ) -> TypeSpec {
        TypeSpec {
            node_id: self.id(),
            name,
            type_params,
            alias,
            ty,
        }
    }

    pub(crate) fn func_decl(
        &self,
        recv: Option<FieldList>,
        name: Ident,
        ty: FuncType,
        body: Option<BlockStmt>,
    ) -> FuncDecl {
        FuncDecl {
            node_id: self.id(),
            recv,
            name,
            ty,
            body,
        }
    }

    // ========================================================================
    // Field lists
    // ========================================================================

    /// `(params)`, also used for receivers and parenthesized results.
    ///
    /// Entries are `(name, type)` pairs where a lone identifier comes back
    /// as a name; grouping decides whether it was a type instead.
    pub(crate) fn parameters(
        &self,
        lparen: Token,
        entries: Vec<(Option<Ident>, Option<Expr>)>,
        rparen: Token,
        index: usize,
    ) -> Result<FieldList, Failed> {
        let Some(list) = self.group_params(entries) else {
            return self.fail(index, lparen.start, "mixed named and unnamed parameters");
        };
        Ok(FieldList {
            node_id: self.id(),
            opening: self.pos(lparen),
            list,
            closing: self.pos(rparen),
        })
    }

    fn group_params(&self, entries: Vec<(Option<Ident>, Option<Expr>)>) -> Option<Vec<Field>> {
        let named = entries
            .iter()
            .any(|(name, ty)| name.is_some() && ty.is_some());
        if !named {
            let fields = entries
                .into_iter()
                .filter_map(|entry| match entry {
                    (Some(name), None) => Some(Expr::Ident(name)),
                    (_, ty) => ty,
                })
                .map(|ty| self.field(Vec::new(), ty, None))
                .collect();
            return Some(fields);
        }

        let mut fields = Vec::new();
        let mut pending: Vec<Ident> = Vec::new();
        for entry in entries {
            match entry {
                (Some(name), None) => pending.push(name),
                (Some(name), Some(ty)) => {
                    pending.push(name);
                    fields.push(self.field(std::mem::take(&mut pending), ty, None));
                }
                (None, _) => return None,
            }
        }
        pending.is_empty().then_some(fields)
    }

    /// A result list written as a bare type.
    pub(crate) fn single_result(&self, ty: Expr) -> FieldList {
        FieldList {
            node_id: self.id(),
            opening: Pos::NONE,
            list: vec![self.field(Vec::new(), ty, None)],
            closing: Pos::NONE,
        }
    }

    /// `[T any, K comparable]`
    pub(crate) fn field_list(&self, opening: Token, list: Vec<Field>, closing: Token) -> FieldList {
        FieldList {
            node_id: self.id(),
            opening: self.pos(opening),
            list,
            closing: self.pos(closing),
        }
    }

    /// The braces of a struct or interface body.
    pub(crate) fn braced_fields(
        &self,
        lbrace: Token,
        inner: (usize, usize),
        list: Vec<Field>,
        rbrace: Token,
    ) -> FieldList {
        let fields = self.field_list(lbrace, list, rbrace);
        self.container(fields.node_id, inner.0, inner.1);
        fields
    }

    pub(crate) fn field(&self, names: Vec<Ident>, ty: Expr, tag: Option<BasicLit>) -> Field {
        Field {
            node_id: self.id(),
            names,
            ty,
            tag,
        }
    }

    /// An interface method `Name(params) results`.
    pub(crate) fn method(
        &self,
        name: Ident,
        params: FieldList,
        results: Option<FieldList>,
    ) -> Field {
        let ty = FuncType {
            node_id: self.id(),
            func_pos: Pos::NONE,
            type_params: None,
            params,
            results,
        };
        self.field(vec![name], Expr::FuncType(Box::new(ty)), None)
    }

    /// `A | ~B | C`, folded to the left.
    pub(crate) fn union(&self, first: Expr, rest: Vec<(Token, Expr)>) -> Expr {
        rest.into_iter().fold(first, |x, (op, y)| {
            self.binary(x, (op, BinaryOp::Or), y)
        })
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// `T`, `pkg.T`, `T[A, B]`.
    pub(crate) fn type_name(
        &self,
        name: Token,
        sel: Option<Ident>,
        args: Option<(Token, Vec<Expr>, Token)>,
    ) -> Expr {
        let mut x = Expr::Ident(self.ident(name));
        if let Some(sel) = sel {
            x = Expr::Selector(Box::new(SelectorExpr {
                node_id: self.id(),
                x,
                sel,
            }));
        }
        match args {
            Some((lbrack, indices, rbrack)) => Expr::Index(Box::new(IndexExpr {
                node_id: self.id(),
                x,
                lbrack: self.pos(lbrack),
                indices,
                rbrack: self.pos(rbrack),
            })),
            None => x,
        }
    }

    pub(crate) fn array_type(&self, lbrack: Token, len: Option<Expr>, elt: Expr) -> Expr {
        Expr::ArrayType(Box::new(ArrayType {
            node_id: self.id(),
            lbrack: self.pos(lbrack),
            len,
            elt,
        }))
    }

    pub(crate) fn struct_type(&self, keyword: Token, fields: FieldList) -> Expr {
        Expr::StructType(Box::new(StructType {
            node_id: self.id(),
            struct_pos: self.pos(keyword),
            fields,
        }))
    }

    pub(crate) fn map_type(&self, keyword: Token, key: Expr, value: Expr) -> Expr {
        Expr::MapType(Box::new(MapType {
            node_id: self.id(),
            map_pos: self.pos(keyword),
            key,
            value,
        }))
    }

    pub(crate) fn chan_type(
        &self,
        begin: Token,
        arrow: Option<Token>,
        dir: ChanDir,
        value: Expr,
    ) -> Expr {
        Expr::ChanType(Box::new(ChanType {
            node_id: self.id(),
            begin: self.pos(begin),
            arrow: arrow.map_or(Pos::NONE, |a| self.pos(a)),
            dir,
            value,
        }))
    }

    pub(crate) fn func_type(
        &self,
        func: Token,
        type_params: Option<FieldList>,
        params: FieldList,
        results: Option<FieldList>,
    ) -> FuncType {
        FuncType {
            node_id: self.id(),
            func_pos: self.pos(func),
            type_params,
            params,
            results,
        }
    }

    pub(crate) fn interface_type(&self, keyword: Token, methods: FieldList) -> Expr {
        Expr::InterfaceType(Box::new(InterfaceType {
            node_id: self.id(),
            interface_pos: self.pos(keyword),
            methods,
        }))
    }

    /// `...T` in a parameter list, `[...]T` when `elt` is `None`.
    pub(crate) fn ellipsis(&self, tok: Token, elt: Option<Expr>) -> Expr {
        Expr::Ellipsis(Box::new(Ellipsis {
            node_id: self.id(),
            pos: self.pos(tok),
            elt,
        }))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub(crate) fn binary(&self, x: Expr, op: (Token, BinaryOp), y: Expr) -> Expr {
        Expr::Binary(Box::new(BinaryExpr {
            node_id: self.id(),
            x,
            op_pos: self.pos(op.0),
            op: op.1,
            y,
        }))
    }

    pub(crate) fn unary(&self, op: (Token, UnaryOp), x: Expr) -> Expr {
        Expr::Unary(Box::new(UnaryExpr {
            node_id: self.id(),
            op_pos: self.pos(op.0),
            op: op.1,
            x,
        }))
    }

    pub(crate) fn star(&self, star: Token, x: Expr) -> Expr {
        Expr::Star(Box::new(StarExpr {
            node_id: self.id(),
            star: self.pos(star),
            x,
        }))
    }

    pub(crate) fn paren(&self, lparen: Token, x: Expr, rparen: Token) -> Expr {
        Expr::Paren(Box::new(ParenExpr {
            node_id: self.id(),
            lparen: self.pos(lparen),
            x,
            rparen: self.pos(rparen),
        }))
    }

    /// A function type, or a function literal when a body follows.
    pub(crate) fn func_lit(&self, ty: FuncType, body: Option<BlockStmt>) -> Expr {
        match body {
            Some(body) => Expr::FuncLit(Box::new(FuncLit {
                node_id: self.id(),
                ty,
                body,
            })),
            None => Expr::FuncType(Box::new(ty)),
        }
    }

    /// Apply postfix operations to an operand, left to right.
    pub(crate) fn primary(
        &self,
        operand: Expr,
        suffixes: Vec<Suffix>,
        index: usize,
    ) -> Result<Expr, Failed> {
        let mut x = operand;
        for suffix in suffixes {
            x = match suffix {
                Suffix::Selector(sel) => Expr::Selector(Box::new(SelectorExpr {
                    node_id: self.id(),
                    x,
                    sel,
                })),
                Suffix::Assert { lparen, ty, rparen } => {
                    Expr::TypeAssert(Box::new(TypeAssertExpr {
                        node_id: self.id(),
                        x,
                        lparen: self.pos(lparen),
                        ty,
                        rparen: self.pos(rparen),
                    }))
                }
                Suffix::Index {
                    lbrack,
                    indices,
                    rbrack,
                } => Expr::Index(Box::new(IndexExpr {
                    node_id: self.id(),
                    x,
                    lbrack: self.pos(lbrack),
                    indices,
                    rbrack: self.pos(rbrack),
                })),
                Suffix::Slice {
                    lbrack,
                    low,
                    high,
                    max,
                    slice3,
                    rbrack,
                } => Expr::Slice(Box::new(SliceExpr {
                    node_id: self.id(),
                    x,
                    lbrack: self.pos(lbrack),
                    low,
                    high,
                    max,
                    slice3,
                    rbrack: self.pos(rbrack),
                })),
                Suffix::Call {
                    lparen,
                    args,
                    ellipsis,
                    rparen,
                } => Expr::Call(Box::new(CallExpr {
                    node_id: self.id(),
                    fun: x,
                    lparen: self.pos(lparen),
                    args,
                    has_ellipsis: ellipsis.is_some(),
                    ellipsis: ellipsis.map_or(Pos::NONE, |e| self.pos(e)),
                    rparen: self.pos(rparen),
                })),
                Suffix::Literal(body) => {
                    if !is_literal_type(&x) {
                        let offset = self.offset_at(index);
                        return self.fail(index, offset, "unexpected '{' after expression");
                    }
                    self.composite(Some(x), body)
                }
            };
        }
        Ok(x)
    }

    pub(crate) fn call_suffix(
        &self,
        lparen: Token,
        args: Vec<(Expr, Option<Token>)>,
        rparen: Token,
    ) -> Suffix {
        let mut ellipsis = None;
        let args = args
            .into_iter()
            .map(|(arg, dots)| {
                ellipsis = dots.or(ellipsis);
                arg
            })
            .collect();
        Suffix::Call {
            lparen,
            args,
            ellipsis,
            rparen,
        }
    }

    /// `[i]`, `[A, B]`, `[lo:hi]` or `[lo:hi:max]`.
    pub(crate) fn index_suffix(
        &self,
        lbrack: Token,
        low: Option<Expr>,
        tail: IndexTail,
        rbrack: Token,
        index: usize,
    ) -> Result<Suffix, Failed> {
        match tail {
            IndexTail::Index(more) => {
                let Some(first) = low else {
                    return self.fail(index, rbrack.start, "expected operand");
                };
                let mut indices = vec![first];
                indices.extend(more);
                Ok(Suffix::Index {
                    lbrack,
                    indices,
                    rbrack,
                })
            }
            IndexTail::Slice(parts) => {
                let slice3 = parts.len() == 2;
                let mut bounds = parts.into_iter().map(|(_, x)| x);
                let high = bounds.next().flatten();
                let max = bounds.next().flatten();
                if slice3 && (high.is_none() || max.is_none()) {
                    return self.fail(
                        index,
                        rbrack.start,
                        "middle and final index required in 3-index slice",
                    );
                }
                Ok(Suffix::Slice {
                    lbrack,
                    low,
                    high,
                    max,
                    slice3,
                    rbrack,
                })
            }
        }
    }

    /// The braces of a composite literal; the node id is handed to the
    /// literal built from it.
    pub(crate) fn literal_body(
        &self,
        lbrace: Token,
        inner: (usize, usize),
        elts: Vec<Expr>,
        rbrace: Token,
    ) -> LitBody {
        let node_id = self.id();
        self.container(node_id, inner.0, inner.1);
        LitBody {
            node_id,
            lbrace,
            elts,
            rbrace,
        }
    }

    pub(crate) fn composite(&self, ty: Option<Expr>, body: LitBody) -> Expr {
        Expr::CompositeLit(Box::new(CompositeLit {
            node_id: body.node_id,
            ty,
            lbrace: self.pos(body.lbrace),
            elts: body.elts,
            rbrace: self.pos(body.rbrace),
        }))
    }

    pub(crate) fn element(&self, key: Expr, value: Option<(Token, Expr)>) -> Expr {
        match value {
            Some((colon, value)) => Expr::KeyValue(Box::new(KeyValueExpr {
                node_id: self.id(),
                key,
                colon: self.pos(colon),
                value,
            })),
            None => key,
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub(crate) fn block(
        &self,
        lbrace: Token,
        inner: (usize, usize),
        stmts: Vec<Stmt>,
        rbrace: Token,
    ) -> BlockStmt {
        let node_id = self.id();
        self.container(node_id, inner.0, inner.1);
        BlockStmt {
            node_id,
            lbrace: self.pos(lbrace),
            stmts,
            rbrace: self.pos(rbrace),
        }
    }

    /// A `;` standing alone in a statement list.
    pub(crate) fn empty_stmt(&self, semicolon: Token) -> Stmt {
        Stmt::Empty(EmptyStmt {
            node_id: self.id(),
            semicolon: self.pos(semicolon),
            implicit: semicolon.is_implicit_semicolon(),
        })
    }

    /// An empty statement ending at the terminator at `index`.
    pub(crate) fn empty_at(&self, index: usize) -> Stmt {
        match self.tokens.get(index) {
            Some(&tok) => self.empty_stmt(tok),
            None => self.implicit_empty(index),
        }
    }

    /// The missing statement of a label right before `}`.
    pub(crate) fn implicit_empty(&self, index: usize) -> Stmt {
        Stmt::Empty(EmptyStmt {
            node_id: self.id(),
            semicolon: Pos::from_offset(self.offset_at(index)),
            implicit: true,
        })
    }

    pub(crate) fn decl_stmt(&self, decl: GenDecl) -> Stmt {
        Stmt::Decl(Box::new(DeclStmt {
            node_id: self.id(),
            decl,
        }))
    }

    pub(crate) fn go_stmt(&self, keyword: Token, call: Expr) -> Stmt {
        Stmt::Go(Box::new(GoStmt {
            node_id: self.id(),
            go_pos: self.pos(keyword),
            call,
        }))
    }

    pub(crate) fn defer_stmt(&self, keyword: Token, call: Expr) -> Stmt {
        Stmt::Defer(Box::new(DeferStmt {
            node_id: self.id(),
            defer_pos: self.pos(keyword),
            call,
        }))
    }

    pub(crate) fn return_stmt(&self, keyword: Token, results: Vec<Expr>) -> Stmt {
        Stmt::Return(Box::new(ReturnStmt {
            node_id: self.id(),
            return_pos: self.pos(keyword),
            results,
        }))
    }

    pub(crate) fn branch(&self, keyword: (Token, BranchKind), label: Option<Ident>) -> Stmt {
        Stmt::Branch(Box::new(BranchStmt {
            node_id: self.id(),
            tok_pos: self.pos(keyword.0),
            tok: keyword.1,
            label,
        }))
    }

    /// Combine the expression list of a simple statement with what followed it.
    pub(crate) fn simple(
        &self,
        mut lhs: Vec<Expr>,
        tail: SimpleTail,
        index: usize,
    ) -> Result<Simple, Failed> {
        let offset = self.offset_at(index);
        let stmt = match tail {
            SimpleTail::Range((tok, op), x) => {
                if lhs.len() > 2 {
                    return self.fail(
                        index,
                        offset,
                        "range clause permits at most two iteration variables",
                    );
                }
                let mut vars = lhs.into_iter();
                return Ok(Simple::Range {
                    key: vars.next(),
                    value: vars.next(),
                    tok: Some((tok, op)),
                    x,
                });
            }
            SimpleTail::Assign((tok, op), rhs) => Stmt::Assign(Box::new(AssignStmt {
                node_id: self.id(),
                lhs,
                tok_pos: self.pos(tok),
                tok: op,
                rhs,
            })),
            _ if lhs.len() > 1 => {
                return self.fail(index, offset, "expected ':=' or '=' or ','");
            }
            SimpleTail::Label(colon, stmt) => {
                let Some(Expr::Ident(label)) = lhs.pop() else {
                    return Err("label");
                };
                Stmt::Labeled(Box::new(LabeledStmt {
                    node_id: self.id(),
                    label,
                    colon: self.pos(colon),
                    stmt,
                }))
            }
            SimpleTail::Send(arrow, value) => Stmt::Send(Box::new(SendStmt {
                node_id: self.id(),
                chan: lhs.remove(0),
                arrow: self.pos(arrow),
                value,
            })),
            SimpleTail::IncDec((tok, op)) => Stmt::IncDec(Box::new(IncDecStmt {
                node_id: self.id(),
                x: lhs.remove(0),
                tok_pos: self.pos(tok),
                tok: op,
            })),
            SimpleTail::Expr => Stmt::Expr(Box::new(ExprStmt {
                node_id: self.id(),
                x: lhs.remove(0),
            })),
        };
        Ok(Simple::Stmt(stmt))
    }

    pub(crate) fn plain(&self, simple: Simple) -> Result<Stmt, Failed> {
        match simple {
            Simple::Stmt(stmt) => Ok(stmt),
            Simple::Range { .. } => Err("statement"),
        }
    }

    /// The expression of an expression statement used as a value.
    fn to_expr(&self, stmt: Stmt, index: usize) -> Result<Expr, Failed> {
        match stmt {
            Stmt::Expr(s) => Ok(s.x),
            other => {
                let offset = other.pos().offset().unwrap_or_default();
                self.fail(index, offset, "cannot use statement as value")
            }
        }
    }

    pub(crate) fn if_stmt(
        &self,
        keyword: Token,
        header: (Option<Stmt>, Expr),
        body: BlockStmt,
        else_: Option<Stmt>,
    ) -> Stmt {
        let (init, cond) = header;
        Stmt::If(Box::new(IfStmt {
            node_id: self.id(),
            if_pos: self.pos(keyword),
            init,
            cond,
            body,
            else_,
        }))
    }

    /// `cond` or `init; cond`; `rest` is what followed the `;`, if any.
    pub(crate) fn if_header(
        &self,
        first: Option<Stmt>,
        rest: Option<Option<Stmt>>,
        index: usize,
    ) -> Result<(Option<Stmt>, Expr), Failed> {
        let (init, cond) = match rest {
            Some(cond) => (first, cond),
            None => (None, first),
        };
        let Some(cond) = cond else {
            let offset = self.offset_at(index);
            return self.fail(index, offset, "missing condition in if statement");
        };
        Ok((init, self.to_expr(cond, index)?))
    }

    pub(crate) fn switch_stmt(
        &self,
        keyword: Token,
        header: (Option<Stmt>, Option<Stmt>),
        body: BlockStmt,
        index: usize,
    ) -> Result<Stmt, Failed> {
        let (init, tag) = header;
        let switch_pos = self.pos(keyword);
        let tag = match tag {
            Some(assign) if is_type_switch_guard(&assign) => {
                return Ok(Stmt::TypeSwitch(Box::new(TypeSwitchStmt {
                    node_id: self.id(),
                    switch_pos,
                    init,
                    assign,
                    body,
                })));
            }
            tag => tag,
        };
        let tag = tag.map(|stmt| self.to_expr(stmt, index)).transpose()?;
        Ok(Stmt::Switch(Box::new(SwitchStmt {
            node_id: self.id(),
            switch_pos,
            init,
            tag,
            body,
        })))
    }

    pub(crate) fn case_clause(
        &self,
        keyword: Token,
        list: Vec<Expr>,
        colon: Token,
        after_colon: usize,
        body: Vec<Stmt>,
    ) -> Stmt {
        let node_id = self.id();
        self.opening(node_id, after_colon);
        Stmt::CaseClause(Box::new(CaseClause {
            node_id,
            case_pos: self.pos(keyword),
            list,
            colon: self.pos(colon),
            body,
        }))
    }

    pub(crate) fn comm_clause(
        &self,
        keyword: Token,
        comm: Option<Stmt>,
        colon: Token,
        after_colon: usize,
        body: Vec<Stmt>,
    ) -> Stmt {
        let node_id = self.id();
        self.opening(node_id, after_colon);
        Stmt::CommClause(Box::new(CommClause {
            node_id,
            case_pos: self.pos(keyword),
            comm,
            colon: self.pos(colon),
            body,
        }))
    }

    pub(crate) fn select_stmt(&self, keyword: Token, body: BlockStmt) -> Stmt {
        Stmt::Select(Box::new(SelectStmt {
            node_id: self.id(),
            select_pos: self.pos(keyword),
            body,
        }))
    }

    pub(crate) fn for_stmt(
        &self,
        keyword: Token,
        header: ForHeader,
        body: BlockStmt,
        index: usize,
    ) -> Result<Stmt, Failed> {
        let for_pos = self.pos(keyword);
        let ForHeader { first, rest } = header;
        let (init, cond, post) = match (first, rest) {
            (Some(Simple::Range { key, value, tok, x }), None) => {
                let (tok_pos, tok) = match tok {
                    Some((t, op)) => (self.pos(t), Some(op)),
                    None => (Pos::NONE, None),
                };
                return Ok(Stmt::Range(Box::new(RangeStmt {
                    node_id: self.id(),
                    for_pos,
                    key,
                    value,
                    tok_pos,
                    tok,
                    x,
                    body,
                })));
            }
            (Some(Simple::Range { .. }), Some(_)) => {
                let offset = self.offset_at(index);
                return self.fail(index, offset, "unexpected range clause");
            }
            (Some(Simple::Stmt(cond)), None) => (None, Some(cond), None),
            (None, None) => (None, None, None),
            (first, Some((cond, post))) => {
                let init = match first {
                    Some(Simple::Stmt(stmt)) => Some(stmt),
                    _ => None,
                };
                (init, cond, post)
            }
        };
        let cond = cond.map(|stmt| self.to_expr(stmt, index)).transpose()?;
        Ok(Stmt::For(Box::new(ForStmt {
            node_id: self.id(),
            for_pos,
            init,
            cond,
            post,
            body,
        })))
    }
}
