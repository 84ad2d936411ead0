// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement nodes.

use gocodemod_core::LineIndex;

use super::declaration::GenDecl;
use super::expression::{Expr, Ident};
use super::op::{AssignOp, BranchKind, IncDecOp};
use super::traits::{NodeId, Pos};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Decl(Box<DeclStmt>),
    Empty(EmptyStmt),
    Labeled(Box<LabeledStmt>),
    Expr(Box<ExprStmt>),
    Send(Box<SendStmt>),
    IncDec(Box<IncDecStmt>),
    Assign(Box<AssignStmt>),
    Go(Box<GoStmt>),
    Defer(Box<DeferStmt>),
    Return(Box<ReturnStmt>),
    Branch(Box<BranchStmt>),
    Block(Box<BlockStmt>),
    If(Box<IfStmt>),
    CaseClause(Box<CaseClause>),
    Switch(Box<SwitchStmt>),
    TypeSwitch(Box<TypeSwitchStmt>),
    CommClause(Box<CommClause>),
    Select(Box<SelectStmt>),
    For(Box<ForStmt>),
    Range(Box<RangeStmt>),
}

/// A `const`, `type` or `var` declaration inside a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclStmt {
    pub node_id: Option<NodeId>,
    pub decl: GenDecl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyStmt {
    pub node_id: Option<NodeId>,
    pub semicolon: Pos,
    /// No `;` in the source: the statement of `L: }`, or the mark left in a
    /// statement list where statements were removed.
    pub implicit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledStmt {
    pub node_id: Option<NodeId>,
    pub label: Ident,
    pub colon: Pos,
    pub stmt: Stmt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprStmt {
    pub node_id: Option<NodeId>,
    pub x: Expr,
}

impl ExprStmt {
    pub fn new(x: Expr) -> Self {
        ExprStmt { node_id: None, x }
    }
}

/// `ch <- value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendStmt {
    pub node_id: Option<NodeId>,
    pub chan: Expr,
    pub arrow: Pos,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncDecStmt {
    pub node_id: Option<NodeId>,
    pub x: Expr,
    pub tok_pos: Pos,
    pub tok: IncDecOp,
}

/// Assignment or short variable declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignStmt {
    pub node_id: Option<NodeId>,
    pub lhs: Vec<Expr>,
    pub tok_pos: Pos,
    pub tok: AssignOp,
    pub rhs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoStmt {
    pub node_id: Option<NodeId>,
    pub go_pos: Pos,
    pub call: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferStmt {
    pub node_id: Option<NodeId>,
    pub defer_pos: Pos,
    pub call: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStmt {
    pub node_id: Option<NodeId>,
    pub return_pos: Pos,
    pub results: Vec<Expr>,
}

/// `break`, `continue`, `goto` or `fallthrough`, with an optional label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchStmt {
    pub node_id: Option<NodeId>,
    pub tok_pos: Pos,
    pub tok: BranchKind,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockStmt {
    pub node_id: Option<NodeId>,
    pub lbrace: Pos,
    pub stmts: Vec<Stmt>,
    pub rbrace: Pos,
}

impl BlockStmt {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        BlockStmt {
            node_id: None,
            lbrace: Pos::NONE,
            stmts,
            rbrace: Pos::NONE,
        }
    }
}

/// `if init; cond { body } else ...`; `else_` is an `If` or a `Block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub node_id: Option<NodeId>,
    pub if_pos: Pos,
    pub init: Option<Stmt>,
    pub cond: Expr,
    pub body: BlockStmt,
    pub else_: Option<Stmt>,
}

/// A `case` or `default` clause of an expression or type switch.
/// `list` is empty for `default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseClause {
    pub node_id: Option<NodeId>,
    pub case_pos: Pos,
    pub list: Vec<Expr>,
    pub colon: Pos,
    pub body: Vec<Stmt>,
}

/// Expression switch; `body` holds only [`Stmt::CaseClause`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchStmt {
    pub node_id: Option<NodeId>,
    pub switch_pos: Pos,
    pub init: Option<Stmt>,
    pub tag: Option<Expr>,
    pub body: BlockStmt,
}

/// `switch x := y.(type) { ... }`; `assign` is an `ExprStmt` or `AssignStmt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSwitchStmt {
    pub node_id: Option<NodeId>,
    pub switch_pos: Pos,
    pub init: Option<Stmt>,
    pub assign: Stmt,
    pub body: BlockStmt,
}

/// A `case` or `default` clause of a select statement; `comm` is `None` for `default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommClause {
    pub node_id: Option<NodeId>,
    pub case_pos: Pos,
    pub comm: Option<Stmt>,
    pub colon: Pos,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStmt {
    pub node_id: Option<NodeId>,
    pub select_pos: Pos,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForStmt {
    pub node_id: Option<NodeId>,
    pub for_pos: Pos,
    pub init: Option<Stmt>,
    pub cond: Option<Expr>,
    pub post: Option<Stmt>,
    pub body: BlockStmt,
}

/// `for key, value := range x { ... }`; `tok` is `None` for `for range x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeStmt {
    pub node_id: Option<NodeId>,
    pub for_pos: Pos,
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    pub tok_pos: Pos,
    pub tok: Option<AssignOp>,
    pub x: Expr,
    pub body: BlockStmt,
}

// ============================================================================
// Layout helpers
// ============================================================================

impl Stmt {
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Stmt::Decl(s) => s.node_id,
            Stmt::Empty(s) => s.node_id,
            Stmt::Labeled(s) => s.node_id,
            Stmt::Expr(s) => s.node_id,
            Stmt::Send(s) => s.node_id,
            Stmt::IncDec(s) => s.node_id,
            Stmt::Assign(s) => s.node_id,
            Stmt::Go(s) => s.node_id,
            Stmt::Defer(s) => s.node_id,
            Stmt::Return(s) => s.node_id,
            Stmt::Branch(s) => s.node_id,
            Stmt::Block(s) => s.node_id,
            Stmt::If(s) => s.node_id,
            Stmt::CaseClause(s) => s.node_id,
            Stmt::Switch(s) => s.node_id,
            Stmt::TypeSwitch(s) => s.node_id,
            Stmt::CommClause(s) => s.node_id,
            Stmt::Select(s) => s.node_id,
            Stmt::For(s) => s.node_id,
            Stmt::Range(s) => s.node_id,
        }
    }

    /// Position of the first token.
    pub fn pos(&self) -> Pos {
        match self {
            Stmt::Decl(s) => s.decl.tok_pos,
            Stmt::Empty(s) => s.semicolon,
            Stmt::Labeled(s) => s.label.pos,
            Stmt::Expr(s) => s.x.pos(),
            Stmt::Send(s) => s.chan.pos(),
            Stmt::IncDec(s) => s.x.pos(),
            Stmt::Assign(s) => s.lhs.first().map_or(s.tok_pos, Expr::pos),
            Stmt::Go(s) => s.go_pos,
            Stmt::Defer(s) => s.defer_pos,
            Stmt::Return(s) => s.return_pos,
            Stmt::Branch(s) => s.tok_pos,
            Stmt::Block(s) => s.lbrace,
            Stmt::If(s) => s.if_pos,
            Stmt::CaseClause(s) => s.case_pos,
            Stmt::Switch(s) => s.switch_pos,
            Stmt::TypeSwitch(s) => s.switch_pos,
            Stmt::CommClause(s) => s.case_pos,
            Stmt::Select(s) => s.select_pos,
            Stmt::For(s) => s.for_pos,
            Stmt::Range(s) => s.for_pos,
        }
    }

    pub fn line(&self, lines: &LineIndex) -> Option<u32> {
        self.pos().line(lines)
    }

    /// Source line of the last token.
    pub fn end_line(&self, lines: &LineIndex) -> Option<u32> {
        match self {
            Stmt::Decl(s) => s.decl.end_line(lines),
            Stmt::Empty(s) => s.semicolon.line(lines),
            Stmt::Labeled(s) => s.stmt.end_line(lines).or(s.colon.line(lines)),
            Stmt::Expr(s) => s.x.end_line(lines),
            Stmt::Send(s) => s.value.end_line(lines),
            Stmt::IncDec(s) => s.tok_pos.line(lines),
            Stmt::Assign(s) => s.rhs.last().and_then(|e| e.end_line(lines)),
            Stmt::Go(s) => s.call.end_line(lines),
            Stmt::Defer(s) => s.call.end_line(lines),
            Stmt::Return(s) => match s.results.last() {
                Some(result) => result.end_line(lines),
                None => s.return_pos.line(lines),
            },
            Stmt::Branch(s) => match &s.label {
                Some(label) => label.pos.line(lines),
                None => s.tok_pos.line(lines),
            },
            Stmt::Block(s) => s.rbrace.line(lines),
            Stmt::If(s) => match &s.else_ {
                Some(else_) => else_.end_line(lines),
                None => s.body.rbrace.line(lines),
            },
            Stmt::CaseClause(s) => s
                .body
                .last()
                .and_then(|stmt| stmt.end_line(lines))
                .or(s.colon.line(lines)),
            Stmt::Switch(s) => s.body.rbrace.line(lines),
            Stmt::TypeSwitch(s) => s.body.rbrace.line(lines),
            Stmt::CommClause(s) => s
                .body
                .last()
                .and_then(|stmt| stmt.end_line(lines))
                .or(s.colon.line(lines)),
            Stmt::Select(s) => s.body.rbrace.line(lines),
            Stmt::For(s) => s.body.rbrace.line(lines),
            Stmt::Range(s) => s.body.rbrace.line(lines),
        }
    }

    /// The statement list owned by this statement, for statement-list containers.
    pub fn statement_list_mut(&mut self) -> Option<&mut Vec<Stmt>> {
        match self {
            Stmt::Block(block) => Some(&mut block.stmts),
            Stmt::CaseClause(clause) => Some(&mut clause.body),
            Stmt::CommClause(clause) => Some(&mut clause.body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_list_mut() {
        let mut block = Stmt::Block(Box::new(BlockStmt::new(vec![Stmt::Empty(EmptyStmt {
            node_id: None,
            semicolon: Pos::NONE,
            implicit: true,
        })])));
        assert_eq!(block.statement_list_mut().map(|l| l.len()), Some(1));

        let mut expr = Stmt::Expr(Box::new(ExprStmt::new(Expr::ident("x"))));
        assert!(expr.statement_list_mut().is_none());
    }

    #[test]
    fn test_stmt_lines_from_positions() {
        let lines = LineIndex::new("a\nb\nc\n");
        let stmt = Stmt::Return(Box::new(ReturnStmt {
            node_id: None,
            return_pos: Pos::from_offset(2),
            results: vec![],
        }));
        assert_eq!(stmt.line(&lines), Some(2));
        assert_eq!(stmt.end_line(&lines), Some(2));
    }
}
