// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

pub mod declaration;
pub mod expression;
pub mod op;
pub mod statement;
pub mod traits;

pub use declaration::{Decl, File, FuncDecl, GenDecl, ImportSpec, Spec, TypeSpec, ValueSpec};
pub use expression::{
    ArrayType, BasicLit, BinaryExpr, CallExpr, ChanType, CompositeLit, Ellipsis, Expr, Field,
    FieldList, FuncLit, FuncType, Ident, IndexExpr, InterfaceType, KeyValueExpr, MapType,
    ParenExpr, SelectorExpr, SliceExpr, StarExpr, StructType, TypeAssertExpr, UnaryExpr,
};
pub use op::{
    AssignOp, BinaryOp, BranchKind, ChanDir, DeclKeyword, IncDecOp, LitKind, UnaryOp,
    HIGHEST_PREC, UNARY_PREC,
};
pub use statement::{
    AssignStmt, BlockStmt, BranchStmt, CaseClause, CommClause, DeclStmt, DeferStmt, EmptyStmt,
    ExprStmt, ForStmt, GoStmt, IfStmt, IncDecStmt, LabeledStmt, RangeStmt, ReturnStmt,
    SelectStmt, SendStmt, Stmt, SwitchStmt, TypeSwitchStmt,
};
pub use traits::{
    Comment, CommentTable, Node, NodeComments, NodeId, NodeIdGenerator, NodeKind, NodeMut,
    NodeRef, Pos,
};
