//! Function call queries and edits.

use std::rc::Rc;

use tracing::debug;

use gocodemod_core::normalize_string;
use gocodemod_cst::{source_code, CallExpr, Expr, NodeRef, Stmt};

use crate::ancestry::{NodeWithAncestry, Scope};
use crate::error::CodemodResult;
use crate::fragment::parse_expr;
use crate::source_file::{MatchMode, ScopedMatches, SourceFile};
use crate::splice::{structurally_equal, Anchored, Splice};

/// A call expression found in a file.
#[derive(Debug, Clone)]
pub struct FunctionCall {
    ancestry: Rc<NodeWithAncestry>,
    call: CallExpr,
    scope: Scope,
}

impl FunctionCall {
    /// The call as it was when found, or after this handle's last edit.
    pub fn node(&self) -> &CallExpr {
        &self.call
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn ancestry(&self) -> &NodeWithAncestry {
        &self.ancestry
    }

    /// The callee rendered as source: `fmt.Println`, `run`, `s.method`.
    pub fn function_name(&self) -> String {
        source_code(&self.call.fun)
    }

    pub fn args(&self) -> &[Expr] {
        &self.call.args
    }

    /// Change the call in place. Returns `None` if it is no longer in `file`.
    pub fn edit<F, U>(&mut self, file: &mut SourceFile, edit: F) -> Option<U>
    where
        F: FnOnce(&mut CallExpr) -> U,
    {
        file.edit_captured(&mut self.call, edit)
    }

    /// Replace the callee with `callee`, e.g. `"fmt.Errorf"`.
    pub fn set_function(&mut self, file: &mut SourceFile, callee: &str) -> CodemodResult<bool> {
        let fun = parse_expr(callee)?;
        Ok(self.edit(file, |call| call.fun = fun).is_some())
    }

    /// Swap two arguments. Out-of-range indices leave the call unchanged.
    pub fn swap_args(&mut self, file: &mut SourceFile, i: usize, j: usize) -> bool {
        let len = self.call.args.len();
        if i >= len || j >= len {
            return false;
        }
        self.edit(file, |call| call.args.swap(i, j)).is_some()
    }

    pub fn insert_before(&self, file: &mut SourceFile, stmt: Stmt) -> usize {
        file.splice(self, Splice::InsertBefore(stmt))
    }

    pub fn insert_after(&self, file: &mut SourceFile, stmt: Stmt) -> usize {
        file.splice(self, Splice::InsertAfter(stmt))
    }

    /// Remove the statement holding the call. Calls nested in another
    /// expression or in a statement header are left alone.
    pub fn remove(self, file: &mut SourceFile) -> usize {
        file.splice(&self, Splice::Remove)
    }

    /// Put `expr` where the call is, when the call is a statement of its own,
    /// an assigned value or a returned value.
    pub fn replace(self, file: &mut SourceFile, expr: Expr) -> usize {
        let Some((container, _)) = self.ancestry.statement_anchor() else {
            debug!(callee = %self.function_name(), "call outside a function body; not replaced");
            return 0;
        };
        let Some(container_id) = container.node_id() else {
            return 0;
        };
        let mode = file.match_mode();
        let is_call = |e: &Expr| match mode {
            MatchMode::Identity => self.call.node_id.is_some() && e.node_id() == self.call.node_id,
            MatchMode::Structural => self.is_same_call(e),
        };
        file.edit_statement_list(container_id, container.kind(), |stmts, _| {
            let mut replaced = 0;
            for stmt in stmts.iter_mut() {
                let slots = match stmt {
                    Stmt::Expr(s) => std::slice::from_mut(&mut s.x),
                    Stmt::Return(r) => r.results.as_mut_slice(),
                    Stmt::Assign(a) => a.rhs.as_mut_slice(),
                    _ => continue,
                };
                for slot in slots.iter_mut().filter(|slot| is_call(&**slot)) {
                    *slot = expr.clone();
                    replaced += 1;
                }
            }
            replaced
        })
        .unwrap_or(0)
    }

    fn is_same_call(&self, expr: &Expr) -> bool {
        matches!(expr, Expr::Call(call) if structurally_equal(call.as_ref(), &self.call))
    }
}

impl Anchored for FunctionCall {
    fn ancestry(&self) -> &NodeWithAncestry {
        &self.ancestry
    }

    fn matches_structurally(&self, stmt: &Stmt) -> bool {
        top_level_exprs(stmt).iter().any(|e| self.is_same_call(e))
    }

    fn holds(&self, stmt: &Stmt) -> bool {
        self.call.node_id.is_some()
            && top_level_exprs(stmt)
                .iter()
                .any(|e| e.node_id() == self.call.node_id)
    }
}

/// Where a call can stand in a statement list: as a statement of its own,
/// a returned or assigned value, or the call of `go` and `defer`.
fn top_level_exprs(stmt: &Stmt) -> &[Expr] {
    match stmt {
        Stmt::Expr(s) => std::slice::from_ref(&s.x),
        Stmt::Return(r) => r.results.as_slice(),
        Stmt::Assign(a) => a.rhs.as_slice(),
        Stmt::Go(s) => std::slice::from_ref(&s.call),
        Stmt::Defer(s) => std::slice::from_ref(&s.call),
        _ => &[],
    }
}

impl SourceFile {
    /// Every call expression, grouped by enclosing function.
    pub fn function_calls(&self) -> ScopedMatches<FunctionCall> {
        self.collect(|node, link, scope| match node {
            NodeRef::CallExpr(call) => Some(FunctionCall {
                ancestry: Rc::clone(link),
                call: call.clone(),
                scope: scope.clone(),
            }),
            _ => None,
        })
    }

    /// Calls whose callee renders as `name` (`"errors.Wrapf"`). The match is
    /// textual: a call through an import alias does not match.
    pub fn find_function_calls(&self, name: &str) -> ScopedMatches<FunctionCall> {
        let wanted = normalize_string(name);
        self.collect(|node, link, scope| match node {
            NodeRef::CallExpr(call) if normalize_string(&source_code(&call.fun)) == wanted => {
                Some(FunctionCall {
                    ancestry: Rc::clone(link),
                    call: call.clone(),
                    scope: scope.clone(),
                })
            }
            _ => None,
        })
    }

    /// The first call to `name` inside `scope`.
    pub fn find_call_in_scope(&self, scope: &Scope, name: &str) -> Option<FunctionCall> {
        self.find_function_calls(name)
            .swap_remove(scope)?
            .into_iter()
            .next()
    }
}
