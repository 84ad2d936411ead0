//! Assignment, if and switch statement queries and edits.

use std::rc::Rc;

use tracing::debug;

use gocodemod_core::normalize_string;
use gocodemod_cst::{
    source_code, AssignStmt, BlockStmt, Expr, IfStmt, NodeRef, Stmt, SwitchStmt, UnaryOp,
};

use crate::ancestry::{NodeWithAncestry, Scope};
use crate::literals::StructLiteral;
use crate::source_file::{ScopedMatches, SourceFile};
use crate::splice::{exprs_equal, structurally_equal, Anchored, Splice};

/// Statement-level edits shared by every statement handle.
macro_rules! statement_edits {
    ($handle:ty) => {
        impl $handle {
            pub fn insert_before(&self, file: &mut SourceFile, stmt: Stmt) -> usize {
                file.splice(self, Splice::InsertBefore(stmt))
            }

            pub fn insert_after(&self, file: &mut SourceFile, stmt: Stmt) -> usize {
                file.splice(self, Splice::InsertAfter(stmt))
            }

            pub fn remove(self, file: &mut SourceFile) -> usize {
                file.splice(&self, Splice::Remove)
            }

            /// Put `stmt` in place of this statement.
            pub fn replace(self, file: &mut SourceFile, stmt: Stmt) -> usize {
                file.splice(&self, Splice::Replace(stmt))
            }

            pub fn scope(&self) -> &Scope {
                &self.scope
            }

            pub fn ancestry(&self) -> &NodeWithAncestry {
                &self.ancestry
            }
        }
    };
}

// ============================================================================
// Assignment
// ============================================================================

/// An assignment or short variable declaration that is a statement of its
/// own in a block. Assignments in `if`, `for` and `switch` headers are not
/// matched.
#[derive(Debug, Clone)]
pub struct Assignment {
    ancestry: Rc<NodeWithAncestry>,
    stmt: AssignStmt,
    scope: Scope,
}

statement_edits!(Assignment);

impl Assignment {
    pub fn node(&self) -> &AssignStmt {
        &self.stmt
    }

    pub fn lhs(&self) -> &[Expr] {
        &self.stmt.lhs
    }

    pub fn rhs(&self) -> &[Expr] {
        &self.stmt.rhs
    }

    /// The statement rendered as source.
    pub fn source_code(&self) -> String {
        render_assignment(&self.stmt)
    }

    /// The first assigned value as a keyed literal, for `x := T{...}` and
    /// `x := &T{...}`.
    pub fn struct_literal(&self) -> Option<StructLiteral> {
        let value = match self.stmt.rhs.first()?.unparen() {
            Expr::Unary(unary) if unary.op == UnaryOp::Addr => unary.x.unparen(),
            other => other,
        };
        value.as_composite_lit().cloned().map(StructLiteral::new)
    }

    pub fn edit<F, U>(&mut self, file: &mut SourceFile, f: F) -> Option<U>
    where
        F: FnOnce(&mut AssignStmt) -> U,
    {
        file.edit_captured(&mut self.stmt, f)
    }

    fn targets(&self, target: &str) -> bool {
        let wanted = normalize_string(target);
        if normalize_string(&self.source_code()) == wanted {
            return true;
        }
        self.stmt.lhs.iter().any(|lhs| match lhs {
            Expr::Ident(ident) => ident.name == target,
            Expr::Selector(_) => normalize_string(&source_code(lhs)) == wanted,
            Expr::Index(index) => {
                normalize_string(&source_code(&index.x)) == wanted
                    || normalize_string(&source_code(lhs)) == wanted
            }
            _ => false,
        })
    }
}

impl Anchored for Assignment {
    fn ancestry(&self) -> &NodeWithAncestry {
        &self.ancestry
    }

    fn matches_structurally(&self, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::Assign(assign) => {
                exprs_equal(&assign.lhs, &self.stmt.lhs) && exprs_equal(&assign.rhs, &self.stmt.rhs)
            }
            _ => false,
        }
    }
}

fn render_assignment(stmt: &AssignStmt) -> String {
    source_code(&Stmt::Assign(Box::new(stmt.clone())))
}

// ============================================================================
// IfStatement
// ============================================================================

/// An `if` statement, including `else if` chains.
#[derive(Debug, Clone)]
pub struct IfStatement {
    ancestry: Rc<NodeWithAncestry>,
    stmt: IfStmt,
    scope: Scope,
}

statement_edits!(IfStatement);

impl IfStatement {
    pub fn node(&self) -> &IfStmt {
        &self.stmt
    }

    pub fn cond(&self) -> &Expr {
        &self.stmt.cond
    }

    pub fn body(&self) -> &BlockStmt {
        &self.stmt.body
    }

    pub fn edit<F, U>(&mut self, file: &mut SourceFile, f: F) -> Option<U>
    where
        F: FnOnce(&mut IfStmt) -> U,
    {
        file.edit_captured(&mut self.stmt, f)
    }

    /// Keep only the statements of the `if` body, dropping the condition.
    ///
    /// The body replaces the whole enclosing statement list, so statements
    /// around the `if` are dropped as well. Does nothing when the statement
    /// is outside a function body.
    pub fn remove_condition(self, file: &mut SourceFile) -> bool {
        let Some((container, _)) = self.ancestry.statement_anchor() else {
            debug!("if statement outside a function body; condition kept");
            return false;
        };
        let Some(container_id) = container.node_id() else {
            return false;
        };
        let body = self.stmt.body.stmts;
        file.edit_statement_list(container_id, container.kind(), |stmts, _| *stmts = body)
            .is_some()
    }
}

impl Anchored for IfStatement {
    fn ancestry(&self) -> &NodeWithAncestry {
        &self.ancestry
    }

    fn matches_structurally(&self, stmt: &Stmt) -> bool {
        matches!(stmt, Stmt::If(s) if structurally_equal(s.as_ref(), &self.stmt))
    }
}

// ============================================================================
// SwitchStatement
// ============================================================================

/// An expression `switch` statement. Type switches are not matched.
#[derive(Debug, Clone)]
pub struct SwitchStatement {
    ancestry: Rc<NodeWithAncestry>,
    stmt: SwitchStmt,
    scope: Scope,
}

statement_edits!(SwitchStatement);

impl SwitchStatement {
    pub fn node(&self) -> &SwitchStmt {
        &self.stmt
    }

    pub fn tag(&self) -> Option<&Expr> {
        self.stmt.tag.as_ref()
    }

    pub fn edit<F, U>(&mut self, file: &mut SourceFile, f: F) -> Option<U>
    where
        F: FnOnce(&mut SwitchStmt) -> U,
    {
        file.edit_captured(&mut self.stmt, f)
    }
}

impl Anchored for SwitchStatement {
    fn ancestry(&self) -> &NodeWithAncestry {
        &self.ancestry
    }

    fn matches_structurally(&self, stmt: &Stmt) -> bool {
        matches!(stmt, Stmt::Switch(s) if structurally_equal(s.as_ref(), &self.stmt))
    }
}

// ============================================================================
// Queries
// ============================================================================

impl SourceFile {
    pub fn assignments(&self) -> ScopedMatches<Assignment> {
        self.collect(|node, link, scope| match node {
            NodeRef::AssignStmt(stmt)
                if link.parent().is_some_and(|p| p.kind().is_statement_list()) =>
            {
                Some(Assignment {
                    ancestry: Rc::clone(link),
                    stmt: stmt.clone(),
                    scope: scope.clone(),
                })
            }
            _ => None,
        })
    }

    /// Assignments to `target`.
    ///
    /// `target` matches the whole statement's text, an assigned identifier,
    /// an assigned selector such as `cfg.Port`, or an indexed assignment by
    /// either the indexed value (`m`) or the full index expression
    /// (`m["key"]`). Whitespace is ignored everywhere except for identifiers.
    pub fn find_assignments(&self, target: &str) -> ScopedMatches<Assignment> {
        let mut found = ScopedMatches::new();
        for (scope, assignments) in self.assignments() {
            let matching: Vec<Assignment> =
                assignments.into_iter().filter(|a| a.targets(target)).collect();
            if !matching.is_empty() {
                found.insert(scope, matching);
            }
        }
        found
    }

    pub fn if_statements(&self) -> ScopedMatches<IfStatement> {
        self.collect(|node, link, scope| match node {
            NodeRef::IfStmt(stmt) => Some(IfStatement {
                ancestry: Rc::clone(link),
                stmt: stmt.clone(),
                scope: scope.clone(),
            }),
            _ => None,
        })
    }

    pub fn switch_statements(&self) -> ScopedMatches<SwitchStatement> {
        self.collect(|node, link, scope| match node {
            NodeRef::SwitchStmt(stmt) => Some(SwitchStatement {
                ancestry: Rc::clone(link),
                stmt: stmt.clone(),
                scope: scope.clone(),
            }),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::parse_stmt;
    use crate::source_file::MatchMode;

    const SOURCE: &str = r#"package main

func main() {
	cfg := &Config{Port: 80}
	cfg.Port = 8080
	counts["a"] = 1
	if cfg.Port > 0 {
		start(cfg)
	}
	switch cfg.Port {
	case 80:
		x := 1
		println(x)
	}
}
"#;

    fn file() -> SourceFile {
        SourceFile::new(SOURCE).unwrap()
    }

    fn all<T>(matches: ScopedMatches<T>) -> Vec<T> {
        matches.into_values().flatten().collect()
    }

    #[test]
    fn test_assignments_in_statement_lists_only() {
        let file = SourceFile::new(
            "package main\n\nfunc main() {\n\tx := 1\n\tif y := x; y > 0 {\n\t\tx = y\n\t}\n}\n",
        )
        .unwrap();
        let found = all(file.assignments());
        let rendered: Vec<String> = found.iter().map(Assignment::source_code).collect();
        assert_eq!(rendered, ["x := 1", "x = y"]);
        assert!(found.iter().all(|a| a.scope().function_name() == Some("main")));
    }

    #[test]
    fn test_find_assignments_by_target() {
        let file = file();
        assert_eq!(all(file.find_assignments("cfg")).len(), 1);
        assert_eq!(all(file.find_assignments("cfg.Port")).len(), 1);
        assert_eq!(all(file.find_assignments("counts")).len(), 1);
        assert_eq!(all(file.find_assignments("counts[\"a\"]")).len(), 1);
        assert_eq!(all(file.find_assignments("cfg.Port = 8080")).len(), 1);
        assert_eq!(all(file.find_assignments("x")).len(), 1);
        assert!(file.find_assignments("missing").is_empty());
    }

    #[test]
    fn test_struct_literal_of_assignment() {
        let file = file();
        let cfg = all(file.find_assignments("cfg")).remove(0);
        let lit = cfg.struct_literal().unwrap();
        assert_eq!(lit.type_name().as_deref(), Some("Config"));
        assert_eq!(source_code(lit.field("Port")), "80");

        let port = all(file.find_assignments("cfg.Port")).remove(0);
        assert!(port.struct_literal().is_none());
    }

    #[test]
    fn test_assignment_insert_and_remove() {
        let mut file = file();
        let port = all(file.find_assignments("cfg.Port")).remove(0);
        assert_eq!(port.insert_before(&mut file, parse_stmt("log()").unwrap()), 1);
        assert_eq!(port.insert_after(&mut file, parse_stmt("flush()").unwrap()), 1);
        assert_eq!(port.remove(&mut file), 1);

        let printed = normalize_string(&file.print());
        assert!(printed.contains(&normalize_string(
            "cfg := &Config{Port: 80}\nlog()\nflush()\ncounts[\"a\"] = 1"
        )));
    }

    #[test]
    fn test_assignment_replace() {
        let mut file = file();
        let counts = all(file.find_assignments("counts")).remove(0);
        let n = counts.replace(&mut file, parse_stmt("delete(counts, \"a\")").unwrap());
        assert_eq!(n, 1);
        assert!(file.print().contains("\tdelete(counts, \"a\")\n"));
    }

    #[test]
    fn test_structural_assignment_remove() {
        let source = "package main\n\nfunc main() {\n\tx = 1\n\ty = 2\n\tx = 1\n}\n";
        let mut file = SourceFile::new(source).unwrap();
        file.set_match_mode(MatchMode::Structural);
        let first = all(file.find_assignments("x")).remove(0);
        assert_eq!(first.remove(&mut file), 2);
        assert_eq!(
            normalize_string(&file.print()),
            normalize_string("package main\n\nfunc main() {\n\ty = 2\n}\n")
        );
    }

    #[test]
    fn test_if_statement_edits() {
        let mut file = file();
        let found = all(file.if_statements());
        assert_eq!(found.len(), 1);
        assert_eq!(source_code(found[0].cond()), "cfg.Port > 0");
        assert_eq!(found[0].body().stmts.len(), 1);

        let stmt = found.into_iter().next().unwrap();
        stmt.insert_before(&mut file, parse_stmt("before()").unwrap());
        stmt.insert_after(&mut file, parse_stmt("after()").unwrap());
        let printed = normalize_string(&file.print());
        assert!(printed.contains("before()ifcfg.Port>0{"));
        assert!(printed.contains("}after()switch"));

        stmt.remove(&mut file);
        assert!(!file.print().contains("if cfg.Port"));
    }

    #[test]
    fn test_if_statement_edit_condition() {
        let mut file = file();
        let mut stmt = all(file.if_statements()).remove(0);
        let cond = crate::fragment::parse_expr("cfg != nil").unwrap();
        stmt.edit(&mut file, |s| s.cond = cond).unwrap();
        assert_eq!(source_code(stmt.cond()), "cfg != nil");
        assert!(file.print().contains("\tif cfg != nil {\n"));
    }

    #[test]
    fn test_remove_condition_replaces_enclosing_list() {
        let source = "package main\n\nfunc main() {\n\tif ok {\n\t\trun()\n\t}\n}\n";
        let mut file = SourceFile::new(source).unwrap();
        let stmt = all(file.if_statements()).remove(0);
        assert!(stmt.remove_condition(&mut file));
        assert_eq!(
            normalize_string(&file.print()),
            normalize_string("package main\n\nfunc main() {\n\trun()\n}\n")
        );
    }

    #[test]
    fn test_else_if_is_not_spliced() {
        let source =
            "package main\n\nfunc main() {\n\tif a {\n\t\tf()\n\t} else if b {\n\t\tg()\n\t}\n}\n";
        let mut file = SourceFile::new(source).unwrap();
        let else_if = all(file.if_statements()).remove(1);
        assert_eq!(source_code(else_if.cond()), "b");
        assert_eq!(else_if.remove(&mut file), 0);
        assert_eq!(file.print(), source);
    }

    #[test]
    fn test_switch_statements() {
        let mut file = file();
        let found = all(file.switch_statements());
        assert_eq!(found.len(), 1);
        assert_eq!(source_code(found[0].tag().unwrap()), "cfg.Port");
        assert_eq!(all(file.find_assignments("x")).len(), 1);

        let switch = found.into_iter().next().unwrap();
        assert_eq!(switch.insert_after(&mut file, parse_stmt("done()").unwrap()), 1);
        assert!(normalize_string(&file.print()).ends_with("}done()}"));
        assert_eq!(switch.remove(&mut file), 1);
        assert!(!file.print().contains("switch"));
    }
}
