//! Statement-level mutation primitives.
//!
//! Every statement-level edit starts from a located node's ancestry, finds
//! the nearest enclosing statement list (a block, case clause or select
//! clause) and rebuilds that list. A node outside any function body has no
//! such list, and the edit does nothing.
//!
//! Which statements of the list are affected depends on the file's
//! [`MatchMode`]: the one holding the matched node, or every statement
//! structurally equal to it.
//!
//! The printer spaces statements by their source lines, so a removed run of
//! statements leaves an implicit empty statement behind that tells it where
//! the run ended. The statements around the gap keep the blank lines they
//! had, and none appear right after the opening of the list.

use tracing::{debug, warn};

use gocodemod_core::LineIndex;
use gocodemod_cst::visitor::{clear_positions, Walk};
use gocodemod_cst::{
    BlockStmt, CaseClause, CommClause, CommentTable, EmptyStmt, Expr, NodeId, NodeKind, Pos, Stmt,
};

use crate::ancestry::NodeWithAncestry;
use crate::source_file::{MatchMode, SourceFile};

/// A change to the statement list around a located node.
#[derive(Debug, Clone)]
pub(crate) enum Splice {
    Remove,
    InsertBefore(Stmt),
    InsertAfter(Stmt),
    Replace(Stmt),
}

/// A query match that statement-level edits can be anchored on.
pub(crate) trait Anchored {
    fn ancestry(&self) -> &NodeWithAncestry;

    /// Whether `stmt` is, or directly holds, the captured node, ignoring
    /// positions and ids.
    fn matches_structurally(&self, stmt: &Stmt) -> bool;

    /// Whether `stmt` is, or directly holds, the captured node itself. A node
    /// nested deeper inside a statement does not make that statement a
    /// target.
    fn holds(&self, stmt: &Stmt) -> bool {
        let id = self.ancestry().node_id();
        id.is_some() && stmt.node_id() == id
    }
}

/// Equality that ignores positions and ids.
pub(crate) fn structurally_equal<T: Walk + Clone + PartialEq>(a: &T, b: &T) -> bool {
    let mut a = a.clone();
    let mut b = b.clone();
    clear_positions(&mut a);
    clear_positions(&mut b);
    a == b
}

pub(crate) fn exprs_equal(a: &[Expr], b: &[Expr]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| structurally_equal(x, y))
}

impl SourceFile {
    /// Apply `splice` around `target`. Returns the number of statements the
    /// edit matched.
    pub(crate) fn splice(&mut self, target: &impl Anchored, splice: Splice) -> usize {
        let Some((container, anchor)) = target.ancestry().statement_anchor() else {
            debug!(
                kind = %target.ancestry().kind(),
                "no enclosing statement list; edit skipped"
            );
            return 0;
        };
        let Some(container_id) = container.node_id() else {
            return 0;
        };
        let anchor_id = anchor.node_id();
        let mode = self.match_mode();
        let is_target = |stmt: &Stmt| match mode {
            MatchMode::Identity => {
                anchor_id.is_some() && stmt.node_id() == anchor_id && target.holds(stmt)
            }
            MatchMode::Structural => target.matches_structurally(stmt),
        };

        let affected = self
            .edit_statement_list(container_id, container.kind(), |stmts, layout| {
                rebuild(stmts, layout, is_target, splice)
            })
            .unwrap_or(0);
        if affected == 0 {
            debug!(
                kind = %target.ancestry().kind(),
                "target is not a statement of its own; edit skipped"
            );
        } else if affected > 1 {
            warn!(count = affected, "edit matched several identical statements");
        }
        affected
    }

    /// Apply `f` to the statements of the list container `id`.
    pub(crate) fn edit_statement_list<F, U>(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        f: F,
    ) -> Option<U>
    where
        F: FnOnce(&mut Vec<Stmt>, &Layout<'_>) -> U,
    {
        match kind {
            NodeKind::BlockStmt => {
                self.edit_with_layout(id, |block: &mut BlockStmt, l| f(&mut block.stmts, l))
            }
            NodeKind::CaseClause => {
                self.edit_with_layout(id, |clause: &mut CaseClause, l| f(&mut clause.body, l))
            }
            NodeKind::CommClause => {
                self.edit_with_layout(id, |clause: &mut CommClause, l| f(&mut clause.body, l))
            }
            _ => None,
        }
    }
}

/// Source lines and comments of the file being edited.
pub(crate) struct Layout<'a> {
    lines: &'a LineIndex,
    comments: &'a CommentTable,
}

impl<'a> Layout<'a> {
    pub(crate) fn new(lines: &'a LineIndex, comments: &'a CommentTable) -> Self {
        Layout { lines, comments }
    }

    /// First source line of `stmt`, counting its leading comments.
    fn first_line(&self, stmt: &Stmt) -> Option<u32> {
        let line = stmt.line(self.lines)?;
        let comment = self
            .comments
            .leading(stmt.node_id())
            .first()
            .and_then(|c| c.line(self.lines));
        Some(comment.map_or(line, |c| c.min(line)))
    }

    fn last_line(&self, stmt: &Stmt) -> Option<u32> {
        stmt.end_line(self.lines)
    }

    /// The marker left for a removed run spanning lines `first..=last`,
    /// between the statement kept before it and the one kept after it.
    fn gap_marker(
        &self,
        before: Option<&Stmt>,
        (first, last): (u32, u32),
        after: Option<&Stmt>,
    ) -> Option<Stmt> {
        let before = before.and_then(|s| self.last_line(s));
        let after = after.and_then(|s| self.first_line(s));
        let line = match (before, after) {
            (Some(before), Some(after)) => {
                let gap = first.saturating_sub(before).max(after.saturating_sub(last));
                after.saturating_sub(gap)
            }
            (None, Some(after)) => after.saturating_sub(1),
            (_, None) => last,
        };
        let offset = self.lines.line_start(line)?;
        Some(Stmt::Empty(EmptyStmt {
            node_id: None,
            semicolon: Pos::from_offset(offset),
            implicit: true,
        }))
    }
}

fn rebuild(
    stmts: &mut Vec<Stmt>,
    layout: &Layout<'_>,
    is_target: impl Fn(&Stmt) -> bool,
    splice: Splice,
) -> usize {
    let old = std::mem::take(stmts);
    let mut affected = 0;
    // Lines of the statements removed since the last one kept.
    let mut removed: Option<(u32, u32)> = None;
    for stmt in old {
        if !is_target(&stmt) {
            if let Some(run) = removed.take() {
                let marker = layout.gap_marker(last_kept(stmts), run, Some(&stmt));
                stmts.extend(marker);
            }
            stmts.push(stmt);
            continue;
        }
        affected += 1;
        match &splice {
            Splice::Remove => {
                let lines = layout.first_line(&stmt).zip(layout.last_line(&stmt));
                if let Some((first, last)) = lines {
                    removed = Some(removed.map_or((first, last), |(start, _)| (start, last)));
                }
            }
            Splice::InsertBefore(new) => {
                stmts.push(new.clone());
                stmts.push(stmt);
            }
            Splice::InsertAfter(new) => {
                stmts.push(stmt);
                stmts.push(new.clone());
            }
            Splice::Replace(new) => stmts.push(new.clone()),
        }
    }
    if let Some(run) = removed {
        let marker = layout.gap_marker(last_kept(stmts), run, None);
        stmts.extend(marker);
    }
    affected
}

fn last_kept(stmts: &[Stmt]) -> Option<&Stmt> {
    stmts.iter().rev().find(|s| !matches!(s, Stmt::Empty(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{parse_expr, parse_stmt};

    fn rebuild(
        stmts: &mut Vec<Stmt>,
        is_target: impl Fn(&Stmt) -> bool,
        splice: Splice,
    ) -> usize {
        let lines = LineIndex::new("");
        let comments = CommentTable::new();
        super::rebuild(stmts, &Layout::new(&lines, &comments), is_target, splice)
    }

    fn stmts(texts: &[&str]) -> Vec<Stmt> {
        texts.iter().map(|t| parse_stmt(t).unwrap()).collect()
    }

    fn rendered(stmts: &[Stmt]) -> Vec<String> {
        stmts.iter().map(gocodemod_cst::source_code).collect()
    }

    #[test]
    fn test_rebuild_preserves_order() {
        let mut list = stmts(&["a()", "b()", "c()"]);
        let b = list[1].clone();
        let new = parse_stmt("x()").unwrap();

        let n = rebuild(&mut list, |s| *s == b, Splice::InsertBefore(new.clone()));
        assert_eq!(n, 1);
        assert_eq!(rendered(&list), ["a()", "x()", "b()", "c()"]);

        let n = rebuild(&mut list, |s| *s == b, Splice::InsertAfter(new));
        assert_eq!(n, 1);
        assert_eq!(rendered(&list), ["a()", "x()", "b()", "x()", "c()"]);
    }

    #[test]
    fn test_rebuild_remove_and_replace() {
        let mut list = stmts(&["a()", "b()", "a()"]);
        let a = list[0].clone();
        let n = rebuild(&mut list, |s| *s == a, Splice::Replace(parse_stmt("z()").unwrap()));
        assert_eq!(n, 2);
        assert_eq!(rendered(&list), ["z()", "b()", "z()"]);

        let n = rebuild(&mut list, |_| false, Splice::Remove);
        assert_eq!(n, 0);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_structural_equality_ignores_positions() {
        let parsed = gocodemod_cst::parse_file("package p\n\nvar x = f(a,   b)\n").unwrap();
        let decl = parsed.file.decls[0].as_gen().unwrap();
        let gocodemod_cst::Spec::Value(spec) = &decl.specs[0] else {
            panic!("expected a value spec");
        };
        let located = &spec.values[0];
        assert!(structurally_equal(located, &parse_expr("f(a, b)").unwrap()));
        assert!(!structurally_equal(located, &parse_expr("f(b, a)").unwrap()));
        assert!(exprs_equal(
            std::slice::from_ref(located),
            &[parse_expr("f(a,b)").unwrap()]
        ));
    }

    const SPACED: &str = "package main\n\nfunc main() {\n\ta()\n\tb()\n\n\tc()\n\td()\n}\n";

    fn remove_call(source: &str, name: &str) -> String {
        let mut file = SourceFile::new(source).unwrap();
        let call = file
            .find_function_calls(name)
            .into_values()
            .flatten()
            .next()
            .unwrap();
        assert_eq!(call.remove(&mut file), 1);
        file.print()
    }

    #[test]
    fn test_removing_first_statement_leaves_no_blank_after_brace() {
        assert_eq!(
            remove_call(SPACED, "a"),
            "package main\n\nfunc main() {\n\tb()\n\n\tc()\n\td()\n}\n"
        );
    }

    #[test]
    fn test_removing_last_statement_leaves_no_blank_before_brace() {
        assert_eq!(
            remove_call(SPACED, "d"),
            "package main\n\nfunc main() {\n\ta()\n\tb()\n\n\tc()\n}\n"
        );
    }

    #[test]
    fn test_removal_keeps_paragraph_breaks() {
        assert_eq!(
            remove_call(SPACED, "b"),
            "package main\n\nfunc main() {\n\ta()\n\n\tc()\n\td()\n}\n"
        );
        assert_eq!(
            remove_call(SPACED, "c"),
            "package main\n\nfunc main() {\n\ta()\n\tb()\n\n\td()\n}\n"
        );
    }

    #[test]
    fn test_removal_before_commented_statement() {
        let source = "package main\n\nfunc main() {\n\ta()\n\t// b runs last\n\tb()\n}\n";
        assert_eq!(
            remove_call(source, "a"),
            "package main\n\nfunc main() {\n\t// b runs last\n\tb()\n}\n"
        );
    }

    #[test]
    fn test_removal_in_case_clause() {
        let source = "package main\n\nfunc main() {\n\tswitch x {\n\tcase 1:\n\t\ta()\n\t\tb()\n\tcase 2:\n\t}\n}\n";
        assert_eq!(
            remove_call(source, "b"),
            "package main\n\nfunc main() {\n\tswitch x {\n\tcase 1:\n\t\ta()\n\tcase 2:\n\t}\n}\n"
        );
    }

    #[test]
    fn test_removing_every_statement() {
        let source = "package main\n\nfunc main() {\n\tdone()\n\tdone()\n}\n";
        let mut file = SourceFile::new(source).unwrap();
        file.set_match_mode(MatchMode::Structural);
        let call = file
            .find_function_calls("done")
            .into_values()
            .flatten()
            .next()
            .unwrap();
        assert_eq!(call.remove(&mut file), 2);
        assert_eq!(file.print(), "package main\n\nfunc main() {\n}\n");
    }
}
