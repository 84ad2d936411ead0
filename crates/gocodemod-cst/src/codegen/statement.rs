// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement layout.

use super::expression::ListMode;
use super::{CodegenState, Ws};
use crate::nodes::*;
use crate::visitor::{walk_expr, VisitResult, Visitor};

impl CodegenState<'_> {
    /// Print `list` one statement per line, `nindent` levels deeper.
    pub(crate) fn stmt_list(&mut self, list: &[Stmt], nindent: usize, next_is_rbrace: bool) {
        if nindent > 0 {
            self.ws(Ws::Indent);
        }
        let len = list.len() - list.iter().rev().take_while(|s| is_removal_gap(s)).count();
        let mut line = 0;
        let mut i = 0;
        for s in list {
            if let Stmt::Empty(empty) = s {
                // Statements were removed here; the next gap counts from it.
                if empty.implicit {
                    self.skip_to(empty.semicolon);
                }
                continue;
            }
            // Case clauses (nindent == 0) each start a new section.
            if !self.output_is_empty() {
                let new_section = i == 0 || nindent == 0 || self.lines_from(line) > 0;
                self.linebreak(self.line_with(|l| s.line(l)), 1, Ws::Ignore, new_section);
            }
            self.leading_comments(s.node_id());
            let slot = self.record_line();
            self.stmt(s, next_is_rbrace && i + 1 == len);
            line = self.recorded_line(slot);
            // A label sits on a line of its own above its statement.
            let mut t = s;
            while let Stmt::Labeled(labeled) = t {
                line += 1;
                t = &labeled.stmt;
            }
            self.trailing_comments(s.node_id());
            i += 1;
        }
        if nindent > 0 {
            self.ws(Ws::Unindent);
        }
    }

    pub(crate) fn block(&mut self, b: &BlockStmt, nindent: usize) {
        self.set_pos(b.lbrace);
        self.token("{");
        self.opening_comments(b.node_id);
        self.stmt_list(&b.stmts, nindent, true);
        self.linebreak(self.line_for(b.rbrace), 1, Ws::Ignore, true);
        self.closing_comments(b.node_id);
        self.set_pos(b.rbrace);
        self.token("}");
    }

    fn control_clause(
        &mut self,
        is_for: bool,
        init: Option<&Stmt>,
        expr: Option<&Expr>,
        post: Option<&Stmt>,
    ) {
        self.ws(Ws::Blank);
        let mut needs_blank = false;
        if init.is_none() && post.is_none() {
            if let Some(expr) = expr {
                self.expr(strip_parens(expr));
                needs_blank = true;
            }
        } else {
            if let Some(init) = init {
                self.stmt(init, false);
            }
            self.token(";");
            self.ws(Ws::Blank);
            if let Some(expr) = expr {
                self.expr(strip_parens(expr));
                needs_blank = true;
            }
            if is_for {
                self.token(";");
                self.ws(Ws::Blank);
                needs_blank = false;
                if let Some(post) = post {
                    self.stmt(post, false);
                    needs_blank = true;
                }
            }
        }
        if needs_blank {
            self.ws(Ws::Blank);
        }
    }

    /// Whether a result list deserves its own indentation: more than one
    /// multi-line element, or an element starting below the end of the
    /// previous one.
    fn indent_list(&self, list: &[Expr]) -> bool {
        let (Some(first), Some(last)) = (list.first(), list.last()) else {
            return false;
        };
        if list.len() < 2 {
            return false;
        }
        let b = self.line_for(first.pos());
        let e = self.line_with(|l| last.end_line(l));
        if 0 < b && b < e {
            let mut n = 0;
            let mut line = b;
            for x in list {
                let xb = self.line_for(x.pos());
                let xe = self.line_with(|l| x.end_line(l));
                if line < xb {
                    return true;
                }
                if xb < xe {
                    n += 1;
                }
                line = xe;
            }
            return n > 1;
        }
        false
    }

    pub(crate) fn stmt(&mut self, stmt: &Stmt, next_is_rbrace: bool) {
        self.set_pos(stmt.pos());

        match stmt {
            Stmt::Decl(s) => self.gen_decl(&s.decl),

            Stmt::Empty(_) => {}

            Stmt::Labeled(s) => {
                // The unindent is applied before the preceding line break.
                self.ws(Ws::Unindent);
                self.ident(&s.label);
                self.set_pos(s.colon);
                self.token(":");
                self.ws(Ws::Indent);
                if let Stmt::Empty(empty) = &s.stmt {
                    if !next_is_rbrace {
                        self.ws(Ws::Newline);
                        self.set_pos(empty.semicolon);
                        self.token(";");
                        return;
                    }
                } else {
                    self.linebreak(self.line_with(|l| s.stmt.line(l)), 1, Ws::Ignore, true);
                }
                self.stmt(&s.stmt, next_is_rbrace);
            }

            Stmt::Expr(s) => self.expr0(&s.x, 1),

            Stmt::Send(s) => {
                self.expr0(&s.chan, 1);
                self.ws(Ws::Blank);
                self.set_pos(s.arrow);
                self.token("<-");
                self.ws(Ws::Blank);
                self.expr0(&s.value, 1);
            }

            Stmt::IncDec(s) => {
                self.expr0(&s.x, 2);
                self.set_pos(s.tok_pos);
                self.token(s.tok.as_str());
            }

            Stmt::Assign(s) => {
                let depth = if s.lhs.len() > 1 && s.rhs.len() > 1 { 2 } else { 1 };
                self.expr_list(stmt.pos(), &s.lhs, depth, ListMode::default(), s.tok_pos);
                self.ws(Ws::Blank);
                self.set_pos(s.tok_pos);
                self.token(s.tok.as_str());
                self.ws(Ws::Blank);
                self.expr_list(s.tok_pos, &s.rhs, depth, ListMode::default(), Pos::NONE);
            }

            Stmt::Go(s) => {
                self.token("go");
                self.ws(Ws::Blank);
                self.expr(&s.call);
            }

            Stmt::Defer(s) => {
                self.token("defer");
                self.ws(Ws::Blank);
                self.expr(&s.call);
            }

            Stmt::Return(s) => {
                self.token("return");
                if !s.results.is_empty() {
                    self.ws(Ws::Blank);
                    if self.indent_list(&s.results) {
                        self.ws(Ws::Indent);
                        // No line break before the first result.
                        self.expr_list(Pos::NONE, &s.results, 1, ListMode::NO_INDENT, Pos::NONE);
                        self.ws(Ws::Unindent);
                    } else {
                        self.expr_list(Pos::NONE, &s.results, 1, ListMode::default(), Pos::NONE);
                    }
                }
            }

            Stmt::Branch(s) => {
                self.token(s.tok.as_str());
                if let Some(label) = &s.label {
                    self.ws(Ws::Blank);
                    self.ident(label);
                }
            }

            Stmt::Block(s) => self.block(s, 1),

            Stmt::If(s) => {
                self.token("if");
                self.control_clause(false, s.init.as_ref(), Some(&s.cond), None);
                self.block(&s.body, 1);
                if let Some(else_) = &s.else_ {
                    self.ws(Ws::Blank);
                    self.token("else");
                    self.ws(Ws::Blank);
                    match else_ {
                        Stmt::Block(_) | Stmt::If(_) => self.stmt(else_, next_is_rbrace),
                        other => {
                            // Only reachable for hand-built trees; keep the
                            // output parseable.
                            self.token("{");
                            self.ws(Ws::Indent);
                            self.ws(Ws::Formfeed);
                            self.stmt(other, true);
                            self.ws(Ws::Unindent);
                            self.ws(Ws::Formfeed);
                            self.token("}");
                        }
                    }
                }
            }

            Stmt::CaseClause(s) => {
                if s.list.is_empty() {
                    self.token("default");
                } else {
                    self.token("case");
                    self.ws(Ws::Blank);
                    self.expr_list(s.case_pos, &s.list, 1, ListMode::default(), s.colon);
                }
                self.set_pos(s.colon);
                self.token(":");
                self.opening_comments(s.node_id);
                self.stmt_list(&s.body, 1, next_is_rbrace);
            }

            Stmt::Switch(s) => {
                self.token("switch");
                self.control_clause(false, s.init.as_ref(), s.tag.as_ref(), None);
                self.block(&s.body, 0);
            }

            Stmt::TypeSwitch(s) => {
                self.token("switch");
                if let Some(init) = &s.init {
                    self.ws(Ws::Blank);
                    self.stmt(init, false);
                    self.token(";");
                }
                self.ws(Ws::Blank);
                self.stmt(&s.assign, false);
                self.ws(Ws::Blank);
                self.block(&s.body, 0);
            }

            Stmt::CommClause(s) => {
                match &s.comm {
                    Some(comm) => {
                        self.token("case");
                        self.ws(Ws::Blank);
                        self.stmt(comm, false);
                    }
                    None => self.token("default"),
                }
                self.set_pos(s.colon);
                self.token(":");
                self.opening_comments(s.node_id);
                self.stmt_list(&s.body, 1, next_is_rbrace);
            }

            Stmt::Select(s) => {
                self.token("select");
                self.ws(Ws::Blank);
                let body = &s.body;
                if body.stmts.is_empty() && !self.has_comments(body.node_id) {
                    self.set_pos(body.lbrace);
                    self.token("{");
                    self.set_pos(body.rbrace);
                    self.token("}");
                } else {
                    self.block(body, 0);
                }
            }

            Stmt::For(s) => {
                self.token("for");
                self.control_clause(true, s.init.as_ref(), s.cond.as_ref(), s.post.as_ref());
                self.block(&s.body, 1);
            }

            Stmt::Range(s) => {
                self.token("for");
                self.ws(Ws::Blank);
                if let Some(key) = &s.key {
                    self.expr(key);
                    if let Some(value) = &s.value {
                        self.set_pos(value.pos());
                        self.token(",");
                        self.ws(Ws::Blank);
                        self.expr(value);
                    }
                    self.ws(Ws::Blank);
                    self.set_pos(s.tok_pos);
                    self.token(s.tok.unwrap_or(AssignOp::Define).as_str());
                    self.ws(Ws::Blank);
                }
                self.token("range");
                self.ws(Ws::Blank);
                self.expr(strip_parens(&s.x));
                self.ws(Ws::Blank);
                self.block(&s.body, 1);
            }
        }
    }
}

/// Finds a composite literal with a type name that is not already
/// protected by parentheses; `if x == (T{}) {` needs its parentheses.
#[derive(Default)]
struct TypedLiteralFinder {
    found: bool,
}

impl Visitor for TypedLiteralFinder {
    fn enter_node(&mut self, node: NodeRef<'_>) -> VisitResult {
        match node {
            NodeRef::ParenExpr(_) => VisitResult::SkipChildren,
            NodeRef::CompositeLit(lit) => {
                if lit.ty.as_ref().is_some_and(is_type_name) {
                    self.found = true;
                    return VisitResult::Stop;
                }
                VisitResult::SkipChildren
            }
            _ => VisitResult::Continue,
        }
    }
}

/// Drop redundant parentheses around a control clause expression.
fn strip_parens(x: &Expr) -> &Expr {
    let Expr::Paren(paren) = x else {
        return x;
    };
    let mut finder = TypedLiteralFinder::default();
    walk_expr(&mut finder, &paren.x);
    if finder.found {
        return x;
    }
    strip_parens(&paren.x)
}

/// An implicit empty statement in a list marks where statements were removed.
fn is_removal_gap(s: &Stmt) -> bool {
    matches!(s, Stmt::Empty(empty) if empty.implicit)
}

fn is_type_name(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) => true,
        Expr::Selector(sel) => is_type_name(&sel.x),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::nodes::{Decl, EmptyStmt, Pos, Stmt};
    use crate::{parse_file, print_file};

    fn format(source: &str) -> String {
        print_file(&parse_file(source).unwrap())
    }

    fn assert_stable(source: &str) {
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_control_clauses() {
        assert_stable(
            "package p\n\nfunc f() {\n\tif x := g(); x > 0 {\n\t\treturn\n\t} else if y {\n\t\th()\n\t} else {\n\t\ti()\n\t}\n\tfor i := 0; i < 10; i++ {\n\t}\n\tfor {\n\t\tbreak\n\t}\n\tfor k, v := range m {\n\t\t_, _ = k, v\n\t}\n}\n",
        );
    }

    #[test]
    fn test_redundant_parens_are_stripped() {
        assert_eq!(
            format("package p\n\nfunc f() {\n\tif (x) {\n\t}\n\tfor (y) {\n\t}\n}\n"),
            "package p\n\nfunc f() {\n\tif x {\n\t}\n\tfor y {\n\t}\n}\n"
        );
        assert_stable("package p\n\nfunc f() {\n\tif x == (T{}) {\n\t}\n}\n");
    }

    #[test]
    fn test_switch_and_select() {
        assert_stable(
            "package p\n\nfunc f() {\n\tswitch x {\n\tcase 1, 2:\n\t\tg()\n\tdefault:\n\t}\n\tswitch v := x.(type) {\n\tcase int:\n\t\t_ = v\n\t}\n\tselect {\n\tcase v := <-ch:\n\t\t_ = v\n\tcase ch <- 1:\n\t}\n\tselect {}\n}\n",
        );
    }

    #[test]
    fn test_labels_are_outdented() {
        assert_stable("package p\n\nfunc f() {\nouter:\n\tfor {\n\t\tbreak outer\n\t}\n}\n");
    }

    #[test]
    fn test_statement_comments() {
        assert_stable(
            "package p\n\nfunc f() {\n\t// leading\n\tg() // trailing\n\n\t// after a blank line\n\th()\n\t// dangling\n}\n",
        );
    }

    #[test]
    fn test_case_clause_comments() {
        assert_stable(
            "package p\n\nfunc f() {\n\tswitch x {\n\t// first case\n\tcase 1: // one\n\t\tg()\n\t}\n}\n",
        );
    }

    #[test]
    fn test_defer_go_and_send() {
        assert_stable("package p\n\nfunc f() {\n\tdefer g()\n\tgo h()\n\tch <- 1\n\tx++\n}\n");
    }

    #[test]
    fn test_removal_gap_sets_following_spacing() {
        let source = "package p\n\nfunc f() {\n\ta()\n\tb()\n\tc()\n}\n";
        let mut parsed = parse_file(source).unwrap();
        let lines = parsed.lines.clone();
        let Decl::Func(func) = &mut parsed.file.decls[0] else {
            panic!("expected a function");
        };
        let stmts = &mut func.body.as_mut().unwrap().stmts;
        let gap = |line: u32| {
            Stmt::Empty(EmptyStmt {
                node_id: None,
                semicolon: Pos::from_offset(lines.line_start(line).unwrap()),
                implicit: true,
            })
        };
        // `{` is on line 3, `}` on line 7.
        *stmts = vec![gap(4), stmts[1].clone(), gap(6)];
        assert_eq!(
            print_file(&parsed),
            "package p\n\nfunc f() {\n\tb()\n}\n"
        );
    }
}
