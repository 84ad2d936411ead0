// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration layout: specs, declaration groups, functions and the file.

use super::expression::{ListMode, ParamMode};
use super::{CodegenState, SizeNode, Ws, INFINITY};
use crate::nodes::*;

/// Bodies at most this wide (header included) are printed on one line.
const MAX_ONE_LINE_BODY: usize = 100;

impl CodegenState<'_> {
    pub(crate) fn file(&mut self, file: &File) {
        self.leading_comments(file.node_id);
        self.set_pos(file.package_pos);
        self.token("package");
        self.ws(Ws::Blank);
        self.ident(&file.name);
        self.trailing_comments(file.node_id);
        self.decl_list(&file.decls);
        self.closing_comments(file.node_id);
        self.ws(Ws::Newline);
    }

    fn decl_list(&mut self, decls: &[Decl]) {
        let mut prev = None;
        for d in decls {
            let tok = decl_keyword(d);
            // Output may hold only a fragment; nothing to separate from then.
            if !self.output_is_empty() {
                let min = if prev != Some(tok) || self.has_leading_comments(d.node_id()) {
                    2
                } else {
                    1
                };
                let new_section = tok.is_none() && self.num_lines(d) > 1;
                self.linebreak(self.line_for(d.pos()), min, Ws::Ignore, new_section);
            }
            self.decl(d);
            prev = Some(tok);
        }
    }

    pub(crate) fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Gen(d) => self.gen_decl(d),
            Decl::Func(d) => self.func_decl(d),
        }
    }

    fn has_leading_comments(&self, id: Option<NodeId>) -> bool {
        self.comments
            .is_some_and(|table| !table.leading(id).is_empty())
    }

    fn num_lines(&self, d: &Decl) -> usize {
        let from = self.line_for(d.pos());
        let to = self.line_with(|l| d.end_line(l));
        if from == 0 || to == 0 {
            return INFINITY;
        }
        (to.saturating_sub(from) + 1) as usize
    }

    // Generic declarations
    // ------------------------------------------------------------------------

    pub(crate) fn gen_decl(&mut self, d: &GenDecl) {
        self.leading_comments(d.node_id);
        self.set_pos(d.tok_pos);
        self.token(d.tok.as_str());
        self.ws(Ws::Blank);

        if d.is_grouped() {
            self.set_pos(d.lparen);
            self.token("(");
            self.opening_comments(d.node_id);
            let n = d.specs.len();
            if n > 0 {
                self.ws(Ws::Indent);
                self.ws(Ws::Formfeed);
                let keep_type = if n > 1 && matches!(d.tok, DeclKeyword::Const | DeclKeyword::Var) {
                    Some(keep_type_column(&d.specs))
                } else {
                    None
                };
                let mut line = 0;
                for (i, s) in d.specs.iter().enumerate() {
                    if i > 0 {
                        let new_section = self.lines_from(line) > 0;
                        self.linebreak(self.line_for(s.pos()), 1, Ws::Ignore, new_section);
                    }
                    let slot = self.record_line();
                    match (&keep_type, s) {
                        (Some(keep), Spec::Value(v)) => self.value_spec(v, keep[i]),
                        _ => self.spec(s, n, false),
                    }
                    line = self.recorded_line(slot);
                }
                self.ws(Ws::Unindent);
                self.ws(Ws::Formfeed);
            }
            self.closing_comments(d.node_id);
            self.set_pos(d.rparen);
            self.token(")");
        } else if let Some(spec) = d.specs.first() {
            self.spec(spec, 1, true);
        }
        self.trailing_comments(d.node_id);
    }

    /// A spec of a declaration with `n` specs. Values of single specs are
    /// separated by blanks, those of groups by alignment cells.
    pub(crate) fn spec(&mut self, spec: &Spec, n: usize, do_indent: bool) {
        self.leading_comments(spec.node_id());
        match spec {
            Spec::Import(s) => {
                if let Some(name) = &s.name {
                    self.ident(name);
                    self.ws(Ws::Blank);
                }
                self.basic_lit(&s.path);
            }
            Spec::Value(s) => {
                self.ident_list(&s.names, do_indent);
                if let Some(ty) = &s.ty {
                    self.ws(Ws::Blank);
                    self.expr(ty);
                }
                if !s.values.is_empty() {
                    self.ws(Ws::Blank);
                    self.token("=");
                    self.ws(Ws::Blank);
                    self.expr_list(Pos::NONE, &s.values, 1, ListMode::default(), Pos::NONE);
                }
            }
            Spec::Type(s) => {
                self.ident(&s.name);
                if let Some(type_params) = &s.type_params {
                    self.parameters(type_params, ParamMode::TypeTypeParams);
                }
                self.ws(if n == 1 { Ws::Blank } else { Ws::Vtab });
                if s.alias {
                    self.token("=");
                    self.ws(Ws::Blank);
                }
                self.expr(&s.ty);
            }
        }
        self.trailing_comments(spec.node_id());
    }

    /// A value spec in a const or var group, laid out in columns: names,
    /// type, values, comment.
    fn value_spec(&mut self, s: &ValueSpec, keep_type: bool) {
        self.leading_comments(s.node_id);
        self.ident_list(&s.names, false);
        let mut extra_tabs = 3;
        if s.ty.is_some() || keep_type {
            self.ws(Ws::Vtab);
            extra_tabs -= 1;
        }
        if let Some(ty) = &s.ty {
            self.expr(ty);
        }
        if !s.values.is_empty() {
            self.ws(Ws::Vtab);
            self.token("=");
            self.ws(Ws::Blank);
            self.expr_list(Pos::NONE, &s.values, 1, ListMode::default(), Pos::NONE);
            extra_tabs -= 1;
        }
        if self.has_trailing(s.node_id) {
            for _ in 0..extra_tabs {
                self.ws(Ws::Vtab);
            }
            self.trailing_comments(s.node_id);
        }
    }

    // Functions
    // ------------------------------------------------------------------------

    pub(crate) fn func_decl(&mut self, d: &FuncDecl) {
        self.leading_comments(d.node_id);
        self.set_pos(d.ty.func_pos);
        self.token("func");
        self.ws(Ws::Blank);
        // Taken after `func`: pending whitespace before it may change lines.
        let start_col = self.out.column.saturating_sub(5);
        if let Some(recv) = &d.recv {
            self.parameters(recv, ParamMode::Func);
            self.ws(Ws::Blank);
        }
        self.ident(&d.name);
        self.signature(&d.ty);
        if let Some(body) = &d.body {
            let header_size = self.distance_from(d.ty.func_pos, start_col);
            self.func_body(header_size, Ws::Vtab, body);
        }
        self.trailing_comments(d.node_id);
    }

    /// Print a function body after a header `header_size` columns wide,
    /// on one line if it is small enough.
    pub(crate) fn func_body(&mut self, header_size: usize, sep: Ws, body: &BlockStmt) {
        let level = std::mem::replace(&mut self.level, 0);

        if header_size.saturating_add(self.body_size(body, MAX_ONE_LINE_BODY)) <= MAX_ONE_LINE_BODY {
            self.ws(sep);
            self.set_pos(body.lbrace);
            self.token("{");
            if !body.stmts.is_empty() {
                self.ws(Ws::Blank);
                let last = body.stmts.len() - 1;
                for (i, s) in body.stmts.iter().enumerate() {
                    if i > 0 {
                        self.token(";");
                        self.ws(Ws::Blank);
                    }
                    self.stmt(s, i == last);
                }
                self.ws(Ws::Blank);
            }
            self.no_extra_linebreak = true;
            self.set_pos(body.rbrace);
            self.token("}");
            self.no_extra_linebreak = false;
        } else {
            if sep != Ws::Ignore {
                self.ws(Ws::Blank);
            }
            self.block(body, 1);
        }

        self.level = level;
    }

    /// Estimated one-line width of `body`, or `max_size + 1` if it cannot be
    /// printed on one line.
    fn body_size(&mut self, body: &BlockStmt, max_size: usize) -> usize {
        let (lbrace, rbrace) = (self.line_for(body.lbrace), self.line_for(body.rbrace));
        if lbrace > 0 && rbrace > 0 && lbrace != rbrace {
            return max_size + 1;
        }
        if body.stmts.len() > 5 {
            return max_size + 1;
        }
        let Some(mut size) = self.comments_size(body.node_id) else {
            return max_size + 1;
        };
        for (i, s) in body.stmts.iter().enumerate() {
            if size > max_size {
                break;
            }
            let Some(comments) = self.comments_size(s.node_id()) else {
                return max_size + 1;
            };
            if i > 0 {
                size += 2;
            }
            size += comments + self.node_size(SizeNode::Stmt(s), max_size);
        }
        size
    }
}

/// The keyword of a generic declaration; `None` for functions.
fn decl_keyword(d: &Decl) -> Option<DeclKeyword> {
    d.as_gen().map(|g| g.tok)
}

/// For each spec of a const or var group: whether its row keeps an (empty)
/// type column. Within a run of specs with values, the column is kept for
/// the whole run as soon as one of them has a type.
fn keep_type_column(specs: &[Spec]) -> Vec<bool> {
    let mut keep = vec![false; specs.len()];
    let mut run_start = None;
    let mut keep_type = false;
    for (i, spec) in specs.iter().enumerate() {
        let Spec::Value(s) = spec else {
            continue;
        };
        if !s.values.is_empty() {
            if run_start.is_none() {
                run_start = Some(i);
                keep_type = false;
            }
        } else if let Some(start) = run_start.take() {
            if keep_type {
                keep[start..i].fill(true);
            }
        }
        if s.ty.is_some() {
            keep_type = true;
        }
    }
    if let (Some(start), true) = (run_start, keep_type) {
        keep[start..].fill(true);
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_file, print_file};

    fn format(source: &str) -> String {
        print_file(&parse_file(source).unwrap())
    }

    fn assert_stable(source: &str) {
        assert_eq!(format(source), source);
    }

    #[test]
    fn test_keep_type_column() {
        let parsed =
            parse_file("package p\n\nvar (\n\ta int = 1\n\tb = 2\n\tc\n\td = 3\n)\n").unwrap();
        let gen = parsed.file.decls[0].as_gen().unwrap();
        assert_eq!(keep_type_column(&gen.specs), vec![true, true, false, false]);
    }

    #[test]
    fn test_value_groups_are_aligned() {
        assert_eq!(
            format("package p\n\nconst (\n\ta = 1 // one\n\tlonger = 22 // two\n)\n"),
            "package p\n\nconst (\n\ta      = 1  // one\n\tlonger = 22 // two\n)\n"
        );
    }

    #[test]
    fn test_typed_values_keep_type_column() {
        assert_eq!(
            format("package p\n\nvar (\n\ta int = 1\n\tbb = 2\n)\n"),
            "package p\n\nvar (\n\ta  int = 1\n\tbb     = 2\n)\n"
        );
    }

    #[test]
    fn test_import_groups() {
        assert_stable("package p\n\nimport (\n\t\"fmt\"\n\n\tf \"os\"\n)\n");
        assert_stable("package p\n\nimport \"fmt\"\n");
    }

    #[test]
    fn test_type_declarations() {
        assert_stable(
            "package p\n\ntype (\n\tA  int\n\tBB []int\n)\n\ntype List[T any] []T\n\ntype B = A\n\ntype S struct {\n\tx int\n}\n",
        );
    }

    #[test]
    fn test_declarations_are_separated() {
        assert_eq!(
            format("package p\nvar a = 1\nvar b = 2\nconst c = 3\nfunc f() {\n}\n"),
            "package p\n\nvar a = 1\nvar b = 2\n\nconst c = 3\n\nfunc f() {\n}\n"
        );
    }

    #[test]
    fn test_methods_and_one_line_bodies() {
        assert_stable(
            "package p\n\nfunc (t *T) Len() int { return len(t.items) }\n\nfunc (t T) Get(i int) (v int, ok bool) {\n\treturn t.items[i], true\n}\n",
        );
    }

    #[test]
    fn test_doc_comments_stay_attached() {
        assert_stable(
            "package p\n\n// A is documented.\nvar A = 1\n\n// F is documented.\nfunc F() {\n}\n",
        );
    }

    #[test]
    fn test_group_comments() {
        assert_stable("package p\n\nvar (\n\t// leading\n\ta = 1\n\t// closing\n)\n");
    }

    #[test]
    fn test_function_without_body() {
        assert_stable("package p\n\nfunc external(x int) int\n");
    }
}
