// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::*;
use crate::nodes::{
    AssignOp, BinaryOp, BranchKind, ChanDir, Decl, Expr, Spec, Stmt, TypeSpec, UnaryOp,
};

fn parse(source: &str) -> ParsedFile {
    parse_file(source).expect("parses")
}

fn type_spec(parsed: &ParsedFile, index: usize) -> &TypeSpec {
    match &parsed.file.decls[index] {
        Decl::Gen(decl) => match &decl.specs[0] {
            Spec::Type(spec) => &**spec,
            other => panic!("expected type spec, got {:?}", other),
        },
        other => panic!("expected gen decl, got {:?}", other),
    }
}

/// Parse `src` as the right-hand side of `x = src` inside a function.
fn expr(src: &str) -> Expr {
    let source = format!("package p\n\nfunc f() {{\n\tx = {}\n}}\n", src);
    let parsed = parse(&source);
    let func = parsed.file.decls[0].as_func().unwrap();
    match &func.body.as_ref().unwrap().stmts[0] {
        Stmt::Assign(assign) => assign.rhs[0].clone(),
        other => panic!("expected assignment, got {:?}", other),
    }
}

fn type_expr(src: &str) -> Expr {
    let source = format!("package p\n\ntype T {}\n", src);
    type_spec(&parse(&source), 0).ty.clone()
}

fn body(src: &str) -> Vec<Stmt> {
    let source = format!("package p\n\nfunc f() {{\n{}\n}}\n", src);
    let parsed = parse(&source);
    let func = parsed.file.decls[0].as_func().unwrap();
    func.body.clone().unwrap().stmts
}

fn error(source: &str) -> ParserError {
    parse_file(source).unwrap_err()
}

// ============================================================================
// Files and declarations
// ============================================================================

#[test]
fn test_parse_package_and_imports() {
    let parsed = parse("package main\n\nimport (\n\t\"errors\"\n\tf \"fmt\"\n\t. \"os\"\n)\n");
    assert_eq!(parsed.file.name.name, "main");
    let paths: Vec<_> = parsed.file.imports().map(|i| i.path.unquoted()).collect();
    assert_eq!(paths, vec!["errors", "fmt", "os"]);
    let names: Vec<_> = parsed
        .file
        .imports()
        .map(|i| i.name.as_ref().map(|n| n.name.as_str()))
        .collect();
    assert_eq!(names, vec![None, Some("f"), Some(".")]);
}

#[test]
fn test_missing_package_clause_fails() {
    let err = error("func main() {}\n");
    assert_eq!(err.offset(), 0);
    assert_eq!(err.message(), "expected 'package', found 'func'");
}

#[test]
fn test_blank_package_name_fails() {
    let err = error("package _\n");
    assert_eq!(err.message(), "invalid package name _");
    assert_eq!(err.offset(), 8);
}

#[test]
fn test_var_without_type_or_value_fails() {
    let err = error("package p\n\nvar x\n");
    assert_eq!(err.message(), "expected type, found newline");
}

#[test]
fn test_parse_params_grouping() {
    let parsed = parse("package p\n\nfunc f(a, b int, c ...string) (n int, err error) {}\n");
    let func = parsed.file.decls[0].as_func().unwrap();
    let params = &func.ty.params.list;
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].names.len(), 2);
    assert!(matches!(params[1].ty, Expr::Ellipsis(_)));
    assert_eq!(func.ty.results.as_ref().unwrap().num_fields(), 2);
}

#[test]
fn test_mixed_params_fail_at_lparen() {
    let source = "package p\n\nfunc f(a int, string) {}\n";
    let err = error(source);
    assert_eq!(err.message(), "mixed named and unnamed parameters");
    assert_eq!(err.offset(), source.find('(').unwrap());
}

#[test]
fn test_parse_unnamed_params() {
    let parsed = parse("package p\n\ntype I interface {\n\tDo(context.Context, int64) error\n}\n");
    let Expr::InterfaceType(iface) = &type_spec(&parsed, 0).ty else {
        panic!("expected interface");
    };
    let Expr::FuncType(method) = &iface.methods.list[0].ty else {
        panic!("expected method signature");
    };
    assert_eq!(method.params.list.len(), 2);
    assert!(method.params.list.iter().all(|f| f.names.is_empty()));
}

#[test]
fn test_parse_generic_param_types() {
    let parsed = parse("package p\n\nfunc f(xs []int, m Map[string, int], n [4]byte) {}\n");
    let func = parsed.file.decls[0].as_func().unwrap();
    let params = &func.ty.params.list;
    assert_eq!(params.len(), 3);
    assert!(matches!(params[1].ty, Expr::Index(_)));
    assert!(matches!(params[2].ty, Expr::ArrayType(_)));
}

#[test]
fn test_parse_type_params_and_alias() {
    let parsed = parse(
        "package p\n\ntype List[T any] struct{ items []T }\n\ntype A = B\n\ntype N [4]int\n",
    );
    assert_eq!(type_spec(&parsed, 0).type_params.as_ref().unwrap().list.len(), 1);
    assert!(type_spec(&parsed, 1).alias);
    assert!(type_spec(&parsed, 2).type_params.is_none());
}

#[test]
fn test_generic_func_decl() {
    let parsed = parse("package p\n\nfunc Map[K comparable, V any](m map[K]V) []V { return nil }\n");
    let func = parsed.file.decls[0].as_func().unwrap();
    assert_eq!(func.ty.type_params.as_ref().unwrap().num_fields(), 2);
    assert!(matches!(func.ty.params.list[0].ty, Expr::MapType(_)));
}

#[test]
fn test_method_receiver() {
    let parsed = parse("package p\n\nfunc (s *Server) Start() error { return nil }\n");
    let func = parsed.file.decls[0].as_func().unwrap();
    assert_eq!(func.receiver_type_name(), Some("Server"));
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_comments_attach_to_declarations() {
    let parsed = parse(
        "// Package doc.\npackage main // trailing\n\n// Doc for f.\nfunc f() {\n\tx() // after x\n\t// closing\n}\n\n// end\n",
    );
    let file_id = parsed.file.node_id;
    assert_eq!(parsed.comments.leading(file_id)[0].text, "// Package doc.");
    assert_eq!(parsed.comments.trailing(file_id)[0].text, "// trailing");
    assert_eq!(parsed.comments.closing(file_id)[0].text, "// end");

    let func = parsed.file.decls[0].as_func().unwrap();
    assert_eq!(parsed.comments.leading(func.node_id)[0].text, "// Doc for f.");
    let body = func.body.as_ref().unwrap();
    assert_eq!(parsed.comments.trailing(body.stmts[0].node_id())[0].text, "// after x");
    assert_eq!(parsed.comments.closing(body.node_id)[0].text, "// closing");
    assert_eq!(parsed.comments.len(), 6);
}

#[test]
fn test_case_clause_comments() {
    let source =
        "package p\n\nfunc f() {\n\tswitch x {\n\t// first\n\tcase 1: // one\n\t\tg()\n\t}\n}\n";
    let parsed = parse(source);
    let func = parsed.file.decls[0].as_func().unwrap();
    let Stmt::Switch(sw) = &func.body.as_ref().unwrap().stmts[0] else {
        panic!("expected switch");
    };
    let clause_id = sw.body.stmts[0].node_id();
    assert_eq!(parsed.comments.leading(clause_id)[0].text, "// first");
    assert_eq!(parsed.comments.opening(clause_id)[0].text, "// one");
}

#[test]
fn test_composite_literal_comments() {
    let source = "package p\n\nvar m = map[string]int{ // open\n\t// a doc\n\t\"a\": 1, // one\n\t// last\n}\n";
    let parsed = parse(source);
    let Spec::Value(spec) = &parsed.file.decls[0].as_gen().unwrap().specs[0] else {
        panic!("expected value spec");
    };
    let Expr::CompositeLit(lit) = &spec.values[0] else {
        panic!("expected composite literal");
    };
    assert_eq!(parsed.comments.opening(lit.node_id)[0].text, "// open");
    assert_eq!(parsed.comments.closing(lit.node_id)[0].text, "// last");
    let elt = lit.elts[0].node_id();
    assert_eq!(parsed.comments.leading(elt)[0].text, "// a doc");
    assert_eq!(parsed.comments.trailing(elt)[0].text, "// one");
}

#[test]
fn test_grouped_decl_comments() {
    let source = "package p\n\nconst ( // group\n\t// A doc\n\tA = 1\n\tB = 2 // b\n\t// tail\n)\n";
    let parsed = parse(source);
    let decl = parsed.file.decls[0].as_gen().unwrap();
    assert_eq!(parsed.comments.opening(decl.node_id)[0].text, "// group");
    assert_eq!(parsed.comments.closing(decl.node_id)[0].text, "// tail");
    assert_eq!(parsed.comments.leading(decl.specs[0].node_id())[0].text, "// A doc");
    assert_eq!(parsed.comments.trailing(decl.specs[1].node_id())[0].text, "// b");
}

#[test]
fn test_node_ids_are_unique() {
    let parsed = parse("package main\n\nfunc main() {\n\ta := 1\n\tb := a\n}\n");
    let body = parsed.file.decls[0].as_func().unwrap().body.as_ref().unwrap();
    let ids: Vec<_> = body.stmts.iter().map(Stmt::node_id).collect();
    assert!(ids.iter().all(Option::is_some));
    assert_ne!(ids[0], ids[1]);
    assert!(parsed.next_id > ids[1].unwrap().as_u32());
}

#[test]
fn test_node_ids_are_dense_from_root() {
    let parsed = parse("package main\n\nvar x = 1\n");
    assert_eq!(parsed.file.node_id.map(|id| id.as_u32()), Some(0));
    let spec = &parsed.file.decls[0].as_gen().unwrap().specs[0];
    assert!(spec.node_id().unwrap().as_u32() < parsed.next_id);
}

// ============================================================================
// Expressions and types
// ============================================================================

#[test]
fn test_binary_precedence() {
    let Expr::Binary(b) = expr("a + b*c == d && e") else {
        panic!("expected binary");
    };
    assert_eq!(b.op, BinaryOp::LogAnd);
    let Expr::Binary(eq) = &b.x else {
        panic!("expected binary");
    };
    assert_eq!(eq.op, BinaryOp::Eq);
    let Expr::Binary(add) = &eq.x else {
        panic!("expected binary");
    };
    assert_eq!(add.op, BinaryOp::Add);
    assert!(matches!(&add.y, Expr::Binary(mul) if mul.op == BinaryOp::Mul));
}

#[test]
fn test_binary_is_left_associative() {
    let Expr::Binary(b) = expr("a - b - c") else {
        panic!("expected binary");
    };
    assert!(matches!(&b.x, Expr::Binary(inner) if inner.op == BinaryOp::Sub));
    assert!(matches!(&b.y, Expr::Ident(id) if id.name == "c"));
}

#[test]
fn test_unary_and_star() {
    assert!(matches!(expr("-x"), Expr::Unary(u) if u.op == UnaryOp::Minus));
    assert!(matches!(expr("<-ch"), Expr::Unary(u) if u.op == UnaryOp::Arrow));
    assert!(matches!(expr("*p"), Expr::Star(_)));
    assert!(matches!(expr("&T{}"), Expr::Unary(u) if u.op == UnaryOp::Addr));
}

#[test]
fn test_calls_selectors_and_index() {
    let Expr::Call(call) = expr("errors.Wrapf(err, \"x %s\", args...)") else {
        panic!("expected call");
    };
    assert_eq!(call.args.len(), 3);
    assert!(call.has_ellipsis);
    assert!(matches!(&call.fun, Expr::Selector(sel) if sel.sel.name == "Wrapf"));

    assert!(matches!(expr("m[k]"), Expr::Index(_)));
    assert!(matches!(expr("s[1:2:3]"), Expr::Slice(s) if s.slice3));
    assert!(matches!(expr("s[:]"), Expr::Slice(s) if s.low.is_none() && !s.slice3));
    assert!(matches!(expr("v.(string)"), Expr::TypeAssert(t) if t.ty.is_some()));
    assert!(matches!(expr("[]byte(s)"), Expr::Call(c) if matches!(c.fun, Expr::ArrayType(_))));
}

#[test]
fn test_three_index_slice_needs_bounds() {
    let err = error("package p\n\nfunc f() {\n\tx = s[1::3]\n}\n");
    assert_eq!(err.message(), "middle and final index required in 3-index slice");
}

#[test]
fn test_composite_literals() {
    let Expr::CompositeLit(lit) = expr("map[string]int{\"a\": 1, \"b\": 2}") else {
        panic!("expected composite literal");
    };
    assert_eq!(lit.elts.len(), 2);
    assert!(matches!(&lit.elts[0], Expr::KeyValue(_)));

    let Expr::CompositeLit(lit) = expr("[][]int{{1}, {2, 3}}") else {
        panic!("expected composite literal");
    };
    assert!(matches!(&lit.elts[1], Expr::CompositeLit(inner) if inner.ty.is_none()));

    let Expr::CompositeLit(lit) = expr("pkg.Config{Name: \"x\",\n\t}") else {
        panic!("expected composite literal");
    };
    assert!(matches!(lit.ty, Some(Expr::Selector(_))));

    let Expr::CompositeLit(lit) = expr("List[int]{1}") else {
        panic!("expected composite literal");
    };
    assert!(matches!(lit.ty, Some(Expr::Index(_))));
}

#[test]
fn test_func_literal() {
    let Expr::FuncLit(lit) = expr("func(a int) error { return nil }") else {
        panic!("expected func literal");
    };
    assert_eq!(lit.ty.params.list.len(), 1);
    assert_eq!(lit.body.stmts.len(), 1);
}

#[test]
fn test_chan_types() {
    assert!(matches!(type_expr("chan int"), Expr::ChanType(c) if c.dir == ChanDir::Both));
    assert!(matches!(type_expr("chan<- int"), Expr::ChanType(c) if c.dir == ChanDir::Send));
    assert!(matches!(type_expr("<-chan int"), Expr::ChanType(c) if c.dir == ChanDir::Recv));
}

#[test]
fn test_struct_fields() {
    let Expr::StructType(st) =
        type_expr("struct {\n\tio.Reader\n\t*Base\n\ta, b int `json:\"a\"`\n\titems []T\n}")
    else {
        panic!("expected struct");
    };
    let fields = &st.fields.list;
    assert_eq!(fields.len(), 4);
    assert!(fields[0].names.is_empty());
    assert!(fields[1].names.is_empty());
    assert_eq!(fields[2].names.len(), 2);
    assert!(fields[2].tag.is_some());
    assert_eq!(fields[3].names[0].name, "items");
}

#[test]
fn test_interface_elements() {
    let Expr::InterfaceType(it) =
        type_expr("interface {\n\tfmt.Stringer\n\tClose() error\n\t~int | ~string\n}")
    else {
        panic!("expected interface");
    };
    let methods = &it.methods.list;
    assert_eq!(methods.len(), 3);
    assert_eq!(methods[1].names[0].name, "Close");
    assert!(matches!(&methods[2].ty, Expr::Binary(b) if b.op == BinaryOp::Or));
}

#[test]
fn test_composite_literal_not_in_if_header() {
    let stmts = body("if x == y {\n}\nfor _, v := range []int{1, 2} {\n}");
    let Stmt::If(if_stmt) = &stmts[0] else {
        panic!("expected if");
    };
    assert!(matches!(&if_stmt.cond, Expr::Binary(b) if matches!(b.y, Expr::Ident(_))));
    assert!(matches!(&stmts[1], Stmt::Range(r) if matches!(r.x, Expr::CompositeLit(_))));
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_simple_statements() {
    let stmts = body("x := 1\nx += 2\nx++\nch <- x\nf()\nvar y int\ngo f()\ndefer g()\nreturn");
    assert!(matches!(&stmts[0], Stmt::Assign(a) if a.tok == AssignOp::Define));
    assert!(matches!(&stmts[1], Stmt::Assign(a) if a.tok == AssignOp::AddAssign));
    assert!(matches!(&stmts[2], Stmt::IncDec(_)));
    assert!(matches!(&stmts[3], Stmt::Send(_)));
    assert!(matches!(&stmts[4], Stmt::Expr(_)));
    assert!(matches!(&stmts[5], Stmt::Decl(_)));
    assert!(matches!(&stmts[6], Stmt::Go(_)));
    assert!(matches!(&stmts[7], Stmt::Defer(_)));
    assert!(matches!(&stmts[8], Stmt::Return(r) if r.results.is_empty()));
}

#[test]
fn test_expression_list_needs_assignment() {
    let err = error("package p\n\nfunc f() {\n\ta, b\n}\n");
    assert_eq!(err.message(), "expected ':=' or '=' or ','");
}

#[test]
fn test_if_else_chain() {
    let stmts = body("if err := f(); err != nil {\n\treturn\n} else if x {\n} else {\n}");
    let Stmt::If(if_stmt) = &stmts[0] else {
        panic!("expected if");
    };
    assert!(if_stmt.init.is_some());
    assert!(matches!(if_stmt.cond, Expr::Binary(_)));
    let Some(Stmt::If(else_if)) = &if_stmt.else_ else {
        panic!("expected else if");
    };
    assert!(matches!(else_if.else_, Some(Stmt::Block(_))));
}

#[test]
fn test_missing_condition_is_error() {
    let source = "package p\n\nfunc f() {\n\tif {\n\t}\n}\n";
    let err = error(source);
    assert_eq!(err.message(), "missing condition in if statement");
    assert_eq!(err.offset(), source.find("{\n\t}").unwrap());
}

#[test]
fn test_for_forms() {
    let stmts = body(
        "for {\n}\nfor x < 3 {\n}\nfor i := 0; i < 3; i++ {\n}\nfor k, v := range m {\n}\nfor range ch {\n}",
    );
    assert!(matches!(&stmts[0], Stmt::For(f) if f.cond.is_none()));
    assert!(matches!(&stmts[1], Stmt::For(f) if f.cond.is_some() && f.init.is_none()));
    assert!(matches!(&stmts[2], Stmt::For(f) if f.init.is_some() && f.post.is_some()));
    assert!(
        matches!(&stmts[3], Stmt::Range(r) if r.value.is_some() && r.tok == Some(AssignOp::Define))
    );
    assert!(matches!(&stmts[4], Stmt::Range(r) if r.key.is_none() && r.tok.is_none()));
}

#[test]
fn test_range_allows_two_variables() {
    let err = error("package p\n\nfunc f() {\n\tfor a, b, c := range m {\n\t}\n}\n");
    assert_eq!(
        err.message(),
        "range clause permits at most two iteration variables"
    );
}

#[test]
fn test_switches() {
    let stmts = body(
        "switch x := v.(type) {\ncase int, string:\n\tf()\ndefault:\n}\nswitch {\ncase a > b:\n\tfallthrough\ncase a:\n}",
    );
    let Stmt::TypeSwitch(ts) = &stmts[0] else {
        panic!("expected type switch");
    };
    assert_eq!(ts.body.stmts.len(), 2);
    let Stmt::Switch(sw) = &stmts[1] else {
        panic!("expected switch");
    };
    assert!(sw.tag.is_none());
    let Stmt::CaseClause(clause) = &sw.body.stmts[0] else {
        panic!("expected case clause");
    };
    assert!(matches!(&clause.body[0], Stmt::Branch(b) if b.tok == BranchKind::Fallthrough));
}

#[test]
fn test_select_and_labels() {
    let stmts = body(
        "outer:\n\tfor {\n\t\tselect {\n\t\tcase v := <-ch:\n\t\t\t_ = v\n\t\tcase out <- 1:\n\t\tdefault:\n\t\t\tbreak outer\n\t\t}\n\t}\ndone:\n",
    );
    let Stmt::Labeled(labeled) = &stmts[0] else {
        panic!("expected labeled statement");
    };
    assert_eq!(labeled.label.name, "outer");
    assert!(matches!(labeled.stmt, Stmt::For(_)));
    assert!(matches!(&stmts[1], Stmt::Labeled(l) if matches!(l.stmt, Stmt::Empty(_))));
}

// ============================================================================
// Limits
// ============================================================================

fn nested_parens(depth: usize) -> String {
    format!(
        "package p\n\nvar x = {}1{}\n",
        "(".repeat(depth),
        ")".repeat(depth)
    )
}

#[test]
fn test_moderate_nesting_parses() {
    let parsed = parse(&nested_parens(100));
    let Spec::Value(spec) = &parsed.file.decls[0].as_gen().unwrap().specs[0] else {
        panic!("expected value spec");
    };
    assert!(matches!(spec.values[0], Expr::Paren(_)));
}

#[test]
fn test_deep_nesting_is_rejected() {
    let source = nested_parens(10_000);
    let err = error(&source);
    assert!(matches!(err, ParserError::NestingTooDeep { .. }));
    assert_eq!(err.message(), "nesting too deep");
    assert!(err.offset() > source.find('(').unwrap());
}

#[test]
fn test_deeply_nested_blocks_are_rejected() {
    let depth = 5_000;
    let source = format!(
        "package p\n\nfunc f() {}{}\n",
        "{".repeat(depth),
        "}".repeat(depth)
    );
    assert!(matches!(error(&source), ParserError::NestingTooDeep { .. }));
}

#[test]
fn test_large_file_parses() {
    let mut source = String::from("package p\n");
    for i in 0..2_000 {
        source.push_str(&format!("\n// f{i} doc.\nfunc f{i}(a int) int {{\n\treturn a + {i}\n}}\n"));
    }
    let parsed = parse(&source);
    assert_eq!(parsed.file.decls.len(), 2_000);
    assert_eq!(parsed.comments.len(), 2_000);
}
