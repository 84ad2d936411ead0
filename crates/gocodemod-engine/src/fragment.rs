//! Build new nodes from Go snippets.
//!
//! A snippet is wrapped in just enough scaffolding to make a file (a package
//! clause, and a function body for statements), parsed, and cut back out.
//! Positions and ids are cleared from the result, so it prints compactly
//! wherever it is inserted and never reuses ids from the scaffolding.

use gocodemod_cst::visitor::clear_positions;
use gocodemod_cst::{parse_file, BlockStmt, Decl, DeclStmt, Expr, Spec, Stmt};

use crate::error::{CodemodError, CodemodResult};

const PACKAGE_CLAUSE: &str = "package fragment\n\n";

/// A parsed snippet.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// A single statement (expressions parse as expression statements).
    Stmt(Stmt),
    /// Several statements, in order.
    Block(BlockStmt),
    /// A top-level declaration that cannot appear in a function body, such
    /// as a function or method.
    Decl(Decl),
}

impl Fragment {
    /// The fragment as one statement. Several statements become a block;
    /// function declarations have no statement form.
    pub fn into_stmt(self) -> Option<Stmt> {
        match self {
            Fragment::Stmt(stmt) => Some(stmt),
            Fragment::Block(block) => Some(Stmt::Block(Box::new(block))),
            Fragment::Decl(Decl::Gen(decl)) => Some(Stmt::Decl(Box::new(DeclStmt {
                node_id: None,
                decl: *decl,
            }))),
            Fragment::Decl(Decl::Func(_)) => None,
        }
    }
}

/// Parse a statement, several statements, or a declaration.
///
/// Comments in `text` are dropped: the fragment carries no positions or ids
/// for them to attach to, so `"// note\nx := 1"` yields just `x := 1`.
///
/// # Example
///
/// ```
/// use gocodemod_engine::{parse_fragment, Fragment};
///
/// assert!(matches!(parse_fragment("x := 1").unwrap(), Fragment::Stmt(_)));
/// assert!(matches!(parse_fragment("a()\nb()").unwrap(), Fragment::Block(_)));
/// assert!(matches!(parse_fragment("func f() {}").unwrap(), Fragment::Decl(_)));
/// ```
pub fn parse_fragment(text: &str) -> CodemodResult<Fragment> {
    let as_body = format!("{PACKAGE_CLAUSE}func fragment() {{\n{text}\n}}\n");
    let mut fragment = match parse_file(&as_body) {
        Ok(parsed) => {
            let mut stmts = parsed
                .file
                .decls
                .into_iter()
                .find_map(|decl| match decl {
                    Decl::Func(func) => func.body,
                    Decl::Gen(_) => None,
                })
                .map(|body| body.stmts)
                .unwrap_or_default();
            stmts.retain(|stmt| !matches!(stmt, Stmt::Empty(_)));
            match stmts.len() {
                0 => return Err(CodemodError::invalid_fragment(text, "no statements")),
                1 => Fragment::Stmt(stmts.remove(0)),
                _ => Fragment::Block(BlockStmt::new(stmts)),
            }
        }
        Err(body_err) => {
            let as_decl = format!("{PACKAGE_CLAUSE}{text}\n");
            let parsed = parse_file(&as_decl)
                .map_err(|_| CodemodError::invalid_fragment(text, body_err.message()))?;
            let mut decls = parsed.file.decls;
            if decls.len() != 1 {
                return Err(CodemodError::invalid_fragment(
                    text,
                    format!("expected one declaration, found {}", decls.len()),
                ));
            }
            Fragment::Decl(decls.remove(0))
        }
    };
    match &mut fragment {
        Fragment::Stmt(stmt) => clear_positions(stmt),
        Fragment::Block(block) => clear_positions(block),
        Fragment::Decl(decl) => clear_positions(decl),
    }
    Ok(fragment)
}

/// Parse a snippet that must form one statement.
pub fn parse_stmt(text: &str) -> CodemodResult<Stmt> {
    parse_fragment(text)?
        .into_stmt()
        .ok_or_else(|| CodemodError::invalid_fragment(text, "not a statement"))
}

/// Parse a single expression, types included (`map[string]int`).
pub fn parse_expr(text: &str) -> CodemodResult<Expr> {
    let source = format!("{PACKAGE_CLAUSE}var _ = {text}\n");
    let parsed =
        parse_file(&source).map_err(|e| CodemodError::invalid_fragment(text, e.message()))?;
    let value = parsed
        .file
        .decls
        .into_iter()
        .next()
        .and_then(|decl| match decl {
            Decl::Gen(gen) => gen.specs.into_iter().next(),
            Decl::Func(_) => None,
        })
        .and_then(|spec| match spec {
            Spec::Value(value) if value.values.len() == 1 => value.values.into_iter().next(),
            _ => None,
        });
    let mut expr =
        value.ok_or_else(|| CodemodError::invalid_fragment(text, "not a single expression"))?;
    clear_positions(&mut expr);
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gocodemod_cst::source_code;

    #[test]
    fn test_single_statement() {
        let Fragment::Stmt(stmt) = parse_fragment("x := 1").unwrap() else {
            panic!("expected a statement");
        };
        assert!(matches!(stmt, Stmt::Assign(_)));
        assert!(stmt.node_id().is_none());
        assert!(!stmt.pos().is_valid());
        assert_eq!(source_code(&stmt), "x := 1");
    }

    #[test]
    fn test_comments_are_dropped() {
        let stmt = parse_stmt("// note\nx := 1 // trailing").unwrap();
        assert_eq!(source_code(&stmt), "x := 1");
        let Fragment::Decl(decl) = parse_fragment("// Helper doc.\nfunc helper() {}").unwrap()
        else {
            panic!("expected a declaration");
        };
        assert!(!source_code(&decl).contains("Helper doc"));
    }

    #[test]
    fn test_type_declaration_is_a_statement() {
        let stmt = parse_stmt("type S struct{}").unwrap();
        assert!(matches!(stmt, Stmt::Decl(_)));
    }

    #[test]
    fn test_several_statements_form_a_block() {
        let Fragment::Block(block) = parse_fragment("if a {\n}\nif b {\n}").unwrap() else {
            panic!("expected a block");
        };
        assert_eq!(block.stmts.len(), 2);
        assert!(matches!(parse_stmt("a()\nb()").unwrap(), Stmt::Block(_)));
    }

    #[test]
    fn test_function_declaration() {
        let Fragment::Decl(decl) = parse_fragment("func helper() int { return 1 }").unwrap()
        else {
            panic!("expected a declaration");
        };
        assert_eq!(decl.as_func().unwrap().name.name, "helper");
        assert!(decl.node_id().is_none());
        assert!(parse_stmt("func helper() {}").is_err());
    }

    #[test]
    fn test_expressions() {
        let expr = parse_expr("fmt.Errorf(\"x: %w\", err)").unwrap();
        assert!(expr.as_call().is_some());
        assert!(expr.node_id().is_none());
        assert!(matches!(parse_expr("map[string]string").unwrap(), Expr::MapType(_)));
        assert!(parse_expr("a, b").is_err());
        assert!(parse_expr("x :=").is_err());
    }

    #[test]
    fn test_invalid_fragments() {
        assert!(matches!(
            parse_fragment("if {"),
            Err(CodemodError::InvalidFragment { .. })
        ));
        assert!(parse_fragment("").is_err());
    }
}
