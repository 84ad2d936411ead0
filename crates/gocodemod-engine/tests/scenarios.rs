//! End-to-end codemods over small Go files.
//!
//! Each test runs a complete rewrite the way a codemod author would write
//! it: query, edit through the returned handles, then print.

use difference::Changeset;
use gocodemod_core::{normalize_string, quote, unquote};
use gocodemod_engine::cst::{source_code, Expr};
use gocodemod_engine::{parse_stmt, SourceFile};

/// Compare ignoring layout, showing a line diff on mismatch.
fn assert_same_code(expected: &str, actual: &str) {
    if normalize_string(expected) != normalize_string(actual) {
        panic!(
            "printed code differs:\n{}",
            Changeset::new(expected, actual, "\n")
        );
    }
}

// ============================================================================
// errors.Wrapf -> fmt.Errorf
// ============================================================================

#[test]
fn rewrite_errors_wrapf_to_fmt_errorf() {
    let source = r#"
	package main

	import "errors"

	var errSomething = errors.New("oops")

	func foo() error {
		return errors.Wrapf(errSomething, "some context")
	}

	func main() {

	}
	"#;
    let mut file = SourceFile::parse(source, "main.go", "/project").unwrap();

    let mut rewritten = 0;
    for mut call in file.function_calls().into_values().flatten() {
        if call.function_name() != "errors.Wrapf" {
            continue;
        }
        call.edit(&mut file, |call| {
            let last = call.args.len() - 1;
            call.args.swap(0, last);
            if let Expr::BasicLit(message) = &mut call.args[0] {
                message.value = quote(&format!("{}: %w", unquote(&message.value)));
            }
            call.fun = Expr::selector(Expr::ident("fmt"), "Errorf");
        })
        .unwrap();
        rewritten += 1;
    }
    assert_eq!(rewritten, 1);
    assert!(file.imports().add("fmt"));

    let expected = r#"package main

import (
	"errors"
	"fmt"
)

var errSomething = errors.New("oops")

func foo() error {
	return fmt.Errorf("some context: %w", errSomething)
}

func main() {

}
"#;
    let printed = file.print();
    assert_same_code(expected, &printed);
    assert!(printed.starts_with("package main\n\nimport (\n\t\"errors\"\n\t\"fmt\"\n)\n"));
    assert!(printed.contains("\treturn fmt.Errorf(\"some context: %w\", errSomething)\n"));
}

// ============================================================================
// context.Context first
// ============================================================================

const CONTEXT_LAST: &str = r#"
	package main

	import "context"

	type UserService interface {
		DoSomething(int64, context.Context) error
	}

	func buz(userID int64, ctx context.Context) error {
		return nil
	}

	func baz(userID int64, context context.Context) error {
		return buz(userID, context)
	}

	func foo(userID int64, ctx context.Context) error {
		err := baz(userID, ctx)
		if err != nil {
			return err
		}
		return nil
	}

	func main() {
		_ = foo(1, context.Background())
	}
	"#;

fn is_context_arg(arg: &Expr) -> bool {
    match arg {
        Expr::Ident(ident) => ident.name == "ctx" || ident.name == "context",
        Expr::Call(call) => source_code(&call.fun) == "context.Background",
        _ => false,
    }
}

#[test]
fn move_context_to_first_parameter_position() {
    let mut file = SourceFile::new(CONTEXT_LAST).unwrap();

    for mut function in file.functions().into_values().flatten() {
        function.move_param_to_front(&mut file, ".Context");
    }

    for mut call in file.function_calls().into_values().flatten() {
        let context_args: Vec<usize> = call
            .args()
            .iter()
            .enumerate()
            .filter(|(_, arg)| is_context_arg(arg))
            .map(|(i, _)| i)
            .collect();
        for i in context_args {
            call.swap_args(&mut file, 0, i);
        }
    }

    for decl in file.type_declarations().into_values().flatten() {
        for mut method in decl.methods(&file) {
            method.move_param_to_front(&mut file, "context.Context");
        }
    }

    let expected = r#"package main

import "context"

type UserService interface {
	DoSomething(context.Context, int64) error
}

func buz(ctx context.Context, userID int64) error {
	return nil
}

func baz(context context.Context, userID int64) error {
	return buz(context, userID)
}

func foo(ctx context.Context, userID int64) error {
	err := baz(ctx, userID)
	if err != nil {
		return err
	}
	return nil
}

func main() {
	_ = foo(context.Background(), 1)
}
"#;
    let printed = file.print();
    assert_same_code(expected, &printed);
    for line in [
        "\tDoSomething(context.Context, int64) error\n",
        "func baz(context context.Context, userID int64) error {\n",
        "\terr := baz(ctx, userID)\n",
        "\t_ = foo(context.Background(), 1)\n",
    ] {
        assert!(printed.contains(line), "missing {:?} in\n{}", line, printed);
    }
}

#[test]
fn moving_context_twice_changes_nothing() {
    let mut file = SourceFile::new(CONTEXT_LAST).unwrap();
    for mut function in file.functions().into_values().flatten() {
        function.move_param_to_front(&mut file, ".Context");
    }
    let once = file.print();
    for mut function in file.functions().into_values().flatten() {
        assert!(!function.move_param_to_front(&mut file, ".Context"));
    }
    assert_eq!(file.print(), once);
}

// ============================================================================
// Map literals
// ============================================================================

const MAP_SOURCE: &str = r#"
	package main

	func main() {
		x := map[string]string{
			"transaction_isolation": "'READ-COMMITED'",
		}
	}
"#;

#[test]
fn rename_map_literal_key() {
    let mut file = SourceFile::new(MAP_SOURCE).unwrap();
    let mut literal = file.find_map_literal("map[string]string").unwrap().unwrap();
    assert!(literal.has("transaction_isolation"));
    assert!(!literal.has("key_not_in_the_map"));

    assert!(literal.rename_key(&mut file, "transaction_isolation", "tx_isolation"));
    assert_same_code(
        r#"map[string]string{"tx_isolation": "'READ-COMMITED'"}"#,
        &source_code(&Expr::CompositeLit(Box::new(literal.node().clone()))),
    );
    assert!(file.print().contains("\"tx_isolation\": \"'READ-COMMITED'\""));
}

#[test]
fn rename_missing_map_key_does_nothing() {
    let mut file = SourceFile::new(MAP_SOURCE).unwrap();
    let before = file.print();
    let mut literal = file.find_map_literal("map[string]string").unwrap().unwrap();
    assert!(!literal.rename_key(&mut file, "a", "b"));
    assert_eq!(file.print(), before);
}

// ============================================================================
// If statements and assignments
// ============================================================================

const IF_SOURCE: &str = r#"
		package main

		func main() {
			if true {
				println(2)
			}
		}
	"#;

#[test]
fn find_if_statement() {
    let file = SourceFile::new("package main\n\nfunc main() {\n\tif true { }\n}\n").unwrap();
    let scoped = file.if_statements();
    assert_eq!(scoped.len(), 1);
    let statements = scoped.values().next().unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(source_code(statements[0].cond()), "true");
}

#[test]
fn remove_if_statement() {
    let mut file = SourceFile::new(IF_SOURCE).unwrap();
    for statement in file.if_statements().into_values().flatten() {
        statement.remove(&mut file);
    }
    assert_same_code("package main\n\nfunc main() {\n\n}\n", &file.print());
}

#[test]
fn remove_only_if_condition() {
    let mut file = SourceFile::new(IF_SOURCE).unwrap();
    for statement in file.if_statements().into_values().flatten() {
        statement.remove_condition(&mut file);
    }
    assert_same_code(
        "package main\n\nfunc main() {\n\n\tprintln(2)\n\n}\n",
        &file.print(),
    );
}

#[test]
fn insert_around_if_statement() {
    let mut file = SourceFile::new(IF_SOURCE).unwrap();
    for statement in file.if_statements().into_values().flatten() {
        statement.insert_before(&mut file, parse_stmt("println(1)").unwrap());
        statement.insert_after(&mut file, parse_stmt("println(3)").unwrap());
    }
    assert_same_code(
        "package main\n\nfunc main() {\n\tprintln(1)\n\tif true {\n\t\tprintln(2)\n\t}\n\tprintln(3)\n}\n",
        &file.print(),
    );
}

#[test]
fn insert_around_assignment() {
    let source = "package main\n\nfunc main() {\n\tx := 1\n\ty := 2\n}\n";
    let mut file = SourceFile::new(source).unwrap();
    let x = file
        .find_assignments("x")
        .into_values()
        .flatten()
        .next()
        .unwrap();
    x.insert_after(&mut file, parse_stmt("z := 3").unwrap());
    x.insert_before(&mut file, parse_stmt("w := 0").unwrap());
    assert_same_code(
        "package main\n\nfunc main() {\n\tw := 0\n\tx := 1\n\tz := 3\n\ty := 2\n}\n",
        &file.print(),
    );
}

#[test]
fn replace_assignment_with_struct_literal() {
    let source = r#"package main

func main() {
	config := mysql.Config{User: "mysql", DBName: "db"}
	db, err := sql.Open("mysql", config.FormatDSN())
}
"#;
    let mut file = SourceFile::new(source).unwrap();
    let config = file
        .find_assignments("config")
        .into_values()
        .flatten()
        .next()
        .unwrap();
    let literal = config.struct_literal().unwrap();
    assert_eq!(source_code(literal.field("DBName")), "\"db\"");

    let replacement = parse_stmt(r#"config := mysql.Config{User: "root", DBName: "db"}"#).unwrap();
    assert_eq!(config.replace(&mut file, replacement), 1);
    let printed = file.print();
    assert!(printed.contains("User: \"root\""));
    assert!(!printed.contains("User: \"mysql\""));
    assert!(printed.contains("config.FormatDSN()"));
}

// ============================================================================
// Files as a whole
// ============================================================================

#[test]
fn package_name_and_paths() {
    let mut file = SourceFile::parse("package main\n", "cmd/app/main.go", "/repo").unwrap();
    assert_eq!(file.package().name(), "main");
    assert_eq!(file.file_path().unwrap().to_str(), Some("cmd/app/main.go"));
    file.set_package_name("app");
    assert_eq!(file.print(), "package app\n");
}

#[test]
fn adding_an_import_three_times_adds_it_once() {
    let mut file = SourceFile::new("package main\n\nimport \"errors\"\n").unwrap();
    for _ in 0..3 {
        file.imports().add("fmt");
    }
    assert_eq!(file.import_paths(), ["errors", "fmt"]);
    assert_eq!(file.print().matches("\"fmt\"").count(), 1);
}

#[test]
fn replace_one_import_with_another() {
    let mut file = SourceFile::new(
        "package main\n\nimport (\n\t\"errors\"\n\t\"example.com/app/infra/errors\"\n)\n",
    )
    .unwrap();
    for path in file.import_paths() {
        if path.ends_with("infra/errors") {
            file.imports().remove(&path);
            file.imports().add("github.com/IQ-tech/go-errors");
        }
    }
    assert_eq!(file.import_paths(), ["errors", "github.com/IQ-tech/go-errors"]);
}

#[test]
fn traverse_reaches_every_call() {
    let file = SourceFile::new(CONTEXT_LAST).unwrap();
    let mut calls = 0;
    let mut deepest = 0;
    file.traverse(|node, ancestry| {
        if node.kind() == gocodemod_engine::cst::NodeKind::CallExpr {
            calls += 1;
        }
        deepest = deepest.max(ancestry.depth());
    });
    assert_eq!(calls, 4);
    assert!(deepest > 5);
}

#[test]
fn print_is_stable_after_one_pass() {
    for source in [CONTEXT_LAST, MAP_SOURCE, IF_SOURCE] {
        let first = SourceFile::new(source).unwrap().print();
        let second = SourceFile::new(&first).unwrap().print();
        assert_eq!(first, second);
    }
}
