//! Applying codemods to a temporary Go project.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use gocodemod::engine::cst::Expr;
use gocodemod::{apply_to_directory, ApplyConfig, ApplyError, Codemod};
use tempfile::TempDir;

const MAIN_GO: &str = r#"package main

import "errors"

func main() {
	_ = errors.New("oops")
}
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.go", MAIN_GO);
    write(dir.path(), "go.mod", "module example.com/app/v1\n\ngo 1.21\n");
    write(dir.path(), "vendor/lib/lib.go", MAIN_GO);
    dir
}

fn errors_new_to_fmt_errorf() -> Codemod {
    Codemod::source_file("errors.New -> fmt.Errorf", |file| {
        let mut changed = false;
        for mut call in file.function_calls().into_values().flatten() {
            if call.function_name() == "errors.New" {
                call.edit(file, |call| {
                    call.fun = Expr::selector(Expr::ident("fmt"), "Errorf");
                })
                .unwrap();
                changed = true;
            }
        }
        if changed {
            file.imports().remove("errors");
            file.imports().add("fmt");
        }
    })
}

#[test]
fn rewrites_go_files_and_replaces_text_everywhere() {
    let dir = project();
    let config = ApplyConfig::for_root(dir.path()).with_replacement(r"app/v1", "app/v2");

    let report = apply_to_directory(&config, &[errors_new_to_fmt_errorf()]).unwrap();

    let main = read(dir.path(), "main.go");
    assert!(main.contains("\"fmt\""), "{}", main);
    assert!(main.contains("\t_ = fmt.Errorf(\"oops\")\n"), "{}", main);
    assert!(!main.contains("errors"));
    assert!(read(dir.path(), "go.mod").starts_with("module example.com/app/v2\n"));

    assert_eq!(
        report.visited,
        [PathBuf::from("go.mod"), PathBuf::from("main.go")]
    );
    assert_eq!(report.rewritten, report.visited);
}

#[test]
fn vendored_files_are_left_alone() {
    let dir = project();
    let config = ApplyConfig::for_root(dir.path());
    let report = apply_to_directory(&config, &[errors_new_to_fmt_errorf()]).unwrap();

    assert_eq!(read(dir.path(), "vendor/lib/lib.go"), MAIN_GO);
    assert!(report
        .visited
        .iter()
        .all(|path| !path.starts_with("vendor")));
}

#[test]
fn nothing_to_apply_returns_an_empty_report() {
    let dir = project();
    let report = apply_to_directory(&ApplyConfig::for_root(dir.path()), &[]).unwrap();
    assert!(report.visited.is_empty());
    assert!(report.is_unchanged());
    assert_eq!(read(dir.path(), "main.go"), MAIN_GO);
}

#[test]
fn unchanged_files_are_visited_but_not_written() {
    let dir = project();
    let config = ApplyConfig::for_root(dir.path()).with_replacement("no such text", "x");
    let report = apply_to_directory(&config, &[]).unwrap();
    assert_eq!(report.visited.len(), 2);
    assert!(report.is_unchanged());
}

#[test]
fn panicking_codemod_is_reported_with_its_file() {
    let dir = project();
    let codemod = Codemod::source_file("needs a config assignment", |file| {
        if file.find_assignments("config").is_empty() {
            panic!("no config assignment");
        }
    });
    let err = apply_to_directory(&ApplyConfig::for_root(dir.path()), &[codemod]).unwrap_err();
    match err {
        ApplyError::CodemodPanicked {
            path,
            description,
            message,
        } => {
            assert_eq!(path, PathBuf::from("main.go"));
            assert_eq!(description, "needs a config assignment");
            assert_eq!(message, "no config assignment");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(read(dir.path(), "main.go"), MAIN_GO);
}

#[test]
fn unparsable_go_file_is_an_error() {
    let dir = project();
    write(dir.path(), "broken.go", "package main\n\nfunc {\n");
    let err = apply_to_directory(
        &ApplyConfig::for_root(dir.path()),
        &[errors_new_to_fmt_errorf()],
    )
    .unwrap_err();
    assert!(matches!(err, ApplyError::Codemod { .. }));
    assert_eq!(err.path(), Some(&PathBuf::from("broken.go")));
}

#[test]
fn project_codemods_run_once_before_the_walk() {
    let dir = project();
    let runs = Rc::new(Cell::new(0));
    let seen = Rc::clone(&runs);
    let codemods = [
        Codemod::project("add a file", move |project| {
            seen.set(seen.get() + 1);
            fs::write(project.root().join("extra.go"), "package main\n").unwrap();
        }),
        Codemod::source_file("rename package", |file| file.set_package_name("app")),
    ];

    let report = apply_to_directory(&ApplyConfig::for_root(dir.path()), &codemods).unwrap();

    assert_eq!(runs.get(), 1);
    assert_eq!(read(dir.path(), "extra.go"), "package app\n");
    assert!(read(dir.path(), "main.go").starts_with("package app\n"));
    assert!(report.rewritten.contains(&PathBuf::from("extra.go")));
}

#[test]
fn config_loaded_from_json_file() {
    let dir = project();
    let config_path = dir.path().join("gocodemod.json");
    fs::write(
        &config_path,
        format!(
            r#"{{"root": {:?}, "skip": ["vendor", "gocodemod.json"], "replacements": {{"1\\.21": "1.22"}}}}"#,
            dir.path().to_str().unwrap()
        ),
    )
    .unwrap();

    let config = ApplyConfig::from_json_file(&config_path).unwrap();
    let report = apply_to_directory(&config, &[]).unwrap();

    assert_eq!(report.rewritten, [PathBuf::from("go.mod")]);
    assert!(read(dir.path(), "go.mod").ends_with("go 1.22\n"));
}
