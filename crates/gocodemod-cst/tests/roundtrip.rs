// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Round-trip tests for the gocodemod-cst parser and printer.
//!
//! Fixtures in `tests/fixtures/` are already gofmt-formatted, so printing a
//! parsed fixture must reproduce it byte for byte. Unformatted inputs must
//! reach a fixed point after one print.

use difference::assert_diff;
use gocodemod_cst::{parse_file, prettify_error, print_file};
use itertools::Itertools;
use std::path::PathBuf;

/// Make whitespace visible in diffs.
fn visualize(s: &str) -> String {
    s.replace('\t', "→").replace(' ', "▩").lines().join("↩\n")
}

fn format(input: &str, label: &str) -> String {
    match parse_file(input) {
        Ok(parsed) => print_file(&parsed),
        Err(e) => panic!("{}", prettify_error(&e, input, label)),
    }
}

fn assert_roundtrip(input: &str, label: &str) {
    let generated = format(input, label);
    if generated != input {
        let got = visualize(&generated);
        let expected = visualize(input);
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
}

fn assert_idempotent(input: &str, label: &str) {
    let once = format(input, label);
    let twice = format(&once, label);
    if once != twice {
        let (once, twice) = (visualize(&once), visualize(&twice));
        assert_diff!(once.as_ref(), twice.as_ref(), "", 0);
    }
}

fn assert_roundtrip_fixture(fixture_name: &str) {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(fixture_name);

    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", fixture_name, e));

    assert_roundtrip(&contents, fixture_name);
}

// =============================================================================
// Fixture-based round-trip tests
// =============================================================================

#[test]
fn roundtrip_fixture_declarations() {
    assert_roundtrip_fixture("declarations.go");
}

#[test]
fn roundtrip_fixture_statements() {
    assert_roundtrip_fixture("statements.go");
}

#[test]
fn roundtrip_fixture_expressions() {
    assert_roundtrip_fixture("expressions.go");
}

#[test]
fn roundtrip_fixture_comments() {
    assert_roundtrip_fixture("comments.go");
}

#[test]
fn roundtrip_fixture_generics() {
    assert_roundtrip_fixture("generics.go");
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn normalizes_spacing_and_indentation() {
    let input = "package main\nimport \"fmt\"\nfunc main(){\n    x:=1+2\n  if x>2{fmt.Println( x )}\n}\n";
    let expected =
        "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tx := 1 + 2\n\tif x > 2 {\n\t\tfmt.Println(x)\n\t}\n}\n";
    let got = format(input, "spacing.go");
    let (expected, got) = (visualize(expected), visualize(&got));
    assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
}

#[test]
fn collapses_blank_line_runs() {
    let input = "package p\n\n\n\nvar a = 1\n\n\n\nvar b = 2\n";
    assert_eq!(format(input, "blank.go"), "package p\n\nvar a = 1\n\nvar b = 2\n");
}

#[test]
fn keeps_closing_brace_after_last_element() {
    let input = "package p\n\nvar x = []int{\n\t1,\n\t2}\n";
    assert_eq!(format(input, "brace.go"), input);
}

#[test]
fn printing_is_idempotent() {
    let inputs = [
        "package p\nfunc f(a,b int)(int,error){return a+b,nil}\n",
        "package p\ntype T struct{a int;bb string `tag`\n}\n",
        "package p\nvar m=map[string]int{\"a\":1,\n\"bbb\":2}\n",
        "package p\nfunc f(){switch x{case 1:g()\ndefault:}}\n",
        "package p\n// doc\nfunc f(){// opening\ng()/* inline */\n}\n",
    ];
    for (i, input) in inputs.iter().enumerate() {
        assert_idempotent(input, &format!("input{i}.go"));
    }
}

#[test]
fn fixtures_are_idempotent() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let names = ["declarations.go", "statements.go", "expressions.go"];
    for name in names {
        let contents = std::fs::read_to_string(dir.join(name)).unwrap();
        assert_idempotent(&contents, name);
    }
}

#[test]
fn invalid_source_is_an_error() {
    for input in ["", "package", "package p\nfunc (", "package p\nvar x = )\n"] {
        assert!(parse_file(input).is_err(), "expected error for {input:?}");
    }
}
