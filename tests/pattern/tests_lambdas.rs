//! Patterns containing lambda expressions.

use remap::hir::{JvmType, ResolvedFile};
use remap::syntax::SyntaxKind;
use remap::{TextRange, TextSize};

use super::{apply, call, pattern_source};
use crate::helpers::{Fixture, trim_indent, within};

/// A qualified callee such as `a.pkg.A.supplier`, one reference per prefix.
fn qualified_callee(fixture: Fixture, callee: &str) -> Fixture {
    let start = fixture.range(callee).start();
    let mut fixture = fixture.node(SyntaxKind::REFERENCE_EXPR, TextRange::at(start, TextSize::of(callee)));
    for (dot, _) in callee.match_indices('.') {
        fixture = fixture.node(SyntaxKind::REFERENCE_EXPR, TextRange::at(start, TextSize::from(dot as u32)));
    }
    fixture
}

fn pattern_class(body: &str) -> String {
    format!("class Patterns {{\n    @remap.Pattern\n    private Object pattern(String str) {{\n        {body}\n    }}\n}}")
}

fn matched_after() -> ResolvedFile {
    let source = pattern_class("return matched(str);");
    call(pattern_source(&source, &[Some(JvmType::string())]), "matched(str)", &[]).build()
}

fn target(statement: &str) -> Fixture {
    let text = format!("class Test {{\n    private void test() {{\n        {statement}\n    }}\n}}");
    Fixture::java(&text).node(SyntaxKind::EXPR_STMT, statement)
}

#[test]
fn test_matches_lambda_without_parameters() {
    let source = pattern_class("return a.pkg.A.supplier(() -> str);");
    let before = pattern_source(&source, &[Some(JvmType::string())])
        .node(SyntaxKind::METHOD_CALL, "a.pkg.A.supplier(() -> str)");
    let before = qualified_callee(before, "a.pkg.A.supplier")
        .node(SyntaxKind::ARG_LIST, "(() -> str)")
        .node(SyntaxKind::LAMBDA_EXPR, "() -> str")
        .node(SyntaxKind::PARAMETER_LIST, within("() -> str", "()"))
        .node(SyntaxKind::REFERENCE_EXPR, within("-> str", "str"))
        .build();

    let fixture = target(r#"a.pkg.A.supplier(() -> "test");"#)
        .node(SyntaxKind::METHOD_CALL, r#"a.pkg.A.supplier(() -> "test")"#);
    let fixture = qualified_callee(fixture, "a.pkg.A.supplier")
        .node(SyntaxKind::ARG_LIST, r#"(() -> "test")"#)
        .node(SyntaxKind::LAMBDA_EXPR, r#"() -> "test""#)
        .node(SyntaxKind::PARAMETER_LIST, within(r#"() -> "test""#, "()"))
        .typed(SyntaxKind::LITERAL, r#""test""#, JvmType::string());
    let result = apply(&before, &matched_after(), fixture);

    assert_eq!(
        result.text,
        trim_indent(
            r#"
            class Test {
                private void test() {
                    matched("test");
                }
            }
            "#
        )
    );
}

fn bound_parameter_pattern() -> ResolvedFile {
    let source = pattern_class("return a.pkg.A.function(s -> s + str);");
    let before = pattern_source(&source, &[Some(JvmType::string())])
        .node(SyntaxKind::METHOD_CALL, "a.pkg.A.function(s -> s + str)");
    qualified_callee(before, "a.pkg.A.function")
        .node(SyntaxKind::ARG_LIST, "(s -> s + str)")
        .node(SyntaxKind::LAMBDA_EXPR, "s -> s + str")
        .node(SyntaxKind::PARAMETER, within("s -> s + str", "s"))
        .node(SyntaxKind::BINARY_EXPR, "s + str")
        .node(SyntaxKind::REFERENCE_EXPR, within("s + str", "s"))
        .node(SyntaxKind::REFERENCE_EXPR, within("+ str", "str"))
        .build()
}

#[test]
fn test_matches_lambda_with_bound_parameter() {
    let fixture = target(r#"a.pkg.A.function(str -> str + "test");"#)
        .node(SyntaxKind::METHOD_CALL, r#"a.pkg.A.function(str -> str + "test")"#);
    let fixture = qualified_callee(fixture, "a.pkg.A.function")
        .node(SyntaxKind::ARG_LIST, r#"(str -> str + "test")"#)
        .node(SyntaxKind::LAMBDA_EXPR, r#"str -> str + "test""#)
        .node(SyntaxKind::PARAMETER, within(r#"str -> str + "test""#, "str"))
        .node(SyntaxKind::BINARY_EXPR, r#"str + "test""#)
        .typed(SyntaxKind::REFERENCE_EXPR, within(r#"str + "test""#, "str"), JvmType::string())
        .typed(SyntaxKind::LITERAL, r#""test""#, JvmType::string());
    let result = apply(&bound_parameter_pattern(), &matched_after(), fixture);

    assert_eq!(
        result.text,
        trim_indent(
            r#"
            class Test {
                private void test() {
                    matched("test");
                }
            }
            "#
        )
    );
}

#[test]
fn test_capture_cannot_read_lambda_parameter() {
    let statement = "a.pkg.A.function(x -> x + x);";
    let fixture = target(statement).node(SyntaxKind::METHOD_CALL, "a.pkg.A.function(x -> x + x)");
    let fixture = qualified_callee(fixture, "a.pkg.A.function")
        .node(SyntaxKind::ARG_LIST, "(x -> x + x)")
        .node(SyntaxKind::LAMBDA_EXPR, "x -> x + x")
        .node(SyntaxKind::PARAMETER, ("x", 0))
        .node(SyntaxKind::BINARY_EXPR, "x + x")
        .typed(SyntaxKind::REFERENCE_EXPR, ("x", 1), JvmType::string())
        .typed(SyntaxKind::REFERENCE_EXPR, ("x", 2), JvmType::string());
    let result = apply(&bound_parameter_pattern(), &matched_after(), fixture);

    assert!(result.text.contains(statement));
}
