use remap::hir::{JvmType, PreResolved, Resolution, ResolvedFile, Symbol, codes};
use remap::syntax::SyntaxKind;
use remap::{RemapConfig, RemapError, Source, Transformer};

use crate::helpers::{Fixture, MAPPINGS, a_method, class_symbol, trim_indent, within};
use crate::pattern::{PATTERN, pattern_file};

fn reference_file(file_name: &str) -> ResolvedFile {
    Fixture::new(
        file_name,
        r#"
        class Test {
            a.pkg.A field;
        }
        "#,
    )
    .resolve(SyntaxKind::REFERENCE, "a.pkg.A", class_symbol("a.pkg.A"))
    .build()
}

fn unresolvable_accessor(file_name: &str) -> ResolvedFile {
    Fixture::new(
        file_name,
        r#"
        @Mixin(a.pkg.A.class)
        interface MixinA {
            @Accessor
            int field();
        }
        "#,
    )
    .mixin("MixinA")
    .method_to(("@", 1), ";")
    .build()
}

fn source_of(file: &ResolvedFile) -> Source {
    Source::new(file.file_name(), file.text())
}

#[test]
fn test_unmapped_file_is_unchanged() {
    let source = r#"
        class Test {
            c.pkg.C field;
            void test() { field.run(); }
        }
        "#;
    let file = Fixture::new("Test.java", source)
        .resolve(SyntaxKind::REFERENCE, "c.pkg.C", class_symbol("c.pkg.C"))
        .build();
    let output = Transformer::new(MAPPINGS.clone()).remap(&[file]);

    assert_eq!(output.text("Test.java"), Some(trim_indent(source).as_str()));
    assert!(output.is_success());
    assert!(output.get("Test.java").unwrap().diagnostics.is_empty());
}

#[test]
fn test_remapping_is_idempotent_on_its_output() {
    let transformer = Transformer::new(MAPPINGS.clone());
    let first = transformer.remap_file(&reference_file("Test.java"));
    assert!(first.text.contains("b.pkg.B field;"));

    // The rewritten text no longer refers to anything mapped.
    let again = Fixture::new("Test.java", &first.text)
        .resolve(SyntaxKind::REFERENCE, "b.pkg.B", class_symbol("b.pkg.B"))
        .build();
    let second = transformer.remap_file(&again);
    assert_eq!(second.text, first.text);
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let files = [reference_file("Test.java"), unresolvable_accessor("MixinA.java")];
    let run = || Transformer::new(MAPPINGS.clone()).remap(&files);
    let (first, second) = (run(), run());

    assert_eq!(first, second);
    for (name, result) in first.iter() {
        assert_eq!(second.text(name).map(str::as_bytes), Some(result.text.as_bytes()));
    }
}

#[test]
fn test_parallel_run_matches_sequential_run() {
    let files: Vec<ResolvedFile> = (0..24)
        .map(|i| {
            if i % 5 == 0 {
                unresolvable_accessor(&format!("Mixin{i}.java"))
            } else {
                reference_file(&format!("File{i}.java"))
            }
        })
        .collect();

    let sequential = Transformer::new(MAPPINGS.clone())
        .with_config(RemapConfig::new().with_parallel(false))
        .remap(&files);
    let parallel = Transformer::new(MAPPINGS.clone())
        .with_config(RemapConfig::new().with_parallel(true))
        .remap(&files);

    assert_eq!(sequential, parallel);
    let names: Vec<&str> = parallel.iter().map(|(name, _)| name).collect();
    let expected: Vec<&str> = files.iter().map(|f| f.file_name()).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_errors_are_reported_per_file() {
    let files = [reference_file("Test.java"), unresolvable_accessor("MixinA.java")];
    let output = Transformer::new(MAPPINGS.clone()).remap(&files);

    assert_eq!(output.len(), 2);
    assert!(!output.is_success());
    let errors: Vec<_> = output.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, "MixinA.java");
    assert_eq!(errors[0].1.code.as_deref(), Some(codes::UNKNOWN_ACCESSOR_TARGET));
    assert!(output.get("Test.java").is_some_and(|r| !r.has_errors()));
    assert_eq!(output.text("Test.java"), Some("class Test {\n    b.pkg.B field;\n}"));
}

#[test]
fn test_remaps_sources_through_resolution_service() {
    let first = reference_file("First.java");
    let second = reference_file("Second.java");
    let sources = [source_of(&first), source_of(&second)];
    let service = PreResolved::new().with(first).with(second);

    let output = Transformer::new(MAPPINGS.clone())
        .remap_sources(&service, &sources)
        .unwrap();

    assert_eq!(output.len(), 2);
    for (_, result) in output.iter() {
        assert_eq!(result.text, "class Test {\n    b.pkg.B field;\n}");
    }
}

#[test]
fn test_remap_sources_fails_on_unresolvable_source() {
    let file = reference_file("Test.java");
    let service = PreResolved::new().with(file.clone());
    let transformer = Transformer::new(MAPPINGS.clone());

    let changed = Source::new("Test.java", format!("{}\n", file.text()));
    let err = transformer.remap_sources(&service, &[changed]).unwrap_err();
    assert!(matches!(err, RemapError::Resolution { ref file, .. } if file == "Test.java"));

    let unknown = Source::new("Other.java", file.text());
    let err = transformer.remap_sources(&service, &[unknown]).unwrap_err();
    assert!(matches!(err, RemapError::Resolution { ref file, .. } if file == "Other.java"));
}

fn pattern_pair() -> (ResolvedFile, ResolvedFile) {
    let a = Some(JvmType::class("a.pkg.A"));
    let before = pattern_file(
        "Before.java",
        r#"
        class Patterns {
            @remap.Pattern
            private void toParent(a.pkg.A a) {
                a.aMethod();
            }
        }
        "#,
        std::slice::from_ref(&a),
    )
    .node(SyntaxKind::METHOD_CALL, "a.aMethod()")
    .node(SyntaxKind::REFERENCE_EXPR, "a.aMethod")
    .node(SyntaxKind::REFERENCE_EXPR, within("a.aMethod", "a"))
    .node(SyntaxKind::ARG_LIST, within("a.aMethod()", "()"))
    .build();
    let after = pattern_file(
        "After.java",
        r#"
        class Patterns {
            @remap.Pattern
            private void toParent(a.pkg.A a) {
                a.aParentMethod();
            }
        }
        "#,
        &[a],
    )
    .node(SyntaxKind::REFERENCE_EXPR, within("a.aParentMethod", "a"))
    .build();
    (before, after)
}

#[test]
fn test_load_patterns_requires_an_annotation() {
    let (before, after) = pattern_pair();
    let sources = (source_of(&before), source_of(&after));
    let service = PreResolved::new().with(before).with(after);

    let mut transformer = Transformer::new(MAPPINGS.clone());
    let count = transformer.load_patterns(&service, &sources.0, &sources.1).unwrap();
    assert_eq!(count, 0);
    assert!(transformer.patterns().is_empty());
}

#[test]
fn test_loaded_patterns_apply_to_later_runs() {
    let (before, after) = pattern_pair();
    let target = Fixture::new(
        "Test.java",
        r#"
        class Test {
            void test(a.pkg.A x) {
                x.aMethod();
            }
        }
        "#,
    )
    .resolve(SyntaxKind::REFERENCE, "a.pkg.A", class_symbol("a.pkg.A"))
    .node(SyntaxKind::EXPR_STMT, "x.aMethod();")
    .node(SyntaxKind::METHOD_CALL, "x.aMethod()")
    .resolve(
        SyntaxKind::REFERENCE_EXPR,
        "x.aMethod",
        Symbol::method(a_method("aMethod", "()V")),
    )
    .typed(SyntaxKind::REFERENCE_EXPR, within("x.aMethod", "x"), JvmType::class("a.pkg.A"))
    .node(SyntaxKind::ARG_LIST, within("x.aMethod()", "()"))
    .build();

    let sources = [source_of(&before), source_of(&after), source_of(&target)];
    let service = PreResolved::new().with(before).with(after).with(target);

    let mut transformer = Transformer::new(MAPPINGS.clone())
        .with_config(RemapConfig::new().with_pattern_annotation(PATTERN));
    let count = transformer.load_patterns(&service, &sources[0], &sources[1]).unwrap();
    assert_eq!(count, 1);
    assert_eq!(transformer.patterns().len(), 1);

    let output = transformer.remap_sources(&service, &sources[2..]).unwrap();
    assert_eq!(
        output.text("Test.java"),
        Some(
            trim_indent(
                r#"
                class Test {
                    void test(b.pkg.B x) {
                        x.aParentMethod();
                    }
                }
                "#
            )
            .as_str()
        )
    );
}
