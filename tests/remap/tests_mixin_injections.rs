//! Injector `method` attributes and `@At` targets of mixin classes.

use remap::hir::{ClassRef, FieldRef, Symbol, codes};
use remap::syntax::SyntaxKind;
use rstest::rstest;

use crate::helpers::{Fixture, trim_indent};

fn injector_mixin(injector: &str, method: &str) -> Fixture {
    Fixture::java(&format!(
        r#"
        @Mixin(a.pkg.A.class)
        class MixinA {{
            @{injector}(method = {method})
            private void test() {{}}
        }}
        "#
    ))
    .mixin("MixinA")
    .method_to(("@", 1), "{}")
}

fn expected(injector: &str, method: &str) -> String {
    trim_indent(&format!(
        r#"
        @Mixin(b.pkg.B.class)
        class MixinA {{
            @{injector}(method = {method})
            private void test() {{}}
        }}
        "#
    ))
}

#[rstest]
#[case("Inject")]
#[case("ModifyArg")]
#[case("ModifyArgs")]
#[case("ModifyConstant")]
#[case("ModifyVariable")]
#[case("Redirect")]
fn test_remaps_injector_target(#[case] injector: &str) {
    let result = injector_mixin(injector, r#""aMethod""#).remap();

    assert_eq!(result.text, expected(injector, r#""bMethod""#));
    assert!(result.diagnostics.is_empty());
}

#[rstest]
#[case(r#""aInterfaceMethod""#, r#""bInterfaceMethod""#)]
#[case(r#""aOverloaded()V""#, r#""bOverloaded()V""#)]
#[case(r#""aOverloaded(I)V""#, r#""bOverloaded(I)V""#)]
#[case(r#""commonOverloaded(La/pkg/A;)V""#, r#""commonOverloaded(Lb/pkg/B;)V""#)]
#[case(r#""unmappedOverloaded(La/pkg/A;)V""#, r#""unmappedOverloaded(Lb/pkg/B;)V""#)]
#[case(r#""<init>()V""#, r#""<init>()V""#)]
#[case(r#""<init>(La/pkg/A;)V""#, r#""<init>(Lb/pkg/B;)V""#)]
#[case(r#"{"aMethod", "aInterfaceMethod"}"#, r#"{"bMethod", "bInterfaceMethod"}"#)]
#[case(r#""unknownMethod""#, r#""unknownMethod""#)]
#[case(r#""missingMethod(La/pkg/A;)V""#, r#""missingMethod(Lb/pkg/B;)V""#)]
fn test_remaps_injector_selector(#[case] before: &str, #[case] after: &str) {
    let result = injector_mixin("Inject", before).remap();

    assert_eq!(result.text, expected("Inject", after));
    assert!(!result.has_errors());
}

#[test]
fn test_reports_ambiguous_overload() {
    let result = injector_mixin("Inject", r#""aOverloaded""#).remap();

    let errors: Vec<_> = result.errors().collect();
    assert_eq!(errors.len(), 1);
    let error = errors[0];
    assert_eq!(error.code.as_deref(), Some(codes::AMBIGUOUS_INJECTION_TARGET));
    assert_eq!(error.line, 2);
    assert!(error.message.contains("\"aOverloaded\""));
    assert!(error.message.contains("aOverloaded(I)V"));
    assert!(error.message.contains("aOverloaded(Z)V"));
}

#[test]
fn test_remaps_constant_used_as_target_once() {
    let fixture = Fixture::java(
        r#"
        @Mixin(a.pkg.A.class)
        class MixinA {
            private static final String TARGET = "aMethod";
            @Inject(method = TARGET)
            private void first() {}
            @Redirect(method = TARGET)
            private void second() {}
        }
        "#,
    );
    let target = Symbol::field(FieldRef::new(
        ClassRef::new("MixinA"),
        "TARGET",
        "Ljava/lang/String;",
    ));
    let result = fixture
        .mixin("MixinA")
        .resolve(
            SyntaxKind::FIELD,
            r#"private static final String TARGET = "aMethod";"#,
            target.clone(),
        )
        .node(SyntaxKind::LITERAL, r#""aMethod""#)
        .method_to(("@", 1), "{}")
        .method_to(("@", 2), "{}")
        .resolve(SyntaxKind::REFERENCE_EXPR, ("TARGET", 1), target.clone())
        .resolve(SyntaxKind::REFERENCE_EXPR, ("TARGET", 2), target)
        .remap();

    assert_eq!(
        result.text,
        trim_indent(
            r#"
            @Mixin(b.pkg.B.class)
            class MixinA {
                private static final String TARGET = "bMethod";
                @Inject(method = TARGET)
                private void first() {}
                @Redirect(method = TARGET)
                private void second() {}
            }
            "#
        )
    );
    assert!(result.diagnostics.is_empty());
    assert!(result.conflicts.is_empty());
}

#[test]
fn test_remaps_at_targets() {
    let result = Fixture::java(
        r#"
        @Mixin(a.pkg.A.class)
        class MixinA {
            @Inject(method = "aMethod", at = @At(value = "INVOKE", target = "La/pkg/A;aOverloaded(I)V"))
            private void invoke() {}
            @Inject(method = "aMethod", at = @At(value = "FIELD", target = "La/pkg/A;aField:I"))
            private void field() {}
            @Inject(method = "aMethod", at = @At(value = "NEW", target = "La/pkg/A;"))
            private void create() {}
            @Inject(method = "aMethod", at = @At(value = "INVOKE", target = "Lc/pkg/C;aMethod()V"))
            private void unrelated() {}
        }
        "#,
    )
    .mixin("MixinA")
    .method_to(("@Inject", 0), "{}")
    .method_to(("@Inject", 1), "{}")
    .method_to(("@Inject", 2), "{}")
    .method_to(("@Inject", 3), "{}")
    .remap();

    assert_eq!(
        result.text,
        trim_indent(
            r#"
            @Mixin(b.pkg.B.class)
            class MixinA {
                @Inject(method = "bMethod", at = @At(value = "INVOKE", target = "Lb/pkg/B;bOverloaded(I)V"))
                private void invoke() {}
                @Inject(method = "bMethod", at = @At(value = "FIELD", target = "Lb/pkg/B;bField:I"))
                private void field() {}
                @Inject(method = "bMethod", at = @At(value = "NEW", target = "Lb/pkg/B;"))
                private void create() {}
                @Inject(method = "bMethod", at = @At(value = "INVOKE", target = "Lc/pkg/C;aMethod()V"))
                private void unrelated() {}
            }
            "#
        )
    );
}

#[test]
fn test_non_ascii_at_target_keeps_unparsed_descriptor() {
    let result = Fixture::java(
        r#"
        @Mixin(a.pkg.A.class)
        class MixinA {
            @Inject(method = "aMethod", at = @At(value = "INVOKE", target = "La/pkg/A;aMethod(é)V"))
            private void invoke() {}
        }
        "#,
    )
    .mixin("MixinA")
    .method_to(("@", 1), "{}")
    .remap();

    assert_eq!(
        result.text,
        trim_indent(
            r#"
            @Mixin(b.pkg.B.class)
            class MixinA {
                @Inject(method = "bMethod", at = @At(value = "INVOKE", target = "Lb/pkg/B;aMethod(é)V"))
                private void invoke() {}
            }
            "#
        )
    );
}

#[test]
fn test_remaps_string_target_class() {
    let result = Fixture::java(
        r#"
        @Mixin(targets = "a.pkg.A")
        class MixinA {
            @Inject(method = "aMethod")
            private void test() {}
        }
        "#,
    )
    .mixin("MixinA")
    .method_to(("@", 1), "{}")
    .remap();

    assert_eq!(
        result.text,
        trim_indent(
            r#"
            @Mixin(targets = "b.pkg.B")
            class MixinA {
                @Inject(method = "bMethod")
                private void test() {}
            }
            "#
        )
    );
}
