//! Members of a mixin class that stand in for members of its target.

use remap::hir::{ClassRef, FieldRef, MethodRef, Symbol};
use remap::remap::names;
use remap::syntax::SyntaxKind;

use crate::helpers::{Fixture, class_symbol, trim_indent};

fn mixin_a() -> ClassRef {
    ClassRef::new("MixinA")
}

#[test]
fn test_remaps_shadow_members_and_their_uses() {
    let fixture = Fixture::java(
        r#"
        @org.spongepowered.asm.mixin.Mixin(a.pkg.A.class)
        abstract class MixinA {
            @org.spongepowered.asm.mixin.Shadow
            protected abstract a.pkg.A getA();
            @org.spongepowered.asm.mixin.Shadow
            private int aField;
            private void test() {
                this.getA();
                this.aField = 1;
                this.aOverloaded();
            }
            private void aOverloaded() {}
        }
        "#,
    );
    let get_a = Symbol::method(
        MethodRef::new(mixin_a(), "getA", "()La/pkg/A;").with_annotation(names::SHADOW),
    );
    let a_field = Symbol::field(FieldRef::new(mixin_a(), "aField", "I"));
    let own_method = Symbol::method(MethodRef::new(mixin_a(), "aOverloaded", "()V"));

    let shadow_method = fixture.span(("@", 1), ";");
    let shadow_field = fixture.span(("@", 2), ";");
    let result = fixture
        .mixin("MixinA")
        .method(shadow_method)
        .resolve(SyntaxKind::METHOD, shadow_method, get_a.clone())
        .resolve(SyntaxKind::REFERENCE, ("a.pkg.A", 1), class_symbol("a.pkg.A"))
        .field(shadow_field)
        .resolve(SyntaxKind::FIELD, shadow_field, a_field.clone())
        .resolve(SyntaxKind::REFERENCE_EXPR, "this.getA", get_a)
        .resolve(SyntaxKind::REFERENCE_EXPR, "this.aField", a_field)
        .resolve(SyntaxKind::REFERENCE_EXPR, "this.aOverloaded", own_method.clone())
        .resolve(SyntaxKind::METHOD, "private void aOverloaded() {}", own_method)
        .remap();

    assert_eq!(
        result.text,
        trim_indent(
            r#"
            @org.spongepowered.asm.mixin.Mixin(b.pkg.B.class)
            abstract class MixinA {
                @org.spongepowered.asm.mixin.Shadow
                protected abstract b.pkg.B getB();
                @org.spongepowered.asm.mixin.Shadow
                private int bField;
                private void test() {
                    this.getB();
                    this.bField = 1;
                    this.aOverloaded();
                }
                private void aOverloaded() {}
            }
            "#
        )
    );
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_remaps_string_targets_of_nested_classes() {
    for target in ["a.pkg.A$Inner", "a.pkg.A.Inner"] {
        let fixture = Fixture::java(&format!(
            r#"
            @Mixin(targets = "{target}")
            abstract class MixinA {{
                @Shadow
                private int aField;
                private void test() {{ this.aField = 1; }}
            }}
            "#
        ));
        let a_field = Symbol::field(FieldRef::new(mixin_a(), "aField", "I"));
        let shadow_field = fixture.span(("@", 1), ";");
        let result = fixture
            .mixin("MixinA")
            .field(shadow_field)
            .resolve(SyntaxKind::FIELD, shadow_field, a_field.clone())
            .resolve(SyntaxKind::REFERENCE_EXPR, "this.aField", a_field)
            .remap();

        assert_eq!(
            result.text,
            trim_indent(
                r#"
                @Mixin(targets = "b.pkg.B$Inner")
                abstract class MixinA {
                    @Shadow
                    private int bField;
                    private void test() { this.bField = 1; }
                }
                "#
            ),
            "target {target}"
        );
    }
}

#[test]
fn test_members_of_unmapped_mixin_target_are_untouched() {
    let source = r#"
        @Mixin(targets = "c.pkg.C")
        abstract class MixinA {
            @Shadow
            private int aField;
        }
        "#;
    let fixture = Fixture::java(source);
    let shadow_field = fixture.span(("@", 1), ";");
    let result = fixture
        .mixin("MixinA")
        .field(shadow_field)
        .resolve(
            SyntaxKind::FIELD,
            shadow_field,
            Symbol::field(FieldRef::new(mixin_a(), "aField", "I")),
        )
        .remap();

    assert_eq!(result.text, trim_indent(source));
}
