//! Mixin annotation rewriter.
//!
//! For every `@Mixin` class of a Java file: remap `@At(target = ...)`
//! selectors, find and register the target class mapping, then rewrite
//! accessor/invoker arguments and injector `method` attributes.

use std::sync::Arc;

use smol_str::SmolStr;
use text_size::TextRange;

use super::context::RemapContext;
use crate::base::text_utils::{accessor_target, escape_string};
use crate::hir::{ClassInfo, MethodRef, Symbol};
use crate::mapping::{
    ClassMapping, MemberKind, MemberSelector, remap_internal_type, remap_method_descriptor,
    remap_type,
};
use crate::syntax::ast::{self, AstNode};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// Qualified names of the annotations the rewriter understands.
pub mod names {
    pub const MIXIN: &str = "org.spongepowered.asm.mixin.Mixin";
    pub const SHADOW: &str = "org.spongepowered.asm.mixin.Shadow";
    pub const OVERWRITE: &str = "org.spongepowered.asm.mixin.Overwrite";
    pub const OVERRIDE: &str = "java.lang.Override";
    pub const ACCESSOR: &str = "org.spongepowered.asm.mixin.gen.Accessor";
    pub const INVOKER: &str = "org.spongepowered.asm.mixin.gen.Invoker";
    pub const AT: &str = "org.spongepowered.asm.mixin.injection.At";

    /// Annotations whose `method` attribute names a target method.
    pub const INJECTORS: [&str; 6] = [
        "org.spongepowered.asm.mixin.injection.Inject",
        "org.spongepowered.asm.mixin.injection.ModifyArg",
        "org.spongepowered.asm.mixin.injection.ModifyArgs",
        "org.spongepowered.asm.mixin.injection.ModifyConstant",
        "org.spongepowered.asm.mixin.injection.ModifyVariable",
        "org.spongepowered.asm.mixin.injection.Redirect",
    ];
}

/// Run the mixin pass over a Java file.
pub(crate) fn remap_mixins(cx: &mut RemapContext<'_>, root: &SyntaxNode) {
    let classes: Vec<ast::Class> = root.descendants().filter_map(ast::Class::cast).collect();
    for class in classes {
        let Some(annotation) = class
            .modifiers()
            .and_then(|m| m.annotations().find(|a| is_annotation(cx, a, names::MIXIN)))
        else {
            continue;
        };

        remap_at_targets(cx, root);

        let Some(qualified_name) = class_name(cx, &class) else {
            tracing::debug!(file = %cx.file.file_name(), "unresolved mixin class");
            continue;
        };
        let Some((mapping, target)) = find_target(cx, &annotation) else {
            continue;
        };
        tracing::debug!(
            mixin = %qualified_name,
            target = %mapping.obfuscated_name(),
            "registered mixin"
        );
        cx.mixins.insert(qualified_name, mapping);

        if mapping.has_fields() || mapping.has_methods() {
            remap_accessors(cx, class.syntax(), mapping);
        }
        if mapping.has_methods() {
            match target {
                Some(target) => remap_injections(cx, class.syntax(), mapping, &target),
                None => tracing::debug!(
                    target = %mapping.obfuscated_name(),
                    "mixin target not on classpath, skipping injectors"
                ),
            }
        }
    }
}

fn class_name(cx: &RemapContext<'_>, class: &ast::Class) -> Option<SmolStr> {
    match cx.file.resolve(class.syntax())? {
        Symbol::Class(class) => Some(class.qualified_name),
        _ => None,
    }
}

fn is_annotation(cx: &RemapContext<'_>, annotation: &ast::Annotation, qualified_name: &str) -> bool {
    cx.file.is_annotation(annotation, qualified_name)
}

fn attribute(annotation: &ast::Annotation, name: &str) -> Option<ast::AnnotationAttr> {
    annotation
        .attributes()
        .into_iter()
        .find(|attr| attr.name_text().as_deref() == Some(name))
}

fn value_attribute(annotation: &ast::Annotation) -> Option<ast::AnnotationAttr> {
    annotation.attributes().into_iter().find(|attr| attr.is_value())
}

/// First element of an array initializer, or the value itself.
fn single_value(value: SyntaxNode) -> Option<SyntaxNode> {
    match ast::ArrayInit::cast(value.clone()) {
        Some(array) => array.elements().next(),
        None => Some(value),
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", escape_string(value))
}

// ============================================================================
// TARGET
// ============================================================================

/// Mapping of the patched class, and its class information when known.
fn find_target<'a>(
    cx: &mut RemapContext<'a>,
    annotation: &ast::Annotation,
) -> Option<(&'a ClassMapping, Option<Arc<ClassInfo>>)> {
    let class_literal = value_attribute(annotation)
        .and_then(|attr| attr.value())
        .and_then(single_value)
        .and_then(ast::ClassLiteral::cast);
    if let Some(literal) = class_literal {
        let reference = literal.reference()?;
        let Some(Symbol::Class(class)) = cx.file.resolve(&reference) else {
            return None;
        };
        let mapping = cx.mappings.lookup_class(&class.binary_name)?;
        return Some((mapping, cx.file.find_class(&class.binary_name)));
    }

    let literal = attribute(annotation, "targets")
        .and_then(|attr| attr.value())
        .and_then(single_value)
        .and_then(ast::Literal::cast)?;
    let target = literal.string_value()?;
    let mapping = cx.mappings.potential_inner_class(&target)?;
    let mapped = mapping.deobfuscated_binary_name();
    let range = literal.syntax().text_range();
    if mapped != target && cx.is_free(range) {
        cx.replace(range, &quoted(&mapped));
    }
    Some((mapping, cx.file.find_class(&target)))
}

// ============================================================================
// INJECTION POINTS
// ============================================================================

/// Rewrite the `target` selector of every `@At` in the file.
fn remap_at_targets(cx: &mut RemapContext<'_>, root: &SyntaxNode) {
    let annotations: Vec<ast::Annotation> = root
        .descendants()
        .filter_map(ast::Annotation::cast)
        .filter(|a| is_annotation(cx, a, names::AT))
        .collect();
    for annotation in annotations {
        let Some(literal) = attribute(&annotation, "target")
            .and_then(|attr| attr.value())
            .and_then(ast::Literal::cast)
        else {
            continue;
        };
        let Some(target) = literal.string_value() else {
            continue;
        };
        let range = literal.syntax().text_range();
        let mapped = remap_mixin_target(cx, &target);
        if mapped != target && cx.is_free(range) {
            cx.replace(range, &quoted(&mapped));
        }
    }
}

/// Remap an injection point selector: a member selector, a type
/// descriptor or a bare internal class name.
fn remap_mixin_target(cx: &RemapContext<'_>, target: &str) -> String {
    if let Some(selector) = MemberSelector::parse(target) {
        return remap_member_selector(cx, &selector);
    }
    if (target.starts_with('L') && target.ends_with(';')) || target.starts_with('[') {
        return remap_type(cx.mappings, target);
    }
    match cx.mappings.lookup_class(target) {
        Some(mapping) => mapping.deobfuscated_name().to_string(),
        None => target.to_string(),
    }
}

fn remap_member_selector(cx: &RemapContext<'_>, selector: &MemberSelector<'_>) -> String {
    let mut out = String::new();
    let owner_mapping = remap_internal_type(cx.mappings, selector.owner, &mut out);

    let mapped = match selector.kind {
        MemberKind::Method(descriptor) => {
            let members = cx.members();
            selector
                .owner_name()
                .and_then(|owner| members.find_method_in_hierarchy(owner, selector.name, descriptor))
                .and_then(|method| members.method_mapping(&method))
                .or_else(|| owner_mapping.and_then(|m| m.lookup_method(selector.name, descriptor)))
        }
        MemberKind::Field(_) => owner_mapping.and_then(|m| m.lookup_field(selector.name)),
    };
    out.push_str(mapped.unwrap_or(selector.name));

    match selector.kind {
        MemberKind::Method(descriptor) => {
            out.push_str(&remap_method_descriptor(cx.mappings, descriptor));
        }
        MemberKind::Field(ty) => {
            out.push(':');
            remap_internal_type(cx.mappings, ty, &mut out);
        }
    }
    out
}

// ============================================================================
// ACCESSORS AND INVOKERS
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum AccessorKind {
    Accessor,
    Invoker,
}

fn remap_accessors(cx: &mut RemapContext<'_>, class: &SyntaxNode, mapping: &ClassMapping) {
    let methods: Vec<ast::Method> = class.descendants().filter_map(ast::Method::cast).collect();
    for method in methods {
        for annotation in method.annotations() {
            let kind = if is_annotation(cx, &annotation, names::ACCESSOR) {
                AccessorKind::Accessor
            } else if is_annotation(cx, &annotation, names::INVOKER) {
                AccessorKind::Invoker
            } else {
                continue;
            };
            remap_accessor(cx, &method, &annotation, kind, mapping);
        }
    }
}

fn remap_accessor(
    cx: &mut RemapContext<'_>,
    method: &ast::Method,
    annotation: &ast::Annotation,
    kind: AccessorKind,
    mapping: &ClassMapping,
) {
    let method_name = method.name().map(|t| t.text().to_string()).unwrap_or_default();
    let target_by_name = accessor_target(&method_name);
    let explicit = value_attribute(annotation)
        .and_then(|attr| attr.value())
        .and_then(ast::Literal::cast)
        .and_then(|literal| literal.string_value());

    let Some(target) = explicit.or_else(|| target_by_name.clone()) else {
        cx.session
            .diagnostics
            .unknown_accessor_target(annotation.syntax().text_range().start(), &method_name);
        return;
    };

    let mapped = match kind {
        AccessorKind::Invoker => mapping.lookup_method_by_name(&target),
        AccessorKind::Accessor => mapping.lookup_field(&target),
    };
    let Some(mapped) = mapped else {
        return;
    };
    if mapped == target {
        return;
    }

    let replacement = if target_by_name.as_deref() == Some(mapped) {
        String::new()
    } else {
        format!("({})", quoted(mapped))
    };
    let range = match annotation.args() {
        Some(args) => args.syntax().text_range(),
        None => TextRange::empty(annotation.syntax().text_range().end()),
    };
    cx.replace(range, &replacement);
}

// ============================================================================
// INJECTORS
// ============================================================================

fn remap_injections(
    cx: &mut RemapContext<'_>,
    class: &SyntaxNode,
    mapping: &ClassMapping,
    target: &ClassInfo,
) {
    let methods: Vec<ast::Method> = class.descendants().filter_map(ast::Method::cast).collect();
    for method in methods {
        for annotation in method.annotations() {
            if !names::INJECTORS.iter().any(|name| is_annotation(cx, &annotation, name)) {
                continue;
            }
            let Some(attr) = attribute(&annotation, "method") else {
                continue;
            };
            let Some(value) = attr.value() else {
                continue;
            };
            let values: Vec<SyntaxNode> = match ast::ArrayInit::cast(value.clone()) {
                Some(array) => array.elements().collect(),
                None => vec![value],
            };
            for value in values {
                remap_injection_target(cx, &attr, &value, mapping, target);
            }
        }
    }
}

/// The string literal an injector's `method` value stands for: the value
/// itself, or the initializer of a constant declared in this file.
fn injection_literal(cx: &RemapContext<'_>, value: &SyntaxNode) -> Option<ast::Literal> {
    match value.kind() {
        SyntaxKind::LITERAL => ast::Literal::cast(value.clone()),
        SyntaxKind::REFERENCE_EXPR => {
            let symbol = cx.file.resolve(value)?;
            if !matches!(symbol, Symbol::Field(_)) {
                return None;
            }
            let field = ast::Field::cast(cx.file.declaration_of(&symbol)?)?;
            ast::Literal::cast(field.initializer()?)
        }
        _ => None,
    }
}

fn remap_injection_target(
    cx: &mut RemapContext<'_>,
    attr: &ast::AnnotationAttr,
    value: &SyntaxNode,
    mapping: &ClassMapping,
    target: &ClassInfo,
) {
    let Some(literal) = injection_literal(cx, value) else {
        return;
    };
    let Some(selector) = literal.string_value() else {
        return;
    };
    let (name, descriptor) = match selector.find('(') {
        Some(paren) => (&selector[..paren], Some(&selector[paren..])),
        None => (selector.as_str(), None),
    };

    let candidates: Vec<&MethodRef> = target.methods_named(name).collect();
    let candidate = match descriptor {
        Some(descriptor) => candidates
            .iter()
            .find(|m| m.descriptor.as_str() == descriptor)
            .copied(),
        None => {
            if candidates.len() > 1 {
                let signatures: Vec<String> = candidates
                    .iter()
                    .map(|m| format!("{name}{}", m.descriptor))
                    .collect();
                cx.session.diagnostics.ambiguous_injection_target(
                    attr.syntax().text_range().start(),
                    name,
                    &signatures,
                );
            }
            candidates.first().copied()
        }
    };

    // Without a target method the name stays and only the descriptor maps.
    let mapped_name = candidate
        .and_then(|candidate| cx.members().method_mapping(candidate))
        .unwrap_or(name);
    let mut remapped = mapped_name.to_string();
    match (candidate, descriptor) {
        (Some(candidate), _) if mapping.count_methods_mapped_to(mapped_name) > 1 => {
            remapped.push_str(&remap_method_descriptor(cx.mappings, candidate.descriptor.as_str()));
        }
        (_, Some(descriptor)) => {
            remapped.push_str(&remap_method_descriptor(cx.mappings, descriptor));
        }
        _ => {}
    }

    let range = literal.syntax().text_range();
    if remapped != selector && cx.is_free(range) {
        cx.replace(range, &quoted(&remapped));
    }
}
