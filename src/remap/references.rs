//! Reference rewriter: renames declarations and resolved references.
//!
//! Java files are walked in preorder. Kotlin files visit the selector of a
//! qualified expression (and the last segment of a qualified type) before
//! its qualifier, so a nested class mapping wins over its outer class.

use smol_str::SmolStr;
use text_size::TextRange;

use super::context::RemapContext;
use crate::base::text_utils::{property_name_from_getter, simple_name};
use crate::hir::{ClassRef, FieldRef, MethodRef, Symbol};
use crate::syntax::ast::{self, AstNode};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken, has_ancestor};

// ============================================================================
// TRAVERSALS
// ============================================================================

/// Rename everything in a Java file.
pub(crate) fn remap_java(cx: &mut RemapContext<'_>, root: &SyntaxNode) {
    for node in root.descendants() {
        let candidate = matches!(
            node.kind(),
            SyntaxKind::FIELD | SyntaxKind::METHOD | SyntaxKind::REFERENCE | SyntaxKind::REFERENCE_EXPR
        );
        if candidate && cx.is_free(node.text_range()) {
            if let Some(symbol) = cx.file.resolve(&node) {
                remap_symbol(cx, &node, &symbol);
            }
        }
    }
}

/// Rename everything in a Kotlin file.
pub(crate) fn remap_kotlin(cx: &mut RemapContext<'_>, node: &SyntaxNode) {
    match node.kind() {
        SyntaxKind::FUN => {
            if let Some(symbol) = cx.file.resolve(node) {
                remap_symbol(cx, node, &symbol);
            }
            remap_kotlin_children(cx, node);
        }
        SyntaxKind::DOT_QUALIFIED => {
            let Some(qualified) = ast::DotQualified::cast(node.clone()) else {
                return;
            };
            if let Some(selector) = qualified.selector() {
                remap_kotlin(cx, &selector);
            }
            if let Some(receiver) = qualified.receiver() {
                remap_kotlin(cx, &receiver);
            }
        }
        SyntaxKind::USER_TYPE => {
            let Some(user_type) = ast::UserType::cast(node.clone()) else {
                return;
            };
            if let Some(name) = user_type.reference() {
                remap_kotlin(cx, name.syntax());
            }
            if let Some(qualifier) = user_type.qualifier() {
                remap_kotlin(cx, qualifier.syntax());
            }
            if let Some(type_args) = user_type.type_args() {
                remap_kotlin(cx, &type_args);
            }
        }
        SyntaxKind::NAME_REF => {
            if cx.is_free(node.text_range()) {
                if let Some(symbol) = cx.file.resolve(node) {
                    remap_symbol(cx, node, &symbol);
                }
            }
            remap_kotlin_children(cx, node);
        }
        _ => remap_kotlin_children(cx, node),
    }
}

fn remap_kotlin_children(cx: &mut RemapContext<'_>, node: &SyntaxNode) {
    for child in node.children() {
        remap_kotlin(cx, &child);
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Rewrite `expr` according to the declaration it resolves to.
pub(crate) fn remap_symbol(cx: &mut RemapContext<'_>, expr: &SyntaxNode, symbol: &Symbol) {
    match symbol {
        Symbol::Field(field) => remap_field(cx, expr, field),
        Symbol::Method(method) | Symbol::Function(method) => remap_method(cx, expr, method),
        Symbol::Class(class) => remap_class(cx, expr, class),
        Symbol::Package(package) => remap_package(cx, expr, package),
        Symbol::SyntheticProperty { getter } => remap_synthetic_property(cx, expr, getter),
        Symbol::CompiledFunction { overridden } => {
            // Overrides share one name range; the first rename wins.
            for symbol in overridden {
                let before = cx.session.edits.len();
                remap_symbol(cx, expr, symbol);
                if cx.session.edits.len() != before {
                    break;
                }
            }
        }
    }
}

/// Identifier naming a declaration: the direct identifier spelled like the
/// declared name, else the first one.
fn declaration_name(node: &SyntaxNode, name: &str) -> Option<SyntaxToken> {
    ast::direct_tokens(node)
        .filter(|t| t.kind() == SyntaxKind::IDENT)
        .find(|t| t.text() == name)
        .or_else(|| ast::first_ident(node))
}

fn is_declaration(node: &SyntaxNode) -> bool {
    matches!(
        node.kind(),
        SyntaxKind::FIELD | SyntaxKind::METHOD | SyntaxKind::FUN | SyntaxKind::PROPERTY | SyntaxKind::CLASS
    )
}

/// Identifier to rename in `expr`.
fn name_token(expr: &SyntaxNode, name: &str) -> Option<SyntaxToken> {
    if is_declaration(expr) {
        declaration_name(expr, name)
    } else {
        ast::last_ident(expr)
    }
}

fn replace_name(cx: &mut RemapContext<'_>, expr: &SyntaxNode, old: &str, new: &str) {
    if let Some(ident) = name_token(expr, old) {
        cx.replace(ident.text_range(), new);
    }
}

// ============================================================================
// FIELDS
// ============================================================================

fn remap_field(cx: &mut RemapContext<'_>, expr: &SyntaxNode, field: &FieldRef) {
    let Some(mapped) = cx.members().field_mapping(field) else {
        return;
    };
    if mapped == field.name {
        return;
    }
    replace_name(cx, expr, &field.name, mapped);

    let implicit = !cx.is_kotlin()
        && ast::ReferenceExpr::cast(expr.clone()).is_some_and(|r| !r.is_qualified())
        && !has_ancestor(expr, SyntaxKind::SWITCH_LABEL);
    if implicit && cx.options.forbid_implicit_field_access {
        cx.session
            .diagnostics
            .implicit_field_access(expr.text_range().start(), &field.name);
    }
}

// ============================================================================
// METHODS
// ============================================================================

fn remap_method(cx: &mut RemapContext<'_>, expr: &SyntaxNode, method: &MethodRef) {
    if method.is_constructor {
        // Kotlin calls constructors by class name.
        if expr.kind() == SyntaxKind::NAME_REF {
            remap_class(cx, expr, &method.owner);
        }
        return;
    }

    let Some(mapped) = cx.members().method_mapping(method) else {
        return;
    };
    if mapped == method.name {
        return;
    }

    if matches!(expr.kind(), SyntaxKind::METHOD | SyntaxKind::FUN) {
        replace_name(cx, expr, &method.name, mapped);
        return;
    }

    if let Some((call, property)) = synthetic_getter_call(cx, expr, method, mapped) {
        cx.replace(call, &property);
        return;
    }

    replace_name(cx, expr, &method.name, mapped);
}

/// Range of a Kotlin getter call that can become a property read, with
/// the property name.
fn synthetic_getter_call(
    cx: &RemapContext<'_>,
    expr: &SyntaxNode,
    method: &MethodRef,
    mapped: &str,
) -> Option<(TextRange, String)> {
    if !cx.is_kotlin() || method.has_parameters() || method.returns_void() || method.is_static {
        return None;
    }
    let property = property_name_from_getter(mapped)?;
    let call = expr.parent().filter(|p| p.kind() == SyntaxKind::CALL_EXPR)?;
    let is_super_call = call.parent().is_some_and(|grandparent| {
        grandparent.kind() == SyntaxKind::DOT_QUALIFIED
            && grandparent
                .first_child()
                .is_some_and(|receiver| receiver.kind() == SyntaxKind::SUPER_EXPR)
    });
    if is_super_call || !cx.is_free(call.text_range()) {
        return None;
    }
    Some((call.text_range(), property))
}

/// Kotlin property access backed by a Java getter.
///
/// Only reads are converted; assignments through a renamed setter keep
/// the property syntax.
fn remap_synthetic_property(cx: &mut RemapContext<'_>, expr: &SyntaxNode, getter: &MethodRef) {
    let Some(mapped) = cx.members().method_mapping(getter) else {
        return;
    };
    if mapped == getter.name {
        return;
    }
    let Some(ident) = ast::last_ident(expr) else {
        return;
    };
    match property_name_from_getter(mapped) {
        Some(property) => cx.replace(ident.text_range(), &property),
        None => cx.replace(ident.text_range(), &format!("{mapped}()")),
    }
}

// ============================================================================
// CLASSES
// ============================================================================

fn remap_class(cx: &mut RemapContext<'_>, expr: &SyntaxNode, class: &ClassRef) {
    remap_qualified_name(cx, expr, &class.qualified_name, &class.binary_name);
}

/// Packages are looked up like classes, by their dotted name.
fn remap_package(cx: &mut RemapContext<'_>, expr: &SyntaxNode, package: &str) {
    remap_qualified_name(cx, expr, package, package);
}

/// Rename a reference to a class or package: the whole qualified name when
/// it is spelled out, else the simple name.
fn remap_qualified_name(cx: &mut RemapContext<'_>, expr: &SyntaxNode, qualified_name: &str, lookup_name: &str) {
    let Some(mapping) = cx.mappings.lookup_class(lookup_name) else {
        return;
    };
    let mapped: SmolStr = mapping.deobfuscated_qualified_name().into();

    if expr.text() == qualified_name {
        cx.replace(expr.text_range(), &mapped);
        return;
    }

    if let Some(parent) = expr.parent() {
        let qualified_parent = matches!(parent.kind(), SyntaxKind::USER_TYPE | SyntaxKind::DOT_QUALIFIED);
        if qualified_parent && parent.text() == qualified_name {
            if cx.is_free(parent.text_range()) {
                cx.replace(parent.text_range(), &mapped);
            }
            return;
        }
    }

    // FIXME: a type alias sharing the class's simple name is renamed too.
    let simple = simple_name(&mapped);
    replace_name(cx, expr, simple_name(qualified_name), simple);
}
