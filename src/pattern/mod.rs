//! Pattern matcher/replacer: user-defined structural rewrites.
//!
//! A pattern is a method in a "before" source annotated with a marker
//! annotation. Its single statement (or returned expression) is the tree to
//! find; its parameters are capture points. The same-named method of the
//! "after" source supplies the replacement text, split at each use of a
//! parameter.
//!
//! A match replaces only the text between captures. Captured expressions
//! stay in place, so the rename walk still rewrites them afterwards.

mod matcher;

use std::sync::Arc;

use rowan::GreenNode;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::TextRange;

pub use matcher::{Capture, Match};

use crate::base::RemapError;
use crate::hir::{JvmType, MethodRef, Resolution, Symbol};
use crate::remap::EditSession;
use crate::syntax::ast::{self, AstNode};
use crate::syntax::{SyntaxKind, SyntaxNode};
use matcher::Matcher;

// ============================================================================
// PATTERN
// ============================================================================

/// One before/after rewrite rule.
#[derive(Clone, Debug)]
pub struct Pattern {
    name: SmolStr,
    parameters: Vec<SmolStr>,
    parameter_types: Vec<Option<JvmType>>,
    variadic: bool,
    /// Pattern tree, re-rooted so offsets start at zero.
    tree: GreenNode,
    /// Constructors of `new` expressions, by range within `tree`.
    constructors: FxHashMap<TextRange, Arc<MethodRef>>,
    /// Replacement text around each capture point.
    replacement: Vec<String>,
}

impl Pattern {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[SmolStr] {
        &self.parameters
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn replacement(&self) -> &[String] {
        &self.replacement
    }

    /// A fresh root over the pattern tree.
    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.tree.clone())
    }

    fn is_variadic_parameter(&self, parameter: usize) -> bool {
        self.variadic && parameter + 1 == self.parameters.len()
    }

    fn parameter_type(&self, parameter: usize) -> Option<&JvmType> {
        self.parameter_types.get(parameter)?.as_ref()
    }

    fn constructor(&self, node: &SyntaxNode) -> Option<&MethodRef> {
        self.constructors.get(&node.text_range()).map(Arc::as_ref)
    }

    /// Parameter a pattern node captures: an unqualified reference to a
    /// parameter name not shadowed by a lambda parameter.
    fn capture_parameter(&self, node: &SyntaxNode) -> Option<usize> {
        capture_parameter(&self.parameters, node)
    }

    /// Match this pattern at `node` of `file`.
    pub fn find(&self, file: &dyn Resolution, node: &SyntaxNode) -> Option<Match> {
        Matcher::new(self, file).try_match(node)
    }

    /// Replacements that turn a match into the replacement template.
    ///
    /// Text before the first capture, between captures and after the last
    /// one is replaced by the template fragments. An omitted variadic tail
    /// also drops the `, ` that would have preceded it.
    pub fn to_changes(&self, found: &Match) -> Vec<(TextRange, String)> {
        let mut captures = found.captures.clone();
        captures.sort_by_key(|c| (c.range.start(), c.range.end()));

        let mut ranges = Vec::with_capacity(captures.len() + 1);
        let mut start = found.root.start();
        for capture in &captures {
            ranges.push(TextRange::new(start, capture.range.start().max(start)));
            start = capture.range.end().max(start);
        }
        ranges.push(TextRange::new(start, found.root.end().max(start)));

        let mut fragments: Vec<String> = self.replacement.clone();
        fragments.resize(ranges.len(), String::new());
        for (i, capture) in captures.iter().enumerate() {
            if !capture.empty_variadic {
                continue;
            }
            if let Some(before) = fragments[i].strip_suffix(", ") {
                fragments[i] = before.to_string();
            } else if let Some(after) = fragments[i + 1].strip_prefix(", ") {
                fragments[i + 1] = after.to_string();
            }
        }

        ranges
            .into_iter()
            .zip(fragments)
            .filter(|(range, text)| !(range.is_empty() && text.is_empty()))
            .collect()
    }

    /// Read one pattern from a before method and its after counterpart.
    fn read(
        before: &dyn Resolution,
        method: &ast::Method,
        after: &dyn Resolution,
        after_method: &ast::Method,
    ) -> Result<Self, RemapError> {
        let name: SmolStr = method.name().map(|t| t.text().into()).unwrap_or_default();

        let mut parameters = Vec::new();
        let mut parameter_types = Vec::new();
        let mut variadic = false;
        for parameter in method.parameters().iter().flat_map(|list| list.parameters()) {
            let Some(parameter_name) = parameter.name() else {
                return Err(RemapError::invalid_pattern(name.as_str(), "unnamed parameter"));
            };
            parameters.push(SmolStr::new(parameter_name.text()));
            parameter_types.push(before.type_of(parameter.syntax()));
            variadic = parameter.is_variadic();
        }

        let root = statement_root(method, &name)?;
        let after_root = statement_root(after_method, &name)?;

        let expected = captures(&parameters, &root).len();
        let holes = captures(&parameters, &after_root);
        if expected != holes.len() {
            return Err(RemapError::invalid_pattern(
                name.as_str(),
                format!(
                    "pattern captures {expected} parameters but its replacement uses {}",
                    holes.len()
                ),
            ));
        }

        let origin = root.text_range().start();
        let constructors = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::NEW_EXPR)
            .filter_map(|n| match before.resolve(&n) {
                Some(Symbol::Method(ctor)) if ctor.is_constructor => {
                    Some((n.text_range() - origin, ctor))
                }
                _ => None,
            })
            .collect();

        let text = after.text();
        let mut replacement = Vec::with_capacity(holes.len() + 1);
        let mut cursor = usize::from(after_root.text_range().start());
        for hole in &holes {
            replacement.push(text[cursor..usize::from(hole.text_range().start())].to_string());
            cursor = hole.text_range().end().into();
        }
        replacement.push(text[cursor..usize::from(after_root.text_range().end())].to_string());

        Ok(Self {
            name,
            parameters,
            parameter_types,
            variadic,
            tree: root.green().into_owned(),
            constructors,
            replacement,
        })
    }
}

fn capture_parameter(parameters: &[SmolStr], node: &SyntaxNode) -> Option<usize> {
    let reference = ast::ReferenceExpr::cast(node.clone())?;
    if reference.is_qualified() {
        return None;
    }
    let name = reference.name()?;
    let shadowed = node
        .ancestors()
        .filter_map(ast::LambdaExpr::cast)
        .any(|lambda| lambda.binds(name.text()));
    if shadowed {
        return None;
    }
    parameters.iter().position(|p| p == name.text())
}

/// Capture points of a pattern tree, in source order.
fn captures(parameters: &[SmolStr], root: &SyntaxNode) -> Vec<SyntaxNode> {
    root.descendants()
        .filter(|n| capture_parameter(parameters, n).is_some())
        .collect()
}

/// The single statement of a pattern body, or the expression it returns.
fn statement_root(method: &ast::Method, name: &str) -> Result<SyntaxNode, RemapError> {
    let body = method
        .body()
        .ok_or_else(|| RemapError::invalid_pattern(name, "pattern method has no body"))?;
    let statements: Vec<SyntaxNode> = body.statements().collect();
    let [statement] = statements.as_slice() else {
        return Err(RemapError::invalid_pattern(
            name,
            format!("expected a single statement, found {}", statements.len()),
        ));
    };
    match ast::ReturnStmt::cast(statement.clone()) {
        Some(ret) => ret
            .expr()
            .ok_or_else(|| RemapError::invalid_pattern(name, "pattern returns nothing")),
        None => Ok(statement.clone()),
    }
}

// ============================================================================
// PATTERN SET
// ============================================================================

/// All patterns of a run.
#[derive(Clone, Debug, Default)]
pub struct Patterns {
    patterns: Vec<Pattern>,
}

impl Patterns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the patterns of one before/after source pair.
    ///
    /// Every method of `before` carrying `annotation` is a pattern; the
    /// method of `after` with the same name is its replacement.
    pub fn read(
        before: &dyn Resolution,
        after: &dyn Resolution,
        annotation: &str,
    ) -> Result<Self, RemapError> {
        let after_methods: Vec<ast::Method> = after
            .root()
            .descendants()
            .filter_map(ast::Method::cast)
            .collect();

        let mut patterns = Vec::new();
        for method in before.root().descendants().filter_map(ast::Method::cast) {
            let marked = method
                .annotations()
                .iter()
                .any(|a| before.is_annotation(a, annotation));
            if !marked {
                continue;
            }
            let Some(name) = method.name().map(|t| t.text().to_string()) else {
                continue;
            };
            let after_method = after_methods
                .iter()
                .find(|m| m.name().is_some_and(|t| t.text() == name))
                .ok_or_else(|| RemapError::MissingReplacement(name.clone()))?;
            let pattern = Pattern::read(before, &method, after, after_method)?;
            tracing::debug!(
                pattern = %pattern.name,
                file = %before.file_name(),
                parameters = pattern.parameters.len(),
                "read pattern"
            );
            patterns.push(pattern);
        }
        Ok(Self { patterns })
    }

    pub fn push(&mut self, pattern: Pattern) {
        self.patterns.push(pattern);
    }

    pub fn extend(&mut self, other: Patterns) {
        self.patterns.extend(other.patterns);
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// Try every pattern at every node of `file` and queue the changes of
    /// each match whose ranges are all still free.
    ///
    /// A pattern is not tried again below a node it matched.
    pub fn apply(&self, file: &dyn Resolution, session: &mut EditSession) {
        if self.patterns.is_empty() {
            return;
        }
        let mut matched: Vec<Option<SyntaxNode>> = vec![None; self.patterns.len()];
        for node in file.root().descendants() {
            for (pattern, matched) in self.patterns.iter().zip(matched.iter_mut()) {
                if matched.as_ref().is_some_and(|m| node.ancestors().any(|a| a == *m)) {
                    continue;
                }
                let Some(found) = pattern.find(file, &node) else {
                    continue;
                };
                *matched = Some(node.clone());
                let changes = pattern.to_changes(&found);
                if changes.iter().all(|(range, _)| session.edits.is_free(*range)) {
                    for (range, text) in changes {
                        session.edits.queue(range, text);
                    }
                    continue;
                }
                if changes.iter().all(|(range, _)| session.edits.contains_exact(*range)) {
                    continue;
                }
                tracing::warn!(
                    pattern = %pattern.name,
                    file = %file.file_name(),
                    at = ?found.root,
                    "pattern match overlaps earlier edits"
                );
                for (range, text) in changes {
                    if !session.edits.is_free(range) {
                        session.conflict(range, text);
                    }
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a Patterns {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}
