//! Structural matching of a pattern tree against file nodes.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use super::Pattern;
use crate::hir::{JvmType, Resolution, Symbol};
use crate::syntax::ast::{self, AstNode};
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

/// A stretch of the file bound to a pattern parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    pub parameter: usize,
    pub range: TextRange,
    /// Zero-length capture of an omitted variadic tail.
    pub empty_variadic: bool,
}

/// A successful match of a pattern at `root`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub root: TextRange,
    pub captures: Vec<Capture>,
}

/// Matches one pattern against nodes of one file.
pub(crate) struct Matcher<'p, 'f> {
    pattern: &'p Pattern,
    file: &'f dyn Resolution,
    captures: Vec<Capture>,
    /// Lambda parameters in scope, pattern name paired with file name.
    bound: Vec<(SmolStr, SmolStr)>,
}

impl<'p, 'f> Matcher<'p, 'f> {
    pub fn new(pattern: &'p Pattern, file: &'f dyn Resolution) -> Self {
        Self {
            pattern,
            file,
            captures: Vec::new(),
            bound: Vec::new(),
        }
    }

    /// Match the whole pattern at `node`.
    pub fn try_match(mut self, node: &SyntaxNode) -> Option<Match> {
        let root = self.pattern.root();
        if !self.matches(&root, node) {
            return None;
        }
        Some(Match {
            root: node.text_range(),
            captures: self.captures,
        })
    }

    fn matches(&mut self, pattern: &SyntaxNode, expr: &SyntaxNode) -> bool {
        if let Some(parameter) = self.pattern.capture_parameter(pattern) {
            return self.capture(parameter, expr);
        }
        if pattern.kind() != expr.kind() {
            return false;
        }

        match pattern.kind() {
            SyntaxKind::ASSIGNMENT => {
                let (Some(p), Some(e)) = (ast::Assignment::cast(pattern.clone()), ast::Assignment::cast(expr.clone()))
                else {
                    return false;
                };
                same_text(p.operator(), e.operator())
                    && self.matches_opt(p.lhs(), e.lhs())
                    && self.matches_opt(p.rhs(), e.rhs())
            }
            SyntaxKind::BINARY_EXPR => {
                let (Some(p), Some(e)) = (ast::BinaryExpr::cast(pattern.clone()), ast::BinaryExpr::cast(expr.clone()))
                else {
                    return false;
                };
                same_text(p.operator(), e.operator())
                    && self.matches_opt(p.lhs(), e.lhs())
                    && self.matches_opt(p.rhs(), e.rhs())
            }
            SyntaxKind::BLOCK_STMT => {
                let p = ast::BlockStmt::cast(pattern.clone()).and_then(|b| b.block());
                let e = ast::BlockStmt::cast(expr.clone()).and_then(|b| b.block());
                let (Some(p), Some(e)) = (p, e) else {
                    return false;
                };
                self.matches_block(&p, &e)
            }
            SyntaxKind::BLOCK => {
                let (Some(p), Some(e)) = (ast::Block::cast(pattern.clone()), ast::Block::cast(expr.clone())) else {
                    return false;
                };
                self.matches_block(&p, &e)
            }
            SyntaxKind::RETURN_STMT => {
                let p = ast::ReturnStmt::cast(pattern.clone()).and_then(|s| s.expr());
                let e = ast::ReturnStmt::cast(expr.clone()).and_then(|s| s.expr());
                self.matches_opt(p, e)
            }
            SyntaxKind::REFERENCE_EXPR => {
                let (Some(p), Some(e)) = (ast::ReferenceExpr::cast(pattern.clone()), ast::ReferenceExpr::cast(expr.clone()))
                else {
                    return false;
                };
                match self.bound_in_pattern(&p) {
                    Some(expected) => !e.is_qualified() && e.name().is_some_and(|n| n.text() == expected.as_str()),
                    None if self.bound_in_file(&e) => false,
                    None => same_text(p.name(), e.name()) && self.matches_opt(p.qualifier(), e.qualifier()),
                }
            }
            SyntaxKind::LAMBDA_EXPR => {
                let (Some(p), Some(e)) = (ast::LambdaExpr::cast(pattern.clone()), ast::LambdaExpr::cast(expr.clone()))
                else {
                    return false;
                };
                let p_names = p.parameter_names();
                let e_names = e.parameter_names();
                if p_names.len() != e_names.len() {
                    return false;
                }
                let depth = self.bound.len();
                self.bound.extend(
                    p_names
                        .iter()
                        .zip(&e_names)
                        .map(|(p, e)| (SmolStr::new(p.text()), SmolStr::new(e.text()))),
                );
                let matched = self.matches_opt(p.body(), e.body());
                self.bound.truncate(depth);
                matched
            }
            SyntaxKind::METHOD_CALL => {
                let (Some(p), Some(e)) = (ast::MethodCall::cast(pattern.clone()), ast::MethodCall::cast(expr.clone()))
                else {
                    return false;
                };
                let (Some(p_method), Some(e_method)) = (p.method_expr(), e.method_expr()) else {
                    return false;
                };
                self.matches(p_method.syntax(), e_method.syntax()) && self.matches_args(p.args(), e.args())
            }
            SyntaxKind::NEW_EXPR => {
                let (Some(p), Some(e)) = (ast::NewExpr::cast(pattern.clone()), ast::NewExpr::cast(expr.clone()))
                else {
                    return false;
                };
                self.same_constructor(pattern, expr)
                    && self.matches_opt(p.qualifier(), e.qualifier())
                    && self.matches_args(p.args(), e.args())
            }
            SyntaxKind::EXPR_STMT => {
                let p = ast::ExprStmt::cast(pattern.clone()).and_then(|s| s.expr());
                let e = ast::ExprStmt::cast(expr.clone()).and_then(|s| s.expr());
                self.matches_opt(p, e)
            }
            SyntaxKind::PAREN_EXPR => {
                let p = ast::ParenExpr::cast(pattern.clone()).and_then(|s| s.expr());
                let e = ast::ParenExpr::cast(expr.clone()).and_then(|s| s.expr());
                self.matches_opt(p, e)
            }
            SyntaxKind::CAST_EXPR => {
                let p = ast::CastExpr::cast(pattern.clone()).and_then(|s| s.operand());
                let e = ast::CastExpr::cast(expr.clone()).and_then(|s| s.operand());
                self.matches_opt(p, e)
            }
            SyntaxKind::LITERAL => pattern.text() == expr.text(),
            _ => false,
        }
    }

    /// Both absent, or both present and matching.
    fn matches_opt(&mut self, pattern: Option<SyntaxNode>, expr: Option<SyntaxNode>) -> bool {
        match (pattern, expr) {
            (None, None) => true,
            (Some(p), Some(e)) => self.matches(&p, &e),
            _ => false,
        }
    }

    fn matches_block(&mut self, pattern: &ast::Block, expr: &ast::Block) -> bool {
        let p: Vec<_> = pattern.statements().collect();
        let e: Vec<_> = expr.statements().collect();
        p.len() == e.len() && p.iter().zip(&e).all(|(p, e)| self.matches(p, e))
    }

    /// File-side name a pattern reference to a lambda parameter must use.
    fn bound_in_pattern(&self, reference: &ast::ReferenceExpr) -> Option<SmolStr> {
        if reference.is_qualified() {
            return None;
        }
        let name = reference.name()?;
        self.bound
            .iter()
            .rev()
            .find(|(pattern, _)| pattern.as_str() == name.text())
            .map(|(_, file)| file.clone())
    }

    /// Whether a file reference reads a parameter of an enclosing matched
    /// lambda.
    fn bound_in_file(&self, reference: &ast::ReferenceExpr) -> bool {
        if reference.is_qualified() {
            return false;
        }
        reference
            .name()
            .is_some_and(|name| self.bound.iter().any(|(_, file)| file.as_str() == name.text()))
    }

    fn same_constructor(&self, pattern: &SyntaxNode, expr: &SyntaxNode) -> bool {
        let Some(expected) = self.pattern.constructor(pattern) else {
            return false;
        };
        match self.file.resolve(expr) {
            Some(Symbol::Method(actual)) => actual.is_constructor && actual.same_signature(expected),
            _ => false,
        }
    }

    fn is_assignable(&self, parameter: usize, expr: &SyntaxNode) -> bool {
        match self.pattern.parameter_type(parameter) {
            None => true,
            Some(to) => self
                .file
                .type_of(expr)
                .is_some_and(|from| self.file.is_assignable(to, &from)),
        }
    }

    /// Bind `expr` to a parameter. A parameter used twice must bind to the
    /// same text both times.
    fn capture(&mut self, parameter: usize, expr: &SyntaxNode) -> bool {
        if !expr.kind().is_expression() || !self.is_assignable(parameter, expr) {
            return false;
        }
        // The replacement moves captures out of the lambda.
        let reads_bound = !self.bound.is_empty()
            && expr
                .descendants()
                .filter_map(ast::ReferenceExpr::cast)
                .any(|r| self.bound_in_file(&r));
        if reads_bound {
            return false;
        }
        if let Some(previous) = self.captures.iter().find(|c| c.parameter == parameter) {
            let text = self.file.text();
            let slice = |r: TextRange| &text[usize::from(r.start())..usize::from(r.end())];
            if slice(previous.range) != slice(expr.text_range()) {
                return false;
            }
        }
        self.captures.push(Capture {
            parameter,
            range: expr.text_range(),
            empty_variadic: false,
        });
        true
    }

    fn matches_args(&mut self, pattern: Option<ast::ArgList>, expr: Option<ast::ArgList>) -> bool {
        let (pattern, expr) = match (pattern, expr) {
            (None, None) => return true,
            (Some(p), Some(e)) => (p, e),
            _ => return false,
        };
        let p_args: Vec<SyntaxNode> = pattern.args().collect();
        let e_args: Vec<SyntaxNode> = expr.args().collect();

        let variadic = p_args
            .last()
            .and_then(|last| self.pattern.capture_parameter(last))
            .filter(|&parameter| self.pattern.is_variadic_parameter(parameter));
        let Some(variadic) = variadic else {
            return p_args.len() == e_args.len()
                && p_args.iter().zip(&e_args).all(|(p, e)| self.matches(p, e));
        };

        let fixed = p_args.len() - 1;
        if e_args.len() < fixed {
            return false;
        }
        if !p_args[..fixed].iter().zip(&e_args).all(|(p, e)| self.matches(p, e)) {
            return false;
        }
        self.capture_variadic(variadic, &expr, &e_args[..fixed], &e_args[fixed..])
    }

    /// Bind the trailing arguments of a call to the variadic parameter.
    fn capture_variadic(
        &mut self,
        parameter: usize,
        args: &ast::ArgList,
        fixed: &[SyntaxNode],
        tail: &[SyntaxNode],
    ) -> bool {
        match tail {
            [] => {
                let at = match fixed.last() {
                    Some(previous) => previous.text_range().end(),
                    None => match args.l_paren() {
                        Some(paren) => paren.text_range().end(),
                        None => args.syntax().text_range().start() + TextSize::from(1),
                    },
                };
                self.captures.push(Capture {
                    parameter,
                    range: TextRange::empty(at),
                    empty_variadic: true,
                });
                true
            }
            [single] if self.is_assignable(parameter, single) => self.capture(parameter, single),
            _ => {
                let (Some(first), Some(last)) = (tail.first(), tail.last()) else {
                    return false;
                };
                let element = self
                    .pattern
                    .parameter_type(parameter)
                    .and_then(JvmType::component)
                    .cloned();
                let all_fit = tail.iter().all(|arg| match &element {
                    None => true,
                    Some(to) => self
                        .file
                        .type_of(arg)
                        .is_some_and(|from| self.file.is_assignable(to, &from)),
                });
                if !all_fit {
                    return false;
                }
                self.captures.push(Capture {
                    parameter,
                    range: TextRange::new(first.text_range().start(), last.text_range().end()),
                    empty_variadic: false,
                });
                true
            }
        }
    }
}

fn same_text(a: Option<SyntaxToken>, b: Option<SyntaxToken>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.text() == b.text(),
        (None, None) => true,
        _ => false,
    }
}
