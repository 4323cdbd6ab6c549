//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and provides methods to access children.
//! Trees may be sparse (a resolver only declares the nodes it knows about),
//! so accessors rely on direct children and punctuation rather than on
//! fixed child positions.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

// ============================================================================
// Child helpers
// ============================================================================

/// First direct identifier token of `node`.
pub fn first_ident(node: &SyntaxNode) -> Option<SyntaxToken> {
    direct_tokens(node).find(|t| t.kind() == SyntaxKind::IDENT)
}

/// Last direct identifier token of `node`.
pub fn last_ident(node: &SyntaxNode) -> Option<SyntaxToken> {
    direct_tokens(node)
        .filter(|t| t.kind() == SyntaxKind::IDENT)
        .last()
}

/// Direct tokens of `node`, skipping trivia.
pub fn direct_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
}

/// Check whether `node` has a direct token of `kind`.
pub fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    direct_tokens(node).any(|t| t.kind() == kind)
}

/// Direct child nodes that are expressions.
pub fn expressions(node: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> + '_ {
    node.children().filter(|c| c.kind().is_expression())
}

fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
    node.children().find_map(N::cast)
}

fn child_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.children().find(|c| c.kind() == kind)
}

/// The child node that comes before the first direct `.` token, if any.
fn qualifier_before_dot(node: &SyntaxNode) -> Option<SyntaxNode> {
    let mut last_node = None;
    for element in node.children_with_tokens() {
        match element {
            rowan::NodeOrToken::Node(n) => last_node = Some(n),
            rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::DOT => return last_node,
            rowan::NodeOrToken::Token(_) => {}
        }
    }
    None
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn classes(&self) -> impl Iterator<Item = Class> + '_ {
        self.0.descendants().filter_map(Class::cast)
    }
}

ast_node!(Class, CLASS);

impl Class {
    pub fn modifiers(&self) -> Option<ModifierList> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        first_ident(&self.0)
    }
}

ast_node!(ModifierList, MODIFIER_LIST);

impl ModifierList {
    pub fn annotations(&self) -> impl Iterator<Item = Annotation> + '_ {
        self.0.children().filter_map(Annotation::cast)
    }

    pub fn has_modifier(&self, kind: SyntaxKind) -> bool {
        has_token(&self.0, kind)
    }
}

ast_node!(Annotation, ANNOTATION);

impl Annotation {
    /// Reference to the annotation type.
    pub fn reference(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.0, SyntaxKind::REFERENCE)
    }

    /// Annotation type as written, without the `@`.
    pub fn name_text(&self) -> String {
        match self.reference() {
            Some(reference) => reference.text().to_string(),
            None => direct_tokens(&self.0)
                .skip_while(|t| t.kind() == SyntaxKind::AT)
                .take_while(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::DOT))
                .map(|t| t.text().to_string())
                .collect(),
        }
    }

    pub fn args(&self) -> Option<AnnotationArgs> {
        child(&self.0)
    }

    /// Attributes of the argument list, empty if there is none.
    pub fn attributes(&self) -> Vec<AnnotationAttr> {
        self.args()
            .map(|args| args.attributes().collect())
            .unwrap_or_default()
    }
}

ast_node!(AnnotationArgs, ANNOTATION_ARGS);

impl AnnotationArgs {
    pub fn attributes(&self) -> impl Iterator<Item = AnnotationAttr> + '_ {
        self.0.children().filter_map(AnnotationAttr::cast)
    }
}

ast_node!(AnnotationAttr, ANNOTATION_ATTR);

impl AnnotationAttr {
    /// Explicit attribute name, `None` for the unnamed `value` shorthand.
    pub fn name(&self) -> Option<SyntaxToken> {
        if !has_token(&self.0, SyntaxKind::EQ) {
            return None;
        }
        first_ident(&self.0)
    }

    pub fn name_text(&self) -> Option<String> {
        self.name().map(|t| t.text().to_string())
    }

    /// True for `value = ...` and for the unnamed shorthand.
    pub fn is_value(&self) -> bool {
        self.name().is_none_or(|name| name.text() == "value")
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        expressions(&self.0).last()
    }
}

ast_node!(Field, FIELD);

impl Field {
    pub fn modifiers(&self) -> Option<ModifierList> {
        child(&self.0)
    }

    pub fn initializer(&self) -> Option<SyntaxNode> {
        expressions(&self.0).last()
    }
}

ast_node!(Method, METHOD);

impl Method {
    pub fn modifiers(&self) -> Option<ModifierList> {
        child(&self.0)
    }

    /// The identifier right before the parameter list; earlier ones
    /// belong to the return type.
    pub fn name(&self) -> Option<SyntaxToken> {
        let mut name = None;
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Node(n) if n.kind() == SyntaxKind::PARAMETER_LIST => break,
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::L_PAREN => break,
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::IDENT => name = Some(t),
                _ => {}
            }
        }
        name.or_else(|| first_ident(&self.0))
    }

    pub fn parameters(&self) -> Option<ParameterList> {
        child(&self.0)
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }

    pub fn annotations(&self) -> Vec<Annotation> {
        self.modifiers()
            .map(|m| m.annotations().collect())
            .unwrap_or_default()
    }
}

ast_node!(ParameterList, PARAMETER_LIST);

impl ParameterList {
    pub fn parameters(&self) -> impl Iterator<Item = Parameter> + '_ {
        self.0.children().filter_map(Parameter::cast)
    }
}

ast_node!(Parameter, PARAMETER);

impl Parameter {
    pub fn name(&self) -> Option<SyntaxToken> {
        last_ident(&self.0)
    }

    pub fn is_variadic(&self) -> bool {
        self.0
            .descendants_with_tokens()
            .any(|e| e.kind() == SyntaxKind::ELLIPSIS)
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_node!(Block, BLOCK);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0.children().filter(|c| c.kind().is_statement())
    }
}

ast_node!(BlockStmt, BLOCK_STMT);

impl BlockStmt {
    pub fn block(&self) -> Option<Block> {
        child(&self.0)
    }
}

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    pub fn expr(&self) -> Option<SyntaxNode> {
        expressions(&self.0).next()
    }
}

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    pub fn expr(&self) -> Option<SyntaxNode> {
        expressions(&self.0).next()
    }
}

// ============================================================================
// Java expressions
// ============================================================================

ast_node!(Reference, REFERENCE);

impl Reference {
    pub fn qualifier(&self) -> Option<SyntaxNode> {
        qualifier_before_dot(&self.0)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        last_ident(&self.0)
    }
}

ast_node!(ReferenceExpr, REFERENCE_EXPR);

impl ReferenceExpr {
    pub fn qualifier(&self) -> Option<SyntaxNode> {
        qualifier_before_dot(&self.0)
    }

    pub fn is_qualified(&self) -> bool {
        has_token(&self.0, SyntaxKind::DOT)
    }

    pub fn name(&self) -> Option<SyntaxToken> {
        last_ident(&self.0)
    }
}

ast_node!(MethodCall, METHOD_CALL);

impl MethodCall {
    pub fn method_expr(&self) -> Option<ReferenceExpr> {
        child(&self.0)
    }

    pub fn args(&self) -> Option<ArgList> {
        child(&self.0)
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        expressions(&self.0)
    }

    pub fn l_paren(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.0).find(|t| t.kind() == SyntaxKind::L_PAREN)
    }
}

ast_node!(NewExpr, NEW_EXPR);

impl NewExpr {
    /// Outer instance of a qualified inner class creation (`outer.new Inner()`).
    pub fn qualifier(&self) -> Option<SyntaxNode> {
        let new_kw = direct_tokens(&self.0).find(|t| t.kind() == SyntaxKind::NEW_KW)?;
        expressions(&self.0).find(|e| e.text_range().end() <= new_kw.text_range().start())
    }

    pub fn reference(&self) -> Option<Reference> {
        child(&self.0)
    }

    pub fn args(&self) -> Option<ArgList> {
        child(&self.0)
    }
}

/// Operator token shared by assignments and binary expressions.
fn operator(node: &SyntaxNode) -> Option<SyntaxToken> {
    direct_tokens(node).find(|t| t.kind().is_punct())
}

ast_node!(Assignment, ASSIGNMENT);

impl Assignment {
    pub fn lhs(&self) -> Option<SyntaxNode> {
        expressions(&self.0).next()
    }

    pub fn rhs(&self) -> Option<SyntaxNode> {
        expressions(&self.0).nth(1)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        operator(&self.0)
    }
}

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<SyntaxNode> {
        expressions(&self.0).next()
    }

    pub fn rhs(&self) -> Option<SyntaxNode> {
        expressions(&self.0).nth(1)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        operator(&self.0)
    }
}

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn expr(&self) -> Option<SyntaxNode> {
        expressions(&self.0).next()
    }
}

ast_node!(CastExpr, CAST_EXPR);

impl CastExpr {
    pub fn operand(&self) -> Option<SyntaxNode> {
        expressions(&self.0).last()
    }
}

ast_node!(LambdaExpr, LAMBDA_EXPR);

impl LambdaExpr {
    /// Declared parameter names, for `(a, b) ->`, `(String a) ->` and
    /// `a ->` alike.
    pub fn parameter_names(&self) -> Vec<SyntaxToken> {
        let declared: Vec<Parameter> = match child::<ParameterList>(&self.0) {
            Some(list) => list.parameters().collect(),
            None => self.0.children().filter_map(Parameter::cast).collect(),
        };
        if !declared.is_empty() {
            return declared.iter().filter_map(Parameter::name).collect();
        }
        // Undeclared parameters: the identifiers ahead of the arrow.
        self.0
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .take_while(|t| t.kind() != SyntaxKind::ARROW)
            .filter(|t| t.kind() == SyntaxKind::IDENT)
            .collect()
    }

    pub fn binds(&self, name: &str) -> bool {
        self.parameter_names().iter().any(|p| p.text() == name)
    }

    /// The expression or block after the arrow.
    pub fn body(&self) -> Option<SyntaxNode> {
        self.0
            .children_with_tokens()
            .skip_while(|e| e.kind() != SyntaxKind::ARROW)
            .find_map(|e| e.into_node())
    }
}

ast_node!(Literal, LITERAL);

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        direct_tokens(&self.0).next()
    }

    /// Value of a string literal.
    pub fn string_value(&self) -> Option<String> {
        let token = self.token()?;
        if token.kind() != SyntaxKind::STRING {
            return None;
        }
        crate::base::text_utils::string_literal_value(token.text())
    }
}

ast_node!(ClassLiteral, CLASS_LITERAL);

impl ClassLiteral {
    /// Outermost reference of the literal's type.
    pub fn reference(&self) -> Option<SyntaxNode> {
        self.0.descendants().find(|n| n.kind() == SyntaxKind::REFERENCE)
    }
}

ast_node!(ArrayInit, ARRAY_INIT);

impl ArrayInit {
    pub fn elements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        expressions(&self.0)
    }
}

// ============================================================================
// Kotlin
// ============================================================================

ast_node!(Fun, FUN);

impl Fun {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_ident(&self.0)
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_ident(&self.0)
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn callee(&self) -> Option<NameRef> {
        child(&self.0)
    }
}

ast_node!(DotQualified, DOT_QUALIFIED);

impl DotQualified {
    pub fn receiver(&self) -> Option<SyntaxNode> {
        qualifier_before_dot(&self.0)
    }

    pub fn selector(&self) -> Option<SyntaxNode> {
        let receiver = self.receiver();
        expressions(&self.0).last().filter(|s| Some(s) != receiver.as_ref())
    }
}

ast_node!(UserType, USER_TYPE);

impl UserType {
    pub fn reference(&self) -> Option<NameRef> {
        child(&self.0)
    }

    pub fn qualifier(&self) -> Option<UserType> {
        child(&self.0)
    }

    pub fn type_args(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.0, SyntaxKind::TYPE_ARGS)
    }
}
