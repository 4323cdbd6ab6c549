//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all node and token kinds that can appear in a resolved
//! Java or Kotlin tree. Token kinds are produced by the lexer; node kinds are
//! declared by the resolution service when it delivers a tree.

/// All syntax kinds (tokens and nodes) for Java and Kotlin sources
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (classes, methods, references, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,  // identifier or `backticked name`
    INTEGER, // 42, 0x2A, 42L
    DECIMAL, // 3.14, 1e10f
    STRING, // "hello"
    CHAR,   // 'c'

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,     // {
    R_BRACE,     // }
    L_BRACKET,   // [
    R_BRACKET,   // ]
    L_PAREN,     // (
    R_PAREN,     // )
    SEMICOLON,   // ;
    COMMA,       // ,
    DOT,         // .
    ELLIPSIS,    // ...
    AT,          // @
    COLON,       // :
    COLON_COLON, // ::
    QUESTION,    // ?
    ARROW,       // ->
    EQ,          // =
    EQ_EQ,       // ==
    BANG_EQ,     // !=
    LT,          // <
    GT,          // >
    LT_EQ,       // <=
    GT_EQ,       // >=
    PLUS,        // +
    MINUS,       // -
    STAR,        // *
    SLASH,       // /
    PERCENT,     // %
    AMP,         // &
    PIPE,        // |
    CARET,       // ^
    BANG,        // !
    TILDE,       // ~
    AMP_AMP,     // &&
    PIPE_PIPE,   // ||
    PLUS_PLUS,   // ++
    MINUS_MINUS, // --
    PLUS_EQ,     // +=
    MINUS_EQ,    // -=
    STAR_EQ,     // *=
    SLASH_EQ,    // /=

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    PACKAGE_KW,
    IMPORT_KW,
    CLASS_KW,
    INTERFACE_KW,
    ENUM_KW,
    EXTENDS_KW,
    IMPLEMENTS_KW,
    NEW_KW,
    RETURN_KW,
    THIS_KW,
    SUPER_KW,
    NULL_KW,
    TRUE_KW,
    FALSE_KW,
    STATIC_KW,
    FINAL_KW,
    PUBLIC_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    ABSTRACT_KW,
    SWITCH_KW,
    CASE_KW,
    DEFAULT_KW,
    IF_KW,
    ELSE_KW,
    THROWS_KW,
    INSTANCEOF_KW,
    // Kotlin
    FUN_KW,
    VAL_KW,
    VAR_KW,

    // =========================================================================
    // NODES: declarations
    // =========================================================================
    SOURCE_FILE,
    PACKAGE_DECL,
    IMPORT,
    CLASS,
    MODIFIER_LIST,
    ANNOTATION,
    ANNOTATION_ARGS,
    ANNOTATION_ATTR,
    ARRAY_INIT,
    FIELD,
    METHOD,
    PARAMETER_LIST,
    PARAMETER,
    TYPE,
    TYPE_ARGS,
    REFERENCE,

    // =========================================================================
    // NODES: statements
    // =========================================================================
    BLOCK,
    BLOCK_STMT,
    EXPR_STMT,
    RETURN_STMT,
    LOCAL_VAR,
    SWITCH_STMT,
    SWITCH_LABEL,

    // =========================================================================
    // NODES: expressions
    // =========================================================================
    REFERENCE_EXPR,
    METHOD_CALL,
    ARG_LIST,
    NEW_EXPR,
    ASSIGNMENT,
    BINARY_EXPR,
    PAREN_EXPR,
    CAST_EXPR,
    LITERAL,
    CLASS_LITERAL,
    THIS_EXPR,
    SUPER_EXPR,
    LAMBDA_EXPR,

    // =========================================================================
    // NODES: Kotlin
    // =========================================================================
    FUN,
    PROPERTY,
    USER_TYPE,
    NAME_REF,
    CALL_EXPR,
    VALUE_ARGS,
    DOT_QUALIFIED,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,

    // Must be last
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::PACKAGE_KW as u16) && (self as u16) <= (Self::VAR_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::SLASH_EQ as u16)
    }

    /// Check if this is a token kind (as opposed to a node kind)
    pub fn is_token(self) -> bool {
        (self as u16) < (Self::SOURCE_FILE as u16) || self == Self::ERROR
    }

    /// Check if this node kind is an expression in either language
    pub fn is_expression(self) -> bool {
        matches!(
            self,
            Self::REFERENCE_EXPR
                | Self::METHOD_CALL
                | Self::NEW_EXPR
                | Self::ASSIGNMENT
                | Self::BINARY_EXPR
                | Self::PAREN_EXPR
                | Self::CAST_EXPR
                | Self::LITERAL
                | Self::CLASS_LITERAL
                | Self::THIS_EXPR
                | Self::SUPER_EXPR
                | Self::LAMBDA_EXPR
                | Self::ARRAY_INIT
                | Self::NAME_REF
                | Self::CALL_EXPR
                | Self::DOT_QUALIFIED
        )
    }

    /// Check if this node kind is a statement
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Self::BLOCK_STMT
                | Self::EXPR_STMT
                | Self::RETURN_STMT
                | Self::LOCAL_VAR
                | Self::SWITCH_STMT
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JvmLanguage {}

impl rowan::Language for JvmLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<JvmLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<JvmLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<JvmLanguage>;
