//! Logos-based lexer for Java and Kotlin sources
//!
//! The lexer is lossless: every byte of the input ends up in exactly one
//! token, so trees built from its output reproduce the text exactly.
//! Shift operators are deliberately lexed as separate `<`/`>` tokens so
//! that type argument lists like `List<List<A>>` close on token boundaries.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    pub fn end(&self) -> TextSize {
        self.offset + TextSize::of(self.text)
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_$\p{XID_Start}][a-zA-Z0-9_$\p{XID_Continue}]*")]
    #[regex(r"`[^`\n]+`")]
    Ident,

    #[regex(r"[0-9][0-9_]*[lL]?")]
    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?")]
    Integer,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9][0-9_]*([eE][+-]?[0-9]+[fFdD]?|[fFdD])")]
    Decimal,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    Char,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("...")]
    Ellipsis,

    #[token("::")]
    ColonColon,

    #[token("->")]
    Arrow,

    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("&&")]
    AmpAmp,

    #[token("||")]
    PipePipe,

    #[token("++")]
    PlusPlus,

    #[token("--")]
    MinusMinus,

    #[token("+=")]
    PlusEq,

    #[token("-=")]
    MinusEq,

    #[token("*=")]
    StarEq,

    #[token("/=")]
    SlashEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("@")]
    At,

    #[token(":")]
    Colon,

    #[token("?")]
    Question,

    #[token("=")]
    Eq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("&")]
    Amp,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,

    #[token("!")]
    Bang,

    #[token("~")]
    Tilde,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("package")]
    PackageKw,

    #[token("import")]
    ImportKw,

    #[token("class")]
    ClassKw,

    #[token("interface")]
    InterfaceKw,

    #[token("enum")]
    EnumKw,

    #[token("extends")]
    ExtendsKw,

    #[token("implements")]
    ImplementsKw,

    #[token("new")]
    NewKw,

    #[token("return")]
    ReturnKw,

    #[token("this")]
    ThisKw,

    #[token("super")]
    SuperKw,

    #[token("null")]
    NullKw,

    #[token("true")]
    TrueKw,

    #[token("false")]
    FalseKw,

    #[token("static")]
    StaticKw,

    #[token("final")]
    FinalKw,

    #[token("public")]
    PublicKw,

    #[token("private")]
    PrivateKw,

    #[token("protected")]
    ProtectedKw,

    #[token("abstract")]
    AbstractKw,

    #[token("switch")]
    SwitchKw,

    #[token("case")]
    CaseKw,

    #[token("default")]
    DefaultKw,

    #[token("if")]
    IfKw,

    #[token("else")]
    ElseKw,

    #[token("throws")]
    ThrowsKw,

    #[token("instanceof")]
    InstanceofKw,

    #[token("fun")]
    FunKw,

    #[token("val")]
    ValKw,

    #[token("var")]
    VarKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,

            // Literals
            Ident => SyntaxKind::IDENT,
            Integer => SyntaxKind::INTEGER,
            Decimal => SyntaxKind::DECIMAL,
            String => SyntaxKind::STRING,
            Char => SyntaxKind::CHAR,

            // Multi-char punctuation
            Ellipsis => SyntaxKind::ELLIPSIS,
            ColonColon => SyntaxKind::COLON_COLON,
            Arrow => SyntaxKind::ARROW,
            EqEq => SyntaxKind::EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            AmpAmp => SyntaxKind::AMP_AMP,
            PipePipe => SyntaxKind::PIPE_PIPE,
            PlusPlus => SyntaxKind::PLUS_PLUS,
            MinusMinus => SyntaxKind::MINUS_MINUS,
            PlusEq => SyntaxKind::PLUS_EQ,
            MinusEq => SyntaxKind::MINUS_EQ,
            StarEq => SyntaxKind::STAR_EQ,
            SlashEq => SyntaxKind::SLASH_EQ,

            // Single-char punctuation
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Comma => SyntaxKind::COMMA,
            Dot => SyntaxKind::DOT,
            At => SyntaxKind::AT,
            Colon => SyntaxKind::COLON,
            Question => SyntaxKind::QUESTION,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,
            Caret => SyntaxKind::CARET,
            Bang => SyntaxKind::BANG,
            Tilde => SyntaxKind::TILDE,

            // Keywords
            PackageKw => SyntaxKind::PACKAGE_KW,
            ImportKw => SyntaxKind::IMPORT_KW,
            ClassKw => SyntaxKind::CLASS_KW,
            InterfaceKw => SyntaxKind::INTERFACE_KW,
            EnumKw => SyntaxKind::ENUM_KW,
            ExtendsKw => SyntaxKind::EXTENDS_KW,
            ImplementsKw => SyntaxKind::IMPLEMENTS_KW,
            NewKw => SyntaxKind::NEW_KW,
            ReturnKw => SyntaxKind::RETURN_KW,
            ThisKw => SyntaxKind::THIS_KW,
            SuperKw => SyntaxKind::SUPER_KW,
            NullKw => SyntaxKind::NULL_KW,
            TrueKw => SyntaxKind::TRUE_KW,
            FalseKw => SyntaxKind::FALSE_KW,
            StaticKw => SyntaxKind::STATIC_KW,
            FinalKw => SyntaxKind::FINAL_KW,
            PublicKw => SyntaxKind::PUBLIC_KW,
            PrivateKw => SyntaxKind::PRIVATE_KW,
            ProtectedKw => SyntaxKind::PROTECTED_KW,
            AbstractKw => SyntaxKind::ABSTRACT_KW,
            SwitchKw => SyntaxKind::SWITCH_KW,
            CaseKw => SyntaxKind::CASE_KW,
            DefaultKw => SyntaxKind::DEFAULT_KW,
            IfKw => SyntaxKind::IF_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            ThrowsKw => SyntaxKind::THROWS_KW,
            InstanceofKw => SyntaxKind::INSTANCEOF_KW,
            FunKw => SyntaxKind::FUN_KW,
            ValKw => SyntaxKind::VAL_KW,
            VarKw => SyntaxKind::VAR_KW,
        }
    }
}
