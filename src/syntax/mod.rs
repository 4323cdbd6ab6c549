//! Syntax layer: token kinds, lexer, tree construction, typed wrappers.
//!
//! Trees are lossless rowan CSTs over the original file text, so every node
//! knows its exact byte range and edits can be expressed as range
//! replacements against that text.

pub mod ast;
mod builder;
pub mod lexer;
mod syntax_kind;

pub use builder::TreeBuilder;
pub use syntax_kind::{JvmLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Source language of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Java,
    Kotlin,
}

impl Language {
    /// Guess the language from a file name, defaulting to Java.
    pub fn from_file_name(file_name: &str) -> Self {
        if file_name.ends_with(".kt") || file_name.ends_with(".kts") {
            Language::Kotlin
        } else {
            Language::Java
        }
    }
}

/// Walk up from `node` (inclusive) looking for an ancestor of `kind`.
pub fn has_ancestor(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.ancestors().any(|n| n.kind() == kind)
}
