//! # remap-core
//!
//! Rename-and-patch engine for Java and Kotlin sources under an obfuscation
//! mapping, including Mixin annotations and user-defined structural
//! rewrite patterns.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Transformer: config, multi-file driver, rayon
//!   ↓
//! pattern   → Before/after patterns, structural matcher
//!   ↓
//! remap     → Edit buffer, member resolver, reference and Mixin rewriters
//!   ↓
//! mapping   → Class/field/method rename tables, descriptors
//!   ↓
//! hir       → Resolved trees: symbols, types, classpath, diagnostics
//!   ↓
//! syntax    → SyntaxKind, logos lexer, rowan trees, typed AST wrappers
//!   ↓
//! base      → Primitives (TextRange, LineIndex, RemapError)
//! ```

// ============================================================================
// MODULES (dependency order: base → syntax → hir → mapping → remap → pattern → project)
// ============================================================================

/// Foundation types: TextRange, LineIndex, identifier helpers, errors
pub mod base;

/// Syntax: token kinds, lexer, lossless trees
pub mod syntax;

/// Resolution seam: symbols, JVM types, resolved files, diagnostics
pub mod hir;

/// Mapping provider: rename tables and descriptor remapping
pub mod mapping;

/// Per-file rename passes over an edit buffer
pub mod remap;

/// Pattern matcher/replacer
pub mod pattern;

/// Run configuration and multi-file driver
pub mod project;

// Re-export foundation types
pub use base::{LineIndex, Position, RemapError, TextRange, TextSize};

// Re-export the main entry points
pub use mapping::{ClassMapping, MappingProvider, MappingSet};
pub use pattern::Patterns;
pub use project::{FileResult, RemapConfig, RemapOutput, Source, Transformer};
pub use remap::remap_file;
