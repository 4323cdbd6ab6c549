//! High-level IR (HIR): the resolved view of a source file.
//!
//! Everything the rewriter knows about semantics comes through this layer.
//! A resolution service delivers a [`Resolution`] per file; the rewriter
//! asks it what nodes bind to ([`Symbol`]), what expressions are typed as
//! ([`JvmType`]) and how classes relate ([`ClassInfo`]).
//!
//! ## Key Types
//!
//! - [`Resolution`] - Per-file tree plus bindings and types
//! - [`ResolutionService`] - Produces resolutions for source files
//! - [`ResolvedFile`] / [`FileBuilder`] - In-memory resolution
//! - [`Symbol`] - Closed set of declaration kinds
//! - [`Classpath`] - Shared class lookup
//! - [`DiagnosticCollector`] - Per-file error reporting
//!
//! ## Flow
//!
//! ```text
//! source text + classpath
//!     │
//!     ▼
//! ResolutionService::parse_and_resolve   ← external analysis
//!     │
//!     ▼
//! Resolution (tree, resolve, type_of)    ← consumed by remap/pattern
//! ```

mod classpath;
mod diagnostics;
mod resolve;
mod symbols;
mod types;

pub use classpath::Classpath;
pub use diagnostics::{Diagnostic, DiagnosticCollector, Severity, codes};
pub use resolve::{FileBuilder, NodeKey, PreResolved, Resolution, ResolutionService, ResolvedFile};
pub use symbols::{ClassInfo, ClassRef, FieldRef, MethodRef, Symbol};
pub use types::{JvmType, MethodDescriptor, Primitive};
