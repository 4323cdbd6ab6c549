//! Diagnostics: per-file error reporting.
//!
//! Recoverable problems found while remapping a file are collected here
//! instead of aborting the run. A file with any error diagnostic still
//! yields its partially rewritten text, but the run is reported as failed.

use std::fmt;
use std::sync::Arc;

use text_size::TextSize;

use crate::base::LineIndex;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Line (0-indexed).
    pub line: u32,
    /// Column (0-indexed).
    pub col: u32,
    /// Severity level.
    pub severity: Severity,
    /// Error/warning code (e.g., "E0001").
    pub code: Option<Arc<str>>,
    /// The diagnostic message.
    pub message: Arc<str>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(line: u32, col: u32, message: impl Into<Arc<str>>) -> Self {
        Self {
            line,
            col,
            severity: Severity::Error,
            code: None,
            message: message.into(),
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(line: u32, col: u32, message: impl Into<Arc<str>>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(line, col, message)
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    /// Formats as `line:col: message` with 1-based line numbers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line + 1, self.col + 1, self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
///
/// ## Error Code Ranges
///
/// - **E0001-E0099**: Remapping errors (the file is marked failed)
/// - **W0001-W0099**: Warnings (reported, run continues as successful)
pub mod codes {
    /// Injector target name matches several overloads and gives no descriptor.
    pub const AMBIGUOUS_INJECTION_TARGET: &str = "E0001";
    /// Unqualified access to a field whose name changes.
    pub const IMPLICIT_FIELD_ACCESS: &str = "E0002";
    /// Accessor or invoker whose target member cannot be determined.
    pub const UNKNOWN_ACCESSOR_TARGET: &str = "E0003";
    /// Overlapping edits that could not both be applied.
    pub const EDIT_CONFLICT: &str = "W0001";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics for one file.
#[derive(Clone, Debug)]
pub struct DiagnosticCollector {
    line_index: LineIndex,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector for `text`.
    pub fn new(text: &str) -> Self {
        Self {
            line_index: LineIndex::new(text),
            diagnostics: Vec::new(),
        }
    }

    /// Add a diagnostic.
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn at(&self, offset: TextSize) -> (u32, u32) {
        let pos = self.line_index.position(offset);
        (pos.line as u32, pos.column as u32)
    }

    /// Add an error at a byte offset.
    pub fn error_at(&mut self, offset: TextSize, code: &str, message: impl Into<Arc<str>>) {
        let (line, col) = self.at(offset);
        self.add(Diagnostic::error(line, col, message).with_code(code));
    }

    /// Add a warning at a byte offset.
    pub fn warning_at(&mut self, offset: TextSize, code: &str, message: impl Into<Arc<str>>) {
        let (line, col) = self.at(offset);
        self.add(Diagnostic::warning(line, col, message).with_code(code));
    }

    /// Add an ambiguous injector target error.
    pub fn ambiguous_injection_target(&mut self, offset: TextSize, name: &str, candidates: &[String]) {
        let candidates: Vec<_> = candidates.iter().map(|c| format!("\"{c}\"")).collect();
        self.error_at(
            offset,
            codes::AMBIGUOUS_INJECTION_TARGET,
            format!(
                "Ambiguous mixin method \"{name}\" may refer to any of: {}",
                candidates.join(", ")
            ),
        );
    }

    /// Add an implicit field access error.
    pub fn implicit_field_access(&mut self, offset: TextSize, field: &str) {
        self.error_at(
            offset,
            codes::IMPLICIT_FIELD_ACCESS,
            format!(
                "Implicit member reference to remapped field \"{field}\". \
                 This can cause issues if the remapped reference becomes shadowed by a local variable \
                 and is therefore forbidden. Use \"this.{field}\" instead."
            ),
        );
    }

    /// Add an undeterminable accessor target error.
    pub fn unknown_accessor_target(&mut self, offset: TextSize, method: &str) {
        self.error_at(
            offset,
            codes::UNKNOWN_ACCESSOR_TARGET,
            format!("Cannot determine accessor target for {method}"),
        );
    }

    /// Add an edit conflict warning.
    pub fn edit_conflict(&mut self, offset: TextSize, message: impl Into<Arc<str>>) {
        self.warning_at(offset, codes::EDIT_CONFLICT, message);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
