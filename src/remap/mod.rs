//! Rename engine for one resolved file.
//!
//! A [`Remapper`] owns the file's [`EditSession`]. Passes queue edits into
//! it (patterns first, when configured, then the mixin pass for Java, then
//! the reference walk) and [`Remapper::finish`] commits them against the
//! original text.

mod context;
mod edits;
mod members;
mod mixin;
mod references;

pub use context::{EditSession, MixinTargets};
pub use edits::{EditBuffer, EditConflict};
pub use members::MemberResolver;
pub use mixin::names;

use context::RemapContext;

use crate::hir::{Diagnostic, Resolution};
use crate::mapping::MappingProvider;
use crate::syntax::Language;

/// Switches for the rename passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemapOptions {
    /// Report unqualified accesses to renamed fields as errors.
    pub forbid_implicit_field_access: bool,
}

impl Default for RemapOptions {
    fn default() -> Self {
        Self {
            forbid_implicit_field_access: true,
        }
    }
}

/// Rewritten text of one file and what went wrong on the way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileResult {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
    pub conflicts: Vec<EditConflict>,
}

impl FileResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }
}

/// Rewrites one file.
pub struct Remapper<'a> {
    cx: RemapContext<'a>,
}

impl<'a> Remapper<'a> {
    pub fn new(
        file: &'a dyn Resolution,
        mappings: &'a dyn MappingProvider,
        options: RemapOptions,
    ) -> Self {
        Self {
            cx: RemapContext::new(file, mappings, options),
        }
    }

    /// Edits queued so far, for passes that run before the rename walk.
    pub fn session(&mut self) -> &mut EditSession {
        &mut self.cx.session
    }

    /// Run the rename passes and commit every queued edit.
    pub fn finish(mut self) -> FileResult {
        let file = self.cx.file;
        let root = file.root();
        match file.language() {
            Language::Java => {
                mixin::remap_mixins(&mut self.cx, &root);
                references::remap_java(&mut self.cx, &root);
            }
            Language::Kotlin => references::remap_kotlin(&mut self.cx, &root),
        }
        tracing::debug!(
            file = %file.file_name(),
            edits = self.cx.session.edits.len(),
            mixins = self.cx.mixins.len(),
            "remapped file"
        );
        self.cx.session.finish(file.text())
    }
}

/// Rename everything `mappings` renames in `file`.
pub fn remap_file(
    file: &dyn Resolution,
    mappings: &dyn MappingProvider,
    options: RemapOptions,
) -> FileResult {
    Remapper::new(file, mappings, options).finish()
}
