//! Per-file state shared by the rewrite passes.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use text_size::TextRange;

use super::edits::{EditBuffer, EditConflict};
use super::members::MemberResolver;
use super::{FileResult, RemapOptions};
use crate::hir::{DiagnosticCollector, Resolution};
use crate::mapping::{ClassMapping, MappingProvider};
use crate::syntax::Language;

/// Mixin classes seen so far in a file, by qualified name, with the
/// mapping of the class they patch.
pub type MixinTargets<'a> = FxHashMap<SmolStr, &'a ClassMapping>;

/// Edits and reports accumulated for one file.
#[derive(Debug)]
pub struct EditSession {
    pub edits: EditBuffer,
    pub diagnostics: DiagnosticCollector,
    pub conflicts: Vec<EditConflict>,
}

impl EditSession {
    pub fn new(text: &str) -> Self {
        Self {
            edits: EditBuffer::new(),
            diagnostics: DiagnosticCollector::new(text),
            conflicts: Vec::new(),
        }
    }

    /// Record a rejected edit, with a warning at its start.
    pub fn conflict(&mut self, range: TextRange, text: impl Into<String>) {
        let text = text.into();
        let existing = self.edits.overlapping(range);
        self.diagnostics.edit_conflict(
            range.start(),
            format!("Conflicting edit {text:?} at {range:?} overlaps {existing:?}"),
        );
        self.conflicts.push(EditConflict {
            range,
            text,
            existing,
        });
    }

    /// Apply all queued edits to `text`.
    pub fn finish(mut self, text: &str) -> FileResult {
        let (result, conflicts) = self.edits.commit(text);
        for conflict in conflicts {
            tracing::warn!(range = ?conflict.range, text = %conflict.text, "edit conflict on commit");
            self.diagnostics.edit_conflict(
                conflict.range.start(),
                format!(
                    "Conflicting edit {:?} at {:?} overlaps {:?}",
                    conflict.text, conflict.range, conflict.existing
                ),
            );
            self.conflicts.push(conflict);
        }
        FileResult {
            text: result,
            diagnostics: self.diagnostics.into_diagnostics(),
            conflicts: self.conflicts,
        }
    }
}

/// Everything a rewrite pass needs for one file.
pub(crate) struct RemapContext<'a> {
    pub file: &'a dyn Resolution,
    pub mappings: &'a dyn MappingProvider,
    pub options: RemapOptions,
    pub mixins: MixinTargets<'a>,
    pub session: EditSession,
}

impl<'a> RemapContext<'a> {
    pub fn new(
        file: &'a dyn Resolution,
        mappings: &'a dyn MappingProvider,
        options: RemapOptions,
    ) -> Self {
        Self {
            file,
            mappings,
            options,
            mixins: MixinTargets::default(),
            session: EditSession::new(file.text()),
        }
    }

    pub fn members(&self) -> MemberResolver<'a, '_> {
        MemberResolver::new(self.file, self.mappings, &self.mixins)
    }

    pub fn is_kotlin(&self) -> bool {
        self.file.language() == Language::Kotlin
    }

    pub fn is_free(&self, range: TextRange) -> bool {
        self.session.edits.is_free(range)
    }

    /// Queue a replacement; replacing text with itself is dropped.
    pub fn replace(&mut self, range: TextRange, text: &str) {
        if self.file.text().get(usize::from(range.start())..usize::from(range.end())) == Some(text) {
            return;
        }
        tracing::trace!(file = %self.file.file_name(), ?range, text, "queue edit");
        self.session.edits.queue(range, text);
    }
}
