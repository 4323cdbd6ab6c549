//! Multi-file driver.

use indexmap::IndexMap;
use rayon::prelude::*;

use super::config::RemapConfig;
use crate::base::RemapError;
use crate::hir::{Diagnostic, Resolution, ResolutionService};
use crate::mapping::MappingProvider;
use crate::pattern::Patterns;
use crate::remap::{FileResult, Remapper};

/// A source file handed to [`Transformer::remap_sources`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Results of a run, in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemapOutput {
    files: IndexMap<String, FileResult>,
}

impl RemapOutput {
    pub fn get(&self, file_name: &str) -> Option<&FileResult> {
        self.files.get(file_name)
    }

    /// Rewritten text of `file_name`.
    pub fn text(&self, file_name: &str) -> Option<&str> {
        self.get(file_name).map(|r| r.text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileResult)> {
        self.files.iter().map(|(name, result)| (name.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Error diagnostics of every file, with the file name.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &Diagnostic)> {
        self.iter()
            .flat_map(|(name, result)| result.errors().map(move |d| (name, d)))
    }

    /// True if no file reported an error.
    pub fn is_success(&self) -> bool {
        self.files.values().all(|r| !r.has_errors())
    }

    pub fn into_files(self) -> IndexMap<String, FileResult> {
        self.files
    }
}

impl FromIterator<(String, FileResult)> for RemapOutput {
    fn from_iter<I: IntoIterator<Item = (String, FileResult)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// Remaps sources with one mapping set, pattern set and configuration.
#[derive(Debug)]
pub struct Transformer<M> {
    mappings: M,
    patterns: Patterns,
    config: RemapConfig,
}

impl<M: MappingProvider> Transformer<M> {
    pub fn new(mappings: M) -> Self {
        Self {
            mappings,
            patterns: Patterns::new(),
            config: RemapConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RemapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_patterns(mut self, patterns: Patterns) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn mappings(&self) -> &M {
        &self.mappings
    }

    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    pub fn config(&self) -> &RemapConfig {
        &self.config
    }

    /// Read patterns from a before/after source pair using the configured
    /// pattern annotation. Returns how many were added; none are read when
    /// no annotation is configured.
    pub fn load_patterns<S: ResolutionService>(
        &mut self,
        service: &S,
        before: &Source,
        after: &Source,
    ) -> Result<usize, RemapError> {
        let Some(annotation) = self.config.pattern_annotation.as_deref() else {
            return Ok(0);
        };
        let classpath = &self.config.classpath;
        let before = service.parse_and_resolve(&before.name, &before.text, classpath)?;
        let after = service.parse_and_resolve(&after.name, &after.text, classpath)?;
        let patterns = Patterns::read(&before, &after, annotation)?;
        let count = patterns.len();
        self.patterns.extend(patterns);
        Ok(count)
    }

    /// Remap one resolved file.
    pub fn remap_file<R: Resolution>(&self, file: &R) -> FileResult {
        let mut remapper = Remapper::new(file, &self.mappings, self.config.remap_options());
        self.patterns.apply(file, remapper.session());
        remapper.finish()
    }

    /// Remap resolved files, on the rayon pool when configured.
    pub fn remap<R: Resolution>(&self, files: &[R]) -> RemapOutput {
        let remap_one = |file: &R| (file.file_name().to_string(), self.remap_file(file));
        let output: RemapOutput = if self.config.parallel {
            files.par_iter().map(remap_one).collect::<Vec<_>>().into_iter().collect()
        } else {
            files.iter().map(remap_one).collect()
        };
        tracing::debug!(
            files = output.len(),
            errors = output.errors().count(),
            "remap run finished"
        );
        output
    }

    /// Resolve `sources` through `service`, then remap them.
    ///
    /// Fails if any source cannot be resolved.
    pub fn remap_sources<S: ResolutionService>(
        &self,
        service: &S,
        sources: &[Source],
    ) -> Result<RemapOutput, RemapError> {
        let classpath = &self.config.classpath;
        let resolve = |source: &Source| service.parse_and_resolve(&source.name, &source.text, classpath);
        let files: Vec<S::File> = if self.config.parallel {
            sources.par_iter().map(resolve).collect::<Result<_, _>>()?
        } else {
            sources.iter().map(resolve).collect::<Result<_, _>>()?
        };
        Ok(self.remap(&files))
    }
}
