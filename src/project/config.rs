//! Run configuration.

use std::path::PathBuf;

use crate::remap::RemapOptions;

/// Settings for a remapping run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemapConfig {
    /// Compile classpath handed to the resolution service.
    pub classpath: Vec<PathBuf>,
    /// Qualified name of the annotation marking pattern methods. Patterns
    /// are not loaded when unset.
    pub pattern_annotation: Option<String>,
    /// Report unqualified accesses to renamed fields as errors.
    pub forbid_implicit_field_access: bool,
    /// Process files on the rayon thread pool.
    pub parallel: bool,
}

impl Default for RemapConfig {
    fn default() -> Self {
        Self {
            classpath: Vec::new(),
            pattern_annotation: None,
            forbid_implicit_field_access: true,
            parallel: true,
        }
    }
}

impl RemapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classpath<I, P>(mut self, classpath: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.classpath = classpath.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pattern_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.pattern_annotation = Some(annotation.into());
        self
    }

    pub fn with_forbid_implicit_field_access(mut self, forbid: bool) -> Self {
        self.forbid_implicit_field_access = forbid;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Options for the per-file rename passes.
    pub fn remap_options(&self) -> RemapOptions {
        RemapOptions {
            forbid_implicit_field_access: self.forbid_implicit_field_access,
        }
    }
}
