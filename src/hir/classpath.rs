//! Shared class lookup for all files of a run.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::symbols::ClassInfo;

/// Classes visible to every file, indexed by binary and qualified name.
///
/// Lookups accept `a.pkg.A$Inner`, `a.pkg.A.Inner` and `a/pkg/A$Inner`.
#[derive(Clone, Debug, Default)]
pub struct Classpath {
    classes: FxHashMap<SmolStr, Arc<ClassInfo>>,
    by_qualified_name: FxHashMap<SmolStr, SmolStr>,
}

impl Classpath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, info: ClassInfo) {
        let binary_name = info.class.binary_name.clone();
        self.by_qualified_name
            .insert(info.class.qualified_name.clone(), binary_name.clone());
        self.classes.insert(binary_name, Arc::new(info));
    }

    pub fn with(mut self, info: ClassInfo) -> Self {
        self.add(info);
        self
    }

    pub fn find(&self, name: &str) -> Option<Arc<ClassInfo>> {
        let name = name.replace('/', ".");
        if let Some(info) = self.classes.get(name.as_str()) {
            return Some(info.clone());
        }
        let binary_name = self.by_qualified_name.get(name.as_str())?;
        self.classes.get(binary_name).cloned()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
