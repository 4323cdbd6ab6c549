//! Class, field and method rename tables.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::descriptor::remap_method_descriptor;

/// Normalize any class name spelling to internal form, `a/pkg/A$Inner`.
pub fn internal_name(name: &str) -> String {
    name.replace('.', "/")
}

// ============================================================================
// MAPPING PROVIDER
// ============================================================================

/// Source of class mappings consumed by the rewriter.
pub trait MappingProvider: Send + Sync {
    /// Mapping for a class by binary, internal or dotted-binary name.
    fn lookup_class(&self, name: &str) -> Option<&ClassMapping>;

    /// Like [`lookup_class`](Self::lookup_class), but also tries reading
    /// trailing `.` separators as nested class separators, so that
    /// `a.pkg.A.Inner` finds `a/pkg/A$Inner`.
    fn potential_inner_class(&self, name: &str) -> Option<&ClassMapping> {
        let mut candidate = name.to_string();
        loop {
            if let Some(mapping) = self.lookup_class(&candidate) {
                return Some(mapping);
            }
            let dot = candidate.rfind('.')?;
            candidate.replace_range(dot..=dot, "$");
        }
    }
}

// ============================================================================
// CLASS MAPPING
// ============================================================================

/// Key of a method mapping. Mapping formats without descriptors produce
/// name-only keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub name: SmolStr,
    pub descriptor: Option<SmolStr>,
}

/// Rename record for one class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassMapping {
    obfuscated: SmolStr,
    deobfuscated: SmolStr,
    fields: IndexMap<SmolStr, SmolStr>,
    methods: IndexMap<MethodKey, SmolStr>,
}

impl ClassMapping {
    pub fn new(obfuscated: &str, deobfuscated: &str) -> Self {
        Self {
            obfuscated: internal_name(obfuscated).into(),
            deobfuscated: internal_name(deobfuscated).into(),
            fields: IndexMap::new(),
            methods: IndexMap::new(),
        }
    }

    /// Old name in internal form, `a/pkg/A$Inner`.
    pub fn obfuscated_name(&self) -> &str {
        &self.obfuscated
    }

    /// New name in internal form, `b/pkg/B$Inner`.
    pub fn deobfuscated_name(&self) -> &str {
        &self.deobfuscated
    }

    /// New name as written in source, `b.pkg.B.Inner`.
    pub fn deobfuscated_qualified_name(&self) -> String {
        self.deobfuscated.replace(['/', '$'], ".")
    }

    /// New name with dots for packages and `$` for nesting, `b.pkg.B$Inner`.
    pub fn deobfuscated_binary_name(&self) -> String {
        self.deobfuscated.replace('/', ".")
    }

    pub fn field(&mut self, old: &str, new: &str) -> &mut Self {
        self.fields.insert(old.into(), new.into());
        self
    }

    pub fn method(&mut self, old: &str, descriptor: &str, new: &str) -> &mut Self {
        let key = MethodKey {
            name: old.into(),
            descriptor: Some(descriptor.into()),
        };
        self.methods.insert(key, new.into());
        self
    }

    /// Add a method mapping that applies to every overload of `old`.
    pub fn method_by_name(&mut self, old: &str, new: &str) -> &mut Self {
        let key = MethodKey {
            name: old.into(),
            descriptor: None,
        };
        self.methods.insert(key, new.into());
        self
    }

    pub fn lookup_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(SmolStr::as_str)
    }

    /// Mapped method name, trying the exact descriptor before a name-only entry.
    pub fn lookup_method(&self, name: &str, descriptor: &str) -> Option<&str> {
        let exact = MethodKey {
            name: name.into(),
            descriptor: Some(descriptor.into()),
        };
        if let Some(mapped) = self.methods.get(&exact) {
            return Some(mapped);
        }
        let by_name = MethodKey {
            name: name.into(),
            descriptor: None,
        };
        self.methods.get(&by_name).map(SmolStr::as_str)
    }

    /// First method mapping with the given old name, any descriptor.
    pub fn lookup_method_by_name(&self, name: &str) -> Option<&str> {
        self.methods
            .iter()
            .find(|(key, _)| key.name == name)
            .map(|(_, mapped)| mapped.as_str())
    }

    /// Number of method mappings whose new name is `name`.
    pub fn count_methods_mapped_to(&self, name: &str) -> usize {
        self.methods.values().filter(|mapped| *mapped == name).count()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn methods(&self) -> impl Iterator<Item = (&MethodKey, &str)> {
        self.methods.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn has_methods(&self) -> bool {
        !self.methods.is_empty()
    }
}

// ============================================================================
// MAPPING SET
// ============================================================================

/// All class mappings of a run, keyed by old internal name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappingSet {
    classes: IndexMap<SmolStr, ClassMapping>,
}

impl MappingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the mapping for class `old`, renaming it to `new`.
    ///
    /// Nested classes are mapped by their full names, `a.pkg.A$Inner`.
    pub fn class(&mut self, old: &str, new: &str) -> &mut ClassMapping {
        let key: SmolStr = internal_name(old).into();
        let mapping = self
            .classes
            .entry(key)
            .or_insert_with(|| ClassMapping::new(old, new));
        mapping.deobfuscated = internal_name(new).into();
        mapping
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassMapping> {
        self.classes.values()
    }

    /// The same renames in the opposite direction.
    ///
    /// Method descriptors are rewritten into the new namespace so the
    /// inverted set is keyed the way the renamed sources spell them.
    pub fn inverted(&self) -> MappingSet {
        let mut inverted = MappingSet::new();
        for class in self.classes.values() {
            let target = inverted.class(&class.deobfuscated, &class.obfuscated);
            for (old, new) in &class.fields {
                target.field(new, old);
            }
            for (key, new) in &class.methods {
                match &key.descriptor {
                    Some(descriptor) => {
                        let descriptor = remap_method_descriptor(self, descriptor);
                        target.method(new, &descriptor, &key.name);
                    }
                    None => {
                        target.method_by_name(new, &key.name);
                    }
                }
            }
        }
        inverted
    }
}

impl MappingProvider for MappingSet {
    fn lookup_class(&self, name: &str) -> Option<&ClassMapping> {
        self.classes.get(internal_name(name).as_str())
    }
}
