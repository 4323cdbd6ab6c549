//! Member resolver: the new name of a method or field declaration.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::context::MixinTargets;
use super::mixin::names;
use crate::hir::{FieldRef, MethodRef, Resolution};
use crate::mapping::MappingProvider;

/// Looks up renamed members, walking class hierarchies for methods.
pub struct MemberResolver<'a, 'm> {
    file: &'a dyn Resolution,
    mappings: &'a dyn MappingProvider,
    mixins: &'m MixinTargets<'a>,
}

impl<'a, 'm> MemberResolver<'a, 'm> {
    pub fn new(
        file: &'a dyn Resolution,
        mappings: &'a dyn MappingProvider,
        mixins: &'m MixinTargets<'a>,
    ) -> Self {
        Self {
            file,
            mappings,
            mixins,
        }
    }

    /// New name of `method`, or `None` if no mapping applies.
    ///
    /// Members of a mixin class only count when they stand in for a member
    /// of the target (shadowed, overwritten or overriding).
    pub fn method_mapping(&self, method: &MethodRef) -> Option<&'a str> {
        if let Some(target) = self.mixins.get(&method.owner.qualified_name) {
            let stands_in = [names::SHADOW, names::OVERWRITE, names::OVERRIDE]
                .iter()
                .any(|a| method.has_annotation(a));
            if !stands_in {
                return None;
            }
            if let Some(mapped) = target.lookup_method(&method.name, method.descriptor.as_str()) {
                return Some(mapped);
            }
        }

        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([method.owner.binary_name.clone()]);
        while let Some(class) = queue.pop_front() {
            if !visited.insert(class.clone()) {
                continue;
            }
            if let Some(info) = self.file.find_class(&class) {
                queue.extend(info.superclass.iter().cloned());
                queue.extend(info.interfaces.iter().cloned());
            }
            let mapped = self
                .mappings
                .lookup_class(&class)
                .and_then(|m| m.lookup_method(&method.name, method.descriptor.as_str()));
            if mapped.is_some() {
                return mapped;
            }
        }
        None
    }

    /// New name of `field`, from its owner's (or mixin target's) mapping.
    pub fn field_mapping(&self, field: &FieldRef) -> Option<&'a str> {
        let mapping = match self.mixins.get(&field.owner.qualified_name) {
            Some(&target) => target,
            None => self.mappings.lookup_class(&field.owner.binary_name)?,
        };
        mapping.lookup_field(&field.name)
    }

    /// Method declared by `owner` or one of its supertypes.
    pub fn find_method_in_hierarchy(
        &self,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> Option<MethodRef> {
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::from([SmolStr::new(owner)]);
        while let Some(class) = queue.pop_front() {
            if !visited.insert(class.clone()) {
                continue;
            }
            let Some(info) = self.file.find_class(&class) else {
                continue;
            };
            if let Some(method) = info.find_method(name, descriptor) {
                return Some(method.clone());
            }
            queue.extend(info.superclass.iter().cloned());
            queue.extend(info.interfaces.iter().cloned());
        }
        None
    }
}
