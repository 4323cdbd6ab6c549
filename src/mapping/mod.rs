//! Mapping provider: old-to-new names for classes and their members.
//!
//! Class names are stored in internal form (`a/pkg/A$Inner`) and accepted
//! in any spelling on lookup. Reading mapping files is left to callers; a
//! [`MappingSet`] is built programmatically or by a format reader.

mod descriptor;
mod set;

pub use descriptor::{
    MemberKind, MemberSelector, remap_internal_type, remap_method_descriptor, remap_type,
};
pub use set::{ClassMapping, MappingProvider, MappingSet, MethodKey, internal_name};
