//! Remapping of bytecode type and member descriptors.
//!
//! Descriptors use internal names (`La/pkg/A;`) and appear in mapping keys
//! and in Mixin target strings such as `La/pkg/A;aMethod(I)V`.

use super::set::{ClassMapping, MappingProvider};

/// Remap one field type descriptor, appending the result to `out`.
///
/// Arrays keep their dimensions. Returns the mapping of the element class
/// when one applies.
pub fn remap_internal_type<'m, M>(mappings: &'m M, ty: &str, out: &mut String) -> Option<&'m ClassMapping>
where
    M: MappingProvider + ?Sized,
{
    let element = ty.trim_start_matches('[');
    out.push_str(&ty[..ty.len() - element.len()]);

    let class = element
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'));
    match class.and_then(|name| mappings.lookup_class(name)) {
        Some(mapping) => {
            out.push('L');
            out.push_str(mapping.deobfuscated_name());
            out.push(';');
            Some(mapping)
        }
        None => {
            out.push_str(element);
            None
        }
    }
}

/// Remap a field type descriptor.
pub fn remap_type<M>(mappings: &M, ty: &str) -> String
where
    M: MappingProvider + ?Sized,
{
    let mut out = String::with_capacity(ty.len());
    remap_internal_type(mappings, ty, &mut out);
    out
}

/// Split the argument list of a method descriptor into its types.
///
/// Anything that does not parse is returned as one trailing chunk so it can
/// be copied through unchanged.
fn split_types(args: &str) -> Vec<&str> {
    let mut types = Vec::new();
    let mut rest = args;
    while !rest.is_empty() {
        let dims = rest.len() - rest.trim_start_matches('[').len();
        let end = match rest[dims..].chars().next() {
            Some('L') => match rest.find(';') {
                Some(semi) => semi + 1,
                None => rest.len(),
            },
            Some(c) => dims + c.len_utf8(),
            None => rest.len(),
        };
        let (ty, tail) = rest.split_at(end);
        types.push(ty);
        rest = tail;
    }
    types
}

/// Remap every class in a method descriptor, `(La/pkg/A;I)[La/pkg/A;`.
pub fn remap_method_descriptor<M>(mappings: &M, descriptor: &str) -> String
where
    M: MappingProvider + ?Sized,
{
    let Some((args, ret)) = descriptor
        .strip_prefix('(')
        .and_then(|rest| rest.split_once(')'))
    else {
        return descriptor.to_string();
    };

    let mut out = String::with_capacity(descriptor.len());
    out.push('(');
    for ty in split_types(args) {
        remap_internal_type(mappings, ty, &mut out);
    }
    out.push(')');
    remap_internal_type(mappings, ret, &mut out);
    out
}

// ============================================================================
// MEMBER SELECTORS
// ============================================================================

/// What a member selector names after the owner and name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberKind<'a> {
    /// Method with its descriptor, `(I)V`.
    Method(&'a str),
    /// Field with its type, `I`.
    Field(&'a str),
}

/// A fully qualified member reference, `La/pkg/A;name(I)V` or
/// `La/pkg/A;name:I`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberSelector<'a> {
    /// Owner descriptor including `L` and `;`, empty when omitted.
    pub owner: &'a str,
    pub name: &'a str,
    pub kind: MemberKind<'a>,
}

impl<'a> MemberSelector<'a> {
    /// Parse a selector; `None` unless it has a descriptor or a field type.
    pub fn parse(selector: &'a str) -> Option<Self> {
        let split = selector.find(['(', ':'])?;
        let (head, tail) = selector.split_at(split);
        let (owner, name) = match head.find(';') {
            Some(semi) if head.starts_with('L') => head.split_at(semi + 1),
            _ => ("", head),
        };
        let kind = match tail.strip_prefix(':') {
            Some(ty) => MemberKind::Field(ty),
            None => MemberKind::Method(tail),
        };
        Some(Self { owner, name, kind })
    }

    /// Owner class in internal form, `a/pkg/A`.
    pub fn owner_name(&self) -> Option<&'a str> {
        self.owner.strip_prefix('L')?.strip_suffix(';')
    }
}
