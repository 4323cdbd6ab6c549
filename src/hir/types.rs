//! JVM types and method descriptors.
//!
//! Types are what the resolution service infers for expressions; the pattern
//! matcher needs them to decide whether a captured expression fits a
//! pattern parameter.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::symbols::ClassInfo;

const OBJECT: &str = "java.lang.Object";

// ============================================================================
// METHOD DESCRIPTORS
// ============================================================================

/// A method descriptor in bytecode form, `(ILa/pkg/A;)V`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodDescriptor(SmolStr);

impl MethodDescriptor {
    pub fn new(descriptor: impl Into<SmolStr>) -> Self {
        Self(descriptor.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Descriptor takes at least one argument.
    pub fn has_parameters(&self) -> bool {
        !self.0.starts_with("()")
    }

    /// Return type is `void`.
    pub fn returns_void(&self) -> bool {
        self.0.ends_with(")V")
    }
}

impl From<&str> for MethodDescriptor {
    fn from(descriptor: &str) -> Self {
        Self::new(descriptor)
    }
}

impl From<String> for MethodDescriptor {
    fn from(descriptor: String) -> Self {
        Self::new(descriptor)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// TYPES
// ============================================================================

/// Primitive JVM types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    fn descriptor(self) -> char {
        match self {
            Primitive::Boolean => 'Z',
            Primitive::Byte => 'B',
            Primitive::Char => 'C',
            Primitive::Short => 'S',
            Primitive::Int => 'I',
            Primitive::Long => 'J',
            Primitive::Float => 'F',
            Primitive::Double => 'D',
        }
    }

    fn from_descriptor(c: char) -> Option<Self> {
        Some(match c {
            'Z' => Primitive::Boolean,
            'B' => Primitive::Byte,
            'C' => Primitive::Char,
            'S' => Primitive::Short,
            'I' => Primitive::Int,
            'J' => Primitive::Long,
            'F' => Primitive::Float,
            'D' => Primitive::Double,
            _ => return None,
        })
    }

    fn box_class(self) -> &'static str {
        match self {
            Primitive::Boolean => "java.lang.Boolean",
            Primitive::Byte => "java.lang.Byte",
            Primitive::Char => "java.lang.Character",
            Primitive::Short => "java.lang.Short",
            Primitive::Int => "java.lang.Integer",
            Primitive::Long => "java.lang.Long",
            Primitive::Float => "java.lang.Float",
            Primitive::Double => "java.lang.Double",
        }
    }

    /// Widening primitive conversion from `from` to `self`.
    fn widens_from(self, from: Primitive) -> bool {
        use Primitive::*;
        self == from
            || match from {
                Byte => matches!(self, Short | Int | Long | Float | Double),
                Short | Char => matches!(self, Int | Long | Float | Double),
                Int => matches!(self, Long | Float | Double),
                Long => matches!(self, Float | Double),
                Float => self == Double,
                Boolean | Double => false,
            }
    }
}

/// Type of an expression or declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JvmType {
    Primitive(Primitive),
    /// A class type, by binary name.
    Class(SmolStr),
    Array(Box<JvmType>),
    /// The type of the `null` literal.
    Null,
}

impl JvmType {
    pub const INT: JvmType = JvmType::Primitive(Primitive::Int);
    pub const BOOLEAN: JvmType = JvmType::Primitive(Primitive::Boolean);

    pub fn class(binary_name: impl Into<SmolStr>) -> Self {
        JvmType::Class(binary_name.into())
    }

    pub fn string() -> Self {
        JvmType::class("java.lang.String")
    }

    pub fn array_of(component: JvmType) -> Self {
        JvmType::Array(Box::new(component))
    }

    /// Element type of an array type.
    pub fn component(&self) -> Option<&JvmType> {
        match self {
            JvmType::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, JvmType::Primitive(_))
    }

    /// Parse a field descriptor, `I`, `[La/pkg/A;`.
    pub fn from_descriptor(descriptor: &str) -> Option<Self> {
        let mut chars = descriptor.chars();
        match chars.next()? {
            '[' => Self::from_descriptor(chars.as_str()).map(Self::array_of),
            'L' => {
                let name = chars.as_str().strip_suffix(';')?;
                Some(JvmType::class(name.replace('/', ".")))
            }
            c if chars.as_str().is_empty() => Primitive::from_descriptor(c).map(JvmType::Primitive),
            _ => None,
        }
    }

    /// Field descriptor of this type; the null type has none.
    pub fn descriptor(&self) -> Option<String> {
        match self {
            JvmType::Primitive(p) => Some(p.descriptor().to_string()),
            JvmType::Class(name) => Some(format!("L{};", name.replace('.', "/"))),
            JvmType::Array(component) => component.descriptor().map(|d| format!("[{d}")),
            JvmType::Null => None,
        }
    }

    /// Check whether a value of type `from` can be assigned to `self`.
    ///
    /// `lookup` finds class information by binary name for walking
    /// supertypes. Unknown classes only match themselves.
    pub fn is_assignable_from<F>(&self, from: &JvmType, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<Arc<ClassInfo>>,
    {
        if self == from {
            return true;
        }
        match (self, from) {
            (JvmType::Primitive(to), JvmType::Primitive(from)) => to.widens_from(*from),
            (JvmType::Primitive(to), JvmType::Class(name)) => name == to.box_class(),
            (JvmType::Class(to), JvmType::Primitive(from)) => {
                to == from.box_class() || to == OBJECT
            }
            (_, JvmType::Null) => self.is_reference(),
            (JvmType::Class(to), JvmType::Array(_)) => {
                matches!(
                    to.as_str(),
                    OBJECT | "java.lang.Cloneable" | "java.io.Serializable"
                )
            }
            (JvmType::Class(to), JvmType::Class(from)) => {
                to == OBJECT || is_subclass(from, to, &lookup)
            }
            (JvmType::Array(to), JvmType::Array(from)) => {
                to.is_reference() && from.is_reference() && to.is_assignable_from(from, lookup)
            }
            _ => false,
        }
    }
}

/// Breadth-first walk of `from`'s supertypes looking for `to`.
fn is_subclass<F>(from: &str, to: &str, lookup: &F) -> bool
where
    F: Fn(&str) -> Option<Arc<ClassInfo>>,
{
    let mut visited = FxHashSet::default();
    let mut queue = VecDeque::from([SmolStr::new(from)]);
    while let Some(name) = queue.pop_front() {
        if name == to {
            return true;
        }
        if !visited.insert(name.clone()) {
            continue;
        }
        if let Some(info) = lookup(&name) {
            queue.extend(info.superclass.iter().cloned());
            queue.extend(info.interfaces.iter().cloned());
        }
    }
    false
}

impl fmt::Display for JvmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JvmType::Primitive(p) => write!(f, "{}", format!("{p:?}").to_lowercase()),
            JvmType::Class(name) => f.write_str(name),
            JvmType::Array(component) => write!(f, "{component}[]"),
            JvmType::Null => f.write_str("null"),
        }
    }
}
