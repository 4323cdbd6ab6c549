//! Resolved declarations: what a reference or declaration node binds to.
//!
//! The resolution service reports every resolvable node as a [`Symbol`].
//! The set of declaration kinds is closed, so the rewriter matches on it
//! exhaustively rather than dispatching through a trait hierarchy.

use std::sync::Arc;

use smol_str::SmolStr;

use super::types::MethodDescriptor;

// ============================================================================
// CLASS REFERENCES
// ============================================================================

/// Names of a class as seen from source and from bytecode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassRef {
    /// Source-level name, `a.pkg.A.Inner`.
    pub qualified_name: SmolStr,
    /// Binary name with `$` before nested classes, `a.pkg.A$Inner`.
    pub binary_name: SmolStr,
}

impl ClassRef {
    /// Build from a binary name; the qualified name replaces `$` with `.`.
    pub fn new(binary_name: impl Into<SmolStr>) -> Self {
        let binary_name = binary_name.into();
        Self {
            qualified_name: binary_name.replace('$', ".").into(),
            binary_name,
        }
    }

    /// Build with an explicit qualified name (local and anonymous classes).
    pub fn with_qualified_name(
        binary_name: impl Into<SmolStr>,
        qualified_name: impl Into<SmolStr>,
    ) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            binary_name: binary_name.into(),
        }
    }

    /// Internal name used in descriptors, `a/pkg/A$Inner`.
    pub fn internal_name(&self) -> String {
        self.binary_name.replace('.', "/")
    }
}

// ============================================================================
// MEMBER REFERENCES
// ============================================================================

/// A resolved method or constructor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub owner: ClassRef,
    pub name: SmolStr,
    pub descriptor: MethodDescriptor,
    pub is_static: bool,
    pub is_constructor: bool,
    /// Qualified names of the annotations on the declaration.
    pub annotations: Vec<SmolStr>,
}

impl MethodRef {
    pub fn new(
        owner: ClassRef,
        name: impl Into<SmolStr>,
        descriptor: impl Into<MethodDescriptor>,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            descriptor: descriptor.into(),
            is_static: false,
            is_constructor: false,
            annotations: Vec::new(),
        }
    }

    /// A constructor of `owner`, named `<init>` as in bytecode.
    pub fn constructor(owner: ClassRef, descriptor: impl Into<MethodDescriptor>) -> Self {
        Self {
            is_constructor: true,
            ..Self::new(owner, "<init>", descriptor)
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<SmolStr>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn has_annotation(&self, qualified_name: &str) -> bool {
        self.annotations.iter().any(|a| a == qualified_name)
    }

    pub fn has_parameters(&self) -> bool {
        self.descriptor.has_parameters()
    }

    pub fn returns_void(&self) -> bool {
        self.descriptor.returns_void()
    }

    /// Same declaration, ignoring modifiers and annotations.
    pub fn same_signature(&self, other: &MethodRef) -> bool {
        self.owner.binary_name == other.owner.binary_name
            && self.name == other.name
            && self.descriptor == other.descriptor
    }
}

/// A resolved field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub owner: ClassRef,
    pub name: SmolStr,
    /// Field type descriptor, `I` or `La/pkg/A;`.
    pub descriptor: SmolStr,
}

impl FieldRef {
    pub fn new(owner: ClassRef, name: impl Into<SmolStr>, descriptor: impl Into<SmolStr>) -> Self {
        Self {
            owner,
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }
}

// ============================================================================
// CLASS INFORMATION
// ============================================================================

/// Structural information about a class on the classpath or in a source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassInfo {
    pub class: ClassRef,
    /// Binary name of the direct superclass.
    pub superclass: Option<SmolStr>,
    /// Binary names of the direct interfaces, in declaration order.
    pub interfaces: Vec<SmolStr>,
    /// Declared methods and constructors (not inherited ones).
    pub methods: Vec<MethodRef>,
    /// Declared fields.
    pub fields: Vec<FieldRef>,
}

impl ClassInfo {
    pub fn new(class: ClassRef) -> Self {
        Self {
            class,
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn extends(mut self, superclass: impl Into<SmolStr>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<SmolStr>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Add a method declared by this class.
    pub fn method(mut self, name: &str, descriptor: &str) -> Self {
        let method = MethodRef::new(self.class.clone(), name, descriptor);
        self.methods.push(method);
        self
    }

    /// Add a static method declared by this class.
    pub fn static_method(mut self, name: &str, descriptor: &str) -> Self {
        let method = MethodRef::new(self.class.clone(), name, descriptor).with_static(true);
        self.methods.push(method);
        self
    }

    /// Add a constructor declared by this class.
    pub fn constructor(mut self, descriptor: &str) -> Self {
        let method = MethodRef::constructor(self.class.clone(), descriptor);
        self.methods.push(method);
        self
    }

    /// Add a field declared by this class.
    pub fn field(mut self, name: &str, descriptor: &str) -> Self {
        let field = FieldRef::new(self.class.clone(), name, descriptor);
        self.fields.push(field);
        self
    }

    /// Declared methods called `name`, in declaration order.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodRef> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&MethodRef> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.descriptor.as_str() == descriptor)
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldRef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

// ============================================================================
// SYMBOLS
// ============================================================================

/// What a node resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// A Java or Kotlin field.
    Field(Arc<FieldRef>),
    /// A Java method or constructor.
    Method(Arc<MethodRef>),
    /// A Kotlin named function, seen through its JVM method.
    Function(Arc<MethodRef>),
    /// A class, interface or enum.
    Class(ClassRef),
    /// A package, by dotted name.
    Package(SmolStr),
    /// A Kotlin property synthesized from a Java getter (and setter).
    SyntheticProperty { getter: Arc<MethodRef> },
    /// A callable with no source declaration, known only by what it overrides.
    CompiledFunction { overridden: Vec<Symbol> },
}

impl Symbol {
    pub fn field(field: FieldRef) -> Self {
        Symbol::Field(Arc::new(field))
    }

    pub fn method(method: MethodRef) -> Self {
        Symbol::Method(Arc::new(method))
    }

    pub fn function(method: MethodRef) -> Self {
        Symbol::Function(Arc::new(method))
    }

    pub fn class(binary_name: impl Into<SmolStr>) -> Self {
        Symbol::Class(ClassRef::new(binary_name))
    }

    pub fn synthetic_property(getter: MethodRef) -> Self {
        Symbol::SyntheticProperty {
            getter: Arc::new(getter),
        }
    }

    /// Display label for this symbol kind.
    pub fn display(&self) -> &'static str {
        match self {
            Symbol::Field(_) => "field",
            Symbol::Method(_) => "method",
            Symbol::Function(_) => "function",
            Symbol::Class(_) => "class",
            Symbol::Package(_) => "package",
            Symbol::SyntheticProperty { .. } => "synthetic property",
            Symbol::CompiledFunction { .. } => "compiled function",
        }
    }
}
