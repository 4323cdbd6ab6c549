//! Resolution seam: resolved trees as delivered by a resolution service.
//!
//! Parsing and semantic analysis of Java and Kotlin are done outside this
//! crate. A [`ResolutionService`] hands back one [`Resolution`] per file: a
//! lossless syntax tree plus answers to "what does this node bind to" and
//! "what type does this expression have".
//!
//! [`ResolvedFile`] is the in-memory implementation. It keeps its tree as a
//! green node and its side tables keyed by `(range, kind)`, so it can be
//! shared across worker threads and re-rooted on demand.

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexSet;
use rowan::GreenNode;
use rustc_hash::FxHashMap;
use text_size::TextRange;

use super::classpath::Classpath;
use super::symbols::{ClassInfo, Symbol};
use super::types::JvmType;
use crate::base::RemapError;
use crate::base::text_utils::simple_name;
use crate::syntax::ast::Annotation;
use crate::syntax::{Language, SyntaxKind, SyntaxNode, TreeBuilder};

/// Identity of a node within one file.
pub type NodeKey = (TextRange, SyntaxKind);

fn key(node: &SyntaxNode) -> NodeKey {
    (node.text_range(), node.kind())
}

// ============================================================================
// RESOLUTION TRAIT
// ============================================================================

/// A resolved file: tree, bindings and inferred types.
pub trait Resolution: Send + Sync {
    fn file_name(&self) -> &str;

    fn language(&self) -> Language;

    /// Original file text; the tree covers it exactly.
    fn text(&self) -> &str;

    /// A fresh root over this file's tree.
    fn root(&self) -> SyntaxNode;

    /// Declaration a reference or declaration node binds to.
    fn resolve(&self, node: &SyntaxNode) -> Option<Symbol>;

    /// Inferred type of an expression, or declared type of a parameter.
    fn type_of(&self, node: &SyntaxNode) -> Option<JvmType>;

    /// Class information by binary or qualified name.
    fn find_class(&self, name: &str) -> Option<Arc<ClassInfo>>;

    fn is_assignable(&self, to: &JvmType, from: &JvmType) -> bool {
        to.is_assignable_from(from, |name| self.find_class(name))
    }

    /// Check whether `annotation` is the annotation type `qualified_name`.
    ///
    /// Unresolved annotations are compared by their written name, either
    /// fully qualified or simple.
    fn is_annotation(&self, annotation: &Annotation, qualified_name: &str) -> bool {
        let resolved = annotation
            .reference()
            .and_then(|reference| self.resolve(&reference));
        match resolved {
            Some(Symbol::Class(class)) => class.qualified_name == qualified_name,
            _ => {
                let written = annotation.name_text();
                written == qualified_name || written == simple_name(qualified_name)
            }
        }
    }

    /// Declaration node of `symbol` in this file, if it is declared here.
    fn declaration_of(&self, symbol: &Symbol) -> Option<SyntaxNode> {
        let kinds: &[SyntaxKind] = match symbol {
            Symbol::Field(_) => &[SyntaxKind::FIELD, SyntaxKind::PROPERTY],
            Symbol::Method(_) | Symbol::Function(_) => &[SyntaxKind::METHOD, SyntaxKind::FUN],
            Symbol::Class(_) => &[SyntaxKind::CLASS],
            _ => return None,
        };
        self.root()
            .descendants()
            .filter(|n| kinds.contains(&n.kind()))
            .find(|n| self.resolve(n).as_ref() == Some(symbol))
    }
}

/// Produces resolved trees for source files.
pub trait ResolutionService: Sync {
    type File: Resolution;

    fn parse_and_resolve(
        &self,
        file_name: &str,
        text: &str,
        classpath: &[PathBuf],
    ) -> Result<Self::File, RemapError>;
}

// ============================================================================
// IN-MEMORY RESOLVED FILE
// ============================================================================

#[derive(Debug)]
struct FileData {
    file_name: String,
    language: Language,
    text: String,
    green: GreenNode,
    symbols: FxHashMap<NodeKey, Symbol>,
    types: FxHashMap<NodeKey, JvmType>,
    local_classes: Classpath,
    classpath: Arc<Classpath>,
}

/// A resolved file held in memory. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ResolvedFile {
    data: Arc<FileData>,
}

impl ResolvedFile {
    pub fn builder(
        file_name: impl Into<String>,
        text: impl Into<String>,
        classpath: Arc<Classpath>,
    ) -> FileBuilder {
        FileBuilder::new(file_name, text, classpath)
    }

    /// Number of nodes carrying a resolved symbol.
    pub fn resolved_count(&self) -> usize {
        self.data.symbols.len()
    }
}

impl Resolution for ResolvedFile {
    fn file_name(&self) -> &str {
        &self.data.file_name
    }

    fn language(&self) -> Language {
        self.data.language
    }

    fn text(&self) -> &str {
        &self.data.text
    }

    fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.data.green.clone())
    }

    fn resolve(&self, node: &SyntaxNode) -> Option<Symbol> {
        self.data.symbols.get(&key(node)).cloned()
    }

    fn type_of(&self, node: &SyntaxNode) -> Option<JvmType> {
        self.data.types.get(&key(node)).cloned()
    }

    fn find_class(&self, name: &str) -> Option<Arc<ClassInfo>> {
        self.data
            .local_classes
            .find(name)
            .or_else(|| self.data.classpath.find(name))
    }
}

/// Assembles a [`ResolvedFile`] from text, node ranges and side tables.
#[derive(Debug)]
pub struct FileBuilder {
    file_name: String,
    language: Language,
    text: String,
    nodes: IndexSet<NodeKey>,
    symbols: FxHashMap<NodeKey, Symbol>,
    types: FxHashMap<NodeKey, JvmType>,
    local_classes: Classpath,
    classpath: Arc<Classpath>,
}

impl FileBuilder {
    pub fn new(
        file_name: impl Into<String>,
        text: impl Into<String>,
        classpath: Arc<Classpath>,
    ) -> Self {
        let file_name = file_name.into();
        Self {
            language: Language::from_file_name(&file_name),
            file_name,
            text: text.into(),
            nodes: IndexSet::new(),
            symbols: FxHashMap::default(),
            types: FxHashMap::default(),
            local_classes: Classpath::new(),
            classpath,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Declare a node.
    pub fn node(mut self, kind: SyntaxKind, range: TextRange) -> Self {
        self.nodes.insert((range, kind));
        self
    }

    /// Declare a node that binds to `symbol`.
    pub fn resolve(mut self, kind: SyntaxKind, range: TextRange, symbol: Symbol) -> Self {
        self.nodes.insert((range, kind));
        self.symbols.insert((range, kind), symbol);
        self
    }

    /// Declare a node with an inferred type.
    pub fn typed(mut self, kind: SyntaxKind, range: TextRange, ty: JvmType) -> Self {
        self.nodes.insert((range, kind));
        self.types.insert((range, kind), ty);
        self
    }

    /// Register a class declared in this file.
    pub fn class(mut self, info: ClassInfo) -> Self {
        self.local_classes.add(info);
        self
    }

    pub fn build(self) -> Result<ResolvedFile, RemapError> {
        let mut tree = TreeBuilder::new(&self.file_name, &self.text);
        for &(range, kind) in &self.nodes {
            tree.node(kind, range);
        }
        let green = tree.finish()?;

        tracing::trace!(
            file = %self.file_name,
            nodes = self.nodes.len(),
            symbols = self.symbols.len(),
            "built resolved file"
        );

        Ok(ResolvedFile {
            data: Arc::new(FileData {
                file_name: self.file_name,
                language: self.language,
                text: self.text,
                green,
                symbols: self.symbols,
                types: self.types,
                local_classes: self.local_classes,
                classpath: self.classpath,
            }),
        })
    }
}

// ============================================================================
// PRE-RESOLVED SERVICE
// ============================================================================

/// A resolution service that serves trees resolved ahead of time.
#[derive(Clone, Debug, Default)]
pub struct PreResolved {
    files: FxHashMap<String, ResolvedFile>,
}

impl PreResolved {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: ResolvedFile) {
        self.files.insert(file.file_name().to_string(), file);
    }

    pub fn with(mut self, file: ResolvedFile) -> Self {
        self.insert(file);
        self
    }
}

impl ResolutionService for PreResolved {
    type File = ResolvedFile;

    fn parse_and_resolve(
        &self,
        file_name: &str,
        text: &str,
        _classpath: &[PathBuf],
    ) -> Result<ResolvedFile, RemapError> {
        let file = self
            .files
            .get(file_name)
            .ok_or_else(|| RemapError::resolution(file_name, "no resolved tree available"))?;
        if file.text() != text {
            return Err(RemapError::resolution(
                file_name,
                "source text differs from the resolved tree",
            ));
        }
        Ok(file.clone())
    }
}
