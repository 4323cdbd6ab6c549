//! Resolved-file fixtures located by text.
//!
//! Tests write the source they want remapped and then declare the nodes a
//! resolution service would report, locating each by a snippet of the
//! source. Annotations are declared from their text: `@X(a = "s", b = {..})`
//! yields the annotation, argument list, attribute and value nodes, and
//! class literals of known classes resolve automatically.

use remap::hir::{ClassInfo, FileBuilder, JvmType, ResolvedFile, Symbol};
use remap::remap::{FileResult, RemapOptions};
use remap::syntax::SyntaxKind;
use remap::{TextRange, TextSize, remap_file};

use super::world::{CLASSPATH, MAPPINGS};

/// Where a node is in the fixture text.
#[derive(Clone, Copy, Debug)]
pub enum Loc<'a> {
    /// The n-th occurrence of a snippet.
    Nth(&'a str, usize),
    /// A snippet inside the first occurrence of an anchor.
    Within(&'a str, &'a str),
    Range(TextRange),
}

impl<'a> From<&'a str> for Loc<'a> {
    fn from(needle: &'a str) -> Self {
        Loc::Nth(needle, 0)
    }
}

impl<'a> From<(&'a str, usize)> for Loc<'a> {
    fn from((needle, n): (&'a str, usize)) -> Self {
        Loc::Nth(needle, n)
    }
}

impl From<TextRange> for Loc<'static> {
    fn from(range: TextRange) -> Self {
        Loc::Range(range)
    }
}

pub fn within<'a>(anchor: &'a str, needle: &'a str) -> Loc<'a> {
    Loc::Within(anchor, needle)
}

/// Strip the common leading indentation and the blank first and last lines.
pub fn trim_indent(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().collect();
    if lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| if l.len() >= indent { &l[indent..] } else { l.trim_start() })
        .collect::<Vec<_>>()
        .join("\n")
}

fn range(start: usize, end: usize) -> TextRange {
    TextRange::new(TextSize::from(start as u32), TextSize::from(end as u32))
}

/// Builder for one resolved file of the A/B world.
pub struct Fixture {
    text: String,
    builder: FileBuilder,
}

impl Fixture {
    pub fn new(file_name: &str, text: &str) -> Self {
        let text = trim_indent(text);
        let builder = FileBuilder::new(file_name, text.clone(), CLASSPATH.clone());
        Self { text, builder }
    }

    pub fn java(text: &str) -> Self {
        Self::new("test.java", text)
    }

    pub fn kotlin(text: &str) -> Self {
        Self::new("test.kt", text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn range<'l>(&self, loc: impl Into<Loc<'l>>) -> TextRange {
        match loc.into() {
            Loc::Nth(needle, n) => {
                let (start, _) = self
                    .text
                    .match_indices(needle)
                    .nth(n)
                    .unwrap_or_else(|| panic!("occurrence {n} of {needle:?} not in fixture"));
                range(start, start + needle.len())
            }
            Loc::Within(anchor, needle) => {
                let base = self
                    .text
                    .find(anchor)
                    .unwrap_or_else(|| panic!("{anchor:?} not in fixture"));
                let offset = self.text[base..base + anchor.len()]
                    .find(needle)
                    .unwrap_or_else(|| panic!("{needle:?} not in {anchor:?}"));
                range(base + offset, base + offset + needle.len())
            }
            Loc::Range(range) => range,
        }
    }

    /// The whole file.
    pub fn everything(&self) -> TextRange {
        TextRange::up_to(TextSize::of(self.text.as_str()))
    }

    /// From the start of `start` through the first `end` after it.
    pub fn span<'l>(&self, start: impl Into<Loc<'l>>, end: &str) -> TextRange {
        let from = usize::from(self.range(start).start());
        let to = self.text[from..]
            .find(end)
            .map(|i| from + i + end.len())
            .unwrap_or_else(|| panic!("{end:?} not found after offset {from}"));
        range(from, to)
    }

    /// A method declaration from `start` through the first `end` after it.
    pub fn method_to<'l>(self, start: impl Into<Loc<'l>>, end: &str) -> Self {
        let decl = self.span(start, end);
        self.method(decl)
    }

    pub fn node<'l>(mut self, kind: SyntaxKind, loc: impl Into<Loc<'l>>) -> Self {
        let range = self.range(loc);
        self.builder = self.builder.node(kind, range);
        self
    }

    pub fn resolve<'l>(mut self, kind: SyntaxKind, loc: impl Into<Loc<'l>>, symbol: Symbol) -> Self {
        let range = self.range(loc);
        self.builder = self.builder.resolve(kind, range, symbol);
        self
    }

    pub fn typed<'l>(mut self, kind: SyntaxKind, loc: impl Into<Loc<'l>>, ty: JvmType) -> Self {
        let range = self.range(loc);
        self.builder = self.builder.typed(kind, range, ty);
        self
    }

    pub fn class(mut self, info: ClassInfo) -> Self {
        self.builder = self.builder.class(info);
        self
    }

    /// A method declaration with its leading annotations.
    pub fn method<'l>(self, loc: impl Into<Loc<'l>>) -> Self {
        self.annotated(SyntaxKind::METHOD, loc)
    }

    /// A field declaration with its leading annotations.
    pub fn field<'l>(self, loc: impl Into<Loc<'l>>) -> Self {
        self.annotated(SyntaxKind::FIELD, loc)
    }

    /// A standalone annotation, without a modifier list.
    pub fn annotation<'l>(self, loc: impl Into<Loc<'l>>) -> Self {
        let start = usize::from(self.range(loc).start());
        let mut nodes = Vec::new();
        annotation_nodes(&self.text, start, &mut nodes);
        self.declare(nodes)
    }

    /// A class spanning the whole file, named `binary_name`, whose leading
    /// annotations (normally `@Mixin`) form its modifier list.
    pub fn mixin(mut self, binary_name: &str) -> Self {
        let whole = self.everything();
        self.builder = self
            .builder
            .resolve(SyntaxKind::CLASS, whole, Symbol::class(binary_name));
        let nodes = modifier_nodes(&self.text, 0);
        self.declare(nodes)
    }

    fn annotated<'l>(mut self, kind: SyntaxKind, loc: impl Into<Loc<'l>>) -> Self {
        let range = self.range(loc);
        self.builder = self.builder.node(kind, range);
        let nodes = modifier_nodes(&self.text, usize::from(range.start()));
        self.declare(nodes)
    }

    fn declare(mut self, nodes: Vec<(SyntaxKind, TextRange)>) -> Self {
        for (kind, range) in nodes {
            let text = &self.text[usize::from(range.start())..usize::from(range.end())];
            let class = (kind == SyntaxKind::REFERENCE)
                .then(|| CLASSPATH.find(text))
                .flatten();
            self.builder = match class {
                Some(info) => self
                    .builder
                    .resolve(kind, range, Symbol::Class(info.class.clone())),
                None => self.builder.node(kind, range),
            };
        }
        self
    }

    pub fn build(self) -> ResolvedFile {
        self.builder.build().expect("fixture tree is well formed")
    }

    pub fn remap(self) -> FileResult {
        self.remap_with(RemapOptions::default())
    }

    pub fn remap_with(self, options: RemapOptions) -> FileResult {
        let file = self.build();
        remap_file(&file, &*MAPPINGS, options)
    }
}

// ============================================================================
// Annotation text scanning
// ============================================================================

fn is_space(text: &str, i: usize) -> bool {
    text.as_bytes()[i].is_ascii_whitespace()
}

fn trim(text: &str, mut start: usize, mut end: usize) -> (usize, usize) {
    while start < end && is_space(text, start) {
        start += 1;
    }
    while end > start && is_space(text, end - 1) {
        end -= 1;
    }
    (start, end)
}

/// Walk `text[start..end]` outside string literals, calling `visit` with
/// each byte offset and the bracket depth before it.
fn scan(text: &str, start: usize, end: usize, mut visit: impl FnMut(usize, i32) -> bool) {
    let bytes = text.as_bytes();
    let mut depth = 0;
    let mut in_string = false;
    let mut i = start;
    while i < end {
        let c = bytes[i];
        if in_string {
            if c == b'\\' {
                i += 1;
            } else if c == b'"' {
                in_string = false;
            }
        } else {
            if c == b'"' {
                in_string = true;
            } else if !visit(i, depth) {
                return;
            }
            match c {
                b'(' | b'{' => depth += 1,
                b')' | b'}' => depth -= 1,
                _ => {}
            }
        }
        i += 1;
    }
}

fn closing_bracket(text: &str, open: usize) -> usize {
    let mut close = None;
    scan(text, open, text.len(), |i, depth| {
        let c = text.as_bytes()[i];
        if depth == 1 && (c == b')' || c == b'}') {
            close = Some(i);
            return false;
        }
        true
    });
    close.unwrap_or_else(|| panic!("unbalanced bracket at {open}"))
}

fn split_top_level(text: &str, start: usize, end: usize, sep: u8) -> Vec<(usize, usize)> {
    let mut pieces = Vec::new();
    let mut piece_start = start;
    scan(text, start, end, |i, depth| {
        if depth == 0 && text.as_bytes()[i] == sep {
            pieces.push(trim(text, piece_start, i));
            piece_start = i + 1;
        }
        true
    });
    pieces.push(trim(text, piece_start, end));
    pieces.retain(|(s, e)| s < e);
    pieces
}

fn find_top_level(text: &str, start: usize, end: usize, sep: u8) -> Option<usize> {
    let mut found = None;
    scan(text, start, end, |i, depth| {
        if depth == 0 && text.as_bytes()[i] == sep {
            found = Some(i);
            return false;
        }
        true
    });
    found
}

/// A modifier list made of the annotations starting at `start`.
fn modifier_nodes(text: &str, start: usize) -> Vec<(SyntaxKind, TextRange)> {
    let mut annotations = Vec::new();
    let mut pos = start;
    let mut end = start;
    while text[pos..].starts_with('@') {
        end = annotation_nodes(text, pos, &mut annotations);
        pos = end;
        while pos < text.len() && is_space(text, pos) {
            pos += 1;
        }
    }
    if annotations.is_empty() {
        return annotations;
    }
    let mut nodes = vec![(SyntaxKind::MODIFIER_LIST, range(start, end))];
    nodes.extend(annotations);
    nodes
}

/// Nodes of the annotation at `start`. Returns the offset after it.
fn annotation_nodes(text: &str, start: usize, nodes: &mut Vec<(SyntaxKind, TextRange)>) -> usize {
    let bytes = text.as_bytes();
    let mut i = start + 1;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'_' | b'.' | b'$')) {
        i += 1;
    }
    if !text[i..].starts_with('(') {
        nodes.push((SyntaxKind::ANNOTATION, range(start, i)));
        return i;
    }

    let close = closing_bracket(text, i);
    nodes.push((SyntaxKind::ANNOTATION, range(start, close + 1)));
    nodes.push((SyntaxKind::ANNOTATION_ARGS, range(i, close + 1)));
    for (attr_start, attr_end) in split_top_level(text, i + 1, close, b',') {
        nodes.push((SyntaxKind::ANNOTATION_ATTR, range(attr_start, attr_end)));
        let (value_start, value_end) = match find_top_level(text, attr_start, attr_end, b'=') {
            Some(eq) => trim(text, eq + 1, attr_end),
            None => (attr_start, attr_end),
        };
        value_nodes(text, value_start, value_end, nodes);
    }
    close + 1
}

fn value_nodes(text: &str, start: usize, end: usize, nodes: &mut Vec<(SyntaxKind, TextRange)>) {
    let value = &text[start..end];
    if value.starts_with('@') {
        annotation_nodes(text, start, nodes);
    } else if value.starts_with('{') {
        nodes.push((SyntaxKind::ARRAY_INIT, range(start, end)));
        for (s, e) in split_top_level(text, start + 1, end - 1, b',') {
            value_nodes(text, s, e, nodes);
        }
    } else if let Some(ty) = value.strip_suffix(".class") {
        nodes.push((SyntaxKind::CLASS_LITERAL, range(start, end)));
        nodes.push((SyntaxKind::REFERENCE, range(start, start + ty.len())));
    } else if value.starts_with('"')
        || value.starts_with(|c: char| c.is_ascii_digit())
        || value == "true"
        || value == "false"
    {
        nodes.push((SyntaxKind::LITERAL, range(start, end)));
    } else {
        nodes.push((SyntaxKind::REFERENCE_EXPR, range(start, end)));
    }
}
