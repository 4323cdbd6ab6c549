//! Lossless tree construction from tokens plus declared node ranges.
//!
//! A resolution service knows the structure of a file but hands it over as
//! a flat list of `(kind, range)` node declarations. [`TreeBuilder`] lexes
//! the text and threads those declarations through the token stream to
//! produce a rowan green tree rooted at `SOURCE_FILE`.
//!
//! Declarations must start and end on token boundaries and must nest
//! properly. Identical ranges are allowed; the earlier declaration becomes
//! the parent.

use std::cmp::Reverse;

use rowan::{GreenNode, GreenNodeBuilder};
use text_size::{TextRange, TextSize};

use super::lexer::Lexer;
use super::syntax_kind::SyntaxKind;
use crate::base::RemapError;

/// Builds a green tree for one file.
pub struct TreeBuilder<'a> {
    file_name: &'a str,
    text: &'a str,
    nodes: Vec<(SyntaxKind, TextRange)>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(file_name: &'a str, text: &'a str) -> Self {
        Self {
            file_name,
            text,
            nodes: Vec::new(),
        }
    }

    /// Declare a node covering `range`.
    pub fn node(&mut self, kind: SyntaxKind, range: TextRange) -> &mut Self {
        self.nodes.push((kind, range));
        self
    }

    /// Number of declared nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn finish(mut self) -> Result<GreenNode, RemapError> {
        let text_len = TextSize::of(self.text);
        for &(kind, range) in &self.nodes {
            if kind.is_token() || kind == SyntaxKind::SOURCE_FILE || kind == SyntaxKind::__LAST {
                return Err(self.error(format!("{kind:?} cannot be declared as a node")));
            }
            if range.end() > text_len {
                return Err(self.error(format!("{kind:?} at {range:?} extends past end of file")));
            }
        }

        // Stable sort keeps declaration order for identical ranges.
        self.nodes
            .sort_by_key(|&(_, range)| (range.start(), Reverse(range.end())));

        let mut state = BuildState {
            builder: GreenNodeBuilder::new(),
            open: Vec::new(),
            next: 0,
        };
        state.builder.start_node(SyntaxKind::SOURCE_FILE.into());

        for token in Lexer::new(self.text) {
            self.close_until(&mut state, token.offset)?;
            self.open_at(&mut state, token.offset)?;
            state.builder.token(token.kind.into(), token.text);
        }

        self.close_until(&mut state, text_len)?;
        self.open_at(&mut state, text_len)?;
        if let Some(&(kind, end)) = state.open.last() {
            return Err(self.error(format!("{kind:?} ending at {end:?} was never closed")));
        }

        state.builder.finish_node();
        Ok(state.builder.finish())
    }

    fn close_until(&self, state: &mut BuildState, offset: TextSize) -> Result<(), RemapError> {
        while let Some(&(kind, end)) = state.open.last() {
            if end > offset {
                break;
            }
            if end < offset {
                return Err(self.error(format!(
                    "{kind:?} ends at {end:?}, inside a token"
                )));
            }
            state.builder.finish_node();
            state.open.pop();
        }
        Ok(())
    }

    fn open_at(&self, state: &mut BuildState, offset: TextSize) -> Result<(), RemapError> {
        while let Some(&(kind, range)) = self.nodes.get(state.next) {
            if range.start() > offset {
                break;
            }
            if range.start() < offset {
                return Err(self.error(format!(
                    "{kind:?} starts at {:?}, inside a token",
                    range.start()
                )));
            }
            if let Some(&(parent, parent_end)) = state.open.last() {
                if range.end() > parent_end {
                    return Err(self.error(format!(
                        "{kind:?} at {range:?} overlaps {parent:?} ending at {parent_end:?}"
                    )));
                }
            }

            state.builder.start_node(kind.into());
            if range.is_empty() {
                state.builder.finish_node();
            } else {
                state.open.push((kind, range.end()));
            }
            state.next += 1;
        }
        Ok(())
    }

    fn error(&self, message: String) -> RemapError {
        RemapError::malformed(self.file_name, message)
    }
}

struct BuildState {
    builder: GreenNodeBuilder<'static>,
    open: Vec<(SyntaxKind, TextSize)>,
    next: usize,
}
