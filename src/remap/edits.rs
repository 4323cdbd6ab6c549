//! Edit buffer: range replacements against the original file text.
//!
//! Offsets are only valid against the original text, so edits are kept
//! keyed by range and applied from the end of the file backwards.

use std::collections::BTreeMap;

use text_size::{TextRange, TextSize};

/// An edit that could not be applied because it overlaps another one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditConflict {
    /// Range of the rejected edit.
    pub range: TextRange,
    /// Replacement text of the rejected edit.
    pub text: String,
    /// Range of the edit it collided with, when known.
    pub existing: Option<TextRange>,
}

/// Pending replacements for one file.
#[derive(Clone, Debug, Default)]
pub struct EditBuffer {
    edits: BTreeMap<(TextSize, TextSize), String>,
}

fn key(range: TextRange) -> (TextSize, TextSize) {
    (range.start(), range.end())
}

fn intersects(a: TextRange, b: TextRange) -> bool {
    a.start().max(b.start()) < a.end().min(b.end())
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `text` as the replacement for `range`.
    ///
    /// A second edit for exactly the same range appends to the first.
    pub fn queue(&mut self, range: TextRange, text: impl AsRef<str>) {
        self.edits
            .entry(key(range))
            .or_default()
            .push_str(text.as_ref());
    }

    /// True if no queued edit shares any character with `range`.
    ///
    /// Empty ranges never collide.
    pub fn is_free(&self, range: TextRange) -> bool {
        self.overlapping(range).is_none()
    }

    /// First queued edit that shares a character with `range`.
    pub fn overlapping(&self, range: TextRange) -> Option<TextRange> {
        if range.is_empty() {
            return None;
        }
        // Edits starting at or after `range.end()` cannot intersect it.
        self.edits
            .range(..(range.end(), TextSize::from(0)))
            .map(|(&(start, end), _)| TextRange::new(start, end))
            .find(|&existing| intersects(existing, range))
    }

    /// True if an edit was queued for exactly `range`.
    pub fn contains_exact(&self, range: TextRange) -> bool {
        self.edits.contains_key(&key(range))
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Queued edits in ascending range order.
    pub fn edits(&self) -> impl Iterator<Item = (TextRange, &str)> {
        self.edits
            .iter()
            .map(|(&(start, end), text)| (TextRange::new(start, end), text.as_str()))
    }

    /// Apply all edits to `text`.
    ///
    /// Edits are applied from the highest start offset down. An edit that
    /// reaches into one already applied is skipped and reported.
    pub fn commit(self, text: &str) -> (String, Vec<EditConflict>) {
        let mut applied: Vec<(TextRange, String)> = Vec::with_capacity(self.edits.len());
        let mut conflicts = Vec::new();
        let mut limit = TextSize::of(text);

        for ((start, end), replacement) in self.edits.into_iter().rev() {
            let range = TextRange::new(start, end);
            if end > limit {
                conflicts.push(EditConflict {
                    range,
                    text: replacement,
                    existing: applied.last().map(|(r, _)| *r),
                });
                continue;
            }
            limit = start;
            applied.push((range, replacement));
        }

        let mut result = String::with_capacity(text.len());
        let mut cursor = 0usize;
        for (range, replacement) in applied.iter().rev() {
            result.push_str(&text[cursor..usize::from(range.start())]);
            result.push_str(replacement);
            cursor = range.end().into();
        }
        result.push_str(&text[cursor..]);

        conflicts.reverse();
        (result, conflicts)
    }
}
