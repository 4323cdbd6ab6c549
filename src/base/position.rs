/// Position tracking for diagnostics
///
/// Maps byte offsets in the original file text to 0-indexed line/column
/// pairs, which is how per-file errors are reported.
use text_size::TextSize;

/// A position in source code (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Precomputed line starts for one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        line_starts.extend(
            text.match_indices('\n')
                .map(|(idx, _)| TextSize::new(idx as u32 + 1)),
        );
        Self { line_starts }
    }

    /// Number of lines (a trailing newline starts a new, empty line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a 0-indexed line/column position.
    ///
    /// Columns are byte offsets from the start of the line.
    pub fn position(&self, offset: TextSize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = u32::from(offset - self.line_starts[line]) as usize;
        Position::new(line, column)
    }

    /// 0-indexed line containing `offset`.
    pub fn line(&self, offset: TextSize) -> usize {
        self.position(offset).line
    }
}
