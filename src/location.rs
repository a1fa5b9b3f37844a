//! Source locations shared by every parse-tree node and diagnostic.

/// A single point (really: a span) in the source text.
///
/// `column` points at the token's *last* character (matching the original
/// tool this crate's diagnostics are modeled on); `length` is the number of
/// characters to underline starting at `column - length + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl Location {
    pub fn new(line: usize, column: usize, length: usize) -> Self {
        Location {
            line,
            column,
            length,
        }
    }

    /// A placeholder location for synthesized nodes (e.g. generated error
    /// nodes) that have no real source position.
    pub fn synthetic() -> Self {
        Location {
            line: 0,
            column: 0,
            length: 0,
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
