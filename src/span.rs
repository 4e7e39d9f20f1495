use std::fmt::{Display, Formatter};

/// A single point in the source, as reported by the lexer.
///
/// Rows and columns are both 1-based, matching the convention used by most
/// text editors and the teacher crate's own [`Position`](https://docs.rs/lang_pt)-style
/// diagnostics.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// The half-open source range a token or node spans, `start..end`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width span, used for synthetic diagnostics raised before any
    /// token has been observed (e.g. an empty token stream).
    pub fn zero() -> Self {
        let origin = Position::new(1, 1);
        Self::new(origin, origin)
    }

    /// Whether `self` and `next` are directly adjacent: same row, with no
    /// more than a single column between `self.end` and `next.start`.
    ///
    /// Used by selector combinator insertion to decide whether two atomic
    /// selectors are joined by an implicit space combinator: the lexer does
    /// not preserve whitespace tokens, so adjacency is reconstructed from the
    /// row/column deltas instead. Non-adjacent tokens (a real gap on the same
    /// row, or a line break between them) get a `SpaceCombinator`.
    pub fn touches(&self, next: &Span) -> bool {
        self.end.row == next.start.row && next.start.column.saturating_sub(self.end.column) <= 1
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
