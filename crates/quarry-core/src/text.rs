//! Source positions and ranges.

use serde::{Deserialize, Serialize};

/// A `(line, column)` position in a source file. 0-based, like LSP.
#[derive(
    Copy, Clone, Default, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A half-open source range.
///
/// Ordering is lexicographic on `(start.line, start.column, end.line,
/// end.column)`, which the derived impls provide through field order.
#[derive(
    Copy, Clone, Default, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Shorthand for a range within a single line.
    #[inline]
    pub const fn on_line(line: u32, start_column: u32, end_column: u32) -> Self {
        Self {
            start: Position::new(line, start_column),
            end: Position::new(line, end_column),
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_order_lexicographically() {
        let a = Range::on_line(1, 0, 5);
        let b = Range::on_line(1, 2, 3);
        let c = Range::new(Position::new(2, 0), Position::new(2, 1));

        assert!(a < b);
        assert!(b < c);

        // Same start: the end breaks the tie.
        let short = Range::on_line(1, 0, 3);
        let long = Range::on_line(1, 0, 9);
        assert!(short < long);
    }

    #[test]
    fn contains_is_half_open() {
        let range = Range::on_line(3, 2, 6);
        assert!(!range.contains(Position::new(3, 1)));
        assert!(range.contains(Position::new(3, 2)));
        assert!(range.contains(Position::new(3, 5)));
        assert!(!range.contains(Position::new(3, 6)));
    }
}
