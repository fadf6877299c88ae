//! Selection state over character offsets.

use std::ops::Range;

/// A selected span `[start, start + length)`. A zero length is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Selection {
    start: usize,
    length: usize,
}

impl Selection {
    pub const fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// A caret at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self::new(offset, 0)
    }

    /// The span between two offsets, in either order.
    pub fn between(a: usize, b: usize) -> Self {
        Self::new(a.min(b), a.abs_diff(b))
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_caret(&self) -> bool {
        self.length == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Whether `offset` falls inside the selected span.
    pub fn contains(&self, offset: usize) -> bool {
        self.range().contains(&offset)
    }
}

/// Which end of a selection moves when it is extended with the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between_normalizes() {
        assert_eq!(Selection::between(7, 3), Selection::new(3, 4));
        assert_eq!(Selection::between(3, 7), Selection::new(3, 4));
        assert!(Selection::between(5, 5).is_caret());
    }

    #[test]
    fn test_range_queries() {
        let selection = Selection::new(2, 3);
        assert_eq!(selection.end(), 5);
        assert_eq!(selection.range(), 2..5);
        assert!(selection.contains(4));
        assert!(!selection.contains(5));
    }
}
