// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Source spans
//!
//! Every AST node records where it came from as a pair of 0-based byte
//! offsets into the original query text. The end offset is exclusive, so
//! `&source[span.start..span.end]` is exactly the node's text.

use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into the query source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`
    pub const fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// `start <= offset < end`
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// `start <= offset <= end`, used where a cursor sitting right after a
    /// token still belongs to it
    pub fn touches(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Smallest span covering both `self` and `other`
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Slice the covered text out of `source`.
    ///
    /// Returns `None` when the span is out of bounds or splits a UTF-8
    /// character.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// Anything that carries a source span
pub trait Spanned {
    fn span(&self) -> Span;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let span = Span::new(7, 11);
        assert!(!span.contains(6));
        assert!(span.contains(7));
        assert!(span.contains(10));
        assert!(!span.contains(11));
        assert!(span.touches(11));
    }

    #[test]
    fn test_slice() {
        let source = "SELECT Id FROM Account";
        assert_eq!(Span::new(7, 9).slice(source), Some("Id"));
        assert_eq!(Span::new(15, 22).slice(source), Some("Account"));
        assert_eq!(Span::new(15, 99).slice(source), None);
    }

    #[test]
    fn test_cover() {
        let joined = Span::new(10, 14).cover(Span::new(3, 8));
        assert_eq!(joined, Span::new(3, 14));
        assert_eq!(joined.len(), 11);
    }

    #[test]
    fn test_empty() {
        let span = Span::empty(4);
        assert!(span.is_empty());
        assert!(!span.contains(4));
        assert!(span.touches(4));
    }
}
