//! Byte spans over source text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Byte offsets into source text.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span contains a byte offset.
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Check if this span contains another span entirely.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Slice the spanned text out of `source`.
    ///
    /// Returns `None` when the span is out of bounds or not on a char boundary.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len_and_contains() {
        let span = Span::new(4, 10);
        assert_eq!(span.len(), 6);
        assert!(span.contains_offset(4));
        assert!(!span.contains_offset(10));
        assert!(span.contains(&Span::new(5, 10)));
        assert!(!span.contains(&Span::new(3, 5)));
    }

    #[test]
    fn test_span_slice() {
        let source = "package main";
        assert_eq!(Span::new(8, 12).slice(source), Some("main"));
        assert_eq!(Span::new(8, 40).slice(source), None);
    }

    #[test]
    #[should_panic(expected = "must be <= end")]
    fn test_span_rejects_inverted_range() {
        let _ = Span::new(3, 1);
    }

    #[test]
    fn test_span_serializes_as_object() {
        let json = serde_json::to_string(&Span::new(1, 2)).unwrap();
        assert_eq!(json, r#"{"start":1,"end":2}"#);
    }
}
