//! Text utilities: line indexes and helpers for textual code matching.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count bytes, not characters

use memchr::memchr_iter;

// ============================================================================
// Line Index
// ============================================================================

/// Precomputed line start offsets for a source text.
///
/// Built once per parse; answers offset to line queries in `O(log n)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first byte of every line. Always starts with `0`.
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Build a line index for `source`.
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = Vec::with_capacity(bytes.len() / 32 + 1);
        line_starts.push(0);
        line_starts.extend(memchr_iter(b'\n', bytes).map(|i| i + 1));
        LineIndex {
            line_starts,
            len: bytes.len(),
        }
    }

    /// Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The 1-indexed line containing `offset`.
    ///
    /// Offsets past the end of the text map to the last line.
    pub fn line_of(&self, offset: usize) -> u32 {
        let offset = offset.min(self.len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32 + 1,
            Err(next) => next as u32,
        }
    }

    /// Convert a byte offset to 1-indexed line and column.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.len);
        let line = self.line_of(offset);
        let start = self.line_starts[line as usize - 1];
        (line, (offset - start) as u32 + 1)
    }

    /// Byte offset of the start of a 1-indexed line, if it exists.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        if line == 0 {
            return None;
        }
        self.line_starts.get(line as usize - 1).copied()
    }
}

/// Convert a byte offset to 1-indexed line and column.
///
/// Convenience wrapper for one-off conversions; build a [`LineIndex`] when
/// converting many offsets of the same text.
pub fn byte_offset_to_position(source: &str, offset: usize) -> (u32, u32) {
    LineIndex::new(source).position(offset)
}

// ============================================================================
// Matching Helpers
// ============================================================================

/// Remove every space, tab and newline from `s`.
///
/// Used to compare rendered code fragments without caring how they were
/// laid out: `a:=1` and `a := 1` normalize to the same string.
pub fn normalize_string(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '\n' | '\t' | '\r'))
        .collect()
}

/// Strip the surrounding quote characters from a string literal's text.
///
/// `"fmt"` becomes `fmt`, `` `raw` `` becomes `raw`. Escape sequences are left
/// untouched. Text shorter than two characters is returned unchanged.
pub fn unquote(s: &str) -> &str {
    let mut chars = s.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last))
            if first == last && matches!(first, '"' | '`' | '\'') && s.len() >= 2 =>
        {
            &s[1..s.len() - 1]
        }
        _ => s,
    }
}

/// Wrap `s` in double quotes, producing string literal text.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", s)
}
