//! Source file spans and locations

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A half-open byte range `[start, end)` in a source file
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// First byte covered by the span
    pub start: u32,
    /// One past the last byte covered by the span
    pub end: u32,
}

impl Span {
    /// Creates a span from byte offsets
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a span from `usize` offsets as reported by parsers
    #[must_use]
    pub fn from_offsets(start: usize, end: usize) -> Self {
        Self::new(
            u32::try_from(start).unwrap_or(u32::MAX),
            u32::try_from(end).unwrap_or(u32::MAX),
        )
    }

    /// Byte range suitable for slicing
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Length in bytes
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no bytes
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Text covered by this span.
    ///
    /// Returns an empty string when the span does not lie on char boundaries
    /// inside `source`.
    #[must_use]
    pub fn slice<'src>(&self, source: &'src str) -> &'src str {
        source.get(self.range()).unwrap_or_default()
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.range()
    }
}
