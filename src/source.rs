//! Source text ownership and position mapping
//!
//! A [`SourceBuffer`] owns the text of one translation unit for the lifetime
//! of the pipeline. Tokens and trivia refer into it by `(start, length)` and
//! never copy token material; line/column pairs are computed on demand by
//! counting newlines up to an offset.

use std::fmt;

/// Line/column pair for error reporting. Both are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Immutable text of one translation unit.
///
/// The driver is free to pre-concatenate headers before constructing the
/// buffer; the pipeline itself performs no inclusion.
#[derive(Debug)]
pub struct SourceBuffer {
    name: String,
    text: String,
}

impl SourceBuffer {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Display name of the buffer (usually the file path).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Borrow the slice `[start, start + len)` of the underlying text.
    pub fn slice(&self, start: usize, len: usize) -> &str {
        &self.text[start..start + len]
    }

    /// Compute the 1-based line/column of a byte offset by counting newlines
    /// up to `offset`. A `\r\n` pair counts as a single line break.
    pub fn location(&self, offset: usize) -> SourceLocation {
        let offset = offset.min(self.text.len());
        let mut line = 1;
        let mut line_start = 0;
        let bytes = self.text.as_bytes();
        let mut i = 0;
        while i < offset {
            if bytes[i] == b'\n' {
                line += 1;
                line_start = i + 1;
            } else if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                line += 1;
                i += 1;
                line_start = i + 1;
            }
            i += 1;
        }
        SourceLocation::new(line, offset - line_start + 1)
    }
}
