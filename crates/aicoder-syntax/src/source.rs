//! Source fragments and positions
//!
//! Leaf statements keep their original text. Continuation lines are stored
//! relative to the statement's start column so a fragment can be printed at
//! any nesting depth.

use std::fmt::{self, Display, Formatter};
use std::ops::Range;

/// Position of a node in the text it was parsed from
///
/// `line` is 1-based, `column` is a 0-based byte offset, matching the
/// convention of Python's own `ast` module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    /// Line number (1-based)
    pub line: usize,
    /// Column offset in bytes (0-based)
    pub column: usize,
}

impl Location {
    /// Create location
    #[inline]
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl From<tree_sitter::Point> for Location {
    fn from(point: tree_sitter::Point) -> Self {
        Self::new(point.row + 1, point.column)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A line after the first one in a fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Line {
    /// Leading indentation up to the fragment's column was stripped
    Relative(String),
    /// Line was shallower than the fragment's column; printed untouched
    Verbatim(String),
}

/// Original text of a statement, header or decorator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SourceText {
    first: String,
    rest: Vec<Line>,
}

impl SourceText {
    /// Build a fragment from raw text that started at `column`
    #[must_use]
    pub fn new(text: &str, column: usize) -> Self {
        Self::with_literals(text, column, &[])
    }

    /// Build a fragment whose multi-line string literals cover `literals`
    ///
    /// `literals` are byte ranges into `text`. A line that begins inside one
    /// of them belongs to the literal's value and is kept verbatim.
    #[must_use]
    pub fn with_literals(text: &str, column: usize, literals: &[Range<usize>]) -> Self {
        let mut pieces = text.split_inclusive('\n');
        let mut offset = 0;
        let first = pieces.next().map_or_else(String::new, |piece| {
            offset = piece.len();
            strip_eol(piece).to_string()
        });

        let mut rest = Vec::new();
        for piece in pieces {
            let line = strip_eol(piece);
            let inside = literals.iter().any(|r| r.start < offset && offset < r.end);
            offset += piece.len();

            rest.push(if inside {
                Line::Verbatim(line.to_string())
            } else if line.trim().is_empty() {
                Line::Relative(String::new())
            } else {
                match line.get(..column) {
                    Some(prefix) if prefix.chars().all(char::is_whitespace) => {
                        Line::Relative(line[column..].to_string())
                    }
                    _ => Line::Verbatim(line.to_string()),
                }
            });
        }

        Self { first, rest }
    }

    /// Single-line fragment
    #[inline]
    #[must_use]
    pub fn single(line: impl Into<String>) -> Self {
        Self {
            first: line.into(),
            rest: Vec::new(),
        }
    }

    /// Number of lines
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        1 + self.rest.len()
    }

    /// Append `suffix` to the last line, e.g. a trailing `  # note`
    pub fn push_trailing(&mut self, suffix: &str) {
        match self.rest.last_mut() {
            Some(Line::Relative(text) | Line::Verbatim(text)) => text.push_str(suffix),
            None => self.first.push_str(suffix),
        }
    }

    /// Append a line printed at the fragment's own indent
    pub fn push_line(&mut self, line: &str) {
        self.rest.push(Line::Relative(line.trim().to_string()));
    }

    /// Append the fragment to `out`, one indent prefix per relative line
    pub fn write_indented(&self, out: &mut String, indent: &str) {
        out.push_str(indent);
        out.push_str(&self.first);
        out.push('\n');

        for line in &self.rest {
            match line {
                Line::Relative(text) if text.is_empty() => {}
                Line::Relative(text) => {
                    out.push_str(indent);
                    out.push_str(text);
                }
                Line::Verbatim(text) => out.push_str(text),
            }
            out.push('\n');
        }
    }
}

fn strip_eol(piece: &str) -> &str {
    let line = piece.strip_suffix('\n').unwrap_or(piece);
    line.strip_suffix('\r').unwrap_or(line)
}

impl Display for SourceText {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_indented(&mut out, "");
        f.write_str(out.trim_end_matches('\n'))
    }
}
