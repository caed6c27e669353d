//! Buffer positions, ranges, and the rope-backed document text.
//!
//! `Position` and `Range` are plain value types used throughout the engine;
//! `TextBuffer` wraps `ropey::Rope` and provides the line/column ↔ char-offset
//! conversions the marker and completion layers are built on.

use ropey::Rope;
use std::borrow::Cow;
use std::fmt;

/// A position in the text buffer (line and column, both 0-indexed, char columns).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const fn zero() -> Self {
        Self { line: 0, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

/// A buffer interval `[start, end)` with ordered endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range, normalizing endpoint order.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Create an empty range at the given position.
    pub const fn collapsed(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if a position is within this range (end is exclusive).
    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Check if a position is within this range, counting both endpoints.
    ///
    /// Marker lookups use this form: the cursor normally rests exactly on
    /// the end of the abbreviation it just typed.
    pub fn contains_inclusive(&self, pos: Position) -> bool {
        pos >= self.start && pos <= self.end
    }

    /// Check if two ranges overlap (shared endpoints count as overlap).
    pub fn intersects(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.start, self.end)
    }
}

/// Rope-backed document text with position/offset conversion.
///
/// Offsets are char offsets. Out-of-bounds inputs clamp rather than panic;
/// the engine runs inside host callbacks and must never take the editor down.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    pub fn from_text(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    /// Number of lines (always >= 1)
    pub fn line_count(&self) -> usize {
        self.rope.len_lines().max(1)
    }

    /// Length of a specific line in characters (excluding newline)
    pub fn line_length(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let line_slice = self.rope.line(line);
        let len = line_slice.len_chars();
        if len > 0 && line_slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    /// Total length in characters
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get line content (without trailing newline)
    pub fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line).to_string();
        let trimmed = s.trim_end_matches(&['\n', '\r'][..]).to_string();
        Some(Cow::Owned(trimmed))
    }

    /// Convert (line, column) to char offset, clamping to buffer bounds.
    pub fn position_to_offset(&self, pos: Position) -> usize {
        if pos.line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let line_start = self.rope.line_to_char(pos.line);
        line_start + pos.column.min(self.line_length(pos.line))
    }

    /// Convert char offset to (line, column), clamping to buffer bounds.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let clamped = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(clamped);
        let line_start = self.rope.line_to_char(line);
        Position::new(line, clamped - line_start)
    }

    /// Clamp a position to the nearest valid buffer position.
    pub fn clamp_position(&self, pos: Position) -> Position {
        let line = pos.line.min(self.line_count() - 1);
        Position::new(line, pos.column.min(self.line_length(line)))
    }

    /// Text within a range as a String.
    pub fn text_in_range(&self, range: Range) -> String {
        let start = self.position_to_offset(range.start);
        let end = self.position_to_offset(range.end);
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    /// Full content as a String (may be expensive for large buffers)
    pub fn content(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the text in a range, returning the removed text.
    ///
    /// Low-level primitive: history recording and tracked-range translation
    /// live in the editor layer.
    pub fn replace(&mut self, range: Range, text: &str) -> String {
        let start = self.position_to_offset(range.start);
        let end = self.position_to_offset(range.end);
        let removed = if start < end {
            let s = self.rope.slice(start..end).to_string();
            self.rope.remove(start..end);
            s
        } else {
            String::new()
        };
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        removed
    }

}

/// Position at the end of `text` when it starts at `at`.
///
/// Pure position arithmetic, usable before or after the text is actually
/// in a buffer (tracked-range translation needs it mid-edit).
pub fn position_after(at: Position, text: &str) -> Position {
    let mut line = at.line;
    let mut column = at.column;
    for ch in text.chars() {
        if ch == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    Position::new(line, column)
}
