//! Text buffer — rope-backed storage the text-object engine edits through.
//!
//! A `Buffer` wraps a [`ropey::Rope`] and exposes exactly what word
//! boundaries and range operators need: coordinate conversion between
//! [`Position`] and rope char indices, line content lengths, slicing, and
//! fallible insert/delete.
//!
//! Columns are char offsets, never byte offsets. Edits return `None` instead
//! of panicking when a position is out of bounds, since delegate ranges come
//! from host code the buffer can't vouch for.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ropey::{Rope, RopeSlice};

use crate::position::{Position, Range};

/// A text buffer backed by a rope.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer with no file path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            path: None,
        }
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
        }
    }

    /// Load a buffer from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            rope: Rope::from_str(&text),
            path: Some(path.to_path_buf()),
        })
    }

    // -- Text access --------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Total number of lines. An empty buffer has 1 line.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get a line including its line ending, or `None` past the last line.
    #[inline]
    #[must_use]
    pub fn line(&self, line: usize) -> Option<RopeSlice<'_>> {
        if line < self.rope.len_lines() {
            Some(self.rope.line(line))
        } else {
            None
        }
    }

    /// Number of chars in a line **excluding** any trailing `\n`, `\r\n`
    /// or `\r`.
    #[must_use]
    pub fn line_content_len(&self, line: usize) -> Option<usize> {
        self.line(line).map(|rope_line| {
            let total = rope_line.len_chars();
            if total == 0 {
                return 0;
            }
            match rope_line.char(total - 1) {
                '\n' if total >= 2 && rope_line.char(total - 2) == '\r' => total - 2,
                '\n' | '\r' => total - 1,
                _ => total,
            }
        })
    }

    /// The position just past the last character of the buffer.
    #[must_use]
    pub fn end_position(&self) -> Position {
        let total = self.rope.len_chars();
        let line = self.rope.char_to_line(total);
        Position::new(line, total - self.rope.line_to_char(line))
    }

    /// Text in `range`, or `None` if either endpoint is out of bounds.
    #[must_use]
    pub fn slice(&self, range: Range) -> Option<RopeSlice<'_>> {
        let start = self.pos_to_char_idx(range.start)?;
        let end = self.pos_to_char_idx(range.end)?;
        Some(self.rope.slice(start..end))
    }

    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Convert a `Position` to an absolute char index.
    ///
    /// A column equal to the line's full char count (line ending included)
    /// is valid: it is the exclusive end of that line.
    #[must_use]
    pub fn pos_to_char_idx(&self, pos: Position) -> Option<usize> {
        if pos.line >= self.rope.len_lines() {
            return None;
        }
        let line_start = self.rope.line_to_char(pos.line);
        let line_len = self.rope.line(pos.line).len_chars();
        if pos.col > line_len {
            return None;
        }
        Some(line_start + pos.col)
    }

    /// Convert an absolute char index to a `Position`. `len_chars()` itself
    /// maps to [`end_position`](Self::end_position).
    #[must_use]
    pub fn char_idx_to_pos(&self, char_idx: usize) -> Option<Position> {
        if char_idx > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(char_idx);
        let line_start = self.rope.line_to_char(line);
        Some(Position::new(line, char_idx - line_start))
    }

    /// Clamp a position onto the buffer's content (line endings excluded).
    #[must_use]
    pub fn clamp_position(&self, pos: Position) -> Position {
        if self.is_empty() {
            return Position::ZERO;
        }
        let line = pos.line.min(self.line_count() - 1);
        let max_col = self.line_content_len(line).unwrap_or(0);
        Position::new(line, pos.col.min(max_col))
    }

    // -- Editing ------------------------------------------------------------

    /// Insert text at a position. Returns `None` (and leaves the buffer
    /// untouched) if `pos` is out of bounds.
    pub fn insert(&mut self, pos: Position, text: &str) -> Option<()> {
        let idx = self.pos_to_char_idx(pos)?;
        self.rope.insert(idx, text);
        Some(())
    }

    /// Delete the text in `range` and return it.
    ///
    /// An empty range deletes nothing and returns an empty string. Returns
    /// `None` if either endpoint is out of bounds.
    pub fn delete(&mut self, range: Range) -> Option<String> {
        let start = self.pos_to_char_idx(range.start)?;
        let end = self.pos_to_char_idx(range.end)?;
        if start >= end {
            return Some(String::new());
        }
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        Some(removed)
    }

    // -- Metadata -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("path", &self.path)
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    // -- Conversion ---------------------------------------------------------

    #[test]
    fn pos_and_index_round_trip_on_multiline() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.pos_to_char_idx(p(1, 1)), Some(4));
        assert_eq!(buf.char_idx_to_pos(4), Some(p(1, 1)));
    }

    #[test]
    fn line_end_column_is_valid() {
        let buf = Buffer::from_text("ab\ncd");
        // Column 3 on line 0 is past the '\n'.
        assert_eq!(buf.pos_to_char_idx(p(0, 3)), Some(3));
        assert_eq!(buf.pos_to_char_idx(p(0, 4)), None);
        assert_eq!(buf.pos_to_char_idx(p(2, 0)), None);
    }

    #[test]
    fn end_position_variants() {
        assert_eq!(Buffer::new().end_position(), p(0, 0));
        assert_eq!(Buffer::from_text("hello").end_position(), p(0, 5));
        assert_eq!(Buffer::from_text("a\nbc").end_position(), p(1, 2));
        assert_eq!(Buffer::from_text("a\n").end_position(), p(1, 0));
    }

    #[test]
    fn content_len_strips_line_endings() {
        let buf = Buffer::from_text("ab\r\ncd\nef");
        assert_eq!(buf.line_content_len(0), Some(2));
        assert_eq!(buf.line_content_len(1), Some(2));
        assert_eq!(buf.line_content_len(2), Some(2));
        assert_eq!(buf.line_content_len(3), None);
    }

    #[test]
    fn clamp_position_onto_content() {
        let buf = Buffer::from_text("abc\nd");
        assert_eq!(buf.clamp_position(p(0, 9)), p(0, 3));
        assert_eq!(buf.clamp_position(p(7, 0)), p(1, 0));
        assert_eq!(Buffer::new().clamp_position(p(3, 3)), p(0, 0));
    }

    // -- Editing ------------------------------------------------------------

    #[test]
    fn delete_returns_removed_text() {
        let mut buf = Buffer::from_text("hello world");
        let removed = buf.delete(Range::new(p(0, 0), p(0, 6)));
        assert_eq!(removed.as_deref(), Some("hello "));
        assert_eq!(buf.contents(), "world");
    }

    #[test]
    fn delete_across_lines() {
        let mut buf = Buffer::from_text("one\ntwo");
        assert_eq!(
            buf.delete(Range::new(p(0, 3), p(1, 0))).as_deref(),
            Some("\n")
        );
        assert_eq!(buf.contents(), "onetwo");
    }

    #[test]
    fn empty_delete_is_noop() {
        let mut buf = Buffer::from_text("abc");
        assert_eq!(buf.delete(Range::point(p(0, 1))).as_deref(), Some(""));
        assert_eq!(buf.contents(), "abc");
    }

    #[test]
    fn out_of_bounds_edits_are_rejected() {
        let mut buf = Buffer::from_text("abc");
        assert_eq!(buf.delete(Range::new(p(0, 0), p(3, 0))), None);
        assert_eq!(buf.insert(p(5, 0), "x"), None);
        assert_eq!(buf.contents(), "abc");
    }

    #[test]
    fn insert_then_slice() {
        let mut buf = Buffer::from_text("ac");
        assert_eq!(buf.insert(p(0, 1), "b"), Some(()));
        let s = buf.slice(Range::new(p(0, 0), p(0, 3))).map(|s| s.to_string());
        assert_eq!(s.as_deref(), Some("abc"));
    }

    #[test]
    fn from_file_missing_is_error() {
        assert!(Buffer::from_file(Path::new("/definitely/not/here.txt")).is_err());
    }
}
