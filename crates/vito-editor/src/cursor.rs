//! Cursor — a position in a buffer that word boundaries advance from.
//!
//! `Cursor` is a small `Copy` value: it does not own or reference the buffer,
//! which is passed to each method. Text objects compute a span by copying the
//! cursor and advancing the copy, leaving the original as the span's start:
//!
//! ```text
//! let from = cursor;
//! let mut to = cursor;
//! let reached_end = !to.advance_word(buf, breaks);
//! ```

use crate::buffer::Buffer;
use crate::position::Position;
use crate::word::{self, LineBreaks};

/// A cursor in a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: Position,
}

impl Cursor {
    /// Create a cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { pos: Position::ZERO }
    }

    /// Create a cursor at a specific position. The position is not checked
    /// against any buffer.
    #[must_use]
    pub const fn at(pos: Position) -> Self {
        Self { pos }
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    /// Move to `pos`, clamped onto the buffer's content.
    ///
    /// With `past_end` the cursor may sit one column past the last char of
    /// a non-empty line (insert mode); otherwise it must sit on a char.
    pub fn set_position(&mut self, pos: Position, buf: &Buffer, past_end: bool) {
        self.pos = pos;
        self.clamp(buf, past_end);
    }

    /// Re-clamp after the buffer changed underneath the cursor.
    pub fn clamp(&mut self, buf: &Buffer, past_end: bool) {
        let clamped = buf.clamp_position(self.pos);
        let content_len = buf.line_content_len(clamped.line).unwrap_or(0);
        let max_col = if past_end || content_len == 0 {
            content_len
        } else {
            content_len - 1
        };
        self.pos = Position::new(clamped.line, clamped.col.min(max_col));
    }

    /// Advance to the next word boundary.
    ///
    /// Returns `false` when the end of the buffer was reached first; the
    /// cursor is then left at the furthest position reached.
    pub fn advance_word(&mut self, buf: &Buffer, breaks: LineBreaks) -> bool {
        match word::next_word(buf, self.pos, breaks) {
            Ok(pos) => {
                self.pos = pos;
                true
            }
            Err(pos) => {
                self.pos = pos;
                false
            }
        }
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

    #[test]
    fn copy_then_advance_leaves_original() {
        let buf = Buffer::from_text("one two");
        let from = Cursor::new();
        let mut to = from;
        assert!(to.advance_word(&buf, LineBreaks::Stop));
        assert_eq!(from.position(), p(0, 0));
        assert_eq!(to.position(), p(0, 4));
    }

    #[test]
    fn advance_reports_end_of_buffer() {
        let buf = Buffer::from_text("one two");
        let mut c = Cursor::at(p(0, 4));
        assert!(!c.advance_word(&buf, LineBreaks::Stop));
        assert_eq!(c.position(), p(0, 7));
    }

    #[test]
    fn advance_respects_line_policy() {
        let buf = Buffer::from_text("one\ntwo");
        let mut stop = Cursor::at(p(0, 1));
        let mut cross = stop;
        assert!(stop.advance_word(&buf, LineBreaks::Stop));
        assert!(cross.advance_word(&buf, LineBreaks::Cross));
        assert_eq!(stop.position(), p(0, 3));
        assert_eq!(cross.position(), p(1, 0));
    }

    #[test]
    fn clamp_normal_and_insert() {
        let buf = Buffer::from_text("abc\n\nxy");
        let mut c = Cursor::new();
        c.set_position(p(0, 10), &buf, false);
        assert_eq!(c.position(), p(0, 2));
        c.set_position(p(0, 10), &buf, true);
        assert_eq!(c.position(), p(0, 3));
        c.set_position(p(1, 4), &buf, false);
        assert_eq!(c.position(), p(1, 0));
        c.set_position(p(9, 9), &buf, false);
        assert_eq!(c.position(), p(2, 1));
    }

    #[test]
    fn clamp_on_empty_buffer() {
        let buf = Buffer::new();
        let mut c = Cursor::at(p(3, 3));
        c.clamp(&buf, false);
        assert_eq!(c.position(), Position::ZERO);
    }
}
