//! Word boundaries — where a word text object ends.
//!
//! The word object's `to` position is the start of the next word, found the
//! same way Vim's `w` motion finds it:
//!
//! 1. Skip the current token (a run of word chars, or a run of punctuation).
//! 2. Skip blanks and line breaks, stopping at an empty line.
//! 3. Land on the first char of the next token.
//!
//! A **word** is a run of letters, digits and `_`, or a run of other
//! non-blank characters: `hello.world` is three words.
//!
//! # Line breaks
//!
//! Taken literally, step 2 lets the boundary run onto the next line, so a
//! delete over the last word of a line would join the lines. With
//! [`LineBreaks::Stop`] the boundary is clamped to the end of the cursor's
//! line instead; a cursor already at the end of its line steps over exactly
//! one line break. [`LineBreaks::Cross`] keeps the wrapping behavior.

use crate::buffer::Buffer;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

/// Character class for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    /// Letters, digits, underscore.
    Word,
    /// Non-blank, non-word characters (operators, brackets, etc.).
    Punctuation,
    /// Whitespace within a line (space, tab).
    Blank,
    /// Line ending (`\n`, `\r`).
    Newline,
}

pub(crate) fn classify(ch: char) -> CharClass {
    if ch == '\n' || ch == '\r' {
        CharClass::Newline
    } else if ch.is_whitespace() {
        CharClass::Blank
    } else if ch.is_alphanumeric() || ch == '_' {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Whether a word boundary may land on a later line than the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBreaks {
    /// Clamp to the end of the cursor's line.
    #[default]
    Stop,
    /// Follow the next word wherever it is.
    Cross,
}

/// The start of the next word after `pos`.
///
/// Returns `Err(end)` when the buffer runs out before another word starts;
/// `end` is the furthest position reached (the end of the buffer), so the
/// caller can still act on the partial span. An invalid `pos` yields
/// `Err(pos)`.
///
/// # Errors
///
/// `Err` means "end of buffer reached", not a failure to compute.
pub fn next_word(buf: &Buffer, pos: Position, breaks: LineBreaks) -> Result<Position, Position> {
    let target = forward_start(buf, pos);
    match breaks {
        LineBreaks::Cross => target,
        LineBreaks::Stop => clamp_to_line(buf, pos, target),
    }
}

// ---------------------------------------------------------------------------
// Core algorithms
// ---------------------------------------------------------------------------

fn forward_start(buf: &Buffer, pos: Position) -> Result<Position, Position> {
    let rope = buf.rope();
    let total = rope.len_chars();

    let Some(start_idx) = buf.pos_to_char_idx(pos) else {
        return Err(pos);
    };
    if start_idx >= total {
        return Err(buf.end_position());
    }

    let mut idx = start_idx;
    let start_class = classify(rope.char(idx));

    // Phase 1: skip current token.
    if matches!(start_class, CharClass::Word | CharClass::Punctuation) {
        while idx < total && classify(rope.char(idx)) == start_class {
            idx += 1;
        }
    }

    // Phase 2: skip whitespace/newlines, stopping at empty lines.
    while idx < total {
        let ch = rope.char(idx);
        match classify(ch) {
            CharClass::Word | CharClass::Punctuation => break,
            CharClass::Blank => idx += 1,
            CharClass::Newline => {
                idx += 1;
                if ch == '\r' && idx < total && rope.char(idx) == '\n' {
                    idx += 1;
                }
                if idx < total && classify(rope.char(idx)) == CharClass::Newline {
                    break;
                }
            }
        }
    }

    if idx >= total {
        return Err(buf.end_position());
    }
    Ok(buf.char_idx_to_pos(idx).unwrap_or(pos))
}

fn clamp_to_line(
    buf: &Buffer,
    pos: Position,
    target: Result<Position, Position>,
) -> Result<Position, Position> {
    let Some(content_len) = buf.line_content_len(pos.line) else {
        return target;
    };

    if pos.col >= content_len {
        // Already at the line end: step over this line's break only.
        return if pos.line + 1 < buf.line_count() {
            Ok(Position::new(pos.line + 1, 0))
        } else {
            Err(buf.end_position())
        };
    }

    let line_end = Position::new(pos.line, content_len);
    match target {
        Ok(to) | Err(to) if to.line > pos.line => Ok(line_end),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
