//! Undo/redo history built from action groups.
//!
//! Every buffer mutation is recorded as a reversible [`Edit`]. Edits are
//! collected into an open [`ActionGroup`] until the group is finalized; a
//! finalized group undoes and redoes as one unit. A text-object command such
//! as `d3w` performs several range deletes and finalizes once, so a single
//! undo brings all of them back.
//!
//! ```text
//! history.record_delete(cursor, from, "foo ");   // opens a group
//! history.record_delete(cursor, from, "bar ");
//! history.finalize(cursor_after);                // closes it
//! ```
//!
//! Finalizing a group with no edits discards it.

use tracing::trace;

use crate::buffer::Buffer;
use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// A single reversible buffer edit.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    Insert { pos: Position, text: String },
    Delete { pos: Position, text: String },
}

impl Edit {
    fn revert(&self, buf: &mut Buffer) {
        match self {
            Self::Insert { pos, text } => {
                buf.delete(Range::new(*pos, end_after_insert(*pos, text)));
            }
            Self::Delete { pos, text } => {
                buf.insert(*pos, text);
            }
        }
    }

    fn apply(&self, buf: &mut Buffer) {
        match self {
            Self::Insert { pos, text } => {
                buf.insert(*pos, text);
            }
            Self::Delete { pos, text } => {
                buf.delete(Range::new(*pos, end_after_insert(*pos, text)));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ActionGroup
// ---------------------------------------------------------------------------

/// A batch of edits that undo/redo together, plus the cursor positions to
/// restore on either side of it.
#[derive(Debug, Clone)]
struct ActionGroup {
    edits: Vec<Edit>,
    cursor_before: Position,
    cursor_after: Position,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo/redo history for one buffer.
///
/// Linear: recording into a new group after an undo discards the redo stack.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<ActionGroup>,
    redo_stack: Vec<ActionGroup>,
    open: Option<ActionGroup>,
}

impl History {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            open: None,
        }
    }

    /// True while edits are being collected into an unfinalized group.
    #[must_use]
    pub const fn has_open_group(&self) -> bool {
        self.open.is_some()
    }

    /// Record text inserted at `pos`. `cursor` is only used if this edit
    /// opens a new group: it becomes the group's undo cursor.
    pub fn record_insert(&mut self, cursor: Position, pos: Position, text: &str) {
        self.push(
            cursor,
            Edit::Insert {
                pos,
                text: text.to_string(),
            },
        );
    }

    /// Record text deleted starting at `pos`. Capture `text` from the buffer
    /// before deleting it.
    pub fn record_delete(&mut self, cursor: Position, pos: Position, text: &str) {
        self.push(
            cursor,
            Edit::Delete {
                pos,
                text: text.to_string(),
            },
        );
    }

    fn push(&mut self, cursor: Position, edit: Edit) {
        self.open
            .get_or_insert_with(|| ActionGroup {
                edits: Vec::new(),
                cursor_before: cursor,
                cursor_after: cursor,
            })
            .edits
            .push(edit);
    }

    /// Close the open group. `cursor` is where the cursor ended up.
    ///
    /// Returns `true` if a group was pushed onto the undo stack.
    pub fn finalize(&mut self, cursor: Position) -> bool {
        let Some(mut group) = self.open.take() else {
            return false;
        };
        if group.edits.is_empty() {
            return false;
        }
        group.cursor_after = cursor;
        trace!(
            edits = group.edits.len(),
            cleared = self.redo_stack.len(),
            "action group finalized"
        );
        self.redo_stack.clear();
        self.undo_stack.push(group);
        true
    }

    /// Undo the last group. Returns the cursor position to restore.
    ///
    /// An open group is finalized first so it can be undone.
    pub fn undo(&mut self, buf: &mut Buffer) -> Option<Position> {
        if let Some(open) = &self.open {
            let cursor = open.cursor_after;
            self.finalize(cursor);
        }
        let group = self.undo_stack.pop()?;
        for edit in group.edits.iter().rev() {
            edit.revert(buf);
        }
        let cursor = group.cursor_before;
        self.redo_stack.push(group);
        Some(cursor)
    }

    /// Redo the last undone group. Returns the cursor position to restore.
    pub fn redo(&mut self, buf: &mut Buffer) -> Option<Position> {
        let group = self.redo_stack.pop()?;
        for edit in &group.edits {
            edit.apply(buf);
        }
        let cursor = group.cursor_after;
        self.undo_stack.push(group);
        Some(cursor)
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

/// The position at the end of `text` if inserted at `start`. `\r\n` counts
/// as one line break.
fn end_after_insert(start: Position, text: &str) -> Position {
    let mut line = start.line;
    let mut col = start.col;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\n' => {
                line += 1;
                col = 0;
            }
            '\r' => {
                line += 1;
                col = 0;
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            _ => col += 1,
        }
    }

    Position::new(line, col)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
