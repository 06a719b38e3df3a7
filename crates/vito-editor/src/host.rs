//! The seams between a text-object session and the editor that runs it.
//!
//! A session never holds the editor. Each call borrows it as `&mut H`, and
//! the range delegate gets the same borrow, so the operator it applies can
//! edit the buffer the boundaries were computed on.

use crate::mode::Mode;
use crate::position::Position;

/// Mode switching and status reporting.
pub trait Host {
    /// Ask the editor to return to `mode`. The editor decides when to tear
    /// the session down in response.
    fn set_mode(&mut self, mode: Mode);

    /// Show a message on the status line.
    fn set_status(&mut self, msg: &str);
}

/// The buffer and cursor queries text objects need.
pub trait TextView {
    fn cursor(&self) -> Position;

    /// The start of the next word after `from`.
    ///
    /// # Errors
    ///
    /// `Err(end)` when the buffer ran out first; `end` is the furthest
    /// position reached and is still a usable range end.
    fn next_word(&self, from: Position) -> Result<Position, Position>;

    /// Close the current batch of edits into one undo unit.
    fn finalize_action_group(&mut self);
}

/// The operation a text object is applied with (delete, yank, change, ...).
/// Called once per repetition with the range `[from, to)`.
pub type RangeFn<H> = Box<dyn FnMut(&mut H, Position, Position)>;
