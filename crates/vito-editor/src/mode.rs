//! Vim-style editing modes.
//!
//! The engine never picks a mode itself: a text-object session is created
//! with the mode to go back to and, once the kind letter is read, asks the
//! host to restore it.
//!
//! | Mode            | Cursor limit          | Purpose                        |
//! |-----------------|-----------------------|--------------------------------|
//! | Normal          | `0..content_len-1`    | Navigation, commands           |
//! | Insert          | `0..content_len`      | Typing text (`c` ends here)    |
//! | Visual          | `0..content_len-1`    | Selecting text                 |
//! | OperatorPending | `0..content_len-1`    | Reading a text-object command  |

use std::fmt;

// ---------------------------------------------------------------------------
// VisualKind
// ---------------------------------------------------------------------------

/// The sub-mode of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// `v`
    Char,
    /// `V`
    Line,
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current editing mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual(VisualKind),
    /// An operator is waiting for its text object (`d` in `d3w`).
    OperatorPending,
}

impl Mode {
    /// Human-readable name for the status line.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual(VisualKind::Char) => "VISUAL",
            Self::Visual(VisualKind::Line) => "VISUAL LINE",
            Self::OperatorPending => "OP PENDING",
        }
    }

    /// True if the cursor can sit one past the last char of a line.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(self) -> bool {
        matches!(self, Self::Insert)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
