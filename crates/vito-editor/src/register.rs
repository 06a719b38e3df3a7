//! Register — where yanked and deleted text object spans end up.
//!
//! A text-object command may hand its operator several spans (`y3w` yanks
//! three word spans, one per repetition). The first span of a command
//! replaces the register; the rest are appended, so the register ends up
//! holding the whole command's text. [`Register::start_command`] marks the
//! boundary between commands.

/// A single char-wise register slot.
#[derive(Debug, Clone, Default)]
pub struct Register {
    content: String,
    /// True once the current command has written its first span.
    filling: bool,
}

impl Register {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: String::new(),
            filling: false,
        }
    }

    /// Begin a new command: its first span will replace the content.
    pub const fn start_command(&mut self) {
        self.filling = false;
    }

    /// Store one span of the current command.
    pub fn store(&mut self, text: &str) {
        if self.filling {
            self.content.push_str(text);
        } else {
            self.content.clear();
            self.content.push_str(text);
            self.filling = true;
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
