//! Text objects — the `3iw` part of `d3iw`.
//!
//! A [`TextObjectMode`] is a short-lived session the editor starts after an
//! operator key. It reads the rest of the command one key at a time:
//!
//! ```text
//! [count]  [i|a]  kind
//!   Reps   Char1  Char2
//! ```
//!
//! A key that doesn't fit the current stage falls through to the next stage
//! in the same call, so `w` alone is a count of 1, an outer object, and the
//! word kind. Parsing always ends on the kind key, valid or not, and the
//! session asks the host to restore the mode it was started from.
//!
//! When the host tears the session down it calls [`TextObjectMode::exit`],
//! which applies the range delegate once per repetition (the operator's
//! count times the object's count) and then closes the edits into one
//! action group.
//!
//! # Kinds
//!
//! | Key | Kind            | Range conversion |
//! |-----|-----------------|------------------|
//! | `w` | word            | next word start  |
//! | `W` | whitespace word | —                |
//! | `s` | sentence        | —                |
//! | `p` | paragraph       | —                |
//! | `S` | section         | —                |
//! | `%` | percent match   | —                |
//! | `b` | parens          | —                |
//! | `B` | braces          | —                |
//!
//! Kinds without a range conversion report
//! [`TextObjectError::NotImplemented`] and leave the buffer alone.

use std::fmt;

use tracing::{debug, trace};
use vito_term::input::KeyEvent;

use crate::error::TextObjectError;
use crate::host::{Host, RangeFn, TextView};
use crate::mode::Mode;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// What a text object selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextObjectKind {
    Word,
    WhitespaceWord,
    Sentence,
    Paragraph,
    Section,
    Percent,
    Parens,
    Braces,
}

const KIND_TABLE: [(char, TextObjectKind); 8] = [
    ('w', TextObjectKind::Word),
    ('W', TextObjectKind::WhitespaceWord),
    ('s', TextObjectKind::Sentence),
    ('p', TextObjectKind::Paragraph),
    ('S', TextObjectKind::Section),
    ('%', TextObjectKind::Percent),
    ('b', TextObjectKind::Parens),
    ('B', TextObjectKind::Braces),
];

impl TextObjectKind {
    /// Look up the kind for a key. Case matters: `s` is a sentence, `S` a
    /// section.
    #[must_use]
    pub fn from_key(ch: char) -> Option<Self> {
        KIND_TABLE
            .iter()
            .find(|(key, _)| *key == ch)
            .map(|(_, kind)| *kind)
    }

    /// The key that selects this kind.
    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Word => 'w',
            Self::WhitespaceWord => 'W',
            Self::Sentence => 's',
            Self::Paragraph => 'p',
            Self::Section => 'S',
            Self::Percent => '%',
            Self::Parens => 'b',
            Self::Braces => 'B',
        }
    }
}

impl fmt::Display for TextObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Word => "word",
            Self::WhitespaceWord => "WORD",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
            Self::Section => "section",
            Self::Percent => "match",
            Self::Parens => "parens block",
            Self::Braces => "braces block",
        };
        f.write_str(name)
    }
}

/// A fully parsed text object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextObject {
    /// `i` (inner) rather than `a` (around).
    pub inner: bool,
    pub kind: TextObjectKind,
}

impl fmt::Display for TextObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sel = if self.inner { 'i' } else { 'a' };
        write!(f, "{sel}{}", self.kind.key())
    }
}

// ---------------------------------------------------------------------------
// Parsing state
// ---------------------------------------------------------------------------

/// Which part of the command the next key is read as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Count digits.
    Reps,
    /// `i` / `a` selector.
    Char1,
    /// Kind letter.
    Char2,
}

/// Result of feeding one key to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// More keys are needed.
    Pending,
    /// The kind key has been read; the host should tear the session down.
    Complete,
}

/// Resolve accumulated count digits. No digits means a count of 1; a count
/// too large for `usize` saturates.
#[must_use]
pub fn parse_reps(digits: &str) -> usize {
    if digits.is_empty() {
        return 1;
    }
    digits
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0usize, |n, b| {
            n.saturating_mul(10).saturating_add(usize::from(b - b'0'))
        })
}

// ---------------------------------------------------------------------------
// TextObjectMode
// ---------------------------------------------------------------------------

/// One text-object command being read and applied.
pub struct TextObjectMode<H> {
    restore: Mode,
    f: RangeFn<H>,
    stage: Stage,
    inner: bool,
    kind: Option<TextObjectKind>,
    err: Option<TextObjectError>,
    outer_reps: usize,
    digits: String,
    reps: usize,
    max_count: usize,
    complete: bool,
}

impl<H> TextObjectMode<H> {
    /// Start a session. `restore` is the mode to return to once the kind key
    /// is read; `outer_reps` is the operator's count (0 is treated as 1).
    #[must_use]
    pub fn new(restore: Mode, f: RangeFn<H>, outer_reps: usize) -> Self {
        Self {
            restore,
            f,
            stage: Stage::Reps,
            inner: false,
            kind: None,
            err: None,
            outer_reps: outer_reps.max(1),
            digits: String::new(),
            reps: 1,
            max_count: 0,
            complete: false,
        }
    }

    /// Cap the total repetition at `max`. 0 leaves it uncapped.
    #[must_use]
    pub fn with_max_count(mut self, max: usize) -> Self {
        self.max_count = max;
        self
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// The object's own count. 1 until the count has been resolved.
    #[must_use]
    pub const fn reps(&self) -> usize {
        self.reps
    }

    #[must_use]
    pub const fn outer_reps(&self) -> usize {
        self.outer_reps
    }

    /// The parsed object, once a valid kind key has been read.
    #[must_use]
    pub fn object(&self) -> Option<TextObject> {
        self.kind.map(|kind| TextObject {
            inner: self.inner,
            kind,
        })
    }

    #[must_use]
    pub const fn error(&self) -> Option<&TextObjectError> {
        self.err.as_ref()
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// How many times the delegate runs: `outer_reps * reps`, saturating,
    /// then capped by the max count if one is set.
    #[must_use]
    pub fn total_reps(&self) -> usize {
        let total = self.outer_reps.saturating_mul(self.reps);
        if self.max_count == 0 {
            total
        } else {
            total.min(self.max_count)
        }
    }
}

impl<H: Host> TextObjectMode<H> {
    /// Feed one key.
    ///
    /// Keys arriving after the session completed are ignored.
    pub fn on_key(&mut self, host: &mut H, key: &KeyEvent) -> Progress {
        if self.complete {
            trace!(?key, "text object key after completion ignored");
            return Progress::Complete;
        }

        let ch = key.typed_char();
        loop {
            let (next, consumed) = self.advance(host, ch);
            trace!(from = ?self.stage, to = ?next, consumed, ?ch, "text object stage");
            self.stage = next;
            if consumed {
                break;
            }
        }

        if self.complete {
            debug!(
                object = ?self.object(),
                reps = self.reps,
                outer_reps = self.outer_reps,
                error = ?self.err,
                "text object parsed"
            );
            Progress::Complete
        } else {
            Progress::Pending
        }
    }

    /// Run `ch` against `stage`. Returns the next stage and whether `ch` was
    /// consumed; an unconsumed key is fed to the next stage.
    fn advance(&mut self, host: &mut H, ch: Option<char>) -> (Stage, bool) {
        match self.stage {
            Stage::Reps => match ch {
                Some(d @ '1'..='9') => {
                    self.digits.push(d);
                    (Stage::Reps, true)
                }
                Some('0') if !self.digits.is_empty() => {
                    self.digits.push('0');
                    (Stage::Reps, true)
                }
                _ => {
                    self.reps = parse_reps(&self.digits);
                    (Stage::Char1, false)
                }
            },
            Stage::Char1 => match ch {
                Some('i') => {
                    self.inner = true;
                    (Stage::Char2, true)
                }
                Some('a') => {
                    self.inner = false;
                    (Stage::Char2, true)
                }
                _ => (Stage::Char2, false),
            },
            Stage::Char2 => {
                match ch.and_then(TextObjectKind::from_key) {
                    Some(kind) => self.kind = Some(kind),
                    None => self.err = Some(TextObjectError::BadTextObject),
                }
                self.complete = true;
                host.set_mode(self.restore);
                (Stage::Char2, true)
            }
        }
    }
}

impl<H: Host + TextView> TextObjectMode<H> {
    /// Apply the parsed object. Consumes the session.
    ///
    /// A session torn down before its kind key was read does nothing.
    pub fn exit(mut self, host: &mut H) {
        if let Some(err) = &self.err {
            debug!(%err, "text object rejected");
            host.set_status(&err.to_string());
            return;
        }
        let Some(kind) = self.kind else {
            debug!(stage = ?self.stage, "text object abandoned");
            return;
        };

        match kind {
            TextObjectKind::Word => self.apply_words(host),
            TextObjectKind::WhitespaceWord
            | TextObjectKind::Sentence
            | TextObjectKind::Paragraph
            | TextObjectKind::Section
            | TextObjectKind::Percent
            | TextObjectKind::Parens
            | TextObjectKind::Braces => {
                let err = TextObjectError::NotImplemented(kind);
                debug!(%kind, "no range conversion");
                host.set_status(&err.to_string());
            }
        }
    }

    fn apply_words(&mut self, host: &mut H) {
        // `iw` and `aw` share one boundary: cursor to next word start.
        let total = self.total_reps();
        debug!(total, inner = self.inner, "applying word object");
        for rep in 0..total {
            let from = host.cursor();
            let to = match host.next_word(from) {
                Ok(to) => to,
                Err(end) => {
                    trace!(rep, ?end, "word boundary hit end of buffer");
                    host.set_status(&TextObjectError::EndOfBuffer.to_string());
                    end
                }
            };
            (self.f)(host, from, to);
        }
        host.finalize_action_group();
    }
}

impl<H> fmt::Debug for TextObjectMode<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextObjectMode")
            .field("restore", &self.restore)
            .field("stage", &self.stage)
            .field("inner", &self.inner)
            .field("kind", &self.kind)
            .field("err", &self.err)
            .field("outer_reps", &self.outer_reps)
            .field("digits", &self.digits)
            .field("reps", &self.reps)
            .field("max_count", &self.max_count)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
