// SPDX-License-Identifier: MIT
//
// Key input decoding.
//
// Turns raw bytes into key events for the editor core. Only the subset
// of terminal input a scripted or line-based host produces is handled:
//
// - ASCII printable characters
// - UTF-8 multi-byte characters
// - C0 control bytes (reported as Ctrl+letter)
// - Tab, Enter, Backspace
// - ESC, and Alt+key (ESC followed by a printable character)
//
// CSI / SS3 sequences are not decoded: `ESC [` yields an Escape key
// followed by the literal characters.
//
// # Design
//
// The parser keeps a small byte buffer because a UTF-8 character or an
// ESC prefix can be split across `advance` calls. After a timeout with
// no new bytes, call [`Parser::flush`] to emit a pending lone ESC as a
// real Escape keypress.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A decoded input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),
}

/// A keyboard event with key identity, modifiers, and press state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys (Shift, Alt, Ctrl, etc.).
    pub modifiers: Modifiers,
    /// Press, repeat, or release.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A key press with the given modifiers.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            kind: KeyEventKind::Press,
        }
    }

    /// A plain character key press with no modifiers.
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifiers::empty())
    }

    /// The character this event types, if it is a printable key press.
    ///
    /// Returns `None` for named keys, releases, and anything chorded with
    /// Ctrl or Alt. Shift is allowed since it is already folded into the
    /// character (`W`, `S`, `%`).
    #[must_use]
    pub fn typed_char(&self) -> Option<char> {
        if self.kind == KeyEventKind::Release
            || self.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT)
        {
            return None;
        }
        match self.code {
            KeyCode::Char(ch) if !ch.is_control() => Some(ch),
            _ => None,
        }
    }
}

/// Key press / release distinction.
///
/// Byte-stream input can't tell these apart, so the parser always
/// reports [`Press`](KeyEventKind::Press). Hosts with richer input
/// sources may report releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Release,
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Key input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect [`Event`]s.
/// Incomplete sequences stay buffered until more bytes arrive.
///
/// A bare `ESC` at the end of the input could still become Alt+key, so
/// it is held back. Call [`flush`](Parser::flush) to emit it as Escape.
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    /// Create a new parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16),
        }
    }

    /// Feed raw bytes and return all events that can be decoded.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Flush pending bytes as literal key events.
    ///
    /// A lone ESC becomes an Escape key event. A truncated UTF-8 sequence
    /// can never complete, so it is dropped.
    pub fn flush(&mut self) -> Vec<Event> {
        let events = self
            .buf
            .iter()
            .filter(|&&b| b == 0x1B)
            .map(|_| press(KeyCode::Escape))
            .collect();
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

/// Result of trying to parse one event from the front of a buffer.
enum Parsed {
    /// Decoded an event, consuming `usize` bytes.
    Event(Event, usize),
    /// Need more bytes.
    Incomplete,
    /// Unrecognized byte(s), skip `usize` bytes.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        0x1B => parse_escape(buf),
        0x00 => Parsed::Event(key_with(KeyCode::Char('@'), Modifiers::CTRL), 1),
        0x08 | 0x7F => Parsed::Event(press(KeyCode::Backspace), 1),
        0x09 => Parsed::Event(press(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Event(press(KeyCode::Enter), 1),
        b @ 0x01..=0x1A => Parsed::Event(
            key_with(KeyCode::Char((b + b'a' - 1) as char), Modifiers::CTRL),
            1,
        ),
        b @ 0x20..=0x7E => Parsed::Event(press(KeyCode::Char(b as char)), 1),
        0xC0..=0xFF => parse_utf8(buf),
        // FS/GS/RS/US and bare continuation bytes.
        _ => Parsed::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        0x1B => Parsed::Event(key_with(KeyCode::Escape, Modifiers::ALT), 2),
        // No CSI/SS3 support: the introducer is left for the next round.
        b'[' | b'O' => Parsed::Event(press(KeyCode::Escape), 1),
        b @ 0x20..=0x7E => Parsed::Event(key_with(KeyCode::Char(b as char), Modifiers::ALT), 2),
        _ => Parsed::Event(press(KeyCode::Escape), 1),
    }
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);

    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    for &b in &buf[1..expected] {
        if b & 0xC0 != 0x80 {
            return Parsed::Skip(1);
        }
    }

    std::str::from_utf8(&buf[..expected]).map_or(Parsed::Skip(1), |s| {
        s.chars().next().map_or(Parsed::Skip(expected), |ch| {
            Parsed::Event(press(KeyCode::Char(ch)), expected)
        })
    })
}

/// Expected byte length of a UTF-8 sequence from its lead byte, or 0 if
/// the byte can't start one.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

const fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, Modifiers::empty()))
}

const fn key_with(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent::new(code, modifiers))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
