// SPDX-License-Identifier: MIT
//
// vito — run vi text-object commands over a buffer from a key script.
//
//   vito --text 'one two three' 'd2w'        → three
//   vito --set xl notes.txt 'wdw'
//
// The Editor owns the buffer, cursor, undo history and register, and is the
// host a text-object session talks to. Each key flows through:
//
//   script → parser → on_key → text-object session or mode dispatch
//   session exit → range delegate (d / c / y) → buffer + history + register
//
// The final buffer goes to stdout; the last status message goes to stderr.
//
// Key scripts are typed literally. A few Vim-style names stand for keys
// that are awkward to pass on a command line: <Esc>, <CR>, <Tab>, <BS>,
// <C-r>, and <lt> for a literal '<'.

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

use vito_editor::buffer::Buffer;
use vito_editor::cursor::Cursor;
use vito_editor::error::OptionError;
use vito_editor::history::History;
use vito_editor::host::{Host, RangeFn, TextView};
use vito_editor::mode::Mode;
use vito_editor::options::{self, Options};
use vito_editor::position::{Position, Range};
use vito_editor::register::Register;
use vito_editor::text_object::{Progress, TextObjectMode};
use vito_editor::word::LineBreaks;
use vito_term::input::{Event, KeyCode, KeyEvent, Modifiers, Parser};

const USAGE: &str = "usage: vito [--set OPTIONS]... (--text TEXT | FILE) KEYS";

// ─── Operators ──────────────────────────────────────────────────────────────

/// What a text object is applied with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Delete,
    Change,
    Yank,
}

impl Operator {
    const fn from_key(ch: char) -> Option<Self> {
        match ch {
            'd' => Some(Self::Delete),
            'c' => Some(Self::Change),
            'y' => Some(Self::Yank),
            _ => None,
        }
    }

    /// The range delegate handed to the text-object session.
    fn range_fn(self) -> RangeFn<Editor> {
        match self {
            Self::Delete | Self::Change => Box::new(Editor::delete_range),
            Self::Yank => Box::new(Editor::yank_range),
        }
    }
}

/// The operator command in flight, from the operator key to finalize.
#[derive(Debug, Clone, Copy)]
struct Command {
    op: Operator,
    /// Cursor when the operator key was pressed.
    start: Position,
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The editor application state.
struct Editor {
    buffer: Buffer,
    cursor: Cursor,
    mode: Mode,
    history: History,
    register: Register,
    options: Options,

    /// Count typed before an operator or command. `None` means no count.
    count: Option<usize>,

    /// Active text-object session, between an operator key and its kind key.
    session: Option<TextObjectMode<Self>>,

    command: Option<Command>,

    /// The status line. Each new status replaces the last one.
    message: Option<String>,
}

impl Editor {
    fn with_buffer(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: Cursor::new(),
            mode: Mode::Normal,
            history: History::new(),
            register: Register::new(),
            options: Options::default(),
            count: None,
            session: None,
            command: None,
            message: None,
        }
    }

    fn from_file(path: &Path) -> std::io::Result<Self> {
        Ok(Self::with_buffer(Buffer::from_file(path)?))
    }

    /// Apply `:set`-style arguments.
    fn set_options(&mut self, args: &str) -> Result<(), OptionError> {
        for directive in options::parse_set(args) {
            if let Some(shown) = self.options.apply(&directive)? {
                self.set_status(&shown);
            }
        }
        Ok(())
    }

    // ── Key dispatch ───────────────────────────────────────────────────

    fn run_script(&mut self, script: &str) {
        for key in script_keys(script) {
            self.on_key(&key);
        }
    }

    fn on_key(&mut self, key: &KeyEvent) {
        if let Some(mut session) = self.session.take() {
            match session.on_key(self, key) {
                Progress::Pending => self.session = Some(session),
                Progress::Complete => {
                    session.exit(self);
                    self.command = None;
                }
            }
            return;
        }

        match self.mode {
            Mode::Insert => self.insert_key(key),
            Mode::Normal | Mode::Visual(_) | Mode::OperatorPending => self.normal_key(key),
        }
    }

    fn normal_key(&mut self, key: &KeyEvent) {
        if key.code == KeyCode::Escape {
            self.count = None;
            return;
        }
        if key.code == KeyCode::Char('r') && key.modifiers.contains(Modifiers::CTRL) {
            self.redo();
            return;
        }
        let Some(ch) = key.typed_char() else {
            trace!(?key, "unmapped key");
            return;
        };

        match ch {
            d @ '1'..='9' => self.push_count_digit(d),
            '0' if self.count.is_some() => self.push_count_digit('0'),
            'u' => self.undo(),
            'w' => self.word_motion(),
            'i' => {
                self.count = None;
                self.mode = Mode::Insert;
            }
            _ => match Operator::from_key(ch) {
                Some(op) => self.start_operator(op),
                None => {
                    self.count = None;
                    trace!(%ch, "unmapped key");
                }
            },
        }
    }

    fn insert_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Escape => {
                let pos = self.cursor.position();
                self.mode = Mode::Normal;
                self.history.finalize(pos);
                self.cursor
                    .set_position(Position::new(pos.line, pos.col.saturating_sub(1)), &self.buffer, false);
            }
            KeyCode::Enter => self.insert_text("\n"),
            KeyCode::Tab => self.insert_text("\t"),
            _ => {
                if let Some(ch) = key.typed_char() {
                    let mut utf8 = [0u8; 4];
                    self.insert_text(ch.encode_utf8(&mut utf8));
                }
            }
        }
    }

    fn push_count_digit(&mut self, digit: char) {
        let value = digit.to_digit(10).map_or(0, |d| d as usize);
        let current = self.count.unwrap_or(0);
        self.count = Some(current.saturating_mul(10).saturating_add(value));
    }

    fn take_count(&mut self) -> usize {
        self.count.take().unwrap_or(1)
    }

    // ── Commands ───────────────────────────────────────────────────────

    /// Start a text-object session for `op`. The typed count becomes the
    /// session's outer count.
    fn start_operator(&mut self, op: Operator) {
        let count = self.take_count();
        let restore = self.mode;
        self.command = Some(Command {
            op,
            start: self.cursor.position(),
        });
        self.register.start_command();
        self.mode = Mode::OperatorPending;
        debug!(?op, count, "operator pending");
        self.session = Some(
            TextObjectMode::new(restore, op.range_fn(), count).with_max_count(self.options.maxcount),
        );
    }

    fn word_motion(&mut self) {
        let count = self.take_count();
        for _ in 0..count {
            if !self.cursor.advance_word(&self.buffer, LineBreaks::Cross) {
                break;
            }
        }
        self.cursor.clamp(&self.buffer, false);
    }

    fn undo(&mut self) {
        let count = self.take_count();
        for _ in 0..count {
            match self.history.undo(&mut self.buffer) {
                Some(pos) => self.cursor.set_position(pos, &self.buffer, false),
                None => {
                    self.set_status("Already at oldest change");
                    break;
                }
            }
        }
    }

    fn redo(&mut self) {
        let count = self.take_count();
        for _ in 0..count {
            match self.history.redo(&mut self.buffer) {
                Some(pos) => self.cursor.set_position(pos, &self.buffer, false),
                None => {
                    self.set_status("Already at newest change");
                    break;
                }
            }
        }
    }

    fn insert_text(&mut self, text: &str) {
        let pos = self.cursor.position();
        if self.buffer.insert(pos, text).is_none() {
            return;
        }
        self.history.record_insert(pos, pos, text);
        let next = if text == "\n" {
            Position::new(pos.line + 1, 0)
        } else {
            Position::new(pos.line, pos.col + text.chars().count())
        };
        self.cursor = Cursor::at(next);
    }

    // ── Range delegates ────────────────────────────────────────────────

    /// `d` / `c`: remove `[from, to)` into the register and leave the
    /// cursor at `from`.
    fn delete_range(&mut self, from: Position, to: Position) {
        if from >= to {
            return;
        }
        let Some(text) = self.buffer.delete(Range::new(from, to)) else {
            trace!(%from, %to, "range outside buffer");
            return;
        };
        let start = self.command.map_or(from, |cmd| cmd.start);
        self.history.record_delete(start, from, &text);
        self.register.store(&text);
        self.cursor = Cursor::at(from);
    }

    /// `y`: copy `[from, to)` into the register. The cursor steps to `to`
    /// so the next repetition yanks the following span; finalize puts it
    /// back.
    fn yank_range(&mut self, from: Position, to: Position) {
        if from < to {
            if let Some(slice) = self.buffer.slice(Range::new(from, to)) {
                self.register.store(&slice.to_string());
            }
        }
        self.cursor = Cursor::at(to);
    }
}

impl Host for Editor {
    fn set_mode(&mut self, mode: Mode) {
        trace!(from = %self.mode, to = %mode, "mode restore");
        self.mode = mode;
    }

    fn set_status(&mut self, msg: &str) {
        debug!(msg, "status");
        self.message = Some(msg.to_string());
    }
}

impl TextView for Editor {
    fn cursor(&self) -> Position {
        self.cursor.position()
    }

    fn next_word(&self, from: Position) -> Result<Position, Position> {
        let mut to = Cursor::at(from);
        if to.advance_word(&self.buffer, self.options.line_breaks()) {
            Ok(to.position())
        } else {
            Err(to.position())
        }
    }

    fn finalize_action_group(&mut self) {
        if let Some(cmd) = self.command.take() {
            match cmd.op {
                Operator::Yank => self.cursor = Cursor::at(cmd.start),
                Operator::Change => self.mode = Mode::Insert,
                Operator::Delete => {}
            }
        }
        self.cursor.clamp(&self.buffer, self.mode.cursor_past_end());
        self.history.finalize(self.cursor.position());
    }
}

// ─── Key scripts ────────────────────────────────────────────────────────────

const NAMED_KEYS: [(&str, KeyEvent); 7] = [
    ("<esc>", KeyEvent::new(KeyCode::Escape, Modifiers::empty())),
    ("<cr>", KeyEvent::new(KeyCode::Enter, Modifiers::empty())),
    ("<enter>", KeyEvent::new(KeyCode::Enter, Modifiers::empty())),
    ("<tab>", KeyEvent::new(KeyCode::Tab, Modifiers::empty())),
    ("<bs>", KeyEvent::new(KeyCode::Backspace, Modifiers::empty())),
    ("<c-r>", KeyEvent::new(KeyCode::Char('r'), Modifiers::CTRL)),
    ("<lt>", KeyEvent::char('<')),
];

/// A named key at the start of `s`, and its length in bytes.
fn named_key(s: &str) -> Option<(KeyEvent, usize)> {
    NAMED_KEYS.iter().find_map(|(name, key)| {
        s.get(..name.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(name))
            .map(|_| (*key, name.len()))
    })
}

/// Decode a key script. Literal text goes through the byte parser; named
/// keys are emitted directly.
fn script_keys(script: &str) -> Vec<KeyEvent> {
    let mut parser = Parser::new();
    let mut keys = Vec::new();
    let mut rest = script;

    while !rest.is_empty() {
        if let Some((key, len)) = named_key(rest) {
            keys.extend(parser.flush().into_iter().map(|Event::Key(k)| k));
            keys.push(key);
            rest = &rest[len..];
            continue;
        }
        let first = rest.chars().next().map_or(1, char::len_utf8);
        let end = rest[first..].find('<').map_or(rest.len(), |i| first + i);
        keys.extend(
            parser
                .advance(rest[..end].as_bytes())
                .into_iter()
                .map(|Event::Key(k)| k),
        );
        rest = &rest[end..];
    }
    keys.extend(parser.flush().into_iter().map(|Event::Key(k)| k));
    keys
}

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
enum Source {
    Text(String),
    File(PathBuf),
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    sets: Vec<String>,
    source: Source,
    keys: String,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut sets = Vec::new();
        let mut text = None;
        let mut positional = Vec::new();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--set" => sets.push(args.next().ok_or("--set needs an argument")?),
                "--text" => text = Some(args.next().ok_or("--text needs an argument")?),
                s if s.starts_with("--") => return Err(format!("unknown flag: {s}")),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let source = match text {
            Some(text) => Source::Text(text),
            None => Source::File(PathBuf::from(positional.next().ok_or("missing FILE")?)),
        };
        let keys = positional.next().ok_or("missing KEYS")?;
        if let Some(extra) = positional.next() {
            return Err(format!("unexpected argument: {extra}"));
        }
        Ok(Self { sets, source, keys })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("VITO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() {
    init_tracing();

    let raw: Vec<String> = env::args().skip(1).collect();
    if raw.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return;
    }
    let args = Args::parse(raw).unwrap_or_else(|e| {
        eprintln!("vito: {e}");
        eprintln!("{USAGE}");
        process::exit(1);
    });

    let mut editor = match &args.source {
        Source::Text(text) => Editor::with_buffer(Buffer::from_text(text)),
        Source::File(path) => Editor::from_file(path).unwrap_or_else(|e| {
            eprintln!("vito: {}: {e}", path.display());
            process::exit(1);
        }),
    };

    for set in &args.sets {
        if let Err(e) = editor.set_options(set) {
            eprintln!("vito: {e}");
            process::exit(1);
        }
    }

    editor.run_script(&args.keys);

    if let Some(msg) = &editor.message {
        eprintln!("{msg}");
    }
    print!("{}", editor.buffer.contents());
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────

    fn editor_with(text: &str) -> Editor {
        Editor::with_buffer(Buffer::from_text(text))
    }

    fn run(text: &str, script: &str) -> Editor {
        let mut e = editor_with(text);
        e.run_script(script);
        e
    }

    fn args(list: &[&str]) -> Result<Args, String> {
        Args::parse(list.iter().map(|s| (*s).to_string()))
    }

    // ── Delete ────────────────────────────────────────────────────────────

    #[test]
    fn dw_deletes_one_word() {
        let e = run("one two three", "dw");
        assert_eq!(e.buffer.contents(), "two three");
        assert_eq!(e.register.content(), "one ");
        assert_eq!(e.mode, Mode::Normal);
        assert_eq!(e.message, None);
    }

    #[test]
    fn counts_multiply() {
        let e = run("a b c d e f g h", "2d3w");
        assert_eq!(e.buffer.contents(), "g h");
        assert_eq!(e.register.content(), "a b c d e f ");
    }

    #[test]
    fn inner_word_with_selector() {
        let e = run("alpha beta", "diw");
        assert_eq!(e.buffer.contents(), "beta");
    }

    #[test]
    fn one_undo_restores_whole_command() {
        let mut e = run("one two three four", "d3w");
        assert_eq!(e.buffer.contents(), "four");
        e.run_script("u");
        assert_eq!(e.buffer.contents(), "one two three four");
        assert_eq!(e.cursor.position(), Position::ZERO);
        e.run_script("<C-r>");
        assert_eq!(e.buffer.contents(), "four");
    }

    #[test]
    fn undo_with_nothing_to_undo() {
        let e = run("x", "u");
        assert_eq!(e.message.as_deref(), Some("Already at oldest change"));
    }

    #[test]
    fn delete_stops_at_line_end() {
        let e = run("foo bar\nbaz", "wdw");
        assert_eq!(e.buffer.contents(), "foo \nbaz");
    }

    #[test]
    fn crossline_joins_lines() {
        let mut e = editor_with("foo bar\nbaz");
        e.set_options("xl").unwrap();
        e.run_script("wdw");
        assert_eq!(e.buffer.contents(), "foo baz");
    }

    #[test]
    fn delete_at_line_end_takes_the_break() {
        let mut e = editor_with("foo\nbar");
        // Column 3 is past the last char; only an operator can leave the
        // cursor there, so place it directly.
        e.cursor = Cursor::at(Position::new(0, 3));
        e.run_script("dw");
        assert_eq!(e.buffer.contents(), "foobar");
    }

    #[test]
    fn end_of_buffer_is_reported() {
        let e = run("one", "d3w");
        assert_eq!(e.buffer.contents(), "");
        assert_eq!(e.message.as_deref(), Some("End of buffer"));
    }

    #[test]
    fn huge_count_keeps_one_status() {
        let e = run("one", "d200000w");
        assert_eq!(e.buffer.contents(), "");
        assert_eq!(e.message.as_deref(), Some("End of buffer"));
        assert_eq!(e.history.undo_count(), 1);
    }

    #[test]
    fn new_status_replaces_old() {
        let e = run("one two", "dqd5B");
        assert_eq!(e.message.as_deref(), Some("range conversion not implemented"));
    }

    #[test]
    fn maxcount_caps_the_command() {
        let mut e = editor_with("a b c d e");
        e.set_options("mc=2").unwrap();
        e.run_script("d9w");
        assert_eq!(e.buffer.contents(), "c d e");
    }

    // ── Errors ────────────────────────────────────────────────────────────

    #[test]
    fn bad_object_leaves_buffer() {
        let e = run("one two", "dq");
        assert_eq!(e.buffer.contents(), "one two");
        assert_eq!(e.message.as_deref(), Some("bad text object"));
        assert_eq!(e.mode, Mode::Normal);
        assert_eq!(e.history.undo_count(), 0);
    }

    #[test]
    fn unimplemented_kind_is_reported() {
        let e = run("{ one }", "d5B");
        assert_eq!(e.buffer.contents(), "{ one }");
        assert_eq!(e.message.as_deref(), Some("range conversion not implemented"));
    }

    #[test]
    fn escape_as_kind_is_a_bad_object() {
        let e = run("one", "d<Esc>");
        assert_eq!(e.message.as_deref(), Some("bad text object"));
        assert!(e.session.is_none());
    }

    // ── Change / yank ─────────────────────────────────────────────────────

    #[test]
    fn change_enters_insert() {
        let mut e = run("one two", "cw");
        assert_eq!(e.mode, Mode::Insert);
        e.run_script("new <Esc>");
        assert_eq!(e.buffer.contents(), "new two");
        assert_eq!(e.mode, Mode::Normal);
        assert_eq!(e.cursor.position(), Position::new(0, 3));
    }

    #[test]
    fn yank_collects_every_span() {
        let e = run("one two three", "y2w");
        assert_eq!(e.buffer.contents(), "one two three");
        assert_eq!(e.register.content(), "one two ");
        assert_eq!(e.cursor.position(), Position::ZERO);
        assert_eq!(e.history.undo_count(), 0);
    }

    #[test]
    fn next_command_replaces_register() {
        let e = run("one two three", "y2wwyw");
        assert_eq!(e.register.content(), "two ");
    }

    // ── Key scripts ───────────────────────────────────────────────────────

    #[test]
    fn script_named_keys() {
        let keys = script_keys("a<Esc>b<lt><C-R>");
        assert_eq!(
            keys,
            vec![
                KeyEvent::char('a'),
                KeyEvent::new(KeyCode::Escape, Modifiers::empty()),
                KeyEvent::char('b'),
                KeyEvent::char('<'),
                KeyEvent::new(KeyCode::Char('r'), Modifiers::CTRL),
            ]
        );
    }

    #[test]
    fn script_unknown_name_is_literal() {
        let keys = script_keys("<x>é");
        assert_eq!(
            keys,
            vec![
                KeyEvent::char('<'),
                KeyEvent::char('x'),
                KeyEvent::char('>'),
                KeyEvent::char('é'),
            ]
        );
    }

    // ── Args ──────────────────────────────────────────────────────────────

    #[test]
    fn args_text_source() {
        assert_eq!(
            args(&["--set", "xl", "--text", "a b", "dw"]),
            Ok(Args {
                sets: vec!["xl".into()],
                source: Source::Text("a b".into()),
                keys: "dw".into(),
            })
        );
    }

    #[test]
    fn args_file_source() {
        assert_eq!(
            args(&["notes.txt", "d2w"]),
            Ok(Args {
                sets: Vec::new(),
                source: Source::File(PathBuf::from("notes.txt")),
                keys: "d2w".into(),
            })
        );
    }

    #[test]
    fn args_errors() {
        assert!(args(&["--set"]).is_err());
        assert!(args(&["--text", "x"]).is_err());
        assert!(args(&["--bogus", "f", "k"]).is_err());
        assert!(args(&["f", "k", "extra"]).is_err());
    }

    #[test]
    fn bad_set_is_an_error() {
        let mut e = editor_with("");
        assert_eq!(
            e.set_options("mc=x"),
            Err(OptionError::InvalidValue {
                name: "mc".into(),
                value: "x".into()
            })
        );
    }

    #[test]
    fn set_query_becomes_status() {
        let mut e = editor_with("");
        e.set_options("mc=3 mc?").unwrap();
        assert_eq!(e.message.as_deref(), Some("maxcount=3"));
    }
}
