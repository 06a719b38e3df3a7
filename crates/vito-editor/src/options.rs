//! Engine options and the `:set` syntax that changes them.
//!
//! # Supported syntax
//!
//! | Syntax           | Effect                        |
//! |------------------|-------------------------------|
//! | `:set option`    | Enable boolean / show numeric |
//! | `:set nooption`  | Disable boolean               |
//! | `:set option!`   | Toggle boolean                |
//! | `:set option?`   | Query current value           |
//! | `:set option=N`  | Assign numeric value          |
//! | `:set`           | Show changed options          |
//! | `:set all`       | Show all options              |
//!
//! # Options
//!
//! | Full name   | Abbrev | Type    | Default |
//! |-------------|--------|---------|---------|
//! | `crossline` | `xl`   | bool    | false   |
//! | `maxcount`  | `mc`   | integer | 0       |
//!
//! `crossline` lets a word object's end run onto the next line (so `dw` on
//! the last word of a line joins it with the next one). `maxcount` caps the
//! total repetition of a text-object command; 0 means no cap.

use tracing::debug;

use crate::error::OptionError;
use crate::word::LineBreaks;

/// A parsed `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `:set option`
    On(String),
    /// `:set nooption`
    Off(String),
    /// `:set option!`
    Toggle(String),
    /// `:set option?`, or a bare numeric option name.
    Query(String),
    /// `:set option=value`
    Assign(String, String),
    /// `:set` with no arguments.
    ShowChanged,
    /// `:set all`
    ShowAll,
}

/// Returns `true` if `name` is a known boolean option (full name or abbreviation).
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(name, "crossline" | "xl")
}

/// Returns `true` if `name` is a known numeric option (full name or abbreviation).
#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    matches!(name, "maxcount" | "mc")
}

/// Parse the full `:set` arguments string into directives.
///
/// Arguments are whitespace-separated (`crossline maxcount=20`). An empty
/// string produces [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }

    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }

    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // Only strip "no" when the rest is a boolean option name.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }

    if is_numeric_option(arg) {
        return SetDirective::Query(arg.to_string());
    }

    SetDirective::On(arg.to_string())
}

/// Format a boolean option for display: `"name"` or `"noname"`.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Current option values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub crossline: bool,
    pub maxcount: usize,
}

impl Options {
    /// The line policy word boundaries should use.
    #[must_use]
    pub const fn line_breaks(&self) -> LineBreaks {
        if self.crossline {
            LineBreaks::Cross
        } else {
            LineBreaks::Stop
        }
    }

    /// Apply one directive. Returns the text to display, if any.
    ///
    /// # Errors
    ///
    /// Fails on an unknown option name, a boolean operation on a numeric
    /// option, or a value that does not parse.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::On(name) => {
                if is_numeric_option(name) {
                    return Ok(Some(self.show(name)?));
                }
                self.set_bool(name, true)?;
                Ok(None)
            }
            SetDirective::Off(name) => {
                self.set_bool(name, false)?;
                Ok(None)
            }
            SetDirective::Toggle(name) => {
                let current = self.get_bool(name)?;
                self.set_bool(name, !current)?;
                Ok(None)
            }
            SetDirective::Query(name) => Ok(Some(self.show(name)?)),
            SetDirective::Assign(name, value) => {
                self.assign(name, value)?;
                Ok(None)
            }
            SetDirective::ShowChanged => {
                let defaults = Self::default();
                let mut changed = Vec::new();
                if self.crossline != defaults.crossline {
                    changed.push(format_bool("crossline", self.crossline));
                }
                if self.maxcount != defaults.maxcount {
                    changed.push(format!("maxcount={}", self.maxcount));
                }
                Ok((!changed.is_empty()).then(|| changed.join("  ")))
            }
            SetDirective::ShowAll => Ok(Some(format!(
                "{}  maxcount={}",
                format_bool("crossline", self.crossline),
                self.maxcount
            ))),
        }
    }

    fn get_bool(&self, name: &str) -> Result<bool, OptionError> {
        match name {
            "crossline" | "xl" => Ok(self.crossline),
            _ if is_numeric_option(name) => Err(OptionError::NotBoolean(name.to_string())),
            _ => Err(OptionError::Unknown(name.to_string())),
        }
    }

    fn set_bool(&mut self, name: &str, value: bool) -> Result<(), OptionError> {
        match name {
            "crossline" | "xl" => {
                self.crossline = value;
                debug!(crossline = value, "option set");
                Ok(())
            }
            _ if is_numeric_option(name) => Err(OptionError::NotBoolean(name.to_string())),
            _ => Err(OptionError::Unknown(name.to_string())),
        }
    }

    fn assign(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        match name {
            "maxcount" | "mc" => {
                let n = value.parse().map_err(|_| OptionError::InvalidValue {
                    name: name.to_string(),
                    value: value.to_string(),
                })?;
                self.maxcount = n;
                debug!(maxcount = n, "option set");
                Ok(())
            }
            _ if is_bool_option(name) => Err(OptionError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            }),
            _ => Err(OptionError::Unknown(name.to_string())),
        }
    }

    fn show(&self, name: &str) -> Result<String, OptionError> {
        match name {
            "crossline" | "xl" => Ok(format_bool("crossline", self.crossline)),
            "maxcount" | "mc" => Ok(format!("maxcount={}", self.maxcount)),
            _ => Err(OptionError::Unknown(name.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_all(opts: &mut Options, args: &str) -> Result<Vec<String>, OptionError> {
        let mut shown = Vec::new();
        for d in parse_set(args) {
            if let Some(s) = opts.apply(&d)? {
                shown.push(s);
            }
        }
        Ok(shown)
    }

    // -- parse_set_arg ------------------------------------------------------

    #[test]
    fn parse_boolean_forms() {
        assert_eq!(parse_set_arg("crossline"), SetDirective::On("crossline".into()));
        assert_eq!(parse_set_arg("noxl"), SetDirective::Off("xl".into()));
        assert_eq!(parse_set_arg("xl!"), SetDirective::Toggle("xl".into()));
        assert_eq!(parse_set_arg("xl?"), SetDirective::Query("xl".into()));
    }

    #[test]
    fn parse_assign_and_bare_numeric() {
        assert_eq!(
            parse_set_arg("mc=12"),
            SetDirective::Assign("mc".into(), "12".into())
        );
        assert_eq!(parse_set_arg("maxcount"), SetDirective::Query("maxcount".into()));
        assert_eq!(parse_set_arg("all"), SetDirective::ShowAll);
    }

    #[test]
    fn no_prefix_only_for_bool_names() {
        // "nomc" is not a bool, so it stays an (unknown) On.
        assert_eq!(parse_set_arg("nomc"), SetDirective::On("nomc".into()));
    }

    #[test]
    fn parse_multiple() {
        assert_eq!(
            parse_set(" xl  mc=3 "),
            vec![
                SetDirective::On("xl".into()),
                SetDirective::Assign("mc".into(), "3".into())
            ]
        );
        assert_eq!(parse_set(""), vec![SetDirective::ShowChanged]);
    }

    #[test]
    fn format_bool_on_off() {
        assert_eq!(format_bool("crossline", true), "crossline");
        assert_eq!(format_bool("crossline", false), "nocrossline");
    }

    // -- Options::apply -----------------------------------------------------

    #[test]
    fn defaults() {
        let opts = Options::default();
        assert!(!opts.crossline);
        assert_eq!(opts.maxcount, 0);
        assert_eq!(opts.line_breaks(), LineBreaks::Stop);
    }

    #[test]
    fn set_and_toggle_crossline() {
        let mut opts = Options::default();
        apply_all(&mut opts, "xl").unwrap();
        assert_eq!(opts.line_breaks(), LineBreaks::Cross);
        apply_all(&mut opts, "crossline!").unwrap();
        assert!(!opts.crossline);
        apply_all(&mut opts, "xl nocrossline").unwrap();
        assert!(!opts.crossline);
    }

    #[test]
    fn assign_and_query_maxcount() {
        let mut opts = Options::default();
        assert_eq!(apply_all(&mut opts, "mc=4 maxcount").unwrap(), vec!["maxcount=4"]);
        assert_eq!(opts.maxcount, 4);
        assert_eq!(apply_all(&mut opts, "mc?").unwrap(), vec!["maxcount=4"]);
    }

    #[test]
    fn show_changed_and_all() {
        let mut opts = Options::default();
        assert!(apply_all(&mut opts, "").unwrap().is_empty());
        assert_eq!(
            apply_all(&mut opts, "all").unwrap(),
            vec!["nocrossline  maxcount=0"]
        );
        apply_all(&mut opts, "xl mc=2").unwrap();
        assert_eq!(
            apply_all(&mut opts, "").unwrap(),
            vec!["crossline  maxcount=2"]
        );
    }

    #[test]
    fn errors() {
        let mut opts = Options::default();
        assert_eq!(
            apply_all(&mut opts, "number"),
            Err(OptionError::Unknown("number".into()))
        );
        assert_eq!(
            apply_all(&mut opts, "mc!"),
            Err(OptionError::NotBoolean("mc".into()))
        );
        assert_eq!(
            apply_all(&mut opts, "mc=lots"),
            Err(OptionError::InvalidValue {
                name: "mc".into(),
                value: "lots".into()
            })
        );
        assert_eq!(
            apply_all(&mut opts, "xl=1"),
            Err(OptionError::InvalidValue {
                name: "xl".into(),
                value: "1".into()
            })
        );
        assert_eq!(opts, Options::default());
    }
}
