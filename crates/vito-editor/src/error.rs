//! Error types for text-object parsing and option handling.
//!
//! Neither error crosses the key boundary as an `Err`: the engine keeps its
//! [`TextObjectError`] and reports it through the host's status line, and
//! the host turns an [`OptionError`] into a status message of its own.

use thiserror::Error;

use crate::text_object::TextObjectKind;

/// Why a text-object command produced no (or a partial) edit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextObjectError {
    /// The kind letter was not in the text-object table.
    #[error("bad text object")]
    BadTextObject,

    /// A word boundary ran into the end of the buffer. Not fatal: the
    /// partial range is still applied.
    #[error("End of buffer")]
    EndOfBuffer,

    /// The kind parsed, but has no range conversion.
    #[error("range conversion not implemented")]
    NotImplemented(TextObjectKind),
}

/// Errors from applying a `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    /// `name!` or `noname` on a numeric option.
    #[error("not a boolean option: {0}")]
    NotBoolean(String),

    /// `name=value` with a value that does not parse for the option's type.
    #[error("invalid argument: {name}={value}")]
    InvalidValue {
        /// Option name as typed.
        name: String,
        /// The rejected value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_texts() {
        assert_eq!(TextObjectError::BadTextObject.to_string(), "bad text object");
        assert_eq!(TextObjectError::EndOfBuffer.to_string(), "End of buffer");
        assert_eq!(
            TextObjectError::NotImplemented(TextObjectKind::Braces).to_string(),
            "range conversion not implemented"
        );
    }

    #[test]
    fn option_error_texts() {
        assert_eq!(
            OptionError::Unknown("foo".into()).to_string(),
            "unknown option: foo"
        );
        assert_eq!(
            OptionError::InvalidValue {
                name: "mc".into(),
                value: "x".into()
            }
            .to_string(),
            "invalid argument: mc=x"
        );
    }
}
