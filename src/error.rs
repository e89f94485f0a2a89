//! Error types for encoding and decoding.
//!
//! Every fallible operation in this crate returns [`Result`], whose error type
//! is the [`Error`] enum below. Errors raised while reading carry the byte
//! offset (counted from where the decoder started) at which the problem was
//! detected.
//!
//! ## Error Categories
//!
//! Variants fall into four broad categories, reported by [`Error::category`]:
//!
//! - **Grammar**: the text does not follow the wire grammar (bad token, bad
//!   number, unterminated string, trailing garbage)
//! - **Schema**: the data does not fit the descriptor (unknown field, value of
//!   the wrong type, invalid descriptor)
//! - **Stream**: the underlying byte stream failed
//! - **Overflow**: a numeric literal does not fit the fixed numeric text limit
//!
//! ## Examples
//!
//! ```rust
//! use protojs::{
//!     from_str, CodecOptions, ErrorCategory, FieldDescriptor, FieldType, MessageDescriptor,
//! };
//!
//! let descriptor = MessageDescriptor::builder("Point")
//!     .field(FieldDescriptor::new(1, "x", FieldType::Int32))
//!     .build()
//!     .unwrap();
//!
//! let err = from_str("{\"1\":", &descriptor, CodecOptions::object_by_tag()).unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::Grammar);
//! ```

use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur while encoding or decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The byte stream failed to supply or accept data.
    #[error("I/O error: {0}")]
    Io(String),

    /// Unexpected token or byte.
    #[error("syntax error at byte {offset}: {msg}")]
    Syntax { offset: usize, msg: String },

    /// The stream ended in the middle of a value.
    #[error("unexpected end of input at byte {offset}, expected {expected}")]
    UnexpectedEof { offset: usize, expected: String },

    /// Numeric text that does not fit the target type.
    #[error("invalid {kind} value {text:?} at byte {offset}")]
    InvalidNumber {
        offset: usize,
        kind: &'static str,
        text: String,
    },

    /// Numeric text longer than the numeric buffer limit.
    #[error("numeric literal at byte {offset} exceeds {limit} bytes")]
    NumberTooLong { offset: usize, limit: usize },

    /// Malformed escape sequence or invalid UTF-8 in string content.
    #[error("invalid string value: {0}")]
    InvalidString(String),

    /// Floats without a JSON representation (NaN, infinities).
    #[error("cannot encode non-finite number {0}")]
    NonFiniteNumber(String),

    /// A field that the descriptor does not declare.
    #[error("unknown field `{field}` in message `{message}`")]
    UnknownField { message: String, field: String },

    /// A message value that does not match its field descriptor.
    #[error("field `{field}` expects {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// Descriptor validation failure.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Skipped values nested deeper than the skip limit.
    #[error("value nesting exceeds {0} levels")]
    DepthLimitExceeded(usize),

    /// Non-whitespace bytes after a complete message.
    #[error("trailing characters at byte {offset}")]
    TrailingCharacters { offset: usize },
}

/// Coarse classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Grammar,
    Schema,
    Stream,
    Overflow,
}

impl Error {
    /// Creates a syntax error at `offset`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use protojs::Error;
    ///
    /// let err = Error::syntax(7, "expected `:`");
    /// assert!(err.to_string().contains("byte 7"));
    /// ```
    pub fn syntax(offset: usize, msg: impl Into<String>) -> Self {
        Error::Syntax {
            offset,
            msg: msg.into(),
        }
    }

    /// Creates an end-of-input error naming what the reader was waiting for.
    pub fn unexpected_eof(offset: usize, expected: impl Into<String>) -> Self {
        Error::UnexpectedEof {
            offset,
            expected: expected.into(),
        }
    }

    pub fn invalid_number(offset: usize, kind: &'static str, text: impl Into<String>) -> Self {
        Error::InvalidNumber {
            offset,
            kind,
            text: text.into(),
        }
    }

    pub fn invalid_string(msg: impl Into<String>) -> Self {
        Error::InvalidString(msg.into())
    }

    pub fn unknown_field(message: &str, field: impl Into<String>) -> Self {
        Error::UnknownField {
            message: message.to_string(),
            field: field.into(),
        }
    }

    /// Creates a type mismatch error for a field whose value does not fit its descriptor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use protojs::Error;
    ///
    /// let err = Error::type_mismatch("id", "int64", "string");
    /// assert!(err.to_string().contains("expects int64"));
    /// ```
    pub fn type_mismatch(
        field: &str,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Error::TypeMismatch {
            field: field.to_string(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn invalid_schema(msg: impl Into<String>) -> Self {
        Error::InvalidSchema(msg.into())
    }

    /// Returns the category this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Io(_) => ErrorCategory::Stream,
            Error::NumberTooLong { .. } => ErrorCategory::Overflow,
            Error::UnknownField { .. }
            | Error::TypeMismatch { .. }
            | Error::InvalidSchema(_)
            | Error::NonFiniteNumber(_) => ErrorCategory::Schema,
            Error::Syntax { .. }
            | Error::UnexpectedEof { .. }
            | Error::InvalidNumber { .. }
            | Error::InvalidString(_)
            | Error::DepthLimitExceeded(_)
            | Error::TrailingCharacters { .. } => ErrorCategory::Grammar,
        }
    }

    /// Returns `true` if the input ended before a complete message was read.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::UnexpectedEof { .. })
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
