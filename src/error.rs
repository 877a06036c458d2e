//! Error types for parsing documents and reading values out of them.
//!
//! Every failure is reported through a single [`Error`] enum. Parse errors carry
//! the 1-based line and column where the problem was detected, so messages can
//! point at the offending character:
//!
//! ```rust
//! use serde_tomlet::{parse, Error};
//!
//! let err = parse("name = \"Tom\"\nname = \"Pradyun\"\n").unwrap_err();
//! assert!(matches!(err, Error::DuplicateKey { .. }));
//! assert!(err.to_string().contains("line 2"));
//! ```
//!
//! ## Error Categories
//!
//! Variants are grouped by [`ErrorCategory`]:
//!
//! - **Lexical**: malformed literals, escapes, unterminated strings
//! - **Structural**: missing `=`/brackets, misplaced or missing newlines, empty keys
//! - **Semantic**: duplicate keys, key-path conflicts, mixed-type arrays
//! - **Internal**: reader invariant violations (a bug in this crate, not bad input)
//! - **Access**: required accessors on a [`Document`](crate::Document)
//! - **Integration**: I/O and Serde conversions

use crate::value::Kind;
use std::fmt;
use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Lexical,
    Structural,
    Semantic,
    Internal,
    Access,
    Integration,
}

/// Represents all possible errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error while reading input
    #[error("IO error: {0}")]
    Io(String),

    /// A bare token that matches none of the literal grammars
    #[error("Invalid literal `{token}` at line {line}, column {col}")]
    InvalidLiteral {
        token: String,
        line: usize,
        col: usize,
    },

    /// Malformed escape sequence or invalid Unicode scalar value
    #[error("Invalid escape sequence at line {line}, column {col}: {msg}")]
    InvalidEscape { msg: String, line: usize, col: usize },

    /// Character that may not appear in a bare key
    #[error("Character {found:?} is not allowed in bare keys (line {line}, column {col})")]
    InvalidKeyChar { found: char, line: usize, col: usize },

    /// Raw newline inside a single-line string
    #[error("Unterminated string at line {line}, column {col}: newline inside single-line string")]
    UnterminatedString { line: usize, col: usize },

    /// Input ended in the middle of a construct
    #[error("Unexpected end of input at line {line}, column {col}\nExpected: {expected}")]
    UnexpectedEof {
        expected: String,
        line: usize,
        col: usize,
    },

    /// A specific token was required but something else was found
    #[error("Expected {expected} at line {line}, column {col}, found {found}")]
    Expected {
        expected: String,
        found: String,
        line: usize,
        col: usize,
    },

    /// Trailing content after a statement on the same line
    #[error("Expected newline at line {line}, column {col}, found {found:?}")]
    ExpectedNewline { found: char, line: usize, col: usize },

    /// Raw newline where the grammar forbids one
    #[error("Unexpected newline at line {line}, column {col}")]
    UnexpectedNewline { line: usize, col: usize },

    /// Empty key segment
    #[error("Empty key at line {line}, column {col}")]
    EmptyKey { line: usize, col: usize },

    /// Arrays or inline tables nested deeper than the configured limit
    #[error("Nesting deeper than {limit} levels at line {line}, column {col}")]
    DepthLimitExceeded { limit: usize, line: usize, col: usize },

    /// The same key was bound twice in one table
    #[error("Key `{key}` defined multiple times (line {line}, column {col})")]
    DuplicateKey { key: String, line: usize, col: usize },

    /// A dotted key or header tried to extend a value that is not a table
    #[error("Key `{key}` is not a table and cannot be extended (line {line}, column {col})")]
    KeyPathConflict { key: String, line: usize, col: usize },

    /// An array element whose kind differs from the first element
    #[error("Arrays may not contain different types: expected {expected}, found {found} (line {line}, column {col})")]
    HeterogeneousArray {
        expected: Kind,
        found: Kind,
        line: usize,
        col: usize,
    },

    /// Reader invariant violation; indicates a bug in the parser
    #[error("Internal parser error: {0}")]
    Internal(String),

    /// Required accessor found nothing at the path
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// Required accessor or root cast found a value of another kind
    #[error("Wrong type at `{path}`: expected {expected}, found {found}")]
    WrongType {
        path: String,
        expected: Kind,
        found: Kind,
    },

    /// Integer indexing on something that is not an array
    #[error("Cannot index into {found}: not an array")]
    NotAnArray { found: Kind },

    /// Value that has no representation in the format
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Returns the [`ErrorCategory`] this error belongs to.
    ///
    /// ```rust
    /// use serde_tomlet::{parse, ErrorCategory};
    ///
    /// let err = parse("a = [1, \"a\"]").unwrap_err();
    /// assert_eq!(err.category(), ErrorCategory::Semantic);
    /// ```
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidLiteral { .. }
            | Error::InvalidEscape { .. }
            | Error::InvalidKeyChar { .. }
            | Error::UnterminatedString { .. }
            | Error::UnexpectedEof { .. } => ErrorCategory::Lexical,
            Error::Expected { .. }
            | Error::ExpectedNewline { .. }
            | Error::UnexpectedNewline { .. }
            | Error::EmptyKey { .. }
            | Error::DepthLimitExceeded { .. } => ErrorCategory::Structural,
            Error::DuplicateKey { .. }
            | Error::KeyPathConflict { .. }
            | Error::HeterogeneousArray { .. } => ErrorCategory::Semantic,
            Error::Internal(_) => ErrorCategory::Internal,
            Error::MissingKey(_) | Error::WrongType { .. } | Error::NotAnArray { .. } => {
                ErrorCategory::Access
            }
            Error::Io(_) | Error::UnsupportedType(_) | Error::Custom(_) => {
                ErrorCategory::Integration
            }
        }
    }

    /// Returns the `(line, column)` of a parse error, if it has one.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match *self {
            Error::InvalidLiteral { line, col, .. }
            | Error::InvalidEscape { line, col, .. }
            | Error::InvalidKeyChar { line, col, .. }
            | Error::UnterminatedString { line, col }
            | Error::UnexpectedEof { line, col, .. }
            | Error::Expected { line, col, .. }
            | Error::ExpectedNewline { line, col, .. }
            | Error::UnexpectedNewline { line, col }
            | Error::EmptyKey { line, col }
            | Error::DepthLimitExceeded { line, col, .. }
            | Error::DuplicateKey { line, col, .. }
            | Error::KeyPathConflict { line, col, .. }
            | Error::HeterogeneousArray { line, col, .. } => Some((line, col)),
            _ => None,
        }
    }

    pub(crate) fn unexpected_eof(line: usize, col: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            expected: expected.to_string(),
            line,
            col,
        }
    }

    pub(crate) fn expected(line: usize, col: usize, expected: &str, found: Option<char>) -> Self {
        Error::Expected {
            expected: expected.to_string(),
            found: describe(found),
            line,
            col,
        }
    }

    pub(crate) fn invalid_escape(line: usize, col: usize, msg: &str) -> Self {
        Error::InvalidEscape {
            msg: msg.to_string(),
            line,
            col,
        }
    }

    /// Creates an unsupported type error for values the format cannot express.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// ```rust
    /// use serde_tomlet::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

fn describe(found: Option<char>) -> String {
    match found {
        None => "end of input".to_string(),
        Some('\n') => "newline".to_string(),
        Some(ch) => format!("{:?}", ch),
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = Error::DuplicateKey {
            key: "name".to_string(),
            line: 2,
            col: 1,
        };
        assert_eq!(err.category(), ErrorCategory::Semantic);
        assert_eq!(err.position(), Some((2, 1)));

        assert_eq!(
            Error::Internal("double pushback".to_string()).category(),
            ErrorCategory::Internal
        );
        assert_eq!(
            Error::MissingKey("a.b".to_string()).category(),
            ErrorCategory::Access
        );
        assert_eq!(Error::MissingKey("a.b".to_string()).position(), None);
    }

    #[test]
    fn test_expected_describes_found() {
        let err = Error::expected(1, 5, "'='", Some('\n'));
        assert!(err.to_string().contains("found newline"));

        let err = Error::expected(1, 5, "']'", None);
        assert!(err.to_string().contains("end of input"));
        assert_eq!(err.category(), ErrorCategory::Structural);
    }

    #[test]
    fn test_escape_message() {
        let err = Error::invalid_escape(1, 3, "unsupported escape sequence \\q");
        assert!(err.to_string().contains("escape"));
        assert_eq!(err.category(), ErrorCategory::Lexical);
    }
}
