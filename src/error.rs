//! Error types shared across the crate.

use std::error::Error;
use std::fmt;

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, FormlangError>;

/// A failure of the regular-expression parser.
///
/// Carries the byte offset at which parsing could not continue and a
/// description of what was expected there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset into the input expression.
    pub position: usize,
    /// What the parser expected at that offset.
    pub expected: &'static str,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {} at byte {}", self.expected, self.position)
    }
}

/// Errors surfaced by the transformation library.
///
/// All of these are fatal to the enclosing call; nothing is retried and no
/// operation partially mutates shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormlangError {
    /// Malformed inputs to the public automaton factory.
    Validation {
        operation: &'static str,
        message: String,
    },
    /// An operation was called on an automaton of the wrong shape.
    Precondition {
        operation: &'static str,
        message: String,
    },
    /// The expression parser could not consume the input.
    Parse(ParseError),
    /// Impossible access on a constructed automaton. Signals a builder bug,
    /// not a user error.
    Index {
        operation: &'static str,
        message: String,
    },
}

impl FormlangError {
    pub(crate) fn validation(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            operation,
            message: message.into(),
        }
    }

    pub(crate) fn precondition(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Precondition {
            operation,
            message: message.into(),
        }
    }

    pub(crate) fn index(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Index {
            operation,
            message: message.into(),
        }
    }
}

impl fmt::Display for FormlangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { operation, message }
            | Self::Precondition { operation, message }
            | Self::Index { operation, message } => write!(f, "{operation}: {message}"),
            Self::Parse(error) => write!(f, "from_expression: {error}"),
        }
    }
}

impl Error for FormlangError {}

impl From<ParseError> for FormlangError {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}
