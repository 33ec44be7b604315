//! Error types raised at the public API boundary.
//!
//! Only malformed input and configuration mistakes travel through [`Error`].
//! Comparisons and boundary algebra report "not meaningful" and "operand was
//! invalid" through [`ComparisonResult`](crate::ComparisonResult) and
//! [`Outcome`](crate::Outcome) instead.

use crate::{DateField, ParseError};

/// The error type used throughout calendar_bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An operand had the wrong shape or type.
    #[error("type error: {0}")]
    Type(String),

    /// A value lies outside its domain.
    #[error("range error: {0}")]
    Range(String),

    /// A string source could not be parsed.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A derivation was selected but one of its required fields is absent.
    #[error("missing field {0}")]
    MissingField(DateField),

    /// A derivation was invoked with the wrong number of values.
    #[error("derivation of {field} expects {expected} values, got {actual}")]
    Arity {
        field:    DateField,
        expected: usize,
        actual:   usize,
    },

    /// Error parsing a date value.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Shorthand `Result` type used throughout calendar_bounds.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn range(message: impl Into<String>) -> Self {
        Self::Range(message.into())
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        Self::Type(message.into())
    }

    /// True for the errors that correspond to an out-of-domain value,
    /// including parse errors caused by an invalid component.
    pub const fn is_range(&self) -> bool {
        match self {
            Self::Range(_) => true,
            Self::Parse(parse) => parse.is_range(),
            _ => false,
        }
    }
}
