//! Parse error types

use crate::token::{Span, Token};
use thiserror::Error;

/// A parse error with location and contextual information.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at offset {}", .span.start)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// Location of the error inside the parsed text
    pub span: Span,

    /// Human-readable error message
    pub message: String,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token found
    UnexpectedToken { expected: String, found: Token },

    /// Input continues after a complete type
    TrailingInput { found: Token },

    /// Nesting deeper than the parser accepts
    TooDeep { limit: usize },
}

impl ParseError {
    /// Create an "unexpected token" error.
    pub fn unexpected_token(expected: impl Into<String>, found: Token, span: Span) -> Self {
        let expected = expected.into();
        let message = format!("Expected {}, found {}", expected, found.describe());
        Self {
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span,
            message,
        }
    }

    /// Create a "trailing input" error.
    pub fn trailing_input(found: Token, span: Span) -> Self {
        let message = format!("Unexpected {} after type", found.describe());
        Self {
            kind: ParseErrorKind::TrailingInput { found },
            span,
            message,
        }
    }

    /// Create a "nesting too deep" error.
    pub fn too_deep(limit: usize, span: Span) -> Self {
        Self {
            kind: ParseErrorKind::TooDeep { limit },
            span,
            message: format!("Type nesting exceeds {} levels", limit),
        }
    }
}
