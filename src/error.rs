//! Error types for expression parsing and DNF expansion.

use thiserror::Error;

/// Errors produced while parsing a license expression.
///
/// Positions are byte offsets into the expression string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The expression contained no tokens.
    #[error("empty license expression")]
    Empty,

    /// A token appeared where the grammar does not allow it.
    #[error("unexpected token `{token}` at position {position}")]
    UnexpectedToken { token: String, position: usize },

    /// The expression ended while an operand or `)` was still expected.
    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// A `(` was never closed.
    #[error("unclosed parenthesis opened at position {position}")]
    UnclosedParen { position: usize },

    /// A license or exception identifier contains characters outside the SPDX idstring set.
    #[error("invalid identifier `{id}` at position {position}")]
    InvalidIdentifier { id: String, position: usize },
}

/// Errors produced while expanding an expression into disjunctive normal form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    /// The expansion would produce more clauses than the configured cap.
    #[error("expression expands to more than {limit} clauses")]
    TooManyClauses { limit: usize },
}
