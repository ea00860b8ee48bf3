//! Error types for parsing and evaluating queries.

use thiserror::Error;

use super::token::TokenKind;

/// A specialized Result type for query parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// A specialized Result type for lowering a query to a backend filter.
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur while parsing a query.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The current token cannot start an expression.
    #[error("no prefix function for: {kind}")]
    NoPrefix {
        /// The kind of the offending token.
        kind: TokenKind,
        /// Byte position of the offending token.
        position: usize,
    },

    /// A `(` without its matching `)`.
    #[error("unclosed grouped expression @ {position}")]
    UnclosedGroup {
        /// Byte position where `)` was expected.
        position: usize,
    },

    /// The left side of `and`/`or` is neither an infix expression nor a string.
    #[error("left side of a logical expression must be an infix expression or string literal, got: {found}")]
    InvalidLogicalOperand {
        /// Kind of the offending operand.
        found: String,
    },

    /// The left side of a comparison is not a field name.
    #[error("left side of a comparison must be a string literal, got: {found}")]
    InvalidComparisonOperand {
        /// Kind of the offending operand.
        found: String,
    },

    /// Adjacent words were found after something other than a string.
    #[error("can only concat string literals, got: {found}")]
    InvalidConcat {
        /// Kind of the offending operand.
        found: String,
    },

    /// A number or date literal that cannot be converted.
    #[error("invalid {kind} literal: {literal}")]
    InvalidLiteral {
        /// The classified kind of the literal.
        kind: TokenKind,
        /// The raw literal text.
        literal: String,
    },

    /// Input left over after a complete expression.
    #[error("unexpected token: {token} @ {position}")]
    UnexpectedToken {
        /// The literal of the token.
        token: String,
        /// Byte position of the token.
        position: usize,
    },

    /// The lexer could not scan the input.
    #[error("{message} @ {position}")]
    Lexical {
        /// The lexer's diagnostic.
        message: String,
        /// Byte position where scanning failed.
        position: usize,
    },
}

impl ParseError {
    /// Creates an invalid literal error.
    pub fn invalid_literal(kind: TokenKind, literal: impl Into<String>) -> Self {
        ParseError::InvalidLiteral {
            kind,
            literal: literal.into(),
        }
    }

    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl Into<String>, position: usize) -> Self {
        ParseError::UnexpectedToken {
            token: token.into(),
            position,
        }
    }
}

/// Errors that can occur while lowering a parsed query to a backend filter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvalError {
    /// A comparison names a field tasks do not have.
    #[error("unknown field: {field}")]
    UnknownField {
        /// The field name as written.
        field: String,
    },

    /// The compared value does not fit the field.
    #[error("cannot compare {field} with a {found} value using {operator}")]
    TypeMismatch {
        /// The field name as written.
        field: String,
        /// The operator used.
        operator: String,
        /// Kind of the value.
        found: String,
    },

    /// An expression shape with no filter equivalent.
    #[error("unsupported expression: {expression}")]
    Unsupported {
        /// The canonical form of the expression.
        expression: String,
    },
}

impl EvalError {
    /// Creates an unknown field error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        EvalError::UnknownField {
            field: field.into(),
        }
    }

    /// Creates an unsupported expression error.
    pub fn unsupported(expression: impl ToString) -> Self {
        EvalError::Unsupported {
            expression: expression.to_string(),
        }
    }
}

/// Any failure between query text and a backend filter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}
