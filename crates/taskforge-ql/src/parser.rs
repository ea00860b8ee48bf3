//! Precedence-climbing parser for queries.

use super::ast::{Ast, Expression, Operator, Value};
use super::error::{ParseError, ParseResult};
use super::lexer::{Lexer, PositionedToken};
use super::token::{Precedence, Token, TokenKind};

/// Parser for the Taskforge query language.
///
/// The parser pulls tokens from a [`Lexer`] keeping the current token and one
/// token of lookahead. Expressions are built by operator-precedence (Pratt)
/// parsing over four tiers.
///
/// # Grammar
///
/// ```text
/// query       ::= expression
/// expression  ::= literal | expression ANDOR expression | "(" expression ")"
/// comparison  ::= FIELD COMPOP literal
/// literal     ::= STRING | NUMBER | BOOLEAN | DATE
/// COMPOP      ::= "=" | "!=" | "^=" | "<" | ">" | "<=" | ">="
///               | "^" | "~" | "^^" | "!~"
/// ANDOR       ::= "and" | "AND" | "or" | "OR"
/// ```
///
/// # Precedence (lowest to highest)
///
/// 1. grouping and the root expression
/// 2. adjacent bare words, joined into one string
/// 3. `and` / `or`, left-associative
/// 4. comparisons
///
/// # Example
///
/// ```
/// use taskforge_ql::{Expression, Parser};
///
/// let ast = Parser::new("milk and cookies").parse().unwrap();
/// assert_eq!(
///     ast.expression,
///     Expression::and(Expression::string("milk"), Expression::string("cookies")),
/// );
///
/// let ast = Parser::new("milk -and cookies").parse().unwrap();
/// assert_eq!(ast.expression, Expression::string("milk and cookies"));
/// ```
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: PositionedToken,
    peek: PositionedToken,
}

impl<'a> Parser<'a> {
    /// Creates a parser over a query string.
    pub fn new(query: &'a str) -> Self {
        Self::from_lexer(Lexer::new(query))
    }

    /// Creates a parser over an existing lexer.
    pub fn from_lexer(lexer: Lexer<'a>) -> Self {
        let mut parser = Self {
            lexer,
            current: eof_at(0),
            peek: eof_at(0),
        };
        // Fill both current and peek
        parser.advance();
        parser.advance();
        parser
    }

    /// Parses the whole query into an AST.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the first grammar violation. An
    /// empty query fails with `no prefix function for: EOF`; callers that
    /// want "match everything" must check for it first.
    pub fn parse(mut self) -> ParseResult<Ast> {
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek.token.kind != TokenKind::Eof {
            return Err(ParseError::unexpected_token(
                self.peek.token.literal.clone(),
                self.peek.position,
            ));
        }

        Ok(Ast::new(expression))
    }

    /// Moves the lookahead into current and pulls the next token.
    fn advance(&mut self) {
        let next = match self.lexer.next_token() {
            Some(token) => token,
            None => eof_at(self.lexer.position()),
        };
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn parse_expression(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        let mut expression = self.parse_prefix()?;

        while precedence < self.peek.token.kind.precedence() {
            self.advance();
            expression = match self.current.token.kind {
                TokenKind::String => self.parse_concat(expression)?,
                _ => self.parse_infix(expression)?,
            };
        }

        Ok(expression)
    }

    /// Parses the expression that starts at the current token.
    fn parse_prefix(&mut self) -> ParseResult<Expression> {
        let kind = self.current.token.kind;

        match kind {
            TokenKind::String | TokenKind::Number | TokenKind::Date | TokenKind::Boolean => {
                Ok(Expression::literal(Value::from_token(&self.current.token)?))
            }

            TokenKind::LParen => self.parse_grouped(),

            // Unterminated quote; the literal is the lexer's diagnostic
            TokenKind::Unexpected => Err(ParseError::Lexical {
                message: self.current.token.literal.clone(),
                position: self.current.position,
            }),

            TokenKind::Eq
            | TokenKind::Ne
            | TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Gt
            | TokenKind::Ge
            | TokenKind::Like
            | TokenKind::NotLike
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::RParen
            | TokenKind::Eof => Err(ParseError::NoPrefix {
                kind,
                position: self.current.position,
            }),
        }
    }

    /// Parses a comparison or logical expression whose operator is current.
    fn parse_infix(&mut self, left: Expression) -> ParseResult<Expression> {
        let kind = self.current.token.kind;
        let Some(operator) = Operator::from_kind(kind) else {
            return Err(ParseError::unexpected_token(
                self.current.token.literal.clone(),
                self.current.position,
            ));
        };

        if operator.is_logical() {
            if !(left.is_infix() || left.is_str_literal()) {
                return Err(ParseError::InvalidLogicalOperand {
                    found: left.kind_name().to_string(),
                });
            }
        } else if !left.is_str_literal() {
            return Err(ParseError::InvalidComparisonOperand {
                found: left.kind_name().to_string(),
            });
        }

        self.advance();
        let right = self.parse_expression(kind.precedence())?;
        Ok(Expression::infix(operator, left, right))
    }

    /// Joins the current bare word onto a preceding string literal.
    fn parse_concat(&mut self, left: Expression) -> ParseResult<Expression> {
        match left {
            Expression::Literal(Value::String(text)) => Ok(Expression::string(format!(
                "{text} {}",
                self.current.token.literal
            ))),
            other => Err(ParseError::InvalidConcat {
                found: other.kind_name().to_string(),
            }),
        }
    }

    /// Parses `( expression )`.
    fn parse_grouped(&mut self) -> ParseResult<Expression> {
        // Skip the (
        self.advance();

        let expression = self.parse_expression(Precedence::Lowest)?;
        if self.peek.token.kind != TokenKind::RParen {
            return Err(ParseError::UnclosedGroup {
                position: self.peek.position,
            });
        }

        // Skip the )
        self.advance();
        Ok(expression)
    }
}

fn eof_at(position: usize) -> PositionedToken {
    PositionedToken {
        token: Token::eof(),
        position,
    }
}
