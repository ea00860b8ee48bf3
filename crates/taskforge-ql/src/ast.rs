//! Abstract Syntax Tree (AST) for queries.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use super::error::{ParseError, ParseResult};
use super::lexer::is_word_char;
use super::parser::Parser;
use super::token::{Token, TokenKind};

/// Format used whenever a date value is rendered as text.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted date-time layouts, tried in order.
const DATE_TIME_FORMATS: &[&str] = &[
    // 12 hour clock
    "%Y-%m-%d %I:%M %p",
    "%Y-%m-%d %I:%M%p",
    "%Y-%m-%d %I:%M:%S %p",
    "%Y-%m-%d %I:%M:%S%p",
    // 24 hour clock
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Day-only layout, read as midnight.
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parses a date literal using the first layout that fits.
///
/// # Example
///
/// ```
/// use taskforge_ql::parse_date;
///
/// let date = parse_date("2018-01-01 01:01 PM").unwrap();
/// assert_eq!(date.to_string(), "2018-01-01 13:01:00");
/// ```
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, DAY_FORMAT)
                .ok()
                .and_then(|day| day.and_hms_opt(0, 0, 0))
        })
}

/// A typed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text, also used for field names.
    String(String),
    /// All numbers are floating point.
    Number(f64),
    /// `true` or `false`.
    Boolean(bool),
    /// A local date and time.
    Date(NaiveDateTime),
}

impl Value {
    /// Converts a literal token into its typed value.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidLiteral` if a number or date literal cannot
    /// be converted, if a number overflows to infinity, or if the token is not
    /// a literal kind.
    pub fn from_token(token: &Token) -> ParseResult<Self> {
        let invalid = || ParseError::invalid_literal(token.kind, &token.literal);
        match token.kind {
            TokenKind::String => Ok(Value::String(token.literal.clone())),
            TokenKind::Number => token
                .literal
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Value::Number)
                .ok_or_else(invalid),
            TokenKind::Boolean => Ok(Value::Boolean(token.literal.eq_ignore_ascii_case("true"))),
            TokenKind::Date => parse_date(&token.literal)
                .map(Value::Date)
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }

    /// Returns the kind name of this value, matching [`TokenKind::name`].
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::String(_) => TokenKind::String.name(),
            Value::Number(_) => TokenKind::Number.name(),
            Value::Boolean(_) => TokenKind::Boolean.name(),
            Value::Date(_) => TokenKind::Date.name(),
        }
    }

    /// Renders the value as plain text, without quoting.
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Quotes a string so the lexer reads it back verbatim.
///
/// Text holding both quote characters is written as adjacent quoted
/// segments split at spaces, which the parser joins back together.
fn quote(text: &str) -> String {
    if text.contains('\'') && text.contains('"') {
        if let Some(segments) = quote_segments(text) {
            return segments;
        }
    }
    quote_plain(text)
}

fn quote_plain(text: &str) -> String {
    if text.contains('\'') {
        format!("\"{text}\"")
    } else {
        format!("'{text}'")
    }
}

/// Returns true if `segment` can be quoted on its own and read back as a
/// string.
fn quotes_cleanly(segment: &str) -> bool {
    !(segment.contains('\'') && segment.contains('"'))
        && Token::quoted(segment).kind == TokenKind::String
}

/// Splits `text` at spaces into segments that each quote cleanly, or
/// returns `None` if no such split exists.
fn quote_segments(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split(' ').collect();

    // starts[end] is where the last segment of a clean split of words[..end] begins
    let mut starts: Vec<Option<usize>> = vec![None; words.len() + 1];
    starts[0] = Some(0);
    for end in 1..=words.len() {
        starts[end] = (0..end).find(|&start| {
            starts[start].is_some() && quotes_cleanly(&words[start..end].join(" "))
        });
    }

    let mut segments = Vec::new();
    let mut end = words.len();
    while end > 0 {
        let start = starts[end]?;
        segments.push(quote_plain(&words[start..end].join(" ")));
        end = start;
    }
    segments.reverse();
    Some(segments.join(" "))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(&quote(s)),
            Value::Number(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Date(d) => f.write_str(&quote(&d.format(DATE_FORMAT).to_string())),
        }
    }
}

/// An infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Substring match.
    Like,
    /// Negated substring match.
    NotLike,
    And,
    Or,
}

impl Operator {
    /// Maps an operator token kind to its operator.
    pub fn from_kind(kind: TokenKind) -> Option<Self> {
        let operator = match kind {
            TokenKind::Eq => Operator::Eq,
            TokenKind::Ne => Operator::Ne,
            TokenKind::Lt => Operator::Lt,
            TokenKind::Le => Operator::Le,
            TokenKind::Gt => Operator::Gt,
            TokenKind::Ge => Operator::Ge,
            TokenKind::Like => Operator::Like,
            TokenKind::NotLike => Operator::NotLike,
            TokenKind::And => Operator::And,
            TokenKind::Or => Operator::Or,
            _ => return None,
        };
        Some(operator)
    }

    /// The token kind this operator is spelled with.
    pub fn kind(self) -> TokenKind {
        match self {
            Operator::Eq => TokenKind::Eq,
            Operator::Ne => TokenKind::Ne,
            Operator::Lt => TokenKind::Lt,
            Operator::Le => TokenKind::Le,
            Operator::Gt => TokenKind::Gt,
            Operator::Ge => TokenKind::Ge,
            Operator::Like => TokenKind::Like,
            Operator::NotLike => TokenKind::NotLike,
            Operator::And => TokenKind::And,
            Operator::Or => TokenKind::Or,
        }
    }

    /// Canonical spelling, as used by [`Ast`]'s string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Like => "~",
            Operator::NotLike => "!~",
            Operator::And => "and",
            Operator::Or => "or",
        }
    }

    /// Returns true for `and` and `or`.
    pub fn is_logical(self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the query tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A typed value.
    Literal(Value),

    /// An operator applied to two sub-expressions.
    Infix {
        operator: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    /// Creates a literal expression.
    pub fn literal(value: Value) -> Self {
        Expression::Literal(value)
    }

    /// Creates a string literal expression.
    pub fn string(value: impl Into<String>) -> Self {
        Expression::Literal(Value::String(value.into()))
    }

    /// Creates an infix expression.
    ///
    /// # Example
    ///
    /// ```
    /// use taskforge_ql::{Expression, Operator, Value};
    ///
    /// let expr = Expression::infix(
    ///     Operator::Gt,
    ///     Expression::string("priority"),
    ///     Expression::literal(Value::Number(5.0)),
    /// );
    /// assert!(expr.is_comparison_infix());
    /// assert_eq!(expr.to_string(), "(priority > 5)");
    /// ```
    pub fn infix(operator: Operator, left: Expression, right: Expression) -> Self {
        Expression::Infix {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a logical AND expression.
    pub fn and(left: Expression, right: Expression) -> Self {
        Self::infix(Operator::And, left, right)
    }

    /// Creates a logical OR expression.
    pub fn or(left: Expression, right: Expression) -> Self {
        Self::infix(Operator::Or, left, right)
    }

    pub fn is_infix(&self) -> bool {
        matches!(self, Expression::Infix { .. })
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Literal(_))
    }

    /// Returns the operator of an infix expression.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Expression::Infix { operator, .. } => Some(*operator),
            Expression::Literal(_) => None,
        }
    }

    /// Returns the value of a literal expression.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Expression::Literal(value) => Some(value),
            Expression::Infix { .. } => None,
        }
    }

    /// Returns the text of a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expression::Literal(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// An infix expression comparing a field to a value.
    pub fn is_comparison_infix(&self) -> bool {
        self.operator().is_some_and(|op| !op.is_logical())
    }

    /// An `and` or `or` expression.
    pub fn is_logical_infix(&self) -> bool {
        self.operator().is_some_and(Operator::is_logical)
    }

    pub fn is_and_infix(&self) -> bool {
        self.operator() == Some(Operator::And)
    }

    pub fn is_or_infix(&self) -> bool {
        self.operator() == Some(Operator::Or)
    }

    pub fn is_str_literal(&self) -> bool {
        matches!(self, Expression::Literal(Value::String(_)))
    }

    pub fn is_number_literal(&self) -> bool {
        matches!(self, Expression::Literal(Value::Number(_)))
    }

    pub fn is_boolean_literal(&self) -> bool {
        matches!(self, Expression::Literal(Value::Boolean(_)))
    }

    pub fn is_date_literal(&self) -> bool {
        matches!(self, Expression::Literal(Value::Date(_)))
    }

    /// Names the kind of this node for diagnostics: the literal kind, or the
    /// operator kind for infix nodes.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Literal(value) => value.kind_name(),
            Expression::Infix { operator, .. } => operator.kind().name(),
        }
    }
}

/// Returns true if `field` can be written without quotes and read back as
/// the same string literal.
fn is_bare_field(field: &str) -> bool {
    !field.is_empty()
        && field.split(' ').all(|word| {
            word.starts_with(char::is_alphabetic)
                && word.chars().all(is_word_char)
                && Token::new(word).kind == TokenKind::String
        })
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => write!(f, "{value}"),
            Expression::Infix {
                operator,
                left,
                right,
            } => match left.as_str() {
                // Field names print bare when they survive re-lexing.
                Some(field) if !operator.is_logical() && is_bare_field(field) => {
                    write!(f, "({field} {operator} {right})")
                }
                _ => write!(f, "({left} {operator} {right})"),
            },
        }
    }
}

/// A parsed query.
///
/// The string form of an `Ast` is canonical: parsing it again yields an
/// equal `Ast`.
///
/// # Example
///
/// ```
/// use taskforge_ql::Ast;
///
/// let ast: Ast = "priority > 5 and title ^ 'take out the trash'".parse().unwrap();
/// let text = ast.to_string();
/// assert_eq!(text, "((priority > 5) and (title ~ 'take out the trash'))");
/// assert_eq!(text.parse::<Ast>().unwrap(), ast);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    /// The root expression.
    pub expression: Expression,
}

impl Ast {
    /// Wraps a root expression.
    pub fn new(expression: Expression) -> Self {
        Self { expression }
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

impl FromStr for Ast {
    type Err = ParseError;

    fn from_str(query: &str) -> Result<Self, Self::Err> {
        Parser::new(query).parse()
    }
}
