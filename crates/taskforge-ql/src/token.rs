//! Tokens and lexeme classification for the query language.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Matches literals shaped like `2018-01-01`, optionally followed by a time
/// and an AM/PM marker. Only the prefix has to match.
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}( [0-9]{2}:[0-9]{2}(:[0-9]{2})?)? ?(AM|PM|am|pm)?")
        .expect("date pattern is valid")
});

/// Matches literals with a leading digit.
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+").expect("number pattern is valid"));

/// The lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ==================== Comparison ====================
    /// `=`
    Eq,
    /// `!=` or `^=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `~` or `^`
    Like,
    /// `!~` or `^^`
    NotLike,

    // ==================== Logical ====================
    /// `and` / `AND`
    And,
    /// `or` / `OR`
    Or,

    // ==================== Grouping ====================
    /// `(`
    LParen,
    /// `)`
    RParen,

    // ==================== Literals ====================
    /// Free-form text.
    String,
    /// Anything with a leading digit.
    Number,
    /// `YYYY-MM-DD` with an optional time.
    Date,
    /// `true` / `false` in either case.
    Boolean,

    // ==================== Sentinels ====================
    /// End of input.
    Eof,
    /// A lexical anomaly; the literal carries the diagnostic.
    Unexpected,
}

/// Operator precedence tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Root and grouped expressions.
    Lowest,
    /// Adjacent bare words being joined into one string.
    String,
    /// `and` / `or`.
    AndOr,
    /// Relational and pattern operators.
    Comparison,
}

impl TokenKind {
    /// Returns the binding power of this kind when it appears in infix position.
    pub fn precedence(self) -> Precedence {
        match self {
            TokenKind::Eq
            | TokenKind::Ne
            | TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Gt
            | TokenKind::Ge
            | TokenKind::Like
            | TokenKind::NotLike => Precedence::Comparison,
            TokenKind::And | TokenKind::Or => Precedence::AndOr,
            TokenKind::String => Precedence::String,
            TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::Number
            | TokenKind::Date
            | TokenKind::Boolean
            | TokenKind::Eof
            | TokenKind::Unexpected => Precedence::Lowest,
        }
    }

    /// Returns true for the value-carrying kinds.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::String | TokenKind::Number | TokenKind::Date | TokenKind::Boolean
        )
    }

    /// Returns the upper-case name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Eq => "EQ",
            TokenKind::Ne => "NE",
            TokenKind::Lt => "LT",
            TokenKind::Le => "LTE",
            TokenKind::Gt => "GT",
            TokenKind::Ge => "GTE",
            TokenKind::Like => "LIKE",
            TokenKind::NotLike => "NLIKE",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::String => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Date => "DATE",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Eof => "EOF",
            TokenKind::Unexpected => "UNEXPECTED",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Looks up an exact keyword or operator spelling.
fn keyword(literal: &str) -> Option<TokenKind> {
    let kind = match literal {
        "or" | "OR" => TokenKind::Or,
        "and" | "AND" => TokenKind::And,
        "false" | "False" | "true" | "True" => TokenKind::Boolean,
        ">" => TokenKind::Gt,
        "<" => TokenKind::Lt,
        ">=" => TokenKind::Ge,
        "<=" => TokenKind::Le,
        "=" => TokenKind::Eq,
        "!=" | "^=" => TokenKind::Ne,
        "^" | "~" => TokenKind::Like,
        "^^" | "!~" => TokenKind::NotLike,
        "(" => TokenKind::LParen,
        ")" => TokenKind::RParen,
        _ => return None,
    };
    Some(kind)
}

/// Classifies text that can only be a value.
fn value_kind(literal: &str) -> TokenKind {
    if DATE_PATTERN.is_match(literal) {
        TokenKind::Date
    } else if NUMBER_PATTERN.is_match(literal) {
        TokenKind::Number
    } else {
        TokenKind::String
    }
}

/// A lexical token: the raw literal and its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The text this token was built from.
    pub literal: String,
    /// The classified kind.
    pub kind: TokenKind,
}

impl Token {
    /// Builds a token, inferring its kind from the literal.
    ///
    /// The keyword table wins, then the date pattern, then the number
    /// pattern; everything else is a string.
    ///
    /// # Example
    ///
    /// ```
    /// use taskforge_ql::{Token, TokenKind};
    ///
    /// assert_eq!(Token::new("AND").kind, TokenKind::And);
    /// assert_eq!(Token::new("2018-01-01").kind, TokenKind::Date);
    /// assert_eq!(Token::new("milk").kind, TokenKind::String);
    /// ```
    pub fn new(literal: impl Into<String>) -> Self {
        let literal = literal.into();
        let kind = keyword(&literal).unwrap_or_else(|| value_kind(&literal));
        Self { literal, kind }
    }

    /// Builds a token with an explicit kind.
    pub fn with_kind(literal: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            literal: literal.into(),
            kind,
        }
    }

    /// Builds a token from the contents of a quoted string.
    ///
    /// Quoted text never becomes an operator or boolean, but it can still be
    /// a date or a number.
    pub fn quoted(literal: impl Into<String>) -> Self {
        let literal = literal.into();
        let kind = value_kind(&literal);
        Self { literal, kind }
    }

    /// The end-of-input sentinel.
    pub fn eof() -> Self {
        Self::with_kind("EOF", TokenKind::Eof)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}, {})", self.kind, self.literal)
    }
}
