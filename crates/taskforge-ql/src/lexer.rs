//! Lexer (tokenizer) for query strings.

use std::iter::Peekable;
use std::str::Chars;

use super::token::{Token, TokenKind};

/// Diagnostic carried by the token emitted for an unterminated quote.
pub const UNTERMINATED_QUOTE: &str = "unexpected eof: no closing quote";

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: Token,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// Pull-based scanner over a query string.
///
/// Each call to [`Lexer::next_token`] inspects the input one character at a
/// time and returns the next token, or `None` once the input is exhausted.
/// A lexer is single-use; build a new one to scan the same text again.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Returns the current byte position in the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Peeks at the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Consumes and returns the next character, updating position.
    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    /// Consumes the next character if it equals `expected`.
    fn next_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next_char();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next_char();
        }
    }

    /// Reads characters while `valid` holds.
    fn read_while(&mut self, valid: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !valid(c) {
                break;
            }
            text.push(c);
            self.next_char();
        }
        text
    }

    /// Reads an unquoted word: a letter, then letters or underscores.
    fn read_word(&mut self) -> String {
        self.read_while(is_word_char)
    }

    /// Reads digits with at most one decimal point.
    fn read_number(&mut self) -> String {
        let mut number = String::new();
        let mut seen_point = false;
        while let Some(c) = self.peek() {
            if c == '.' && !seen_point {
                seen_point = true;
            } else if !c.is_ascii_digit() {
                break;
            }
            number.push(c);
            self.next_char();
        }
        number
    }

    /// Reads a quoted string whose opening quote has been consumed.
    ///
    /// Returns `None` when the input ends before the closing quote.
    fn read_quoted(&mut self, quote: char) -> Option<String> {
        let mut text = String::new();
        loop {
            match self.next_char()? {
                c if c == quote => return Some(text),
                c => text.push(c),
            }
        }
    }

    /// Returns the next token with its position, or None if at end of input.
    pub fn next_token(&mut self) -> Option<PositionedToken> {
        self.skip_whitespace();

        let c = self.peek()?;
        let position = self.position;

        let token = match c {
            // Shell-friendly spellings
            '^' => {
                self.next_char();
                if self.next_if('=') {
                    Token::new("!=")
                } else if self.next_if('^') {
                    Token::new("!~")
                } else {
                    Token::new("~")
                }
            }

            '!' => {
                self.next_char();
                let mut literal = String::from('!');
                if let Some(next) = self.next_char() {
                    literal.push(next);
                }
                Token::new(literal)
            }

            '<' | '>' => {
                self.next_char();
                let mut literal = String::from(c);
                if self.next_if('=') {
                    literal.push('=');
                }
                Token::new(literal)
            }

            '"' | '\'' => {
                self.next_char();
                match self.read_quoted(c) {
                    Some(text) => Token::quoted(text),
                    None => Token::with_kind(UNTERMINATED_QUOTE, TokenKind::Unexpected),
                }
            }

            // Escaped word, always a string
            '-' => {
                self.next_char();
                match self.peek() {
                    Some(next) if next.is_alphabetic() => {
                        Token::with_kind(self.read_word(), TokenKind::String)
                    }
                    _ => Token::new("-"),
                }
            }

            _ if c.is_ascii_digit() => Token::new(self.read_number()),

            _ if c.is_alphabetic() => Token::new(self.read_word()),

            _ => {
                self.next_char();
                Token::new(c.to_string())
            }
        };

        Some(PositionedToken { token, position })
    }

    /// Collects all remaining tokens, without positions.
    pub fn tokenize(self) -> Vec<Token> {
        self.map(|pt| pt.token).collect()
    }
}

/// Returns true for characters that continue a bare word.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

impl Iterator for Lexer<'_> {
    type Item = PositionedToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
