//! Query language for Taskforge task lists.
//!
//! A query is lexed, parsed into an [`Ast`] and then lowered by an
//! [`Evaluator`] into a filter for one storage backend.
//!
//! # Syntax
//!
//! - Bare words search task titles, bodies and notes: `take out the trash`
//! - Comparisons name a field: `priority > 5`, `title ~ milk`
//! - `and` / `or` combine expressions, left to right: `a = 1 and b = 2`
//! - Parentheses group: `(priority > 5 or context = work) and milk`
//! - Quotes keep spaces and keywords: `title = 'this and that'`
//! - A leading `-` escapes one keyword: `milk -and cookies`
//! - `^`, `^=` and `^^` are shell-friendly spellings of `~`, `!=` and `!~`
//!
//! # Example
//!
//! ```
//! use taskforge_ql::{Evaluator, Parser, SqlEvaluator};
//!
//! let ast = Parser::new("priority > 5 and title ~ 'take out the trash'")
//!     .parse()
//!     .unwrap();
//! assert_eq!(
//!     ast.to_string(),
//!     "((priority > 5) and (title ~ 'take out the trash'))"
//! );
//!
//! let filter = SqlEvaluator.evaluate_ast(&ast).unwrap();
//! assert_eq!(filter.params.len(), 2);
//! ```

pub mod ast;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{parse_date, Ast, Expression, Operator, Value, DATE_FORMAT};
pub use error::{EvalError, EvalResult, ParseError, ParseResult, QueryError};
pub use eval::{DocumentEvaluator, Evaluator, Field, FieldKind, SqlEvaluator, SqlFilter};
pub use lexer::{Lexer, PositionedToken};
pub use parser::Parser;
pub use token::{Precedence, Token, TokenKind};
