//! Lowering parsed queries to backend-native filters.
//!
//! Each storage backend picks one [`Evaluator`]. Both evaluators walk the same
//! [`Expression`] tree and must select the same tasks for the same stored
//! data:
//!
//! - [`SqlEvaluator`] builds a parameterized `WHERE` predicate.
//! - [`DocumentEvaluator`] builds a nested filter document.

mod document;
mod sql;

pub use document::DocumentEvaluator;
pub use sql::{SqlEvaluator, SqlFilter};

use super::ast::{Ast, Expression, Operator, Value};
use super::error::{EvalError, EvalResult};

/// Field name that is boolean-shaped in queries but stored as an optional
/// completion timestamp.
pub const COMPLETED: &str = "completed";

/// Column holding the completion timestamp.
pub const COMPLETED_DATE: &str = "completed_date";

/// Fields searched by a bare string query.
pub const FREE_TEXT_FIELDS: &[&str] = &["title", "body"];

/// The stored type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
}

/// A query field resolved to its stored column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Column (or document key) name.
    pub column: &'static str,
    /// Stored type.
    pub kind: FieldKind,
}

impl Field {
    /// Resolves a field name as written in a query.
    ///
    /// # Errors
    ///
    /// Returns `EvalError::UnknownField` for names tasks do not have.
    pub fn resolve(name: &str) -> EvalResult<Self> {
        let (column, kind) = match name.to_lowercase().as_str() {
            "id" => ("id", FieldKind::Text),
            "title" => ("title", FieldKind::Text),
            "body" => ("body", FieldKind::Text),
            "context" => ("context", FieldKind::Text),
            "priority" => ("priority", FieldKind::Number),
            "created_date" => ("created_date", FieldKind::Date),
            COMPLETED | COMPLETED_DATE => (COMPLETED_DATE, FieldKind::Date),
            _ => return Err(EvalError::unknown_field(name)),
        };
        Ok(Self { column, kind })
    }

    /// Returns true if `value` can be stored in this field.
    fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self.kind, value),
            (FieldKind::Text, Value::String(_))
                | (FieldKind::Number, Value::Number(_))
                | (FieldKind::Date, Value::Date(_))
        )
    }
}

/// A comparison leaf, checked and ready to lower.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<'a> {
    /// `completed = true|false`, or `!=` with the sense flipped.
    Completed(bool),
    /// `field ~ value` or `field !~ value`.
    Pattern {
        field: Field,
        text: &'a str,
        negated: bool,
    },
    /// Any other comparison.
    Compare {
        field: Field,
        operator: Operator,
        value: &'a Value,
    },
}

impl<'a> Predicate<'a> {
    /// Checks a comparison's field and value and classifies it.
    ///
    /// # Errors
    ///
    /// Returns `EvalError::UnknownField` for unknown fields,
    /// `EvalError::TypeMismatch` when the value does not fit the field and
    /// `EvalError::Unsupported` when the right side is not a literal.
    pub fn classify(
        operator: Operator,
        left: &'a Expression,
        right: &'a Expression,
    ) -> EvalResult<Self> {
        let expression = || Expression::infix(operator, left.clone(), right.clone());
        let name = left.as_str().ok_or_else(|| EvalError::unsupported(expression()))?;
        let value = right.value().ok_or_else(|| EvalError::unsupported(expression()))?;
        let field = Field::resolve(name)?;

        let mismatch = || EvalError::TypeMismatch {
            field: name.to_string(),
            operator: operator.to_string(),
            found: value.kind_name().to_string(),
        };

        if let Value::Boolean(flag) = value {
            if field.column != COMPLETED_DATE {
                return Err(mismatch());
            }
            return match operator {
                Operator::Eq => Ok(Predicate::Completed(*flag)),
                Operator::Ne => Ok(Predicate::Completed(!*flag)),
                _ => Err(mismatch()),
            };
        }

        match operator {
            Operator::Like | Operator::NotLike => match value {
                Value::String(text) if field.kind == FieldKind::Text => Ok(Predicate::Pattern {
                    field,
                    text,
                    negated: operator == Operator::NotLike,
                }),
                _ => Err(mismatch()),
            },
            Operator::And | Operator::Or => Err(EvalError::unsupported(expression())),
            _ if field.accepts(value) => Ok(Predicate::Compare {
                field,
                operator,
                value,
            }),
            _ => Err(mismatch()),
        }
    }
}

/// Lowers expressions to a backend-native filter.
///
/// Implementations dispatch on the shape of the expression: bare string
/// literals search free text, logical infixes combine both sides, and
/// comparison infixes become field predicates.
pub trait Evaluator {
    /// The backend-native filter type.
    type Filter;

    /// Lowers one expression.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] for expressions with no filter equivalent.
    fn evaluate(&self, expression: &Expression) -> EvalResult<Self::Filter>;

    /// Lowers the root of an AST.
    fn evaluate_ast(&self, ast: &Ast) -> EvalResult<Self::Filter> {
        self.evaluate(&ast.expression)
    }
}
