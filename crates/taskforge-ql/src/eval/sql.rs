//! Lowering to a parameterized SQL predicate.

use uuid::Uuid;

use super::{Evaluator, Predicate, COMPLETED_DATE, FREE_TEXT_FIELDS};
use crate::ast::{Expression, Operator, Value};
use crate::error::{EvalError, EvalResult};

/// Escape clause appended to every `LIKE`.
const ESCAPE: &str = r"ESCAPE '\'";

/// A `WHERE` predicate and the values bound to its named parameters.
///
/// Parameter names include the leading `:` so they can be handed straight to
/// a SQLite driver. Values are never spliced into `clause`.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
    /// The predicate text.
    pub clause: String,
    /// Named parameters referenced by `clause`.
    pub params: Vec<(String, Value)>,
}

impl SqlFilter {
    fn new(clause: String) -> Self {
        Self {
            clause,
            params: Vec::new(),
        }
    }

    fn bind(mut self, name: String, value: Value) -> Self {
        self.params.push((name, value));
        self
    }
}

/// Returns a parameter name that is unique to one predicate leaf.
fn fresh_param() -> String {
    format!(":p_{}", Uuid::new_v4().simple())
}

/// Escapes `LIKE` wildcards and wraps the text for a substring match.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn sql_operator(operator: Operator) -> &'static str {
    match operator {
        Operator::Eq => "=",
        Operator::Ne => "!=",
        Operator::Lt => "<",
        Operator::Le => "<=",
        Operator::Gt => ">",
        Operator::Ge => ">=",
        Operator::Like => "LIKE",
        Operator::NotLike => "NOT LIKE",
        Operator::And => "AND",
        Operator::Or => "OR",
    }
}

/// Lowers queries for a relational store with `tasks` and `notes` tables.
///
/// # Example
///
/// ```
/// use taskforge_ql::{Evaluator, Parser, SqlEvaluator};
///
/// let ast = Parser::new("completed = false").parse().unwrap();
/// let filter = SqlEvaluator.evaluate_ast(&ast).unwrap();
/// assert_eq!(filter.clause, "completed_date IS NULL");
/// assert!(filter.params.is_empty());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlEvaluator;

impl SqlEvaluator {
    /// Substring search over the task text and its notes.
    fn free_text(&self, text: &str) -> SqlFilter {
        let param = fresh_param();
        let mut terms: Vec<String> = FREE_TEXT_FIELDS
            .iter()
            .map(|field| format!("{field} LIKE {param} {ESCAPE}"))
            .collect();
        terms.push(format!(
            "id IN (SELECT task_id FROM notes WHERE body LIKE {param} {ESCAPE})"
        ));

        SqlFilter::new(format!("({})", terms.join(" OR ")))
            .bind(param, Value::String(like_pattern(text)))
    }

    fn logical(&self, operator: Operator, left: &Expression, right: &Expression) -> EvalResult<SqlFilter> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        let mut filter = SqlFilter::new(format!(
            "({}) {} ({})",
            left.clause,
            sql_operator(operator),
            right.clause
        ));
        filter.params = left.params;
        filter.params.extend(right.params);
        Ok(filter)
    }

    fn predicate(&self, predicate: Predicate<'_>) -> SqlFilter {
        match predicate {
            Predicate::Completed(true) => SqlFilter::new(format!("{COMPLETED_DATE} IS NOT NULL")),
            Predicate::Completed(false) => SqlFilter::new(format!("{COMPLETED_DATE} IS NULL")),
            Predicate::Pattern {
                field,
                text,
                negated,
            } => {
                let param = fresh_param();
                let operator = if negated {
                    Operator::NotLike
                } else {
                    Operator::Like
                };
                SqlFilter::new(format!(
                    "({} {} {param} {ESCAPE})",
                    field.column,
                    sql_operator(operator)
                ))
                .bind(param, Value::String(like_pattern(text)))
            }
            Predicate::Compare {
                field,
                operator,
                value,
            } => {
                let param = fresh_param();
                SqlFilter::new(format!(
                    "({} {} {param})",
                    field.column,
                    sql_operator(operator)
                ))
                .bind(param, value.clone())
            }
        }
    }
}

impl Evaluator for SqlEvaluator {
    type Filter = SqlFilter;

    fn evaluate(&self, expression: &Expression) -> EvalResult<SqlFilter> {
        match expression {
            Expression::Literal(Value::String(text)) => Ok(self.free_text(text)),
            Expression::Literal(_) => Err(EvalError::unsupported(expression)),
            Expression::Infix {
                operator,
                left,
                right,
            } if operator.is_logical() => self.logical(*operator, left, right),
            Expression::Infix {
                operator,
                left,
                right,
            } => Ok(self.predicate(Predicate::classify(*operator, left, right)?)),
        }
    }
}
