//! Lowering to a document-store filter.

use serde_json::{json, Value as Json};

use super::{Evaluator, Predicate, COMPLETED_DATE, FREE_TEXT_FIELDS};
use crate::ast::{Expression, Operator, Value, DATE_FORMAT};
use crate::error::{EvalError, EvalResult};

/// Dotted path to note bodies inside a task document.
const NOTE_BODY: &str = "notes.body";

/// Converts a literal to the JSON shape tasks are stored with.
///
/// Dates are stored as text in [`DATE_FORMAT`], which sorts chronologically.
fn to_json(value: &Value) -> Json {
    match value {
        Value::String(s) => Json::String(s.clone()),
        Value::Number(n) => json!(n),
        Value::Boolean(b) => Json::Bool(*b),
        Value::Date(d) => Json::String(d.format(DATE_FORMAT).to_string()),
    }
}

/// A substring match on `text` that folds ASCII letters only, matching SQL
/// `LIKE`. Other characters must match exactly.
fn contains(text: &str) -> Json {
    let mut pattern = String::with_capacity(text.len() * 4);
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            pattern.push('[');
            pattern.push(c.to_ascii_lowercase());
            pattern.push(c.to_ascii_uppercase());
            pattern.push(']');
        } else {
            let mut buf = [0; 4];
            pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }
    json!({ "$regex": pattern })
}

/// Lowers queries for a store of task documents with embedded notes.
///
/// Filters use the `$and`/`$or`/`$regex` operator vocabulary shared by
/// MongoDB-style stores.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use taskforge_ql::{DocumentEvaluator, Evaluator, Parser};
///
/// let ast = Parser::new("priority >= 2").parse().unwrap();
/// let filter = DocumentEvaluator.evaluate_ast(&ast).unwrap();
/// assert_eq!(filter, json!({ "priority": { "$gte": 2.0 } }));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentEvaluator;

impl DocumentEvaluator {
    fn free_text(&self, text: &str) -> Json {
        let mut terms: Vec<Json> = FREE_TEXT_FIELDS
            .iter()
            .map(|field| json!({ *field: contains(text) }))
            .collect();
        terms.push(json!({ NOTE_BODY: contains(text) }));
        json!({ "$or": terms })
    }

    fn logical(&self, operator: Operator, left: &Expression, right: &Expression) -> EvalResult<Json> {
        let key = match operator {
            Operator::And => "$and",
            _ => "$or",
        };
        Ok(json!({ key: [self.evaluate(left)?, self.evaluate(right)?] }))
    }

    fn predicate(&self, predicate: Predicate<'_>) -> Json {
        match predicate {
            Predicate::Completed(true) => json!({ COMPLETED_DATE: { "$ne": null } }),
            Predicate::Completed(false) => json!({ COMPLETED_DATE: null }),
            Predicate::Pattern {
                field,
                text,
                negated: false,
            } => json!({ field.column: contains(text) }),
            // Missing values never match, as in SQL
            Predicate::Pattern {
                field,
                text,
                negated: true,
            } => json!({ field.column: { "$not": contains(text), "$ne": null } }),
            Predicate::Compare {
                field,
                operator: Operator::Ne,
                value,
            } => json!({ field.column: { "$nin": [to_json(value), null] } }),
            Predicate::Compare {
                field,
                operator,
                value,
            } => {
                let key = match operator {
                    Operator::Lt => "$lt",
                    Operator::Le => "$lte",
                    Operator::Gt => "$gt",
                    Operator::Ge => "$gte",
                    _ => "$eq",
                };
                json!({ field.column: { key: to_json(value) } })
            }
        }
    }
}

impl Evaluator for DocumentEvaluator {
    type Filter = Json;

    fn evaluate(&self, expression: &Expression) -> EvalResult<Json> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    const MILK: &str = "[mM][iI][lL][kK]";

    fn lower(query: &str) -> Json {
        let ast = Parser::new(query).parse().unwrap();
        DocumentEvaluator.evaluate_ast(&ast).unwrap()
    }

    #[test]
    fn test_free_text() {
        assert_eq!(
            lower("milk"),
            json!({ "$or": [
                { "title": { "$regex": MILK } },
                { "body": { "$regex": MILK } },
                { "notes.body": { "$regex": MILK } },
            ]})
        );
    }

    #[test]
    fn test_like_escapes_regex() {
        assert_eq!(
            lower("title ~ 'a.b*'"),
            json!({ "title": { "$regex": r"[aA]\.[bB]\*" } })
        );
    }

    #[test]
    fn test_like_folds_ascii_only() {
        assert_eq!(
            lower("title ~ 'émile 2'"),
            json!({ "title": { "$regex": "é[mM][iI][lL][eE] 2" } })
        );
    }

    #[test]
    fn test_not_like_excludes_missing() {
        assert_eq!(
            lower("body !~ milk"),
            json!({ "body": {
                "$not": { "$regex": MILK },
                "$ne": null,
            }})
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(lower("title = milk"), json!({ "title": { "$eq": "milk" } }));
        assert_eq!(lower("priority < 2"), json!({ "priority": { "$lt": 2.0 } }));
        assert_eq!(lower("priority <= 2"), json!({ "priority": { "$lte": 2.0 } }));
        assert_eq!(lower("priority > 2"), json!({ "priority": { "$gt": 2.0 } }));
        assert_eq!(
            lower("title != milk"),
            json!({ "title": { "$nin": ["milk", null] } })
        );
    }

    #[test]
    fn test_date_stored_as_text() {
        assert_eq!(
            lower("created_date > '2018-01-01 01:01 PM'"),
            json!({ "created_date": { "$gt": "2018-01-01 13:01:00" } })
        );
    }

    #[test]
    fn test_completed() {
        assert_eq!(
            lower("completed = true"),
            json!({ "completed_date": { "$ne": null } })
        );
        assert_eq!(lower("completed = false"), json!({ "completed_date": null }));
        assert_eq!(lower("completed != false"), json!({ "completed_date": { "$ne": null } }));
    }

    #[test]
    fn test_logical_nesting() {
        assert_eq!(
            lower("priority > 5 and (title ~ milk or context = work)"),
            json!({ "$and": [
                { "priority": { "$gt": 5.0 } },
                { "$or": [
                    { "title": { "$regex": MILK } },
                    { "context": { "$eq": "work" } },
                ]},
            ]})
        );
    }

    #[test]
    fn test_type_mismatch() {
        let ast = Parser::new("priority = high").parse().unwrap();
        assert!(matches!(
            DocumentEvaluator.evaluate_ast(&ast),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_bare_boolean_unsupported() {
        let ast = Parser::new("true").parse().unwrap();
        assert!(matches!(
            DocumentEvaluator.evaluate_ast(&ast),
            Err(EvalError::Unsupported { .. })
        ));
    }
}
