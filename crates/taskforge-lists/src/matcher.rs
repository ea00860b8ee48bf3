//! In-process interpreter for document filters.
//!
//! Supports the subset of the MongoDB query vocabulary that
//! [`DocumentEvaluator`](taskforge_ql::DocumentEvaluator) emits:
//!
//! - `$and`, `$or` at the top level of a filter
//! - `$eq`, `$ne`, `$nin`, `$lt`, `$lte`, `$gt`, `$gte`
//! - `$regex` with `$options` (only `i` is honoured)
//! - `$not` around an operator document
//! - a bare value, which means `$eq`
//!
//! Field paths are dotted and step through arrays, so `notes.body` reaches
//! the body of every note. A field whose value is an array matches if any
//! element does. `null` equals both a stored `null` and a missing field.
//! Ordering comparisons only hold between two numbers or two strings.

use std::cmp::Ordering;

use regex::RegexBuilder;
use serde_json::{Map, Value as Json};

use crate::error::{ListError, Result};

/// Returns true if `document` satisfies `filter`.
///
/// # Errors
///
/// Returns `ListError::UnsupportedFilter` for malformed filters or unknown
/// operators.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use taskforge_lists::matcher::matches;
///
/// let task = json!({ "title": "take out the trash", "priority": 6.0 });
/// let filter = json!({ "$and": [
///     { "priority": { "$gt": 5.0 } },
///     { "title": { "$regex": "TRASH", "$options": "i" } },
/// ]});
/// assert!(matches(&filter, &task)?);
/// # Ok::<(), taskforge_lists::ListError>(())
/// ```
pub fn matches(filter: &Json, document: &Json) -> Result<bool> {
    let Json::Object(clauses) = filter else {
        return Err(unsupported(format!("filter must be an object, got {filter}")));
    };

    for (key, condition) in clauses {
        let matched = match key.as_str() {
            "$and" => all(condition, document)?,
            "$or" => any(condition, document)?,
            op if op.starts_with('$') => return Err(unsupported(op)),
            path => matches_condition(&resolve(document, path), condition)?,
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn unsupported(what: impl Into<String>) -> ListError {
    ListError::UnsupportedFilter(what.into())
}

fn branches(condition: &Json) -> Result<&Vec<Json>> {
    condition
        .as_array()
        .ok_or_else(|| unsupported(format!("$and/$or expects an array, got {condition}")))
}

fn all(condition: &Json, document: &Json) -> Result<bool> {
    for branch in branches(condition)? {
        if !matches(branch, document)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn any(condition: &Json, document: &Json) -> Result<bool> {
    for branch in branches(condition)? {
        if matches(branch, document)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Collects every value reachable by a dotted path, flattening arrays.
fn resolve<'a>(document: &'a Json, path: &str) -> Vec<&'a Json> {
    let mut current = vec![document];
    for segment in path.split('.') {
        current = current
            .into_iter()
            .flat_map(|value| match value {
                Json::Array(items) => items
                    .iter()
                    .filter_map(|item| item.get(segment))
                    .collect::<Vec<_>>(),
                other => other.get(segment).into_iter().collect(),
            })
            .collect();
    }

    current
        .into_iter()
        .flat_map(|value| match value {
            Json::Array(items) => items.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .collect()
}

/// Returns true if `condition` is an operator document like `{"$gt": 1}`.
fn is_operator_document(condition: &Json) -> Option<&Map<String, Json>> {
    condition
        .as_object()
        .filter(|map| !map.is_empty() && map.keys().all(|key| key.starts_with('$')))
}

fn matches_condition(values: &[&Json], condition: &Json) -> Result<bool> {
    let Some(operators) = is_operator_document(condition) else {
        return Ok(equals_any(values, condition));
    };

    for (op, operand) in operators {
        let matched = match op.as_str() {
            "$eq" => equals_any(values, operand),
            "$ne" => !equals_any(values, operand),
            "$nin" => {
                let excluded = operand
                    .as_array()
                    .ok_or_else(|| unsupported(format!("$nin expects an array, got {operand}")))?;
                !excluded.iter().any(|item| equals_any(values, item))
            }
            "$lt" => compares(values, operand, Ordering::is_lt),
            "$lte" => compares(values, operand, Ordering::is_le),
            "$gt" => compares(values, operand, Ordering::is_gt),
            "$gte" => compares(values, operand, Ordering::is_ge),
            "$regex" => regex_matches(values, operand, operators.get("$options"))?,
            // Read alongside $regex
            "$options" => true,
            "$not" => {
                if is_operator_document(operand).is_none() {
                    return Err(unsupported(format!("$not expects operators, got {operand}")));
                }
                !matches_condition(values, operand)?
            }
            other => return Err(unsupported(other)),
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn json_eq(a: &Json, b: &Json) -> bool {
    match (a, b) {
        (Json::Number(x), Json::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn equals_any(values: &[&Json], target: &Json) -> bool {
    if target.is_null() && values.is_empty() {
        return true;
    }
    values.iter().any(|value| json_eq(value, target))
}

fn compare(a: &Json, b: &Json) -> Option<Ordering> {
    match (a, b) {
        (Json::Number(x), Json::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Json::String(x), Json::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn compares(values: &[&Json], operand: &Json, accept: fn(Ordering) -> bool) -> bool {
    values
        .iter()
        .any(|value| compare(value, operand).is_some_and(accept))
}

fn regex_matches(values: &[&Json], pattern: &Json, options: Option<&Json>) -> Result<bool> {
    let pattern = pattern
        .as_str()
        .ok_or_else(|| unsupported(format!("$regex expects a string, got {pattern}")))?;
    let case_insensitive = options
        .and_then(Json::as_str)
        .is_some_and(|opts| opts.contains('i'));

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| unsupported(format!("invalid $regex: {e}")))?;

    Ok(values
        .iter()
        .filter_map(|value| value.as_str())
        .any(|text| regex.is_match(text)))
}
