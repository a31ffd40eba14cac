//! Classification of raw filter objects into typed expressions.
//!
//! Each object level of a filter tree is classified once; the compilers then
//! match exhaustively on [`FilterExpr`] instead of re-inspecting keys.

use crate::{error::FilterError, operator::SetOperator};
use serde_json::{Map, Value};
use tracing::trace;

/// Key that introduces a negation node.
pub const NOT_KEY: &str = "not";

/// One entry of a filter object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterExpr<'a> {
    /// An object with no keys.
    Empty,
    /// `and` / `or` over an ordered list of child filters.
    Set {
        operator: SetOperator,
        children: &'a [Value],
    },
    /// `not` over a single child filter object.
    Not(&'a Map<String, Value>),
    /// A field key and its condition value.
    Leaf { field: &'a str, condition: &'a Value },
}

impl<'a> FilterExpr<'a> {
    /// Classifies a single `key: value` entry of a filter object.
    pub fn classify(key: &'a str, value: &'a Value) -> Result<Self, FilterError> {
        if let Some(operator) = SetOperator::parse(key) {
            let children = value.as_array().map(Vec::as_slice).ok_or_else(|| {
                FilterError::InvalidFilterShape(format!(
                    "'{key}' expects an array of filters, got {value}"
                ))
            })?;
            return Ok(FilterExpr::Set {
                operator,
                children,
            });
        }

        if key == NOT_KEY {
            let child = value.as_object().ok_or_else(|| {
                FilterError::InvalidFilterShape(format!(
                    "'not' expects a filter object, got {value}"
                ))
            })?;
            return Ok(FilterExpr::Not(child));
        }

        Ok(FilterExpr::Leaf {
            field: key,
            condition: value,
        })
    }
}

/// Returns the filter object behind `filter`, rejecting non-object nodes.
pub fn as_filter_object(filter: &Value) -> Result<&Map<String, Value>, FilterError> {
    filter.as_object().ok_or_else(|| {
        FilterError::InvalidFilterShape(format!("expected a filter object, got {filter}"))
    })
}

/// Classifies every entry of a filter object, in key order.
///
/// An object without keys yields a single [`FilterExpr::Empty`].
pub fn classify_object(object: &Map<String, Value>) -> Result<Vec<FilterExpr<'_>>, FilterError> {
    if object.is_empty() {
        trace!("classified empty filter object");
        return Ok(vec![FilterExpr::Empty]);
    }

    let exprs = object
        .iter()
        .map(|(key, value)| FilterExpr::classify(key, value))
        .collect::<Result<Vec<_>, _>>()?;
    trace!(entries = exprs.len(), "classified filter object");
    Ok(exprs)
}

/// Classifies a filter node given as a raw value.
pub fn classify(filter: &Value) -> Result<Vec<FilterExpr<'_>>, FilterError> {
    classify_object(as_filter_object(filter)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_each_shape() {
        let filter = json!({
            " AND ": [{ "score": { "gt": 1 } }],
            "not": { "isBot": { "eq": true } },
            "score": { "lt": 5 }
        });
        let exprs = classify(&filter).unwrap();

        assert_eq!(exprs.len(), 3);
        assert!(matches!(
            exprs[0],
            FilterExpr::Set {
                operator: SetOperator::And,
                children
            } if children.len() == 1
        ));
        assert!(matches!(exprs[1], FilterExpr::Not(child) if child.contains_key("isBot")));
        assert!(matches!(
            exprs[2],
            FilterExpr::Leaf { field: "score", .. }
        ));
    }

    #[test]
    fn test_classify_empty_object() {
        assert_eq!(classify(&json!({})).unwrap(), vec![FilterExpr::Empty]);
    }

    #[test]
    fn test_not_key_is_case_sensitive() {
        let filter = json!({ "NOT": { "eq": 1 } });
        let exprs = classify(&filter).unwrap();
        assert!(matches!(exprs[0], FilterExpr::Leaf { field: "NOT", .. }));
    }

    #[test]
    fn test_rejects_malformed_nodes() {
        assert!(matches!(
            classify(&json!({ "or": { "score": { "eq": 1 } } })),
            Err(FilterError::InvalidFilterShape(_))
        ));
        assert!(matches!(
            classify(&json!({ "not": [] })),
            Err(FilterError::InvalidFilterShape(_))
        ));
        assert!(matches!(
            classify(&json!([1, 2])),
            Err(FilterError::InvalidFilterShape(_))
        ));
    }
}
