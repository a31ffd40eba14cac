//! Compiles a single leaf condition against a resolved field.

use crate::{
    error::FilterError, operator::Operator, params::Bindings, resolver::ResolvedField,
};
use serde_json::Value;
use tracing::debug;

/// Compiles `condition` for `field`, binding its operands into `bindings`.
///
/// `condition` is either a single-key `{operator: operand}` object or, for
/// JSON document fields only, a bare array meaning `contains`. The returned
/// expression is always parenthesized.
pub fn compile_condition(
    field: &ResolvedField<'_>,
    condition: &Value,
    bindings: &mut Bindings,
) -> Result<String, FilterError> {
    let json = field.is_json();
    let (operator, operand) = split_condition(condition, json)?;

    let column = field.to_sql()?;
    let op = operator.to_sql(json);
    let base = field.param_base();

    let sql = match operator {
        Operator::Between | Operator::NotBetween => {
            let bounds = operand
                .as_array()
                .filter(|bounds| bounds.len() >= 2)
                .ok_or_else(|| {
                    FilterError::InvalidFilterShape(format!(
                        "'{operator}' expects two bounds, got {operand}"
                    ))
                })?;

            let first = bindings.bind(&base, bounds[0].clone());
            let second = bindings.bind(&base, bounds[1].clone());
            format!("({column} {op} :{first} and :{second})")
        }
        Operator::Contains | Operator::Overlap => {
            let names = bind_each(operator, operand, &base, bindings)?;
            format!("({column} {op} array[{names}])")
        }
        Operator::In | Operator::NotIn => {
            let names = bind_each(operator, operand, &base, bindings)?;
            format!("({column} {op} ({names}))")
        }
        Operator::Equal | Operator::NotEqual if !json && is_null_like(operand) => {
            let name = bindings.bind(&base, Value::Null);
            let op = if operator == Operator::Equal {
                "is"
            } else {
                "is not"
            };
            format!("({column} {op} :{name})")
        }
        _ if operator.is_pattern() => {
            let name = bindings.bind(&base, Value::String(format!("%{}%", text(operand))));
            format!("({column} {op} :{name})")
        }
        _ => {
            let name = bindings.bind(&base, operand.clone());
            format!("({column} {op} :{name})")
        }
    };

    debug!(field = %base, %operator, "compiled condition");
    Ok(sql)
}

fn split_condition(condition: &Value, json: bool) -> Result<(Operator, &Value), FilterError> {
    match condition {
        Value::Array(_) if json => Ok((Operator::Contains, condition)),
        Value::Object(map) if map.len() == 1 => {
            let (symbol, operand) = map
                .iter()
                .next()
                .ok_or_else(|| FilterError::InvalidCondition(condition.to_string()))?;
            Ok((symbol.parse()?, operand))
        }
        _ => Err(FilterError::InvalidCondition(condition.to_string())),
    }
}

fn bind_each(
    operator: Operator,
    operand: &Value,
    base: &str,
    bindings: &mut Bindings,
) -> Result<String, FilterError> {
    let values = operand.as_array().ok_or_else(|| {
        FilterError::InvalidFilterShape(format!("'{operator}' expects an array, got {operand}"))
    })?;

    Ok(values
        .iter()
        .map(|value| format!(":{}", bindings.bind(base, value.clone())))
        .collect::<Vec<_>>()
        .join(", "))
}

fn is_null_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.eq_ignore_ascii_case("null"),
        _ => false,
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
