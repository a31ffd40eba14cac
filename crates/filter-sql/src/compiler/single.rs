//! Compiles a filter tree against a single table into one SQL expression.

use crate::{
    condition::compile_condition,
    error::FilterError,
    expr::{FilterExpr, classify, classify_object},
    node::TAUTOLOGY,
    operator::SetOperator,
    options::{CompileOptions, EmptyNodePolicy},
    params::Bindings,
    resolver::resolve,
    schema::{ColumnMap, JsonColumnInfo},
};
use serde_json::{Map, Value};
use tracing::debug;

pub struct FilterCompiler<'a> {
    columns: &'a ColumnMap,
    json_columns: &'a [JsonColumnInfo],
    options: CompileOptions,
}

impl<'a> FilterCompiler<'a> {
    pub fn new(columns: &'a ColumnMap, json_columns: &'a [JsonColumnInfo]) -> Self {
        Self {
            columns,
            json_columns,
            options: CompileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Compiles `filter` into a boolean SQL expression.
    ///
    /// Literal values are bound into `bindings` and referenced as `:name`.
    /// Top-level keys are joined with `and`; a filter that compiles to
    /// nothing yields `(1=1)`.
    pub fn compile(&self, filter: &Value, bindings: &mut Bindings) -> Result<String, FilterError> {
        let sql = self
            .compile_node(filter, bindings)?
            .unwrap_or_else(|| TAUTOLOGY.to_string());

        debug!(params = bindings.len(), "compiled filter");
        Ok(sql)
    }

    fn compile_node(
        &self,
        filter: &Value,
        bindings: &mut Bindings,
    ) -> Result<Option<String>, FilterError> {
        let mut parts = Vec::new();
        for expr in classify(filter)? {
            if let Some(sql) = self.compile_expr(expr, bindings)? {
                parts.push(sql);
            }
        }

        Ok(match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(parts.join(" and ")),
        })
    }

    fn compile_expr(
        &self,
        expr: FilterExpr<'_>,
        bindings: &mut Bindings,
    ) -> Result<Option<String>, FilterError> {
        match expr {
            FilterExpr::Empty => Ok(match self.options.empty_nodes {
                EmptyNodePolicy::Skip => None,
                EmptyNodePolicy::Tautology => Some(TAUTOLOGY.to_string()),
            }),
            FilterExpr::Set { operator, children } => {
                self.compile_set(operator, children, bindings)
            }
            FilterExpr::Not(child) => {
                // negating nothing must still match no rows
                let child = self
                    .compile_negated(child, bindings)?
                    .unwrap_or_else(|| TAUTOLOGY.to_string());
                Ok(Some(format!("(not {child})")))
            }
            FilterExpr::Leaf { field, condition } => {
                let resolved = resolve(field, self.columns, self.json_columns)
                    .ok_or_else(|| FilterError::UnknownFilterKey(field.to_string()))?;
                compile_condition(&resolved, condition, bindings).map(Some)
            }
        }
    }

    fn compile_set(
        &self,
        operator: SetOperator,
        children: &[Value],
        bindings: &mut Bindings,
    ) -> Result<Option<String>, FilterError> {
        let mut operands = Vec::new();
        for child in children {
            if let Some(sql) = self.compile_node(child, bindings)? {
                operands.push(sql);
            }
        }

        Ok(match operands.len() {
            0 => None,
            // every operand is already parenthesized
            1 => operands.pop(),
            _ => Some(format!(
                "({})",
                operands.join(&format!(" {} ", operator.to_sql()))
            )),
        })
    }

    fn compile_negated(
        &self,
        child: &Map<String, Value>,
        bindings: &mut Bindings,
    ) -> Result<Option<String>, FilterError> {
        if child.len() != 1 {
            return Err(FilterError::UnsupportedNotArity(child.len()));
        }

        let mut parts = Vec::new();
        for expr in classify_object(child)? {
            if let Some(sql) = self.compile_expr(expr, bindings)? {
                parts.push(sql);
            }
        }
        Ok(parts.pop())
    }
}

/// Compiles `filter` against one table with default options.
pub fn compile(
    filter: &Value,
    columns: &ColumnMap,
    json_columns: &[JsonColumnInfo],
    bindings: &mut Bindings,
) -> Result<String, FilterError> {
    FilterCompiler::new(columns, json_columns).compile(filter, bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> ColumnMap {
        ColumnMap::from([
            ("score".to_string(), "m.score".to_string()),
            ("isBot".to_string(), "m.\"isBot\"".to_string()),
        ])
    }

    #[test]
    fn test_root_empty_object_is_tautology() {
        let columns = columns();
        let mut bindings = Bindings::new();
        assert_eq!(
            compile(&json!({}), &columns, &[], &mut bindings).unwrap(),
            "(1=1)"
        );
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_top_level_keys_join_with_and() {
        let columns = columns();
        let mut bindings = Bindings::new();
        let sql = compile(
            &json!({ "score": { "gt": 1 }, "isBot": { "eq": false } }),
            &columns,
            &[],
            &mut bindings,
        )
        .unwrap();
        assert_eq!(sql, "(m.score > :score_1) and (m.\"isBot\" = :isBot_1)");
    }

    #[test]
    fn test_set_and_not_nodes() {
        let columns = columns();
        let mut bindings = Bindings::new();
        let sql = compile(
            &json!({
                "or": [
                    { "score": { "gt": 1 } },
                    { "not": { "isBot": { "eq": true } } }
                ]
            }),
            &columns,
            &[],
            &mut bindings,
        )
        .unwrap();
        assert_eq!(
            sql,
            "((m.score > :score_1) or (not (m.\"isBot\" = :isBot_1)))"
        );
    }

    #[test]
    fn test_unknown_key() {
        let columns = columns();
        let mut bindings = Bindings::new();
        assert_eq!(
            compile(&json!({ "age": { "gt": 1 } }), &columns, &[], &mut bindings),
            Err(FilterError::UnknownFilterKey("age".into()))
        );
    }

    #[test]
    fn test_not_requires_single_child() {
        let columns = columns();
        let mut bindings = Bindings::new();
        let filter = json!({ "not": { "score": { "gt": 1 }, "isBot": { "eq": true } } });
        assert_eq!(
            compile(&filter, &columns, &[], &mut bindings),
            Err(FilterError::UnsupportedNotArity(2))
        );
    }

    #[test]
    fn test_tautology_policy_keeps_empty_operands() {
        let columns = columns();
        let mut bindings = Bindings::new();
        let sql = FilterCompiler::new(&columns, &[])
            .with_options(CompileOptions::default().empty_nodes(EmptyNodePolicy::Tautology))
            .compile(
                &json!({ "and": [{ "score": { "lt": 3 } }, {}] }),
                &mut bindings,
            )
            .unwrap();
        assert_eq!(sql, "((m.score < :score_1) and (1=1))");
    }
}
