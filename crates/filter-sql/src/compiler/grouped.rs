//! Compiles one filter tree across several independently queried groups.
//!
//! Leaf conditions are routed to the group that owns their field; `and`/`or`
//! nodes become [`FilterNode`]s so the caller can recombine per-group results
//! with the filter's logical structure.

use crate::{
    condition::compile_condition,
    error::FilterError,
    expr::{FilterExpr, as_filter_object, classify, classify_object},
    node::FilterNode,
    operator::SetOperator,
    params::Bindings,
    resolver::resolve_in_groups,
    schema::GroupDefinition,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Result of grouped compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedFilter {
    pub filters: FilterNode,
    pub params: Bindings,
}

pub struct GroupedFilterCompiler<'a> {
    groups: &'a [GroupDefinition],
}

impl<'a> GroupedFilterCompiler<'a> {
    pub fn new(groups: &'a [GroupDefinition]) -> Self {
        Self { groups }
    }

    /// Compiles `filter`, whose root must be a single `and`/`or` key.
    pub fn compile(&self, filter: &Value) -> Result<GroupedFilter, FilterError> {
        if self.groups.is_empty() {
            return Err(FilterError::NoGroupsProvided);
        }

        let root = as_filter_object(filter)?;
        let (key, children) = match root.len() {
            0 => return Err(FilterError::NoFiltersProvided),
            1 => root
                .iter()
                .next()
                .ok_or(FilterError::NoFiltersProvided)?,
            n => return Err(FilterError::MultipleRootOperators(n)),
        };

        let operator = SetOperator::parse(key)
            .ok_or_else(|| FilterError::InvalidRootOperator(key.to_string()))?;
        let children = children.as_array().ok_or_else(|| {
            FilterError::InvalidFilterShape(format!(
                "'{key}' expects an array of filters, got {children}"
            ))
        })?;

        let mut filters = FilterNode::new(operator);
        let mut params = Bindings::new();
        for child in children {
            self.resolve_into(&mut filters, child, &mut params)?;
        }

        debug!(
            groups = ?filters.group_names(),
            params = params.len(),
            "compiled grouped filter"
        );
        Ok(GroupedFilter { filters, params })
    }

    fn resolve_into(
        &self,
        parent: &mut FilterNode,
        filter: &Value,
        params: &mut Bindings,
    ) -> Result<(), FilterError> {
        for expr in classify(filter)? {
            self.resolve_expr(parent, expr, params)?;
        }
        Ok(())
    }

    fn resolve_expr(
        &self,
        parent: &mut FilterNode,
        expr: FilterExpr<'_>,
        params: &mut Bindings,
    ) -> Result<(), FilterError> {
        match expr {
            FilterExpr::Empty => {}
            FilterExpr::Set { operator, children } => {
                let mut node = FilterNode::new(operator);
                for child in children {
                    self.resolve_into(&mut node, child, params)?;
                }
                if !node.is_empty() {
                    parent.child_nodes.push(node);
                }
            }
            FilterExpr::Not(child) => self.resolve_negated(parent, child, params)?,
            FilterExpr::Leaf { field, condition } => {
                let (group, resolved) = resolve_in_groups(field, self.groups)
                    .ok_or_else(|| FilterError::InvalidFilterProperty(field.to_string()))?;
                let sql = compile_condition(&resolved, condition, params)?;
                parent.group_mut(&group.name).conditions.push(sql);
            }
        }
        Ok(())
    }

    /// Negation is limited to one condition so it never spans groups.
    fn resolve_negated(
        &self,
        parent: &mut FilterNode,
        child: &Map<String, Value>,
        params: &mut Bindings,
    ) -> Result<(), FilterError> {
        if child.len() != 1 {
            return Err(FilterError::UnsupportedNotArity(child.len()));
        }

        let mut scratch = FilterNode::new(SetOperator::And);
        for expr in classify_object(child)? {
            self.resolve_expr(&mut scratch, expr, params)?;
        }

        if scratch.groups.len() != 1 {
            return Err(FilterError::InternalInvariantViolation(format!(
                "negated condition resolved to {} groups, expected exactly one",
                scratch.groups.len()
            )));
        }

        let negated = scratch.groups.remove(0);
        parent
            .group_mut(&negated.group_name)
            .conditions
            .extend(negated.conditions.into_iter().map(|c| format!("not ({c})")));
        Ok(())
    }
}

/// Compiles `filter` across `groups`.
pub fn compile_grouped(
    filter: &Value,
    groups: &[GroupDefinition],
) -> Result<GroupedFilter, FilterError> {
    GroupedFilterCompiler::new(groups).compile(filter)
}
