//! Output tree of grouped compilation.

use crate::operator::SetOperator;
use serde::{Deserialize, Serialize};

pub const TAUTOLOGY: &str = "(1=1)";

/// Conditions routed to one group; they are AND-combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConditions {
    pub group_name: String,
    pub conditions: Vec<String>,
}

impl GroupConditions {
    pub fn new(group_name: &str) -> Self {
        Self {
            group_name: group_name.to_string(),
            conditions: Vec::new(),
        }
    }

    /// AND-joins the conditions, or `(1=1)` when there are none.
    pub fn joined(&self) -> String {
        combine(self.conditions.clone(), SetOperator::And)
    }
}

/// A node of the grouped filter tree.
///
/// The node's value is `operator` applied over every group entry (each the
/// AND of its conditions) and every child node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterNode {
    pub operator: SetOperator,
    pub groups: Vec<GroupConditions>,
    pub child_nodes: Vec<FilterNode>,
}

impl FilterNode {
    pub fn new(operator: SetOperator) -> Self {
        Self {
            operator,
            groups: Vec::new(),
            child_nodes: Vec::new(),
        }
    }

    pub fn group(&self, name: &str) -> Option<&GroupConditions> {
        self.groups.iter().find(|g| g.group_name == name)
    }

    /// Returns the entry for `name`, appending an empty one if absent.
    pub fn group_mut(&mut self, name: &str) -> &mut GroupConditions {
        let index = match self.groups.iter().position(|g| g.group_name == name) {
            Some(index) => index,
            None => {
                self.groups.push(GroupConditions::new(name));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.child_nodes.is_empty()
    }

    /// Every group referenced in this subtree, in order of first appearance
    /// (depth-first, own groups before children).
    pub fn group_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_group_names(&mut names);
        names
    }

    fn collect_group_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        for group in &self.groups {
            if !names.contains(&group.group_name.as_str()) {
                names.push(&group.group_name);
            }
        }
        for child in &self.child_nodes {
            child.collect_group_names(names);
        }
    }

    /// Renders the tree as one boolean expression.
    ///
    /// `group_sql` renders a single group entry, e.g. by qualifying its
    /// conditions with the subquery alias; [`GroupConditions::joined`] is
    /// the plain form.
    pub fn render<F>(&self, group_sql: &F) -> String
    where
        F: Fn(&GroupConditions) -> String,
    {
        let operands = self
            .groups
            .iter()
            .map(group_sql)
            .chain(self.child_nodes.iter().map(|child| child.render(group_sql)))
            .collect();
        combine(operands, self.operator)
    }
}

fn combine(mut operands: Vec<String>, operator: SetOperator) -> String {
    match operands.len() {
        0 => TAUTOLOGY.to_string(),
        1 => operands.remove(0),
        _ => format!("({})", operands.join(&format!(" {} ", operator.to_sql()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> FilterNode {
        let mut root = FilterNode::new(SetOperator::Or);
        root.group_mut("members").conditions.push("(a = :a_1)".into());
        root.group_mut("members").conditions.push("(b = :b_1)".into());

        let mut child = FilterNode::new(SetOperator::And);
        child.group_mut("aggs").conditions.push("(c > :c_1)".into());
        child.group_mut("members").conditions.push("(d < :d_1)".into());
        root.child_nodes.push(child);
        root
    }

    #[test]
    fn test_group_mut_reuses_existing_entry() {
        let root = sample_tree();
        assert_eq!(root.groups.len(), 1);
        assert_eq!(root.group("members").unwrap().conditions.len(), 2);
        assert!(root.group("aggs").is_none());
    }

    #[test]
    fn test_render_combines_groups_and_children() {
        let sql = sample_tree().render(&GroupConditions::joined);
        assert_eq!(
            sql,
            "(((a = :a_1) and (b = :b_1)) or ((c > :c_1) and (d < :d_1)))"
        );
    }

    #[test]
    fn test_render_with_group_alias() {
        let sql = sample_tree().render(&|g: &GroupConditions| {
            format!("{}.matches({})", g.group_name, g.conditions.len())
        });
        assert_eq!(
            sql,
            "(members.matches(2) or (aggs.matches(1) and members.matches(1)))"
        );
    }

    #[test]
    fn test_empty_tree_renders_tautology() {
        let node = FilterNode::new(SetOperator::And);
        assert!(node.is_empty());
        assert_eq!(node.render(&GroupConditions::joined), TAUTOLOGY);
    }

    #[test]
    fn test_group_names_in_first_appearance_order() {
        assert_eq!(sample_tree().group_names(), vec!["members", "aggs"]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(sample_tree()).unwrap();
        assert_eq!(value["operator"], json!("or"));
        assert_eq!(value["groups"][0]["groupName"], json!("members"));
        assert_eq!(value["childNodes"][0]["operator"], json!("and"));
    }
}
