//! Operator symbols accepted in filter trees and their SQL rendering.

use crate::error::FilterError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Comparison and logical operators understood by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "ne")]
    NotEqual,
    #[serde(rename = "not")]
    Not,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "gte")]
    GreaterThanOrEqual,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "lte")]
    LessThanOrEqual,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "notLike")]
    NotLike,
    #[serde(rename = "textContains")]
    TextContains,
    #[serde(rename = "notTextContains")]
    NotTextContains,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "notIn")]
    NotIn,
    #[serde(rename = "between")]
    Between,
    #[serde(rename = "notBetween")]
    NotBetween,
    #[serde(rename = "and")]
    And,
    #[serde(rename = "or")]
    Or,
    #[serde(rename = "overlap")]
    Overlap,
    #[serde(rename = "contains")]
    Contains,
}

impl Operator {
    pub const ALL: [Operator; 19] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::Not,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Like,
        Operator::NotLike,
        Operator::TextContains,
        Operator::NotTextContains,
        Operator::In,
        Operator::NotIn,
        Operator::Between,
        Operator::NotBetween,
        Operator::And,
        Operator::Or,
        Operator::Overlap,
        Operator::Contains,
    ];

    /// The symbol used for this operator inside filter trees.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "eq",
            Operator::NotEqual => "ne",
            Operator::Not => "not",
            Operator::GreaterThan => "gt",
            Operator::GreaterThanOrEqual => "gte",
            Operator::LessThan => "lt",
            Operator::LessThanOrEqual => "lte",
            Operator::Like => "like",
            Operator::NotLike => "notLike",
            Operator::TextContains => "textContains",
            Operator::NotTextContains => "notTextContains",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::Between => "between",
            Operator::NotBetween => "notBetween",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Overlap => "overlap",
            Operator::Contains => "contains",
        }
    }

    /// Renders the operator as SQL text.
    ///
    /// `json` selects the JSONB key-existence form of `overlap` and
    /// `contains` (`?|` / `?&`) instead of the array forms (`&&` / `@>`).
    pub fn to_sql(&self, json: bool) -> &'static str {
        match self {
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::NotEqual | Operator::Not => "<>",
            Operator::Equal => "=",
            Operator::Like | Operator::TextContains => "ilike",
            Operator::NotLike | Operator::NotTextContains => "not ilike",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::Between => "between",
            Operator::NotBetween => "not between",
            Operator::Overlap if json => "?|",
            Operator::Overlap => "&&",
            Operator::Contains if json => "?&",
            Operator::Contains => "@>",
        }
    }

    /// Operators whose operand is wrapped in `%...%` before binding.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            Operator::Like | Operator::NotLike | Operator::TextContains | Operator::NotTextContains
        )
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .find(|op| op.symbol() == s)
            .copied()
            .ok_or_else(|| FilterError::UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Looks up the SQL text for an operator symbol.
pub fn resolve(symbol: &str, json: bool) -> Result<&'static str, FilterError> {
    symbol.parse::<Operator>().map(|op| op.to_sql(json))
}

/// The logical operators that may combine child filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetOperator {
    And,
    Or,
}

impl SetOperator {
    /// Parses a set operator key, ignoring case and surrounding whitespace.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        if key.eq_ignore_ascii_case("and") {
            Some(SetOperator::And)
        } else if key.eq_ignore_ascii_case("or") {
            Some(SetOperator::Or)
        } else {
            None
        }
    }

    pub fn to_sql(&self) -> &'static str {
        Operator::from(*self).to_sql(false)
    }
}

impl From<SetOperator> for Operator {
    fn from(op: SetOperator) -> Self {
        match op {
            SetOperator::And => Operator::And,
            SetOperator::Or => Operator::Or,
        }
    }
}

impl fmt::Display for SetOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_context_only_changes_overlap_and_contains() {
        for op in Operator::ALL {
            match op {
                Operator::Overlap | Operator::Contains => {
                    assert_ne!(op.to_sql(true), op.to_sql(false))
                }
                _ => assert_eq!(op.to_sql(true), op.to_sql(false)),
            }
        }
        assert_eq!(Operator::Overlap.to_sql(true), "?|");
        assert_eq!(Operator::Overlap.to_sql(false), "&&");
        assert_eq!(Operator::Contains.to_sql(true), "?&");
        assert_eq!(Operator::Contains.to_sql(false), "@>");
    }

    #[test]
    fn test_resolve_symbols() {
        assert_eq!(resolve("eq", false).unwrap(), "=");
        assert_eq!(resolve("not", false).unwrap(), "<>");
        assert_eq!(resolve("ne", true).unwrap(), "<>");
        assert_eq!(resolve("textContains", false).unwrap(), "ilike");
        assert_eq!(resolve("notTextContains", false).unwrap(), "not ilike");
        assert_eq!(resolve("notBetween", false).unwrap(), "not between");
        assert_eq!(resolve("notIn", false).unwrap(), "not in");
    }

    #[test]
    fn test_unknown_operator() {
        assert_eq!(
            resolve("regex", false),
            Err(FilterError::UnknownOperator("regex".into()))
        );
        // symbols are case-sensitive
        assert!("EQ".parse::<Operator>().is_err());
    }

    #[test]
    fn test_symbol_round_trips_through_display() {
        for op in Operator::ALL {
            assert_eq!(op.to_string().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn test_set_operator_parse() {
        assert_eq!(SetOperator::parse("and"), Some(SetOperator::And));
        assert_eq!(SetOperator::parse(" OR "), Some(SetOperator::Or));
        assert_eq!(SetOperator::parse("And"), Some(SetOperator::And));
        assert_eq!(SetOperator::parse("not"), None);
        assert_eq!(SetOperator::Or.to_sql(), "or");
    }
}
