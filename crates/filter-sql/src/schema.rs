//! Column and attribute metadata describing what a filter may reference.
//!
//! These types are supplied by the repository layer and only read by the
//! compiler. They deserialize from the same camelCase JSON shape the
//! repository layer uses (`columnMap`, `jsonColumnInfos`, `attributeInfos`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field key to fully-qualified SQL column or expression.
pub type ColumnMap = HashMap<String, String>;

/// Type of an attribute stored inside a JSON document column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
    String,
    Email,
    Url,
    Number,
    Boolean,
    Date,
    MultiSelect,
    Special,
}

impl AttributeType {
    /// Textual attributes are extracted with `->>` on the last path segment.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            AttributeType::String | AttributeType::Email | AttributeType::Url
        )
    }

    /// Cast applied to the extracted JSON value, if any.
    pub fn cast(&self) -> Option<&'static str> {
        match self {
            AttributeType::Boolean => Some("::boolean"),
            AttributeType::Number => Some("::integer"),
            AttributeType::Date => Some("::timestamptz"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttributeType,
}

/// A JSON document column and the typed attributes nested inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonColumnInfo {
    /// Field key prefix that routes to this column, e.g. `attributes`.
    pub property: String,
    /// SQL expression of the JSON column, e.g. `m.attributes`.
    pub column: String,
    #[serde(default)]
    pub attribute_infos: Vec<AttributeInfo>,
}

impl JsonColumnInfo {
    pub fn new(property: &str, column: &str) -> Self {
        Self {
            property: property.to_string(),
            column: column.to_string(),
            attribute_infos: Vec::new(),
        }
    }

    pub fn attribute(mut self, name: &str, kind: AttributeType) -> Self {
        self.attribute_infos.push(AttributeInfo {
            name: name.to_string(),
            kind,
        });
        self
    }

    pub fn find_attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attribute_infos.iter().find(|a| a.name == name)
    }
}

/// A named scope in grouped compilation, typically one joined subquery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDefinition {
    pub name: String,
    #[serde(default)]
    pub column_map: ColumnMap,
    #[serde(default)]
    pub json_column_infos: Vec<JsonColumnInfo>,
}

impl GroupDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            column_map: ColumnMap::new(),
            json_column_infos: Vec::new(),
        }
    }

    pub fn column(mut self, key: &str, expr: &str) -> Self {
        self.column_map.insert(key.to_string(), expr.to_string());
        self
    }

    pub fn json_column(mut self, info: JsonColumnInfo) -> Self {
        self.json_column_infos.push(info);
        self
    }
}

/// Columns available to a single-target compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    #[serde(default)]
    pub column_map: ColumnMap,
    #[serde(default)]
    pub json_column_infos: Vec<JsonColumnInfo>,
}

/// A compilation scope as loaded from configuration.
///
/// A document with a `groups` array selects grouped compilation; anything
/// else is read as a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSchema {
    Grouped { groups: Vec<GroupDefinition> },
    Single(TableSchema),
}
