//! Resolution of field keys to plain columns or JSON document paths.

use crate::{
    error::FilterError,
    params::json_base_name,
    schema::{ColumnMap, GroupDefinition, JsonColumnInfo},
};

/// A field key matched against a [`JsonColumnInfo`].
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath<'a> {
    pub info: &'a JsonColumnInfo,
    /// Dot-separated segments of the key; the first is the matched property.
    pub parts: Vec<&'a str>,
}

impl<'a> JsonPath<'a> {
    /// Segments after the property, i.e. the keys inside the JSON value.
    pub fn nested(&self) -> &[&'a str] {
        &self.parts[1..]
    }

    pub fn param_base(&self) -> String {
        json_base_name(&self.info.property, self.nested())
    }

    /// Builds the dereference chain and type cast for this path.
    ///
    /// The first nested segment must name a declared attribute; its type
    /// decides text extraction on the last segment and the trailing cast.
    pub fn to_sql(&self) -> Result<String, FilterError> {
        let nested = self.nested();
        let Some(attribute) = nested.first() else {
            return Ok(self.info.column.clone());
        };

        let info = self
            .info
            .find_attribute(attribute)
            .ok_or_else(|| FilterError::UnknownAttribute {
                property: self.info.property.clone(),
                attribute: attribute.to_string(),
            })?;

        let mut chain = String::new();
        for (i, part) in nested.iter().enumerate() {
            if info.kind.is_text() && i == nested.len() - 1 {
                chain.push_str(&format!(" ->> '{part}'"));
            } else {
                chain.push_str(&format!(" -> '{part}'"));
            }
        }

        let mut sql = format!("({}{})", self.info.column, chain);
        if let Some(cast) = info.kind.cast() {
            sql.push_str(cast);
        }
        Ok(sql)
    }
}

/// What a field key refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedField<'a> {
    Column { key: &'a str, expr: &'a str },
    Json(JsonPath<'a>),
}

impl ResolvedField<'_> {
    pub fn is_json(&self) -> bool {
        matches!(self, ResolvedField::Json(_))
    }

    /// SQL expression the condition compares against.
    pub fn to_sql(&self) -> Result<String, FilterError> {
        match self {
            ResolvedField::Column { expr, .. } => Ok(expr.to_string()),
            ResolvedField::Json(path) => path.to_sql(),
        }
    }

    /// Base name for parameters bound against this field.
    pub fn param_base(&self) -> String {
        match self {
            ResolvedField::Column { key, .. } => key.to_string(),
            ResolvedField::Json(path) => path.param_base(),
        }
    }
}

/// Matches the first dot-separated segment of `key` against the JSON
/// columns' properties.
pub fn find_json_column<'a>(key: &'a str, infos: &'a [JsonColumnInfo]) -> Option<JsonPath<'a>> {
    let parts: Vec<&str> = key.split('.').collect();
    let info = infos.iter().find(|info| info.property == parts[0])?;
    Some(JsonPath { info, parts })
}

/// Resolves a field key within one scope; JSON properties take priority
/// over the column map.
pub fn resolve<'a>(
    key: &'a str,
    columns: &'a ColumnMap,
    json_columns: &'a [JsonColumnInfo],
) -> Option<ResolvedField<'a>> {
    if let Some(path) = find_json_column(key, json_columns) {
        return Some(ResolvedField::Json(path));
    }

    columns
        .get_key_value(key)
        .map(|(key, expr)| ResolvedField::Column {
            key: key.as_str(),
            expr: expr.as_str(),
        })
}

/// Finds the group owning `key`.
///
/// JSON properties of every group are checked before any column map; within
/// each pass the first group in declaration order wins.
pub fn resolve_in_groups<'a>(
    key: &'a str,
    groups: &'a [GroupDefinition],
) -> Option<(&'a GroupDefinition, ResolvedField<'a>)> {
    let json_match = groups.iter().find_map(|group| {
        find_json_column(key, &group.json_column_infos)
            .map(|path| (group, ResolvedField::Json(path)))
    });
    if json_match.is_some() {
        return json_match;
    }

    groups.iter().find_map(|group| {
        group
            .column_map
            .get_key_value(key)
            .map(|(key, expr)| {
                let field = ResolvedField::Column {
                    key: key.as_str(),
                    expr: expr.as_str(),
                };
                (group, field)
            })
    })
}
