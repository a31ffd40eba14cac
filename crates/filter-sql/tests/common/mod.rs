#![allow(dead_code)]

use filter_sql::{AttributeType, ColumnMap, GroupDefinition, JsonColumnInfo};

pub const IS_ORGANIZATION: &str =
    "coalesce((m.attributes->'isOrganization'->'default')::boolean, false)";
pub const IS_BOT: &str = "coalesce((m.attributes->'isBot'->'default')::boolean, false)";

pub fn column_map(entries: &[(&str, &str)]) -> ColumnMap {
    entries
        .iter()
        .map(|(key, expr)| (key.to_string(), expr.to_string()))
        .collect()
}

pub fn member_columns() -> ColumnMap {
    column_map(&[
        ("isOrganization", IS_ORGANIZATION),
        ("isBot", IS_BOT),
        ("score", "m.score"),
        ("joinedAt", "m.\"joinedAt\""),
        ("displayName", "m.\"displayName\""),
        ("tags", "m.tags"),
    ])
}

pub fn member_attributes() -> JsonColumnInfo {
    JsonColumnInfo::new("attributes", "m.attributes")
        .attribute("isHireable", AttributeType::Boolean)
        .attribute("jobTitle", AttributeType::String)
        .attribute("websiteUrl", AttributeType::Url)
        .attribute("workEmail", AttributeType::Email)
        .attribute("yearsOfExperience", AttributeType::Number)
        .attribute("lastContactedAt", AttributeType::Date)
        .attribute("skills", AttributeType::MultiSelect)
}

pub fn username() -> JsonColumnInfo {
    JsonColumnInfo::new("username", "m.username")
}

pub fn two_groups() -> Vec<GroupDefinition> {
    vec![
        GroupDefinition::new("first").column("isOrganization", IS_ORGANIZATION),
        GroupDefinition::new("second").column("isBot", IS_BOT),
    ]
}

pub fn member_and_activity_groups() -> Vec<GroupDefinition> {
    vec![
        GroupDefinition::new("members")
            .column("score", "m.score")
            .column("isBot", IS_BOT)
            .json_column(member_attributes()),
        GroupDefinition::new("activities")
            .column("activityCount", "aggs.\"activityCount\"")
            .column("lastActive", "aggs.\"lastActive\"")
            .json_column(JsonColumnInfo::new("platforms", "aggs.platforms")),
    ]
}
