use crate::error::CliError;
use filter_sql::{Bindings, FilterNode};
use serde::Serialize;

/// Result of compiling against a single table.
#[derive(Debug, Serialize)]
pub struct CompiledSql {
    pub sql: String,
    pub params: Bindings,
}

/// A grouped filter rendered into one expression.
#[derive(Debug, Serialize)]
pub struct RenderedFilter<'a> {
    pub sql: String,
    pub groups: Vec<&'a str>,
    pub filters: &'a FilterNode,
    pub params: &'a Bindings,
}

#[derive(Debug, Serialize)]
pub struct OperatorRow {
    pub symbol: &'static str,
    pub sql: &'static str,
    pub json_sql: &'static str,
}

pub async fn emit<T: Serialize>(result: &T, output: Option<String>) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(result).map_err(CliError::JsonSerialize)?;
    match output {
        Some(path) => tokio::fs::write(path, json).await?,
        None => println!("{json}"),
    }
    Ok(())
}
