use crate::{
    error::CliError,
    output::{CompiledSql, OperatorRow, RenderedFilter},
};
use clap::Parser;
use commands::Commands;
use filter_sql::{
    CompileOptions, EmptyNodePolicy, FilterCompiler, FilterSchema, GroupConditions, Operator,
    compile_grouped,
};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "filterc",
    version = "0.1.0",
    about = "Compile JSON search filters into parameterized SQL"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays valid JSON
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            schema,
            filter,
            empty_as_tautology,
            output,
        } => {
            info!("Compiling filter {} against schema {}", filter, schema);

            let schema: FilterSchema = read_json(&schema).await?;
            let filter: serde_json::Value = read_json(&filter).await?;

            match schema {
                FilterSchema::Grouped { groups } => {
                    let result = compile_grouped(&filter, &groups)?;
                    output::emit(&result, output).await?;
                }
                FilterSchema::Single(table) => {
                    let policy = if empty_as_tautology {
                        EmptyNodePolicy::Tautology
                    } else {
                        EmptyNodePolicy::Skip
                    };
                    let mut params = Default::default();
                    let sql = FilterCompiler::new(&table.column_map, &table.json_column_infos)
                        .with_options(CompileOptions::default().empty_nodes(policy))
                        .compile(&filter, &mut params)?;
                    output::emit(&CompiledSql { sql, params }, output).await?;
                }
            }
        }
        Commands::Render {
            schema,
            filter,
            output,
        } => {
            let FilterSchema::Grouped { groups } = read_json::<FilterSchema>(&schema).await? else {
                return Err(CliError::NotGrouped);
            };
            let filter: serde_json::Value = read_json(&filter).await?;

            let result = compile_grouped(&filter, &groups)?;
            let rendered = RenderedFilter {
                sql: result.filters.render(&GroupConditions::joined),
                groups: result.filters.group_names(),
                filters: &result.filters,
                params: &result.params,
            };
            output::emit(&rendered, output).await?;
        }
        Commands::Operators => {
            let rows = Operator::ALL
                .iter()
                .map(|op| OperatorRow {
                    symbol: op.symbol(),
                    sql: op.to_sql(false),
                    json_sql: op.to_sql(true),
                })
                .collect::<Vec<_>>();
            output::emit(&rows, None).await?;
        }
    }

    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, CliError> {
    let source = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&source)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile_command() {
        let cli = Cli::try_parse_from([
            "filterc",
            "compile",
            "--schema",
            "schema.json",
            "--filter",
            "filter.json",
            "--empty-as-tautology",
        ])
        .unwrap();

        match cli.command {
            Commands::Compile {
                schema,
                filter,
                empty_as_tautology,
                output,
            } => {
                assert_eq!(schema, "schema.json");
                assert_eq!(filter, "filter.json");
                assert!(empty_as_tautology);
                assert!(output.is_none());
            }
            _ => panic!("expected compile command"),
        }
    }

    #[test]
    fn test_render_requires_schema() {
        assert!(Cli::try_parse_from(["filterc", "render", "--filter", "f.json"]).is_err());
    }
}
