use filter_sql::FilterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse input file as JSON: {0}")]
    JsonDeserialize(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Failed to compile filter: {0}")]
    Compile(#[from] FilterError),

    #[error("Schema has no groups; rendering requires a grouped schema")]
    NotGrouped,
}
