use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter against a schema and print the SQL or grouped tree
    Compile {
        #[arg(long, help = "Schema file path (JSON column map or group definitions)")]
        schema: String,

        #[arg(long, help = "Filter file path (JSON filter tree)")]
        filter: String,

        #[arg(
            long,
            help = "Compile nested empty filter objects to (1=1) instead of skipping them"
        )]
        empty_as_tautology: bool,

        #[arg(
            long,
            help = "If specified, writes the JSON result to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Compile a grouped filter and render the tree into one boolean expression
    Render {
        #[arg(long, help = "Schema file path with group definitions")]
        schema: String,

        #[arg(long, help = "Filter file path (JSON filter tree)")]
        filter: String,

        #[arg(
            long,
            help = "If specified, writes the JSON result to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// List the supported operator symbols and their SQL text
    Operators,
}
