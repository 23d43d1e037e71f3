mod cli_tests;
mod execute;
mod output;

pub use execute::{ArtifactText, GenerateResult};

use clap::Args;
use std::path::PathBuf;

/// Compile a model into SQL scripts for one dialect
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  schema_forge generate -m library.json                  # PostgreSQL DDL to stdout
  schema_forge generate -m library.json -d sqlite        # SQLite DDL
  schema_forge generate -m library.json --out sql/       # One file per artifact
  schema_forge generate -m library.json --out sql/ --driver-script
  schema_forge generate -m library.json --naming lowercase:common_pk_col_named_id")]
pub struct GenerateCmd {
    /// Model JSON file
    #[arg(short, long)]
    pub model: PathBuf,

    /// Dialect name or alias (see `schema_forge dialects`)
    #[arg(short, long)]
    pub dialect: Option<String>,

    /// Naming strategy replacing the dialect's default
    #[arg(short, long)]
    pub naming: Option<String>,

    /// Directory to write artifacts to instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Also write a psql driver script including every artifact
    #[arg(long, default_value_t = false)]
    pub driver_script: bool,
}
