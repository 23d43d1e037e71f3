mod execute;
mod execute_tests;
mod output;

pub use execute::DiagramResult;

use clap::Args;
use std::path::PathBuf;

/// Render a model as a PlantUML entity diagram
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  schema_forge diagram -m library.json                # Diagram to stdout
  schema_forge diagram -m library.json --out docs/    # Write docs/library.puml
  schema_forge diagram -m library.json --all          # Keep enums and audit columns")]
pub struct DiagramCmd {
    /// Model JSON file
    #[arg(short, long)]
    pub model: PathBuf,

    /// Dialect whose naming and types label the diagram
    #[arg(short, long)]
    pub dialect: Option<String>,

    /// Directory to write the diagram to instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Include enumeration tables and housekeeping columns
    #[arg(long, default_value_t = false)]
    pub all: bool,
}
