mod cli_tests;
mod execute;
mod output;
mod output_tests;

pub use execute::{DialectInfo, DialectsResult};

use clap::Args;

/// List the built-in dialects and naming strategies
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  schema_forge dialects              # Table of dialects
  schema_forge dialects -o json      # Machine-readable listing")]
pub struct DialectsCmd {}
