//! schema_forge library - relational model to SQL compiler
//!
//! Compiles a relational model (tables, typed columns, relationships, views,
//! stored routines and seed content) into dialect-specific SQL scripts and
//! PlantUML diagrams, with the command execution and output formatting used
//! by the `schema_forge` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod diagram;
pub mod error;
pub mod model;
pub mod output;
pub mod sql;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod test_utils;
