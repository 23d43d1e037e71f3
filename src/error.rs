//! Host-level errors.
//!
//! Generation itself never fails: unresolvable types, missing tables and bad
//! content values become [`crate::sql::Diagnostic`]s embedded in the output.
//! `ForgeError` covers the few things that genuinely stop a run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Failed to read model file '{path}': {source}")]
    ModelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid model JSON: {0}")]
    ModelParse(#[source] serde_json::Error),

    #[error("Failed to load config '{path}': {message}")]
    Config { path: PathBuf, message: String },

    #[error("Unknown dialect '{0}' (try `schema_forge dialects`)")]
    UnknownDialect(String),

    #[error("Unknown naming strategy '{0}'")]
    UnknownNamingStrategy(String),

    #[error("Artifact name '{0}' must be a plain file name")]
    InvalidArtifactName(String),

    #[error("Failed to persist artifact '{name}' to '{path}': {source}")]
    Persist {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
