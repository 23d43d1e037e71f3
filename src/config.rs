//! Configuration file handling.
//!
//! Settings come from, in priority order: command-line flags, the
//! `.schema_forge.json` file (or the file given with `--config`), the
//! `SCHEMA_FORGE_DIALECT` / `SCHEMA_FORGE_OUTPUT` environment variables, and
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ForgeError;
use crate::sql::dialect::Dialect;
use crate::sql::naming::NamingStrategies;

pub const CONFIG_FILE_NAME: &str = ".schema_forge.json";
pub const DIALECT_ENV: &str = "SCHEMA_FORGE_DIALECT";
pub const OUTPUT_ENV: &str = "SCHEMA_FORGE_OUTPUT";
pub const DEFAULT_DIALECT: &str = "postgresql";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Dialect name or alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<String>,
    /// Naming strategy replacing the dialect's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naming: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
    /// Also write a psql driver script including every artifact
    #[serde(default)]
    pub driver_script: bool,
}

/// Where generated artifacts go.
///
/// JSON format uses a "type" field with lowercase variant names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputConfig {
    /// One file per logical artifact
    Directory { path: PathBuf },
    /// Print artifacts to standard output
    #[default]
    Stdout,
}

impl OutputConfig {
    /// `-` and `stdout` mean standard output, anything else is a directory.
    pub fn from_env_value(value: &str) -> Self {
        match value.trim() {
            "-" | "stdout" => OutputConfig::Stdout,
            path => OutputConfig::Directory { path: PathBuf::from(path) },
        }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub dialect: Option<String>,
    pub naming: Option<String>,
    pub out: Option<PathBuf>,
    pub driver_script: bool,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dialect: Dialect,
    pub output: OutputConfig,
    pub driver_script: bool,
}

impl ConfigFile {
    /// Load `path`, or `.schema_forge.json` in the current directory.
    ///
    /// An explicit path must exist; a missing default file yields an empty config.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ForgeError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => {
                let default_path = PathBuf::from(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::load_from(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ForgeError> {
        let content = fs::read_to_string(path).map_err(|e| ForgeError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: ConfigFile = serde_json::from_str(&content).map_err(|e| ForgeError::Config {
            path: path.to_path_buf(),
            message: format!("invalid JSON: {}", e),
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Resolve against the command line and the process environment.
    pub fn resolve(&self, overrides: &Overrides) -> Result<Settings, ForgeError> {
        self.resolve_with_env(overrides, |key| std::env::var(key).ok())
    }

    pub fn resolve_with_env(
        &self,
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Settings, ForgeError> {
        let dialect_name = overrides
            .dialect
            .clone()
            .or_else(|| self.dialect.clone())
            .or_else(|| env(DIALECT_ENV))
            .unwrap_or_else(|| DEFAULT_DIALECT.to_string());
        let mut dialect = Dialect::from_name(&dialect_name)?;

        if let Some(naming) = overrides.naming.as_ref().or(self.naming.as_ref()) {
            dialect = dialect.with_naming(Arc::new(NamingStrategies::from_name(naming)?));
        }

        let output = overrides
            .out
            .clone()
            .map(|path| OutputConfig::Directory { path })
            .or_else(|| self.output.clone())
            .or_else(|| env(OUTPUT_ENV).map(|v| OutputConfig::from_env_value(&v)))
            .unwrap_or_default();

        Ok(Settings {
            dialect,
            output,
            driver_script: overrides.driver_script || self.driver_script,
        })
    }
}
