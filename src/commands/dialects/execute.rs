use std::error::Error;

use serde::Serialize;

use super::DialectsCmd;
use crate::commands::Execute;
use crate::config::ConfigFile;
use crate::sql::dialect::KNOWN_DIALECTS;
use crate::sql::naming::NamingStrategies;

/// One built-in dialect as listed to the user
#[derive(Debug, Clone, Serialize)]
pub struct DialectInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub naming: String,
    pub naming_description: String,
    pub routines: bool,
    pub extension: String,
}

/// Result of the dialects command execution
#[derive(Debug, Default, Serialize)]
pub struct DialectsResult {
    /// Dialect a bare `generate` would use after config resolution
    pub selected: String,
    pub dialects: Vec<DialectInfo>,
    pub naming_strategies: Vec<String>,
}

impl Execute for DialectsCmd {
    type Output = DialectsResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let selected = config.resolve(&Default::default())?;

        let dialects = KNOWN_DIALECTS
            .iter()
            .map(|descriptor| {
                let dialect = (descriptor.build)();
                DialectInfo {
                    name: descriptor.name.to_string(),
                    aliases: descriptor.aliases.iter().map(|a| a.to_string()).collect(),
                    naming: dialect.naming().strategy_name(),
                    naming_description: dialect.naming().strategy_description(),
                    routines: dialect.supports_routines(),
                    extension: dialect.nature().extension().to_string(),
                }
            })
            .collect();

        Ok(DialectsResult {
            selected: selected.dialect.name().to_string(),
            dialects,
            naming_strategies: NamingStrategies::known_names().iter().map(|n| n.to_string()).collect(),
        })
    }
}
