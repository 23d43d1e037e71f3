use std::error::Error;

use serde::Serialize;

use super::GenerateCmd;
use crate::commands::Execute;
use crate::config::{ConfigFile, OutputConfig, Overrides};
use crate::model::RelationalModel;
use crate::sql::diagnostics::Diagnostic;
use crate::sql::dialect::Dialect;
use crate::sql::persist::{
    DefaultArtifactNaming, DirectoryPersistence, InMemoryPersistence, PersistenceHandler, PersistenceResult,
};
use crate::sql::pipeline::{GenerationReport, persist_driver_script};

/// Text of one artifact generated for stdout
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactText {
    pub name: String,
    pub text: String,
}

/// Result of the generate command execution
#[derive(Debug, Default, Serialize)]
pub struct GenerateResult {
    pub model: String,
    pub dialect: String,
    pub naming: String,
    /// `stdout` or the output directory
    pub output: String,
    pub artifacts: Vec<PersistenceResult>,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub texts: Vec<ArtifactText>,
}

fn persist(
    dialect: &Dialect,
    model: &RelationalModel,
    handler: &mut dyn PersistenceHandler,
    driver_script: bool,
) -> Result<GenerationReport, Box<dyn Error>> {
    let mut report = dialect.persist_model(model, handler, &DefaultArtifactNaming::new(&model.name))?;
    if driver_script {
        persist_driver_script(handler)?;
        report.results = handler.results().to_vec();
    }
    Ok(report)
}

impl Execute for GenerateCmd {
    type Output = GenerateResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let model = RelationalModel::load(&self.model)?;
        let settings = config.resolve(&Overrides {
            dialect: self.dialect,
            naming: self.naming,
            out: self.out,
            driver_script: self.driver_script,
        })?;

        let (report, output, texts) = match &settings.output {
            OutputConfig::Stdout => {
                let mut handler = InMemoryPersistence::new();
                let report = persist(&settings.dialect, &model, &mut handler, settings.driver_script)?;
                let texts = handler
                    .artifacts()
                    .into_iter()
                    .map(|(name, text)| ArtifactText {
                        name: name.to_string(),
                        text: text.to_string(),
                    })
                    .collect();
                (report, "stdout".to_string(), texts)
            }
            OutputConfig::Directory { path } => {
                let mut handler = DirectoryPersistence::new(path);
                let report = persist(&settings.dialect, &model, &mut handler, settings.driver_script)?;
                (report, path.display().to_string(), Vec::new())
            }
        };

        Ok(GenerateResult {
            model: model.name,
            dialect: report.dialect,
            naming: report.naming,
            output,
            artifacts: report.results,
            diagnostics: report.diagnostics,
            texts,
        })
    }
}
