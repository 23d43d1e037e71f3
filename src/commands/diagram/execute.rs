use std::error::Error;

use serde::Serialize;

use super::DiagramCmd;
use crate::commands::Execute;
use crate::config::{ConfigFile, OutputConfig, Overrides};
use crate::diagram::PlantUmlIeRenderer;
use crate::model::RelationalModel;
use crate::sql::diagnostics::{Diagnostic, Diagnostics};
use crate::sql::persist::{DirectoryPersistence, InMemoryPersistence, PersistenceResult};

/// Result of the diagram command execution
#[derive(Debug, Serialize)]
pub struct DiagramResult {
    pub model: String,
    pub dialect: String,
    pub artifact: PersistenceResult,
    pub diagnostics: Vec<Diagnostic>,
    /// Diagram source when printed to stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Execute for DiagramCmd {
    type Output = DiagramResult;

    fn execute(self, config: &ConfigFile) -> Result<Self::Output, Box<dyn Error>> {
        let model = RelationalModel::load(&self.model)?;
        let settings = config.resolve(&Overrides {
            dialect: self.dialect,
            out: self.out,
            ..Default::default()
        })?;
        let renderer = if self.all {
            PlantUmlIeRenderer::everything()
        } else {
            PlantUmlIeRenderer::default()
        };

        let mut diagnostics = Diagnostics::new();
        let (artifact, text) = match &settings.output {
            OutputConfig::Stdout => {
                let mut handler = InMemoryPersistence::new();
                let artifact = renderer.persist(&model, &settings.dialect, &mut handler, &mut diagnostics)?;
                let text = handler.text(&model.name).map(str::to_string);
                (artifact, text)
            }
            OutputConfig::Directory { path } => {
                let mut handler = DirectoryPersistence::new(path);
                let artifact = renderer.persist(&model, &settings.dialect, &mut handler, &mut diagnostics)?;
                (artifact, None)
            }
        };

        Ok(DiagramResult {
            model: model.name,
            dialect: settings.dialect.name().to_string(),
            artifact,
            diagnostics: diagnostics.into_vec(),
            text,
        })
    }
}
