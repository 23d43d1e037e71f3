//! The generation run: model in, ordered artifacts out.
//!
//! Table DDL goes to the model's primary artifact. Views, types, routines and
//! content go to their `persist_as` artifact, or the primary one, appended with
//! a newline delimiter. Buckets reach the persistence handler in the order
//! fixed by [`PersistableArtifacts::persistence_order`].

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ForgeError;
use crate::model::RelationalModel;
use crate::sql::ddl::model_ddl;
use crate::sql::diagnostics::{Diagnostic, Diagnostics};
use crate::sql::dialect::{Dialect, GenerationContext};
use crate::sql::dml::content_sql;
use crate::sql::persist::{
    ArtifactBucket, ArtifactNature, ArtifactNaming, PersistableArtifact, PersistableArtifacts,
    PersistenceHandler, PersistenceResult,
};
use crate::sql::routines::view_ddl;

/// Logical name of the psql script including every other artifact.
pub const DRIVER_ARTIFACT_NAME: &str = "driver";

const APPEND_DELIM: &str = "\n";

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub dialect: String,
    pub naming: String,
    pub primary_artifact: String,
    pub results: Vec<PersistenceResult>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Dialect {
    /// Generate every artifact for `model`, grouped by bucket.
    ///
    /// Text artifacts come from `handler`, which later persists them.
    pub fn persistable_artifacts(
        &self,
        model: &RelationalModel,
        handler: &dyn PersistenceHandler,
        naming: &dyn ArtifactNaming,
        diagnostics: &mut Diagnostics,
    ) -> PersistableArtifacts {
        let ctx = GenerationContext::new(model, self);
        let nature = self.nature();
        let primary = naming.model_primary_artifact_name();
        let artifact = |bucket, name: String, text: &str| {
            let mut text_artifact = handler.create_text_artifact(nature);
            text_artifact.append_text(text);
            PersistableArtifact::new(bucket, name, text_artifact).appending(APPEND_DELIM)
        };

        let mut artifacts =
            PersistableArtifacts::new(artifact(ArtifactBucket::Main, primary.clone(), &model_ddl(&ctx, diagnostics)));

        if let Some(extensions) = self.extensions_ddl(&ctx) {
            artifacts.push(artifact(ArtifactBucket::BeforeStructs, primary.clone(), &extensions));
        }

        for view in &model.views {
            let name = naming.view_artifact_name(view.persist_as.as_deref());
            artifacts.push(artifact(ArtifactBucket::Views, name, &view_ddl(&ctx, view)));
        }

        if let Some(type_defn_ddl) = self.type_defn_ddl() {
            for type_defn in &model.type_defns {
                let name = naming.type_defn_artifact_name(type_defn.persist_as.as_deref());
                let ddl = type_defn_ddl(&ctx, type_defn, diagnostics);
                artifacts.push(artifact(ArtifactBucket::Types, name, &ddl));
            }
        }

        if let Some(function_ddl) = self.stored_function_ddl() {
            for function in &model.functions {
                let name = naming.stored_function_artifact_name(function.persist_as.as_deref());
                let ddl = function_ddl(&ctx, function, diagnostics);
                artifacts.push(artifact(ArtifactBucket::StoredFunctions, name, &ddl));
            }
        }

        if let Some(procedure_ddl) = self.stored_procedure_ddl() {
            for procedure in &model.procedures {
                let name = naming.stored_procedure_artifact_name(procedure.persist_as.as_deref());
                let ddl = procedure_ddl(&ctx, procedure, diagnostics);
                artifacts.push(artifact(ArtifactBucket::StoredProcedures, name, &ddl));
            }
        }

        for content in content_sql(&ctx, diagnostics) {
            let name = naming.content_artifact_name(content.persist_as.as_deref());
            artifacts.push(artifact(ArtifactBucket::Content, name, &content.sql()));
        }

        artifacts
    }

    /// Generate and persist everything for `model`.
    ///
    /// Generation problems end up as comments in the text and in the report;
    /// only persistence failures are errors.
    pub fn persist_model(
        &self,
        model: &RelationalModel,
        handler: &mut dyn PersistenceHandler,
        naming: &dyn ArtifactNaming,
    ) -> Result<GenerationReport, ForgeError> {
        let mut diagnostics = Diagnostics::new();
        let artifacts = self.persistable_artifacts(model, &*handler, naming, &mut diagnostics);
        for artifact in artifacts.persistence_order() {
            debug!(bucket = ?artifact.bucket, artifact = %artifact.name, "persisting");
            handler.persist_text_artifact(&artifact.name, &artifact.artifact, artifact.options.as_ref())?;
        }
        info!(
            dialect = self.name(),
            artifacts = handler.results().len(),
            diagnostics = diagnostics.len(),
            "model persisted"
        );
        Ok(GenerationReport {
            dialect: self.name().to_string(),
            naming: self.naming().strategy_name(),
            primary_artifact: naming.model_primary_artifact_name(),
            results: handler.results().to_vec(),
            diagnostics: diagnostics.into_vec(),
        })
    }
}

/// Persist a psql script that `\include`s every artifact persisted so far.
pub fn persist_driver_script(handler: &mut dyn PersistenceHandler) -> Result<PersistenceResult, ForgeError> {
    let mut driver = handler.create_text_artifact(ArtifactNature::PostgreSql);
    for result in handler.results() {
        driver.append_text(&format!("\\include {}\n", result.physical_name));
    }
    handler.persist_text_artifact(DRIVER_ARTIFACT_NAME, &driver, None)
}
