//! Text artifacts and their persistence.
//!
//! # Overview
//!
//! Generators fill [`TextArtifact`]s and hand them to a
//! [`PersistenceHandler`] under a logical name. Several artifacts may share
//! one logical name; with [`PersistOptions::appending`] each later artifact is
//! appended to the earlier text with a delimiter instead of replacing it.
//!
//! [`PersistableArtifacts`] holds everything one run produced, grouped by
//! [`ArtifactBucket`], and [`PersistableArtifacts::persistence_order`] fixes
//! the order they reach the handler.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::ForgeError;

/// Content groups persisted under this name run before stored routines are created.
pub const ALL_CONTENT_ARTIFACT_NAME: &str = "content-all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactNature {
    Sql,
    /// psql scripts (meta-commands allowed)
    PostgreSql,
    PlantUml,
}

impl ArtifactNature {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactNature::Sql => "sql",
            ArtifactNature::PostgreSql => "psql",
            ArtifactNature::PlantUml => "puml",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArtifact {
    nature: ArtifactNature,
    text: String,
}

impl TextArtifact {
    pub fn new(nature: ArtifactNature) -> Self {
        Self {
            nature,
            text: String::new(),
        }
    }

    pub fn append_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn nature(&self) -> ArtifactNature {
        self.nature
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistOptions {
    pub append_if_exists: bool,
    pub append_delim: Option<String>,
}

impl PersistOptions {
    pub fn appending(delim: &str) -> Self {
        Self {
            append_if_exists: true,
            append_delim: Some(delim.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistenceResult {
    pub logical_name: String,
    pub physical_name: String,
    pub bytes: usize,
}

pub trait PersistenceHandler {
    fn create_text_artifact(&self, nature: ArtifactNature) -> TextArtifact {
        TextArtifact::new(nature)
    }

    /// Persist under `name`, appending when asked to and the name was already
    /// persisted in this run.
    fn persist_text_artifact(
        &mut self,
        name: &str,
        artifact: &TextArtifact,
        options: Option<&PersistOptions>,
    ) -> Result<PersistenceResult, ForgeError>;

    /// One result per logical artifact, in first-persisted order.
    fn results(&self) -> &[PersistenceResult];
}

fn upsert_result(results: &mut Vec<PersistenceResult>, result: PersistenceResult) -> PersistenceResult {
    match results.iter_mut().find(|r| r.logical_name == result.logical_name) {
        Some(existing) => *existing = result.clone(),
        None => results.push(result.clone()),
    }
    result
}

/// Keeps artifacts in memory; used for stdout output and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    texts: BTreeMap<String, String>,
    results: Vec<PersistenceResult>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    /// Artifacts in first-persisted order.
    pub fn artifacts(&self) -> Vec<(&str, &str)> {
        self.results
            .iter()
            .filter_map(|r| {
                self.texts
                    .get(&r.logical_name)
                    .map(|t| (r.logical_name.as_str(), t.as_str()))
            })
            .collect()
    }
}

impl PersistenceHandler for InMemoryPersistence {
    fn persist_text_artifact(
        &mut self,
        name: &str,
        artifact: &TextArtifact,
        options: Option<&PersistOptions>,
    ) -> Result<PersistenceResult, ForgeError> {
        let append = options.is_some_and(|o| o.append_if_exists) && self.texts.contains_key(name);
        let text = self.texts.entry(name.to_string()).or_default();
        if append {
            if let Some(delim) = options.and_then(|o| o.append_delim.as_deref()) {
                text.push_str(delim);
            }
        } else {
            text.clear();
        }
        text.push_str(artifact.text());
        let result = PersistenceResult {
            logical_name: name.to_string(),
            physical_name: format!("{}.{}", name, artifact.nature().extension()),
            bytes: text.len(),
        };
        debug!(artifact = %name, bytes = result.bytes, "artifact persisted in memory");
        Ok(upsert_result(&mut self.results, result))
    }

    fn results(&self) -> &[PersistenceResult] {
        &self.results
    }
}

/// Writes one `<name>.<ext>` file per logical artifact under a root directory.
///
/// Files left over from earlier runs are overwritten on first persist;
/// appending only applies within the current run. Names must be plain file
/// names so every file lands directly under the root.
#[derive(Debug, Clone)]
pub struct DirectoryPersistence {
    root: PathBuf,
    results: Vec<PersistenceResult>,
}

impl DirectoryPersistence {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            results: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write(&self, path: &Path, text: &str, append: bool, name: &str) -> Result<u64, ForgeError> {
        let io_err = |source| ForgeError::Persist {
            name: name.to_string(),
            path: path.to_path_buf(),
            source,
        };
        fs::create_dir_all(&self.root).map_err(io_err)?;
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .map_err(io_err)?;
        file.write_all(text.as_bytes()).map_err(io_err)?;
        Ok(file.metadata().map_err(io_err)?.len())
    }
}

/// A single normal path component with no separators of either platform.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    !name.contains(['/', '\\'])
        && matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
}

impl PersistenceHandler for DirectoryPersistence {
    fn persist_text_artifact(
        &mut self,
        name: &str,
        artifact: &TextArtifact,
        options: Option<&PersistOptions>,
    ) -> Result<PersistenceResult, ForgeError> {
        if !is_plain_file_name(name) {
            return Err(ForgeError::InvalidArtifactName(name.to_string()));
        }
        let physical_name = format!("{}.{}", name, artifact.nature().extension());
        let path = self.root.join(&physical_name);
        let seen = self.results.iter().any(|r| r.logical_name == name);
        let append = seen && options.is_some_and(|o| o.append_if_exists);

        let text = match options.and_then(|o| o.append_delim.as_deref()) {
            Some(delim) if append => format!("{}{}", delim, artifact.text()),
            _ => artifact.text().to_string(),
        };
        let bytes = self.write(&path, &text, append, name)?;

        let result = PersistenceResult {
            logical_name: name.to_string(),
            physical_name: path.display().to_string(),
            bytes: bytes as usize,
        };
        debug!(artifact = %name, path = %result.physical_name, append, "artifact written");
        Ok(upsert_result(&mut self.results, result))
    }

    fn results(&self) -> &[PersistenceResult] {
        &self.results
    }
}

/// Picks logical artifact names.
pub trait ArtifactNaming {
    fn model_primary_artifact_name(&self) -> String;

    fn view_artifact_name(&self, persist_as: Option<&str>) -> String {
        self.named_or_primary(persist_as)
    }

    fn type_defn_artifact_name(&self, persist_as: Option<&str>) -> String {
        self.named_or_primary(persist_as)
    }

    fn stored_function_artifact_name(&self, persist_as: Option<&str>) -> String {
        self.named_or_primary(persist_as)
    }

    fn stored_procedure_artifact_name(&self, persist_as: Option<&str>) -> String {
        self.named_or_primary(persist_as)
    }

    fn content_artifact_name(&self, persist_as: Option<&str>) -> String {
        self.named_or_primary(persist_as)
    }

    fn named_or_primary(&self, persist_as: Option<&str>) -> String {
        persist_as
            .map(str::to_string)
            .unwrap_or_else(|| self.model_primary_artifact_name())
    }
}

/// Everything goes to the model's artifact unless an object says otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultArtifactNaming {
    primary: String,
}

impl DefaultArtifactNaming {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
        }
    }
}

impl ArtifactNaming for DefaultArtifactNaming {
    fn model_primary_artifact_name(&self) -> String {
        self.primary.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactBucket {
    BeforeStructs,
    Main,
    Structs,
    AfterStructs,
    Types,
    Views,
    StoredFunctions,
    StoredProcedures,
    Content,
    AfterContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistableArtifact {
    pub bucket: ArtifactBucket,
    pub name: String,
    pub options: Option<PersistOptions>,
    pub artifact: TextArtifact,
}

impl PersistableArtifact {
    pub fn new(bucket: ArtifactBucket, name: impl Into<String>, artifact: TextArtifact) -> Self {
        Self {
            bucket,
            name: name.into(),
            options: None,
            artifact,
        }
    }

    pub fn appending(mut self, delim: &str) -> Self {
        self.options = Some(PersistOptions::appending(delim));
        self
    }

    fn is_all_content(&self) -> bool {
        self.name == ALL_CONTENT_ARTIFACT_NAME
    }
}

/// All artifacts of one run, grouped by bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistableArtifacts {
    pub main: PersistableArtifact,
    pub before_structs: Vec<PersistableArtifact>,
    pub structs: Vec<PersistableArtifact>,
    pub after_structs: Vec<PersistableArtifact>,
    pub types: Vec<PersistableArtifact>,
    pub views: Vec<PersistableArtifact>,
    pub stored_functions: Vec<PersistableArtifact>,
    pub stored_procedures: Vec<PersistableArtifact>,
    pub content: Vec<PersistableArtifact>,
    pub after_content: Vec<PersistableArtifact>,
}

impl PersistableArtifacts {
    pub fn new(main: PersistableArtifact) -> Self {
        Self {
            main,
            before_structs: Vec::new(),
            structs: Vec::new(),
            after_structs: Vec::new(),
            types: Vec::new(),
            views: Vec::new(),
            stored_functions: Vec::new(),
            stored_procedures: Vec::new(),
            content: Vec::new(),
            after_content: Vec::new(),
        }
    }

    /// File an artifact under its bucket. A second main artifact replaces the first.
    pub fn push(&mut self, artifact: PersistableArtifact) {
        let bucket = match artifact.bucket {
            ArtifactBucket::Main => {
                self.main = artifact;
                return;
            }
            ArtifactBucket::BeforeStructs => &mut self.before_structs,
            ArtifactBucket::Structs => &mut self.structs,
            ArtifactBucket::AfterStructs => &mut self.after_structs,
            ArtifactBucket::Types => &mut self.types,
            ArtifactBucket::Views => &mut self.views,
            ArtifactBucket::StoredFunctions => &mut self.stored_functions,
            ArtifactBucket::StoredProcedures => &mut self.stored_procedures,
            ArtifactBucket::Content => &mut self.content,
            ArtifactBucket::AfterContent => &mut self.after_content,
        };
        bucket.push(artifact);
    }

    /// Fixed order: before-structs, main, structs, after-structs, types, views,
    /// `content-all` content, functions, procedures, other content, after-content.
    ///
    /// Artifacts with no text are skipped, so a model without tables persists
    /// no main artifact.
    pub fn persistence_order(&self) -> Vec<&PersistableArtifact> {
        let (all_content, other_content): (Vec<_>, Vec<_>) =
            self.content.iter().partition(|a| a.is_all_content());
        self.before_structs
            .iter()
            .chain(std::iter::once(&self.main))
            .chain(&self.structs)
            .chain(&self.after_structs)
            .chain(&self.types)
            .chain(&self.views)
            .chain(all_content)
            .chain(&self.stored_functions)
            .chain(&self.stored_procedures)
            .chain(other_content)
            .chain(&self.after_content)
            .filter(|a| !a.artifact.is_empty())
            .collect()
    }

    pub fn persist_all(
        &self,
        handler: &mut dyn PersistenceHandler,
    ) -> Result<Vec<PersistenceResult>, ForgeError> {
        self.persistence_order()
            .into_iter()
            .map(|a| handler.persist_text_artifact(&a.name, &a.artifact, a.options.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn artifact(bucket: ArtifactBucket, name: &str, text: &str) -> PersistableArtifact {
        let mut a = TextArtifact::new(ArtifactNature::Sql);
        a.append_text(text);
        PersistableArtifact::new(bucket, name, a).appending("\n")
    }

    #[fixture]
    fn all_buckets() -> PersistableArtifacts {
        let mut pa = PersistableArtifacts::new(artifact(ArtifactBucket::Main, "m", "main"));
        pa.push(artifact(ArtifactBucket::AfterContent, "m", "after-content"));
        pa.push(artifact(ArtifactBucket::Content, "m", "content"));
        pa.push(artifact(ArtifactBucket::StoredProcedures, "m", "procedure"));
        pa.push(artifact(ArtifactBucket::StoredFunctions, "m", "function"));
        pa.push(artifact(ArtifactBucket::Content, ALL_CONTENT_ARTIFACT_NAME, "content-all"));
        pa.push(artifact(ArtifactBucket::Views, "m", "view"));
        pa.push(artifact(ArtifactBucket::Types, "m", "type"));
        pa.push(artifact(ArtifactBucket::AfterStructs, "m", "after-structs"));
        pa.push(artifact(ArtifactBucket::Structs, "m", "structs"));
        pa.push(artifact(ArtifactBucket::BeforeStructs, "m", "before-structs"));
        pa
    }

    #[rstest]
    fn test_persistence_order(all_buckets: PersistableArtifacts) {
        let order: Vec<&str> = all_buckets
            .persistence_order()
            .iter()
            .map(|a| a.artifact.text())
            .collect();
        assert_eq!(
            order,
            vec![
                "before-structs",
                "main",
                "structs",
                "after-structs",
                "type",
                "view",
                "content-all",
                "function",
                "procedure",
                "content",
                "after-content",
            ]
        );
    }

    #[rstest]
    fn test_empty_artifacts_are_skipped() {
        let mut pa = PersistableArtifacts::new(artifact(ArtifactBucket::Main, "m", ""));
        pa.push(artifact(ArtifactBucket::Views, "m", "view"));
        pa.push(artifact(ArtifactBucket::Content, "seed", ""));
        let order: Vec<&str> = pa.persistence_order().iter().map(|a| a.artifact.text()).collect();
        assert_eq!(order, vec!["view"]);

        let mut ph = InMemoryPersistence::new();
        pa.persist_all(&mut ph).unwrap();
        assert_eq!(ph.text("m"), Some("view"));
        assert_eq!(ph.text("seed"), None);
    }

    #[rstest]
    fn test_in_memory_appends_with_delimiter(all_buckets: PersistableArtifacts) {
        let mut ph = InMemoryPersistence::new();
        all_buckets.persist_all(&mut ph).unwrap();
        assert_eq!(ph.results().len(), 2);
        assert_eq!(ph.results()[0].logical_name, "m");
        assert_eq!(ph.text(ALL_CONTENT_ARTIFACT_NAME), Some("content-all"));
        assert_eq!(
            ph.text("m"),
            Some("before-structs\nmain\nstructs\nafter-structs\ntype\nview\nfunction\nprocedure\ncontent\nafter-content")
        );
    }

    #[rstest]
    fn test_in_memory_without_append_replaces() {
        let mut ph = InMemoryPersistence::new();
        let mut a = TextArtifact::new(ArtifactNature::Sql);
        a.append_text("first");
        ph.persist_text_artifact("x", &a, None).unwrap();
        let mut b = TextArtifact::new(ArtifactNature::Sql);
        b.append_text("second");
        let result = ph.persist_text_artifact("x", &b, None).unwrap();
        assert_eq!(ph.text("x"), Some("second"));
        assert_eq!(result.bytes, 6);
        assert_eq!(result.physical_name, "x.sql");
    }

    #[rstest]
    fn test_directory_persistence_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut ph = DirectoryPersistence::new(dir.path().join("out"));
        let appending = PersistOptions::appending("\n");

        let mut a = TextArtifact::new(ArtifactNature::Sql);
        a.append_text("CREATE TABLE a;");
        ph.persist_text_artifact("lib", &a, Some(&appending)).unwrap();
        let mut b = TextArtifact::new(ArtifactNature::Sql);
        b.append_text("CREATE VIEW v;");
        let result = ph.persist_text_artifact("lib", &b, Some(&appending)).unwrap();

        let written = fs::read_to_string(dir.path().join("out").join("lib.sql")).unwrap();
        assert_eq!(written, "CREATE TABLE a;\nCREATE VIEW v;");
        assert_eq!(result.bytes, written.len());
        assert_eq!(ph.results().len(), 1);
    }

    #[rstest]
    fn test_directory_persistence_overwrites_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lib.sql"), "stale").unwrap();
        let mut ph = DirectoryPersistence::new(dir.path());
        let mut a = TextArtifact::new(ArtifactNature::Sql);
        a.append_text("fresh");
        ph.persist_text_artifact("lib", &a, Some(&PersistOptions::appending("\n"))).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("lib.sql")).unwrap(), "fresh");
    }

    #[rstest]
    #[case("../../escaped")]
    #[case("nested/seed")]
    #[case("nested\\seed")]
    #[case("..")]
    #[case("/tmp/absolute")]
    #[case("")]
    fn test_directory_persistence_rejects_paths(#[case] name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("out");
        let mut ph = DirectoryPersistence::new(&root);
        let mut a = TextArtifact::new(ArtifactNature::Sql);
        a.append_text("INSERT INTO t VALUES (1);");

        let result = ph.persist_text_artifact(name, &a, None);

        assert!(matches!(result, Err(ForgeError::InvalidArtifactName(n)) if n == name));
        assert!(ph.results().is_empty());
        assert!(!root.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[rstest]
    fn test_directory_persistence_accepts_dotted_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut ph = DirectoryPersistence::new(dir.path());
        let mut a = TextArtifact::new(ArtifactNature::Sql);
        a.append_text("SELECT 1;");
        ph.persist_text_artifact("seed.v2", &a, None).unwrap();
        assert!(dir.path().join("seed.v2.sql").exists());
    }

    #[rstest]
    fn test_default_artifact_naming() {
        let naming = DefaultArtifactNaming::new("library");
        assert_eq!(naming.model_primary_artifact_name(), "library");
        assert_eq!(naming.view_artifact_name(None), "library");
        assert_eq!(naming.content_artifact_name(Some("seed")), "seed");
    }
}
