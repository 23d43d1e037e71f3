//! Shared test utilities for unit, execute and output tests.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::model::RelationalModel;

/// Create a temporary file containing the given content.
///
/// Used to hand model JSON to commands that read from disk.
pub fn create_temp_json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

/// The two-table library model:
/// `Author{id, name}` and `Book{id, title, author_id -> Author.id}`.
///
/// Loaded from the fixture the integration tests share.
pub fn author_book_model() -> RelationalModel {
    RelationalModel::from_json_str(include_str!("../tests/fixtures/library.json"))
        .expect("Library fixture should parse")
}

/// [`author_book_model`] serialized to a temporary JSON file.
pub fn author_book_model_file() -> NamedTempFile {
    let json = serde_json::to_string_pretty(&author_book_model()).expect("Model should serialize");
    create_temp_json_file(&json)
}
