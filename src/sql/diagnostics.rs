//! Soft failures raised while generating SQL.
//!
//! A generator that cannot produce a fragment returns `Err(Diagnostic)`. The
//! [`Diagnostics`] collector turns that into a comment token placed where the
//! fragment would have been, records it, and logs it, so the script is still
//! produced in full and every problem is greppable by its code.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    /// No type mapper matches the column
    #[serde(rename = "SQT000")]
    TypeNotFound,
    /// A relationship points at something that cannot be resolved
    #[serde(rename = "SQT001")]
    RelationshipRefNotFound,
    /// A self reference points at a primary key whose type cannot be resolved
    #[serde(rename = "SQT002")]
    SelfRefPkTypeNotFound,
    /// A self reference lives in an entity without a primary key
    #[serde(rename = "SQT003")]
    SelfRefNoPrimaryKey,
    #[serde(rename = "SQT004")]
    ReferenceCycle,
    #[serde(rename = "RDBMS_0901")]
    ContentTableNotFound,
    #[serde(rename = "RDBMS_0902")]
    ContentColumnNotFound,
    #[serde(rename = "RDBMS_0903")]
    InvalidContentValue,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::TypeNotFound => "SQT000",
            DiagnosticCode::RelationshipRefNotFound => "SQT001",
            DiagnosticCode::SelfRefPkTypeNotFound => "SQT002",
            DiagnosticCode::SelfRefNoPrimaryKey => "SQT003",
            DiagnosticCode::ReferenceCycle => "SQT004",
            DiagnosticCode::ContentTableNotFound => "RDBMS_0901",
            DiagnosticCode::ContentColumnNotFound => "RDBMS_0902",
            DiagnosticCode::InvalidContentValue => "RDBMS_0903",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("[{code}] {message}")]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    /// Qualified name of the offending object, e.g. `Book.author_id`
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Inline comment usable anywhere a SQL token may appear.
    pub fn as_comment(&self) -> String {
        format!("/* [{}] {} */", self.code, self.message.replace("*/", "* /"))
    }

    /// Whole-line comment standing in for a statement.
    pub fn as_line_comment(&self) -> String {
        format!("-- [{}] {}", self.code, self.message.replace('\n', " "))
    }
}

/// Collects diagnostics raised during one generation run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        warn!(
            code = %diagnostic.code,
            subject = %diagnostic.subject,
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    /// Unwrap a fragment, replacing a failure with its inline comment.
    pub fn render(&mut self, fragment: Result<String, Diagnostic>) -> String {
        match fragment {
            Ok(text) => text,
            Err(diagnostic) => {
                let comment = diagnostic.as_comment();
                self.record(diagnostic);
                comment
            }
        }
    }

    /// Like [`Diagnostics::render`] but for statements: failures become a line comment.
    pub fn render_line(&mut self, statement: Result<String, Diagnostic>) -> String {
        match statement {
            Ok(text) => text,
            Err(diagnostic) => {
                let comment = diagnostic.as_line_comment();
                self.record(diagnostic);
                comment
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_render_ok_passes_through() {
        let mut diags = Diagnostics::new();
        assert_eq!(diags.render(Ok("INTEGER".to_string())), "INTEGER");
        assert!(diags.is_empty());
    }

    #[rstest]
    fn test_render_err_becomes_comment_and_is_recorded() {
        let mut diags = Diagnostics::new();
        let text = diags.render(Err(Diagnostic::new(
            DiagnosticCode::TypeNotFound,
            "Book.cover",
            "type not found for Book.cover",
        )));
        assert_eq!(text, "/* [SQT000] type not found for Book.cover */");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.iter().next().unwrap().subject, "Book.cover");
    }

    #[rstest]
    fn test_comment_cannot_be_closed_early() {
        let diag = Diagnostic::new(DiagnosticCode::InvalidContentValue, "x", "bad */ value");
        assert_eq!(diag.as_comment(), "/* [RDBMS_0903] bad * / value */");
    }

    #[rstest]
    fn test_line_comment() {
        let diag = Diagnostic::new(DiagnosticCode::ContentTableNotFound, "Publisher", "table Publisher not found");
        assert_eq!(diag.as_line_comment(), "-- [RDBMS_0901] table Publisher not found");
    }

    #[rstest]
    fn test_code_serializes_as_stable_string() {
        let json = serde_json::to_string(&DiagnosticCode::ReferenceCycle).unwrap();
        assert_eq!(json, "\"SQT004\"");
    }
}
