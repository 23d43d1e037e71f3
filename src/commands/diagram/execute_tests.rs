//! Execute tests for diagram command.

#[cfg(test)]
mod tests {
    use super::super::DiagramCmd;
    use rstest::{fixture, rstest};
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[fixture]
    fn model_file() -> NamedTempFile {
        crate::test_utils::author_book_model_file()
    }

    fn cmd(model_file: &NamedTempFile, out: Option<PathBuf>) -> DiagramCmd {
        DiagramCmd {
            model: model_file.path().to_path_buf(),
            dialect: Some("postgresql".to_string()),
            out,
            all: false,
        }
    }

    crate::execute_test! {
        test_name: test_diagram_to_stdout,
        fixture: model_file,
        cmd: cmd(&model_file, None),
        assertions: |result| {
            assert_eq!(result.model, "library");
            assert_eq!(result.dialect, "postgresql");
            assert_eq!(result.artifact.logical_name, "library");
            assert_eq!(result.artifact.physical_name, "library.puml");
            let text = result.text.expect("stdout diagrams carry their text");
            assert!(text.starts_with("@startuml library\n"));
            assert!(text.contains("  entity \"book\" as book {"));
            assert!(text.ends_with("  author |o..o| book\n@enduml"));
            assert!(result.diagnostics.is_empty());
        },
    }

    crate::execute_test! {
        test_name: test_diagram_uses_dialect_naming,
        fixture: model_file,
        cmd: DiagramCmd {
            dialect: Some("sqlite".to_string()),
            ..cmd(&model_file, None)
        },
        assertions: |result| {
            assert_eq!(result.dialect, "sqlite");
            assert!(result.text.unwrap().contains("  entity \"AUTHOR\" as AUTHOR {"));
        },
    }

    #[rstest]
    fn test_diagram_to_directory(model_file: NamedTempFile) {
        use crate::commands::Execute;

        let dir = tempfile::tempdir().unwrap();
        let result = cmd(&model_file, Some(dir.path().to_path_buf()))
            .execute(&crate::config::ConfigFile::default())
            .unwrap();

        assert!(result.text.is_none());
        let written = std::fs::read_to_string(dir.path().join("library.puml")).unwrap();
        assert_eq!(written.len(), result.artifact.bytes);
        assert!(written.starts_with("@startuml library\n"));
    }

    #[rstest]
    fn test_missing_model_file() {
        use crate::commands::Execute;
        let cmd = DiagramCmd {
            model: PathBuf::from("/nonexistent/library.json"),
            dialect: None,
            out: None,
            all: false,
        };
        assert!(cmd.execute(&crate::config::ConfigFile::default()).is_err());
    }
}
