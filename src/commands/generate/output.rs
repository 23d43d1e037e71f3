//! Output formatting for generate command results.

use crate::output::Outputable;
use super::execute::GenerateResult;

impl Outputable for GenerateResult {
    fn to_table(&self) -> String {
        match self.texts.as_slice() {
            [] => self.summary(),
            [single] => single.text.clone(),
            texts => texts
                .iter()
                .map(|t| format!("-- artifact: {}\n{}", t.name, t.text))
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }
}

impl GenerateResult {
    fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Generated {} for {} ({})", self.model, self.dialect, self.naming));
        lines.push(format!("Output: {}", self.output));
        lines.push(String::new());

        lines.push(format!("Artifacts ({}):", self.artifacts.len()));
        for artifact in &self.artifacts {
            lines.push(format!(
                "  {} -> {} ({} bytes)",
                artifact.logical_name, artifact.physical_name, artifact.bytes
            ));
        }
        lines.push(String::new());

        if self.diagnostics.is_empty() {
            lines.push("No diagnostics.".to_string());
        } else {
            lines.push(format!("Diagnostics ({}):", self.diagnostics.len()));
            for d in &self.diagnostics {
                lines.push(format!("  [{}] {}: {}", d.code, d.subject, d.message));
            }
        }

        lines.join("\n")
    }
}
