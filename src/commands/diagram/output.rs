//! Output formatting for diagram command results.

use crate::output::Outputable;
use super::execute::DiagramResult;

impl Outputable for DiagramResult {
    fn to_table(&self) -> String {
        if let Some(text) = &self.text {
            return text.clone();
        }

        let mut lines = vec![format!(
            "Diagram written: {} ({} bytes)",
            self.artifact.physical_name, self.artifact.bytes
        )];
        for d in &self.diagnostics {
            lines.push(format!("  [{}] {}: {}", d.code, d.subject, d.message));
        }
        lines.join("\n")
    }
}
