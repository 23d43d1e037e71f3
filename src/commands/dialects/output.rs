//! Output formatting for dialects command results.

use crate::output::Outputable;
use super::execute::DialectsResult;

impl Outputable for DialectsResult {
    fn to_table(&self) -> String {
        let mut lines = vec![format!("Dialects ({}):", self.dialects.len())];

        for d in &self.dialects {
            let marker = if d.name == self.selected { "*" } else { " " };
            let routines = if d.routines { "routines" } else { "tables only" };
            lines.push(format!(
                " {} {} [{}] naming={} .{} {}",
                marker,
                d.name,
                d.aliases.join(", "),
                d.naming,
                d.extension,
                routines
            ));
            lines.push(format!("     {}", d.naming_description));
        }
        lines.push(String::new());

        lines.push("Naming strategies:".to_string());
        lines.extend(self.naming_strategies.iter().map(|n| format!("  {}", n)));

        lines.join("\n")
    }
}
