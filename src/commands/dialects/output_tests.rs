//! Output formatting tests for dialects command.

#[cfg(test)]
mod tests {
    use super::super::{DialectInfo, DialectsResult};
    use rstest::{fixture, rstest};

    const TABLE: &str = "\
Dialects (2):
 * postgresql [postgresql, postgres] naming=lowercase_all .sql routines
     entity and attribute names are snake_cased and then lowercased
   sqlite [sqlite, sqlite3] naming=uppercase_all .sql tables only
     entity and attribute names are snake_cased and then uppercased

Naming strategies:
  uppercase
  lowercase";

    #[fixture]
    fn listing() -> DialectsResult {
        DialectsResult {
            selected: "postgresql".to_string(),
            dialects: vec![
                DialectInfo {
                    name: "postgresql".to_string(),
                    aliases: vec!["postgresql".to_string(), "postgres".to_string()],
                    naming: "lowercase_all".to_string(),
                    naming_description: "entity and attribute names are snake_cased and then lowercased".to_string(),
                    routines: true,
                    extension: "sql".to_string(),
                },
                DialectInfo {
                    name: "sqlite".to_string(),
                    aliases: vec!["sqlite".to_string(), "sqlite3".to_string()],
                    naming: "uppercase_all".to_string(),
                    naming_description: "entity and attribute names are snake_cased and then uppercased".to_string(),
                    routines: false,
                    extension: "sql".to_string(),
                },
            ],
            naming_strategies: vec!["uppercase".to_string(), "lowercase".to_string()],
        }
    }

    crate::output_table_test! {
        test_name: test_to_table,
        fixture: listing,
        fixture_type: DialectsResult,
        expected: TABLE,
    }

    crate::output_table_contains_test! {
        test_name: test_to_table_marks_selected,
        fixture: listing,
        fixture_type: DialectsResult,
        contains: [" * postgresql", "   sqlite"],
    }

    crate::output_json_test! {
        test_name: test_format_json,
        fixture: listing,
        fixture_type: DialectsResult,
        assertions: {
            "selected": "postgresql",
            "naming_strategies": serde_json::json!(["uppercase", "lowercase"]),
        },
    }

    crate::output_toon_test! {
        test_name: test_format_toon,
        fixture: listing,
        fixture_type: DialectsResult,
        contains: ["selected: postgresql", "dialects["],
    }
}
