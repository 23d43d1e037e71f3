//! CLI parsing tests for generate command using the test DSL.

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use rstest::rstest;
    use std::path::PathBuf;

    // =========================================================================
    // Macro-generated tests (standard patterns)
    // =========================================================================

    crate::cli_required_arg_test! {
        command: "generate",
        test_name: test_requires_model,
        required_arg: "--model",
    }

    crate::cli_defaults_test! {
        command: "generate",
        variant: Generate,
        required_args: ["--model", "library.json"],
        defaults: {
            dialect: None,
            naming: None,
            out: None,
            driver_script: false,
        },
    }

    crate::cli_option_test! {
        command: "generate",
        variant: Generate,
        test_name: test_with_model,
        args: ["--model", "library.json"],
        field: model,
        expected: PathBuf::from("library.json"),
    }

    crate::cli_option_test_with_required! {
        command: "generate",
        variant: Generate,
        required_args: ["--model", "library.json"],
        test_name: test_with_dialect,
        args: ["--dialect", "sqlite"],
        field: dialect,
        expected: Some("sqlite".to_string()),
    }

    crate::cli_option_test_with_required! {
        command: "generate",
        variant: Generate,
        required_args: ["-m", "library.json"],
        test_name: test_with_short_dialect,
        args: ["-d", "postgres"],
        field: dialect,
        expected: Some("postgres".to_string()),
    }

    crate::cli_option_test_with_required! {
        command: "generate",
        variant: Generate,
        required_args: ["--model", "library.json"],
        test_name: test_with_naming,
        args: ["--naming", "lowercase:common_pk_col_named_id"],
        field: naming,
        expected: Some("lowercase:common_pk_col_named_id".to_string()),
    }

    crate::cli_option_test_with_required! {
        command: "generate",
        variant: Generate,
        required_args: ["--model", "library.json"],
        test_name: test_with_out,
        args: ["--out", "sql"],
        field: out,
        expected: Some(PathBuf::from("sql")),
    }

    crate::cli_option_test_with_required! {
        command: "generate",
        variant: Generate,
        required_args: ["--model", "library.json"],
        test_name: test_with_driver_script,
        args: ["--driver-script"],
        field: driver_script,
        expected: true,
    }

    crate::cli_error_test! {
        command: "generate",
        test_name: test_out_requires_value,
        args: ["--model", "library.json", "--out"],
    }

    // =========================================================================
    // Global options
    // =========================================================================

    #[rstest]
    fn test_global_format_and_config() {
        let args = Args::try_parse_from([
            "schema_forge",
            "generate",
            "--model",
            "library.json",
            "--format",
            "json",
            "--config",
            "forge.json",
        ])
        .unwrap();
        assert_eq!(args.format, crate::output::OutputFormat::Json);
        assert_eq!(args.config, Some(PathBuf::from("forge.json")));
    }
}
