//! CLI parsing tests for dialects command.

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use crate::commands::Command;
    use clap::Parser;
    use rstest::rstest;

    #[rstest]
    fn test_parses_without_args() {
        let args = Args::try_parse_from(["schema_forge", "dialects"]).unwrap();
        assert!(matches!(args.command, Command::Dialects(_)));
    }

    crate::cli_error_test! {
        command: "dialects",
        test_name: test_rejects_unknown_flag,
        args: ["--model", "library.json"],
    }
}
