//! Text helpers for SQL generation.

/// Escape a string for a single-quoted SQL literal.
///
/// SQL has no backslash escapes; quotes are doubled and NUL is dropped since
/// neither engine accepts it inside text.
pub fn escape_sql_literal(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '\'' => result.push_str("''"),
            '\0' => {}
            c => result.push(c),
        }
    }
    result
}

/// Quote a string as a SQL literal.
#[inline]
pub fn quote_sql_literal(s: &str) -> String {
    format!("'{}'", escape_sql_literal(s))
}

/// Greedy word wrap on whitespace; words longer than `width` get a line of their own.
pub fn word_wrap(text: &str, width: usize, newline: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join(newline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hello", "hello")]
    #[case("O'Brien", "O''Brien")]
    #[case("''", "''''")]
    #[case("line\nbreak", "line\nbreak")]
    #[case("nul\0byte", "nulbyte")]
    fn test_escape_sql_literal(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(escape_sql_literal(input), expected);
    }

    #[rstest]
    fn test_quote_sql_literal() {
        assert_eq!(quote_sql_literal("it's"), "'it''s'");
    }

    #[rstest]
    fn test_word_wrap_short_text_unchanged() {
        assert_eq!(word_wrap("a, b, c", 80, "\n  "), "a, b, c");
    }

    #[rstest]
    fn test_word_wrap_breaks_at_width() {
        assert_eq!(
            word_wrap("alpha, beta, gamma, delta", 12, "\n  "),
            "alpha, beta,\n  gamma, delta"
        );
    }

    #[rstest]
    fn test_word_wrap_long_word() {
        assert_eq!(word_wrap("tiny enormous_identifier x", 5, "\n"), "tiny\nenormous_identifier\nx");
    }
}
