//! SQL tokenization and literal normalization.

use std::sync::LazyLock;

use regex::Regex;

/// Placeholder substituted for string literals.
pub const STR_PLACEHOLDER: &str = "<STR>";
/// Placeholder substituted for numeric literals.
pub const NUM_PLACEHOLDER: &str = "<NUM>";

/// Lexical grammar, in priority order: quoted strings (with doubled-quote
/// escaping), numbers, words, multi-character comparison operators, single
/// punctuation.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'(?:''|[^'])*'|"(?:""|[^"])*"|\d+\.?\d*|\w+|[<>=!]+|[(),;.*]"#)
        .expect("token regex is valid")
});

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\d*$").expect("number regex is valid"));

/// Tokenize a SQL string. Input is lowercased first, so tokenization is
/// case-insensitive; anything the grammar does not recognize is skipped.
pub fn tokenize(sql: &str) -> Vec<String> {
    let sql = sql.to_lowercase();
    TOKEN_REGEX
        .find_iter(&sql)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Replace literal tokens with placeholders: string literals become
/// [`STR_PLACEHOLDER`], numeric literals [`NUM_PLACEHOLDER`]; everything
/// else passes through unchanged.
pub fn normalize(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|token| {
            if token.starts_with('\'') || token.starts_with('"') {
                STR_PLACEHOLDER.to_string()
            } else if NUMBER_REGEX.is_match(&token) {
                NUM_PLACEHOLDER.to_string()
            } else {
                token
            }
        })
        .collect()
}
