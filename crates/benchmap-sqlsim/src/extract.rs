//! Candidate-SQL extraction from raw model output.
//!
//! Model responses wrap SQL in prose, fenced code blocks, or both. This
//! module pulls out zero or more candidate statements: fenced blocks first,
//! then a heuristic `SELECT`/`WITH` statement scan over the raw text.

use std::sync::LazyLock;

use regex::Regex;

/// A fenced code block, optionally labeled `sql`.
static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:sql)?[ \t]*\n?(.*?)```").expect("fenced block regex is valid")
});

/// Heuristic statement scan: from a SELECT or WITH keyword up to the next
/// semicolon, or the end of the text.
static STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\b(?:select|with)\b.*?(?:;|$)").expect("statement regex is valid")
});

fn looks_like_sql(candidate: &str) -> bool {
    let lower = candidate.trim_start().to_lowercase();
    lower.starts_with("select") || lower.starts_with("with")
}

/// Extract candidate SQL statements from raw model output.
///
/// Fenced code blocks that look like SQL win; when none exist, falls back
/// to scanning the raw text for `SELECT`/`WITH` statements. Candidates are
/// trimmed but otherwise untouched.
pub fn extract_sql(text: &str) -> Vec<String> {
    let fenced: Vec<String> = FENCED_BLOCK
        .captures_iter(text)
        .map(|cap| cap[1].trim().to_string())
        .filter(|candidate| !candidate.is_empty() && looks_like_sql(candidate))
        .collect();
    if !fenced.is_empty() {
        return fenced;
    }

    STATEMENT
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|candidate| !candidate.is_empty())
        .collect()
}

/// First extracted candidate, if any.
pub fn first_sql_candidate(text: &str) -> Option<String> {
    extract_sql(text).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_labeled_fenced_block() {
        let text = "Here is the query:\n```sql\nSELECT a FROM t;\n```\nDone.";
        assert_eq!(extract_sql(text), vec!["SELECT a FROM t;"]);
    }

    #[test]
    fn test_extracts_unlabeled_fenced_block() {
        let text = "```\nSELECT a FROM t\n```";
        assert_eq!(extract_sql(text), vec!["SELECT a FROM t"]);
    }

    #[test]
    fn test_ignores_non_sql_fenced_blocks() {
        let text = "```python\nprint('hello')\n```\nThe query is SELECT a FROM t;";
        assert_eq!(extract_sql(text), vec!["SELECT a FROM t;"]);
    }

    #[test]
    fn test_heuristic_scan_without_fences() {
        let text = "The answer is SELECT name FROM employees WHERE id = 1; as requested.";
        assert_eq!(
            extract_sql(text),
            vec!["SELECT name FROM employees WHERE id = 1;"]
        );
    }

    #[test]
    fn test_with_statement_recognized() {
        let text = "WITH cte AS (SELECT 1) SELECT * FROM cte";
        let candidates = extract_sql(text);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].starts_with("WITH"));
    }

    #[test]
    fn test_multiple_statements() {
        let text = "SELECT a FROM t; SELECT b FROM u;";
        assert_eq!(
            extract_sql(text),
            vec!["SELECT a FROM t;", "SELECT b FROM u;"]
        );
    }

    #[test]
    fn test_no_candidates_in_plain_prose() {
        assert!(extract_sql("I cannot answer that.").is_empty());
        assert!(first_sql_candidate("I cannot answer that.").is_none());
    }

    #[test]
    fn test_first_candidate_prefers_fenced_blocks() {
        let text = "SELECT wrong FROM prose;\n```sql\nSELECT right FROM block;\n```";
        assert_eq!(
            first_sql_candidate(text).unwrap(),
            "SELECT right FROM block;"
        );
    }
}
