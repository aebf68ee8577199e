//! Clause-wise Jaccard similarity between SQL statements.

use std::collections::{BTreeSet, HashSet};

use crate::clauses::{group_by_clause, ClauseGroups};
use crate::lexer::{normalize, tokenize};

/// Similarity between two clause groupings.
///
/// For each clause in the union of both key sets: 1.0 when both buckets are
/// empty, 0.0 when exactly one is, otherwise the Jaccard similarity of the
/// two token sets. The result is the arithmetic mean over all clauses, or
/// 1.0 when the union is empty.
pub fn clause_similarity(a: &ClauseGroups, b: &ClauseGroups) -> f64 {
    let clauses: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
    if clauses.is_empty() {
        return 1.0;
    }

    let mut total = 0.0;
    for clause in &clauses {
        let tokens_a = a.get(*clause).map(Vec::as_slice).unwrap_or(&[]);
        let tokens_b = b.get(*clause).map(Vec::as_slice).unwrap_or(&[]);

        total += match (tokens_a.is_empty(), tokens_b.is_empty()) {
            (true, true) => 1.0,
            (true, false) | (false, true) => 0.0,
            (false, false) => {
                let set_a: HashSet<&str> = tokens_a.iter().map(String::as_str).collect();
                let set_b: HashSet<&str> = tokens_b.iter().map(String::as_str).collect();
                let intersection = set_a.intersection(&set_b).count();
                let union = set_a.union(&set_b).count();
                intersection as f64 / union as f64
            }
        };
    }

    total / clauses.len() as f64
}

/// Normalize one side of a comparison: collapse newlines to spaces, strip
/// surrounding whitespace and the trailing statement terminator, then
/// tokenize, normalize literals and group by clause.
fn prepare(sql: &str) -> ClauseGroups {
    let sql = sql.replace('\n', " ");
    let sql = sql.trim().trim_end_matches(';').trim_end();
    group_by_clause(&normalize(tokenize(sql)))
}

/// Structural similarity between a predicted and a reference SQL statement,
/// in `[0, 1]`. Empty input on either side scores 0.0 rather than erroring.
pub fn similarity(prediction: &str, reference: &str) -> f64 {
    if prediction.trim().is_empty() || reference.trim().is_empty() {
        return 0.0;
    }
    clause_similarity(&prepare(prediction), &prepare(reference))
}

/// The `sql_ast_sim` metric: pairwise structural similarity over parallel
/// prediction/reference slices.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlAstSimilarity;

impl SqlAstSimilarity {
    /// Metric name as reported by the evaluation harness.
    pub const NAME: &'static str = "sql_ast_sim";

    /// Score each prediction against its reference.
    pub fn apply(&self, predictions: &[String], references: &[String]) -> Vec<f64> {
        predictions
            .iter()
            .zip(references.iter())
            .map(|(pred, reference)| similarity(pred, reference))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_statements_score_one() {
        let sql = "SELECT name FROM employees WHERE salary > 5000";
        assert_eq!(similarity(sql, sql), 1.0);
    }

    #[test]
    fn test_identical_after_normalization_scores_one() {
        // Different literals normalize to the same placeholders; case and
        // trailing terminators are ignored.
        let a = "SELECT name FROM employees WHERE salary > 5000;";
        let b = "select name\nfrom employees where salary > 9999";
        assert_eq!(similarity(a, b), 1.0);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(similarity("", "SELECT 1"), 0.0);
        assert_eq!(similarity("SELECT 1", ""), 0.0);
        assert_eq!(similarity("   ", "SELECT 1"), 0.0);
    }

    #[test]
    fn test_symmetry_under_argument_swap() {
        let a = "SELECT name, dept FROM employees WHERE salary > 5000";
        let b = "SELECT name FROM employees ORDER BY salary";
        assert_eq!(similarity(a, b), similarity(b, a));
    }

    #[test]
    fn test_disjoint_statements_score_zero() {
        let a = "SELECT alpha FROM beta";
        let b = "SELECT delta FROM epsilon";
        // Both clauses are present on both sides with disjoint token sets.
        assert_eq!(similarity(a, b), 0.0);
    }

    #[test]
    fn test_partial_overlap_scores_strictly_between() {
        let pred = "SELECT name FROM employees WHERE salary > 5000";
        let reference = "SELECT name, dept FROM employees WHERE salary > 5000";

        let score = similarity(pred, reference);
        assert!(score > 0.0 && score < 1.0, "score was {}", score);

        // from and where match exactly; only the select clause differs:
        // {name} vs {name, ",", dept} -> Jaccard 1/3.
        let expected = (1.0 / 3.0 + 1.0 + 1.0) / 3.0;
        assert!((score - expected).abs() < 1e-12, "score was {}", score);
    }

    #[test]
    fn test_order_within_a_clause_is_ignored() {
        let a = "SELECT a, b FROM t";
        let b = "SELECT b, a FROM t";
        assert_eq!(similarity(a, b), 1.0);
    }

    #[test]
    fn test_one_sided_clause_scores_zero_for_that_clause() {
        let a = "SELECT a FROM t";
        let b = "SELECT a FROM t LIMIT 10";
        // select and from match (1.0 each); limit exists on one side only
        // with tokens -> 0.0 for that clause.
        let expected = (1.0 + 1.0 + 0.0) / 3.0;
        assert!((similarity(a, b) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_metric_applies_pairwise() {
        let metric = SqlAstSimilarity;
        let predictions = vec![
            "SELECT a FROM t".to_string(),
            String::new(),
        ];
        let references = vec![
            "SELECT a FROM t".to_string(),
            "SELECT b FROM u".to_string(),
        ];

        let scores = metric.apply(&predictions, &references);
        assert_eq!(scores, vec![1.0, 0.0]);
    }
}
