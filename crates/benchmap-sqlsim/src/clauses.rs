//! Clause-wise token grouping.
//!
//! Walks a normalized token stream and buckets tokens under the most recent
//! clause keyword. Tokens seen before any clause keyword land in a
//! synthetic `other` bucket. Keyword tokens themselves are consumed, not
//! emitted.

use std::collections::BTreeMap;

/// Recognized clause keywords. Multi-word keywords are matched before their
/// single-word suffixes (longest match first).
pub const CLAUSE_KEYWORDS: [&str; 11] = [
    "select",
    "from",
    "where",
    "group by",
    "order by",
    "limit",
    "having",
    "join",
    "left join",
    "right join",
    "on",
];

/// Bucket for tokens that precede any recognized clause keyword.
pub const OTHER_BUCKET: &str = "other";

/// Mapping from clause keyword (or [`OTHER_BUCKET`]) to the ordered tokens
/// that followed it.
pub type ClauseGroups = BTreeMap<String, Vec<String>>;

/// Return the longest clause keyword starting at `tokens[i]`, along with
/// the number of tokens it spans.
fn clause_at(tokens: &[String], i: usize) -> Option<(&'static str, usize)> {
    let mut best: Option<(&'static str, usize)> = None;
    for clause in CLAUSE_KEYWORDS {
        let words: Vec<&str> = clause.split(' ').collect();
        if tokens.len() - i < words.len() {
            continue;
        }
        let matches = words.iter().enumerate().all(|(k, w)| tokens[i + k] == *w);
        if matches && best.map_or(true, |(_, n)| words.len() > n) {
            best = Some((clause, words.len()));
        }
    }
    best
}

/// Group tokens by the clause keyword preceding them.
///
/// Re-entering a clause (a second `select` from a subquery, say) appends to
/// the existing bucket; the grouping is a flat heuristic, not a parse tree.
pub fn group_by_clause(tokens: &[String]) -> ClauseGroups {
    let mut groups = ClauseGroups::new();
    let mut current: Option<&'static str> = None;

    let mut i = 0;
    while i < tokens.len() {
        if let Some((clause, span)) = clause_at(tokens, i) {
            current = Some(clause);
            groups.entry(clause.to_string()).or_default();
            i += span;
        } else {
            let bucket = current.unwrap_or(OTHER_BUCKET);
            groups
                .entry(bucket.to_string())
                .or_default()
                .push(tokens[i].clone());
            i += 1;
        }
    }

    groups
}
