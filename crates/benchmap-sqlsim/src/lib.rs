//! SQL structural similarity scoring.
//!
//! Scores a predicted SQL statement against a reference by tokenizing both,
//! normalizing literals to placeholders, grouping tokens under the SQL
//! clause keyword that precedes them, and averaging per-clause Jaccard
//! similarity. The grouping is a heuristic token bucketing, not a parser;
//! it is deliberately order-insensitive within a clause so equivalent
//! rewrites score well.
//!
//! Everything here is pure and synchronous: no I/O, no shared state, safe
//! to call from any number of concurrent callers.

pub mod clauses;
pub mod extract;
pub mod lexer;
pub mod similarity;

pub use clauses::{group_by_clause, ClauseGroups, CLAUSE_KEYWORDS, OTHER_BUCKET};
pub use extract::{extract_sql, first_sql_candidate};
pub use lexer::{normalize, tokenize, NUM_PLACEHOLDER, STR_PLACEHOLDER};
pub use similarity::{clause_similarity, similarity, SqlAstSimilarity};
