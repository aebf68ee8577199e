//! Capability matcher.
//!
//! Ranks a benchmark registry against a requirement's capability tags and
//! free-text description. Pure and stateless: the score depends only on the
//! inputs, so concurrent callers need no coordination.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::registry::{BenchmarkDescriptor, BenchmarkRegistry};
use crate::tags::Tag;

/// Weight of the tag overlap in the composite score.
const TAG_WEIGHT: f64 = 0.7;
/// Weight of the description word overlap in the composite score.
const DESCRIPTION_WEIGHT: f64 = 0.3;
/// Cap on the description sub-score.
const DESCRIPTION_CAP: f64 = 0.3;

/// A single benchmark recommendation produced by [`Matcher::recommend`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// Registry key of the benchmark.
    pub benchmark_name: String,
    /// Display name of the benchmark.
    pub pretty_name: String,
    /// Composite match score in `[0, 1]`, rounded to three decimals.
    pub match_score: f64,
    /// Human-readable justification for the recommendation.
    pub reason: String,
    /// Requirement tags the benchmark covers, in requirement order.
    pub capabilities_covered: Vec<Tag>,
    /// Every tag the benchmark carries.
    pub all_tags: Vec<Tag>,
    /// The benchmark's description.
    pub description: String,
}

/// Scores benchmarks against an analyzed requirement.
pub struct Matcher<'a> {
    registry: &'a BenchmarkRegistry,
}

impl<'a> Matcher<'a> {
    /// Create a matcher over the given registry.
    pub fn new(registry: &'a BenchmarkRegistry) -> Self {
        Self { registry }
    }

    /// Rank benchmarks against the requirement.
    ///
    /// Returns benchmarks with a nonzero composite score, sorted descending
    /// by score, truncated to `top_k`. Ties keep registry insertion order.
    /// An empty tag list yields an empty result regardless of description,
    /// since the tag sub-score dominates and is zero without tags.
    pub fn recommend(
        &self,
        capabilities: &[Tag],
        description: &str,
        top_k: usize,
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = Vec::new();

        for benchmark in self.registry.iter() {
            let score = match_score(benchmark, capabilities, description);
            if score <= 0.0 {
                continue;
            }

            let matched: Vec<Tag> = capabilities
                .iter()
                .copied()
                .filter(|t| benchmark.has_tag(*t))
                .collect();

            results.push(MatchResult {
                benchmark_name: benchmark.name.clone(),
                pretty_name: benchmark.pretty_name.clone(),
                match_score: score,
                reason: build_reason(benchmark, &matched, score),
                capabilities_covered: matched,
                all_tags: benchmark.tags.clone(),
                description: benchmark.description.clone(),
            });
        }

        // Stable sort keeps registry order between equal scores.
        results.sort_by(|a, b| {
            b.match_score
                .partial_cmp(&a.match_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);
        results
    }
}

/// Composite match score: 0.7 x tag overlap + 0.3 x description overlap,
/// rounded to three decimals.
fn match_score(benchmark: &BenchmarkDescriptor, capabilities: &[Tag], description: &str) -> f64 {
    if capabilities.is_empty() {
        return 0.0;
    }

    let matched = capabilities
        .iter()
        .filter(|t| benchmark.has_tag(**t))
        .count();
    let tag_score = matched as f64 / capabilities.len() as f64;

    let mut description_score = 0.0;
    if !description.is_empty() {
        let benchmark_text = format!(
            "{} {}",
            benchmark.description,
            benchmark.use_cases.join(" ")
        )
        .to_lowercase();
        let benchmark_words: HashSet<&str> = benchmark_text.split_whitespace().collect();

        let description_lower = description.to_lowercase();
        let common = description_lower
            .split_whitespace()
            .collect::<HashSet<&str>>()
            .intersection(&benchmark_words)
            .count();
        if common > 0 {
            description_score = (common as f64 / 10.0).min(DESCRIPTION_CAP);
        }
    }

    let total = tag_score * TAG_WEIGHT + description_score * DESCRIPTION_WEIGHT;
    (total * 1000.0).round() / 1000.0
}

/// Assemble the justification string for a recommendation.
fn build_reason(benchmark: &BenchmarkDescriptor, matched: &[Tag], score: f64) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !matched.is_empty() {
        let labels: Vec<&str> = matched.iter().map(|t| t.human_label()).collect();
        parts.push(format!(
            "This requirement involves {}, and {} is designed to evaluate exactly these \
             capabilities.",
            labels.join(", "),
            benchmark.pretty_name
        ));
    }

    parts.push(benchmark.description.clone());

    if let Some(use_case) = benchmark.use_cases.first() {
        parts.push(format!("Typical scenario: {}.", use_case));
    }

    let verdict = if score >= 0.8 {
        "An excellent match; this benchmark is highly recommended."
    } else if score >= 0.5 {
        "A good match; this benchmark is recommended."
    } else {
        "A moderate match; usable as a fallback candidate."
    };
    parts.push(verdict.to_string());

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BenchmarkDescriptor;

    fn descriptor(name: &str, tags: Vec<Tag>, description: &str) -> BenchmarkDescriptor {
        BenchmarkDescriptor {
            name: name.to_string(),
            pretty_name: name.to_uppercase(),
            tags,
            description: description.to_string(),
            use_cases: vec![format!("{} scenarios", name)],
            metrics: vec!["acc".to_string()],
        }
    }

    #[test]
    fn test_single_matching_tag_scores_point_seven() {
        let registry = BenchmarkRegistry::builtin();
        let matcher = Matcher::new(&registry);

        let results = matcher.recommend(&[Tag::Coding], "", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].benchmark_name, "text2sql");
        assert_eq!(results[0].match_score, 0.7);
        assert_eq!(results[0].capabilities_covered, vec![Tag::Coding]);
    }

    #[test]
    fn test_empty_tag_list_yields_empty_results() {
        let registry = BenchmarkRegistry::builtin();
        let matcher = Matcher::new(&registry);

        let results = matcher.recommend(&[], "evaluate sql generation ability", 5);
        assert!(results.is_empty());
    }

    #[test]
    fn test_zero_score_benchmarks_are_excluded() {
        let registry = BenchmarkRegistry::builtin();
        let matcher = Matcher::new(&registry);

        let results = matcher.recommend(&[Tag::Coding], "", 5);
        assert!(results.iter().all(|r| r.benchmark_name == "text2sql"));
    }

    #[test]
    fn test_description_overlap_contributes_capped_score() {
        let registry = BenchmarkRegistry::from_descriptors(vec![descriptor(
            "qa",
            vec![Tag::Qa],
            "answer factual questions about the world",
        )])
        .unwrap();
        let matcher = Matcher::new(&registry);

        // Two overlapping words: "factual questions" -> 2/10 = 0.2 sub-score.
        let results = matcher.recommend(&[Tag::Qa], "factual questions", 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].match_score, 0.76);
    }

    #[test]
    fn test_top_k_truncation_and_registry_order_ties() {
        let registry = BenchmarkRegistry::from_descriptors(vec![
            descriptor("first", vec![Tag::Qa], "alpha"),
            descriptor("second", vec![Tag::Qa], "beta"),
            descriptor("third", vec![Tag::Qa], "gamma"),
        ])
        .unwrap();
        let matcher = Matcher::new(&registry);

        let results = matcher.recommend(&[Tag::Qa], "", 2);
        assert_eq!(results.len(), 2);
        // All scores tie at 0.7; registry insertion order decides.
        assert_eq!(results[0].benchmark_name, "first");
        assert_eq!(results[1].benchmark_name, "second");
    }

    #[test]
    fn test_results_sorted_descending_by_score() {
        let registry = BenchmarkRegistry::from_descriptors(vec![
            descriptor("partial", vec![Tag::Qa], "alpha"),
            descriptor("full", vec![Tag::Qa, Tag::Knowledge], "beta"),
        ])
        .unwrap();
        let matcher = Matcher::new(&registry);

        let results = matcher.recommend(&[Tag::Qa, Tag::Knowledge], "", 5);
        assert_eq!(results[0].benchmark_name, "full");
        assert_eq!(results[0].match_score, 0.7);
        assert_eq!(results[1].benchmark_name, "partial");
        assert_eq!(results[1].match_score, 0.35);
    }

    #[test]
    fn test_reason_names_capabilities_and_tier() {
        let registry = BenchmarkRegistry::builtin();
        let matcher = Matcher::new(&registry);

        let results = matcher.recommend(&[Tag::Coding], "", 5);
        let reason = &results[0].reason;
        assert!(reason.contains("code generation"));
        assert!(reason.contains("Text2SQL"));
        assert!(reason.contains("recommended"));
        assert!(!reason.is_empty());
    }
}
