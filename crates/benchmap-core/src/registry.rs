//! Benchmark metadata registry.
//!
//! Descriptors are populated once at construction and never mutated; the
//! registry preserves insertion order so that score ties in the matcher
//! break deterministically.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tags::Tag;

/// Errors raised by registry construction and lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A name was looked up that no descriptor carries. This signals an
    /// invalid configuration or a typo; callers must validate names against
    /// the registry before using them downstream.
    #[error("Unknown benchmark: {0}")]
    UnknownBenchmark(String),

    /// Two descriptors with the same name were supplied at construction.
    #[error("Duplicate benchmark name: {0}")]
    DuplicateBenchmark(String),
}

/// Immutable metadata for a single benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkDescriptor {
    /// Registry key, e.g. `text2sql`.
    pub name: String,
    /// Display name, e.g. `Text2SQL`.
    pub pretty_name: String,
    /// Capabilities this benchmark exercises.
    pub tags: Vec<Tag>,
    /// One-paragraph description of what the benchmark measures.
    pub description: String,
    /// Scenarios the benchmark is suited for, most relevant first.
    pub use_cases: Vec<String>,
    /// Metric names the harness reports for this benchmark.
    pub metrics: Vec<String>,
}

impl BenchmarkDescriptor {
    /// Whether this benchmark exercises the given capability.
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Read-only, insertion-ordered collection of benchmark descriptors.
///
/// Constructed once and shared read-only across all matching calls; no
/// concurrent writer exists.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRegistry {
    entries: Vec<BenchmarkDescriptor>,
    index: HashMap<String, usize>,
}

impl BenchmarkRegistry {
    /// Build a registry from descriptors, preserving their order.
    pub fn from_descriptors(
        descriptors: Vec<BenchmarkDescriptor>,
    ) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (i, descriptor) in descriptors.iter().enumerate() {
            if index.insert(descriptor.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateBenchmark(descriptor.name.clone()));
            }
        }
        Ok(Self {
            entries: descriptors,
            index,
        })
    }

    /// The built-in registry of supported benchmarks.
    pub fn builtin() -> Self {
        let descriptors = vec![
            BenchmarkDescriptor {
                name: "FRAMES".to_string(),
                pretty_name: "FRAMES".to_string(),
                tags: vec![Tag::Reasoning, Tag::LongContext],
                description: "FRAMES is a comprehensive evaluation dataset designed to test \
                              retrieval-augmented generation systems on factuality, retrieval \
                              accuracy and reasoning."
                    .to_string(),
                use_cases: vec![
                    "Evaluating a model's reasoning over long textual contexts".to_string(),
                    "Evaluating the retrieval and generation quality of RAG systems".to_string(),
                    "Evaluating complex multi-step reasoning tasks".to_string(),
                    "Evaluating performance on knowledge-intensive tasks".to_string(),
                ],
                metrics: vec!["acc".to_string()],
            },
            BenchmarkDescriptor {
                name: "text2sql".to_string(),
                pretty_name: "Text2SQL".to_string(),
                tags: vec![Tag::Coding],
                description: "Text2SQL evaluates a model's ability to translate natural-language \
                              questions into SQL queries."
                    .to_string(),
                use_cases: vec![
                    "Evaluating a model's understanding of database schemas".to_string(),
                    "Evaluating translation of natural language into database queries".to_string(),
                    "Evaluating performance on SQL-related tasks".to_string(),
                ],
                metrics: vec!["sql_ast_sim".to_string()],
            },
            BenchmarkDescriptor {
                name: "halu_eval".to_string(),
                pretty_name: "HaluEval".to_string(),
                tags: vec![Tag::Knowledge, Tag::Hallucination, Tag::YesNo],
                description: "HaluEval is a large collection of generated and human-annotated \
                              hallucinated samples for evaluating how well LLMs recognize \
                              hallucination."
                    .to_string(),
                use_cases: vec![
                    "Evaluating a model's ability to recognize hallucinations".to_string(),
                    "Evaluating a model's factual accuracy".to_string(),
                    "Evaluating truthfulness in dialogue, QA and summarization tasks".to_string(),
                    "Evaluating discrimination between genuine and fabricated information"
                        .to_string(),
                ],
                metrics: vec![
                    "accuracy".to_string(),
                    "precision".to_string(),
                    "recall".to_string(),
                    "f1_score".to_string(),
                    "yes_ratio".to_string(),
                ],
            },
            BenchmarkDescriptor {
                name: "general_qa".to_string(),
                pretty_name: "General QA".to_string(),
                tags: vec![Tag::Qa, Tag::Knowledge],
                description: "A general question-answering dataset for evaluating a model's \
                              performance on broad knowledge questions."
                    .to_string(),
                use_cases: vec![
                    "Evaluating general knowledge question answering".to_string(),
                    "Evaluating a model's ability to answer factual questions".to_string(),
                    "Evaluating performance on open-domain QA".to_string(),
                    "Evaluating basic knowledge understanding".to_string(),
                ],
                metrics: vec!["acc".to_string()],
            },
            BenchmarkDescriptor {
                name: "general_fc".to_string(),
                pretty_name: "General Function Call".to_string(),
                tags: vec![Tag::FunctionCalling],
                description: "A general function-calling dataset for evaluating a model's \
                              ability to understand and execute function calls."
                    .to_string(),
                use_cases: vec![
                    "Evaluating an agent's function-calling ability".to_string(),
                    "Evaluating an agent's tool use".to_string(),
                    "Evaluating a model's understanding of API invocations".to_string(),
                    "Evaluating performance in tool-use scenarios".to_string(),
                ],
                metrics: vec!["acc".to_string()],
            },
        ];

        // Names in the built-in table are unique by construction.
        Self::from_descriptors(descriptors).expect("built-in registry is well-formed")
    }

    /// Look up a descriptor by name; unknown names are a hard error.
    pub fn get(&self, name: &str) -> Result<&BenchmarkDescriptor, RegistryError> {
        self.lookup(name)
            .ok_or_else(|| RegistryError::UnknownBenchmark(name.to_string()))
    }

    /// Look up a descriptor by name.
    pub fn lookup(&self, name: &str) -> Option<&BenchmarkDescriptor> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Whether a benchmark with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate descriptors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BenchmarkDescriptor> {
        self.entries.iter()
    }

    /// Benchmark names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|d| d.name.as_str()).collect()
    }

    /// All descriptors exercising at least one of the given tags.
    pub fn by_tags(&self, tags: &[Tag]) -> Vec<&BenchmarkDescriptor> {
        self.entries
            .iter()
            .filter(|d| tags.iter().any(|t| d.has_tag(*t)))
            .collect()
    }

    /// The sorted union of tags across all descriptors.
    pub fn all_tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self
            .entries
            .iter()
            .flat_map(|d| d.tags.iter().copied())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Number of registered benchmarks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
