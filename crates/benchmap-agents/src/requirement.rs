//! Requirement analysis agent.
//!
//! Sends the user's free-text requirement to the configured analyzer model
//! with a system prompt built from the benchmark registry, and parses the
//! structured JSON response into a [`RequirementAnalysis`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use benchmap_core::{BenchmarkRegistry, Tag};
use benchmap_llm::{ChatRequest, Client, Message};

use crate::error::AgentError;

/// One benchmark the analyzer recommends, with its rationale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRecommendation {
    /// Registry key of the recommended benchmark.
    pub benchmark: String,
    /// Why the analyzer picked it.
    pub reason: String,
}

/// Structured result of analyzing a requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementAnalysis {
    /// Capability tags the requirement exercises.
    pub capabilities: Vec<Tag>,
    /// Restated requirement description.
    pub description: String,
    /// Key points extracted from the requirement.
    pub key_points: Vec<String>,
    /// Recommended benchmarks, validated against the registry.
    pub recommended_benchmarks: Vec<BenchmarkRecommendation>,
}

/// Wire shape of the model response. Capabilities arrive as raw strings so
/// unknown labels can be dropped instead of failing deserialization.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    capabilities: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    recommended_benchmarks: Vec<BenchmarkRecommendation>,
}

/// LLM-backed requirement analyzer.
pub struct RequirementAnalyzer {
    client: Client,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl RequirementAnalyzer {
    /// Create an analyzer calling `model` through `client`.
    pub fn new(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
        }
    }

    /// Override the sampling temperature (defaults to 0.0).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Cap the completion length.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build the system prompt from the registry contents.
    pub fn system_prompt(registry: &BenchmarkRegistry) -> String {
        let tag_legend: Vec<String> = Tag::ALL
            .iter()
            .map(|tag| format!("- {}: {}", tag, tag.human_label()))
            .collect();

        let benchmark_lines: Vec<String> = registry
            .iter()
            .map(|info| {
                let tags: Vec<String> = info.tags.iter().map(|t| t.to_string()).collect();
                let use_cases: Vec<&str> = info
                    .use_cases
                    .iter()
                    .take(2)
                    .map(String::as_str)
                    .collect();
                format!(
                    "- {} ({}): {}\n  Capability tags: {}\n  Suitable for: {}",
                    info.name,
                    info.pretty_name,
                    info.description,
                    tags.join(", "),
                    use_cases.join("; ")
                )
            })
            .collect();

        format!(
            "You are an expert in evaluating the capabilities of AI models. Your task is to \
             analyze the user's requirement, identify the base model capabilities that need to \
             be evaluated, and select the most suitable benchmarks from the available list.\n\n\
             Available capability tags:\n{}\n\n\
             Available benchmarks (you MUST choose from this list):\n{}\n\n\
             Carefully analyze the requirement, extract the relevant capability tags and a \
             concise description, and pick the best-matching benchmarks (several are allowed), \
             giving a detailed reason for each choice.\n\n\
             Respond with a single JSON object with exactly these fields:\n\
             - capabilities: list of capability tags\n\
             - description: the requirement description\n\
             - key_points: list of key requirement points\n\
             - recommended_benchmarks: list of objects with `benchmark` (a name from the list \
             above) and `reason`",
            tag_legend.join("\n"),
            benchmark_lines.join("\n")
        )
    }

    /// Analyze a requirement against the registry.
    ///
    /// Unknown capability labels from the model are dropped with a warning;
    /// an unknown recommended benchmark name is a hard error.
    pub async fn analyze(
        &self,
        registry: &BenchmarkRegistry,
        requirement: &str,
    ) -> Result<RequirementAnalysis, AgentError> {
        info!("analyzing requirement");

        let messages = vec![
            Message::system(Self::system_prompt(registry)),
            Message::user(format!(
                "Please analyze the following requirement: {}",
                requirement
            )),
        ];

        let mut request = ChatRequest::new(&self.model, messages)
            .with_temperature(self.temperature)
            .with_json_response();
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let completion = self.client.chat(&request).await?;
        let content = completion
            .first_content()
            .ok_or(benchmap_llm::LlmError::EmptyResponse)?;
        debug!(response = %content, "analyzer response");

        let analysis = parse_analysis(registry, content)?;
        info!(
            capabilities = ?analysis.capabilities,
            benchmarks = analysis.recommended_benchmarks.len(),
            "requirement analysis complete"
        );
        Ok(analysis)
    }
}

/// Parse and validate the analyzer's response text.
pub fn parse_analysis(
    registry: &BenchmarkRegistry,
    text: &str,
) -> Result<RequirementAnalysis, AgentError> {
    let payload = extract_json(text);
    let raw: RawAnalysis =
        serde_json::from_str(payload).map_err(|e| AgentError::Parse(e.to_string()))?;

    let mut capabilities = Vec::new();
    for label in &raw.capabilities {
        match Tag::from_str(label) {
            Ok(tag) => capabilities.push(tag),
            Err(_) => warn!(label = %label, "dropping unknown capability tag"),
        }
    }

    for recommendation in &raw.recommended_benchmarks {
        registry.get(&recommendation.benchmark)?;
    }

    Ok(RequirementAnalysis {
        capabilities,
        description: raw.description,
        key_points: raw.key_points,
        recommended_benchmarks: raw.recommended_benchmarks,
    })
}

/// Slice out the JSON object from a response that may wrap it in prose or a
/// code fence.
fn extract_json(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}
