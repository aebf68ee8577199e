//! Evaluation summary agent.
//!
//! Turns the collected per-benchmark, per-model report JSON into a Markdown
//! comparison report written to the work directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use benchmap_llm::{ChatRequest, Client, Message};

use crate::error::AgentError;

/// Collected harness reports: benchmark name -> model server name -> report.
pub type EvaluationReports = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

const SYSTEM_PROMPT: &str = "You are an expert in evaluating AI models. Your task is to analyze \
evaluation reports, summarize and compare model capabilities, and score and rank the candidate \
models against the user's requirement.\n\n\
You must:\n\
1. Summarize each model's performance per benchmark\n\
2. Compare the models across benchmarks\n\
3. Score each candidate model (0-100) against the user's requirement and rank them\n\
4. Point out each model's strengths and weaknesses\n\
5. Give a recommendation that addresses the user's requirement\n\n\
Respond with a well-structured Markdown report.";

/// LLM-backed summary agent.
pub struct SummaryAgent {
    client: Client,
    model: String,
    max_tokens: Option<u32>,
}

impl SummaryAgent {
    /// Create a summary agent calling `model` through `client`.
    pub fn new(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens: None,
        }
    }

    /// Cap the completion length.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Build the user prompt embedding the requirement and report data.
    fn build_prompt(requirement: &str, reports: &EvaluationReports) -> Result<String, AgentError> {
        let reports_json = serde_json::to_string_pretty(reports)
            .map_err(|e| AgentError::Parse(e.to_string()))?;
        Ok(format!(
            "Please analyze the following evaluation reports and produce a model comparison \
             report.\n\n\
             User requirement: {}\n\n\
             Evaluation report data:\n{}\n\n\
             Summarize each model per benchmark, compare the models, rank them against the \
             requirement, and give a recommendation.",
            requirement, reports_json
        ))
    }

    /// Generate the comparison report and write it to `work_dir/report.md`.
    ///
    /// Returns the report text.
    pub async fn generate_summary(
        &self,
        requirement: &str,
        reports: &EvaluationReports,
        work_dir: &Path,
    ) -> Result<String, AgentError> {
        info!(
            benchmarks = reports.len(),
            "generating evaluation summary report"
        );

        let messages = vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(Self::build_prompt(requirement, reports)?),
        ];

        let mut request = ChatRequest::new(&self.model, messages);
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let completion = self.client.chat(&request).await?;
        let report = completion
            .first_content()
            .ok_or(benchmap_llm::LlmError::EmptyResponse)?
            .to_string();
        debug!(chars = report.len(), "summary response received");

        let report_path = report_path(work_dir);
        std::fs::create_dir_all(work_dir)?;
        std::fs::write(&report_path, &report)?;
        info!("wrote summary report to {}", report_path.display());

        Ok(report)
    }
}

/// Where the Markdown report lands inside a work directory.
pub fn report_path(work_dir: &Path) -> PathBuf {
    work_dir.join("report.md")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_reports() -> EvaluationReports {
        let mut by_model = BTreeMap::new();
        by_model.insert(
            "deepseek-chat".to_string(),
            serde_json::json!({"score": 0.82, "dataset_name": "general_qa"}),
        );

        let mut reports = EvaluationReports::new();
        reports.insert("general_qa".to_string(), by_model);
        reports
    }

    #[test]
    fn test_build_prompt_embeds_requirement_and_reports() {
        let prompt =
            SummaryAgent::build_prompt("compare chat models", &sample_reports()).unwrap();
        assert!(prompt.contains("compare chat models"));
        assert!(prompt.contains("general_qa"));
        assert!(prompt.contains("deepseek-chat"));
        assert!(prompt.contains("0.82"));
    }

    #[test]
    fn test_report_path_convention() {
        assert_eq!(
            report_path(Path::new("results/run")),
            PathBuf::from("results/run/report.md")
        );
    }
}
