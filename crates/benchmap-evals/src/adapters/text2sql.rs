//! Text2SQL benchmark adapter.
//!
//! Converts dataset records into prompts, pulls candidate SQL out of raw
//! model output, and scores it against the reference with the structural
//! similarity metric.

use serde::{Deserialize, Serialize};

use benchmap_sqlsim::{first_sql_candidate, SqlAstSimilarity};

use crate::error::EvalError;

/// Prompt template for Text2SQL samples.
pub const PROMPT_TEMPLATE: &str = "Convert the following question into a SQL query based on the \
provided schema.\nSchema: {schema}\nQuestion: {question}\nSQL:";

/// A prompt/target pair built from a dataset record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Full prompt sent to the model.
    pub input: String,
    /// Reference SQL.
    pub target: String,
}

/// Score for one prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    /// Raw model output.
    pub prediction: String,
    /// SQL extracted from the raw output.
    pub extracted_prediction: String,
    /// Metric name -> value.
    pub value: std::collections::BTreeMap<String, f64>,
    /// Which metric is the headline number.
    pub main_score_name: String,
}

impl Score {
    /// The headline metric value.
    pub fn main_value(&self) -> f64 {
        self.value.get(&self.main_score_name).copied().unwrap_or(0.0)
    }
}

/// Adapter for the Text2SQL benchmark.
#[derive(Debug, Clone)]
pub struct Text2SqlAdapter {
    prompt_template: String,
    metric: SqlAstSimilarity,
}

impl Default for Text2SqlAdapter {
    fn default() -> Self {
        Self {
            prompt_template: PROMPT_TEMPLATE.to_string(),
            metric: SqlAstSimilarity,
        }
    }
}

impl Text2SqlAdapter {
    /// Adapter with the standard prompt template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sample from a dataset record.
    ///
    /// `question` and `ground_truth` are required; `schema` may be a string
    /// or a list of strings (joined by newlines) and defaults to empty.
    pub fn record_to_sample(&self, record: &serde_json::Value) -> Result<Sample, EvalError> {
        let question = record
            .get("question")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EvalError::InvalidRecord("missing 'question'".to_string()))?;
        let target = record
            .get("ground_truth")
            .and_then(|v| v.as_str())
            .ok_or_else(|| EvalError::InvalidRecord("missing 'ground_truth'".to_string()))?;

        let schema = match record.get("schema") {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Array(parts)) => parts
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        };

        let input = self
            .prompt_template
            .replace("{schema}", &schema)
            .replace("{question}", question);

        Ok(Sample {
            input,
            target: target.to_string(),
        })
    }

    /// Extract the SQL answer from raw model output.
    ///
    /// Takes the first extracted candidate, or falls back to the raw text;
    /// either way surrounding whitespace and statement terminators are
    /// stripped before matching.
    pub fn extract_answer(&self, prediction: &str) -> String {
        let candidate =
            first_sql_candidate(prediction).unwrap_or_else(|| prediction.to_string());
        candidate.trim().trim_matches(';').trim().to_string()
    }

    /// Score a prediction against the reference.
    pub fn score(
        &self,
        original_prediction: &str,
        filtered_prediction: &str,
        reference: &str,
    ) -> Score {
        let scores = self.metric.apply(
            &[filtered_prediction.to_string()],
            &[reference.to_string()],
        );
        let sim = scores.first().copied().unwrap_or(0.0);

        let mut value = std::collections::BTreeMap::new();
        value.insert(SqlAstSimilarity::NAME.to_string(), sim);

        Score {
            prediction: original_prediction.to_string(),
            extracted_prediction: filtered_prediction.to_string(),
            value,
            main_score_name: SqlAstSimilarity::NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_to_sample_with_string_schema() {
        let adapter = Text2SqlAdapter::new();
        let record = serde_json::json!({
            "question": "How many employees are there?",
            "schema": "CREATE TABLE employees (id INT, name TEXT)",
            "ground_truth": "SELECT COUNT(*) FROM employees"
        });

        let sample = adapter.record_to_sample(&record).unwrap();
        assert!(sample.input.contains("CREATE TABLE employees"));
        assert!(sample.input.contains("How many employees are there?"));
        assert!(sample.input.ends_with("SQL:"));
        assert_eq!(sample.target, "SELECT COUNT(*) FROM employees");
    }

    #[test]
    fn test_record_to_sample_joins_list_schema() {
        let adapter = Text2SqlAdapter::new();
        let record = serde_json::json!({
            "question": "q",
            "schema": ["CREATE TABLE a (x INT)", "CREATE TABLE b (y INT)"],
            "ground_truth": "SELECT x FROM a"
        });

        let sample = adapter.record_to_sample(&record).unwrap();
        assert!(sample
            .input
            .contains("CREATE TABLE a (x INT)\nCREATE TABLE b (y INT)"));
    }

    #[test]
    fn test_record_missing_fields_is_invalid() {
        let adapter = Text2SqlAdapter::new();
        let record = serde_json::json!({"question": "q"});
        assert!(matches!(
            adapter.record_to_sample(&record),
            Err(EvalError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_extract_answer_prefers_fenced_sql() {
        let adapter = Text2SqlAdapter::new();
        let raw = "Sure!\n```sql\nSELECT name FROM employees;\n```";
        assert_eq!(adapter.extract_answer(raw), "SELECT name FROM employees");
    }

    #[test]
    fn test_extract_answer_falls_back_to_raw_text() {
        let adapter = Text2SqlAdapter::new();
        assert_eq!(
            adapter.extract_answer("  SELECT 1;  "),
            "SELECT 1"
        );
    }

    #[test]
    fn test_score_carries_metric_name_and_value() {
        let adapter = Text2SqlAdapter::new();
        let score = adapter.score(
            "```sql\nSELECT a FROM t\n```",
            "SELECT a FROM t",
            "SELECT a FROM t",
        );

        assert_eq!(score.main_score_name, "sql_ast_sim");
        assert_eq!(score.main_value(), 1.0);
        assert_eq!(score.extracted_prediction, "SELECT a FROM t");
    }

    #[test]
    fn test_score_zero_for_empty_extraction() {
        let adapter = Text2SqlAdapter::new();
        let score = adapter.score("no sql here", "", "SELECT a FROM t");
        assert_eq!(score.main_value(), 0.0);
    }
}
