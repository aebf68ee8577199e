//! Settings schema definitions for benchmap configuration.
//!
//! All settings structs use `#[serde(default)]` so partial configuration
//! files work; missing fields are filled with sensible defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when resolving entries from the settings schema.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A model server name has no entry under `[servers.<name>]`.
    #[error("Unknown model server: {0}")]
    UnknownServer(String),

    /// The settings file could not be read or parsed.
    #[error("Failed to load settings: {0}")]
    Load(String),
}

/// An OpenAI-compatible model server endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelServerSettings {
    /// Model identifier passed to the endpoint.
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub url: String,
    /// API key; usually `$SOME_VAR` resolved at load time.
    pub api_key: Option<String>,
    /// Parameter-count label used in work-dir names, e.g. `671B`.
    pub params: String,
}

impl ModelServerSettings {
    /// The API key, treating an empty (e.g. unresolved `$VAR`) value as
    /// absent.
    pub fn api_key_or_empty(&self) -> String {
        self.api_key.clone().unwrap_or_default()
    }
}

/// Local dataset configuration forwarded to the harness via `dataset_args`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatasetSettings {
    /// Path to a local copy of the dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
    /// Subsets to evaluate.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subset_list: Vec<String>,
}

/// Which model server powers the requirement analyzer and summary agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Server name under `[servers]`.
    pub server: String,
    /// Sampling temperature for agent calls.
    pub temperature: f32,
    /// Optional completion cap for agent calls.
    pub max_tokens: Option<u32>,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            server: "deepseek-chat".to_string(),
            temperature: 0.0,
            max_tokens: None,
        }
    }
}

/// Default LLM-judge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JudgeSettings {
    /// Server name under `[servers]` used as the judge model when
    /// `--use-llm-judge` is passed without an explicit judge model.
    pub server: Option<String>,
}

/// Knobs for driving the external evaluation harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Request batch size.
    pub batch_size: u32,
    /// Generation cap per sample.
    pub max_tokens: u32,
    /// Sampling temperature for evaluated models.
    pub temperature: f32,
    /// Per-task timeout in seconds.
    pub timeout: u64,
    /// Python interpreter override for the harness; when unset, a venv
    /// under `~/.benchmap/evalscope-venv` is preferred over system python.
    pub python: Option<String>,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            batch_size: 1,
            max_tokens: 2048,
            temperature: 0.0,
            timeout: 600,
            python: None,
        }
    }
}

/// Root settings document.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BenchmapSettings {
    /// Agent configuration.
    pub analyzer: AnalyzerSettings,
    /// LLM-judge configuration.
    pub judge: JudgeSettings,
    /// Harness configuration.
    pub evaluation: EvaluationSettings,
    /// Model servers, keyed by name.
    pub servers: HashMap<String, ModelServerSettings>,
    /// Dataset overrides, keyed by benchmark name.
    pub datasets: HashMap<String, DatasetSettings>,
}

impl BenchmapSettings {
    /// Settings with the default DeepSeek server entries, used when no
    /// settings file exists yet.
    pub fn with_default_servers() -> Self {
        let mut settings = Self::default();
        settings.servers.insert(
            "deepseek-chat".to_string(),
            ModelServerSettings {
                model: "deepseek-chat".to_string(),
                url: "https://api.deepseek.com".to_string(),
                api_key: Some("$DEEPSEEK_API_KEY".to_string()),
                params: "671B".to_string(),
            },
        );
        settings.servers.insert(
            "deepseek-reasoner".to_string(),
            ModelServerSettings {
                model: "deepseek-reasoner".to_string(),
                url: "https://api.deepseek.com".to_string(),
                api_key: Some("$DEEPSEEK_API_KEY".to_string()),
                params: "671B".to_string(),
            },
        );
        settings.datasets.insert(
            "general_qa".to_string(),
            DatasetSettings {
                local_path: Some("datasets/llm/qa".to_string()),
                subset_list: vec!["qa_with_reference".to_string()],
            },
        );
        settings
    }

    /// Resolve a model server by name; unknown names are a hard error.
    pub fn server(&self, name: &str) -> Result<&ModelServerSettings, SettingsError> {
        self.servers
            .get(name)
            .ok_or_else(|| SettingsError::UnknownServer(name.to_string()))
    }

    /// Dataset configuration for a benchmark, falling back to an empty
    /// default when no override is configured.
    pub fn dataset(&self, name: &str) -> DatasetSettings {
        self.datasets.get(name).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_parse_from_empty_toml() {
        let settings: BenchmapSettings = toml::from_str("").unwrap();
        assert_eq!(settings.analyzer.server, "deepseek-chat");
        assert_eq!(settings.evaluation.batch_size, 1);
        assert_eq!(settings.evaluation.max_tokens, 2048);
        assert_eq!(settings.evaluation.timeout, 600);
        assert!(settings.servers.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: BenchmapSettings = toml::from_str(
            r#"
            [evaluation]
            max_tokens = 4096

            [servers.local]
            model = "qwen3"
            url = "http://localhost:8000/v1"
            params = "80B"
            "#,
        )
        .unwrap();

        assert_eq!(settings.evaluation.max_tokens, 4096);
        assert_eq!(settings.evaluation.batch_size, 1);

        let server = settings.server("local").unwrap();
        assert_eq!(server.model, "qwen3");
        assert!(server.api_key.is_none());
    }

    #[test]
    fn test_unknown_server_is_an_error() {
        let settings = BenchmapSettings::default();
        assert!(matches!(
            settings.server("nope"),
            Err(SettingsError::UnknownServer(_))
        ));
    }

    #[test]
    fn test_dataset_falls_back_to_default() {
        let settings = BenchmapSettings::with_default_servers();
        let qa = settings.dataset("general_qa");
        assert_eq!(qa.local_path.as_deref(), Some("datasets/llm/qa"));

        let missing = settings.dataset("text2sql");
        assert_eq!(missing, DatasetSettings::default());
    }
}
