//! Evaluation task configuration.
//!
//! [`TaskConfig`] is the configuration object the external harness
//! consumes; [`ConfigGenerator`] builds one per benchmark/model pair from
//! the loaded settings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use benchmap_settings::{BenchmapSettings, DatasetSettings};

use crate::error::EvalError;

/// Generation parameters forwarded to the evaluated model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Request batch size.
    pub batch_size: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Generation cap per sample.
    pub max_tokens: u32,
}

/// Judge model connection parameters, present only for LLM-judged runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeModelArgs {
    /// Judge model identifier.
    pub model: String,
    /// Judge endpoint base URL.
    pub api_url: String,
    /// Judge endpoint API key.
    pub api_key: String,
}

/// The configuration object consumed by the external evaluation harness.
///
/// Field names match the harness's recognized keys exactly; optional keys
/// are omitted from the serialized form when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Model identifier at the serving endpoint.
    pub model: String,
    /// Serving endpoint base URL.
    pub api_url: String,
    /// Serving endpoint API key.
    pub api_key: String,
    /// Evaluation mode; always `openai_api` here.
    pub eval_type: String,
    /// Benchmarks to run (a single dataset per generated config).
    pub datasets: Vec<String>,
    /// Optional cap on the number of samples.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Per-dataset overrides forwarded verbatim.
    pub dataset_args: HashMap<String, DatasetSettings>,
    /// Generation parameters.
    pub generation_config: GenerationConfig,
    /// Directory the harness writes reports into.
    pub work_dir: PathBuf,
    /// Keep the work dir stable instead of appending a timestamp.
    pub no_timestamp: bool,
    /// Per-task timeout in seconds.
    pub timeout: u64,
    /// Judge strategy, set when an LLM judge is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge_strategy: Option<String>,
    /// Judge model connection, set when an LLM judge is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge_model_args: Option<JudgeModelArgs>,
}

/// Caller-tunable knobs for a batch of generated configs.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Request batch size.
    pub batch_size: u32,
    /// Generation cap per sample.
    pub max_tokens: u32,
    /// Optional cap on the number of samples.
    pub limit: Option<u32>,
    /// Whether to attach an LLM judge.
    pub use_llm_judge: bool,
    /// Judge server name; falls back to `[judge].server` in settings.
    pub judge_server: Option<String>,
    /// Root work directory for this run.
    pub work_dir: PathBuf,
}

/// Sanitize a server name for use in a directory name.
pub fn cleaned_model_name(server_name: &str) -> String {
    server_name.replace('/', "-")
}

/// Builds harness task configs from settings.
pub struct ConfigGenerator<'a> {
    settings: &'a BenchmapSettings,
}

impl<'a> ConfigGenerator<'a> {
    /// Create a generator over the loaded settings.
    pub fn new(settings: &'a BenchmapSettings) -> Self {
        Self { settings }
    }

    /// Generate the config for a single benchmark/model pair.
    ///
    /// The work dir follows the harness convention
    /// `<root>/<dataset>/<model>_<params>`; report collection later relies
    /// on the same layout.
    pub fn single(
        &self,
        benchmark_name: &str,
        server_name: &str,
        opts: &EvalOptions,
    ) -> Result<TaskConfig, EvalError> {
        let server = self.settings.server(server_name)?;

        let mut dataset_args = HashMap::new();
        dataset_args.insert(benchmark_name.to_string(), self.settings.dataset(benchmark_name));

        let work_dir = opts.work_dir.join(benchmark_name).join(format!(
            "{}_{}",
            cleaned_model_name(server_name),
            server.params
        ));

        let (judge_strategy, judge_model_args) = if opts.use_llm_judge {
            let judge_name = opts
                .judge_server
                .clone()
                .or_else(|| self.settings.judge.server.clone())
                .unwrap_or_else(|| server_name.to_string());
            let judge = self.settings.server(&judge_name)?;
            (
                Some("auto".to_string()),
                Some(JudgeModelArgs {
                    model: judge.model.clone(),
                    api_url: judge.url.clone(),
                    api_key: judge.api_key_or_empty(),
                }),
            )
        } else {
            (None, None)
        };

        Ok(TaskConfig {
            model: server.model.clone(),
            api_url: server.url.clone(),
            api_key: server.api_key_or_empty(),
            eval_type: "openai_api".to_string(),
            datasets: vec![benchmark_name.to_string()],
            limit: opts.limit,
            dataset_args,
            generation_config: GenerationConfig {
                batch_size: opts.batch_size,
                temperature: self.settings.evaluation.temperature,
                max_tokens: opts.max_tokens,
            },
            work_dir,
            no_timestamp: true,
            timeout: self.settings.evaluation.timeout,
            judge_strategy,
            judge_model_args,
        })
    }
}

/// The directory a benchmark/model pair's reports land in, mirroring the
/// harness's `work_dir/.../reports/{model}/{dataset}.json` convention.
pub fn reports_dir(
    work_dir: &Path,
    benchmark_name: &str,
    server_name: &str,
    params: &str,
) -> PathBuf {
    work_dir
        .join(benchmark_name)
        .join(format!("{}_{}", cleaned_model_name(server_name), params))
        .join("reports")
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchmap_settings::ModelServerSettings;

    fn settings() -> BenchmapSettings {
        let mut settings = BenchmapSettings::with_default_servers();
        settings.servers.insert(
            "Qwen/Qwen3-80B".to_string(),
            ModelServerSettings {
                model: "Qwen/Qwen3-80B".to_string(),
                url: "http://localhost:8000/v1".to_string(),
                api_key: Some("local".to_string()),
                params: "80B".to_string(),
            },
        );
        settings
    }

    fn options() -> EvalOptions {
        EvalOptions {
            batch_size: 4,
            max_tokens: 1024,
            limit: Some(50),
            use_llm_judge: false,
            judge_server: None,
            work_dir: PathBuf::from("results/run"),
        }
    }

    #[test]
    fn test_single_config_shape() {
        let settings = settings();
        let generator = ConfigGenerator::new(&settings);

        let config = generator
            .single("general_qa", "Qwen/Qwen3-80B", &options())
            .unwrap();

        assert_eq!(config.model, "Qwen/Qwen3-80B");
        assert_eq!(config.eval_type, "openai_api");
        assert_eq!(config.datasets, vec!["general_qa"]);
        assert_eq!(config.limit, Some(50));
        assert_eq!(config.generation_config.batch_size, 4);
        assert_eq!(config.generation_config.temperature, 0.0);
        assert!(config.no_timestamp);
        assert_eq!(config.timeout, 600);
        assert_eq!(
            config.work_dir,
            PathBuf::from("results/run/general_qa/Qwen-Qwen3-80B_80B")
        );
        assert!(config.judge_strategy.is_none());

        // The configured dataset override is forwarded.
        let qa_args = &config.dataset_args["general_qa"];
        assert_eq!(qa_args.local_path.as_deref(), Some("datasets/llm/qa"));
    }

    #[test]
    fn test_unknown_server_is_an_error() {
        let settings = settings();
        let generator = ConfigGenerator::new(&settings);

        assert!(matches!(
            generator.single("general_qa", "missing", &options()),
            Err(EvalError::Settings(_))
        ));
    }

    #[test]
    fn test_judge_args_attached_when_requested() {
        let settings = settings();
        let generator = ConfigGenerator::new(&settings);

        let mut opts = options();
        opts.use_llm_judge = true;
        opts.judge_server = Some("deepseek-chat".to_string());

        let config = generator.single("general_qa", "Qwen/Qwen3-80B", &opts).unwrap();
        assert_eq!(config.judge_strategy.as_deref(), Some("auto"));
        let judge = config.judge_model_args.unwrap();
        assert_eq!(judge.model, "deepseek-chat");
        assert_eq!(judge.api_url, "https://api.deepseek.com");
    }

    #[test]
    fn test_serialized_config_omits_unset_optionals() {
        let settings = settings();
        let generator = ConfigGenerator::new(&settings);

        let mut opts = options();
        opts.limit = None;

        let config = generator.single("general_qa", "Qwen/Qwen3-80B", &opts).unwrap();
        let json = serde_json::to_value(&config).unwrap();

        assert!(json.get("limit").is_none());
        assert!(json.get("judge_strategy").is_none());
        assert!(json.get("judge_model_args").is_none());
        assert_eq!(json["generation_config"]["max_tokens"], 1024);
    }

    #[test]
    fn test_reports_dir_convention() {
        let dir = reports_dir(Path::new("results/run"), "general_qa", "Qwen/Qwen3-80B", "80B");
        assert_eq!(
            dir,
            PathBuf::from("results/run/general_qa/Qwen-Qwen3-80B_80B/reports")
        );
    }
}
