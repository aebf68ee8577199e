//! End-to-end pipeline: analyze -> recommend -> configure -> run -> summarize.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use benchmap_agents::{RequirementAnalyzer, SummaryAgent};
use benchmap_core::{BenchmarkRegistry, Matcher, Tag};
use benchmap_evals::adapters::Text2SqlAdapter;
use benchmap_evals::{
    collect_reports, ConfigGenerator, EvalHarness, EvalOptions, EvalscopeHarness, TaskConfig,
};
use benchmap_llm::Client;
use benchmap_settings::{get_with_env_fallback, BenchmapSettings, SettingsManager};

use crate::args::Args;

/// A benchmark selected for evaluation, from either recommendation path.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedBenchmark {
    pub benchmark_name: String,
    pub pretty_name: String,
    pub match_score: f64,
    pub reason: String,
    pub capabilities_covered: Vec<Tag>,
    pub source: String,
}

/// One generated harness config for a model/benchmark pair.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationConfigEntry {
    pub model: String,
    pub benchmark: String,
    pub config: TaskConfig,
}

/// The JSON document written to `--output`.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub requirement: String,
    pub analyzed_capabilities: Vec<Tag>,
    pub analyzed_description: String,
    pub key_points: Vec<String>,
    pub recommended_benchmarks: Vec<RecommendedBenchmark>,
    pub evaluation_configs: Vec<EvaluationConfigEntry>,
    pub model_names: Vec<String>,
}

/// CLI entry point after argument parsing and tracing setup.
pub async fn run(args: Args) -> Result<()> {
    dotenvy::dotenv().ok();

    if args.init_settings {
        let path = SettingsManager::init_template()?;
        println!("Settings written to {}", path.display());
        return Ok(());
    }

    let registry = BenchmarkRegistry::builtin();

    if args.list_benchmarks {
        list_benchmarks(&registry);
        return Ok(());
    }

    if let (Some(pred), Some(reference)) = (&args.sql_pred, &args.sql_ref) {
        score_sql(pred, reference);
        return Ok(());
    }

    let settings = SettingsManager::load_standalone().context("loading settings")?;
    let requirement = args
        .requirement
        .clone()
        .context("--requirement is required (see also --list-benchmarks)")?;

    let work_dir = args.work_dir.clone().unwrap_or_else(default_work_dir);
    std::fs::create_dir_all(&work_dir)
        .with_context(|| format!("creating work dir {}", work_dir.display()))?;

    // 1. Recommendation: analyzer agent, or the offline matcher.
    let (capabilities, description, key_points, recommended) = if args.offline {
        recommend_offline(&registry, &args, &requirement)
    } else {
        recommend_with_agent(&registry, &settings, &requirement).await?
    };

    if recommended.is_empty() {
        println!("No benchmarks matched the requirement.");
        return Ok(());
    }
    info!(count = recommended.len(), "benchmarks selected");

    // 2. Harness configs, one per model/benchmark pair.
    let generator = ConfigGenerator::new(&settings);
    let opts = EvalOptions {
        batch_size: args.batch_size,
        max_tokens: args.max_tokens,
        limit: args.limit,
        use_llm_judge: args.use_llm_judge,
        judge_server: args.judge_model.clone(),
        work_dir: work_dir.clone(),
    };

    let mut evaluation_configs = Vec::new();
    for model in &args.models {
        for benchmark in &recommended {
            let config = generator
                .single(&benchmark.benchmark_name, model, &opts)
                .with_context(|| {
                    format!("generating config for {} on {}", model, benchmark.benchmark_name)
                })?;
            evaluation_configs.push(EvaluationConfigEntry {
                model: model.clone(),
                benchmark: benchmark.benchmark_name.clone(),
                config,
            });
        }
    }

    let report = AnalysisReport {
        requirement: requirement.clone(),
        analyzed_capabilities: capabilities,
        analyzed_description: description,
        key_points,
        recommended_benchmarks: recommended,
        evaluation_configs,
        model_names: args.models.clone(),
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| work_dir.join("config.json"));
    std::fs::write(&output_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("writing {}", output_path.display()))?;
    println!("Analysis report written to {}", output_path.display());

    if args.dry_run {
        println!("Dry run requested; skipping harness execution.");
        return Ok(());
    }
    if report.evaluation_configs.is_empty() {
        println!("No models given; nothing to evaluate (pass --model to run).");
        return Ok(());
    }

    // 3. Drive the harness.
    let harness = EvalscopeHarness::new(&settings);
    if !harness.is_available() {
        anyhow::bail!(benchmap_evals::EvalError::HarnessUnavailable);
    }
    let failures = run_evaluations(&harness, &report.evaluation_configs).await;
    if failures == report.evaluation_configs.len() {
        anyhow::bail!("every evaluation task failed; see the log for details");
    }

    // 4. Collect reports and summarize.
    let benchmark_names: Vec<String> = report
        .recommended_benchmarks
        .iter()
        .map(|b| b.benchmark_name.clone())
        .collect();
    let reports = collect_reports(&work_dir, &args.models, &benchmark_names, &settings);
    if reports.is_empty() {
        warn!("no evaluation reports were found; skipping summary");
        return Ok(());
    }

    let summary_agent = build_summary_agent(&settings)?;
    summary_agent
        .generate_summary(&requirement, &reports, &work_dir)
        .await
        .context("generating summary report")?;
    println!(
        "Summary report written to {}",
        work_dir.join("report.md").display()
    );

    Ok(())
}

/// Run every config sequentially, logging failures; returns the failure count.
async fn run_evaluations(
    harness: &dyn EvalHarness,
    configs: &[EvaluationConfigEntry],
) -> usize {
    let progress = ProgressBar::new(configs.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40}] {pos}/{len} {msg}")
            .expect("progress template is valid")
            .progress_chars("=> "),
    );

    let mut failures = 0;
    for entry in configs {
        progress.set_message(format!("{} on {}", entry.model, entry.benchmark));
        match harness.run_task(&entry.config).await {
            Ok(()) => {
                info!(model = %entry.model, benchmark = %entry.benchmark, "evaluation complete")
            }
            Err(e) => {
                failures += 1;
                warn!(
                    model = %entry.model,
                    benchmark = %entry.benchmark,
                    "evaluation failed: {}", e
                );
            }
        }
        progress.inc(1);
    }
    progress.finish_with_message("evaluations done");
    failures
}

/// Recommendation via the LLM requirement analyzer.
async fn recommend_with_agent(
    registry: &BenchmarkRegistry,
    settings: &BenchmapSettings,
    requirement: &str,
) -> Result<(Vec<Tag>, String, Vec<String>, Vec<RecommendedBenchmark>)> {
    let analyzer = build_analyzer(settings)?;
    let analysis = analyzer
        .analyze(registry, requirement)
        .await
        .context("analyzing requirement")?;

    if analysis.recommended_benchmarks.is_empty() {
        anyhow::bail!(
            "requirement analysis returned no recommended benchmarks; \
             refine the requirement and retry"
        );
    }

    let mut recommended = Vec::new();
    for rec in &analysis.recommended_benchmarks {
        // Already validated by the analyzer; fetched again for pretty_name.
        let info = registry.get(&rec.benchmark)?;
        recommended.push(RecommendedBenchmark {
            benchmark_name: rec.benchmark.clone(),
            pretty_name: info.pretty_name.clone(),
            match_score: 1.0,
            reason: rec.reason.clone(),
            capabilities_covered: analysis.capabilities.clone(),
            source: "requirement_agent".to_string(),
        });
    }

    Ok((
        analysis.capabilities,
        analysis.description,
        analysis.key_points,
        recommended,
    ))
}

/// Recommendation via the offline capability matcher.
fn recommend_offline(
    registry: &BenchmarkRegistry,
    args: &Args,
    requirement: &str,
) -> (Vec<Tag>, String, Vec<String>, Vec<RecommendedBenchmark>) {
    let tags = parse_capabilities(&args.capabilities);
    let matcher = Matcher::new(registry);
    let matches = matcher.recommend(&tags, requirement, args.top_k);

    let recommended = matches
        .into_iter()
        .map(|m| RecommendedBenchmark {
            benchmark_name: m.benchmark_name,
            pretty_name: m.pretty_name,
            match_score: m.match_score,
            reason: m.reason,
            capabilities_covered: m.capabilities_covered,
            source: "matcher".to_string(),
        })
        .collect();

    (tags, requirement.to_string(), Vec::new(), recommended)
}

/// Parse user-supplied capability labels, dropping unknown ones with a
/// warning rather than failing.
fn parse_capabilities(labels: &[String]) -> Vec<Tag> {
    let mut tags = Vec::new();
    for label in labels {
        match Tag::from_str(label) {
            Ok(tag) => tags.push(tag),
            Err(_) => warn!(label = %label, "dropping unknown capability tag"),
        }
    }
    tags
}

/// Build the requirement analyzer from the configured analyzer server.
fn build_analyzer(settings: &BenchmapSettings) -> Result<RequirementAnalyzer> {
    let (client, model) = agent_client(settings)?;
    let mut analyzer =
        RequirementAnalyzer::new(client, model).with_temperature(settings.analyzer.temperature);
    if let Some(max_tokens) = settings.analyzer.max_tokens {
        analyzer = analyzer.with_max_tokens(max_tokens);
    }
    Ok(analyzer)
}

/// Build the summary agent from the configured analyzer server.
fn build_summary_agent(settings: &BenchmapSettings) -> Result<SummaryAgent> {
    let (client, model) = agent_client(settings)?;
    let mut agent = SummaryAgent::new(client, model);
    if let Some(max_tokens) = settings.analyzer.max_tokens {
        agent = agent.with_max_tokens(max_tokens);
    }
    Ok(agent)
}

/// Chat client and model id for the agents' server entry.
fn agent_client(settings: &BenchmapSettings) -> Result<(Client, String)> {
    let server = settings
        .server(&settings.analyzer.server)
        .context("resolving analyzer server")?;
    let api_key = get_with_env_fallback(&server.api_key, &["DEEPSEEK_API_KEY"], None)
        .unwrap_or_default();
    Ok((Client::new(api_key, server.url.clone()), server.model.clone()))
}

/// Default timestamped work dir, `results/<YYYYmmdd_HHMMSS>`.
fn default_work_dir() -> PathBuf {
    PathBuf::from(format!(
        "results/{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Print the registry contents.
fn list_benchmarks(registry: &BenchmarkRegistry) {
    println!("Available benchmarks:\n");
    for info in registry.iter() {
        let tags: Vec<String> = info.tags.iter().map(|t| t.to_string()).collect();
        println!("  {} ({})", info.name, info.pretty_name);
        println!("    {}", info.description);
        println!("    tags: {}", tags.join(", "));
        println!("    metrics: {}", info.metrics.join(", "));
    }
    println!();
}

/// Score a predicted SQL statement against a reference and print the result.
fn score_sql(prediction: &str, reference: &str) {
    let adapter = Text2SqlAdapter::new();
    let filtered = adapter.extract_answer(prediction);
    let score = adapter.score(prediction, &filtered, reference);
    println!("extracted: {}", score.extracted_prediction);
    println!("{}: {:.4}", score.main_score_name, score.main_value());
}
