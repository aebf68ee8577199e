//! CLI argument parsing using clap.
//!
//! Defines the command-line interface for benchmap.

use clap::Parser;
use std::path::PathBuf;

/// benchmap - map a natural-language requirement onto benchmarks, run them,
/// and summarize the results
#[derive(Parser, Debug, Clone)]
#[command(name = "benchmap")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// The requirement to analyze, in natural language
    #[arg(short = 'r', long)]
    pub requirement: Option<String>,

    /// Model server names to evaluate (repeatable)
    #[arg(short = 'm', long = "model", num_args = 1..)]
    pub models: Vec<String>,

    /// Return at most this many recommended benchmarks
    #[arg(long, default_value_t = 5)]
    pub top_k: usize,

    /// Use the offline capability matcher instead of the analyzer agent
    #[arg(long)]
    pub offline: bool,

    /// Capability tags for offline matching (e.g. CODING REASONING)
    #[arg(long = "capability", num_args = 1..)]
    pub capabilities: Vec<String>,

    /// Request batch size
    #[arg(long, default_value_t = 1)]
    pub batch_size: u32,

    /// Generation cap per sample
    #[arg(long, default_value_t = 2048)]
    pub max_tokens: u32,

    /// Cap on the number of evaluated samples
    #[arg(long)]
    pub limit: Option<u32>,

    /// Grade responses with an LLM judge
    #[arg(long)]
    pub use_llm_judge: bool,

    /// Judge model server name (defaults to [judge].server in settings)
    #[arg(long, env = "BENCHMAP_JUDGE_SERVER")]
    pub judge_model: Option<String>,

    /// Work directory (default: results/<timestamp>)
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Where to write the analysis/config JSON (default: <work_dir>/config.json)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Generate configs but skip harness execution and summarization
    #[arg(long)]
    pub dry_run: bool,

    /// List the registered benchmarks and exit
    #[arg(long)]
    pub list_benchmarks: bool,

    /// Write the settings template to ~/.benchmap/settings.toml and exit
    #[arg(long)]
    pub init_settings: bool,

    /// Score a predicted SQL statement against --sql-ref and exit
    #[arg(long, requires = "sql_ref")]
    pub sql_pred: Option<String>,

    /// Reference SQL for --sql-pred
    #[arg(long, requires = "sql_pred")]
    pub sql_ref: Option<String>,

    /// Show verbose output (debug information)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
