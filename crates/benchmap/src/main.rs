//! benchmap - requirement-to-benchmark evaluation orchestrator.
//!
//! Maps a natural-language requirement onto a registry of benchmarks,
//! generates evaluation configs, drives the external harness, and
//! summarizes per-model results into a comparison report.
//!
//! # Examples
//!
//! ```bash
//! # Analyze a requirement and evaluate two models
//! benchmap -r "evaluate SQL generation for our BI chatbot" \
//!     -m deepseek-chat Qwen/Qwen3-80B
//!
//! # Offline matching without the analyzer agent
//! benchmap -r "SQL generation" --offline --capability CODING --dry-run
//!
//! # Inspect the registry
//! benchmap --list-benchmarks
//!
//! # Score a single SQL pair
//! benchmap --sql-pred "SELECT name FROM t" --sql-ref "SELECT name FROM t"
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod orchestrator;

use args::Args;

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    runtime.block_on(async move {
        if let Err(e) = orchestrator::run(args).await {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    });
}

fn init_tracing(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("benchmap={}", log_level).parse().unwrap())
                .add_directive(format!("benchmap_agents={}", log_level).parse().unwrap())
                .add_directive(format!("benchmap_evals={}", log_level).parse().unwrap())
                .add_directive(format!("benchmap_settings={}", log_level).parse().unwrap()),
        )
        .try_init();
}
