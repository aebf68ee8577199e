//! Collection of on-disk harness reports.
//!
//! The harness writes one JSON report per benchmark/model pair under
//! `work_dir/{dataset}/{model}_{params}/reports/{model}/{dataset}.json`.
//! Collection walks that convention with a glob; a missing report is logged
//! and skipped, not fatal, so partial runs still summarize.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use benchmap_settings::BenchmapSettings;

use crate::config::reports_dir;

/// Collected reports: benchmark name -> model server name -> report JSON.
pub type EvaluationReports = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

/// Collect every report the harness produced for the given benchmarks and
/// model servers under `work_dir`.
pub fn collect_reports(
    work_dir: &Path,
    server_names: &[String],
    benchmark_names: &[String],
    settings: &BenchmapSettings,
) -> EvaluationReports {
    let mut reports = EvaluationReports::new();

    for benchmark in benchmark_names {
        let mut by_model = BTreeMap::new();

        for server_name in server_names {
            let server = match settings.server(server_name) {
                Ok(server) => server,
                Err(e) => {
                    warn!(server = %server_name, "skipping report collection: {}", e);
                    continue;
                }
            };

            let dir = reports_dir(work_dir, benchmark, server_name, &server.params);
            match read_first_report(&dir) {
                Some(report) => {
                    debug!(benchmark = %benchmark, server = %server_name, "collected report");
                    by_model.insert(server_name.clone(), report);
                }
                None => warn!(
                    benchmark = %benchmark,
                    server = %server_name,
                    dir = %dir.display(),
                    "no report found"
                ),
            }
        }

        if !by_model.is_empty() {
            reports.insert(benchmark.clone(), by_model);
        }
    }

    reports
}

/// Read the first JSON report under `reports/*/*.json`.
fn read_first_report(reports_dir: &Path) -> Option<serde_json::Value> {
    let pattern = reports_dir.join("*").join("*.json");
    let entries = glob::glob(pattern.to_str()?).ok()?;

    for entry in entries.flatten() {
        match std::fs::read_to_string(&entry) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(report) => return Some(report),
                Err(e) => warn!(file = %entry.display(), "unparseable report: {}", e),
            },
            Err(e) => warn!(file = %entry.display(), "unreadable report: {}", e),
        }
    }
    None
}
