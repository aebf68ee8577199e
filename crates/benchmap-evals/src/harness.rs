//! External evaluation harness driver.
//!
//! The benchmarks are executed by the evalscope Python harness, an external
//! collaborator. This module writes the task config to disk and invokes the
//! harness through a small `python -c` shim, mirroring how it is called
//! in-process on the Python side.
//!
//! The harness requires the `evalscope` Python package:
//! ```bash
//! pip install evalscope
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use benchmap_settings::BenchmapSettings;

use crate::config::TaskConfig;
use crate::error::EvalError;

/// Python shim that loads a task config JSON and hands it to the harness.
const RUN_TASK_SHIM: &str = concat!(
    "import json, sys\n",
    "from evalscope.run import run_task\n",
    "with open(sys.argv[1], 'r', encoding='utf-8') as f:\n",
    "    run_task(json.load(f))\n",
);

/// Filename the task config is persisted under inside the work dir.
const TASK_CONFIG_FILENAME: &str = "task_config.json";

/// Something that can execute a harness task.
#[async_trait]
pub trait EvalHarness: Send + Sync {
    /// Whether the harness can run at all on this machine.
    fn is_available(&self) -> bool;

    /// Execute a single evaluation task to completion.
    async fn run_task(&self, config: &TaskConfig) -> Result<(), EvalError>;
}

/// Drives the evalscope Python harness as a subprocess.
pub struct EvalscopeHarness {
    python: String,
}

impl EvalscopeHarness {
    /// Create a harness driver, resolving the python interpreter from
    /// settings, then a dedicated venv, then the system `python`.
    pub fn new(settings: &BenchmapSettings) -> Self {
        let python = settings
            .evaluation
            .python
            .clone()
            .or_else(|| venv_python().map(|p| p.to_string_lossy().to_string()))
            .unwrap_or_else(|| "python".to_string());
        debug!(python = %python, "harness interpreter resolved");
        Self { python }
    }

    /// The resolved python interpreter.
    pub fn python(&self) -> &str {
        &self.python
    }
}

#[async_trait]
impl EvalHarness for EvalscopeHarness {
    fn is_available(&self) -> bool {
        std::process::Command::new(&self.python)
            .args(["-c", "import evalscope.run"])
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    async fn run_task(&self, config: &TaskConfig) -> Result<(), EvalError> {
        std::fs::create_dir_all(&config.work_dir)?;

        let config_path = config.work_dir.join(TASK_CONFIG_FILENAME);
        let config_json = serde_json::to_string_pretty(config)?;
        std::fs::write(&config_path, config_json)?;

        info!(
            dataset = %config.datasets.join(","),
            model = %config.model,
            "running evaluation task"
        );

        let output = Command::new(&self.python)
            .args(["-c", RUN_TASK_SHIM])
            .arg(&config_path)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            warn!(
                code = ?output.status.code(),
                "harness exited with a failure status"
            );
            return Err(EvalError::HarnessFailed {
                code: output.status.code(),
                stderr: tail(&stderr, 4000),
            });
        }

        info!(dataset = %config.datasets.join(","), "evaluation task complete");
        Ok(())
    }
}

/// Path to the dedicated harness venv python, if it exists.
fn venv_python() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let venv_python = home.join(".benchmap/evalscope-venv/bin/python");
    if venv_python.exists() {
        Some(venv_python)
    } else {
        None
    }
}

/// Last `max` bytes of a string, on a char boundary.
fn tail(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    s[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpreter_override_from_settings() {
        let mut settings = BenchmapSettings::default();
        settings.evaluation.python = Some("/opt/python3".to_string());

        let harness = EvalscopeHarness::new(&settings);
        assert_eq!(harness.python(), "/opt/python3");
    }

    #[test]
    fn test_tail_short_strings_unchanged() {
        assert_eq!(tail("hello", 10), "hello");
    }

    #[test]
    fn test_tail_truncates_long_strings() {
        let long = "a".repeat(100);
        assert_eq!(tail(&long, 10).len(), 10);
    }

    #[tokio::test]
    async fn test_run_task_fails_cleanly_without_harness() {
        let mut settings = BenchmapSettings::default();
        // An interpreter that cannot exist.
        settings.evaluation.python = Some("/nonexistent/python".to_string());

        let harness = EvalscopeHarness::new(&settings);
        assert!(!harness.is_available());
    }
}
