//! Evaluation plumbing for benchmap.
//!
//! This crate owns everything between a benchmark recommendation and a
//! collected result:
//!
//! - `config`: evaluation task configuration in the shape the external
//!   harness consumes
//! - `harness`: driving the external evalscope Python harness as a
//!   subprocess
//! - `reports`: collecting the JSON reports the harness writes to disk
//! - `adapters`: benchmark-specific glue, currently the Text2SQL adapter
//!
//! The harness itself is an external collaborator; this crate only speaks
//! its call/return contract (a config object in, on-disk JSON reports out).

pub mod adapters;
pub mod config;
pub mod error;
pub mod harness;
pub mod reports;

pub use config::{ConfigGenerator, EvalOptions, GenerationConfig, JudgeModelArgs, TaskConfig};
pub use error::EvalError;
pub use harness::{EvalHarness, EvalscopeHarness};
pub use reports::{collect_reports, EvaluationReports};
