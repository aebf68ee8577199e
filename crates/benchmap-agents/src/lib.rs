//! Agents for benchmap.
//!
//! Two LLM-backed agents wrap the core matching machinery:
//!
//! - [`RequirementAnalyzer`] turns a free-text requirement into capability
//!   tags, key points and benchmark recommendations, constrained to the
//!   injected registry.
//! - [`SummaryAgent`] turns collected evaluation reports into a Markdown
//!   model-comparison report.
//!
//! Both call an OpenAI-compatible endpoint through [`benchmap_llm::Client`];
//! neither holds state between calls.

pub mod error;
pub mod requirement;
pub mod summary;

pub use error::AgentError;
pub use requirement::{BenchmarkRecommendation, RequirementAnalysis, RequirementAnalyzer};
pub use summary::{EvaluationReports, SummaryAgent};
