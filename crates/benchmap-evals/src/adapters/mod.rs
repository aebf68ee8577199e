//! Benchmark-specific adapters.
//!
//! An adapter owns the glue between a dataset record and the scoring
//! machinery: prompt construction, answer extraction from raw model output,
//! and metric application.

pub mod text2sql;

pub use text2sql::{Sample, Score, Text2SqlAdapter};
