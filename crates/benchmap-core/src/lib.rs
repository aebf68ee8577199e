//! Benchmark registry and capability matching for benchmap.
//!
//! This crate holds the data model shared by the rest of the workspace:
//! the closed set of capability [`Tag`]s, the immutable
//! [`BenchmarkDescriptor`] records, and the [`BenchmarkRegistry`] they live
//! in. On top of that it provides the [`Matcher`], which ranks the registry
//! against a requirement's capability tags and free-text description.
//!
//! The registry is an explicitly constructed value, not a module-level
//! singleton, so tests can inject synthetic registries and the matcher stays
//! a pure function over its inputs.

pub mod matcher;
pub mod registry;
pub mod tags;

pub use matcher::{MatchResult, Matcher};
pub use registry::{BenchmarkDescriptor, BenchmarkRegistry, RegistryError};
pub use tags::Tag;
