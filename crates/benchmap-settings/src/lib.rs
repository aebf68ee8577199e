//! Centralized TOML-based settings for benchmap.
//!
//! This crate provides configuration management for the benchmap workspace:
//! - Loading settings from `~/.benchmap/settings.toml`
//! - Environment variable interpolation (`$VAR` and `${VAR}` syntax)
//! - Type-safe settings schema with serde defaults
//! - First-run template generation
//!
//! # Usage
//!
//! ```rust,ignore
//! use benchmap_settings::{get_with_env_fallback, SettingsManager};
//!
//! let settings = SettingsManager::load_standalone()?;
//! let server = settings.server("deepseek-chat")?;
//!
//! let api_key = get_with_env_fallback(
//!     &server.api_key,
//!     &["DEEPSEEK_API_KEY"],
//!     None,
//! );
//! ```
//!
//! # Environment Variable Interpolation
//!
//! String values in the settings file can reference environment variables:
//!
//! ```toml
//! [servers.deepseek-chat]
//! model = "deepseek-chat"
//! url = "https://api.deepseek.com"
//! api_key = "$DEEPSEEK_API_KEY"
//! params = "671B"
//! ```
//!
//! Both `$VAR` and `${VAR}` syntax are supported; unresolved variables
//! interpolate to the empty string.

pub mod loader;
pub mod schema;

pub use loader::{get_with_env_fallback, interpolate_env, settings_path, SettingsManager};
pub use schema::{
    AnalyzerSettings, BenchmapSettings, DatasetSettings, EvaluationSettings, JudgeSettings,
    ModelServerSettings, SettingsError,
};
