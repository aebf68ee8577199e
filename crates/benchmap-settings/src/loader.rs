//! Settings loading and environment variable interpolation.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::schema::{BenchmapSettings, SettingsError};

/// `${VAR}` or `$VAR` references inside settings values.
static ENV_VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("env var regex is valid")
});

/// First-run settings template written by [`SettingsManager::init_template`].
const SETTINGS_TEMPLATE: &str = r#"# benchmap settings
#
# Values may reference environment variables with $VAR or ${VAR}.

[analyzer]
# Model server used by the requirement analyzer and summary agents.
server = "deepseek-chat"
temperature = 0.0

[judge]
# Default judge server for --use-llm-judge; override with --judge-model.
# server = "deepseek-chat"

[evaluation]
batch_size = 1
max_tokens = 2048
temperature = 0.0
timeout = 600
# python = "/usr/bin/python3"

[servers.deepseek-chat]
model = "deepseek-chat"
url = "https://api.deepseek.com"
api_key = "$DEEPSEEK_API_KEY"
params = "671B"

[servers.deepseek-reasoner]
model = "deepseek-reasoner"
url = "https://api.deepseek.com"
api_key = "$DEEPSEEK_API_KEY"
params = "671B"

[datasets.general_qa]
local_path = "datasets/llm/qa"
subset_list = ["qa_with_reference"]
"#;

/// Location of the settings file: `~/.benchmap/settings.toml`.
pub fn settings_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".benchmap").join("settings.toml"))
}

/// Substitute `$VAR` / `${VAR}` references with the environment variable's
/// value. Unset variables interpolate to the empty string.
pub fn interpolate_env(raw: &str) -> String {
    ENV_VAR_REGEX
        .replace_all(raw, |caps: &regex::Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            std::env::var(name).unwrap_or_default()
        })
        .into_owned()
}

/// Fetch a setting with environment variable fallback.
///
/// Priority: non-empty settings value, then the first set and non-empty
/// environment variable in `env_keys`, then `default`.
pub fn get_with_env_fallback(
    value: &Option<String>,
    env_keys: &[&str],
    default: Option<String>,
) -> Option<String> {
    if let Some(v) = value {
        if !v.is_empty() {
            return Some(v.clone());
        }
    }
    for key in env_keys {
        if let Ok(v) = std::env::var(key) {
            if !v.is_empty() {
                return Some(v);
            }
        }
    }
    default
}

/// Loads settings from disk and applies env interpolation.
pub struct SettingsManager;

impl SettingsManager {
    /// Load settings from the default location.
    ///
    /// A missing file is not an error: the defaults (with the DeepSeek
    /// server entries) are returned instead.
    pub fn load_standalone() -> Result<BenchmapSettings, SettingsError> {
        match settings_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                debug!("settings file {} not found, using defaults", path.display());
                Ok(Self::interpolate(BenchmapSettings::with_default_servers()))
            }
            None => Ok(Self::interpolate(BenchmapSettings::with_default_servers())),
        }
    }

    /// Load settings from an explicit path.
    pub fn load_from(path: &Path) -> Result<BenchmapSettings, SettingsError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::Load(format!("{}: {}", path.display(), e)))?;
        let settings: BenchmapSettings = toml::from_str(&raw)
            .map_err(|e| SettingsError::Load(format!("{}: {}", path.display(), e)))?;
        Ok(Self::interpolate(settings))
    }

    /// Write the first-run template if no settings file exists yet.
    pub fn init_template() -> Result<PathBuf, SettingsError> {
        let path = settings_path()
            .ok_or_else(|| SettingsError::Load("cannot determine home directory".to_string()))?;
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::Load(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(&path, SETTINGS_TEMPLATE)
            .map_err(|e| SettingsError::Load(format!("{}: {}", path.display(), e)))?;
        info!("wrote settings template to {}", path.display());
        Ok(path)
    }

    /// Apply env interpolation to every value that supports it.
    fn interpolate(mut settings: BenchmapSettings) -> BenchmapSettings {
        for server in settings.servers.values_mut() {
            server.model = interpolate_env(&server.model);
            server.url = interpolate_env(&server.url);
            server.api_key = server.api_key.take().map(|v| interpolate_env(&v));
        }
        for dataset in settings.datasets.values_mut() {
            dataset.local_path = dataset.local_path.take().map(|v| interpolate_env(&v));
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_interpolate_both_syntaxes() {
        std::env::set_var("BENCHMAP_TEST_VAR", "resolved");
        assert_eq!(interpolate_env("$BENCHMAP_TEST_VAR"), "resolved");
        assert_eq!(interpolate_env("${BENCHMAP_TEST_VAR}"), "resolved");
        assert_eq!(
            interpolate_env("prefix-${BENCHMAP_TEST_VAR}-suffix"),
            "prefix-resolved-suffix"
        );
        std::env::remove_var("BENCHMAP_TEST_VAR");
    }

    #[test]
    fn test_interpolate_unset_var_to_empty() {
        assert_eq!(interpolate_env("$BENCHMAP_DEFINITELY_UNSET_VAR"), "");
    }

    #[test]
    fn test_plain_strings_pass_through() {
        assert_eq!(
            interpolate_env("https://api.deepseek.com"),
            "https://api.deepseek.com"
        );
    }

    #[test]
    fn test_get_with_env_fallback_priority() {
        std::env::set_var("BENCHMAP_TEST_FALLBACK", "from-env");

        // Settings value wins.
        assert_eq!(
            get_with_env_fallback(
                &Some("from-settings".to_string()),
                &["BENCHMAP_TEST_FALLBACK"],
                None
            ),
            Some("from-settings".to_string())
        );

        // Empty settings value falls through to env.
        assert_eq!(
            get_with_env_fallback(&Some(String::new()), &["BENCHMAP_TEST_FALLBACK"], None),
            Some("from-env".to_string())
        );

        // Default used last.
        assert_eq!(
            get_with_env_fallback(
                &None,
                &["BENCHMAP_OTHER_UNSET_VAR"],
                Some("fallback".to_string())
            ),
            Some("fallback".to_string())
        );

        std::env::remove_var("BENCHMAP_TEST_FALLBACK");
    }

    #[test]
    fn test_load_from_interpolates_server_values() {
        std::env::set_var("BENCHMAP_TEST_KEY", "sk-test");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [servers.test]
            model = "test-model"
            url = "https://example.com"
            api_key = "$BENCHMAP_TEST_KEY"
            params = "7B"
            "#
        )
        .unwrap();

        let settings = SettingsManager::load_from(file.path()).unwrap();
        let server = settings.server("test").unwrap();
        assert_eq!(server.api_key.as_deref(), Some("sk-test"));

        std::env::remove_var("BENCHMAP_TEST_KEY");
    }

    #[test]
    fn test_load_from_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [").unwrap();

        assert!(matches!(
            SettingsManager::load_from(file.path()),
            Err(SettingsError::Load(_))
        ));
    }
}
