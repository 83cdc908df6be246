// src/config.rs
use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::errors::{ExtractError, Result};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000";
pub const DEFAULT_CONFIG_FILE: &str = "extractor.toml";

pub const ENV_API_BASE: &str = "RESULTS_API_BASE_URL";
pub const ENV_DOWNLOAD_DIR: &str = "RESULTS_DOWNLOAD_DIR";

/// Application configuration.
///
/// Resolved from defaults, then an optional TOML file, then environment
/// variables. Command-line flags are applied on top by the binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL shared by the results and report endpoints.
    pub api_base: String,
    /// Where downloaded reports are saved.
    pub download_dir: PathBuf,
}

/// Shape of `extractor.toml`. Every key is optional.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub api_base: Option<String>,

    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            download_dir: default_download_dir(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

impl AppConfig {
    /// Load configuration from the process environment, optionally layered
    /// over a TOML file.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let file = match config_file {
            Some(path) => Some(Self::read_file(path)?),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Some(Self::read_file(fallback)?)
                } else {
                    None
                }
            }
        };

        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Reads and validates a TOML config file on its own, without the
    /// environment layer.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        Self::resolve(Some(Self::read_file(path)?), |_| None)
    }

    fn read_file(path: &Path) -> Result<FileConfig> {
        let text = std::fs::read_to_string(path)?;
        FileConfig::parse(&text)
    }

    /// Applies the file layer and then the environment layer over the defaults.
    pub fn resolve<F>(file: Option<FileConfig>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(file) = file {
            if let Some(api_base) = file.api_base {
                config.api_base = api_base;
            }
            if let Some(dir) = file.download_dir {
                config.download_dir = dir;
            }
        }

        if let Some(api_base) = env(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            config.api_base = api_base;
        }
        if let Some(dir) = env(ENV_DOWNLOAD_DIR).filter(|v| !v.trim().is_empty()) {
            config.download_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(self.api_base.trim()).map_err(|e| {
            ExtractError::Config(format!("invalid API base URL '{}': {}", self.api_base, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ExtractError::Config(format!(
                "API base URL must use http or https, got '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = AppConfig::resolve(None, env_from(&[])).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_file_layer_overrides_defaults() {
        let file = FileConfig::parse(
            r#"
            api_base = "https://results.example.edu"
            download_dir = "/tmp/reports"
            "#,
        )
        .unwrap();

        let config = AppConfig::resolve(Some(file), env_from(&[])).unwrap();
        assert_eq!(config.api_base, "https://results.example.edu");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn test_env_layer_overrides_file() {
        let file = FileConfig {
            api_base: Some("https://from-file.example".to_string()),
            download_dir: None,
        };
        let env = env_from(&[
            (ENV_API_BASE, "http://10.0.0.5:5000"),
            (ENV_DOWNLOAD_DIR, "/srv/out"),
        ]);

        let config = AppConfig::resolve(Some(file), env).unwrap();
        assert_eq!(config.api_base, "http://10.0.0.5:5000");
        assert_eq!(config.download_dir, PathBuf::from("/srv/out"));
    }

    #[test]
    fn test_blank_env_value_is_ignored() {
        let config = AppConfig::resolve(None, env_from(&[(ENV_API_BASE, "  ")])).unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_rejects_non_http_base() {
        let err = AppConfig::resolve(None, env_from(&[(ENV_API_BASE, "ftp://host")])).unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));

        let err = AppConfig::resolve(None, env_from(&[(ENV_API_BASE, "not a url")])).unwrap_err();
        assert!(matches!(err, ExtractError::Config(_)));
    }

    #[test]
    fn test_unknown_file_keys_are_rejected() {
        let err = FileConfig::parse("base = \"http://x\"").unwrap_err();
        assert!(matches!(err, ExtractError::TomlParse(_)));
    }
}
