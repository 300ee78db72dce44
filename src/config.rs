// src/config.rs
// =============================================================================
// Runtime configuration.
//
// Values are resolved in this order (later overrides earlier):
// 1. Built-in defaults
// 2. The config file, if there is one:
//      $GH_GLANCE_CONFIG, else <config dir>/gh-glance/config.toml
// 3. Command-line flags (and their GH_GLANCE_* environment fallbacks)
//
// Example config.toml:
//
//   api_url = "https://ghe.example.com/api/v3"
//   per_page = 6
//   copy_reset_ms = 1500
//   color = false
// =============================================================================

use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the REST API
    pub api_url: String,
    /// Repositories fetched per profile page
    pub per_page: u32,
    /// How long a copy button shows its "copied" icon
    pub copy_reset_ms: u64,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// GitHub rejects requests without a User-Agent
    pub user_agent: String,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            per_page: 4,
            copy_reset_ms: 2500,
            timeout_secs: 10,
            user_agent: concat!("gh-glance/", env!("CARGO_PKG_VERSION")).to_string(),
            color: true,
        }
    }
}

// What the config file may contain; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    per_page: Option<u32>,
    copy_reset_ms: Option<u64>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    color: Option<bool>,
}

// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub per_page: Option<u32>,
    pub no_color: bool,
}

impl Config {
    // Defaults merged with the config file (a missing file is fine)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var_os(key))
    }

    // load() with the environment lookup passed in
    fn load_with(env: impl Fn(&str) -> Option<OsString>) -> Result<Self, ConfigError> {
        // $GH_GLANCE_CONFIG wins, otherwise the platform config directory
        let path = match env("GH_GLANCE_CONFIG") {
            Some(path) => Some(PathBuf::from(path)),
            None => dirs::config_dir().map(|dir| dir.join("gh-glance").join("config.toml")),
        };

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        // https://no-color.org: any non-empty value
        if env("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            config.color = false;
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file: FileConfig = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::default().merge(file)
    }

    fn merge(mut self, file: FileConfig) -> Result<Self, ConfigError> {
        if let Some(api_url) = file.api_url {
            self.api_url = api_url;
        }
        if let Some(per_page) = file.per_page {
            self.per_page = per_page;
        }
        if let Some(ms) = file.copy_reset_ms {
            self.copy_reset_ms = ms;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(agent) = file.user_agent {
            self.user_agent = agent;
        }
        if let Some(color) = file.color {
            self.color = color;
        }
        self.validate()
    }

    pub fn apply(mut self, overrides: Overrides) -> Result<Self, ConfigError> {
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(per_page) = overrides.per_page {
            self.per_page = per_page;
        }
        if overrides.no_color {
            self.color = false;
        }
        self.validate()
    }

    // GitHub caps per_page at 100
    fn validate(self) -> Result<Self, ConfigError> {
        if !(1..=100).contains(&self.per_page) {
            return Err(ConfigError::InvalidValue(format!(
                "per_page must be between 1 and 100, got {}",
                self.per_page
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "per_page = 6\ncolor = false\n").unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.per_page, 6);
        assert!(!config.color);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.copy_reset_ms, 2500);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "token = \"secret\"\n").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    // An environment holding only the given variables
    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: Vec<(String, OsString)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(*v)))
            .collect();
        move |key: &str| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn test_config_path_from_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "api_url = \"https://ghe.example.com/api/v3\"\n").unwrap();
        let path = path.to_string_lossy().into_owned();

        let env = env_of(&[("GH_GLANCE_CONFIG", path.as_str())]);
        let config = Config::load_with(env).unwrap();

        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
        assert!(config.color);
    }

    #[test]
    fn test_missing_config_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml").to_string_lossy().into_owned();

        let env = env_of(&[("GH_GLANCE_CONFIG", path.as_str())]);
        let config = Config::load_with(env).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_no_color_disables_colour() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "color = true\n").unwrap();
        let path = path.to_string_lossy().into_owned();

        let env = env_of(&[("GH_GLANCE_CONFIG", path.as_str()), ("NO_COLOR", "1")]);
        let config = Config::load_with(env).unwrap();
        assert!(!config.color);

        // an empty NO_COLOR doesn't count
        let env = env_of(&[("GH_GLANCE_CONFIG", path.as_str()), ("NO_COLOR", "")]);
        let config = Config::load_with(env).unwrap();
        assert!(config.color);
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = Config::default()
            .apply(Overrides {
                api_url: Some("http://localhost:9999".to_string()),
                per_page: Some(10),
                no_color: true,
            })
            .unwrap();

        assert_eq!(config.api_url, "http://localhost:9999");
        assert_eq!(config.per_page, 10);
        assert!(!config.color);
    }

    #[test]
    fn test_per_page_out_of_range() {
        let result = Config::default().apply(Overrides {
            per_page: Some(0),
            ..Overrides::default()
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
