use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default API URL
const DEFAULT_API_URL: &str = "https://api.barberbook.app/v1";

/// Default upper bound on a single request
pub const DEFAULT_TIMEOUT_SECS: u64 = 100;

/// Environment variable name for API URL override
pub const ENV_API_URL: &str = "BARBERBOOK_API_URL";

/// Environment variable name for request timeout override
pub const ENV_API_TIMEOUT: &str = "BARBERBOOK_API_TIMEOUT_SECS";

/// Configuration file structure
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    api: Option<ApiSection>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiSection {
    /// API endpoint URL (e.g., "https://staging.barberbook.app/v1")
    api_url: Option<String>,
    /// Request timeout in seconds
    timeout_secs: Option<u64>,
}

/// Runtime API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for API calls, without trailing slash
    pub api_url: String,
    /// Fixed upper bound on each call
    pub timeout: Duration,
    /// Source of the API URL (for logging)
    pub source: ConfigSource,
}

impl ApiConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(&api_url.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            source: ConfigSource::Default,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Using default hardcoded values
    Default,
    /// Loaded from environment variable
    Environment,
    /// Loaded from config file
    ConfigFile,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigFile => write!(f, "config file"),
        }
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Get the path to the configuration file
fn get_config_file_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|p| p.join("barberbook").join("config.toml"))
}

/// Load configuration from a config file
fn load_config_file(path: &Path) -> Option<ConfigFile> {
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            None
        }
    }
}

/// Load API configuration with priority:
/// 1. Environment variables (BARBERBOOK_API_URL, BARBERBOOK_API_TIMEOUT_SECS)
/// 2. Config file (~/.config/barberbook/config.toml)
/// 3. Default values
pub fn load_api_config() -> ApiConfig {
    let file = get_config_file_path().and_then(|p| load_config_file(&p));
    resolve(
        std::env::var(ENV_API_URL).ok(),
        std::env::var(ENV_API_TIMEOUT).ok(),
        file,
    )
}

fn resolve(env_url: Option<String>, env_timeout: Option<String>, file: Option<ConfigFile>) -> ApiConfig {
    let section = file.and_then(|f| f.api).unwrap_or_default();

    let env_url = env_url.map(|u| normalize_url(&u)).filter(|u| !u.is_empty());
    let file_url = section
        .api_url
        .map(|u| normalize_url(&u))
        .filter(|u| !u.is_empty());

    let mut config = if let Some(url) = env_url {
        tracing::info!("Using API URL from environment variable: {}", url);
        ApiConfig {
            source: ConfigSource::Environment,
            ..ApiConfig::new(url)
        }
    } else if let Some(url) = file_url {
        tracing::info!("Using API URL from config file: {}", url);
        ApiConfig {
            source: ConfigSource::ConfigFile,
            ..ApiConfig::new(url)
        }
    } else {
        tracing::debug!("Using default API URL: {}", DEFAULT_API_URL);
        ApiConfig::default()
    };

    let env_timeout = env_timeout.and_then(|t| match t.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(secs),
        _ => {
            tracing::warn!("Ignoring invalid {}: {:?}", ENV_API_TIMEOUT, t);
            None
        }
    });
    if let Some(secs) = env_timeout.or(section.timeout_secs.filter(|s| *s > 0)) {
        config.timeout = Duration::from_secs(secs);
    }

    config
}

/// Get the path to the config file for documentation purposes
pub fn get_config_file_path_string() -> String {
    get_config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/barberbook/config.toml".to_string())
}

/// Generate example config file content
pub fn generate_example_config() -> String {
    r#"# Barberbook Configuration
# Place this file at: ~/.config/barberbook/config.toml

[api]
# API endpoint URL
# Default: https://api.barberbook.app/v1
# api_url = "https://staging.barberbook.app/v1"

# Upper bound on a single request, in seconds
# Default: 100
# timeout_secs = 30
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(toml_src: &str) -> Option<ConfigFile> {
        Some(toml::from_str(toml_src).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = resolve(None, None, None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(100));
        assert_eq!(config.source, ConfigSource::Default);
    }

    #[test]
    fn test_environment_beats_file() {
        let config = resolve(
            Some(" https://env.example.com/v1/ ".to_string()),
            None,
            file("[api]\napi_url = \"https://file.example.com\"\ntimeout_secs = 30\n"),
        );
        assert_eq!(config.api_url, "https://env.example.com/v1");
        assert_eq!(config.source, ConfigSource::Environment);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_file_and_blank_env() {
        let config = resolve(
            Some("   ".to_string()),
            Some("15".to_string()),
            file("[api]\napi_url = \"https://file.example.com/\"\n"),
        );
        assert_eq!(config.api_url, "https://file.example.com");
        assert_eq!(config.source, ConfigSource::ConfigFile);
        assert_eq!(config.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_timeouts_are_ignored() {
        let config = resolve(None, Some("soon".to_string()), file("[api]\ntimeout_secs = 0\n"));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.source, ConfigSource::Default);
    }

    #[test]
    fn test_example_config_parses() {
        let parsed: ConfigFile = toml::from_str(&generate_example_config()).unwrap();
        assert!(parsed.api.is_some());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(load_config_file(&path).is_none());

        fs::write(&path, "[api]\napi_url = \"https://x.example.com\"\n").unwrap();
        let loaded = load_config_file(&path).and_then(|f| f.api).and_then(|a| a.api_url);
        assert_eq!(loaded.as_deref(), Some("https://x.example.com"));

        fs::write(&path, "[api\nbroken").unwrap();
        assert!(load_config_file(&path).is_none());
    }
}
