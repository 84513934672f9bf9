//! Editor configuration
//!
//! Layered as: defaults, then an optional TOML file, then environment
//! overrides. Command-line flags are applied by the binary on top.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`RemoteConfig::base_url`]
pub const ENV_API_URL: &str = "MORTGAGE_API_URL";

/// Environment variable overriding [`LogConfig::level`]
pub const ENV_LOG: &str = "MORTGAGE_LOG";

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Remote store settings
    pub remote: RemoteConfig,
    /// Logging settings
    pub log: LogConfig,
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With store base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.remote.base_url = url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.remote.timeout_secs = secs;
        self
    }

    /// With log filter directive
    #[inline]
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log.level = level.into();
        self
    }

    /// With log output format
    #[inline]
    #[must_use]
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log.format = format;
        self
    }

    /// Parse configuration from TOML text
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    /// `ConfigError::Parse` for malformed input.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`, or defaults when `None`, then apply the process
    /// environment
    ///
    /// # Errors
    /// `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                tracing::debug!(path = %path.display(), "loaded config file");
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };
        Ok(config.apply_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Empty values are ignored.
    #[must_use]
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_API_URL) {
            self.remote.base_url = url;
        }
        if let Some(level) = get(ENV_LOG) {
            self.log.level = level;
        }
        self
    }
}

/// Remote store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Store root, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Collection path segment
    pub collection: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            collection: "mortgages".to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = EditorConfig::new();
        assert_eq!(config.remote.base_url, "http://localhost:8000");
        assert_eq!(config.remote.timeout_secs, 30);
        assert_eq!(config.remote.collection, "mortgages");
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log.format, LogFormat::Text);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EditorConfig::from_toml(
            r#"
            [remote]
            base_url = "https://api.example.test"

            [log]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.remote.base_url, "https://api.example.test");
        assert_eq!(config.remote.timeout_secs, 30);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = EditorConfig::from_toml("[remote\nbase_url = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn overrides_win_over_file() {
        let config = EditorConfig::new()
            .with_base_url("http://file")
            .apply_overrides(|key| match key {
                ENV_API_URL => Some("http://env".to_string()),
                ENV_LOG => Some("  ".to_string()),
                _ => None,
            });
        assert_eq!(config.remote.base_url, "http://env");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[remote]\ntimeout_secs = 5").unwrap();

        let config = EditorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.remote.timeout_secs, 5);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EditorConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
